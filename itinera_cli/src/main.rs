use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{check::CheckArgs, generate::GenerateSubcommands, optimize::OptimizeArgs};

mod check;
mod generate;
mod optimize;
mod parsers;
mod run_params_args;
mod table;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every itinerary that ties for the best weighted utility
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Load a dataset and report warnings and model size without solving
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Optimize { args }) => optimize::run(args)?,
        Some(Commands::Check { args }) => check::run(args)?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => {}
    }

    Ok(())
}
