use std::{fs::File, io::BufReader, path::PathBuf};

use clap::Args;
use itinera_optimizer::{
    json::types::TravelDataset, model::model_builder::build_model, problem::big_m::BigMStrategy,
};
use tracing::info;

use crate::run_params_args::RunParamsArgs;

#[derive(Args)]
pub struct CheckArgs {
    /// The travel dataset to check
    #[arg(short = 'i', long, default_value = "data/travel_data.json")]
    input: PathBuf,

    #[command(flatten)]
    run_params: RunParamsArgs,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let run_params = args.run_params.to_run_params()?;

    let file = File::open(&args.input)?;
    let catalog = TravelDataset::from_reader(BufReader::new(file))?.build_catalog()?;
    let model = build_model(&catalog, &run_params, &BigMStrategy::default())?;

    info!(
        "{:?}: {} destinations, {} itineraries, {} warnings",
        args.input,
        catalog.len(),
        catalog.assignment_count(),
        catalog.warnings().len()
    );
    info!(
        "Model: {} variables, {} constraints, big-M = {}, at most {} solves",
        model.model().num_variables(),
        model.model().num_constraints(),
        model.big_m(),
        catalog.max_iterations()
    );

    Ok(())
}
