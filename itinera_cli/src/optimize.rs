use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::bail;
use clap::Args;
use itinera_optimizer::{
    enumeration::{
        controller::EnumerationController,
        enumeration_params::{EnumerationParams, Termination},
    },
    json::types::TravelDataset,
    problem::big_m::{BigMStrategy, DEFAULT_SAFETY_FACTOR},
    solver::good_lp_solver::GoodLpSolver,
};
use tracing::{info, warn};

use crate::{parsers, run_params_args::RunParamsArgs, table::solutions_table};

#[derive(Args)]
pub struct OptimizeArgs {
    /// The travel dataset to optimize
    #[arg(short = 'i', long, default_value = "data/travel_data.json")]
    input: PathBuf,

    #[command(flatten)]
    run_params: RunParamsArgs,

    /// Use this constant as big-M instead of deriving it from the data
    #[arg(long, conflicts_with = "safety_factor")]
    big_m: Option<f64>,

    /// Multiple of the largest input value used as big-M
    #[arg(long, default_value_t = DEFAULT_SAFETY_FACTOR)]
    safety_factor: f64,

    /// Time limit for a single solve (e.g., "30s", "5m", "PT1H30M")
    #[arg(long, value_parser = parsers::parse_duration)]
    solve_timeout: Option<jiff::SignedDuration>,

    /// Time limit for the whole enumeration
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Stop after this many optimal itineraries
    #[arg(long, short = 'n')]
    max_solutions: Option<usize>,

    /// Fail the run after this many solves
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Write the full report as JSON
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

impl OptimizeArgs {
    fn enumeration_params(&self) -> EnumerationParams {
        let mut terminations = vec![];
        if let Some(timeout) = self.timeout {
            terminations.push(Termination::Duration(timeout));
        }
        if let Some(max_solutions) = self.max_solutions {
            terminations.push(Termination::MaxSolutions(max_solutions));
        }
        if let Some(max_iterations) = self.max_iterations {
            terminations.push(Termination::MaxIterations(max_iterations));
        }

        let big_m = match self.big_m {
            Some(value) => BigMStrategy::Fixed { value },
            None => BigMStrategy::Derived {
                safety_factor: self.safety_factor,
            },
        };

        EnumerationParams {
            big_m,
            terminations,
            ..EnumerationParams::default()
        }
    }
}

pub fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let run_params = args.run_params.to_run_params()?;

    info!("Optimizing {:?}", args.input);
    let file = File::open(&args.input)?;
    let catalog = TravelDataset::from_reader(BufReader::new(file))?.build_catalog()?;

    let mut controller = EnumerationController::new(catalog, run_params, args.enumeration_params())?;
    controller.on_solution(|record| {
        info!(
            "Found {} via {} / {} (objective {:.4})",
            record.destination, record.outbound.id, record.return_trip.id, record.objective
        );
    });

    let mut solver = match args.solve_timeout {
        Some(timeout) => GoodLpSolver::with_timeout(timeout),
        None => GoodLpSolver::new(),
    };

    let report = controller.run(&mut solver);

    match report.target() {
        Some(target) => {
            println!("{}", solutions_table(report.records()));
            println!(
                "Target objective: {:.4}, {} optimal itineraries ({} solves, {:#}, {:#} in solver)",
                target,
                report.records().len(),
                report.iterations(),
                report.elapsed(),
                report.solve_time()
            );
        }
        None => println!("No feasible itinerary satisfies the constraints."),
    }

    for (record, warning) in report.validation_warnings() {
        warn!(
            "{} via {} / {}: {}",
            record.destination, record.outbound.id, record.return_trip.id, warning
        );
    }

    if let Some(output) = &args.output {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, serde_json::to_string_pretty(&report)?)?;
        info!("Wrote report to {:?}", output);
    }

    if !report.is_complete() {
        bail!(
            "Enumeration did not finish cleanly: {}",
            report.termination()
        );
    }

    Ok(())
}
