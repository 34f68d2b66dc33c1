use tracing::instrument;

use crate::{
    enumeration::{controller::EnumerationController, enumeration_params::EnumerationParams},
    error::ItineraryError,
    json::types::TravelDataset,
    problem::run_params::RunParams,
    report::enumeration_report::EnumerationReport,
    solver::solver_adapter::SolverAdapter,
};

/// Loads the dataset and enumerates every optimal itinerary.
///
/// Input problems are returned as errors before any solve. Anything that goes
/// wrong afterwards is part of the report, next to the records found so far.
#[instrument(skip_all, level = "debug")]
pub fn optimize<S: SolverAdapter>(
    dataset: TravelDataset,
    run_params: RunParams,
    params: EnumerationParams,
    solver: &mut S,
) -> Result<EnumerationReport, ItineraryError> {
    let catalog = dataset.build_catalog()?;
    let controller = EnumerationController::new(catalog, run_params, params)?;

    Ok(controller.run(solver))
}
