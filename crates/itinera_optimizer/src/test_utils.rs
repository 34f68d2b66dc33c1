use std::{collections::VecDeque, fs::File, path::PathBuf};

use crate::{
    json::types::TravelDataset,
    model::{decision_assignment::DecisionAssignment, mip_model::MipModel, model_builder::ItineraryModel},
    problem::{
        destination::{DestinationBuilder, DestinationIdx},
        trip::{Trip, TripIdx},
        trip_catalog::{TripCatalog, TripCatalogBuilder},
    },
    solver::solver_adapter::{SolveOutcome, SolverAdapter, SolverError},
};

pub fn data_fixture_path(fixture: &str) -> PathBuf {
    let current_working_dir = std::env::current_dir().unwrap();

    current_working_dir
        .join("../../data/")
        .join(fixture)
        .canonicalize()
        .unwrap()
}

/// The four-destination dataset bundled in `data/travel_data.json`.
pub fn sample_catalog() -> TripCatalog {
    let file = File::open(data_fixture_path("travel_data.json")).unwrap();
    TravelDataset::from_reader(file)
        .unwrap()
        .build_catalog()
        .unwrap()
}

/// A single destination (`U = 9`, `D = 5`) with one outbound trip
/// `(8, 12.5, 550)` and one return trip `(82, 86.5, 550)`.
pub fn single_destination_catalog(min_stay: Option<f64>, max_stay: Option<f64>) -> TripCatalog {
    let mut destination = DestinationBuilder::default();
    destination
        .set_external_id("Solo")
        .set_utility(9.0)
        .set_difficulty(5.0)
        .add_outbound_trip(Trip::new("OUT_1", 8.0, 12.5, 550.0))
        .add_return_trip(Trip::new("RET_1", 82.0, 86.5, 550.0));

    if let Some(hours) = min_stay {
        destination.set_min_stay_hours(hours);
    }
    if let Some(hours) = max_stay {
        destination.set_max_stay_hours(hours);
    }

    let mut builder = TripCatalogBuilder::default();
    builder.add_destination(destination.build());
    builder.build().unwrap()
}

pub fn assignment(destination: usize, outbound: usize, return_trip: usize) -> DecisionAssignment {
    DecisionAssignment::new(
        DestinationIdx::new(destination),
        TripIdx::new(outbound),
        TripIdx::new(return_trip),
    )
}

/// Solver values selecting exactly `assignment`.
pub fn values_for(model: &ItineraryModel, assignment: &DecisionAssignment) -> Vec<f64> {
    let mut values = vec![0.0; model.model().num_variables()];
    for variable in model.selected_vars(assignment) {
        values[variable.get()] = 1.0;
    }
    values
}

/// Replays a fixed sequence of solve results and records how many cuts each
/// model it was given carried.
pub struct ScriptedSolver {
    script: VecDeque<Result<SolveOutcome, SolverError>>,
    cuts_seen: Vec<usize>,
}

impl ScriptedSolver {
    pub fn new(script: Vec<Result<SolveOutcome, SolverError>>) -> Self {
        ScriptedSolver {
            script: script.into(),
            cuts_seen: Vec::new(),
        }
    }

    pub fn cuts_seen(&self) -> &[usize] {
        &self.cuts_seen
    }
}

impl SolverAdapter for ScriptedSolver {
    fn solve(&mut self, model: &MipModel) -> Result<SolveOutcome, SolverError> {
        self.cuts_seen.push(model.num_cuts());
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(SolverError::Backend("script exhausted".to_owned())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
