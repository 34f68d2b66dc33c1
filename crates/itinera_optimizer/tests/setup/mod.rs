use std::{fs::File, path::PathBuf};

use itinera_optimizer::{
    enumeration::enumeration_params::EnumerationParams,
    json::types::TravelDataset,
    optimize::optimize,
    problem::run_params::RunParams,
    report::enumeration_report::EnumerationReport,
    solver::good_lp_solver::GoodLpSolver,
};

pub const EPSILON: f64 = 1e-6;

pub fn data_fixture_path(fixture: &str) -> PathBuf {
    let current_working_dir = std::env::current_dir().unwrap();

    current_working_dir
        .join("../../data/")
        .join(fixture)
        .canonicalize()
        .unwrap()
}

pub fn load_sample_dataset() -> TravelDataset {
    let file = File::open(data_fixture_path("travel_data.json")).unwrap();
    TravelDataset::from_reader(file).unwrap()
}

pub fn run(dataset: TravelDataset, run_params: RunParams) -> EnumerationReport {
    let mut solver = GoodLpSolver::new();
    optimize(dataset, run_params, EnumerationParams::default(), &mut solver).unwrap()
}

pub fn run_json(json: &str, run_params: RunParams) -> EnumerationReport {
    run(json.parse().unwrap(), run_params)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}
