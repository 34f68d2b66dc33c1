use jiff::SignedDuration;
use serde::Serialize;

use crate::{
    enumeration::controller::{EnumerationState, TerminationReason},
    problem::trip_catalog::CatalogWarning,
    report::solution_record::{SolutionRecord, ValidationWarning},
};

/// Outcome of one enumeration run. Records are in discovery order and all
/// share `target` within the tie tolerance.
#[derive(Clone, Debug, Serialize)]
pub struct EnumerationReport {
    pub(crate) state: EnumerationState,
    pub(crate) termination: TerminationReason,
    pub(crate) target: Option<f64>,
    pub(crate) records: Vec<SolutionRecord>,
    pub(crate) iterations: usize,
    pub(crate) catalog_warnings: Vec<CatalogWarning>,
    pub(crate) big_m: f64,
    pub(crate) elapsed: SignedDuration,
    /// Part of `elapsed` spent inside the solver.
    pub(crate) solve_time: SignedDuration,
}

impl EnumerationReport {
    pub fn state(&self) -> EnumerationState {
        self.state
    }

    pub fn termination(&self) -> &TerminationReason {
        &self.termination
    }

    /// Objective shared by every record, `None` when nothing was feasible.
    pub fn target(&self) -> Option<f64> {
        self.target
    }

    pub fn records(&self) -> &[SolutionRecord] {
        &self.records
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.catalog_warnings
    }

    pub fn validation_warnings(&self) -> impl Iterator<Item = (&SolutionRecord, &ValidationWarning)> {
        self.records
            .iter()
            .flat_map(|record| record.warnings.iter().map(move |warning| (record, warning)))
    }

    pub fn big_m(&self) -> f64 {
        self.big_m
    }

    pub fn elapsed(&self) -> SignedDuration {
        self.elapsed
    }

    pub fn solve_time(&self) -> SignedDuration {
        self.solve_time
    }

    /// The run reached its natural end (or a requested solution cap).
    pub fn is_complete(&self) -> bool {
        self.state == EnumerationState::Done
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(
            self.termination,
            TerminationReason::NoFeasibleSolution { .. }
        )
    }
}
