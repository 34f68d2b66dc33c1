use std::fmt;

use jiff::SignedDuration;
use serde::Serialize;
use thiserror::Error;

use crate::model::mip_model::MipModel;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Result of one solve. `values` is indexed by `VariableIdx` and only
/// meaningful when the status is optimal.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveOutcome {
    status: SolveStatus,
    values: Vec<f64>,
}

impl SolveOutcome {
    pub fn new(status: SolveStatus, values: Vec<f64>) -> Self {
        SolveOutcome { status, values }
    }

    pub fn optimal(values: Vec<f64>) -> Self {
        SolveOutcome::new(SolveStatus::Optimal, values)
    }

    pub fn infeasible() -> Self {
        SolveOutcome::new(SolveStatus::Infeasible, Vec::new())
    }

    pub fn unbounded() -> Self {
        SolveOutcome::new(SolveStatus::Unbounded, Vec::new())
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum SolverError {
    #[error("solver backend failed: {0}")]
    Backend(String),
    #[error("solve did not finish within {0:#}")]
    Timeout(SignedDuration),
    #[error("solver worker exited without a result")]
    WorkerLost,
}

/// A MIP capability. Implementations must not keep state between solves
/// that changes the answer for an identical model.
pub trait SolverAdapter {
    fn solve(&mut self, model: &MipModel) -> Result<SolveOutcome, SolverError>;

    fn name(&self) -> &str;
}
