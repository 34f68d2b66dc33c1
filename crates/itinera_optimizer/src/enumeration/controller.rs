use std::fmt;

use fxhash::FxHashSet;
use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    enumeration::enumeration_params::EnumerationParams,
    error::ModelConfigError,
    model::{
        decision_assignment::AssignmentError,
        model_builder::{ItineraryModel, build_model},
    },
    problem::{run_params::RunParams, trip_catalog::TripCatalog},
    report::{
        enumeration_report::EnumerationReport, solution_record::SolutionRecord,
        validator::validate_assignment,
    },
    solver::solver_adapter::{SolveStatus, SolverAdapter, SolverError},
    timer_debug,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnumerationState {
    Searching,
    Done,
    Failed,
}

impl fmt::Display for EnumerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumerationState::Searching => write!(f, "SEARCHING"),
            EnumerationState::Done => write!(f, "DONE"),
            EnumerationState::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TerminationReason {
    /// The very first solve was not optimal.
    NoFeasibleSolution { status: SolveStatus },
    /// A later solve was not optimal: every tied itinerary has been cut off.
    TiesExhausted { status: SolveStatus },
    /// A later solve found only a different objective.
    ObjectiveChanged { objective: f64 },
    SolutionLimit { limit: usize },
    TimeLimit { limit: SignedDuration },
    SolverFailed { error: SolverError },
    InvalidAssignment { error: AssignmentError },
    IterationLimit { limit: usize },
}

impl TerminationReason {
    pub fn state(&self) -> EnumerationState {
        match self {
            TerminationReason::NoFeasibleSolution { .. }
            | TerminationReason::TiesExhausted { .. }
            | TerminationReason::ObjectiveChanged { .. }
            | TerminationReason::SolutionLimit { .. } => EnumerationState::Done,
            TerminationReason::TimeLimit { .. }
            | TerminationReason::SolverFailed { .. }
            | TerminationReason::InvalidAssignment { .. }
            | TerminationReason::IterationLimit { .. } => EnumerationState::Failed,
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::NoFeasibleSolution { status } => {
                write!(f, "no feasible itinerary (first solve was {status})")
            }
            TerminationReason::TiesExhausted { status } => {
                write!(f, "all optimal itineraries found (last solve was {status})")
            }
            TerminationReason::ObjectiveChanged { objective } => write!(
                f,
                "all optimal itineraries found (next best objective is {objective})"
            ),
            TerminationReason::SolutionLimit { limit } => {
                write!(f, "stopped after {limit} solutions")
            }
            TerminationReason::TimeLimit { limit } => {
                write!(f, "run exceeded its time limit of {limit:#}")
            }
            TerminationReason::SolverFailed { error } => write!(f, "{error}"),
            TerminationReason::InvalidAssignment { error } => {
                write!(f, "solver returned an invalid assignment: {error}")
            }
            TerminationReason::IterationLimit { limit } => {
                write!(f, "exceeded the limit of {limit} solves")
            }
        }
    }
}

pub type SolutionCallback = Box<dyn FnMut(&SolutionRecord) + Send>;

/// Finds every itinerary that ties with the first optimum by repeatedly
/// solving the model and cutting off each accepted assignment.
pub struct EnumerationController {
    catalog: TripCatalog,
    run_params: RunParams,
    params: EnumerationParams,
    model: ItineraryModel,
    on_solution: Option<SolutionCallback>,
}

impl EnumerationController {
    pub fn new(
        catalog: TripCatalog,
        run_params: RunParams,
        params: EnumerationParams,
    ) -> Result<Self, ModelConfigError> {
        params.validate()?;
        let model = build_model(&catalog, &run_params, &params.big_m)?;

        Ok(EnumerationController {
            catalog,
            run_params,
            params,
            model,
            on_solution: None,
        })
    }

    /// Called with every accepted record, in discovery order.
    pub fn on_solution<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(&SolutionRecord) + Send + 'static,
    {
        self.on_solution = Some(Box::new(callback));
        self
    }

    #[cfg(test)]
    pub(crate) fn model(&self) -> &ItineraryModel {
        &self.model
    }

    #[instrument(skip_all, level = "debug", fields(solver = solver.name()))]
    pub fn run<S: SolverAdapter>(mut self, solver: &mut S) -> EnumerationReport {
        let started_at = Timestamp::now();
        let max_iterations = match self.params.max_iterations() {
            Some(limit) => limit.min(self.catalog.max_iterations()),
            None => self.catalog.max_iterations(),
        };
        let max_duration = self.params.max_duration();
        let max_solutions = self.params.max_solutions();

        let mut records: Vec<SolutionRecord> = Vec::new();
        let mut accepted = FxHashSet::default();
        let mut target: Option<f64> = None;
        let mut iterations = 0;
        let mut solve_time = SignedDuration::ZERO;

        info!(
            destinations = self.catalog.len(),
            variables = self.model.model().num_variables(),
            constraints = self.model.model().num_constraints(),
            max_iterations,
            "Starting enumeration"
        );

        let termination = loop {
            if let Some(limit) = max_solutions {
                if records.len() >= limit {
                    break TerminationReason::SolutionLimit { limit };
                }
            }

            if let Some(limit) = max_duration {
                if Timestamp::now().duration_since(started_at) >= limit {
                    break TerminationReason::TimeLimit { limit };
                }
            }

            if iterations >= max_iterations {
                break TerminationReason::IterationLimit {
                    limit: max_iterations,
                };
            }

            iterations += 1;

            let (result, elapsed) = timer_debug!("Solve", solver.solve(self.model.model()));
            solve_time = solve_time.saturating_add(elapsed);

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(error) => break TerminationReason::SolverFailed { error },
            };

            if !outcome.is_optimal() {
                let status = outcome.status();
                break match target {
                    None => TerminationReason::NoFeasibleSolution { status },
                    Some(_) => TerminationReason::TiesExhausted { status },
                };
            }

            let values = outcome.values();
            let expected = self.model.model().num_variables();
            if values.len() != expected {
                break TerminationReason::InvalidAssignment {
                    error: AssignmentError::ValueCountMismatch {
                        expected,
                        actual: values.len(),
                    },
                };
            }

            let objective = self.model.model().objective_value(values);
            match target {
                None => {
                    info!(objective, "Found optimal objective");
                    target = Some(objective);
                }
                Some(optimum) if (objective - optimum).abs() > self.params.tie_tolerance => {
                    debug!(objective, optimum, "Objective no longer ties");
                    break TerminationReason::ObjectiveChanged { objective };
                }
                Some(_) => {}
            }

            let assignment = match self
                .model
                .extract_assignment(values, self.params.selection_threshold)
            {
                Ok(assignment) => assignment,
                Err(error) => break TerminationReason::InvalidAssignment { error },
            };

            if !accepted.insert(assignment) {
                break TerminationReason::InvalidAssignment {
                    error: AssignmentError::Repeated(assignment),
                };
            }

            let record = validate_assignment(
                &self.catalog,
                &self.run_params,
                self.model.big_m(),
                &assignment,
                objective,
            );

            debug!(
                iteration = iterations,
                destination = record.destination.as_str(),
                outbound = record.outbound.id.as_str(),
                return_trip = record.return_trip.id.as_str(),
                objective,
                "Accepted solution"
            );

            if let Some(callback) = self.on_solution.as_mut() {
                callback(&record);
            }

            records.push(record);
            self.model.exclude(&assignment);
        };

        let state = termination.state();
        let elapsed = Timestamp::now().duration_since(started_at);

        match state {
            EnumerationState::Failed => warn!(
                solutions = records.len(),
                iterations, "Enumeration failed: {}", termination
            ),
            _ => info!(
                solutions = records.len(),
                iterations, "Enumeration finished: {}", termination
            ),
        }

        EnumerationReport {
            state,
            termination,
            target,
            records,
            iterations,
            catalog_warnings: self.catalog.warnings().to_vec(),
            big_m: self.model.big_m(),
            elapsed,
            solve_time,
        }
    }
}
