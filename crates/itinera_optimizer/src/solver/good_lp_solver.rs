use std::{
    sync::mpsc::{self, RecvTimeoutError},
    thread,
};

use good_lp::{
    Expression, ResolutionError, Solution, SolverModel, Variable, default_solver, variable,
    variables,
};
use jiff::SignedDuration;
use tracing::{debug, warn};

use crate::{
    model::mip_model::{ConstraintSense, MipModel, VariableIdx},
    solver::solver_adapter::{SolveOutcome, SolverAdapter, SolverError},
};

/// Solves models with the pure-Rust `microlp` backend of `good_lp`.
#[derive(Clone, Debug, Default)]
pub struct GoodLpSolver {
    timeout: Option<SignedDuration>,
}

impl GoodLpSolver {
    pub fn new() -> Self {
        GoodLpSolver::default()
    }

    /// Each solve runs on a worker thread over a snapshot of the model and is
    /// abandoned once `timeout` elapses. The worker is detached, not killed.
    pub fn with_timeout(timeout: SignedDuration) -> Self {
        GoodLpSolver {
            timeout: Some(timeout),
        }
    }
}

impl SolverAdapter for GoodLpSolver {
    fn solve(&mut self, model: &MipModel) -> Result<SolveOutcome, SolverError> {
        let Some(timeout) = self.timeout else {
            return solve_model(model);
        };

        let snapshot = model.clone();
        let (sender, receiver) = mpsc::channel();

        thread::Builder::new()
            .name("itinera-solve".to_owned())
            .spawn(move || {
                // The receiver is gone when the solve timed out.
                let _ = sender.send(solve_model(&snapshot));
            })
            .map_err(|err| SolverError::Backend(err.to_string()))?;

        match receiver.recv_timeout(timeout.unsigned_abs()) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!("Solve exceeded {:#}, abandoning worker", timeout);
                Err(SolverError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(SolverError::WorkerLost),
        }
    }

    fn name(&self) -> &str {
        "good_lp/microlp"
    }
}

fn to_expression(terms: &[(VariableIdx, f64)], variables: &[Variable]) -> Expression {
    let mut expression = Expression::with_capacity(terms.len());
    for &(variable, coefficient) in terms {
        expression.add_mul(coefficient, variables[variable.get()]);
    }
    expression
}

fn solve_model(model: &MipModel) -> Result<SolveOutcome, SolverError> {
    let mut vars = variables!();

    let handles = model
        .variables()
        .iter()
        .map(|var| vars.add(variable().binary().name(var.name())))
        .collect::<Vec<_>>();

    let mut problem = vars
        .maximise(to_expression(model.objective(), &handles))
        .using(default_solver);

    for constraint in model.constraints() {
        let lhs = to_expression(constraint.terms(), &handles);
        problem = problem.with(match constraint.sense() {
            ConstraintSense::LessOrEqual => lhs.leq(constraint.rhs()),
            ConstraintSense::GreaterOrEqual => lhs.geq(constraint.rhs()),
            ConstraintSense::Equal => lhs.eq(constraint.rhs()),
        });
    }

    match problem.solve() {
        Ok(solution) => Ok(SolveOutcome::optimal(
            handles.iter().map(|&var| solution.value(var)).collect(),
        )),
        Err(ResolutionError::Infeasible) => {
            debug!("Model is infeasible");
            Ok(SolveOutcome::infeasible())
        }
        Err(ResolutionError::Unbounded) => Ok(SolveOutcome::unbounded()),
        Err(err) => Err(SolverError::Backend(err.to_string())),
    }
}
