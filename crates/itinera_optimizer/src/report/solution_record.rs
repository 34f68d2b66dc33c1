use std::fmt;

use serde::Serialize;

use crate::{model::decision_assignment::DecisionAssignment, problem::trip::Trip};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TripChoice {
    pub id: String,
    pub departure_time: f64,
    pub arrival_time: f64,
    pub cost: f64,
}

impl From<&Trip> for TripChoice {
    fn from(trip: &Trip) -> Self {
        TripChoice {
            id: trip.external_id().to_owned(),
            departure_time: trip.departure_time(),
            arrival_time: trip.arrival_time(),
            cost: trip.cost(),
        }
    }
}

/// A record whose flags are false came from a solve the model accepted, so the
/// mismatch is a numeric artifact of the relaxation. It is reported, never
/// corrected or dropped.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    BudgetExceeded {
        total_cost: f64,
        budget: f64,
    },
    StayOutOfBounds {
        stay_hours: f64,
        min_hours: f64,
        max_hours: f64,
    },
    ObjectiveMismatch {
        objective: f64,
        expected: f64,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::BudgetExceeded { total_cost, budget } => {
                write!(f, "total cost {total_cost} exceeds budget {budget}")
            }
            ValidationWarning::StayOutOfBounds {
                stay_hours,
                min_hours,
                max_hours,
            } => write!(
                f,
                "stay of {stay_hours}h is outside [{min_hours}h, {max_hours}h]"
            ),
            ValidationWarning::ObjectiveMismatch {
                objective,
                expected,
            } => write!(
                f,
                "solver objective {objective} differs from U - alpha * D = {expected}"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolutionRecord {
    pub destination: String,
    pub outbound: TripChoice,
    #[serde(rename = "return")]
    pub return_trip: TripChoice,
    pub total_cost: f64,
    pub stay_hours: f64,
    pub objective: f64,
    pub cost_ok: bool,
    pub stay_ok: bool,
    pub warnings: Vec<ValidationWarning>,
    #[serde(skip)]
    pub assignment: DecisionAssignment,
}

impl SolutionRecord {
    pub fn is_compliant(&self) -> bool {
        self.cost_ok && self.stay_ok
    }
}
