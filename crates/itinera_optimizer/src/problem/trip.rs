use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

define_index_newtype!(TripIdx, Trip);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outbound,
    Return,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => write!(f, "outbound"),
            Direction::Return => write!(f, "return"),
        }
    }
}

/// A single train/flight option. Times are hours on the run's shared timeline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trip {
    external_id: String,
    departure_time: f64,
    arrival_time: f64,
    cost: f64,
}

impl Trip {
    pub fn new(
        external_id: impl Into<String>,
        departure_time: f64,
        arrival_time: f64,
        cost: f64,
    ) -> Self {
        Trip {
            external_id: external_id.into(),
            departure_time,
            arrival_time,
            cost,
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    #[inline]
    pub fn departure_time(&self) -> f64 {
        self.departure_time
    }

    #[inline]
    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn departs_before_arrival(&self) -> bool {
        self.departure_time < self.arrival_time
    }
}

/// Hours spent at the destination between the two legs.
#[inline]
pub fn stay_duration(outbound: &Trip, return_trip: &Trip) -> f64 {
    return_trip.departure_time() - outbound.arrival_time()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stay_duration() {
        let outbound = Trip::new("SH_G1", 8.0, 12.5, 550.0);
        let return_trip = Trip::new("SH_G8", 82.0, 86.5, 550.0);

        assert_eq!(stay_duration(&outbound, &return_trip), 69.5);
    }

    #[test]
    fn test_departs_before_arrival() {
        assert!(Trip::new("a", 8.0, 9.0, 1.0).departs_before_arrival());
        assert!(!Trip::new("b", 9.0, 9.0, 1.0).departs_before_arrival());
    }
}
