use serde::Serialize;

use crate::{
    define_index_newtype,
    problem::trip::{Direction, Trip, TripIdx},
};

define_index_newtype!(DestinationIdx, Destination);

/// Stay bounds as given in the input. A missing bound is resolved against the
/// model's big-M: `0` for the minimum and `M` for the maximum.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct StayBounds {
    min_hours: Option<f64>,
    max_hours: Option<f64>,
}

impl StayBounds {
    pub fn new(min_hours: Option<f64>, max_hours: Option<f64>) -> Self {
        StayBounds {
            min_hours,
            max_hours,
        }
    }

    pub fn min_hours(&self) -> Option<f64> {
        self.min_hours
    }

    pub fn max_hours(&self) -> Option<f64> {
        self.max_hours
    }

    pub fn resolved_min(&self) -> f64 {
        self.min_hours.unwrap_or(0.0)
    }

    pub fn resolved_max(&self, big_m: f64) -> f64 {
        self.max_hours.unwrap_or(big_m)
    }

    pub fn contains(&self, stay: f64, big_m: f64) -> bool {
        self.resolved_min() <= stay && stay <= self.resolved_max(big_m)
    }
}

pub struct Destination {
    external_id: String,
    utility: f64,
    difficulty: f64,
    stay_bounds: StayBounds,
    outbound_trips: Vec<Trip>,
    return_trips: Vec<Trip>,
}

impl Destination {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn utility(&self) -> f64 {
        self.utility
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// Objective coefficient of this destination: `U - alpha * D`.
    #[inline]
    pub fn weighted_utility(&self, alpha: f64) -> f64 {
        self.utility - alpha * self.difficulty
    }

    pub fn stay_bounds(&self) -> &StayBounds {
        &self.stay_bounds
    }

    pub fn outbound_trips(&self) -> &[Trip] {
        &self.outbound_trips
    }

    pub fn return_trips(&self) -> &[Trip] {
        &self.return_trips
    }

    pub fn trips(&self, direction: Direction) -> &[Trip] {
        match direction {
            Direction::Outbound => &self.outbound_trips,
            Direction::Return => &self.return_trips,
        }
    }

    pub fn outbound_trip(&self, index: TripIdx) -> &Trip {
        &self.outbound_trips[index]
    }

    pub fn return_trip(&self, index: TripIdx) -> &Trip {
        &self.return_trips[index]
    }

    /// A destination without trips in either direction can never be picked.
    pub fn is_selectable(&self) -> bool {
        !self.outbound_trips.is_empty() && !self.return_trips.is_empty()
    }

    pub fn trip_pairs(&self) -> usize {
        self.outbound_trips.len() * self.return_trips.len()
    }
}

#[derive(Default)]
pub struct DestinationBuilder {
    external_id: Option<String>,
    utility: Option<f64>,
    difficulty: Option<f64>,
    min_stay_hours: Option<f64>,
    max_stay_hours: Option<f64>,
    outbound_trips: Vec<Trip>,
    return_trips: Vec<Trip>,
}

impl DestinationBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut DestinationBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_utility(&mut self, utility: f64) -> &mut DestinationBuilder {
        self.utility = Some(utility);
        self
    }

    pub fn set_difficulty(&mut self, difficulty: f64) -> &mut DestinationBuilder {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn set_min_stay_hours(&mut self, hours: f64) -> &mut DestinationBuilder {
        self.min_stay_hours = Some(hours);
        self
    }

    pub fn set_max_stay_hours(&mut self, hours: f64) -> &mut DestinationBuilder {
        self.max_stay_hours = Some(hours);
        self
    }

    pub fn add_trip(&mut self, direction: Direction, trip: Trip) -> &mut DestinationBuilder {
        match direction {
            Direction::Outbound => self.outbound_trips.push(trip),
            Direction::Return => self.return_trips.push(trip),
        }
        self
    }

    pub fn add_outbound_trip(&mut self, trip: Trip) -> &mut DestinationBuilder {
        self.add_trip(Direction::Outbound, trip)
    }

    pub fn add_return_trip(&mut self, trip: Trip) -> &mut DestinationBuilder {
        self.add_trip(Direction::Return, trip)
    }

    pub fn build(self) -> Destination {
        Destination {
            external_id: self.external_id.expect("Expected destination id"),
            utility: self.utility.unwrap_or(0.0),
            difficulty: self.difficulty.unwrap_or(0.0),
            stay_bounds: StayBounds::new(self.min_stay_hours, self.max_stay_hours),
            outbound_trips: self.outbound_trips,
            return_trips: self.return_trips,
        }
    }
}
