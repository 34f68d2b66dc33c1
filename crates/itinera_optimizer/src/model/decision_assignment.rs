use serde::Serialize;
use thiserror::Error;

use crate::problem::{destination::DestinationIdx, trip::TripIdx};

/// One destination with one of its outbound trips and one of its return trips.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DecisionAssignment {
    destination: DestinationIdx,
    outbound: TripIdx,
    return_trip: TripIdx,
}

impl DecisionAssignment {
    pub fn new(destination: DestinationIdx, outbound: TripIdx, return_trip: TripIdx) -> Self {
        DecisionAssignment {
            destination,
            outbound,
            return_trip,
        }
    }

    pub fn destination(&self) -> DestinationIdx {
        self.destination
    }

    pub fn outbound(&self) -> TripIdx {
        self.outbound
    }

    pub fn return_trip(&self) -> TripIdx {
        self.return_trip
    }
}

/// A solver returned values that do not decode to a single itinerary.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum AssignmentError {
    #[error("expected {expected} variable values, got {actual}")]
    ValueCountMismatch { expected: usize, actual: usize },
    #[error("no destination is selected")]
    NoDestination,
    #[error("{0} destinations are selected")]
    MultipleDestinations(usize),
    #[error("{count} outbound trips are selected for the chosen destination")]
    OutboundCount { count: usize },
    #[error("{count} return trips are selected for the chosen destination")]
    ReturnCount { count: usize },
    #[error("a trip of unselected destination {destination} is selected")]
    StrayTripSelection { destination: DestinationIdx },
    #[error("assignment {0:?} was already accepted")]
    Repeated(DecisionAssignment),
}
