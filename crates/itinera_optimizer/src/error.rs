use serde::Serialize;
use thiserror::Error;

use crate::problem::trip::Direction;

/// Input errors. Any of these aborts a run before the first solve.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset at `{path}`: {message}")]
    Malformed { path: String, message: String },
    #[error("dataset contains no destinations")]
    NoDestinations,
    #[error("destination `{0}` is listed more than once")]
    DuplicateDestination(String),
    #[error("`{section}` contains the key `{key}` more than once")]
    DuplicateKey { section: &'static str, key: String },
    #[error("missing `params` entry for destination `{0}`")]
    MissingParams(String),
    #[error("missing {direction} trips entry for destination `{destination}`")]
    MissingTrips {
        destination: String,
        direction: Direction,
    },
    #[error("duplicate {direction} trip `{trip}` for destination `{destination}`")]
    DuplicateTrip {
        destination: String,
        direction: Direction,
        trip: String,
    },
    #[error("{direction} trip `{trip}` of `{destination}` has a negative cost ({cost})")]
    NegativeCost {
        destination: String,
        direction: Direction,
        trip: String,
        cost: f64,
    },
    #[error("destination `{destination}` has a negative stay bound ({hours}h)")]
    NegativeStay { destination: String, hours: f64 },
    #[error("destination `{destination}` has min stay {min}h greater than max stay {max}h")]
    InvertedStayBounds {
        destination: String,
        min: f64,
        max: f64,
    },
    #[error("`{field}` of `{owner}` is not a finite number")]
    NonFinite { owner: String, field: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum RunParamsError {
    #[error("alpha must be non-negative (got {0})")]
    NegativeAlpha(f64),
    #[error("budget must be positive (got {0})")]
    NonPositiveBudget(f64),
    #[error("outbound window must satisfy 0 <= start < end <= 24 (got {start}..{end})")]
    InvalidOutboundWindow { start: f64, end: f64 },
    #[error("return window must satisfy 0 <= start < end <= 168 (got {start}..{end})")]
    InvalidReturnWindow { start: f64, end: f64 },
    #[error("`{0}` is not a finite number")]
    NonFinite(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum ModelConfigError {
    #[error("big-M must be a positive finite number (got {0})")]
    InvalidBigM(f64),
    #[error("big-M safety factor must be at least {minimum} (got {actual})")]
    SafetyFactorTooSmall { actual: f64, minimum: f64 },
    #[error("tie tolerance must be a non-negative finite number (got {0})")]
    InvalidTieTolerance(f64),
    #[error("selection threshold must lie strictly between 0 and 1 (got {0})")]
    InvalidSelectionThreshold(f64),
}

/// Errors that prevent an enumeration run from starting.
#[derive(Debug, Error)]
pub enum ItineraryError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    RunParams(#[from] RunParamsError),
    #[error(transparent)]
    ModelConfig(#[from] ModelConfigError),
}
