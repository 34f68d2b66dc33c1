use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::ModelConfigError,
    problem::{run_params::RunParams, trip_catalog::TripCatalog},
};

/// Constant used by the classic formulation of the model.
pub const REFERENCE_BIG_M: f64 = 10_000.0;

/// Smallest multiple of the data scale that keeps every relaxed constraint
/// vacuous when its binaries are zero.
pub const MIN_SAFETY_FACTOR: f64 = 4.0;

pub const DEFAULT_SAFETY_FACTOR: f64 = 10.0;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BigMStrategy {
    Fixed { value: f64 },
    Derived { safety_factor: f64 },
}

impl Default for BigMStrategy {
    fn default() -> Self {
        BigMStrategy::Derived {
            safety_factor: DEFAULT_SAFETY_FACTOR,
        }
    }
}

impl BigMStrategy {
    pub fn resolve(&self, catalog: &TripCatalog, params: &RunParams) -> Result<f64, ModelConfigError> {
        let scale = data_scale(catalog, params);

        let big_m = match *self {
            BigMStrategy::Fixed { value } => {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ModelConfigError::InvalidBigM(value));
                }
                if value < MIN_SAFETY_FACTOR * scale {
                    warn!(
                        big_m = value,
                        scale, "Fixed big-M is small compared to the data, relaxed constraints may bind"
                    );
                }
                value
            }
            BigMStrategy::Derived { safety_factor } => {
                if !safety_factor.is_finite() || safety_factor < MIN_SAFETY_FACTOR {
                    return Err(ModelConfigError::SafetyFactorTooSmall {
                        actual: safety_factor,
                        minimum: MIN_SAFETY_FACTOR,
                    });
                }
                safety_factor * scale
            }
        };

        debug!(big_m, scale, "Resolved big-M");
        Ok(big_m)
    }
}

/// Largest magnitude appearing in any constraint of the model, at least 1.
pub fn data_scale(catalog: &TripCatalog, params: &RunParams) -> f64 {
    let trip_scale = catalog.trips_iter().fold(0.0_f64, |acc, trip| {
        acc.max(trip.departure_time().abs())
            .max(trip.arrival_time().abs())
            .max(trip.cost())
    });

    let stay_scale = catalog
        .destinations()
        .iter()
        .flat_map(|destination| {
            let bounds = destination.stay_bounds();
            [bounds.min_hours(), bounds.max_hours()]
        })
        .flatten()
        .fold(0.0_f64, f64::max);

    let window_scale = [
        params.outbound_window().start(),
        params.outbound_window().end(),
        params.return_window().start(),
        params.return_window().end(),
    ]
    .into_iter()
    .fold(0.0_f64, |acc, bound| acc.max(bound.abs()));

    trip_scale.max(stay_scale).max(window_scale).max(1.0)
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_derived_big_m() {
        let catalog = test_utils::single_destination_catalog(Some(48.0), Some(96.0));
        let params = RunParams::default();

        // Largest value is the 550 cost of either trip.
        assert_eq!(data_scale(&catalog, &params), 550.0);
        assert_eq!(
            BigMStrategy::default().resolve(&catalog, &params),
            Ok(5500.0)
        );
    }

    #[test]
    fn test_fixed_big_m() {
        let catalog = test_utils::single_destination_catalog(Some(48.0), Some(96.0));
        let params = RunParams::default();

        assert_eq!(
            BigMStrategy::Fixed {
                value: REFERENCE_BIG_M
            }
            .resolve(&catalog, &params),
            Ok(REFERENCE_BIG_M)
        );

        // Too small but still accepted, only logged.
        assert_eq!(
            BigMStrategy::Fixed { value: 100.0 }.resolve(&catalog, &params),
            Ok(100.0)
        );

        assert_eq!(
            BigMStrategy::Fixed { value: 0.0 }.resolve(&catalog, &params),
            Err(ModelConfigError::InvalidBigM(0.0))
        );
    }

    #[test]
    fn test_safety_factor_below_minimum() {
        let catalog = test_utils::single_destination_catalog(None, None);
        let params = RunParams::default();

        assert_eq!(
            BigMStrategy::Derived { safety_factor: 2.0 }.resolve(&catalog, &params),
            Err(ModelConfigError::SafetyFactorTooSmall {
                actual: 2.0,
                minimum: MIN_SAFETY_FACTOR
            })
        );
    }
}
