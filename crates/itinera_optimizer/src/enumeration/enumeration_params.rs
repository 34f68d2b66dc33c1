use jiff::SignedDuration;
use serde::Serialize;

use crate::{error::ModelConfigError, problem::big_m::BigMStrategy};

/// Two objective values closer than this are the same optimum.
pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-5;

/// Binary values strictly above this count as selected.
pub const DEFAULT_SELECTION_THRESHOLD: f64 = 0.9;

#[derive(Clone, Debug, Serialize)]
pub struct EnumerationParams {
    pub tie_tolerance: f64,
    pub selection_threshold: f64,
    pub big_m: BigMStrategy,
    pub terminations: Vec<Termination>,
}

/// Extra stopping conditions on top of the natural end of the enumeration.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Wall-clock budget for the whole run, checked between solves.
    Duration(SignedDuration),
    /// Stop cleanly once this many tied solutions were accepted.
    MaxSolutions(usize),
    /// Tighter solve limit than the one implied by the catalog size.
    /// Hitting it fails the run.
    MaxIterations(usize),
}

impl Default for EnumerationParams {
    fn default() -> Self {
        Self {
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
            selection_threshold: DEFAULT_SELECTION_THRESHOLD,
            big_m: BigMStrategy::default(),
            terminations: vec![],
        }
    }
}

impl EnumerationParams {
    pub fn validate(&self) -> Result<(), ModelConfigError> {
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err(ModelConfigError::InvalidTieTolerance(self.tie_tolerance));
        }

        // NaN fails both comparisons.
        if !(self.selection_threshold > 0.0 && self.selection_threshold < 1.0) {
            return Err(ModelConfigError::InvalidSelectionThreshold(
                self.selection_threshold,
            ));
        }

        Ok(())
    }

    pub fn max_duration(&self) -> Option<SignedDuration> {
        self.terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::Duration(duration) => Some(*duration),
                _ => None,
            })
            .min()
    }

    pub fn max_solutions(&self) -> Option<usize> {
        self.terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::MaxSolutions(count) => Some(*count),
                _ => None,
            })
            .min()
    }

    pub fn max_iterations(&self) -> Option<usize> {
        self.terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::MaxIterations(count) => Some(*count),
                _ => None,
            })
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tightest_termination_wins() {
        let params = EnumerationParams {
            terminations: vec![
                Termination::MaxSolutions(10),
                Termination::Duration(SignedDuration::from_secs(60)),
                Termination::MaxSolutions(3),
                Termination::Duration(SignedDuration::from_secs(5)),
            ],
            ..EnumerationParams::default()
        };

        assert_eq!(params.max_solutions(), Some(3));
        assert_eq!(params.max_duration(), Some(SignedDuration::from_secs(5)));
        assert_eq!(EnumerationParams::default().max_solutions(), None);
        assert_eq!(EnumerationParams::default().max_iterations(), None);
    }

    #[test]
    fn test_validate_tolerances() {
        assert_eq!(EnumerationParams::default().validate(), Ok(()));

        let negative_tolerance = EnumerationParams {
            tie_tolerance: -1e-5,
            ..EnumerationParams::default()
        };
        assert_eq!(
            negative_tolerance.validate(),
            Err(ModelConfigError::InvalidTieTolerance(-1e-5))
        );

        for threshold in [0.0, 1.0, 1.5, -0.2] {
            let params = EnumerationParams {
                selection_threshold: threshold,
                ..EnumerationParams::default()
            };
            assert_eq!(
                params.validate(),
                Err(ModelConfigError::InvalidSelectionThreshold(threshold))
            );
        }

        let nan_threshold = EnumerationParams {
            selection_threshold: f64::NAN,
            ..EnumerationParams::default()
        };
        assert!(matches!(
            nan_threshold.validate(),
            Err(ModelConfigError::InvalidSelectionThreshold(_))
        ));
    }
}
