use serde::Serialize;

use crate::error::RunParamsError;

/// Latest allowed end of the outbound window, in hours.
pub const MAX_OUTBOUND_WINDOW_END: f64 = 24.0;

/// Latest allowed end of the return window, in hours.
pub const MAX_RETURN_WINDOW_END: f64 = 168.0;

/// Closed interval of departure hours.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        TimeWindow { start, end }
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }

    fn is_within(&self, max_end: f64) -> bool {
        0.0 <= self.start && self.start < self.end && self.end <= max_end
    }
}

/// Parameters of a single enumeration run, validated on construction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct RunParams {
    alpha: f64,
    budget: f64,
    outbound_window: TimeWindow,
    return_window: TimeWindow,
}

impl RunParams {
    pub fn new(
        alpha: f64,
        budget: f64,
        outbound_window: TimeWindow,
        return_window: TimeWindow,
    ) -> Result<Self, RunParamsError> {
        for (value, name) in [
            (alpha, "alpha"),
            (budget, "budget"),
            (outbound_window.start, "outbound window start"),
            (outbound_window.end, "outbound window end"),
            (return_window.start, "return window start"),
            (return_window.end, "return window end"),
        ] {
            if !value.is_finite() {
                return Err(RunParamsError::NonFinite(name));
            }
        }

        if alpha < 0.0 {
            return Err(RunParamsError::NegativeAlpha(alpha));
        }

        if budget <= 0.0 {
            return Err(RunParamsError::NonPositiveBudget(budget));
        }

        if !outbound_window.is_within(MAX_OUTBOUND_WINDOW_END) {
            return Err(RunParamsError::InvalidOutboundWindow {
                start: outbound_window.start,
                end: outbound_window.end,
            });
        }

        if !return_window.is_within(MAX_RETURN_WINDOW_END) {
            return Err(RunParamsError::InvalidReturnWindow {
                start: return_window.start,
                end: return_window.end,
            });
        }

        Ok(RunParams {
            alpha,
            budget,
            outbound_window,
            return_window,
        })
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn outbound_window(&self) -> &TimeWindow {
        &self.outbound_window
    }

    pub fn return_window(&self) -> &TimeWindow {
        &self.return_window
    }
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            alpha: 1.0,
            budget: 1200.0,
            outbound_window: TimeWindow::new(0.0, 24.0),
            return_window: TimeWindow::new(72.0, 120.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let default = RunParams::default();
        let validated = RunParams::new(
            default.alpha(),
            default.budget(),
            *default.outbound_window(),
            *default.return_window(),
        );

        assert_eq!(validated, Ok(default));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let out = TimeWindow::new(0.0, 24.0);
        let ret = TimeWindow::new(72.0, 120.0);

        assert_eq!(
            RunParams::new(-0.5, 1200.0, out, ret),
            Err(RunParamsError::NegativeAlpha(-0.5))
        );
        assert_eq!(
            RunParams::new(1.0, 0.0, out, ret),
            Err(RunParamsError::NonPositiveBudget(0.0))
        );
        assert_eq!(
            RunParams::new(1.0, f64::NAN, out, ret),
            Err(RunParamsError::NonFinite("budget"))
        );
        assert_eq!(
            RunParams::new(1.0, 1200.0, TimeWindow::new(10.0, 10.0), ret),
            Err(RunParamsError::InvalidOutboundWindow {
                start: 10.0,
                end: 10.0
            })
        );
        assert_eq!(
            RunParams::new(1.0, 1200.0, TimeWindow::new(0.0, 25.0), ret),
            Err(RunParamsError::InvalidOutboundWindow {
                start: 0.0,
                end: 25.0
            })
        );
        assert_eq!(
            RunParams::new(1.0, 1200.0, out, TimeWindow::new(72.0, 170.0)),
            Err(RunParamsError::InvalidReturnWindow {
                start: 72.0,
                end: 170.0
            })
        );
    }

    #[test]
    fn test_alpha_zero_is_allowed() {
        let params = RunParams::new(
            0.0,
            1.0,
            TimeWindow::new(0.0, 24.0),
            TimeWindow::new(0.0, 168.0),
        );
        assert!(params.is_ok());
    }

    #[test]
    fn test_window_contains_bounds() {
        let window = TimeWindow::new(72.0, 120.0);
        assert!(window.contains(72.0));
        assert!(window.contains(120.0));
        assert!(!window.contains(120.5));
    }
}
