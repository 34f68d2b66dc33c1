use clap::Args;
use itinera_optimizer::{
    error::RunParamsError,
    problem::run_params::{RunParams, TimeWindow},
};

/// Run parameters, each with an environment fallback.
#[derive(Args, Debug)]
pub struct RunParamsArgs {
    /// Weight of the destination difficulty in `U - alpha * D`
    #[arg(long, env = "ITINERA_ALPHA", default_value_t = 1.0)]
    alpha: f64,

    /// Maximum total ticket cost
    #[arg(long, env = "ITINERA_BUDGET", default_value_t = 1200.0)]
    budget: f64,

    /// Earliest outbound departure, in hours
    #[arg(long, env = "ITINERA_OUT_START", default_value_t = 0.0)]
    out_start: f64,

    /// Latest outbound departure, in hours (at most 24)
    #[arg(long, env = "ITINERA_OUT_END", default_value_t = 24.0)]
    out_end: f64,

    /// Earliest return departure, in hours
    #[arg(long, env = "ITINERA_RET_START", default_value_t = 72.0)]
    ret_start: f64,

    /// Latest return departure, in hours (at most 168)
    #[arg(long, env = "ITINERA_RET_END", default_value_t = 120.0)]
    ret_end: f64,
}

impl RunParamsArgs {
    pub fn to_run_params(&self) -> Result<RunParams, RunParamsError> {
        RunParams::new(
            self.alpha,
            self.budget,
            TimeWindow::new(self.out_start, self.out_end),
            TimeWindow::new(self.ret_start, self.ret_end),
        )
    }
}
