//! Replays over a logged series for comparison against the raw log.
//!
//! Two distinct models live here and must stay distinct:
//! - [`replay_plant`] is a crude first-order plant driven by an unscaled,
//!   unclamped PI law;
//! - [`controller_trace`] runs the real step engine over the logged samples.

use crate::advisor::GainSuggestion;
use crate::config::TraceCfg;
use crate::engine::{self, ActingDirection, ControllerState, StepInputs, StepResult};
use crate::series::LogSeries;

/// Plant response per unit of controller effort per step.
pub const PLANT_GAIN: f64 = 0.1;

/// Simulated feedback under `gains`, one value per logged sample.
///
/// Starts at the first logged feedback; value `i + 1` is produced from
/// setpoint `i`. The integral here is neither scaled per minute nor clamped.
pub fn replay_plant(gains: &GainSuggestion, series: &LogSeries) -> Vec<f64> {
    let n = series.len();
    let mut out = Vec::with_capacity(n);
    let mut sim = series.first().feedback;
    let mut integral = 0.0;
    out.push(sim);
    for s in series.iter().take(n - 1) {
        let e = s.setpoint - sim;
        let p = gains.kp * e;
        integral += gains.ki * e;
        sim += PLANT_GAIN * (p + integral);
        out.push(sim);
    }
    out
}

/// Controller output the suggested gains would have commanded for the logged
/// feedback: direct acting, integral starting from 0, trace limits from `cfg`.
///
/// The setpoint is held at the first sample's value for every step.
pub fn controller_trace(
    gains: &GainSuggestion,
    series: &LogSeries,
    cfg: &TraceCfg,
) -> Vec<StepResult> {
    let mut state = ControllerState::new(0.0);
    let setpoint = series.first().setpoint;
    series
        .iter()
        .map(|s| {
            let inputs = StepInputs {
                feedback: s.feedback,
                setpoint,
                kp: gains.kp,
                ki: gains.ki,
                imax: cfg.imax,
                istartup: 0.0,
                ilimit: cfg.ilimit,
                acting: ActingDirection::Direct,
            };
            engine::step(&mut state, &inputs)
        })
        .collect()
}
