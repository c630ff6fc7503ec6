//! Heuristic gain suggestion from a logged series.
//!
//! This is not system identification. It measures how much the error moves
//! per unit of feedback movement and uses that ratio as a rough proportional
//! sensitivity; Ki is a fixed fraction of Kp. No convergence or stability
//! guarantee is implied.

use crate::advisory::{Advisory, classify};
use crate::series::LogSeries;
use crate::util::{mean, mean_abs_delta, round_dp};

/// Guard added to the feedback delta so a flat feedback trace does not divide by zero.
pub const EPSILON: f64 = 1e-6;
/// Integral is assumed to respond about this many times slower than proportional.
pub const KI_RATIO: f64 = 10.0;

/// Summary statistics of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub mean_abs_feedback_delta: f64,
    pub mean_abs_error_delta: f64,
    /// Mean of `|setpoint - feedback|`
    pub mean_abs_error: f64,
}

impl SeriesStats {
    pub fn of(series: &LogSeries) -> Self {
        Self {
            mean_abs_feedback_delta: mean_abs_delta(series.feedback()),
            mean_abs_error_delta: mean_abs_delta(series.errors()),
            mean_abs_error: mean(series.errors().map(f64::abs)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainSuggestion {
    pub kp: f64,
    /// per minute
    pub ki: f64,
}

impl GainSuggestion {
    /// `kp` rounded to 2 places, `ki = kp / 10` rounded to 3.
    pub fn from_stats(stats: &SeriesStats) -> Self {
        let kp = round_dp(
            stats.mean_abs_error_delta / (stats.mean_abs_feedback_delta + EPSILON),
            2,
        );
        let ki = round_dp(kp / KI_RATIO, 3);
        Self { kp, ki }
    }
}

/// Suggest starting gains for `series`. Pure: equal series give equal gains.
pub fn suggest(series: &LogSeries) -> GainSuggestion {
    GainSuggestion::from_stats(&SeriesStats::of(series))
}

/// Everything a front end shows for one uploaded log.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub stats: SeriesStats,
    pub suggestion: GainSuggestion,
    pub advisories: Vec<Advisory>,
}

pub fn analyze(series: &LogSeries) -> Analysis {
    let stats = SeriesStats::of(series);
    let suggestion = GainSuggestion::from_stats(&stats);
    let advisories = classify(stats.mean_abs_error, suggestion.kp, suggestion.ki);
    tracing::debug!(
        samples = series.len(),
        mean_abs_feedback_delta = stats.mean_abs_feedback_delta,
        mean_abs_error_delta = stats.mean_abs_error_delta,
        mean_abs_error = stats.mean_abs_error,
        kp = suggestion.kp,
        ki = suggestion.ki,
        "series analyzed"
    );
    Analysis {
        stats,
        suggestion,
        advisories,
    }
}
