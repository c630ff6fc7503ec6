//! Logged process samples.

use chrono::NaiveDateTime;

use crate::error::{Result, TuneError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogSample {
    pub time: NaiveDateTime,
    pub feedback: f64,
    pub setpoint: f64,
}

impl LogSample {
    /// `setpoint - feedback`, the sign used by the advisor.
    #[inline]
    pub fn error(&self) -> f64 {
        self.setpoint - self.feedback
    }
}

/// A validated, time-ordered series of at least two samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSeries {
    samples: Vec<LogSample>,
}

/// Fewest samples that yield a consecutive-pair statistic.
pub const MIN_SAMPLES: usize = 2;

impl LogSeries {
    /// Rejects fewer than two samples, non-finite values, and time going
    /// backwards. Equal consecutive timestamps are accepted.
    pub fn new(samples: Vec<LogSample>) -> Result<Self> {
        if samples.len() < MIN_SAMPLES {
            return Err(TuneError::invalid(format!(
                "log series needs at least {MIN_SAMPLES} samples, got {}",
                samples.len()
            )));
        }
        for (i, s) in samples.iter().enumerate() {
            if !s.feedback.is_finite() {
                return Err(TuneError::invalid(format!(
                    "sample {}: feedback is not finite",
                    i + 1
                )));
            }
            if !s.setpoint.is_finite() {
                return Err(TuneError::invalid(format!(
                    "sample {}: setpoint is not finite",
                    i + 1
                )));
            }
        }
        if let Some(i) = samples.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(TuneError::invalid(format!(
                "sample {}: time {} is earlier than the previous sample",
                i + 2,
                samples[i + 1].time
            )));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[LogSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> &LogSample {
        // Construction guarantees at least MIN_SAMPLES entries.
        &self.samples[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogSample> {
        self.samples.iter()
    }

    pub fn feedback(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.feedback)
    }

    pub fn errors(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(LogSample::error)
    }
}

impl<'a> IntoIterator for &'a LogSeries {
    type Item = &'a LogSample;
    type IntoIter = std::slice::Iter<'a, LogSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
