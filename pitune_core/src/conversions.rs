//! `From` implementations bridging `pitune_config` types to `pitune_core` types,
//! plus the log loading entry points that turn loader failures into
//! `TuneError::InvalidInput`.

use std::path::Path;

use crate::config::{ControllerCfg, TraceCfg};
use crate::engine::ActingDirection;
use crate::error::{Result, TuneError};
use crate::series::{LogSample, LogSeries};

// ── ActingDirection ──────────────────────────────────────────────────────────

impl From<pitune_config::Acting> for ActingDirection {
    fn from(a: pitune_config::Acting) -> Self {
        match a {
            pitune_config::Acting::Direct => ActingDirection::Direct,
            pitune_config::Acting::Reverse => ActingDirection::Reverse,
        }
    }
}

// ── ControllerCfg ────────────────────────────────────────────────────────────

impl From<&pitune_config::ControllerCfg> for ControllerCfg {
    fn from(c: &pitune_config::ControllerCfg) -> Self {
        Self {
            kp: c.kp,
            ki: c.ki,
            imax: c.imax,
            istartup: c.istartup,
            ilimit: c.ilimit,
            acting: c.acting.into(),
        }
    }
}

impl From<&pitune_config::Preset> for ControllerCfg {
    fn from(p: &pitune_config::Preset) -> Self {
        Self {
            kp: p.kp,
            ki: p.ki,
            imax: p.imax,
            istartup: p.istartup,
            ilimit: p.ilimit,
            acting: p.acting.into(),
        }
    }
}

// ── TraceCfg ─────────────────────────────────────────────────────────────────

impl From<&pitune_config::AdvisorCfg> for TraceCfg {
    fn from(c: &pitune_config::AdvisorCfg) -> Self {
        Self {
            ilimit: c.trace_ilimit,
            imax: c.trace_imax,
        }
    }
}

// ── LogSeries ────────────────────────────────────────────────────────────────

impl From<&pitune_config::LogRow> for LogSample {
    fn from(r: &pitune_config::LogRow) -> Self {
        Self {
            time: r.time,
            feedback: r.feedback,
            setpoint: r.setpoint,
        }
    }
}

impl TryFrom<Vec<pitune_config::LogRow>> for LogSeries {
    type Error = eyre::Report;

    fn try_from(rows: Vec<pitune_config::LogRow>) -> Result<Self> {
        LogSeries::new(rows.iter().map(LogSample::from).collect())
    }
}

/// Load and validate a process log file.
pub fn load_series(path: &Path, fmt: &pitune_config::LogFormat) -> Result<LogSeries> {
    let rows =
        pitune_config::load_log_csv(path, fmt).map_err(|e| TuneError::invalid(e.to_string()))?;
    LogSeries::try_from(rows)
}

/// Read and validate a process log from any reader.
pub fn read_series<R: std::io::Read>(
    reader: R,
    fmt: &pitune_config::LogFormat,
) -> Result<LogSeries> {
    let rows =
        pitune_config::read_log_csv(reader, fmt).map_err(|e| TuneError::invalid(e.to_string()))?;
    LogSeries::try_from(rows)
}
