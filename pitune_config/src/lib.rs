#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas, log CSV parsing and the preset catalog for the PI tuner.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated
//!   separately via `Config::validate`.
//! - The log CSV loader locates the `Time,Feedback,Setpoint` columns by name
//!   and parses timestamps with the configured formats.
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

pub mod presets;

pub use presets::{Preset, builtin_presets};

/// Controller acting direction as written in TOML ("direct" | "reverse").
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Acting {
    Direct,
    #[default]
    Reverse,
}

impl std::str::FromStr for Acting {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "da" => Ok(Acting::Direct),
            "reverse" | "ra" => Ok(Acting::Reverse),
            other => eyre::bail!("unknown acting direction '{other}' (expected direct|reverse)"),
        }
    }
}

/// Default step inputs used by `step` and `session` when no flag overrides them.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ControllerCfg {
    pub kp: f64,
    /// Integral gain, per minute
    pub ki: f64,
    /// Max integral rate of change, per minute
    pub imax: f64,
    /// Startup (reset) value of the integral term
    pub istartup: f64,
    /// Max integral magnitude
    pub ilimit: f64,
    pub acting: Acting,
}

impl Default for ControllerCfg {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.1,
            imax: 10.0,
            istartup: 0.0,
            ilimit: 100.0,
            acting: Acting::Reverse,
        }
    }
}

/// Limits used when replaying the controller over a logged series.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AdvisorCfg {
    /// Integral clamp for the controller-output trace
    pub trace_ilimit: f64,
    /// Integral rate limit (per minute) for the trace; `inf` disables it
    pub trace_imax: f64,
}

impl Default for AdvisorCfg {
    fn default() -> Self {
        Self {
            trace_ilimit: 100.0,
            trace_imax: f64::INFINITY,
        }
    }
}

/// Timestamp formats accepted in the `Time` column, tried in order.
/// RFC 3339 is always tried after these.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogFormat {
    pub time_formats: Vec<String>,
}

/// Default `Time` column format, e.g. `8/10/2025 14:20`.
pub const DEFAULT_TIME_FORMAT: &str = "%m/%d/%Y %H:%M";

impl Default for LogFormat {
    fn default() -> Self {
        Self {
            time_formats: vec![
                DEFAULT_TIME_FORMAT.to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub controller: ControllerCfg,
    pub advisor: AdvisorCfg,
    pub log_format: LogFormat,
    pub logging: Logging,
    /// User presets; a name matching a built-in preset replaces it.
    pub presets: Vec<Preset>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    /// Built-in presets merged with the user's, sorted by name.
    pub fn presets(&self) -> Vec<Preset> {
        let mut out: Vec<Preset> = builtin_presets()
            .into_iter()
            .filter(|b| {
                !self
                    .presets
                    .iter()
                    .any(|u| u.name.eq_ignore_ascii_case(&b.name))
            })
            .collect();
        out.extend(self.presets.iter().cloned());
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Case-insensitive preset lookup; user presets shadow built-ins.
    pub fn preset(&self, name: &str) -> Option<Preset> {
        let name = name.trim();
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
            .or_else(|| presets::find_builtin(name))
    }

    pub fn validate(&self) -> eyre::Result<()> {
        // Controller
        let c = &self.controller;
        check_gains("controller", c.kp, c.ki, c.istartup)?;
        check_limit("controller.imax", c.imax)?;
        check_limit("controller.ilimit", c.ilimit)?;

        // Advisor
        check_limit("advisor.trace_ilimit", self.advisor.trace_ilimit)?;
        check_limit("advisor.trace_imax", self.advisor.trace_imax)?;
        if self.advisor.trace_ilimit.is_infinite() {
            eyre::bail!("advisor.trace_ilimit must be finite");
        }

        // Log format
        if self.log_format.time_formats.is_empty() {
            eyre::bail!("log_format.time_formats must list at least one format");
        }
        if self.log_format.time_formats.iter().any(|f| f.trim().is_empty()) {
            eyre::bail!("log_format.time_formats must not contain empty formats");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got '{rot}'");
        }

        // Presets
        for (i, p) in self.presets.iter().enumerate() {
            if p.name.trim().is_empty() {
                eyre::bail!("presets[{i}].name must not be empty");
            }
            let ctx = format!("presets[{i}] ({})", p.name);
            check_gains(&ctx, p.kp, p.ki, p.istartup)?;
            check_limit(&format!("{ctx}.imax"), p.imax)?;
            check_limit(&format!("{ctx}.ilimit"), p.ilimit)?;
        }

        Ok(())
    }
}

fn check_gains(ctx: &str, kp: f64, ki: f64, istartup: f64) -> eyre::Result<()> {
    if !kp.is_finite() {
        eyre::bail!("{ctx}.kp must be finite");
    }
    if !ki.is_finite() {
        eyre::bail!("{ctx}.ki must be finite");
    }
    if !istartup.is_finite() {
        eyre::bail!("{ctx}.istartup must be finite");
    }
    Ok(())
}

// Limits are magnitudes: NaN and negatives are rejected rather than coerced.
fn check_limit(field: &str, v: f64) -> eyre::Result<()> {
    if v.is_nan() || v < 0.0 {
        eyre::bail!("{field} must be >= 0");
    }
    Ok(())
}

/// One parsed row of a process log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    /// 1-based line number in the source file (header is line 1)
    pub line: usize,
    pub time: NaiveDateTime,
    pub feedback: f64,
    pub setpoint: f64,
}

/// Column names every process log must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Time", "Feedback", "Setpoint"];

/// Parse a timestamp with the given formats, then RFC 3339.
pub fn parse_time(s: &str, fmt: &LogFormat) -> Option<NaiveDateTime> {
    let s = s.trim();
    fmt.time_formats
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|t| t.naive_utc()))
}

/// Read a process log (`Time,Feedback,Setpoint`, any column order, extra
/// columns ignored) from any reader.
pub fn read_log_csv<R: std::io::Read>(reader: R, fmt: &LogFormat) -> eyre::Result<Vec<LogRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read log CSV headers: {e}"))?
        .clone();
    let idx: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|name| headers.iter().position(|h| h == *name))
        .collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .zip(&idx)
        .filter(|(_, i)| i.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        eyre::bail!(
            "missing required columns: {} (found: {})",
            missing.join(", "),
            headers.iter().collect::<Vec<_>>().join(",")
        );
    }
    let (ti, fi, si) = match idx.as_slice() {
        [Some(t), Some(f), Some(s)] => (*t, *f, *s),
        _ => eyre::bail!("missing required columns"),
    };

    let mut rows = Vec::new();
    for (n, rec) in rdr.records().enumerate() {
        let line = n + 2;
        let rec = rec.map_err(|e| eyre::eyre!("invalid CSV row {line}: {e}"))?;
        let field = |i: usize| rec.get(i).unwrap_or("");

        let time_s = field(ti);
        let time = parse_time(time_s, fmt).ok_or_else(|| {
            eyre::eyre!("invalid CSV row {line}: unparseable timestamp '{time_s}'")
        })?;
        let feedback = parse_number(field(fi), "Feedback", line)?;
        let setpoint = parse_number(field(si), "Setpoint", line)?;
        rows.push(LogRow {
            line,
            time,
            feedback,
            setpoint,
        });
    }
    Ok(rows)
}

fn parse_number(s: &str, column: &str, line: usize) -> eyre::Result<f64> {
    s.parse::<f64>()
        .map_err(|e| eyre::eyre!("invalid CSV row {line}: {column} '{s}' is not a number ({e})"))
}

pub fn load_log_csv(path: &std::path::Path, fmt: &LogFormat) -> eyre::Result<Vec<LogRow>> {
    let file =
        std::fs::File::open(path).map_err(|e| eyre::eyre!("open log CSV {:?}: {}", path, e))?;
    read_log_csv(file, fmt)
}

/// Starter log rows: time, feedback, setpoint.
pub const TEMPLATE_ROWS: [(&str, f64, f64); 3] = [
    ("8/10/2025 14:20", 22.0, 24.0),
    ("8/10/2025 14:21", 22.1, 24.0),
    ("8/10/2025 14:22", 22.3, 24.0),
];

/// Render the starter log CSV.
pub fn log_template_csv() -> eyre::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(REQUIRED_COLUMNS)?;
    for (time, fb, sp) in TEMPLATE_ROWS {
        wtr.write_record([time.to_string(), format!("{fb:.1}"), format!("{sp:.1}")])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| eyre::eyre!("flush template CSV: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}
