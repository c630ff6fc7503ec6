//! Subcommand implementations. Each writes its results to `out`.

use std::io::{BufRead, Write};
use std::path::Path;

use eyre::WrapErr;
use pitune_config::Config;
use pitune_core::error::TuneError;
use pitune_core::{
    ActingDirection, ControllerCfg, PiSession, StepResult, TraceCfg, analyze, controller_trace,
    load_series, replay_plant,
};
use serde_json::json;

use crate::cli::{ActingArg, GainArgs};

impl From<ActingArg> for ActingDirection {
    fn from(a: ActingArg) -> Self {
        match a {
            ActingArg::Direct => ActingDirection::Direct,
            ActingArg::Reverse => ActingDirection::Reverse,
        }
    }
}

/// `[controller]`, then the preset, then explicit flags.
pub fn resolve_controller(cfg: &Config, gains: &GainArgs) -> eyre::Result<ControllerCfg> {
    let mut c = match gains.preset.as_deref() {
        Some(name) => {
            let preset = cfg
                .preset(name)
                .ok_or_else(|| TuneError::Config(format!("unknown preset '{name}'")))?;
            tracing::info!(preset = %preset.name, "using preset");
            ControllerCfg::from(&preset)
        }
        None => ControllerCfg::from(&cfg.controller),
    };
    if let Some(v) = gains.kp {
        c.kp = v;
    }
    if let Some(v) = gains.ki {
        c.ki = v;
    }
    if let Some(v) = gains.imax {
        c.imax = v;
    }
    if let Some(v) = gains.istartup {
        c.istartup = v;
    }
    if let Some(v) = gains.ilimit {
        c.ilimit = v;
    }
    if let Some(a) = gains.acting {
        c.acting = a.into();
    }
    Ok(c)
}

fn step_record(tick: u64, feedback: f64, setpoint: f64, r: &StepResult) -> serde_json::Value {
    json!({
        "tick": tick,
        "feedback": feedback,
        "setpoint": setpoint,
        "error": r.error,
        "proportional": r.proportional,
        "integral_increment": r.integral_increment,
        "integral": r.integral,
        "output": r.output,
    })
}

fn write_step(
    out: &mut impl Write,
    json: bool,
    tick: u64,
    feedback: f64,
    setpoint: f64,
    r: &StepResult,
) -> eyre::Result<()> {
    if json {
        writeln!(out, "{}", step_record(tick, feedback, setpoint, r))?;
    } else {
        writeln!(
            out,
            "tick={tick} error={:.4} p={:.4} di={:.6} i={:.4} output={:.4}",
            r.error, r.proportional, r.integral_increment, r.integral, r.output
        )?;
    }
    Ok(())
}

/// `pitune step`: run `ticks` ticks with fixed inputs.
pub fn run_step(
    out: &mut impl Write,
    json: bool,
    ctrl: &ControllerCfg,
    (feedback, setpoint): (f64, f64),
    integral: Option<f64>,
    ticks: u32,
) -> eyre::Result<()> {
    let mut session = match integral {
        Some(i) => PiSession::with_integral(ctrl.istartup, i)?,
        None => PiSession::new(ctrl.istartup),
    };
    let inputs = ctrl.inputs(feedback, setpoint);
    for _ in 0..ticks {
        let r = session.step(&inputs)?;
        write_step(out, json, session.steps(), feedback, setpoint, &r)?;
    }
    Ok(())
}

/// One parsed `session` line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionLine {
    Step { feedback: f64, setpoint: f64 },
    Reset,
    Set { key: String, value: String },
}

/// Parse a `session` line; `None` for blank lines and `#` comments.
pub fn parse_session_line(line: &str) -> eyre::Result<Option<SessionLine>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();
    match fields.as_slice() {
        ["reset"] => Ok(Some(SessionLine::Reset)),
        ["set", key, value] => Ok(Some(SessionLine::Set {
            key: key.to_ascii_lowercase(),
            value: (*value).to_string(),
        })),
        [fb, sp] => {
            let num = |name: &str, s: &str| {
                s.parse::<f64>().map_err(|_| {
                    eyre::Report::new(TuneError::InvalidInput(format!(
                        "{name} '{s}' is not a number"
                    )))
                })
            };
            Ok(Some(SessionLine::Step {
                feedback: num("feedback", fb)?,
                setpoint: num("setpoint", sp)?,
            }))
        }
        _ => Err(eyre::Report::new(TuneError::InvalidInput(format!(
            "expected '<feedback> <setpoint>', 'reset' or 'set <key> <value>', got '{line}'"
        )))),
    }
}

/// Apply `set key value`; the updated settings must pass step validation.
pub fn apply_setting(ctrl: &ControllerCfg, key: &str, value: &str) -> eyre::Result<ControllerCfg> {
    let mut next = ctrl.clone();
    if key == "acting" {
        let acting: pitune_config::Acting = value
            .parse()
            .map_err(|e: eyre::Report| TuneError::InvalidInput(e.to_string()))?;
        next.acting = acting.into();
        return Ok(next);
    }
    let v: f64 = value.parse().map_err(|_| {
        TuneError::InvalidInput(format!("{key} value '{value}' is not a number"))
    })?;
    match key {
        "kp" => next.kp = v,
        "ki" => next.ki = v,
        "imax" => next.imax = v,
        "istartup" | "stup" => next.istartup = v,
        "ilimit" => next.ilimit = v,
        other => {
            return Err(eyre::Report::new(TuneError::InvalidInput(format!(
                "unknown setting '{other}' (expected kp, ki, imax, istartup, ilimit, acting)"
            ))));
        }
    }
    next.inputs(0.0, 0.0).validate()?;
    Ok(next)
}

/// `pitune session`: one persistent integral driven by stdin lines.
///
/// Bad lines are reported and skipped; the run fails at the end if any were.
pub fn run_session(
    input: impl BufRead,
    out: &mut impl Write,
    json: bool,
    mut ctrl: ControllerCfg,
) -> eyre::Result<()> {
    let mut session = PiSession::new(ctrl.istartup);
    let mut rejected = 0usize;
    for (idx, line) in input.lines().enumerate() {
        let line = line.wrap_err("read session input")?;
        let lineno = idx + 1;
        let outcome = parse_session_line(&line).and_then(|parsed| match parsed {
            None => Ok(()),
            Some(SessionLine::Reset) => {
                session.reset_to(ctrl.istartup);
                tracing::info!(line = lineno, istartup = ctrl.istartup, "session reset");
                if json {
                    writeln!(out, "{}", json!({ "event": "reset", "integral": session.integral() }))?;
                } else {
                    writeln!(out, "reset integral={:.4}", session.integral())?;
                }
                Ok(())
            }
            Some(SessionLine::Set { key, value }) => {
                ctrl = apply_setting(&ctrl, &key, &value)?;
                tracing::info!(line = lineno, %key, %value, "setting changed");
                Ok(())
            }
            Some(SessionLine::Step { feedback, setpoint }) => {
                let r = session.step(&ctrl.inputs(feedback, setpoint))?;
                write_step(out, json, session.steps(), feedback, setpoint, &r)
            }
        });
        if let Err(e) = outcome {
            rejected += 1;
            tracing::warn!(line = lineno, error = %e, "session line rejected");
            if json {
                writeln!(out, "{}", json!({ "event": "rejected", "line": lineno, "message": e.to_string() }))?;
            } else {
                writeln!(out, "line {lineno}: {e}")?;
            }
        }
    }
    if rejected > 0 {
        return Err(eyre::Report::new(TuneError::InvalidInput(format!(
            "{rejected} session line(s) rejected"
        ))));
    }
    Ok(())
}

/// `pitune suggest`: analyze a log and optionally write the replay CSV.
pub fn run_suggest(
    out: &mut impl Write,
    json: bool,
    cfg: &Config,
    log: &Path,
    replay_out: Option<&Path>,
) -> eyre::Result<()> {
    let series = load_series(log, &cfg.log_format)?;
    let analysis = analyze(&series);
    tracing::info!(
        samples = series.len(),
        kp = analysis.suggestion.kp,
        ki = analysis.suggestion.ki,
        "suggestion ready"
    );
    for a in &analysis.advisories {
        if a.severity() == pitune_core::Severity::Warning {
            tracing::warn!(code = a.code(), "{}", a.message());
        }
    }

    if let Some(path) = replay_out {
        let trace_cfg = TraceCfg::from(&cfg.advisor);
        write_replay(path, &series, &analysis.suggestion, &trace_cfg)?;
        tracing::info!(path = %path.display(), rows = series.len(), "replay written");
    }

    if json {
        let advisories: Vec<_> = analysis
            .advisories
            .iter()
            .map(|a| json!({ "code": a.code(), "severity": a.severity().as_str(), "message": a.message() }))
            .collect();
        let obj = json!({
            "samples": series.len(),
            "stats": {
                "mean_abs_feedback_delta": analysis.stats.mean_abs_feedback_delta,
                "mean_abs_error_delta": analysis.stats.mean_abs_error_delta,
                "mean_abs_error": analysis.stats.mean_abs_error,
            },
            "suggestion": { "kp": analysis.suggestion.kp, "ki": analysis.suggestion.ki },
            "advisories": advisories,
        });
        writeln!(out, "{obj}")?;
    } else {
        writeln!(out, "Samples: {}", series.len())?;
        writeln!(
            out,
            "Mean |dFeedback|: {:.4}",
            analysis.stats.mean_abs_feedback_delta
        )?;
        writeln!(out, "Mean |dError|: {:.4}", analysis.stats.mean_abs_error_delta)?;
        writeln!(out, "Average error: {:.4}", analysis.stats.mean_abs_error)?;
        writeln!(out, "Suggested Kp: {}", analysis.suggestion.kp)?;
        writeln!(out, "Suggested Ki: {}", analysis.suggestion.ki)?;
        for a in &analysis.advisories {
            writeln!(out, "[{}] {}", a.severity().as_str(), a.message())?;
        }
    }
    Ok(())
}

/// Header of the replay CSV written by `suggest --replay-out`.
pub const REPLAY_COLUMNS: [&str; 5] = [
    "Time",
    "Feedback",
    "Setpoint",
    "Simulated",
    "ControllerOutput",
];

fn write_replay(
    path: &Path,
    series: &pitune_core::LogSeries,
    gains: &pitune_core::GainSuggestion,
    trace_cfg: &TraceCfg,
) -> eyre::Result<()> {
    let simulated = replay_plant(gains, series);
    let trace = controller_trace(gains, series, trace_cfg);
    let mut wtr = csv::Writer::from_path(path)
        .wrap_err_with(|| format!("create replay CSV {}", path.display()))?;
    wtr.write_record(REPLAY_COLUMNS)?;
    for ((s, sim), t) in series.iter().zip(&simulated).zip(&trace) {
        wtr.write_record([
            s.time.format("%Y-%m-%d %H:%M:%S").to_string(),
            s.feedback.to_string(),
            s.setpoint.to_string(),
            sim.to_string(),
            t.output.to_string(),
        ])?;
    }
    wtr.flush().wrap_err("flush replay CSV")?;
    Ok(())
}

/// `pitune presets`
pub fn run_presets(out: &mut impl Write, json: bool, cfg: &Config) -> eyre::Result<()> {
    let presets = cfg.presets();
    if json {
        for p in &presets {
            let acting = ActingDirection::from(p.acting);
            writeln!(
                out,
                "{}",
                json!({
                    "name": p.name, "kp": p.kp, "ki": p.ki, "imax": p.imax,
                    "istartup": p.istartup, "ilimit": p.ilimit, "acting": acting.as_str(),
                })
            )?;
        }
        return Ok(());
    }
    writeln!(
        out,
        "{:<24} {:>6} {:>6} {:>6} {:>8} {:>6}  acting",
        "name", "kp", "ki", "imax", "istartup", "ilimit"
    )?;
    for p in &presets {
        writeln!(
            out,
            "{:<24} {:>6} {:>6} {:>6} {:>8} {:>6}  {}",
            p.name,
            p.kp,
            p.ki,
            p.imax,
            p.istartup,
            p.ilimit,
            ActingDirection::from(p.acting)
        )?;
    }
    Ok(())
}

/// `pitune template`
pub fn run_template(out: &mut impl Write, dest: Option<&Path>) -> eyre::Result<()> {
    let csv = pitune_config::log_template_csv()?;
    match dest {
        Some(path) => {
            std::fs::write(path, &csv)
                .wrap_err_with(|| format!("write template {}", path.display()))?;
            tracing::info!(path = %path.display(), "template written");
        }
        None => write!(out, "{csv}")?,
    }
    Ok(())
}
