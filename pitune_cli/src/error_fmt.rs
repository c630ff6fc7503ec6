//! Human-readable error descriptions and structured JSON error formatting.

use pitune_core::error::TuneError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(te) = err.downcast_ref::<TuneError>() {
        return match te {
            TuneError::InvalidInput(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("open log csv") {
                    format!(
                        "What happened: The log file could not be opened ({msg}).\nLikely causes: Wrong path or missing read permission.\nHow to fix: Check the --log path."
                    )
                } else if lower.contains("missing required columns") {
                    format!(
                        "What happened: The log CSV is missing columns ({msg}).\nLikely causes: Wrong export settings or a renamed header.\nHow to fix: The header must contain 'Time', 'Feedback' and 'Setpoint'. Run `pitune template` for a sample."
                    )
                } else if lower.contains("at least 2 samples") {
                    format!(
                        "What happened: Not enough data to analyze ({msg}).\nLikely causes: Empty export or only a header line.\nHow to fix: Log at least two rows of Time,Feedback,Setpoint."
                    )
                } else if lower.contains("timestamp") {
                    format!(
                        "What happened: A timestamp could not be parsed ({msg}).\nLikely causes: The log uses a date format not listed in [log_format].time_formats.\nHow to fix: Add the format (chrono strftime syntax) to the config, e.g. \"%d.%m.%Y %H:%M\"."
                    )
                } else {
                    format!(
                        "What happened: The input was rejected ({msg}).\nLikely causes: Non-numeric or non-finite values, a negative limit, or time going backwards.\nHow to fix: Correct the value and rerun."
                    )
                }
            }
            TuneError::Config(msg) => {
                if msg.contains("unknown preset") {
                    format!(
                        "What happened: {msg}.\nLikely causes: Typo in --preset.\nHow to fix: Run `pitune presets` to list the available names."
                    )
                } else {
                    format!(
                        "What happened: Invalid configuration ({msg}).\nLikely causes: Malformed TOML or out-of-range values.\nHow to fix: Edit the config file, then rerun. See README for a sample."
                    )
                }
            }
        };
    }

    // String-based heuristics for errors that never got a type
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("replay csv") {
        return format!(
            "What happened: The replay CSV could not be written ({msg}).\nHow to fix: Check that the --replay-out directory exists and is writable."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 invalid input, 4 invalid configuration, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<TuneError>() {
        Some(TuneError::InvalidInput(_)) => 3,
        Some(TuneError::Config(_)) => 4,
        None => 1,
    }
}

/// Stable `reason` name for structured output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<TuneError>() {
        Some(TuneError::InvalidInput(_)) => "InvalidInput",
        Some(TuneError::Config(_)) => "Config",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let detail = match err.downcast_ref::<TuneError>() {
        Some(TuneError::InvalidInput(m) | TuneError::Config(m)) => Some(m.as_str()),
        None => None,
    };
    let obj = if let Some(d) = detail {
        json!({ "reason": reason_name(err), "details": d, "message": humanize(err) })
    } else {
        json!({ "reason": reason_name(err), "message": humanize(err) })
    };
    obj.to_string()
}
