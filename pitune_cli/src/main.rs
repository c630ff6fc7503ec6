mod cli;
mod commands;
mod error_fmt;

use std::path::Path;

use clap::Parser;
use eyre::{WrapErr, eyre};
use pitune_config::Config;
use pitune_core::error::TuneError;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(&cli.log_level, cli.json, &cfg.logging)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.cmd {
        Commands::Step {
            fb,
            sp,
            gains,
            integral,
            ticks,
        } => {
            let ctrl = commands::resolve_controller(&cfg, &gains)?;
            commands::run_step(&mut out, cli.json, &ctrl, (fb, sp), integral, ticks)
        }
        Commands::Session { gains } => {
            let ctrl = commands::resolve_controller(&cfg, &gains)?;
            let stdin = std::io::stdin();
            commands::run_session(stdin.lock(), &mut out, cli.json, ctrl)
        }
        Commands::Suggest { log, replay_out } => {
            commands::run_suggest(&mut out, cli.json, &cfg, &log, replay_out.as_deref())
        }
        Commands::Presets => commands::run_presets(&mut out, cli.json, &cfg),
        Commands::Template { out: dest } => commands::run_template(&mut out, dest.as_deref()),
    }
}

/// Explicit `--config`, else `./pitune.toml` when present, else defaults.
fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    let path = match path {
        Some(p) => p,
        None if Path::new(DEFAULT_CONFIG).is_file() => Path::new(DEFAULT_CONFIG),
        None => return Ok(Config::default()),
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| TuneError::Config(format!("read {}: {e}", path.display())))?;
    let cfg = pitune_config::load_toml(&text)
        .map_err(|e| TuneError::Config(format!("parse {}: {e}", path.display())))?;
    cfg.validate()
        .map_err(|e| TuneError::Config(e.to_string()))?;
    Ok(cfg)
}

/// Console layer on stderr (pretty or JSON), plus an optional JSON file layer.
fn init_tracing(level: &str, json: bool, logging: &pitune_config::Logging) -> eyre::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid --log-level '{level}'"))?;
    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = match logging.file.as_deref() {
        Some(file) => {
            let p = Path::new(file);
            let dir = p
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = p
                .file_name()
                .ok_or_else(|| TuneError::Config(format!("logging.file '{file}' has no file name")))?;
            let appender = match logging.rotation.as_deref().unwrap_or("never") {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let file_filter = EnvFilter::try_new(logging.level.as_deref().unwrap_or("info"))
                .map_err(|e| TuneError::Config(format!("logging.level: {e}")))?;
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(file_filter),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console.with_filter(console_filter))
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre!("init tracing: {e}"))?;
    tracing::debug!(json, "tracing initialized");
    Ok(())
}
