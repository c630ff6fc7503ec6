#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! PI controller simulation and tuning advice.
//!
//! ## Architecture
//!
//! - **Engine**: one PI tick with rate and value anti-windup (`engine` module)
//! - **Session**: the single integral carried across ticks (`session` module)
//! - **Series**: validated, time-ordered process logs (`series` module)
//! - **Advisor**: heuristic Kp/Ki suggestion from a log (`advisor` module)
//! - **Replay**: plant and controller replays over a log (`replay` module)
//! - **Advisory**: banded operator advice (`advisory` module)
//! - **Configuration**: runtime config structs (`config` module), mapped from
//!   `pitune_config` in `conversions`
//!
//! Everything here is synchronous and allocation-light; file parsing happens
//! in `pitune_config` and reaches the core as a `LogSeries`.

pub mod advisor;
pub mod advisory;
pub mod config;
pub mod conversions;
pub mod engine;
pub mod error;
pub mod replay;
pub mod series;
pub mod session;
pub mod util;

pub use advisor::{Analysis, GainSuggestion, SeriesStats, analyze, suggest};
pub use advisory::{Advisory, Severity, classify};
pub use config::{ControllerCfg, TraceCfg};
pub use conversions::{load_series, read_series};
pub use engine::{ActingDirection, ControllerState, StepInputs, StepResult, step};
pub use error::TuneError;
pub use replay::{controller_trace, replay_plant};
pub use series::{LogSample, LogSeries};
pub use session::PiSession;
