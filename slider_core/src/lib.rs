#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core virtual-slider logic (hardware-agnostic).
//!
//! Turns the distance between two tracked fingertips into discrete volume
//! up/down pulses for a host that only accepts relative key presses and never
//! reports its current volume. All I/O goes through `slider_traits::SignalSource`
//! and `slider_traits::Actuator`.
//!
//! ## Architecture
//!
//! - **Mapping**: distance to percent, clamped (`mapping`)
//! - **Quantization**: percent snapped onto the step grid (`quantize`)
//! - **Control**: believed-volume state machine with two policies (`controller`)
//! - **Calibration**: saturate the host to establish a known state (`calibration`)
//! - **Pipeline**: one tick per frame (`pipeline::SliderCore`, `Slider`)
//! - **Runner**: paced loop with shutdown and stats (`runner`)
//!
//! Believed volume is always a multiple of the step size in `[0, ceiling]`,
//! where `ceiling = 100 - 100 % step`.

pub mod builder;
pub mod calibration;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod feedback;
pub mod hw_error;
pub mod mapping;
pub mod mocks;
pub mod pipeline;
pub mod quantize;
pub mod runner;
pub mod status;
pub mod util;

pub use builder::{Missing, Set, Slider, SliderBuilder, build_slider};
pub use calibration::Calibrator;
pub use config::{
    CalibrationCfg, CalibrationTarget, ControlCfg, MappingCfg, Policy, RunnerCfg,
    TriggerThresholds,
};
pub use controller::{SliderController, SliderState};
pub use error::{BuildError, Report, Result, SliderError};
pub use feedback::{NullRenderer, Renderer, Snapshot};
pub use mapping::{DistanceMapper, map_distance};
pub use pipeline::SliderCore;
pub use quantize::{ceiling, quantize};
pub use runner::{LatencyStats, RunSummary, StopReason, run};
pub use status::{ActuationCommand, TickStatus};
