#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Control core of the motorized hand-rehabilitation glove
//! (hardware-agnostic).
//!
//! All hardware interactions go through the `glove_traits::Adc` and
//! `glove_traits::MotorDriver` traits; the serial peripheral and the
//! periodic timer are represented by handler entry points that the
//! platform layer invokes from its interrupt (or simulation-thread)
//! context.
//!
//! ## Architecture
//!
//! - **Queueing**: bounded wraparound byte queue (`ring` module)
//! - **Transport**: interrupt-driven full-duplex serial pipes (`serial`)
//! - **Filtering**: fixed-point EMA + flexion detection (`filter`)
//! - **Actuation**: per-motor pulse scheduler with tick cooldowns
//!   (`scheduler`)
//! - **Protocol**: host command parsing and telemetry framing
//!   (`protocol`)
//! - **Loop**: one-iteration-at-a-time control engine (`runner`)
//!
//! ## Fixed-Point Arithmetic
//!
//! Sensor smoothing operates on 10-bit readings left-shifted by
//! [`filter::FILTER_SHIFT`] using `i32` intermediates for deterministic
//! behavior; there is no floating point anywhere in the control path.

pub mod config;
pub mod conversions;
pub mod error;
pub mod filter;
pub mod mocks;
pub mod protocol;
pub mod ring;
pub mod runner;
pub mod scheduler;
pub mod serial;
pub mod session;
pub mod sync;
pub mod util;

pub use config::TimingCfg;
pub use error::{BuildError, GloveError, Result};
pub use filter::{FILTER_SHIFT, FlexionTrend, PotSnapshot, SignalFilter, flexion};
pub use protocol::{Command, CommandParser, ResistanceLevel, TelemetryDecoder, TelemetryFrame};
pub use ring::{RingQueue, SERIAL_QUEUE_CAPACITY};
pub use runner::{GloveBuilder, GloveCore};
pub use scheduler::{ActuationScheduler, FaultHandle, MotorState, TickHandle};
pub use serial::SerialTransport;
pub use session::ExerciseSession;
