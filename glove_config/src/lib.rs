#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the glove runtime.
//!
//! `Config` and sub-structs are deserialized from TOML and validated.
//! Every section has defaults, so an empty file is a valid config.
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
}

/// Control-loop and actuation timing.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Timing {
    /// Control-loop iterations per second
    pub loop_hz: u32,
    /// Cooldown timer tick rate
    pub tick_hz: u32,
    /// Motor pulse length in milliseconds
    pub pulse_ms: u64,
    /// Filter warm-up iterations before telemetry and actuation
    pub stabilize_iters: u16,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            loop_hz: 100,
            tick_hz: 122,
            pulse_ms: 500,
            stabilize_iters: 255,
        }
    }
}

/// Session defaults applied before the host says otherwise.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Session {
    /// Resistance level 1 (hardest) through 5 (easiest)
    pub default_level: u8,
}

impl Default for Session {
    fn default() -> Self {
        Self { default_level: 5 }
    }
}

/// Parameters of the simulated hand used when no real glove is wired.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Sim {
    /// Full flex-extend cycle length in milliseconds
    pub flex_period_ms: u64,
    /// Peak deviation from the midpoint in raw counts
    pub amplitude: u16,
    /// Resting reading in raw counts
    pub midpoint: u16,
}

impl Default for Sim {
    fn default() -> Self {
        Self {
            flex_period_ms: 4000,
            amplitude: 200,
            midpoint: 512,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub timing: Timing,
    pub session: Session,
    pub sim: Sim,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Timing
        if self.timing.loop_hz == 0 {
            eyre::bail!("timing.loop_hz must be > 0");
        }
        if self.timing.loop_hz > 10_000 {
            eyre::bail!("timing.loop_hz is unreasonably large (>10kHz)");
        }
        if self.timing.tick_hz == 0 {
            eyre::bail!("timing.tick_hz must be > 0");
        }
        if self.timing.pulse_ms == 0 {
            eyre::bail!("timing.pulse_ms must be >= 1");
        }
        if self.timing.pulse_ms > 60_000 {
            eyre::bail!("timing.pulse_ms is unreasonably large (>1min)");
        }

        // Session
        if !(1..=5).contains(&self.session.default_level) {
            eyre::bail!("session.default_level must be in [1, 5]");
        }

        // Sim
        if self.sim.flex_period_ms == 0 {
            eyre::bail!("sim.flex_period_ms must be >= 1");
        }
        if self.sim.midpoint > 0x03FF {
            eyre::bail!("sim.midpoint must fit 10 bits");
        }
        if u32::from(self.sim.midpoint) + u32::from(self.sim.amplitude) > 0x03FF {
            eyre::bail!("sim.midpoint + sim.amplitude must fit 10 bits");
        }
        if self.sim.amplitude > self.sim.midpoint {
            eyre::bail!("sim.amplitude must not exceed sim.midpoint");
        }

        Ok(())
    }
}
