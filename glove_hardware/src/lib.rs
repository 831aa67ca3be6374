//! Simulated glove peripherals.
//!
//! The real device talks to a 14-channel ADC over SPI and a 5-channel
//! brushed-motor driver; neither exists on a development host, so this
//! crate provides deterministic stand-ins wired to the same traits.
//! The serial wire and the periodic timer live in [`wire`] as
//! background threads that invoke the core's handler entry points.

pub mod error;
pub mod wire;

pub use error::HwError;

use std::sync::{Arc, Mutex, PoisonError};

use glove_traits::{Adc, Direction, MOTOR_COUNT, MotorChannel, MotorDriver, Potentiometer};

/// Simulated 10-bit ADC. Each finger's joints follow a shared integer
/// triangle wave around `midpoint`, phase-shifted per finger so the
/// fingers do not move in lockstep. Motor-current channels read the
/// midpoint.
pub struct SimulatedAdc {
    midpoint: u16,
    amplitude: u16,
    /// Steps for a full flex-extend cycle.
    period: u32,
    step: u32,
    /// Channel forced to fail, for exercising the skip path.
    fail_channel: Option<Potentiometer>,
}

impl SimulatedAdc {
    pub fn new(midpoint: u16, amplitude: u16, period: u32) -> Self {
        Self {
            midpoint,
            amplitude,
            period: period.max(2),
            step: 0,
            fail_channel: None,
        }
    }

    /// Force one channel to error on every read.
    pub fn fail_channel(mut self, channel: Potentiometer) -> Self {
        self.fail_channel = Some(channel);
        self
    }

    /// Triangle deviation from the midpoint at `step`, in raw counts.
    fn wave(&self, step: u32) -> i32 {
        let half = self.period / 2;
        let pos = step % self.period;
        let ramp = if pos < half { pos } else { self.period - pos };
        let amp = i64::from(self.amplitude);
        let value = amp * 2 * i64::from(ramp) / i64::from(half.max(1)) - amp;
        value as i32
    }
}

impl Adc for SimulatedAdc {
    fn read_pot(
        &mut self,
        channel: Potentiometer,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_channel == Some(channel) {
            return Err(Box::new(HwError::AdcUnavailable(channel.index() as u8)));
        }
        // One wave step per full sweep of the channels.
        if channel.index() == 0 {
            self.step = self.step.wrapping_add(1);
        }
        let phase = (channel.index() / 3) as u32 * (self.period / 5);
        let raw = i32::from(self.midpoint) + self.wave(self.step.wrapping_add(phase));
        Ok(raw.clamp(0, 0x03FF) as u16)
    }

    fn read_motor_current(
        &mut self,
        _channel: MotorChannel,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.midpoint)
    }
}

/// Last commanded value for one motor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorCmd {
    pub duty: u8,
    pub phase: Direction,
}

impl Default for MotorCmd {
    fn default() -> Self {
        Self {
            duty: 0,
            phase: Direction::Forward,
        }
    }
}

/// Simulated motor driver. Commands are recorded behind a shared
/// handle so a test or the CLI can inspect them after the driver moves
/// into the control loop.
#[derive(Default)]
pub struct SimulatedMotorDriver {
    state: Arc<Mutex<MotorBank>>,
}

#[derive(Debug, Default)]
struct MotorBank {
    cmds: [MotorCmd; MOTOR_COUNT],
    enabled: bool,
}

impl SimulatedMotorDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> MotorView {
        MotorView {
            state: Arc::clone(&self.state),
        }
    }
}

/// Read-only window onto a [`SimulatedMotorDriver`]'s recorded state.
#[derive(Clone)]
pub struct MotorView {
    state: Arc<Mutex<MotorBank>>,
}

impl MotorView {
    pub fn cmd(&self, motor: MotorChannel) -> MotorCmd {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cmds[motor.index()]
    }

    pub fn enabled(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .enabled
    }
}

impl MotorDriver for SimulatedMotorDriver {
    fn set_duty(
        &mut self,
        motor: MotorChannel,
        duty: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::trace!(motor = motor.index(), duty, "sim duty");
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cmds[motor.index()]
            .duty = duty;
        Ok(())
    }

    fn set_phase(
        &mut self,
        motor: MotorChannel,
        direction: Direction,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::trace!(motor = motor.index(), ?direction, "sim phase");
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cmds[motor.index()]
            .phase = direction;
        Ok(())
    }

    fn set_enable(
        &mut self,
        enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(enabled, "sim driver stage");
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .enabled = enabled;
        Ok(())
    }
}
