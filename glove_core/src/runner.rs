//! Control loop tying sensors, filters, scheduling and the host link
//! together, plus the builder that assembles it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use glove_traits::clock::{Clock, MonotonicClock};
use glove_traits::{Adc, Finger, MotorChannel, MotorDriver, POT_COUNT, Potentiometer};
use tracing::{error, info, trace, warn};

use crate::config::TimingCfg;
use crate::error::{BuildError, Result, hw_report};
use crate::filter::{SignalFilter, flexion};
use crate::protocol::{CommandParser, encode_motor_fault, encode_reading};
use crate::scheduler::{ActuationScheduler, FaultHandle, TickHandle};
use crate::serial::SerialTransport;
use crate::session::ExerciseSession;

/// Number of telemetry frames emitted per control cycle. Channels are
/// visited round-robin, so a full sweep of all 14 potentiometers takes
/// seven cycles.
const READINGS_PER_CYCLE: usize = 2;

/// The glove control loop. Owns the peripherals; handler ends of the
/// transport, tick timer and fault lines are cloned out to whatever
/// drives them.
pub struct GloveCore<A: Adc, M: MotorDriver> {
    adc: A,
    motors: M,
    transport: SerialTransport,
    filter: SignalFilter,
    scheduler: ActuationScheduler,
    session: ExerciseSession,
    parser: CommandParser,
    clock: Arc<dyn Clock + Send + Sync>,
    period_us: u64,
    stabilize_remaining: u16,
    telemetry_cursor: usize,
}

impl<A: Adc, M: MotorDriver> GloveCore<A, M> {
    pub fn builder() -> GloveBuilder<A, M> {
        GloveBuilder::default()
    }

    /// Host-link endpoint; clones share the same queues.
    pub fn transport(&self) -> SerialTransport {
        self.transport.clone()
    }

    pub fn session(&self) -> &ExerciseSession {
        &self.session
    }

    /// Handle for the cooldown tick source.
    pub fn tick_handle(&self) -> TickHandle {
        self.scheduler.tick_handle()
    }

    /// Handle for the hardware fault lines.
    pub fn fault_handle(&self) -> FaultHandle {
        self.scheduler.fault_handle()
    }

    /// Observable state of one motor.
    pub fn motor_state(&self, motor: MotorChannel) -> crate::scheduler::MotorState {
        self.scheduler.state(motor)
    }

    /// One control cycle: faults, commands, sampling, telemetry,
    /// actuation, then pacing sleep.
    pub fn step(&mut self) -> Result<()> {
        for motor in self.scheduler.take_new_faults() {
            error!(motor = motor.index(), "motor fault, stopping exercise");
            self.session.force_stop();
            if let Err(e) = self.motors.set_duty(motor, 0) {
                warn!(motor = motor.index(), error = %e, "could not zero faulted motor");
            }
            self.transport.send(&encode_motor_fault(motor));
        }

        let mut buf = [0u8; 64];
        let n = self.transport.recv(&mut buf);
        for &byte in &buf[..n] {
            if let Some(command) = self.parser.push(byte) {
                self.session.apply(command);
            }
        }

        let previous = self.filter.snapshot();
        for &channel in Potentiometer::ALL.iter() {
            match self.adc.read_pot(channel) {
                Ok(raw) => self.filter.update_pot(channel, raw),
                Err(e) => warn!(pot = channel.index(), error = %e, "pot read failed, channel skipped"),
            }
        }
        for &motor in MotorChannel::ALL.iter() {
            match self.adc.read_motor_current(motor) {
                Ok(raw) => self.filter.update_motor_current(motor, raw),
                Err(e) => warn!(motor = motor.index(), error = %e, "current read failed, channel skipped"),
            }
        }

        if self.stabilize_remaining > 0 {
            self.stabilize_remaining -= 1;
            trace!(remaining = self.stabilize_remaining, "stabilizing filters");
            self.clock.sleep(Duration::from_micros(self.period_us));
            return Ok(());
        }

        for _ in 0..READINGS_PER_CYCLE {
            let channel = Potentiometer::ALL[self.telemetry_cursor];
            let reading = self.filter.pot(channel) as i16;
            self.transport.send(&encode_reading(channel, reading));
            self.telemetry_cursor = (self.telemetry_cursor + 1) % POT_COUNT;
        }

        let current = self.filter.snapshot();
        let duty = self.session.duty();
        for &finger in Finger::ALL.iter() {
            let trend = flexion(&current, &previous, finger);
            self.scheduler
                .drive(finger.motor(), trend, duty, &mut self.motors);
        }

        self.clock.sleep(Duration::from_micros(self.period_us));
        Ok(())
    }

    /// Run `step` until the shutdown flag is raised, then park the
    /// motors and disable the driver stage.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<()> {
        info!("control loop running");
        while !shutdown.load(Ordering::Acquire) {
            self.step()?;
        }
        info!("control loop stopping");
        for &motor in MotorChannel::ALL.iter() {
            if let Err(e) = self.motors.set_duty(motor, 0) {
                warn!(motor = motor.index(), error = %e, "could not zero motor on shutdown");
            }
        }
        self.motors.set_enable(false).map_err(hw_report)?;
        Ok(())
    }
}

/// Builder for [`GloveCore`]. The ADC and motor driver are required;
/// transport, timing and clock fall back to defaults.
pub struct GloveBuilder<A: Adc, M: MotorDriver> {
    adc: Option<A>,
    motors: Option<M>,
    transport: Option<SerialTransport>,
    timing: TimingCfg,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
}

impl<A: Adc, M: MotorDriver> Default for GloveBuilder<A, M> {
    fn default() -> Self {
        Self {
            adc: None,
            motors: None,
            transport: None,
            timing: TimingCfg::default(),
            clock: None,
        }
    }
}

impl<A: Adc, M: MotorDriver> GloveBuilder<A, M> {
    pub fn with_adc(mut self, adc: A) -> Self {
        self.adc = Some(adc);
        self
    }

    pub fn with_motors(mut self, motors: M) -> Self {
        self.motors = Some(motors);
        self
    }

    pub fn with_transport(mut self, transport: SerialTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_timing(mut self, timing: TimingCfg) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration, enable the driver stage and produce
    /// a ready control loop.
    pub fn build(self) -> Result<GloveCore<A, M>> {
        if self.timing.loop_hz == 0 {
            return Err(BuildError::InvalidConfig("loop_hz must be positive").into());
        }
        if self.timing.tick_hz == 0 {
            return Err(BuildError::InvalidConfig("tick_hz must be positive").into());
        }
        if self.timing.pulse_ms == 0 {
            return Err(BuildError::InvalidConfig("pulse_ms must be positive").into());
        }
        let adc = self.adc.ok_or(BuildError::MissingAdc)?;
        let mut motors = self.motors.ok_or(BuildError::MissingMotorDriver)?;
        motors.set_enable(true).map_err(hw_report)?;
        Ok(GloveCore {
            adc,
            motors,
            transport: self.transport.unwrap_or_default(),
            filter: SignalFilter::new(),
            scheduler: ActuationScheduler::new(self.timing.pulse_ticks()),
            session: ExerciseSession::new(),
            parser: CommandParser::new(),
            clock: self
                .clock
                .unwrap_or_else(|| Arc::new(MonotonicClock::new())),
            period_us: self.timing.period_us(),
            stabilize_remaining: self.timing.stabilize_iters,
            telemetry_cursor: 0,
        })
    }
}
