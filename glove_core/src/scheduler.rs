//! Per-motor pulse scheduling, cooldown timing and fault latching.
//!
//! Each motor runs in timed pulses: a flexion trend starts a pulse and
//! loads that motor's cooldown counter; while the counter is nonzero
//! the pulse runs to completion and new trends are ignored for that
//! motor. The counters are decremented from the timer tick handler,
//! which runs on a different thread than the control loop, so they are
//! atomics. Fault lines are latched the same way: the hardware side
//! raises a flag, the control loop observes it once and the motor stays
//! out of service until explicitly cleared.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI16, Ordering};

use glove_traits::{MOTOR_COUNT, MotorChannel, MotorDriver};
use tracing::warn;

use crate::filter::FlexionTrend;

/// Cooldown tick counters, one per motor. Written by the control loop
/// when a pulse starts, decremented by the timer tick.
#[derive(Debug)]
pub struct CooldownTimers {
    ticks: [AtomicI16; MOTOR_COUNT],
}

impl CooldownTimers {
    fn new() -> Self {
        Self {
            ticks: std::array::from_fn(|_| AtomicI16::new(0)),
        }
    }

    fn get(&self, motor: MotorChannel) -> i16 {
        self.ticks[motor.index()].load(Ordering::Acquire)
    }

    fn load(&self, motor: MotorChannel, ticks: i16) {
        self.ticks[motor.index()].store(ticks, Ordering::Release);
    }
}

/// Handle given to the timer thread; each tick decrements every
/// running cooldown by one, stopping at zero.
#[derive(Debug, Clone)]
pub struct TickHandle {
    timers: Arc<CooldownTimers>,
}

impl TickHandle {
    pub fn on_tick(&self) {
        for counter in &self.timers.ticks {
            // Leave counters already at zero untouched.
            let _ = counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
                (v > 0).then(|| v - 1)
            });
        }
    }
}

/// Handle given to the hardware fault path; raising a flag is safe
/// from any thread.
#[derive(Debug, Clone)]
pub struct FaultHandle {
    flags: Arc<[AtomicBool; MOTOR_COUNT]>,
}

impl FaultHandle {
    pub fn raise(&self, motor: MotorChannel) {
        self.flags[motor.index()].store(true, Ordering::Release);
    }

    pub fn is_raised(&self, motor: MotorChannel) -> bool {
        self.flags[motor.index()].load(Ordering::Acquire)
    }
}

/// Observable per-motor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Idle,
    Actuating,
    Faulted,
}

/// Decides, per motor and per control cycle, whether to start a pulse,
/// keep one running, or hold still.
#[derive(Debug)]
pub struct ActuationScheduler {
    timers: Arc<CooldownTimers>,
    faults: Arc<[AtomicBool; MOTOR_COUNT]>,
    faulted: [bool; MOTOR_COUNT],
    pulse_ticks: i16,
}

impl ActuationScheduler {
    pub fn new(pulse_ticks: i16) -> Self {
        Self {
            timers: Arc::new(CooldownTimers::new()),
            faults: Arc::new(std::array::from_fn(|_| AtomicBool::new(false))),
            faulted: [false; MOTOR_COUNT],
            pulse_ticks,
        }
    }

    pub fn tick_handle(&self) -> TickHandle {
        TickHandle {
            timers: Arc::clone(&self.timers),
        }
    }

    pub fn fault_handle(&self) -> FaultHandle {
        FaultHandle {
            flags: Arc::clone(&self.faults),
        }
    }

    pub fn state(&self, motor: MotorChannel) -> MotorState {
        if self.faulted[motor.index()] {
            MotorState::Faulted
        } else if self.timers.get(motor) > 0 {
            MotorState::Actuating
        } else {
            MotorState::Idle
        }
    }

    /// Motors whose fault flag was raised since the last call. Each
    /// fault is reported exactly once; the motor stays `Faulted` until
    /// [`Self::clear_fault`].
    pub fn take_new_faults(&mut self) -> Vec<MotorChannel> {
        let mut fresh = Vec::new();
        for &motor in MotorChannel::ALL.iter() {
            let raised = self.faults[motor.index()].load(Ordering::Acquire);
            if raised && !self.faulted[motor.index()] {
                self.faulted[motor.index()] = true;
                fresh.push(motor);
            }
        }
        fresh
    }

    /// Return a motor to service after a fault was dealt with.
    pub fn clear_fault(&mut self, motor: MotorChannel) {
        self.faulted[motor.index()] = false;
        self.faults[motor.index()].store(false, Ordering::Release);
    }

    /// One control-cycle update for one motor. A faulted motor is held
    /// at zero duty; a motor whose pulse is still running is left
    /// alone; otherwise the trend either starts a new pulse or parks
    /// the motor.
    ///
    /// Driver errors are logged and the rest of this motor's update is
    /// skipped for the cycle; the next cycle retries.
    pub fn drive<M: MotorDriver>(
        &mut self,
        motor: MotorChannel,
        trend: FlexionTrend,
        duty: u8,
        driver: &mut M,
    ) {
        if self.faulted[motor.index()] {
            if let Err(e) = driver.set_duty(motor, 0) {
                warn!(motor = motor.index(), error = %e, "duty write failed on faulted motor");
            }
            return;
        }
        if self.timers.get(motor) > 0 {
            return;
        }
        let direction = match trend {
            FlexionTrend::MoreFlexed => glove_traits::Direction::Forward,
            FlexionTrend::LessFlexed => glove_traits::Direction::Backward,
            FlexionTrend::Steady => {
                if let Err(e) = driver.set_duty(motor, 0) {
                    warn!(motor = motor.index(), error = %e, "duty write failed");
                }
                return;
            }
        };
        if let Err(e) = driver.set_phase(motor, direction) {
            warn!(motor = motor.index(), error = %e, "phase write failed, pulse skipped");
            return;
        }
        if let Err(e) = driver.set_duty(motor, duty) {
            warn!(motor = motor.index(), error = %e, "duty write failed, pulse skipped");
            return;
        }
        self.timers.load(motor, self.pulse_ticks);
    }
}
