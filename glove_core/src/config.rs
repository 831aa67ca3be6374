//! Runtime timing parameters for the control loop.

use crate::util;

/// Control-loop and pulse timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingCfg {
    /// Control-loop iterations per second.
    pub loop_hz: u32,
    /// Cooldown timer tick rate.
    pub tick_hz: u32,
    /// Duration of one motor pulse in milliseconds.
    pub pulse_ms: u64,
    /// Loop iterations spent letting the filters settle before any
    /// telemetry or actuation.
    pub stabilize_iters: u16,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            loop_hz: 100,
            tick_hz: 122,
            pulse_ms: 500,
            stabilize_iters: 255,
        }
    }
}

impl TimingCfg {
    /// Pulse length expressed in cooldown ticks, at least 1.
    pub fn pulse_ticks(&self) -> i16 {
        util::ticks_for_ms(self.tick_hz, self.pulse_ms)
    }

    /// Control-loop period in microseconds.
    pub fn period_us(&self) -> u64 {
        util::period_us(self.loop_hz)
    }
}
