//! Common time/period helpers for glove_core.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;
/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Compute the period in microseconds for a given loop rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Number of periodic ticks that span `ms` milliseconds at `tick_hz`.
///
/// Rounds down, clamps into `1..=i16::MAX` so the result is always a
/// usable cooldown reload value. At the 122 Hz tick, 500 ms comes out
/// to 61 ticks.
#[inline]
pub fn ticks_for_ms(tick_hz: u32, ms: u64) -> i16 {
    let ticks = u64::from(tick_hz.max(1)).saturating_mul(ms) / MILLIS_PER_SEC;
    ticks.clamp(1, i16::MAX as u64) as i16
}
