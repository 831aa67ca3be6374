//! Fixed-point signal conditioning and flexion detection.
//!
//! Every sensor input (14 potentiometers and 5 motor-current channels)
//! runs through a single-pole exponential moving average held in
//! fixed point: the stored value is the 10-bit raw reading left-shifted
//! by [`FILTER_SHIFT`], and each update folds in the new sample with
//! weight `1/2^FILTER_SHIFT`. All arithmetic is integer; the update is
//! computed in `i32` so a negative delta shifts arithmetically.

use glove_traits::{Finger, MOTOR_COUNT, MotorChannel, POT_COUNT, Potentiometer};

/// Fixed-point shift of the stored filter state; the smoothing weight
/// is `1/2^FILTER_SHIFT` per sample.
pub const FILTER_SHIFT: u32 = 3;

/// Largest raw reading the 10-bit converter can produce.
pub const ADC_MAX: u16 = 0x03FF;

/// Per-finger flexion direction derived from two successive snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexionTrend {
    /// At least one joint reading decreased (finger curling).
    MoreFlexed,
    /// No decrease, at least one increase (finger extending).
    LessFlexed,
    /// No joint moved at display resolution.
    Steady,
}

impl FlexionTrend {
    /// Sign convention used on the wire: +1 curl, -1 extend.
    pub fn sign(self) -> i8 {
        match self {
            Self::MoreFlexed => 1,
            Self::LessFlexed => -1,
            Self::Steady => 0,
        }
    }
}

/// Copy of all potentiometer filter states at one loop iteration,
/// taken before the iteration's updates so it can serve as "previous".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PotSnapshot {
    values: [u16; POT_COUNT],
}

impl PotSnapshot {
    /// Filtered value at raw (display) resolution.
    #[inline]
    pub fn value(&self, channel: Potentiometer) -> u16 {
        self.values[channel.index()] >> FILTER_SHIFT
    }
}

/// Filter state for every sensor input. Zeroed at startup and never
/// reset afterwards; the control loop waits out a stabilization window
/// before acting on the values.
#[derive(Debug, Clone)]
pub struct SignalFilter {
    pots: [u16; POT_COUNT],
    currents: [u16; MOTOR_COUNT],
}

impl Default for SignalFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalFilter {
    pub fn new() -> Self {
        Self {
            pots: [0; POT_COUNT],
            currents: [0; MOTOR_COUNT],
        }
    }

    /// One EMA step: `filtered += (raw_shifted - filtered) >> K`.
    ///
    /// Raw input is clamped to 10 bits at this boundary, which bounds
    /// the state to `ADC_MAX << K` and makes the u16 narrowing cast
    /// lossless.
    fn smooth(filtered: u16, raw: u16) -> u16 {
        let shifted = i32::from(raw.min(ADC_MAX)) << FILTER_SHIFT;
        let prev = i32::from(filtered);
        (prev + ((shifted - prev) >> FILTER_SHIFT)) as u16
    }

    pub fn update_pot(&mut self, channel: Potentiometer, raw: u16) {
        let slot = &mut self.pots[channel.index()];
        *slot = Self::smooth(*slot, raw);
    }

    pub fn update_motor_current(&mut self, channel: MotorChannel, raw: u16) {
        let slot = &mut self.currents[channel.index()];
        *slot = Self::smooth(*slot, raw);
    }

    /// Filtered potentiometer value, shifted back to raw resolution.
    pub fn pot(&self, channel: Potentiometer) -> u16 {
        self.pots[channel.index()] >> FILTER_SHIFT
    }

    /// Filtered motor-current value at raw resolution.
    pub fn motor_current(&self, channel: MotorChannel) -> u16 {
        self.currents[channel.index()] >> FILTER_SHIFT
    }

    pub fn snapshot(&self) -> PotSnapshot {
        PotSnapshot { values: self.pots }
    }
}

/// Three-point-majority flexion direction for one finger.
///
/// Precedence is asymmetric on purpose: a decrease on any joint wins
/// over a simultaneous increase on another, so mixed movement always
/// reads as `MoreFlexed`. This materially affects actuation direction;
/// DESIGN.md records it as a carried contract.
pub fn flexion(current: &PotSnapshot, previous: &PotSnapshot, finger: Finger) -> FlexionTrend {
    let joints = finger.joints();
    if joints.iter().any(|&j| current.value(j) < previous.value(j)) {
        FlexionTrend::MoreFlexed
    } else if joints.iter().any(|&j| current.value(j) > previous.value(j)) {
        FlexionTrend::LessFlexed
    } else {
        FlexionTrend::Steady
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(values: &[(Potentiometer, u16)]) -> PotSnapshot {
        let mut filter = SignalFilter::new();
        for &(ch, v) in values {
            // Drive the channel to an exact fixed-point value.
            filter.pots[ch.index()] = v << FILTER_SHIFT;
        }
        filter.snapshot()
    }

    #[test]
    fn constant_input_converges_without_overshoot() {
        let mut filter = SignalFilter::new();
        let raw = 600u16;
        let target = i32::from(raw) << FILTER_SHIFT;
        let mut prev = 0i32;
        for _ in 0..200 {
            filter.update_pot(Potentiometer::Index1, raw);
            let now = i32::from(filter.pots[Potentiometer::Index1.index()]);
            assert!(now >= prev, "must approach monotonically");
            assert!(now <= target, "must never overshoot the target");
            prev = now;
        }
        // Rising updates quantize: the state parks within one step
        // (2^K - 1 counts) below the target and stays there.
        assert!(target - prev < 1 << FILTER_SHIFT);
        let settled = filter.pots[Potentiometer::Index1.index()];
        filter.update_pot(Potentiometer::Index1, raw);
        assert_eq!(filter.pots[Potentiometer::Index1.index()], settled);
        assert!(filter.pot(Potentiometer::Index1) >= raw - 1);
    }

    #[test]
    fn convergence_from_above_is_monotone_too() {
        let mut filter = SignalFilter::new();
        for _ in 0..200 {
            filter.update_pot(Potentiometer::Ring2, 900);
        }
        let mut prev = i32::from(filter.pots[Potentiometer::Ring2.index()]);
        for _ in 0..200 {
            filter.update_pot(Potentiometer::Ring2, 100);
            let now = i32::from(filter.pots[Potentiometer::Ring2.index()]);
            assert!(now <= prev);
            assert!(now >= 100 << FILTER_SHIFT);
            prev = now;
        }
        assert_eq!(filter.pot(Potentiometer::Ring2), 100);
    }

    #[test]
    fn raw_input_is_clamped_to_ten_bits() {
        let mut filter = SignalFilter::new();
        for _ in 0..200 {
            filter.update_pot(Potentiometer::Thumb1, u16::MAX);
        }
        let settled = filter.pot(Potentiometer::Thumb1);
        assert!(settled <= ADC_MAX);
        assert!(settled >= ADC_MAX - 1);
    }

    #[test]
    fn any_decrease_reads_more_flexed() {
        let prev = snapshot_with(&[(Potentiometer::Index1, 500)]);
        let cur = snapshot_with(&[(Potentiometer::Index1, 480)]);
        assert_eq!(flexion(&cur, &prev, Finger::Index), FlexionTrend::MoreFlexed);
    }

    #[test]
    fn any_increase_without_decrease_reads_less_flexed() {
        let prev = snapshot_with(&[(Potentiometer::Middle3, 300)]);
        let cur = snapshot_with(&[(Potentiometer::Middle3, 350)]);
        assert_eq!(flexion(&cur, &prev, Finger::Middle), FlexionTrend::LessFlexed);
    }

    #[test]
    fn unchanged_joints_read_steady() {
        let prev = snapshot_with(&[(Potentiometer::Pinky1, 512)]);
        let cur = prev;
        assert_eq!(flexion(&cur, &prev, Finger::Pinky), FlexionTrend::Steady);
    }

    #[test]
    fn decrease_takes_precedence_over_increase() {
        // Ring1 drops while Ring3 rises: the decrease wins.
        let prev = snapshot_with(&[(Potentiometer::Ring1, 500), (Potentiometer::Ring3, 500)]);
        let cur = snapshot_with(&[(Potentiometer::Ring1, 450), (Potentiometer::Ring3, 550)]);
        assert_eq!(flexion(&cur, &prev, Finger::Ring), FlexionTrend::MoreFlexed);
    }

    #[test]
    fn sub_resolution_filter_motion_is_steady() {
        // One raw EMA step from equilibrium moves the fixed-point state
        // but not the display-resolution value.
        let mut filter = SignalFilter::new();
        for _ in 0..200 {
            filter.update_pot(Potentiometer::Thumb1, 512);
            filter.update_pot(Potentiometer::Thumb2, 512);
        }
        let prev = filter.snapshot();
        filter.update_pot(Potentiometer::Thumb1, 513);
        let cur = filter.snapshot();
        assert_eq!(flexion(&cur, &prev, Finger::Thumb), FlexionTrend::Steady);
    }
}
