pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::fmt;

/// Number of flex-sensing potentiometers on the glove (thumb has two
/// instrumented joints, every other finger has three).
pub const POT_COUNT: usize = 14;
/// Number of actuated fingers / motor channels.
pub const MOTOR_COUNT: usize = 5;

/// Error returned when a raw byte does not name a valid channel.
///
/// Identifiers arrive over the wire and out of config files as plain
/// bytes; conversion into the closed enums below is validated exactly
/// once at that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRangeError {
    pub domain: &'static str,
    pub value: u8,
}

impl fmt::Display for ChannelRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} id {} out of range", self.domain, self.value)
    }
}

impl std::error::Error for ChannelRangeError {}

/// Flex-sensing potentiometer channels, one per instrumented joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Potentiometer {
    Thumb1 = 0,
    Thumb2 = 1,
    Index1 = 2,
    Index2 = 3,
    Index3 = 4,
    Middle1 = 5,
    Middle2 = 6,
    Middle3 = 7,
    Ring1 = 8,
    Ring2 = 9,
    Ring3 = 10,
    Pinky1 = 11,
    Pinky2 = 12,
    Pinky3 = 13,
}

impl Potentiometer {
    pub const ALL: [Self; POT_COUNT] = [
        Self::Thumb1,
        Self::Thumb2,
        Self::Index1,
        Self::Index2,
        Self::Index3,
        Self::Middle1,
        Self::Middle2,
        Self::Middle3,
        Self::Ring1,
        Self::Ring2,
        Self::Ring3,
        Self::Pinky1,
        Self::Pinky2,
        Self::Pinky3,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Potentiometer {
    type Error = ChannelRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(ChannelRangeError {
                domain: "potentiometer",
                value,
            })
    }
}

/// Motor channels. The order is reversed relative to finger order
/// because the motor outputs were wired that way to simplify the PCB
/// layout; the numbering is part of the wire protocol and must not be
/// "corrected".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MotorChannel {
    Pinky = 0,
    Ring = 1,
    Middle = 2,
    Index = 3,
    Thumb = 4,
}

impl MotorChannel {
    pub const ALL: [Self; MOTOR_COUNT] =
        [Self::Pinky, Self::Ring, Self::Middle, Self::Index, Self::Thumb];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for MotorChannel {
    type Error = ChannelRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(ChannelRangeError {
                domain: "motor",
                value,
            })
    }
}

/// Fingers in anatomical order, with their joint and motor wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Self; MOTOR_COUNT] =
        [Self::Thumb, Self::Index, Self::Middle, Self::Ring, Self::Pinky];

    /// The three joint channels consulted for flexion detection.
    ///
    /// The thumb only has two instrumented joints; its triple repeats
    /// the second joint, exactly as the sensors were wired.
    pub fn joints(self) -> [Potentiometer; 3] {
        use Potentiometer::*;
        match self {
            Self::Thumb => [Thumb1, Thumb2, Thumb2],
            Self::Index => [Index1, Index2, Index3],
            Self::Middle => [Middle1, Middle2, Middle3],
            Self::Ring => [Ring1, Ring2, Ring3],
            Self::Pinky => [Pinky1, Pinky2, Pinky3],
        }
    }

    pub fn motor(self) -> MotorChannel {
        match self {
            Self::Thumb => MotorChannel::Thumb,
            Self::Index => MotorChannel::Index,
            Self::Middle => MotorChannel::Middle,
            Self::Ring => MotorChannel::Ring,
            Self::Pinky => MotorChannel::Pinky,
        }
    }
}

/// Motor rotation direction. Forward curls the finger, backward
/// extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// SPI-attached ADC bank seen as per-channel 10-bit reads. The raw
/// command framing and chip-select handling live behind this trait.
pub trait Adc {
    fn read_pot(
        &mut self,
        channel: Potentiometer,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;

    fn read_motor_current(
        &mut self,
        channel: MotorChannel,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}

/// PWM + phase-pin motor driver for the five finger motors.
pub trait MotorDriver {
    fn set_duty(
        &mut self,
        motor: MotorChannel,
        duty: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn set_phase(
        &mut self,
        motor: MotorChannel,
        direction: Direction,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Master enable line shared by all driver chips.
    fn set_enable(
        &mut self,
        enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pot_roundtrip_and_bounds() {
        for (i, ch) in Potentiometer::ALL.iter().enumerate() {
            assert_eq!(ch.index(), i);
            assert_eq!(Potentiometer::try_from(i as u8).unwrap(), *ch);
        }
        assert!(Potentiometer::try_from(POT_COUNT as u8).is_err());
    }

    #[test]
    fn motor_order_is_reversed() {
        assert_eq!(MotorChannel::Pinky.index(), 0);
        assert_eq!(MotorChannel::Thumb.index(), 4);
        assert!(MotorChannel::try_from(5).is_err());
    }

    #[test]
    fn thumb_triple_repeats_second_joint() {
        let joints = Finger::Thumb.joints();
        assert_eq!(joints[1], joints[2]);
    }

    #[test]
    fn fingers_map_onto_distinct_motors() {
        let mut seen = std::collections::HashSet::new();
        for f in Finger::ALL {
            assert!(seen.insert(f.motor()));
        }
        assert_eq!(seen.len(), MOTOR_COUNT);
    }
}
