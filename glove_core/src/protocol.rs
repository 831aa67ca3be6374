//! Host-link wire protocol.
//!
//! Host-to-device commands are one opcode byte, optionally followed by
//! one operand byte (`OP_SET_RESISTANCE`). Device-to-host telemetry is
//! framed: a 4-byte reading frame `[OP_READING, channel, hi, lo]` and a
//! 2-byte fault frame `[OP_MOTOR_FAULT, motor]`. Both directions are
//! byte streams; [`CommandParser`] and [`TelemetryDecoder`] carry
//! partial frames across read boundaries.

use glove_traits::{MotorChannel, Potentiometer};
use tracing::{trace, warn};

pub const OP_SET_RESISTANCE: u8 = 0x85;
pub const OP_START: u8 = 0x01;
pub const OP_STOP: u8 = 0x82;
pub const OP_READING: u8 = 0x81;
pub const OP_MOTOR_FAULT: u8 = 0xA1;

/// Resistance setting selected by the host, levels 1 (hardest) through
/// 5 (easiest). Each level maps to a fixed PWM duty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResistanceLevel {
    L1,
    L2,
    L3,
    L4,
    #[default]
    L5,
}

impl ResistanceLevel {
    /// PWM duty driven while a motor pulse is active.
    pub fn duty(self) -> u8 {
        match self {
            Self::L1 => 200,
            Self::L2 => 175,
            Self::L3 => 150,
            Self::L4 => 125,
            Self::L5 => 100,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::L1 => 1,
            Self::L2 => 2,
            Self::L3 => 3,
            Self::L4 => 4,
            Self::L5 => 5,
        }
    }
}

impl TryFrom<u8> for ResistanceLevel {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            1 => Ok(Self::L1),
            2 => Ok(Self::L2),
            3 => Ok(Self::L3),
            4 => Ok(Self::L4),
            5 => Ok(Self::L5),
            other => Err(other),
        }
    }
}

/// Decoded host command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetResistance(ResistanceLevel),
    Start,
    Stop,
}

/// Streaming command parser. Feed it bytes as they arrive; a pending
/// `OP_SET_RESISTANCE` survives across drain boundaries so a command
/// split between two reads still decodes.
#[derive(Debug, Default)]
pub struct CommandParser {
    pending_set: bool,
}

impl CommandParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, byte: u8) -> Option<Command> {
        if self.pending_set {
            self.pending_set = false;
            return match ResistanceLevel::try_from(byte) {
                Ok(level) => Some(Command::SetResistance(level)),
                Err(value) => {
                    warn!(value, "resistance level out of range, command dropped");
                    None
                }
            };
        }
        match byte {
            OP_SET_RESISTANCE => {
                self.pending_set = true;
                None
            }
            OP_START => Some(Command::Start),
            OP_STOP => Some(Command::Stop),
            other => {
                trace!(opcode = other, "unknown opcode skipped");
                None
            }
        }
    }
}

/// Reading frame: channel id plus the filtered value, big-endian.
pub fn encode_reading(channel: Potentiometer, value: i16) -> [u8; 4] {
    let [hi, lo] = value.to_be_bytes();
    [OP_READING, channel.index() as u8, hi, lo]
}

/// Fault frame announcing a latched motor fault to the host.
pub fn encode_motor_fault(motor: MotorChannel) -> [u8; 2] {
    [OP_MOTOR_FAULT, motor.index() as u8]
}

/// Telemetry frame as seen by the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryFrame {
    Reading { channel: Potentiometer, value: i16 },
    MotorFault(MotorChannel),
}

/// Streaming decoder for the device-to-host byte stream.
#[derive(Debug, Default)]
pub struct TelemetryDecoder {
    buf: [u8; 4],
    len: usize,
}

impl TelemetryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn frame_len(op: u8) -> Option<usize> {
        match op {
            OP_READING => Some(4),
            OP_MOTOR_FAULT => Some(2),
            _ => None,
        }
    }

    pub fn push(&mut self, byte: u8) -> Option<TelemetryFrame> {
        if self.len == 0 {
            if Self::frame_len(byte).is_none() {
                trace!(opcode = byte, "unknown telemetry byte skipped");
                return None;
            }
            self.buf[0] = byte;
            self.len = 1;
            return None;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        let want = Self::frame_len(self.buf[0]).unwrap_or(1);
        if self.len < want {
            return None;
        }
        self.len = 0;
        match self.buf[0] {
            OP_READING => {
                let value = i16::from_be_bytes([self.buf[2], self.buf[3]]);
                match Potentiometer::try_from(self.buf[1]) {
                    Ok(channel) => Some(TelemetryFrame::Reading { channel, value }),
                    Err(_) => {
                        warn!(channel = self.buf[1], "reading frame with bad channel");
                        None
                    }
                }
            }
            OP_MOTOR_FAULT => match MotorChannel::try_from(self.buf[1]) {
                Ok(motor) => Some(TelemetryFrame::MotorFault(motor)),
                Err(_) => {
                    warn!(motor = self.buf[1], "fault frame with bad motor id");
                    None
                }
            },
            _ => None,
        }
    }
}
