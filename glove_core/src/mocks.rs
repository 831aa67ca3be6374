//! Test and helper mocks for glove_core

use glove_traits::{Direction, MOTOR_COUNT, MotorChannel, Potentiometer};

/// An ADC that always errors; useful for exercising the per-channel
/// skip path in the control loop.
pub struct NoopAdc;

impl glove_traits::Adc for NoopAdc {
    fn read_pot(
        &mut self,
        _channel: Potentiometer,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("noop adc")))
    }

    fn read_motor_current(
        &mut self,
        _channel: MotorChannel,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("noop adc")))
    }
}

/// An ADC that errors on one potentiometer channel and returns a
/// constant everywhere else.
pub struct FaultyChannelAdc {
    pub value: u16,
    pub failing: Potentiometer,
}

impl glove_traits::Adc for FaultyChannelAdc {
    fn read_pot(
        &mut self,
        channel: Potentiometer,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        if channel == self.failing {
            return Err(Box::new(std::io::Error::other("channel unavailable")));
        }
        Ok(self.value)
    }

    fn read_motor_current(
        &mut self,
        _channel: MotorChannel,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.value)
    }
}

/// An ADC that returns the same raw value for every channel.
pub struct ConstAdc(pub u16);

impl glove_traits::Adc for ConstAdc {
    fn read_pot(
        &mut self,
        _channel: Potentiometer,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0)
    }

    fn read_motor_current(
        &mut self,
        _channel: MotorChannel,
    ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0)
    }
}

/// A motor driver that records the last value written to each output.
pub struct RecordingMotor {
    pub duty: [u8; MOTOR_COUNT],
    pub phase: [Direction; MOTOR_COUNT],
    pub enabled: bool,
}

impl Default for RecordingMotor {
    fn default() -> Self {
        Self {
            duty: [0; MOTOR_COUNT],
            phase: [Direction::Forward; MOTOR_COUNT],
            enabled: false,
        }
    }
}

impl glove_traits::MotorDriver for RecordingMotor {
    fn set_duty(
        &mut self,
        motor: MotorChannel,
        duty: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.duty[motor.index()] = duty;
        Ok(())
    }

    fn set_phase(
        &mut self,
        motor: MotorChannel,
        direction: Direction,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.phase[motor.index()] = direction;
        Ok(())
    }

    fn set_enable(
        &mut self,
        enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.enabled = enabled;
        Ok(())
    }
}
