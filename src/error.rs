//! Error types for dimmer bring-up

use core::fmt;

/// Error type for dimmer bring-up
///
/// Nothing fails once the system is running; every variant is an
/// initialization problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// PWM configuration cannot be realized by the hardware
    InvalidPwmConfig(PwmConfigError),
    /// PWM peripheral rejected the configuration
    PwmPeripheral,
    /// Gesture sensor did not respond during initialization
    SensorInit,
}

/// Reason a PWM configuration was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmConfigError {
    /// Frequency must be non-zero
    ZeroFrequency,
    /// Duty resolution outside of 1..=16 bits
    UnsupportedResolution(u8),
    /// `frequency << resolution` exceeds the timer source clock
    FrequencyTooHigh { frequency_hz: u32, resolution_bits: u8 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPwmConfig(e) => write!(f, "Invalid PWM configuration: {}", e),
            Error::PwmPeripheral => write!(f, "PWM peripheral configuration failed"),
            Error::SensorInit => write!(f, "Gesture sensor initialization failed"),
        }
    }
}

impl fmt::Display for PwmConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmConfigError::ZeroFrequency => write!(f, "frequency is zero"),
            PwmConfigError::UnsupportedResolution(bits) => {
                write!(f, "unsupported duty resolution of {} bits", bits)
            }
            PwmConfigError::FrequencyTooHigh {
                frequency_hz,
                resolution_bits,
            } => write!(
                f,
                "{} Hz is too fast for {}-bit resolution",
                frequency_hz, resolution_bits
            ),
        }
    }
}

impl From<PwmConfigError> for Error {
    fn from(e: PwmConfigError) -> Self {
        Error::InvalidPwmConfig(e)
    }
}
