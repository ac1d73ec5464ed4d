use embassy_time::Duration;

use crate::error::PwmConfigError;

/// Duration of the on/off fades
pub const RAMP_DURATION: Duration = Duration::from_millis(1000);

/// Level change per left/right gesture, in percent
pub const BRIGHTNESS_STEP: u8 = 25;

/// Delay between gesture polls
///
/// Short enough not to miss a gesture pulse from the sensor.
pub const GESTURE_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Period of the duty committer
pub const COMMIT_PERIOD: Duration = Duration::from_millis(1);

pub const PWM_FREQUENCY_HZ: u32 = 10_000;
pub const PWM_RESOLUTION_BITS: u8 = 12;
/// APB clock feeding the PWM timer
pub const PWM_SOURCE_CLOCK_HZ: u32 = 80_000_000;

const MAX_RESOLUTION_BITS: u8 = 16;

/// Configuration for the gesture controller
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// Duration of the on/off ramps
    pub ramp_duration: Duration,
    /// Level change per left/right gesture
    pub brightness_step: u8,
    /// Delay between gesture polls
    pub poll_interval: Duration,
    /// Period of the duty committer
    pub commit_period: Duration,
}

impl ControllerConfig {
    pub const DEFAULT: Self = Self {
        ramp_duration: RAMP_DURATION,
        brightness_step: BRIGHTNESS_STEP,
        poll_interval: GESTURE_POLL_INTERVAL,
        commit_period: COMMIT_PERIOD,
    };
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// PWM timer and channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmConfig {
    pub frequency_hz: u32,
    pub resolution_bits: u8,
    pub source_clock_hz: u32,
}

impl PwmConfig {
    pub const DEFAULT: Self = Self {
        frequency_hz: PWM_FREQUENCY_HZ,
        resolution_bits: PWM_RESOLUTION_BITS,
        source_clock_hz: PWM_SOURCE_CLOCK_HZ,
    };

    /// Largest duty value for the configured resolution
    #[allow(clippy::cast_possible_truncation)]
    pub const fn max_duty(&self) -> u16 {
        let bits = if self.resolution_bits > MAX_RESOLUTION_BITS {
            MAX_RESOLUTION_BITS
        } else {
            self.resolution_bits
        };
        ((1u32 << bits) - 1) as u16
    }

    /// Check that the timer can produce this frequency at this resolution
    pub const fn validate(&self) -> Result<(), PwmConfigError> {
        if self.frequency_hz == 0 {
            return Err(PwmConfigError::ZeroFrequency);
        }
        if self.resolution_bits == 0 || self.resolution_bits > MAX_RESOLUTION_BITS {
            return Err(PwmConfigError::UnsupportedResolution(self.resolution_bits));
        }
        let required = (self.frequency_hz as u64) << self.resolution_bits;
        if required > self.source_clock_hz as u64 {
            return Err(PwmConfigError::FrequencyTooHigh {
                frequency_hz: self.frequency_hz,
                resolution_bits: self.resolution_bits,
            });
        }
        Ok(())
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
