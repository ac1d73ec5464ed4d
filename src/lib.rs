#![no_std]

pub mod command;
pub mod config;
pub mod controller;
pub mod duty;
pub mod error;
pub mod gamma;
pub mod gesture;
pub mod ramp;
pub mod state;
pub mod status;
pub mod system;

pub use command::{CommandId, DimmerBus, DutyCommand, DutyCommandKind, RampOutcome};
pub use config::{ControllerConfig, PwmConfig};
pub use controller::GestureController;
pub use duty::{DutyCommitter, SharedDuty};
pub use error::{Error, PwmConfigError};
pub use gamma::{duty_to_level, level_to_duty};
pub use gesture::{GestureEvent, GestureInput, GestureSource};
pub use ramp::{RAMP_STEPS, RampEngine, RampRequest};
pub use state::{Action, BrightnessState, MAX_LEVEL, Transition, transition};
pub use status::{StatusCell, StatusReport};
pub use system::{LightSystem, bring_up};

pub use embassy_time::{Duration, Instant};

/// Abstract PWM duty register
///
/// Implement this trait to support different hardware platforms.
/// The register is double-buffered: values passed to [`DutyRegister::set`]
/// only reach the output after [`DutyRegister::commit`].
pub trait DutyRegister {
    /// Largest value the register accepts (full on)
    fn max_duty(&self) -> u16;

    /// Stage a new duty value
    fn set(&mut self, duty: u16);

    /// Latch the staged value into the active output
    fn commit(&mut self);

    /// Read back the staged value
    fn staged(&self) -> u16;
}

/// Abstract PWM peripheral that has not been configured yet
///
/// Configuring consumes the peripheral and yields the channel's duty register.
pub trait PwmPeripheral {
    type Register: DutyRegister;

    /// Set up the timer and channel for the given configuration
    fn configure(self, config: &PwmConfig) -> Result<Self::Register, Error>;
}

/// Install the `esp-println` backed logger for the `log` facade
#[cfg(feature = "esp32-log")]
pub fn init_logger() {
    esp_println::logger::init_logger_from_env();
}
