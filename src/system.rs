//! Bring-up and task wiring

use embassy_futures::join::join3;
use embassy_time::Delay;
use embedded_hal_async::delay::DelayNs;

use crate::command::DimmerBus;
use crate::config::{ControllerConfig, PwmConfig};
use crate::controller::GestureController;
use crate::duty::{DutyCommitter, SharedDuty};
use crate::error::Error;
use crate::gesture::{GestureInput, GestureSource};
use crate::ramp::RampEngine;
use crate::{DutyRegister, PwmPeripheral};

/// Configure the PWM output and initialize the gesture sensor
///
/// A PWM failure is fatal and returned as an error. A sensor failure is
/// logged and yields a silent gesture input instead.
pub fn bring_up<P: PwmPeripheral, S: GestureSource>(
    pwm: P,
    sensor: S,
    config: &PwmConfig,
) -> Result<(P::Register, GestureInput<S>), Error> {
    config.validate()?;
    let register = pwm.configure(config).inspect_err(|err| {
        log::error!("pwm: {}", err);
    })?;
    log::info!(
        "pwm: {} Hz, {}-bit, max duty {}",
        config.frequency_hz,
        config.resolution_bits,
        register.max_duty()
    );

    let gestures = GestureInput::begin(sensor);
    Ok((register, gestures))
}

/// All dimmer tasks, ready to be driven by one future
///
/// Firmware that wants separate executor priorities can instead build the
/// committer, engine and controller individually and spawn their `run` methods.
pub struct LightSystem<'a, R, S, D = Delay> {
    controller: GestureController<'a>,
    engine: RampEngine<'a, R, D>,
    committer: DutyCommitter<'a, R>,
    gestures: GestureInput<S>,
    poll_delay: D,
}

impl<'a, R: DutyRegister, S: GestureSource> LightSystem<'a, R, S> {
    /// Create a system driven by the embassy timer
    pub fn new(
        duty: &'a SharedDuty<R>,
        bus: &'a DimmerBus,
        gestures: GestureInput<S>,
        config: ControllerConfig,
    ) -> Self {
        Self::with_delays(duty, bus, gestures, config, Delay, Delay)
    }
}

impl<'a, R: DutyRegister, S: GestureSource, D: DelayNs> LightSystem<'a, R, S, D> {
    /// Create a system with custom delay providers for the ramp and the gesture loop
    pub fn with_delays(
        duty: &'a SharedDuty<R>,
        bus: &'a DimmerBus,
        gestures: GestureInput<S>,
        config: ControllerConfig,
        ramp_delay: D,
        poll_delay: D,
    ) -> Self {
        Self {
            controller: GestureController::new(bus, config),
            engine: RampEngine::new(duty, bus, ramp_delay),
            committer: DutyCommitter::new(duty, config.commit_period),
            gestures,
            poll_delay,
        }
    }

    pub fn controller(&self) -> &GestureController<'a> {
        &self.controller
    }

    /// Run the committer, the ramp engine and the gesture loop concurrently
    pub async fn run(&mut self) -> ! {
        let Self {
            controller,
            engine,
            committer,
            gestures,
            poll_delay,
        } = self;
        log::info!("dimmer: starting");
        // Every runner loops forever
        loop {
            join3(
                committer.run(),
                engine.run(),
                controller.run(gestures, &mut *poll_delay),
            )
            .await;
        }
    }
}
