//! Ramp engine
//!
//! Sweeps the duty register from one level to another in a fixed number of
//! steps. The engine is the only writer of the staged duty value: immediate
//! writes are commands too, so a ramp and a direct write can never interleave.
//!
//! A newer command preempts the running ramp between steps. The engine then
//! continues with the new command starting from whatever level it staged last.

use embassy_futures::select::{Either, select};
use embassy_time::{Delay, Duration};
use embedded_hal_async::delay::DelayNs;

use crate::DutyRegister;
use crate::command::{DimmerBus, DutyCommand, DutyCommandKind, RampOutcome};
use crate::duty::SharedDuty;
use crate::gamma::{duty_to_level, level_to_duty};
use crate::state::MAX_LEVEL;

/// Number of duty writes per ramp, independent of the level delta
pub const RAMP_STEPS: u8 = 100;

/// Request to sweep between two levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampRequest {
    pub from: u8,
    pub to: u8,
    pub duration: Duration,
}

impl RampRequest {
    /// Create a new request, clamping levels to `0..=MAX_LEVEL`
    pub const fn new(from: u8, to: u8, duration: Duration) -> Self {
        Self {
            from: clamp_level(from),
            to: clamp_level(to),
            duration,
        }
    }

    /// Same sweep target, starting at another level
    #[must_use]
    pub const fn starting_at(self, level: u8) -> Self {
        Self::new(level, self.to, self.duration)
    }

    /// Level staged at `step` (1..=RAMP_STEPS)
    ///
    /// Step `RAMP_STEPS` is always exactly `to`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn level_at(&self, step: u8) -> u8 {
        let step = if step > RAMP_STEPS { RAMP_STEPS } else { step };
        let from = self.from as i32;
        let delta = self.to as i32 - from;
        (from + delta * step as i32 / RAMP_STEPS as i32) as u8
    }

    /// Delay between two steps
    ///
    /// Floored to whole timer ticks. Very short ramps may end up with a zero
    /// interval, which just finishes them in fewer visible steps.
    pub const fn step_interval(&self) -> Duration {
        Duration::from_ticks(self.duration.as_ticks() / RAMP_STEPS as u64)
    }

    pub const fn is_ascending(&self) -> bool {
        self.to > self.from
    }
}

const fn clamp_level(level: u8) -> u8 {
    if level > MAX_LEVEL { MAX_LEVEL } else { level }
}

/// How a ramp stopped
enum RampEnd {
    Finished,
    Preempted(DutyCommand),
}

/// Executes duty commands against the shared register
pub struct RampEngine<'a, R, D = Delay> {
    duty: &'a SharedDuty<R>,
    bus: &'a DimmerBus,
    delay: D,
    /// Last staged level
    level: u8,
}

impl<'a, R: DutyRegister, D: DelayNs> RampEngine<'a, R, D> {
    /// Create a new ramp engine
    ///
    /// The starting level is recovered from the register's staged value.
    pub fn new(duty: &'a SharedDuty<R>, bus: &'a DimmerBus, delay: D) -> Self {
        let level = duty_to_level(duty.staged(), duty.max_duty());
        Self {
            duty,
            bus,
            delay,
            level,
        }
    }

    /// Last staged level
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Wait for commands and execute them forever
    pub async fn run(&mut self) -> ! {
        loop {
            let command = self.bus.commands.wait().await;
            self.execute(command).await;
        }
    }

    /// Execute a command, following any commands that preempt it
    ///
    /// Returns once the latest command has finished.
    pub async fn execute(&mut self, command: DutyCommand) {
        let mut command = command;
        loop {
            match command.kind {
                DutyCommandKind::Set(level) => {
                    self.stage(level);
                    self.report(RampOutcome::Settled {
                        id: command.id,
                        level: self.level,
                    });
                    return;
                }
                DutyCommandKind::Ramp(request) => match self.ramp(request).await {
                    RampEnd::Finished => {
                        log::debug!("ramp: finished at {}%", self.level);
                        self.report(RampOutcome::Settled {
                            id: command.id,
                            level: self.level,
                        });
                        return;
                    }
                    RampEnd::Preempted(next) => {
                        log::debug!("ramp: preempted at {}%", self.level);
                        self.report(RampOutcome::Interrupted {
                            id: command.id,
                            level: self.level,
                        });
                        command = next;
                    }
                },
            }
        }
    }

    async fn ramp(&mut self, request: RampRequest) -> RampEnd {
        // The staged level is authoritative, e.g. after a preempted ramp
        let request = if request.from == self.level {
            request
        } else {
            request.starting_at(self.level)
        };
        let interval_us = u32::try_from(request.step_interval().as_micros()).unwrap_or(u32::MAX);
        log::debug!(
            "ramp: {}% -> {}% in {} ms",
            request.from,
            request.to,
            request.duration.as_millis()
        );

        let bus = self.bus;
        for step in 1..=RAMP_STEPS {
            if let Some(next) = bus.commands.try_take() {
                return RampEnd::Preempted(next);
            }
            self.stage(request.level_at(step));

            if let Either::First(next) =
                select(bus.commands.wait(), self.delay.delay_us(interval_us)).await
            {
                return RampEnd::Preempted(next);
            }
        }
        RampEnd::Finished
    }

    fn stage(&mut self, level: u8) {
        let level = clamp_level(level);
        self.duty
            .with(|register| register.set(level_to_duty(level, register.max_duty())));
        self.level = level;
    }

    fn report(&self, outcome: RampOutcome) {
        self.bus.outcomes.signal(outcome);
    }
}
