//! Gesture controller
//!
//! Owns the brightness state. Gestures go through the transition table, and
//! the resulting duty work is handed to the ramp engine as a command. The
//! engine's outcome reports flow back here; this is the only place the state
//! is ever written.

use embedded_hal_async::delay::DelayNs;

use crate::command::{CommandId, DimmerBus, DutyCommand, DutyCommandKind, RampOutcome};
use crate::config::ControllerConfig;
use crate::gesture::{GestureEvent, GestureInput, GestureSource};
use crate::ramp::RampRequest;
use crate::state::{Action, BrightnessState, transition};

pub struct GestureController<'a> {
    // External dependencies and configuration
    bus: &'a DimmerBus,
    config: ControllerConfig,

    // Internal state
    state: BrightnessState,
    last_command: CommandId,
    /// Command the engine is still working on
    pending: Option<CommandId>,
}

impl<'a> GestureController<'a> {
    /// Create a new controller in the off state
    pub fn new(bus: &'a DimmerBus, config: ControllerConfig) -> Self {
        bus.status.publish(BrightnessState::OFF);
        Self {
            bus,
            config,
            state: BrightnessState::OFF,
            last_command: CommandId::default(),
            pending: None,
        }
    }

    pub const fn state(&self) -> BrightnessState {
        self.state
    }

    /// Check if the engine has not reported back on the latest command yet
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a gesture to the state machine
    ///
    /// Returns the command sent to the ramp engine, if any.
    pub fn handle(&mut self, gesture: GestureEvent) -> Option<DutyCommand> {
        let next = transition(self.state, gesture, self.config.brightness_step);
        let kind = match next.action {
            Action::Ignore => {
                if gesture != GestureEvent::None {
                    log::debug!(
                        "gesture: {} ignored, strip is {}",
                        gesture.as_str(),
                        if self.state.is_on { "on" } else { "off" }
                    );
                }
                return None;
            }
            Action::Ramp { from, to } => {
                DutyCommandKind::Ramp(RampRequest::new(from, to, self.config.ramp_duration))
            }
            Action::Set(level) => DutyCommandKind::Set(level),
        };

        match gesture {
            GestureEvent::Up => log::info!("LED strip on"),
            GestureEvent::Down => log::info!("LED strip off"),
            GestureEvent::Left => log::info!("brightness up: {}%", next.state.level),
            GestureEvent::Right => log::info!("brightness down: {}%", next.state.level),
            GestureEvent::None => {}
        }

        self.set_state(next.state);
        Some(self.issue(kind))
    }

    /// Take the engine's latest report, if any
    ///
    /// Reports for superseded commands are dropped. Returns the outcome that
    /// was applied to the state.
    pub fn process_outcome(&mut self) -> Option<RampOutcome> {
        let outcome = self.bus.outcomes.try_take()?;
        if self.pending != Some(outcome.id()) {
            log::debug!("controller: dropping stale outcome {:?}", outcome);
            return None;
        }

        match outcome {
            RampOutcome::Settled { level, .. } => {
                self.pending = None;
                self.set_state(BrightnessState::from_level(level));
                log::info!("brightness: {}%", level);
            }
            RampOutcome::Interrupted { level, .. } => {
                log::warn!("controller: latest command interrupted at {}%", level);
            }
        }
        Some(outcome)
    }

    /// Process pending reports and at most one gesture (non-blocking)
    pub fn poll<S: GestureSource>(&mut self, input: &mut GestureInput<S>) -> Option<DutyCommand> {
        self.process_outcome();
        match input.poll() {
            GestureEvent::None => None,
            gesture => self.handle(gesture),
        }
    }

    /// Poll gestures forever
    pub async fn run<S: GestureSource, D: DelayNs>(
        &mut self,
        input: &mut GestureInput<S>,
        mut delay: D,
    ) -> ! {
        let interval_us =
            u32::try_from(self.config.poll_interval.as_micros()).unwrap_or(u32::MAX);
        if input.is_silent() {
            log::warn!("controller: running without gesture input");
        }
        loop {
            self.poll(input);
            delay.delay_us(interval_us).await;
        }
    }

    fn issue(&mut self, kind: DutyCommandKind) -> DutyCommand {
        self.last_command = self.last_command.next();
        let command = DutyCommand {
            id: self.last_command,
            kind,
        };
        self.pending = Some(command.id);
        self.bus.commands.signal(command);
        command
    }

    fn set_state(&mut self, state: BrightnessState) {
        self.state = state;
        self.bus.status.publish(state);
    }
}
