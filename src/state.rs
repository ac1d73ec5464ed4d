//! Logical brightness state and the gesture transition table

use crate::gesture::GestureEvent;

/// Highest brightness level, in percent
pub const MAX_LEVEL: u8 = 100;

/// Logical brightness of the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrightnessState {
    pub is_on: bool,
    /// Brightness in percent (0-100)
    pub level: u8,
}

impl BrightnessState {
    pub const OFF: Self = Self {
        is_on: false,
        level: 0,
    };

    /// State for a strip that is on at `level`
    pub const fn on(level: u8) -> Self {
        Self { is_on: true, level }
    }

    /// State matching a level reported by the ramp engine
    ///
    /// A level of zero always means the strip is off.
    pub const fn from_level(level: u8) -> Self {
        if level == 0 {
            Self::OFF
        } else {
            Self::on(level)
        }
    }
}

/// What the controller has to do with the duty register after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing changes
    Ignore,
    /// Sweep to `to` over the configured ramp duration
    Ramp { from: u8, to: u8 },
    /// Write the level without a ramp
    Set(u8),
}

/// Result of feeding one gesture into the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: BrightnessState,
    pub action: Action,
}

impl Transition {
    const fn ignore(state: BrightnessState) -> Self {
        Self {
            state,
            action: Action::Ignore,
        }
    }
}

/// Gesture transition table
///
/// | gesture | off                 | on(level)                          |
/// |---------|---------------------|------------------------------------|
/// | up      | ramp 0 -> 100       | -                                  |
/// | down    | -                   | ramp level -> 0, off               |
/// | left    | -                   | level + step (max 100), set        |
/// | right   | -                   | level - step, off at 0, set        |
/// | none    | -                   | -                                  |
pub const fn transition(state: BrightnessState, gesture: GestureEvent, step: u8) -> Transition {
    match (state.is_on, gesture) {
        (false, GestureEvent::Up) => Transition {
            state: BrightnessState::on(MAX_LEVEL),
            action: Action::Ramp {
                from: state.level,
                to: MAX_LEVEL,
            },
        },
        (true, GestureEvent::Down) => Transition {
            state: BrightnessState::OFF,
            action: Action::Ramp {
                from: state.level,
                to: 0,
            },
        },
        (true, GestureEvent::Left) => {
            let level = step_level(state.level, step as i16);
            Transition {
                state: BrightnessState::on(level),
                action: Action::Set(level),
            }
        }
        (true, GestureEvent::Right) => {
            let level = step_level(state.level, -(step as i16));
            Transition {
                state: BrightnessState::from_level(level),
                action: Action::Set(level),
            }
        }
        (true, GestureEvent::Up)
        | (false, GestureEvent::Down | GestureEvent::Left | GestureEvent::Right)
        | (_, GestureEvent::None) => Transition::ignore(state),
    }
}

/// Shift a level by a signed delta, clamped to `0..=MAX_LEVEL`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn step_level(level: u8, delta: i16) -> u8 {
    let next = level as i16 + delta;
    if next <= 0 {
        0
    } else if next >= MAX_LEVEL as i16 {
        MAX_LEVEL
    } else {
        next as u8
    }
}
