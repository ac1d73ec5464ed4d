//! Gesture input
//!
//! The sensor driver is an external collaborator. The controller only needs a
//! non-blocking way to ask for the latest recognized gesture.

use crate::error::Error;

const GESTURE_NAME_UP: &str = "up";
const GESTURE_NAME_DOWN: &str = "down";
const GESTURE_NAME_LEFT: &str = "left";
const GESTURE_NAME_RIGHT: &str = "right";
const GESTURE_NAME_NONE: &str = "none";

const GESTURE_CODE_UP: i32 = 0;
const GESTURE_CODE_DOWN: i32 = 1;
const GESTURE_CODE_LEFT: i32 = 2;
const GESTURE_CODE_RIGHT: i32 = 3;

/// Directional gesture recognized by the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureEvent {
    Up,
    Down,
    Left,
    Right,
    /// No gesture recognized
    #[default]
    None,
}

impl GestureEvent {
    /// Decode a raw gesture code reported by the sensor driver
    ///
    /// Unknown codes (including the driver's "no gesture" value) decode as `None`.
    pub const fn from_code(code: i32) -> Self {
        match code {
            GESTURE_CODE_UP => GestureEvent::Up,
            GESTURE_CODE_DOWN => GestureEvent::Down,
            GESTURE_CODE_LEFT => GestureEvent::Left,
            GESTURE_CODE_RIGHT => GestureEvent::Right,
            _ => GestureEvent::None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GestureEvent::Up => GESTURE_NAME_UP,
            GestureEvent::Down => GESTURE_NAME_DOWN,
            GestureEvent::Left => GESTURE_NAME_LEFT,
            GestureEvent::Right => GESTURE_NAME_RIGHT,
            GestureEvent::None => GESTURE_NAME_NONE,
        }
    }
}

/// Source of gesture events
///
/// Implement this trait for the gesture sensor driver.
pub trait GestureSource {
    /// Initialize the sensor
    fn begin(&mut self) -> Result<(), Error>;

    /// Return the next recognized gesture without blocking
    ///
    /// Returns [`GestureEvent::None`] when nothing was recognized.
    fn poll(&mut self) -> GestureEvent;
}

/// Gesture input after initialization
///
/// A sensor that failed to initialize is replaced by a silent input, so the
/// rest of the system keeps running with no gestures ever recognized.
pub enum GestureInput<S> {
    Active(S),
    Silent,
}

impl<S: GestureSource> GestureInput<S> {
    /// Initialize the sensor, degrading to a silent input on failure
    pub fn begin(mut source: S) -> Self {
        match source.begin() {
            Ok(()) => GestureInput::Active(source),
            Err(err) => {
                log::error!("gesture: sensor init failed ({}), gestures disabled", err);
                GestureInput::Silent
            }
        }
    }

    pub const fn is_silent(&self) -> bool {
        matches!(self, GestureInput::Silent)
    }

    /// Poll the underlying source, if any
    pub fn poll(&mut self) -> GestureEvent {
        match self {
            GestureInput::Active(source) => source.poll(),
            GestureInput::Silent => GestureEvent::None,
        }
    }
}
