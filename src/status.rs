//! Published brightness snapshot
//!
//! The controller owns the brightness state. It publishes a copy here after
//! every change so a status endpoint can report it without touching the
//! controller.

use core::cell::Cell;
use core::fmt::Write;

use critical_section::Mutex;
use heapless::String;

use crate::state::BrightnessState;

/// Longest body: "100"
const BODY_CAPACITY: usize = 3;

pub const STATUS_OK: u16 = 200;
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Latest published brightness state
pub struct StatusCell {
    inner: Mutex<Cell<BrightnessState>>,
}

impl StatusCell {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(BrightnessState::OFF)),
        }
    }

    pub(crate) fn publish(&self, state: BrightnessState) {
        critical_section::with(|cs| self.inner.borrow(cs).set(state));
    }

    /// Copy of the latest published state
    pub fn snapshot(&self) -> BrightnessState {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    /// Report for the current state
    pub fn report(&self) -> StatusReport {
        StatusReport::from_state(self.snapshot())
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-text brightness report, ready to be served by an HTTP handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String<BODY_CAPACITY>,
}

impl StatusReport {
    pub fn from_state(state: BrightnessState) -> Self {
        let mut body = String::new();
        // Level is at most three digits
        let _ = write!(body, "{}", state.level);
        Self {
            status: STATUS_OK,
            content_type: CONTENT_TYPE_TEXT,
            body,
        }
    }
}
