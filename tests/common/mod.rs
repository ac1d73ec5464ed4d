#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use gesture_dimmer::{DutyRegister, Error, GestureEvent, GestureSource, PwmConfig, PwmPeripheral};

pub const MAX_DUTY: u16 = 4095;

/// Duty register that remembers every staged value
#[derive(Debug, Default)]
pub struct RecordingRegister {
    pub max: u16,
    pub staged: u16,
    pub active: u16,
    pub writes: Vec<u16>,
    pub commits: usize,
}

impl RecordingRegister {
    pub fn new() -> Self {
        Self::with_max(MAX_DUTY)
    }

    pub fn with_max(max: u16) -> Self {
        Self {
            max,
            ..Self::default()
        }
    }

    pub fn staged_at(max: u16, staged: u16) -> Self {
        Self {
            max,
            staged,
            active: staged,
            ..Self::default()
        }
    }
}

impl DutyRegister for RecordingRegister {
    fn max_duty(&self) -> u16 {
        self.max
    }

    fn set(&mut self, duty: u16) {
        self.staged = duty;
        self.writes.push(duty);
    }

    fn commit(&mut self) {
        self.active = self.staged;
        self.commits += 1;
    }

    fn staged(&self) -> u16 {
        self.staged
    }
}

/// PWM peripheral that hands out a recording register
pub struct FakePwm {
    pub fail: bool,
}

impl PwmPeripheral for FakePwm {
    type Register = RecordingRegister;

    fn configure(self, config: &PwmConfig) -> Result<RecordingRegister, Error> {
        if self.fail {
            return Err(Error::PwmPeripheral);
        }
        Ok(RecordingRegister::with_max(config.max_duty()))
    }
}

/// Gesture source that replays a fixed script, then stays idle
#[derive(Default)]
pub struct ScriptedGestures {
    script: VecDeque<GestureEvent>,
    pub fail_begin: bool,
}

impl ScriptedGestures {
    pub fn new(script: &[GestureEvent]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            fail_begin: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_begin: true,
            ..Self::default()
        }
    }
}

impl GestureSource for ScriptedGestures {
    fn begin(&mut self) -> Result<(), Error> {
        if self.fail_begin {
            Err(Error::SensorInit)
        } else {
            Ok(())
        }
    }

    fn poll(&mut self) -> GestureEvent {
        self.script.pop_front().unwrap_or(GestureEvent::None)
    }
}

/// Virtual time shared between a test and its delays
#[derive(Default)]
pub struct VirtualClock {
    elapsed_ns: Cell<u64>,
    delays: Cell<usize>,
}

impl VirtualClock {
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns.get() / 1_000
    }

    pub fn delays(&self) -> usize {
        self.delays.get()
    }
}

/// Delay that completes immediately and advances a virtual clock
///
/// `hook` runs with the number of delays so far, after the clock advanced.
pub struct VirtualDelay<'a, F> {
    clock: &'a VirtualClock,
    hook: F,
}

fn no_hook(_: usize) {}

impl<'a> VirtualDelay<'a, fn(usize)> {
    pub fn new(clock: &'a VirtualClock) -> Self {
        Self {
            clock,
            hook: no_hook,
        }
    }
}

impl<'a, F: FnMut(usize)> VirtualDelay<'a, F> {
    pub fn with_hook(clock: &'a VirtualClock, hook: F) -> Self {
        Self { clock, hook }
    }
}

impl<F: FnMut(usize)> DelayNs for VirtualDelay<'_, F> {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock
            .elapsed_ns
            .set(self.clock.elapsed_ns.get() + u64::from(ns));
        let delays = self.clock.delays.get() + 1;
        self.clock.delays.set(delays);
        (self.hook)(delays);
    }
}

/// Check that values never decrease
pub fn is_non_decreasing(values: &[u16]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Check that values never increase
pub fn is_non_increasing(values: &[u16]) -> bool {
    values.windows(2).all(|pair| pair[0] >= pair[1])
}
