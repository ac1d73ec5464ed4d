//! Shared duty register and the periodic committer
//!
//! The register is shared between the ramp engine, which stages values, and
//! the committer, which latches them. Both go through critical sections, so a
//! commit always latches the most recently staged value.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant, Timer};

use crate::DutyRegister;

/// A duty register shared between tasks
pub struct SharedDuty<R> {
    inner: Mutex<RefCell<R>>,
}

impl<R: DutyRegister> SharedDuty<R> {
    pub const fn new(register: R) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(register)),
        }
    }

    /// Stage a new duty value
    pub fn stage(&self, duty: u16) {
        self.with(|register| register.set(duty));
    }

    /// Latch the staged value
    pub fn commit(&self) {
        self.with(R::commit);
    }

    /// Read back the staged value
    pub fn staged(&self) -> u16 {
        self.with(|register| register.staged())
    }

    pub fn max_duty(&self) -> u16 {
        self.with(|register| register.max_duty())
    }

    /// Run `f` with exclusive access to the register
    pub fn with<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        critical_section::with(|cs| f(&mut *self.inner.borrow(cs).borrow_mut()))
    }
}

/// Periodically latches staged duty values into the PWM output
///
/// The hardware is double-buffered, so nothing staged becomes visible until
/// it is committed. The committer has no other logic.
pub struct DutyCommitter<'a, R> {
    duty: &'a SharedDuty<R>,
    period: Duration,
    next_commit: Instant,
}

impl<'a, R: DutyRegister> DutyCommitter<'a, R> {
    pub fn new(duty: &'a SharedDuty<R>, period: Duration) -> Self {
        Self {
            duty,
            period,
            next_commit: Instant::now(),
        }
    }

    /// Commit once and wait for the next deadline
    pub async fn tick(&mut self) {
        let now = Instant::now();

        // If we've fallen more than two periods behind, resync instead of
        // bursting through the backlog
        if now > self.next_commit + self.period * 2 {
            self.next_commit = now;
        }

        self.duty.commit();

        self.next_commit += self.period;
        Timer::at(self.next_commit).await;
    }

    /// Commit forever
    pub async fn run(&mut self) -> ! {
        log::debug!("committer: started, period {} us", self.period.as_micros());
        loop {
            self.tick().await;
        }
    }
}
