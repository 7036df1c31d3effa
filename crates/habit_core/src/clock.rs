//! Source of "today" for use cases that act on the current date.
//!
//! Create and toggle never take the date from the request; they ask a
//! `Clock`, which tests replace with `FixedClock`.

use chrono::{Local, NaiveDate};

pub trait Clock {
    /// Current calendar day (start of day, no time component).
    fn today(&self) -> NaiveDate;
}

/// Server wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
