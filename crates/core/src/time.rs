use chrono::{DateTime, Days, Utc};

/// Source of "now" for journey commands, swappable for a fixed instant in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// `start` shifted by `offset` calendar days, keeping the time of day.
///
/// Saturates at `start` if the result would leave chrono's representable range.
#[must_use]
pub fn add_calendar_days(start: DateTime<Utc>, offset: usize) -> DateTime<Utc> {
    let offset = u64::try_from(offset).unwrap_or(u64::MAX);
    start.checked_add_days(Days::new(offset)).unwrap_or(start)
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn fixed_clock_is_stable() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), fixed_now());
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn calendar_days_keep_time_of_day() {
        let start = fixed_now();
        let later = add_calendar_days(start, 3);
        assert_eq!(later.day(), start.day() + 3);
        assert_eq!(later.hour(), start.hour());
        assert_eq!(add_calendar_days(start, 0), start);
    }
}
