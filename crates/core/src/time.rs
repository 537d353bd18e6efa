use chrono::{DateTime, Duration, Utc};

/// Source of "now" for response timing and screen tracking.
///
/// Views use the system clock; tests pin it and step it forward explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Moves a fixed clock forward. Has no effect on `Clock::System`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Whole seconds elapsed since `since`, floored and never negative.
    #[must_use]
    pub fn elapsed_seconds(&self, since: DateTime<Utc>) -> u64 {
        let seconds = (self.now() - since).num_seconds();
        u64::try_from(seconds).unwrap_or(0)
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0).unwrap_or_default()
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_seconds_floors_and_clamps() {
        let mut clock = fixed_clock();
        let start = clock.now();
        clock.advance(Duration::milliseconds(2_900));
        assert_eq!(clock.elapsed_seconds(start), 2);
        assert_eq!(clock.elapsed_seconds(start + Duration::seconds(10)), 0);
    }

    #[test]
    fn system_clock_ignores_advance() {
        let mut clock = Clock::System;
        clock.advance(Duration::hours(1));
        assert_eq!(clock, Clock::System);
    }
}
