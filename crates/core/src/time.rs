use chrono::{DateTime, Duration, Utc};

/// Time source for sessions, fixed in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
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
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Moves a fixed clock forward. No effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Time allotted to a timed simulation.
///
/// A zero budget means the session is untimed and never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBudget {
    started_at: DateTime<Utc>,
    allowed: Duration,
}

impl TimeBudget {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, allowed: Duration) -> Self {
        Self {
            started_at,
            allowed,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.allowed > Duration::zero()
    }

    /// Remaining time, clamped at zero. `None` when untimed.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_timed() {
            return None;
        }
        let elapsed = now - self.started_at;
        Some((self.allowed - elapsed).max(Duration::zero()))
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now).is_some_and(|left| left <= Duration::zero())
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
