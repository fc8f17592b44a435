use chrono::{DateTime, NaiveTime, Utc};

/// Source of "now" for date-of-birth, registration and URL expiry math.
///
/// Record dates are computed from [`ReferenceClock::today`], so batches are
/// byte-for-byte reproducible for a whole UTC day with the system clock and
/// forever with a fixed instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceClock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl ReferenceClock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            ReferenceClock::System => Utc::now(),
            ReferenceClock::Fixed(instant) => *instant,
        }
    }

    /// Midnight UTC of the current day.
    pub fn today(&self) -> DateTime<Utc> {
        self.now()
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc()
    }
}
