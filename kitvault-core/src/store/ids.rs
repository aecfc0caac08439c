use chrono::{DateTime, Utc};

/// Issues timestamp-derived identifiers such as `kit-1719835200000`.
///
/// Millisecond timestamps are forced to be strictly increasing so two
/// records created within the same millisecond still get distinct ids.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last_millis: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id for `prefix` together with the creation time,
    /// truncated to the millisecond precision of the wire format.
    pub fn next(&mut self, prefix: &str) -> (String, DateTime<Utc>) {
        self.next_at(prefix, Utc::now())
    }

    fn next_at(&mut self, prefix: &str, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
        let millis = now.timestamp_millis().max(self.last_millis + 1);
        self.last_millis = millis;
        let created_at = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        (format!("{}-{}", prefix, millis), created_at)
    }
}
