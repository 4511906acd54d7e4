use time::{Duration, OffsetDateTime};

/// Absolute expiry instant for a search job. Every job write resets this, so
/// an actively-updated job never expires mid-flight while an abandoned one
/// becomes unreadable after one idle TTL window.
pub fn job_expires_at(now: OffsetDateTime, ttl_minutes: i64) -> OffsetDateTime {
	now + Duration::minutes(ttl_minutes)
}
