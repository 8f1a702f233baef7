//! Age-based record expiry.
//!
//! A record expires once its age is strictly greater than the caller's
//! maximum age:
//!
//! ```text
//!   age = now - timestamp
//!   age <  0        → never expired (clock moved backwards)
//!   age <= max_age  → kept
//!   age >  max_age  → expired
//! ```
//!
//! Ages are measured against the wall clock, so adjusting the system clock
//! shifts what counts as old.

use chrono::{DateTime, Duration, Utc};

/// Age of a record stamped at `timestamp`, or `None` if it lies in the future.
#[must_use]
pub fn age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Option<Duration> {
    let age = now.signed_duration_since(timestamp);
    if age < Duration::zero() {
        None // clock skew guard
    } else {
        Some(age)
    }
}

/// Whether a record stamped at `timestamp` is older than `max_age`.
#[must_use]
pub fn is_expired(timestamp: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    age(timestamp, now).is_some_and(|age| age > max_age)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("valid timestamp")
    }

    #[test]
    fn exactly_max_age_is_kept() {
        assert!(!is_expired(at(1_000), at(1_060), Duration::seconds(60)));
    }

    #[test]
    fn older_than_max_age_expires() {
        assert!(is_expired(at(1_000), at(1_061), Duration::seconds(60)));
        assert!(is_expired(
            at(1_000),
            at(1_060) + Duration::milliseconds(1),
            Duration::seconds(60)
        ));
    }

    #[test]
    fn future_timestamps_never_expire() {
        assert_eq!(age(at(2_000), at(1_000)), None);
        assert!(!is_expired(at(2_000), at(1_000), Duration::zero()));
    }

    #[test]
    fn zero_max_age_expires_anything_older_than_now() {
        assert!(!is_expired(at(1_000), at(1_000), Duration::zero()));
        assert!(is_expired(at(1_000), at(1_001), Duration::zero()));
    }
}
