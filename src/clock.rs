use time::{Duration, OffsetDateTime};

/// Current UTC time truncated to whole seconds.
///
/// Stored timestamps share one fixed-width RFC 3339 shape, so SQLite can
/// order and range-compare them as text.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds(i64::from(now.nanosecond()))
}
