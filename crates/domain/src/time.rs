//! Temporal constants and helpers. Times throughout the domain are unix
//! seconds (`i64`); clocks are wall-clock, not monotonic.

use chrono::Utc;

/// Small backward tolerance applied to "now" in temporal checks. Absorbs
/// clock skew and request latency between a client reading "now" and
/// the server validating it.
pub const GRACE_PERIOD: i64 = 60;

/// Current wall-clock time, unix seconds.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// `now() - GRACE_PERIOD`, the threshold past-edit/past-delete rules compare
/// event times against.
pub fn grace_floor() -> i64 {
    now() - GRACE_PERIOD
}

pub const SECONDS_PER_WEEK: i64 = 7 * 24 * 3600;
