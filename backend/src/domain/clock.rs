use chrono::{Local, NaiveDateTime, Timelike};

/// Current local wall-clock time, truncated to the millisecond precision
/// that backup manifests can represent.
pub fn now_local_millis() -> NaiveDateTime {
    let now = Local::now().naive_local();
    let millis = now.nanosecond() / 1_000_000 * 1_000_000;
    now.with_nanosecond(millis).unwrap_or(now)
}
