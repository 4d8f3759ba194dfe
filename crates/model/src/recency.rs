use chrono::{DateTime, TimeDelta, Utc};

/// How far back a publication still counts as recent.
pub fn window() -> TimeDelta {
    TimeDelta::days(1)
}

/// Checks whether `pub_date` falls within the last day relative to `now`.
/// The window is half-open: exactly one day ago is no longer recent, but
/// exactly `now` is. Anything in the future is never recent.
pub fn was_published_recently(pub_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    if pub_date > now {
        return false;
    }

    // Near the minimum representable timestamp, nothing can be older than a day.
    match now.checked_sub_signed(window()) {
        Some(start) => start < pub_date,
        None => true,
    }
}
