use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use crate::constants::TIMEFMT;
use crate::error::FaultError;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Converts a ComCat `updateTime` (milliseconds since the Unix epoch) into a
/// local datetime.
///
/// Whole seconds come from `floor(ms / 1000)` and the sub-second part from the
/// remainder `ms mod 1000`, so `get_date(1500.0)` is one and a half seconds
/// after the epoch.
pub fn get_date(milliseconds: f64) -> Result<DateTime<Local>> {
    if !milliseconds.is_finite() {
        return Err(FaultError::InvalidTimestamp(milliseconds).into());
    }

    let seconds = (milliseconds / 1000.0).floor();
    let sub_seconds = milliseconds.rem_euclid(1000.0) / 1000.0;

    let mut secs = seconds as i64;
    let mut nanos = (sub_seconds * f64::from(NANOS_PER_SEC)).round() as u32;
    if nanos >= NANOS_PER_SEC {
        secs = secs.saturating_add(1);
        nanos -= NANOS_PER_SEC;
    }

    DateTime::<Utc>::from_timestamp(secs, nanos)
        .map(|utc| utc.with_timezone(&Local))
        .ok_or_else(|| FaultError::InvalidTimestamp(milliseconds).into())
}

/// Timestamp component of a download directory name, e.g. `2024-03-01T13_05_09Z`.
pub fn directory_stamp(now: DateTime<Utc>) -> String {
    let fmt = TIMEFMT.replace(':', "_").replace("%.6f", "");
    now.format(&fmt).to_string()
}
