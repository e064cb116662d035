//! Converts canonical timezone names into UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The current UTC offset of `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// The offset is taken at the current instant, so it follows daylight saving.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the name is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Result<UtcOffset, Error> {
    offset_at(canonical_timezone, OffsetDateTime::now_utc())
}

fn offset_at(canonical_timezone: &str, instant: OffsetDateTime) -> Result<UtcOffset, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&instant).to_utc())
        .ok_or_else(|| {
            tracing::error!("Invalid timezone {canonical_timezone}");
            Error::InvalidTimezoneError(canonical_timezone.to_owned())
        })
}
