use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, SecondsFormat, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ApiError;

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Renders minutes as "H hour(s) M minute(s)".
///
/// Hours are floored and minutes keep the sign of the input, so negative
/// gaps produce odd but deterministic text such as "-1 hours -30 minutes".
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes.div_euclid(60);
    let mins = minutes % 60;
    format!(
        "{hours} hour{} {mins} minute{}",
        plural(hours),
        plural(mins)
    )
}

/// Whole minutes from `start` to `end`, rounded toward negative infinity.
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_milliseconds().div_euclid(60_000)
}

/// Parses a backend timestamp. Date-times without an offset are wall-clock
/// times in `zone`.
pub fn parse_instant(value: &str, zone: Tz) -> Result<DateTime<Utc>, ApiError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .and_then(|naive| resolve_local(naive, zone))
        .ok_or_else(|| ApiError::InvalidTimestamp(value.to_string()))
}

/// Maps a wall-clock time in `zone` to an instant.
///
/// A repeated hour (autumn fold) resolves to its first occurrence. A skipped
/// hour (spring gap) uses the offset in force just before the gap.
pub fn resolve_local(naive: NaiveDateTime, zone: Tz) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let before = zone
                .from_local_datetime(&naive.checked_sub_signed(TimeDelta::hours(1))?)
                .earliest()?;
            let offset = i64::from(before.offset().fix().local_minus_utc());
            naive
                .checked_sub_signed(TimeDelta::seconds(offset))
                .map(|utc| utc.and_utc())
        }
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2025-08-01T14:30:00.000Z`.
pub fn to_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
