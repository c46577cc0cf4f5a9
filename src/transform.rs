use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::duration::{format_duration, minutes_between, parse_instant, to_iso};
use crate::error::ApiError;
use crate::model::{DisplayFlight, Itinerary, RawFlight};

struct Leg {
    display: DisplayFlight,
    departs: DateTime<Utc>,
    arrives: DateTime<Utc>,
}

fn transform_leg(raw: &RawFlight, zone: Tz) -> Result<Leg, ApiError> {
    let departs = parse_instant(&raw.departure_time, zone)?;
    let arrives = parse_instant(&raw.arrival_time, zone)?;
    let minutes = minutes_between(departs, arrives);

    let display = DisplayFlight {
        flight_number: raw.flight_number.to_string(),
        departure: raw.flight_departure.clone(),
        arrival: raw.flight_destination.clone(),
        departure_time: to_iso(departs),
        arrival_time: to_iso(arrives),
        duration: format_duration(minutes),
        duration_minutes: minutes,
    };

    Ok(Leg {
        display,
        departs,
        arrives,
    })
}

/// Offset-less timestamps in `raw` are read as wall-clock times in `zone`.
pub fn transform_flight(raw: &RawFlight, zone: Tz) -> Result<DisplayFlight, ApiError> {
    transform_leg(raw, zone).map(|leg| leg.display)
}

/// Summarizes one itinerary: per-leg durations, layovers and totals.
///
/// Totals are summed from raw minutes and formatted once.
pub fn transform_flight_path(path: &[RawFlight], zone: Tz) -> Result<Itinerary, ApiError> {
    let legs = path
        .iter()
        .map(|raw| transform_leg(raw, zone))
        .collect::<Result<Vec<_>, _>>()?;

    let gaps: Vec<i64> = legs
        .windows(2)
        .map(|pair| minutes_between(pair[0].arrives, pair[1].departs))
        .collect();

    let total_minutes: i64 = legs.iter().map(|l| l.display.duration_minutes).sum();
    let total_transfer_minutes: i64 = gaps.iter().sum();

    Ok(Itinerary {
        total_duration: format_duration(total_minutes),
        total_minutes,
        total_transfers: legs.len().saturating_sub(1),
        total_transfer_duration: format_duration(total_transfer_minutes),
        total_transfer_minutes,
        transfers: gaps.into_iter().map(format_duration).collect(),
        flights: legs.into_iter().map(|l| l.display).collect(),
    })
}
