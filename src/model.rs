use std::fmt;

use serde::{Deserialize, Serialize};

/// Backends send flight numbers either as JSON numbers or as strings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FlightNumber {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FlightNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // 1001.0 prints as 1001, the way JavaScript numbers stringify.
            Self::Number(n) => match n.as_f64() {
                Some(v) if n.is_f64() && v == 0.0 => f.write_str("0"),
                Some(v) if n.is_f64() && v.is_finite() && v.fract() == 0.0 => write!(f, "{v}"),
                _ => write!(f, "{n}"),
            },
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlight {
    pub flight_number: FlightNumber,
    pub flight_departure: String,
    pub flight_destination: String,
    pub departure_time: String,
    pub arrival_time: String,
}

pub type RawFlightPath = Vec<RawFlight>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFlight {
    pub flight_number: String,
    pub departure: String,
    pub arrival: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub flights: Vec<DisplayFlight>,
    pub total_duration: String,
    pub total_minutes: i64,
    pub total_transfers: usize,
    pub total_transfer_duration: String,
    pub total_transfer_minutes: i64,
    pub transfers: Vec<String>,
}

impl Itinerary {
    pub fn origin(&self) -> Option<&str> {
        self.flights.first().map(|f| f.departure.as_str())
    }

    /// Airports where the traveller changes planes.
    pub fn stopovers(&self) -> Vec<&str> {
        match self.flights.split_last() {
            Some((_, init)) => init.iter().map(|f| f.arrival.as_str()).collect(),
            None => Vec::new(),
        }
    }
}
