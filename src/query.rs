use url::form_urlencoded;

use crate::error::ApiError;

pub const SEARCH_RESOURCE: &str = "flights/search";

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub departure: String,
    pub arrival: String,
    pub datetime: String,
}

impl SearchQuery {
    /// Checks presence, then trims the airport codes. `datetime` is kept as given.
    pub fn new(departure: &str, arrival: &str, datetime: &str) -> Result<Self, ApiError> {
        if departure.is_empty() || arrival.is_empty() || datetime.is_empty() {
            return Err(ApiError::MissingParameters);
        }
        Ok(Self {
            departure: departure.trim().to_string(),
            arrival: arrival.trim().to_string(),
            datetime: datetime.to_string(),
        })
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("departure", &self.departure)
            .append_pair("arrival", &self.arrival)
            .append_pair("datetime", &self.datetime)
            .finish()
    }

    pub fn resource(&self) -> String {
        format!("{SEARCH_RESOURCE}?{}", self.to_query_string())
    }
}

/// Joins a `YYYY-MM-DD` date and an `HH:MM` time into the backend's
/// `YYYY-MM-DDTHH:MM:00` form. Empty if either part is missing.
pub fn format_datetime_for_api(date: &str, time: &str) -> String {
    if date.is_empty() || time.is_empty() {
        return String::new();
    }
    format!("{date}T{time}:00")
}
