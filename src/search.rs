use chrono_tz::Tz;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::fetch::{ApiClient, RequestOptions, ResponseBody};
use crate::model::{Itinerary, RawFlightPath};
use crate::query::SearchQuery;
use crate::transform::transform_flight_path;

impl ApiClient {
    /// Searches itineraries between two airports around a local date-time.
    ///
    /// Fails with [`ApiError::MissingParameters`] before any request if an
    /// argument is empty, and with [`ApiError::UnexpectedFormat`] if the
    /// backend answers with anything but a JSON array.
    pub async fn search_flights(
        &self,
        departure: &str,
        arrival: &str,
        datetime: &str,
    ) -> Result<Vec<Itinerary>, ApiError> {
        let query = SearchQuery::new(departure, arrival, datetime)?;
        self.search(&query).await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Itinerary>, ApiError> {
        let body = self
            .list(&query.resource(), RequestOptions::default())
            .await?;
        let itineraries = transform_response(body, self.config().zone)?;
        debug!(
            departure = %query.departure,
            arrival = %query.arrival,
            count = itineraries.len(),
            "search complete"
        );
        Ok(itineraries)
    }
}

pub fn transform_response(body: ResponseBody, zone: Tz) -> Result<Vec<Itinerary>, ApiError> {
    let value = match body.into_json() {
        Some(v @ Value::Array(_)) => v,
        _ => return Err(ApiError::UnexpectedFormat),
    };

    let paths: Vec<RawFlightPath> =
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

    paths.iter().map(|p| transform_flight_path(p, zone)).collect()
}
