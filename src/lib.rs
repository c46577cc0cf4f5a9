pub mod config;
pub mod duration;
pub mod error;
pub mod fetch;
pub mod model;
pub mod query;
pub mod resource;
pub mod search;
pub mod table;
pub mod transform;

pub use config::ApiConfig;
pub use error::ApiError;
pub use fetch::{ApiClient, RequestBody, RequestOptions, ResponseBody};
pub use model::{DisplayFlight, Itinerary, RawFlight};

/// One-shot search against `config`, building a client for the call.
pub async fn search_flights(
    config: ApiConfig,
    departure: &str,
    arrival: &str,
    datetime: &str,
) -> Result<Vec<Itinerary>, ApiError> {
    let client = ApiClient::new(config)?;
    client.search_flights(departure, arrival, datetime).await
}
