use chrono_tz::Tz;

use crate::error::ApiError;

pub const BASE_URL_ENV: &str = "FLIGHTS_API_BASE";
pub const ZONE_ENV: &str = "FLIGHTS_API_ZONE";

/// Zone the booking backend writes its offset-less timestamps in.
pub const DEFAULT_ZONE: Tz = chrono_tz::Europe::Amsterdam;

/// Connection settings for one [`ApiClient`](crate::fetch::ApiClient).
///
/// The base URL is fixed for the lifetime of the client. Nothing here is
/// global, so tests can run several independently configured clients.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Seconds. `None` leaves the transport default in place.
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    /// Applied to timestamps that carry no offset.
    pub zone: Tz,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            proxy: None,
            zone: DEFAULT_ZONE,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.base_url.trim().is_empty() {
            return Err(ApiError::Config(format!(
                "base URL is empty — pass --api-base or set {BASE_URL_ENV}"
            )));
        }
        if self.timeout == Some(0) {
            return Err(ApiError::Config("timeout must be at least 1 second".into()));
        }
        Ok(())
    }
}

pub fn parse_zone(name: &str) -> Result<Tz, ApiError> {
    name.parse::<Tz>()
        .map_err(|e| ApiError::Config(format!("unknown time zone \"{name}\" ({e})")))
}
