use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use wreq::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use wreq::{Client, Method};

use crate::config::ApiConfig;
use crate::error::ApiError;

const JSON_MIME: &str = "application/json";

/// A decoded response body: parsed JSON when the server declared it, text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(_) => None,
        }
    }

    /// Human-readable error message the backend put in this body, if any.
    fn message(&self) -> Option<String> {
        match self {
            Self::Text(s) if !s.is_empty() => Some(s.clone()),
            Self::Text(_) => None,
            Self::Json(v) => match v.get("message")? {
                Value::Null | Value::Bool(false) => None,
                Value::String(s) if s.is_empty() => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized with `serde_json`; sets `Content-Type: application/json`
    /// unless the caller already supplied one.
    Json(Value),
    Raw(String),
}

impl From<Value> for RequestBody {
    fn from(v: Value) -> Self {
        Self::Json(v)
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

impl From<&str> for RequestBody {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        config.validate()?;

        let mut builder = Client::builder();

        if let Some(secs) = config.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(ref proxy) = config.proxy {
            let proxy = wreq::Proxy::all(proxy)
                .map_err(|e| ApiError::Config(format!("invalid proxy \"{proxy}\" ({e})")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn url_for(&self, resource: &str) -> String {
        join_url(&self.config.base_url, resource)
    }

    /// Sends one request and decodes the body by its declared content type.
    ///
    /// Any non-2xx status becomes [`ApiError::Status`] carrying the backend's
    /// message, the status code and the decoded body. Transport failures are
    /// returned as-is in [`ApiError::Transport`].
    pub async fn fetch(
        &self,
        resource: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        let url = self.url_for(resource);
        let RequestOptions {
            method,
            mut headers,
            body,
        } = options;

        debug!(%method, %url, "sending request");

        let payload = match body {
            Some(RequestBody::Json(value)) => {
                headers
                    .entry(CONTENT_TYPE)
                    .or_insert(HeaderValue::from_static(JSON_MIME));
                Some(serde_json::to_vec(&value).map_err(|e| ApiError::Decode(e.to_string()))?)
            }
            Some(RequestBody::Raw(text)) => Some(text.into_bytes()),
            None => None,
        };

        let mut request = self.http.request(method, url.as_str()).headers(headers);
        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let response = request.send().await?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains(JSON_MIME));

        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), is_json, "response received");

        let decoded = decode_body(&text, is_json)?;

        if status.is_success() {
            return Ok(decoded);
        }

        let message = decoded
            .message()
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

        Err(ApiError::Status {
            message,
            status: status.as_u16(),
            body: decoded,
        })
    }
}

pub fn join_url(base: &str, resource: &str) -> String {
    let sep = if resource.starts_with('/') { "" } else { "/" };
    format!("{base}{sep}{resource}")
}

pub fn decode_body(text: &str, is_json: bool) -> Result<ResponseBody, ApiError> {
    if !is_json {
        return Ok(ResponseBody::Text(text.to_string()));
    }
    serde_json::from_str(text)
        .map(ResponseBody::Json)
        .map_err(|e| ApiError::Decode(e.to_string()))
}
