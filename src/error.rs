use std::fmt;

use crate::fetch::ResponseBody;

pub const MISSING_PARAMETERS: &str = "Missing required parameters";
pub const UNEXPECTED_FORMAT: &str = "Unexpected response format from server";

#[derive(Debug)]
pub enum ApiError {
    MissingParameters,
    UnexpectedFormat,
    Status {
        message: String,
        status: u16,
        body: ResponseBody,
    },
    Transport(wreq::Error),
    Decode(String),
    InvalidTimestamp(String),
    Config(String),
}

impl ApiError {
    /// Status code of a backend rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::MissingParameters | Self::UnexpectedFormat)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameters => f.write_str(MISSING_PARAMETERS),
            Self::UnexpectedFormat => f.write_str(UNEXPECTED_FORMAT),
            Self::Status { message, .. } => f.write_str(message),
            Self::Transport(err) => write!(f, "{err}"),
            Self::Decode(detail) => write!(f, "failed to decode response body — {detail}"),
            Self::InvalidTimestamp(value) => write!(
                f,
                "invalid timestamp \"{value}\" — expected ISO-8601 (e.g. 2025-08-01T14:30:00)"
            ),
            Self::Config(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<wreq::Error> for ApiError {
    fn from(err: wreq::Error) -> Self {
        Self::Transport(err)
    }
}

/// Coarse category of a transport failure, used for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Dns,
    Connect,
    Proxy,
    Tls,
    Other,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Dns => "dns_error",
            Self::Connect => "connection_failed",
            Self::Proxy => "proxy_error",
            Self::Tls => "tls_error",
            Self::Other => "transport_error",
        }
    }
}

pub fn classify_transport(err: &wreq::Error) -> TransportKind {
    if err.is_timeout() {
        return TransportKind::Timeout;
    }
    classify_message(&err.to_string(), err.is_connect())
}

fn classify_message(msg: &str, is_connect: bool) -> TransportKind {
    let lower = msg.to_lowercase();

    if is_connect {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("getaddrinfo") {
            return TransportKind::Dns;
        }
        return TransportKind::Connect;
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return TransportKind::Proxy;
    }

    if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        return TransportKind::Tls;
    }

    TransportKind::Other
}
