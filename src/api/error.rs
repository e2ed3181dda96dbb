//! Transport error types and normalization

use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub const SERVER_ERROR_MESSAGE: &str = "서버 오류가 발생했습니다.";
pub const NETWORK_ERROR_MESSAGE: &str = "서버에 연결할 수 없습니다. 네트워크를 확인해주세요.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "알 수 없는 오류가 발생했습니다.";

/// Uniform error shape surfaced by the transport client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
    pub code: Option<ErrorCode>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            status: None,
            code: Some(code),
        }
    }

    pub fn network() -> Self {
        Self::new(NETWORK_ERROR_MESSAGE, ErrorCode::Network)
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ERROR_MESSAGE, ErrorCode::Unknown)
    }
}

/// Error classification tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request went out but nothing came back
    Network,
    /// Request could not be built or dispatched
    Request,
    /// Unclassified failure
    Unknown,
    /// Tag supplied by the server in an error body
    Server(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Request => "REQUEST_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
            Self::Server(code) => code.as_str(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional fields of a non-2xx body
#[derive(Debug, Clone, Default)]
pub struct ServerErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
}

impl ServerErrorBody {
    /// Lenient parse. Each field is read on its own, so a malformed `code`
    /// does not discard a usable `message`. Numeric codes keep their digits.
    pub fn parse(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };
        let field = |name: &str| match value.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        Self {
            message: value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            code: field("code"),
        }
    }
}

/// Raw failure observed by the transport, before normalization
#[derive(Debug)]
pub enum TransportFailure {
    /// Server answered with a non-2xx status
    Status { status: u16, body: ServerErrorBody },
    /// Sent, but no response arrived (timeout, refused connection, DNS)
    NoResponse { detail: String },
    /// Could not be constructed or dispatched
    Dispatch { detail: String },
    /// Anything else, e.g. an undecodable success body
    Other { detail: String },
}

impl TransportFailure {
    pub fn detail(&self) -> String {
        match self {
            Self::Status { status, body } => format!(
                "HTTP {status}: {}",
                body.message.as_deref().unwrap_or("<no message>")
            ),
            Self::NoResponse { detail } | Self::Dispatch { detail } | Self::Other { detail } => {
                detail.clone()
            }
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(e: reqwest::Error) -> Self {
        let detail = e.to_string();
        if e.is_builder() {
            Self::Dispatch { detail }
        } else if e.is_timeout() || e.is_connect() || e.is_request() {
            Self::NoResponse { detail }
        } else {
            Self::Other { detail }
        }
    }
}

/// Collapse any transport failure into an [`ApiError`].
///
/// Server fields win when present and non-empty.
pub fn normalize(failure: TransportFailure) -> ApiError {
    match failure {
        TransportFailure::Status { status, body } => ApiError {
            message: body
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| SERVER_ERROR_MESSAGE.to_string()),
            status: Some(status),
            code: body.code.filter(|c| !c.is_empty()).map(ErrorCode::Server),
        },
        TransportFailure::NoResponse { .. } => ApiError::network(),
        TransportFailure::Dispatch { detail } => {
            let message = if detail.is_empty() {
                UNKNOWN_ERROR_MESSAGE.to_string()
            } else {
                detail
            };
            ApiError::new(message, ErrorCode::Request)
        }
        TransportFailure::Other { .. } => ApiError::unknown(),
    }
}
