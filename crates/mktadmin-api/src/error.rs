use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// 401/404 on a single-product fetch or a mutation. The caller must
    /// drop the session.
    #[error("session is no longer valid (HTTP {status} from {url})")]
    SessionInvalid { status: u16, url: String },

    #[error("unexpected HTTP status {status} from {url}{}", message_suffix(.message))]
    UnexpectedStatus {
        status: u16,
        url: String,
        message: Option<String>,
    },

    /// Client-side input validation failed; no request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("normalization error for product {product_id}: {reason}")]
    Normalization { product_id: String, reason: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiError {
    #[must_use]
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, Self::SessionInvalid { .. })
    }

    /// One-line message for a page-level error banner.
    ///
    /// Uses the server's `message` when it sent one, the validation text for
    /// validation failures, and `fallback` for everything else.
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::UnexpectedStatus {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
