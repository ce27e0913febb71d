/// Longest response body kept in an [`ApiError::Http`].
pub(crate) const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `body` is truncated to 200 characters.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    /// The server answered with `success: false`; carries its message.
    #[error("{0}")]
    Rejected(String),

    #[error("session error: {0}")]
    Session(String),
}

impl ApiError {
    pub(crate) fn http(status: u16, body: &str) -> Self {
        ApiError::Http {
            status,
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        }
    }

    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for tripdesk_common::TripdeskError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Session(msg) => tripdesk_common::TripdeskError::Session(msg),
            other => tripdesk_common::TripdeskError::Api(other.to_string()),
        }
    }
}
