use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single API call.
///
/// Errors are passed back exactly as they occurred; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read
    /// (connection refused, DNS failure, timeout).
    #[error("request to Climate TRACE failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Climate TRACE request {url} failed with status {status}: {body}")]
    Status {
        status: StatusCode,
        url: String,
        /// Response body, truncated.
        body: String,
    },

    /// The body was not the JSON shape the endpoint is expected to return.
    #[error("failed to parse Climate TRACE response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub(crate) fn status(status: StatusCode, url: &str, body: &str) -> Self {
        ApiError::Status {
            status,
            url: url.to_string(),
            body: truncate_body(body),
        }
    }

    /// HTTP status of the response, when there was one.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Parse { .. } => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ApiError::Parse { .. })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
