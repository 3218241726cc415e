use axum::http::StatusCode;

/// Failure of a single store round trip. The dashboard treats every variant
/// the same way; the split exists for logs.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data is invalid: {0}")]
    Data(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid number: '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{0} must be set when VAX_STORE_URL is configured")]
    Missing(&'static str),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
