use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Wrap any failure for a single coin as an upstream (gateway) error naming the coin.
    pub fn coin_failed(coin_id: &str, cause: AppError) -> Self {
        let cause = match cause {
            AppError::ExternalApi(msg) => msg,
            other => other.to_string(),
        };
        AppError::ExternalApi(format!("{} failed: {}", coin_id, cause))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidSeries(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::SerdeJson(_) => StatusCode::BAD_REQUEST,
            AppError::Csv(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::InvalidSeries(_)
            | AppError::NotFound(_)
            | AppError::BadRequest(_)
            | AppError::ExternalApi(_) => self.to_string(),
            AppError::SerdeJson(e) => e.to_string(),
            AppError::Csv(e) => e.to_string(),
            AppError::Io(e) => e.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
