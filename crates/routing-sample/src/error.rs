use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::error;

use sidecar::SidecarError;

/// Errors a handler can answer with
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    #[error("Transaction amount must not be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Transaction on account '{0}' would overflow its balance")]
    BalanceOverflow(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("State store error: {0}")]
    Store(#[from] SidecarError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NegativeAmount(_)
            | ApiError::BalanceOverflow(_)
            | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        // Client errors carry no body
        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::AccountNotFound("17".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::NegativeAmount(Decimal::NEGATIVE_ONE).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BalanceOverflow("17".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Store(SidecarError::InvalidConfig("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
