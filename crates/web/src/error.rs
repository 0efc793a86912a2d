//! Unified error handling for the web layer.
//!
//! Provides a unified `AppError` type mapped to HTTP responses. All route
//! handlers that can fail return `Result<T, AppError>`. The cart module
//! itself never errors; everything here comes from the store and workflow
//! layers or from bad client input.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use almacen_core::WorkflowError;

use crate::store::StoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request-store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Store(err) => match err {
                StoreError::UnknownRequest(_) => StatusCode::NOT_FOUND,
                StoreError::Workflow(WorkflowError::EmptyCart) => StatusCode::BAD_REQUEST,
                StoreError::Workflow(_) | StoreError::StageMismatch { .. } => StatusCode::CONFLICT,
                StoreError::NotEditable(_) => StatusCode::CONFLICT,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(err) => match err {
                StoreError::UnknownRequest(code) => {
                    format!("No existe la solicitud {code}.")
                }
                StoreError::NotEditable(code) => {
                    format!("La solicitud {code} ya no se puede editar.")
                }
                StoreError::StageMismatch { code, expected } => format!(
                    "La solicitud {code} no está en la etapa \"{}\".",
                    expected.label()
                ),
                StoreError::Workflow(WorkflowError::EmptyCart) => {
                    "No se han añadido artículos a la solicitud.".to_string()
                }
                StoreError::Workflow(WorkflowError::AlreadySubmitted(status)) => {
                    format!("La solicitud ya fue enviada (estado: {}).", status.label())
                }
                StoreError::Workflow(WorkflowError::Terminal) => {
                    "La solicitud ya fue confirmada.".to_string()
                }
            },
            Self::Internal(_) => "Error interno del servidor".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use almacen_core::RequestCode;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("solicitud 9999".to_string());
        assert_eq!(err.to_string(), "Not found: solicitud 9999");

        let err = AppError::BadRequest("invalid stage".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid stage");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::UnknownRequest(
                RequestCode::new(9999)
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::Workflow(
                WorkflowError::EmptyCart
            ))),
            StatusCode::BAD_REQUEST
        );
    }
}
