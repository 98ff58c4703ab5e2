//! services/api/src/web/protocol.rs
//!
//! Maps operation results onto HTTP responses. Every body is the `{ ok, ... }`
//! envelope; failures also pick a status code.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recall_core::ports::{StudyError, StudyResult};
use recall_core::protocol::Envelope;
use serde::Serialize;
use tracing::error;

/// The outcome of one operation, ready to be sent back to the client.
pub struct Reply<T>(pub StudyResult<T>);

pub fn status_for(error: &StudyError) -> StatusCode {
    match error {
        StudyError::InvalidCredentials | StudyError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        StudyError::EmailTaken => StatusCode::CONFLICT,
        StudyError::Validation(_) => StatusCode::BAD_REQUEST,
        StudyError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        match self.0 {
            Ok(payload) => (StatusCode::OK, Json(Envelope::success(payload))).into_response(),
            Err(e) => {
                let status = status_for(&e);
                if status.is_server_error() {
                    error!("Operation failed: {:?}", e);
                }
                (status, Json(Envelope::<()>::failure(e.to_string()))).into_response()
            }
        }
    }
}

/// Unwraps a JSON body, turning a malformed one into a validation failure.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> StudyResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| StudyError::Validation(rejection.body_text()))
}

pub fn query_params<T>(
    params: Result<axum::extract::Query<T>, QueryRejection>,
) -> StudyResult<T> {
    params
        .map(|axum::extract::Query(value)| value)
        .map_err(|rejection| StudyError::Validation(rejection.body_text()))
}
