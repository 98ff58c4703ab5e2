//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use recall_core::ports::StudyError;
use std::sync::Arc;
use tracing::{error, warn};

use crate::web::protocol::Reply;
use crate::web::state::AppState;

/// Middleware that checks the bearer token against the persisted session.
///
/// If valid, inserts the `UserSession` into request extensions for handlers to use.
/// If invalid or missing, answers with a 401 failure envelope.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Extract the bearer token
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    let Some(token) = token else {
        return Reply::<()>(Err(StudyError::NotAuthenticated)).into_response();
    };

    // 2. Compare it with the current session
    match state.api.current_user().await {
        Ok(Some(session)) if !token.is_empty() && session.token == token => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Ok(_) => {
            warn!("Rejected request with a stale or unknown token.");
            Reply::<()>(Err(StudyError::NotAuthenticated)).into_response()
        }
        Err(e) => {
            error!("Failed to load the current session: {:?}", e);
            Reply::<()>(Err(e)).into_response()
        }
    }
}
