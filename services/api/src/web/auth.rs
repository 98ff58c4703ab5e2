//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for login, registration, logout and the current session.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use recall_core::protocol::{AuthReply, CurrentUserReply, LoginRequest, RegisterRequest};
use std::sync::Arc;

use crate::web::protocol::{json_body, Reply};
use crate::web::state::AppState;

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthReply),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Reply<AuthReply> {
    Reply(async { state.api.login(json_body(payload)?).await }.await)
}

/// POST /auth/register - Create an account and log it in
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created and logged in", body = AuthReply),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Reply<AuthReply> {
    Reply(async { state.api.register(json_body(payload)?).await }.await)
}

/// POST /auth/logout - Clear the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful")
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> Reply<()> {
    Reply(state.api.logout().await)
}

/// GET /auth/me - The current session, if any
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current session state", body = CurrentUserReply)
    )
)]
pub async fn me_handler(State(state): State<Arc<AppState>>) -> Reply<CurrentUserReply> {
    let result = state.api.current_user().await.map(|user| CurrentUserReply {
        authenticated: user.as_ref().is_some_and(|u| !u.token.is_empty()),
        user,
    });
    Reply(result)
}
