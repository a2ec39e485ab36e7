//! Authentication route for the operator login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use atelier_shared::auth::{LoginRequest, LoginResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// POST /auth/login - Authenticate the operator and return a token.
///
/// The system has a single configured credential pair; there is no user
/// table.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if payload.username != state.auth.username || payload.password != state.auth.password {
        info!(username = %payload.username, "Failed login attempt");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_credentials",
                "message": "Invalid username or password"
            })),
        )
            .into_response();
    }

    match state.jwt_service.generate_access_token(&payload.username) {
        Ok(access_token) => {
            info!(username = %payload.username, "Operator logged in");
            Json(LoginResponse {
                access_token,
                expires_in: state.jwt_service.access_token_expires_in(),
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response()
        }
    }
}
