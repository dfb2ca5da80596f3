use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::jwt::create_session_token;
use crate::error::AppResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub access_token: String,
    pub expires_in: i64,
}

/// POST /api/auth/session — anonymous sign-in. Mints a fresh user id and a
/// token scoped to it; no registration, no credentials. Calling it again
/// starts a new, empty journal.
pub async fn create_session(State(state): State<AppState>) -> AppResult<Json<SessionResponse>> {
    let user_id = Uuid::new_v4();
    let access_token = create_session_token(user_id, &state.config)?;

    tracing::info!(user_id = %user_id, "anonymous session created");

    Ok(Json(SessionResponse {
        user_id,
        access_token,
        expires_in: state.config.jwt_session_ttl_secs,
    }))
}
