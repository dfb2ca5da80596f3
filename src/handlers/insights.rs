use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::insights::{compute_insight, DailyEntry, EntryStore};
use crate::models::entry::Entry;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
    pub entry_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// GET /api/insights — run the rule engine over the user's whole history.
///
/// Recomputed from scratch on every call; nothing is cached or persisted.
pub async fn get_insight(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<InsightResponse>> {
    let rows = sqlx::query_as::<_, Entry>(
        "SELECT * FROM entries WHERE user_id = $1 ORDER BY entry_date ASC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    // Normalize the persistence snapshot through the store (merge by date,
    // ascending order) before handing it to the engine.
    let store = EntryStore::from_entries(rows.into_iter().map(DailyEntry::from));
    let insight = compute_insight(store.entries());

    Ok(Json(InsightResponse {
        insight,
        entry_count: store.len(),
        generated_at: Utc::now(),
    }))
}
