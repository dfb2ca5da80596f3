use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::entry::{Entry, EntryQuery, UpsertEntryRequest};
use crate::AppState;

/// POST /api/entries — create or replace the entry for a date. A re-submit
/// for an existing date overwrites mood and activities wholesale; two writers
/// racing on the same date resolve to whichever write lands last.
pub async fn upsert_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertEntryRequest>,
) -> AppResult<Json<Entry>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let activities = body.cleaned_activities().map_err(AppError::Validation)?;

    let entry_date = body.entry_date.unwrap_or_else(|| Utc::now().date_naive());

    let entry = sqlx::query_as::<_, Entry>(
        r#"
        INSERT INTO entries (id, user_id, entry_date, mood, activities)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, entry_date) DO UPDATE SET
            mood = EXCLUDED.mood,
            activities = EXCLUDED.activities,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(entry_date)
    .bind(body.mood)
    .bind(&activities)
    .fetch_one(&state.db)
    .await?;

    // Change notification for connected clients, so dashboards re-render
    // without polling.
    if let Some(tx) = state.ws_tx.as_ref() {
        let msg = serde_json::json!({
            "type": "entry_changed",
            "user_id": auth_user.id,
            "entry_date": entry.entry_date,
        });
        let _ = tx.send(msg.to_string());
    }

    Ok(Json(entry))
}

/// GET /api/entries — the user's history ascending by date, optionally
/// windowed. No default window: charts want the whole journal.
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<Vec<Entry>>> {
    let entries = sqlx::query_as::<_, Entry>(
        r#"
        SELECT * FROM entries
        WHERE user_id = $1
          AND ($2::date IS NULL OR entry_date >= $2)
          AND ($3::date IS NULL OR entry_date <= $3)
        ORDER BY entry_date ASC
        "#,
    )
    .bind(auth_user.id)
    .bind(query.start_date)
    .bind(query.end_date)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}
