use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::insights::engine::HIGH_MOOD_THRESHOLD;
use crate::insights::{activity_frequency, activity_mood_stats, DailyEntry};
use crate::models::entry::Entry;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ActivityCount {
    pub activity: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct ActivityMoodStat {
    pub activity: String,
    pub total_count: u32,
    pub high_mood_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_mood: Option<f64>,
}

/// GET /api/activities/frequency — occurrence counts per normalized label,
/// most frequent first. Feeds the distribution chart.
pub async fn get_frequency(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<ActivityCount>>> {
    let entries = fetch_history(&state, auth_user).await?;

    let counts = activity_frequency(&entries)
        .into_iter()
        .map(|(activity, count)| ActivityCount { activity, count })
        .collect();

    Ok(Json(counts))
}

/// GET /api/activities/stats — per-activity mood statistics over the whole
/// history, in first-encounter order. `average_mood` is omitted for labels
/// seen only once.
pub async fn get_mood_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<ActivityMoodStat>>> {
    let entries = fetch_history(&state, auth_user).await?;

    let stats = activity_mood_stats(&entries, HIGH_MOOD_THRESHOLD)
        .into_iter()
        .map(|(activity, s)| ActivityMoodStat {
            activity,
            total_count: s.total_count,
            high_mood_count: s.high_mood_count,
            average_mood: s.average_mood,
        })
        .collect();

    Ok(Json(stats))
}

async fn fetch_history(state: &AppState, auth_user: AuthUser) -> AppResult<Vec<DailyEntry>> {
    let rows = sqlx::query_as::<_, Entry>(
        "SELECT * FROM entries WHERE user_id = $1 ORDER BY entry_date ASC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(rows.into_iter().map(DailyEntry::from).collect())
}
