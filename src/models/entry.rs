use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::insights::DailyEntry;

/// Persisted journal entry row. One per `(user_id, entry_date)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub mood: i32,
    pub activities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Entry> for DailyEntry {
    fn from(row: Entry) -> Self {
        DailyEntry {
            date: row.entry_date,
            mood: row.mood,
            activities: row.activities,
        }
    }
}

/// POST /api/entries — submitting for an existing date replaces that day's
/// record wholesale (merge by date, not append).
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertEntryRequest {
    /// Defaults to server-today when omitted.
    pub entry_date: Option<NaiveDate>,

    #[validate(range(min = 1, max = 10, message = "Mood must be between 1 and 10"))]
    pub mood: i32,

    #[validate(length(max = 50, message = "At most 50 activities per entry"))]
    #[serde(default)]
    pub activities: Vec<String>,
}

impl UpsertEntryRequest {
    /// Boundary cleanup: trim labels, drop ones that are empty after
    /// trimming, cap length. Original casing is preserved; aggregation
    /// lowercases on its own.
    pub fn cleaned_activities(&self) -> Result<Vec<String>, String> {
        let mut cleaned = Vec::with_capacity(self.activities.len());
        for raw in &self.activities {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.len() > 200 {
                return Err("Activity labels must be under 200 characters".into());
            }
            cleaned.push(trimmed.to_string());
        }
        Ok(cleaned)
    }
}

#[derive(Debug, Deserialize)]
pub struct EntryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mood: i32, activities: &[&str]) -> UpsertEntryRequest {
        UpsertEntryRequest {
            entry_date: None,
            mood,
            activities: activities.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_mood_range_validation() {
        assert!(request(1, &[]).validate().is_ok());
        assert!(request(10, &[]).validate().is_ok());
        assert!(request(0, &[]).validate().is_err());
        assert!(request(11, &[]).validate().is_err());
    }

    #[test]
    fn test_cleaned_activities_trims_and_drops_empties() {
        let req = request(5, &["  exercise ", "", "   ", "Read"]);
        assert_eq!(
            req.cleaned_activities().unwrap(),
            vec!["exercise".to_string(), "Read".to_string()]
        );
    }

    #[test]
    fn test_cleaned_activities_rejects_oversized_label() {
        let long = "x".repeat(201);
        let req = request(5, &[long.as_str()]);
        assert!(req.cleaned_activities().is_err());
    }
}
