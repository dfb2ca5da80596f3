//! Pure journal-analysis core: the entry store, activity aggregation, and the
//! rule-based insight engine. Nothing in here touches the database or the
//! request path; handlers feed it snapshots and render whatever comes back.

pub mod engine;
pub mod stats;
pub mod store;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One journaled day: a mood score (1-10) and the activities logged for it.
///
/// `date` is the unique key within a user's history. Mood and date validity
/// are enforced at the HTTP boundary; the core assumes well-formed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub mood: i32,
    pub activities: Vec<String>,
}

pub use engine::compute_insight;
pub use stats::{activity_frequency, activity_mood_stats, normalize_activity, ActivityStats};
pub use store::EntryStore;
