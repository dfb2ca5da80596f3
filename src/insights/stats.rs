//! Activity aggregation over an entry history. Everything here is recomputed
//! from scratch per call; histories are at most a few hundred records, so a
//! linear pass is cheaper than keeping incremental state correct.

use std::collections::HashMap;

use super::DailyEntry;

/// Per-activity mood statistics, accumulated over every entry the activity
/// appears in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityStats {
    pub total_count: u32,
    pub mood_sum: i64,
    pub high_mood_count: u32,
    /// Only populated once the activity has at least two observations; a
    /// single data point is not treated as a reliable signal.
    pub average_mood: Option<f64>,
}

impl ActivityStats {
    /// Fraction of this activity's occurrences that landed on a high-mood day.
    pub fn high_mood_ratio(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        f64::from(self.high_mood_count) / f64::from(self.total_count)
    }
}

/// Canonical form of a user-entered activity label: trimmed and lowercased.
/// Labels that are empty after trimming carry no information and are dropped.
pub fn normalize_activity(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Occurrence count per normalized activity label, most frequent first.
/// Equal counts keep first-encounter order (stable sort over insertion order).
pub fn activity_frequency(entries: &[DailyEntry]) -> Vec<(String, u64)> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        for raw in &entry.activities {
            let Some(label) = normalize_activity(raw) else {
                continue;
            };
            match index.get(&label) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(label.clone(), counts.len());
                    counts.push((label, 1));
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Per-activity mood statistics across `entries`, in first-encounter order.
///
/// "High mood" means strictly greater than `high_mood_threshold`. The average
/// is filled in only for activities seen at least twice; downstream rules must
/// not fire off a single observation.
pub fn activity_mood_stats(
    entries: &[DailyEntry],
    high_mood_threshold: i32,
) -> Vec<(String, ActivityStats)> {
    let mut stats: Vec<(String, ActivityStats)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        for raw in &entry.activities {
            let Some(label) = normalize_activity(raw) else {
                continue;
            };
            let i = match index.get(&label) {
                Some(&i) => i,
                None => {
                    index.insert(label.clone(), stats.len());
                    stats.push((label, ActivityStats::default()));
                    stats.len() - 1
                }
            };
            let s = &mut stats[i].1;
            s.total_count += 1;
            s.mood_sum += i64::from(entry.mood);
            if entry.mood > high_mood_threshold {
                s.high_mood_count += 1;
            }
        }
    }

    for (_, s) in &mut stats {
        if s.total_count >= 2 {
            s.average_mood = Some(s.mood_sum as f64 / f64::from(s.total_count));
        }
    }

    stats
}
