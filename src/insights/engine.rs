//! Rule-based insight generation. A fixed, ordered table of predicates runs
//! over the entry history; the first rule that matches produces the message.
//! The ordering is a priority policy (mood concerns before celebration before
//! nudges) and must not be reordered casually.

use std::collections::HashSet;

use super::stats::{activity_mood_stats, normalize_activity};
use super::DailyEntry;

/// Mood at or below this counts toward a low-mood run.
const LOW_MOOD_THRESHOLD: i32 = 4;
/// Low-mood days within the last 7 needed to fire the support rule.
const LOW_MOOD_RUN: usize = 3;
/// Ceiling on the newest mood for the decline rule to fire.
const DECLINE_FINAL_CEILING: i32 = 5;
/// Moods strictly above this count as "high" for activity correlation.
/// Shared with the activity-stats endpoint so charts and the engine agree.
pub const HIGH_MOOD_THRESHOLD: i32 = 7;
/// Qualifying average mood for a mood-boosting activity.
const BOOST_AVERAGE_BOUND: f64 = 7.5;
/// Qualifying high-mood ratio for a mood-boosting activity.
const BOOST_HIGH_RATIO_BOUND: f64 = 0.75;
/// Mean activities per day (over a full week) that counts as productive.
const PRODUCTIVE_MEAN_BOUND: f64 = 4.0;
/// Summed activity count below this (over >=5 recent days) is "low volume".
const LOW_VOLUME_BOUND: usize = 5;
/// Fewer distinct labels than this (over >=7 days) is "low diversity".
const DIVERSITY_BOUND: usize = 5;
/// Rules only run once the history has this many entries.
const MIN_HISTORY: usize = 3;

const MSG_NEED_MORE_DATA: &str = "Log a few more days to get personalized insights!";
const MSG_LOW_MOOD: &str = "Your mood has been consistently low recently. Consider reaching out to a friend, taking a mindful break, or engaging in a relaxing activity.";
const MSG_DECLINING: &str = "Your mood seems to be consistently dropping over the last few days. It might be a good time to reflect, or try something new to lift your spirits!";
const MSG_PRODUCTIVE: &str = "You've been incredibly productive lately! Remember to also schedule some well-deserved rest and relaxation.";
const MSG_LOW_VOLUME: &str = "You've logged fewer activities recently. Perhaps try setting one small, achievable goal for today to get started!";
const MSG_LOW_DIVERSITY: &str = "You seem to stick to a few core activities. How about trying something new this week to see how it impacts your mood?";
const MSG_DEFAULT: &str = "Keep logging your days! Consistent data helps us provide better insights.";

/// View of the history a rule evaluates against. `all` is ascending by date;
/// the windows are suffixes of it (shorter when the history is short).
struct RuleContext<'a> {
    all: &'a [DailyEntry],
    last7: &'a [DailyEntry],
    last3: &'a [DailyEntry],
}

type Rule = fn(&RuleContext) -> Option<String>;

/// Priority-ordered rule table; first match wins.
const RULES: &[(&str, Rule)] = &[
    ("low_mood_run", low_mood_run),
    ("three_day_decline", three_day_decline),
    ("mood_boosting_activity", mood_boosting_activity),
    ("sustained_productivity", sustained_productivity),
    ("low_activity_volume", low_activity_volume),
    ("low_activity_diversity", low_activity_diversity),
];

/// Derive a single recommendation string from the full entry history.
///
/// Pure and side-effect-free: safe to call repeatedly and concurrently.
/// Callers need not pre-sort; the engine re-sorts defensively rather than
/// trusting external collaborators to maintain date order.
pub fn compute_insight(entries: &[DailyEntry]) -> String {
    if entries.len() < MIN_HISTORY {
        return MSG_NEED_MORE_DATA.to_string();
    }

    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let last7 = &sorted[sorted.len().saturating_sub(7)..];
    let last3 = &sorted[sorted.len().saturating_sub(3)..];
    let ctx = RuleContext {
        all: &sorted,
        last7,
        last3,
    };

    for (name, rule) in RULES {
        if let Some(message) = rule(&ctx) {
            tracing::debug!(rule = name, "insight rule matched");
            return message;
        }
    }

    MSG_DEFAULT.to_string()
}

/// Rule 1: three or more low-mood days within the last week.
fn low_mood_run(ctx: &RuleContext) -> Option<String> {
    let low_days = ctx
        .last7
        .iter()
        .filter(|e| e.mood <= LOW_MOOD_THRESHOLD)
        .count();
    (low_days >= LOW_MOOD_RUN).then(|| MSG_LOW_MOOD.to_string())
}

/// Rule 2: mood strictly dropping across the last three days, ending low-ish.
fn three_day_decline(ctx: &RuleContext) -> Option<String> {
    let [oldest, middle, newest] = ctx.last3 else {
        return None;
    };
    let dropping = newest.mood < middle.mood && middle.mood < oldest.mood;
    (dropping && newest.mood <= DECLINE_FINAL_CEILING).then(|| MSG_DECLINING.to_string())
}

/// Rule 3: an activity whose presence correlates with high mood across the
/// whole history. Candidates are scanned in first-encounter order and only
/// the first qualifying one is reported; there is deliberately no tie-break
/// by strength.
fn mood_boosting_activity(ctx: &RuleContext) -> Option<String> {
    for (activity, stats) in activity_mood_stats(ctx.all, HIGH_MOOD_THRESHOLD) {
        let Some(average) = stats.average_mood else {
            continue;
        };
        if average >= BOOST_AVERAGE_BOUND && stats.high_mood_ratio() >= BOOST_HIGH_RATIO_BOUND {
            return Some(format!(
                "It seems \"{activity}\" consistently boosts your mood! Try to incorporate more of it into your routine."
            ));
        }
    }
    None
}

/// Rule 4: a full week averaging four or more activities per day.
fn sustained_productivity(ctx: &RuleContext) -> Option<String> {
    if ctx.last7.len() != 7 {
        return None;
    }
    let total: usize = ctx.last7.iter().map(|e| e.activities.len()).sum();
    let mean = total as f64 / 7.0;
    (mean >= PRODUCTIVE_MEAN_BOUND).then(|| MSG_PRODUCTIVE.to_string())
}

/// Rule 5: barely any activities logged over the recent window.
fn low_activity_volume(ctx: &RuleContext) -> Option<String> {
    if ctx.last7.len() < 5 {
        return None;
    }
    let total: usize = ctx.last7.iter().map(|e| e.activities.len()).sum();
    (total < LOW_VOLUME_BOUND).then(|| MSG_LOW_VOLUME.to_string())
}

/// Rule 6: a week or more of history drawing on only a handful of distinct
/// activities.
fn low_activity_diversity(ctx: &RuleContext) -> Option<String> {
    if ctx.all.len() < 7 {
        return None;
    }
    let distinct: HashSet<String> = ctx
        .all
        .iter()
        .flat_map(|e| e.activities.iter())
        .filter_map(|a| normalize_activity(a))
        .collect();
    (distinct.len() < DIVERSITY_BOUND).then(|| MSG_LOW_DIVERSITY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    /// Build consecutive daily entries ending at `moods.len()` days from a
    /// fixed start, oldest first.
    fn entries(moods_and_activities: &[(i32, &[&str])]) -> Vec<DailyEntry> {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        moods_and_activities
            .iter()
            .enumerate()
            .map(|(i, (mood, acts))| DailyEntry {
                date: start + Duration::days(i as i64),
                mood: *mood,
                activities: acts.iter().map(|a| a.to_string()).collect(),
            })
            .collect()
    }

    #[test]
    fn test_short_history_gets_fallback() {
        assert_eq!(compute_insight(&[]), MSG_NEED_MORE_DATA);
        let two = entries(&[(1, &[]), (10, &[])]);
        assert_eq!(compute_insight(&two), MSG_NEED_MORE_DATA);
    }

    #[test]
    fn test_low_mood_run_fires_first() {
        // Three low days in the last seven beat everything later, regardless
        // of how promising the activities look.
        let history = entries(&[
            (3, &["run"]),
            (3, &["run"]),
            (3, &["run"]),
            (8, &["run"]),
            (8, &["run"]),
            (8, &["run"]),
            (8, &["run"]),
        ]);
        assert_eq!(compute_insight(&history), MSG_LOW_MOOD);
    }

    #[test]
    fn test_three_day_decline() {
        let history = entries(&[(8, &[]), (6, &[]), (5, &[])]);
        assert_eq!(compute_insight(&history), MSG_DECLINING);
    }

    #[test]
    fn test_decline_needs_final_mood_at_most_five() {
        // Strictly decreasing but still ending at 6: not a decline signal.
        let history = entries(&[(9, &["a", "b"]), (8, &["c", "d"]), (6, &["e", "f"])]);
        assert_eq!(compute_insight(&history), MSG_DEFAULT);
    }

    #[test]
    fn test_mood_boosting_activity_named() {
        let history = entries(&[(9, &["Run"]), (8, &[" run "]), (6, &["tv"])]);
        let insight = compute_insight(&history);
        assert!(insight.contains("\"run\""), "got: {insight}");
        assert!(insight.contains("boosts your mood"));
    }

    #[test]
    fn test_first_qualifying_activity_wins() {
        // Both "swim" and "climb" qualify; "swim" is encountered first.
        let history = entries(&[
            (9, &["swim", "climb"]),
            (8, &["swim", "climb"]),
            (6, &["tv"]),
        ]);
        let insight = compute_insight(&history);
        assert!(insight.contains("\"swim\""), "got: {insight}");
    }

    #[test]
    fn test_sustained_productivity_needs_full_week() {
        let busy: &[&str] = &["a", "b", "c", "d"];
        let history = entries(&[
            (6, busy),
            (6, busy),
            (6, busy),
            (6, busy),
            (6, busy),
            (6, busy),
            (6, busy),
        ]);
        assert_eq!(compute_insight(&history), MSG_PRODUCTIVE);

        // Six days at the same pace is not enough for the celebration.
        let six = &history[..6];
        assert_ne!(compute_insight(six), MSG_PRODUCTIVE);
    }

    #[test]
    fn test_low_activity_volume() {
        let history = entries(&[
            (6, &["walk"]),
            (6, &[]),
            (6, &["walk"]),
            (6, &[]),
            (6, &["walk"]),
        ]);
        assert_eq!(compute_insight(&history), MSG_LOW_VOLUME);
    }

    #[test]
    fn test_low_diversity_over_week() {
        // 3 activities/day: enough volume to keep the low-volume rule quiet,
        // below the mean of 4 that would trip the productivity rule.
        let few: &[&str] = &["walk", "read", "cook"];
        let history = entries(&[
            (6, few),
            (6, few),
            (6, few),
            (6, few),
            (6, few),
            (6, few),
            (6, few),
        ]);
        assert_eq!(compute_insight(&history), MSG_LOW_DIVERSITY);
    }

    #[test]
    fn test_default_message() {
        let history = entries(&[
            (6, &["a", "b"]),
            (7, &["c", "d"]),
            (6, &["e", "f"]),
        ]);
        assert_eq!(compute_insight(&history), MSG_DEFAULT);
    }

    #[test]
    fn test_engine_resorts_unordered_input() {
        // Same decline as test_three_day_decline, shuffled.
        let mut history = entries(&[(8, &[]), (6, &[]), (5, &[])]);
        history.swap(0, 2);
        assert_eq!(compute_insight(&history), MSG_DECLINING);
    }

    #[test]
    fn test_insight_is_deterministic() {
        let history = entries(&[(9, &["run"]), (8, &["run"]), (6, &["tv"]), (7, &["run"])]);
        assert_eq!(compute_insight(&history), compute_insight(&history));
    }
}
