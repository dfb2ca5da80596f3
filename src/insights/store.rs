use super::DailyEntry;

/// Ordered collection of a user's daily entries, at most one per date.
///
/// Inserting an entry for a date that already exists replaces the old record
/// (merge semantics, matching the upsert the persistence layer applies). The
/// collection is kept sorted ascending by date after every mutation, so
/// `entries()` is always a chronological snapshot.
#[derive(Debug, Default, Clone)]
pub struct EntryStore {
    entries: Vec<DailyEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an untrusted snapshot (e.g. rows read back from
    /// persistence), applying the same merge-by-date and sort normalization
    /// as incremental inserts. Later duplicates win, mirroring
    /// last-write-observed-wins at the storage layer.
    pub fn from_entries(entries: impl IntoIterator<Item = DailyEntry>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            store.add_or_update(entry);
        }
        store
    }

    /// Insert `entry`, replacing any existing entry with the same date.
    pub fn add_or_update(&mut self, entry: DailyEntry) {
        match self.entries.binary_search_by(|e| e.date.cmp(&entry.date)) {
            Ok(idx) => self.entries[idx] = entry,
            Err(idx) => self.entries.insert(idx, entry),
        }
    }

    /// Current snapshot, ascending by date.
    pub fn entries(&self) -> &[DailyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(date: &str, mood: i32) -> DailyEntry {
        DailyEntry {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            mood,
            activities: vec![],
        }
    }

    #[test]
    fn test_insert_keeps_ascending_order() {
        let mut store = EntryStore::new();
        assert!(store.is_empty());
        store.add_or_update(entry("2026-03-05", 7));
        store.add_or_update(entry("2026-03-01", 4));
        store.add_or_update(entry("2026-03-03", 6));

        let dates: Vec<String> = store
            .entries()
            .iter()
            .map(|e| e.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2026-03-01", "2026-03-03", "2026-03-05"]);
    }

    #[test]
    fn test_duplicate_date_replaces_in_place() {
        let mut store = EntryStore::new();
        store.add_or_update(entry("2026-03-01", 4));
        store.add_or_update(entry("2026-03-02", 6));
        store.add_or_update(entry("2026-03-01", 9));

        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].mood, 9);
    }

    #[test]
    fn test_from_entries_normalizes_unordered_snapshot() {
        let store = EntryStore::from_entries(vec![
            entry("2026-03-04", 5),
            entry("2026-03-01", 3),
            entry("2026-03-04", 8), // later duplicate wins
            entry("2026-03-02", 6),
        ]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.entries().last().unwrap().mood, 8);
        let sorted = store
            .entries()
            .windows(2)
            .all(|w| w[0].date < w[1].date);
        assert!(sorted);
    }
}
