//! Sled-based store for recent searches.
//!
//! A bounded recent-query list keyed by `(keywords, location, website)`.
//! This lives entirely outside the analysis pipeline: the orchestrator
//! neither reads nor writes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// How many recent searches are retained.
const MAX_ITEMS: usize = 6;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("database error: {0}")]
    DbError(#[from] sled::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// One remembered search submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    pub keywords: String,
    pub location: String,
    pub website: Option<String>,
    /// When the search was submitted
    pub timestamp: DateTime<Utc>,
}

/// Sled-based store for recent searches.
///
/// Entries are keyed by a hash of the query tuple, so resubmitting the same
/// search refreshes its timestamp instead of duplicating it. The store keeps
/// the newest [`MAX_ITEMS`] entries and evicts the rest.
pub struct History {
    db: sled::Db,
}

impl History {
    /// Open or create the history store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Record a search, refreshing duplicates and evicting the oldest
    /// entries beyond the cap
    pub fn record(
        &self,
        keywords: &str,
        location: &str,
        website: Option<&str>,
    ) -> Result<(), HistoryError> {
        let item = SearchHistoryItem {
            keywords: keywords.to_string(),
            location: location.to_string(),
            website: website.map(str::to_string),
            timestamp: Utc::now(),
        };
        let key = Self::hash_query(keywords, location, website);
        let value = serde_json::to_vec(&item)?;
        self.db.insert(key.as_bytes(), value)?;
        self.prune()?;
        self.db.flush()?;
        Ok(())
    }

    /// List recent searches, newest first
    pub fn recent(&self) -> Result<Vec<SearchHistoryItem>, HistoryError> {
        let mut results = Vec::new();
        for entry in self.db.iter() {
            let (_key, value) = entry?;
            let item: SearchHistoryItem = serde_json::from_slice(&value)?;
            results.push(item);
        }
        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(results)
    }

    /// Remove all stored searches
    pub fn clear(&self) -> Result<(), HistoryError> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }

    /// Get the number of stored searches
    pub fn count(&self) -> usize {
        self.db.len()
    }

    /// Drop the oldest entries until the store fits the cap
    fn prune(&self) -> Result<(), HistoryError> {
        if self.db.len() <= MAX_ITEMS {
            return Ok(());
        }
        let mut entries: Vec<(sled::IVec, DateTime<Utc>)> = Vec::new();
        for entry in self.db.iter() {
            let (key, value) = entry?;
            let item: SearchHistoryItem = serde_json::from_slice(&value)?;
            entries.push((key, item.timestamp));
        }
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        for (key, _) in entries.into_iter().skip(MAX_ITEMS) {
            self.db.remove(key)?;
        }
        Ok(())
    }

    /// Create a hash of the query tuple for use as a key
    fn hash_query(keywords: &str, location: &str, website: Option<&str>) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        keywords.hash(&mut hasher);
        location.hash(&mut hasher);
        website.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, History) {
        let dir = tempfile::tempdir().unwrap();
        let history = History::open(dir.path().join("history")).unwrap();
        (dir, history)
    }

    #[test]
    fn records_and_lists_newest_first() {
        let (_dir, history) = open_temp();
        history.record("espresso", "Berlin", None).unwrap();
        history
            .record("vegan restaurants", "New York, NY", Some("example.com"))
            .unwrap();

        let recent = history.recent().unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].keywords, "vegan restaurants");
        assert_eq!(recent[0].website.as_deref(), Some("example.com"));
        assert_eq!(recent[1].keywords, "espresso");
    }

    #[test]
    fn duplicate_query_refreshes_instead_of_duplicating() {
        let (_dir, history) = open_temp();
        history.record("espresso", "Berlin", None).unwrap();
        history.record("espresso", "Berlin", None).unwrap();
        assert_eq!(history.count(), 1);

        // Same keywords, different website: a distinct query.
        history
            .record("espresso", "Berlin", Some("example.com"))
            .unwrap();
        assert_eq!(history.count(), 2);
    }

    #[test]
    fn store_is_bounded() {
        let (_dir, history) = open_temp();
        for i in 0..10 {
            history
                .record(&format!("keywords {}", i), "Berlin", None)
                .unwrap();
        }
        assert_eq!(history.count(), MAX_ITEMS);

        // The oldest entries were the ones evicted.
        let recent = history.recent().unwrap();
        assert!(recent.iter().all(|item| item.keywords != "keywords 0"));
    }

    #[test]
    fn clear_empties_the_store() {
        let (_dir, history) = open_temp();
        history.record("espresso", "Berlin", None).unwrap();
        history.clear().unwrap();
        assert_eq!(history.count(), 0);
        assert!(history.recent().unwrap().is_empty());
    }
}
