// src/cache.rs

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::models::SheetTable;

/// Time-boxed memo of fetched ranges, owned by AppState. A stale entry is
/// dropped on read. The lock is never held across an await, so concurrent
/// callers can both miss and both fetch — fetches are idempotent reads.
pub struct SheetCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    fetched_at: Instant,
    table: SheetTable,
}

impl SheetCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, range: &str) -> Option<SheetTable> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(range) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.table.clone()),
            Some(_) => {
                entries.remove(range);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, range: &str, table: SheetTable) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            range.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                table,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SheetTable {
        SheetTable {
            headers: vec!["Date".into()],
            rows: vec![vec!["2026-03-02".into()]],
        }
    }

    #[test]
    fn fresh_entry_is_served() {
        let cache = SheetCache::new(Duration::from_secs(60));
        cache.put("'EOD - Main'!A1:Z", table());
        let hit = cache.get("'EOD - Main'!A1:Z");
        assert_eq!(hit.map(|t| t.rows.len()), Some(1));
    }

    #[test]
    fn stale_entry_is_dropped() {
        let cache = SheetCache::new(Duration::ZERO);
        cache.put("'EOD - Main'!A1:Z", table());
        assert!(cache.get("'EOD - Main'!A1:Z").is_none());
    }

    #[test]
    fn ranges_are_independent_keys() {
        let cache = SheetCache::new(Duration::from_secs(60));
        cache.put("'EOD - Main'!A1:Z", table());
        assert!(cache.get("'Front Desk KPI - Main'!A1:Z").is_none());
    }
}
