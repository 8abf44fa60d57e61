use crate::query::Query;

pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Recently issued queries, most recent first.
///
/// Equal queries are never stored twice: recording one again moves it to the
/// front. Once the log is full the oldest entry is dropped.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    entries: Vec<Query>,
    max_history: usize,
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl QueryHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_history,
        }
    }

    pub fn record(&mut self, query: Query) {
        let mut entries: Vec<Query> = std::mem::take(&mut self.entries)
            .into_iter()
            .filter(|existing| *existing != query)
            .collect();
        entries.insert(0, query);
        entries.truncate(self.max_history);
        self.entries = entries;
    }

    pub fn all(&self) -> Vec<Query> {
        self.entries.clone()
    }

    /// Entries whose pattern contains `needle`, ignoring case.
    pub fn filter(&self, needle: &str) -> Vec<Query> {
        let needle = needle.to_lowercase();
        self.entries
            .iter()
            .filter(|query| query.pattern().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }
}
