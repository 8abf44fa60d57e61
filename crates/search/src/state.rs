use std::collections::BTreeMap;

use log::debug;

use crate::engine::SearchEngine;
use crate::error::PatternError;
use crate::find_replace::replace_spans;
use crate::history::{DEFAULT_MAX_HISTORY, QueryHistory};
use crate::matcher::{self, Match, SearchResults};
use crate::query::Query;

/// Manages the search lifecycle for one text buffer
///
/// The session never holds on to the buffer itself. Callers pass the current
/// text on every call and must `reset` when it changes underneath them, since
/// stored offsets would otherwise be stale.
#[derive(Debug)]
pub struct SearchSession {
    engine: Option<SearchEngine>,
    results: SearchResults,
    history: QueryHistory,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            engine: None,
            results: SearchResults::new(),
            history: QueryHistory::new(max_history),
        }
    }

    /// Run a fresh search, discarding previous results and the cursor
    pub fn search(&mut self, text: &str, query: &Query) -> Result<&[Match], PatternError> {
        self.results = SearchResults::new();

        if text.is_empty() || query.is_empty() {
            return Ok(self.results.matches());
        }

        self.history.record(query.clone());

        if !self.engine.as_ref().is_some_and(|engine| engine.query() == query) {
            self.engine = None;
            let engine = SearchEngine::compile(query).inspect_err(|err| {
                debug!("search aborted: {}", err);
            })?;
            self.engine = Some(engine);
        }

        let matches = self
            .engine
            .as_ref()
            .map(|engine| engine.find(text))
            .unwrap_or_default();

        debug!(
            "search for {:?} ({} mode) found {} matches",
            query.pattern(),
            if query.is_regex() { "regex" } else { "literal" },
            matches.len()
        );

        self.results = SearchResults::from_matches(matches);
        Ok(self.results.matches())
    }

    /// Step to the next match, wrapping from the last back to the first
    ///
    /// Passing a query searches again first, so the step lands on the first match.
    pub fn find_next(
        &mut self,
        text: &str,
        query: Option<&Query>,
    ) -> Result<Option<&Match>, PatternError> {
        if let Some(query) = query {
            self.search(text, query)?;
        }
        Ok(self.results.next())
    }

    /// Step to the previous match
    ///
    /// From the first match, or from no current match, this wraps to the last.
    pub fn find_previous(
        &mut self,
        text: &str,
        query: Option<&Query>,
    ) -> Result<Option<&Match>, PatternError> {
        if let Some(query) = query {
            self.search(text, query)?;
        }
        Ok(self.results.previous())
    }

    /// Replace matches of `query` in `text`, returning the new text and how
    /// many matches were replaced
    ///
    /// Matches are always recomputed first. Without `replace_all` only the
    /// match under the cursor is replaced. A fresh search leaves no cursor, so
    /// that is the first match.
    pub fn replace(
        &mut self,
        text: &str,
        query: &Query,
        replacement: &str,
        replace_all: bool,
    ) -> Result<(String, usize), PatternError> {
        self.search(text, query)?;

        if self.results.is_empty() {
            return Ok((text.to_string(), 0));
        }

        if replace_all {
            let spans: Vec<(usize, usize)> = self
                .results
                .matches()
                .iter()
                .map(|m| (m.start, m.end))
                .collect();
            let (replaced, count) = replace_spans(text, &spans, replacement);
            debug!("replaced {} matches", count);
            return Ok((replaced, count));
        }

        let index = match self.results.current_index() {
            Some(index) if index < self.results.count() => index,
            _ => 0,
        };
        let Some(target) = self.results.jump_to(index) else {
            return Ok((text.to_string(), 0));
        };

        let mut replaced = String::with_capacity(text.len() + replacement.len());
        replaced.push_str(&text[..target.start]);
        replaced.push_str(replacement);
        replaced.push_str(&text[target.end..]);
        debug!("replaced match at offset {}", target.start);
        Ok((replaced, 1))
    }

    /// Match spans grouped by line, for rendering
    ///
    /// Uses the stored results unless `results` is given.
    pub fn highlight_regions(
        &self,
        results: Option<&[Match]>,
    ) -> BTreeMap<usize, Vec<(usize, usize)>> {
        matcher::highlight_regions(results.unwrap_or(self.results.matches()))
    }

    /// Get a copy of the query history, most recent first
    pub fn history(&self) -> Vec<Query> {
        self.history.all()
    }

    /// Get history entries whose pattern contains `needle`, ignoring case
    pub fn history_by_pattern(&self, needle: &str) -> Vec<Query> {
        self.history.filter(needle)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn result_count(&self) -> usize {
        self.results.count()
    }

    pub fn current_result(&self) -> Option<&Match> {
        self.results.current()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.results.current_index()
    }

    /// 1-based position of the current match and the total
    pub fn position(&self) -> Option<(usize, usize)> {
        self.results.position()
    }

    pub fn results(&self) -> &[Match] {
        self.results.matches()
    }

    /// Forget results and cursor, e.g. after the buffer was edited
    pub fn reset(&mut self) {
        self.results = SearchResults::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(pattern: &str) -> Query {
        Query::new(pattern)
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = SearchSession::new();
        assert_eq!(session.result_count(), 0);
        assert!(session.current_result().is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_search_returns_and_stores_matches() {
        let mut session = SearchSession::new();
        let matches = session.search("hello world hello", &literal("hello")).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(session.result_count(), 2);
        assert!(session.current_index().is_none());
    }

    #[test]
    fn test_empty_input_skips_history() {
        let mut session = SearchSession::new();
        assert!(session.search("", &literal("hello")).unwrap().is_empty());
        assert!(session.search("hello", &literal("")).unwrap().is_empty());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_search_resets_cursor() {
        let mut session = SearchSession::new();
        session.search("a b a", &literal("a")).unwrap();
        session.find_next("a b a", None).unwrap();
        assert_eq!(session.current_index(), Some(0));

        session.search("a b a", &literal("a")).unwrap();
        assert!(session.current_index().is_none());
    }

    #[test]
    fn test_find_next() {
        let mut session = SearchSession::new();
        let text = "a b a c a";
        session.search(text, &literal("a")).unwrap();

        assert_eq!(session.find_next(text, None).unwrap().unwrap().start, 0);
        assert_eq!(session.find_next(text, None).unwrap().unwrap().start, 4);
        assert_eq!(session.find_next(text, None).unwrap().unwrap().start, 8);
        assert_eq!(session.find_next(text, None).unwrap().unwrap().start, 0);
    }

    #[test]
    fn test_find_previous() {
        let mut session = SearchSession::new();
        let text = "a b a c a";
        session.search(text, &literal("a")).unwrap();

        assert_eq!(session.find_previous(text, None).unwrap().unwrap().start, 8);
        assert_eq!(session.find_previous(text, None).unwrap().unwrap().start, 4);
        assert_eq!(session.find_previous(text, None).unwrap().unwrap().start, 0);
        assert_eq!(session.find_previous(text, None).unwrap().unwrap().start, 8);
    }

    #[test]
    fn test_find_previous_from_first_wraps() {
        let mut session = SearchSession::new();
        let text = "a b a";
        session.find_next(text, Some(&literal("a"))).unwrap();
        assert_eq!(session.current_index(), Some(0));

        let previous = session.find_previous(text, None).unwrap().unwrap();
        assert_eq!(previous.start, 4);
    }

    #[test]
    fn test_find_next_with_new_query() {
        let mut session = SearchSession::new();
        session.search("a b a", &literal("a")).unwrap();

        let found = session.find_next("a b a", Some(&literal("b"))).unwrap().unwrap();
        assert_eq!(found.text, "b");
        assert_eq!(session.result_count(), 1);
    }

    #[test]
    fn test_navigation_without_results() {
        let mut session = SearchSession::new();
        assert!(session.find_next("abc", None).unwrap().is_none());
        assert!(session.find_previous("abc", None).unwrap().is_none());

        session.search("abc", &literal("x")).unwrap();
        assert!(session.find_next("abc", None).unwrap().is_none());
        assert!(session.current_index().is_none());
    }

    #[test]
    fn test_replace_single_replaces_first_match() {
        let mut session = SearchSession::new();
        let text = "hello world hello";

        session.search(text, &literal("hello")).unwrap();
        session.find_next(text, None).unwrap();
        session.find_next(text, None).unwrap();

        let (modified, count) = session
            .replace(text, &literal("hello"), "goodbye", false)
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(modified, "goodbye world hello");
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn test_replace_all() {
        let mut session = SearchSession::new();
        let (modified, count) = session
            .replace("a b a c a", &literal("a"), "x", true)
            .unwrap();
        assert_eq!(modified, "x b x c x");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_replace_all_case_insensitive() {
        let mut session = SearchSession::new();
        let (modified, count) = session
            .replace("hello Hello HELLO", &literal("hello"), "hi", true)
            .unwrap();
        assert_eq!(modified, "hi hi hi");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_replace_all_regex() {
        let mut session = SearchSession::new();
        let query = Query::new(r"\d+").with_regex(true);
        let (modified, count) = session
            .replace("test 123 hello 456", &query, "X", true)
            .unwrap();
        assert_eq!(modified, "test X hello X");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_replace_all_overlapping_literal() {
        let mut session = SearchSession::new();
        let expected = session.search("aaa", &literal("aa")).unwrap().len();
        let (modified, count) = session.replace("aaa", &literal("aa"), "b", true).unwrap();
        assert_eq!(modified, "b");
        assert_eq!(count, 2);
        assert_eq!(count, expected);
    }

    #[test]
    fn test_replace_without_matches() {
        let mut session = SearchSession::new();
        let (modified, count) = session.replace("abc", &literal("x"), "y", true).unwrap();
        assert_eq!(modified, "abc");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_replace_with_multibyte_text() {
        let mut session = SearchSession::new();
        let (modified, count) = session
            .replace("caf\u{e9} \u{1F600} caf\u{e9}", &literal("caf\u{e9}"), "tea", true)
            .unwrap();
        assert_eq!(modified, "tea \u{1F600} tea");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_invalid_regex_leaves_session_idle() {
        let mut session = SearchSession::new();
        session.search("abc abc", &literal("abc")).unwrap();
        session.find_next("abc abc", None).unwrap();

        let query = Query::new("[invalid").with_regex(true);
        assert!(session.search("test", &query).is_err());
        assert_eq!(session.result_count(), 0);
        assert!(session.current_index().is_none());
        assert!(session.replace("test", &query, "x", true).is_err());
    }

    #[test]
    fn test_history_recorded_per_search() {
        let mut session = SearchSession::new();
        session.search("hello world", &literal("hello")).unwrap();
        session.search("hello world", &literal("world")).unwrap();
        session.search("hello world", &literal("hello")).unwrap();

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].pattern(), "hello");
    }

    #[test]
    fn test_history_limit() {
        let mut session = SearchSession::with_max_history(3);
        for i in 0..5 {
            session
                .search("test text", &literal(&format!("pattern{}", i)))
                .unwrap();
        }
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_history_by_pattern_and_clear() {
        let mut session = SearchSession::new();
        session.search("hello world", &literal("hello")).unwrap();
        session.search("hello world", &literal("world")).unwrap();
        session.search("hello world", &literal("help")).unwrap();

        let matching = session.history_by_pattern("HEL");
        assert_eq!(matching.len(), 2);
        assert_eq!(matching[0].pattern(), "help");

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_highlight_regions() {
        let mut session = SearchSession::new();
        session
            .search("hello world\nhello hello", &literal("hello"))
            .unwrap();

        let regions = session.highlight_regions(None);
        assert_eq!(regions[&0], vec![(0, 5)]);
        assert_eq!(regions[&1], vec![(0, 5), (6, 11)]);

        let first = session.results()[..1].to_vec();
        let regions = session.highlight_regions(Some(&first));
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn test_current_result_and_reset() {
        let mut session = SearchSession::new();
        let text = "x y x";
        session.search(text, &literal("x")).unwrap();
        assert!(session.current_result().is_none());

        session.find_next(text, None).unwrap();
        assert_eq!(session.current_result().unwrap().start, 0);
        assert_eq!(session.position(), Some((1, 2)));

        session.reset();
        assert_eq!(session.result_count(), 0);
        assert!(session.current_result().is_none());
    }

    #[test]
    fn test_compiled_query_reused_for_equal_query() {
        let mut session = SearchSession::new();
        let query = Query::new("a+").with_regex(true);
        session.search("aa b aaa", &query).unwrap();
        session.search("aa b aaa", &query.clone()).unwrap();
        assert_eq!(session.result_count(), 2);
        assert!(session.engine.as_ref().is_some_and(|e| e.query() == &query));
    }
}
