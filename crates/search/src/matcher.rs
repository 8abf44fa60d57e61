use std::collections::BTreeMap;

use crate::position::Position;

/// One occurrence of a query in a text buffer.
///
/// `start..end` is a half-open byte range into the searched text and `text`
/// is the exact slice it covers, with the original casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    pub text: String,
}

impl Match {
    pub(crate) fn new(source: &str, start: usize, end: usize, position: Position) -> Self {
        Self {
            start,
            end,
            line: position.line,
            column: position.column,
            text: source[start..end].to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Groups matches by line into `(column_start, column_end)` spans.
pub fn highlight_regions(matches: &[Match]) -> BTreeMap<usize, Vec<(usize, usize)>> {
    let mut regions = BTreeMap::new();
    for m in matches {
        regions
            .entry(m.line)
            .or_insert_with(Vec::new)
            .push((m.column, m.column + m.text.len()));
    }
    regions
}

/// The ordered matches of one search plus a navigation cursor.
///
/// A fresh result set has no current match. Stepping forward from there lands
/// on the first match and stepping backward lands on the last.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    matches: Vec<Match>,
    current_index: Option<usize>,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matches(matches: Vec<Match>) -> Self {
        Self {
            matches,
            current_index: None,
        }
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&Match> {
        self.current_index.and_then(|i| self.matches.get(i))
    }

    /// 1-based position of the current match and the total, for display.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current()?;
        self.current_index.map(|i| (i + 1, self.matches.len()))
    }

    pub fn next(&mut self) -> Option<&Match> {
        if self.matches.is_empty() {
            return None;
        }
        let next_index = match self.current_index {
            Some(i) => (i + 1) % self.matches.len(),
            None => 0,
        };
        self.current_index = Some(next_index);
        self.matches.get(next_index)
    }

    pub fn previous(&mut self) -> Option<&Match> {
        if self.matches.is_empty() {
            return None;
        }
        let prev_index = match self.current_index {
            Some(i) if i > 0 && i < self.matches.len() => i - 1,
            _ => self.matches.len() - 1,
        };
        self.current_index = Some(prev_index);
        self.matches.get(prev_index)
    }

    pub fn jump_to(&mut self, index: usize) -> Option<&Match> {
        if index < self.matches.len() {
            self.current_index = Some(index);
            self.matches.get(index)
        } else {
            None
        }
    }

    pub fn highlight_regions(&self) -> BTreeMap<usize, Vec<(usize, usize)>> {
        highlight_regions(&self.matches)
    }
}
