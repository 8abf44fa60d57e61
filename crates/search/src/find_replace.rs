//! Literal find/replace with offset-based stepping.
//!
//! This is the lightweight counterpart to [`SearchSession`](crate::SearchSession):
//! no regex, no history, no stored results. Options are toggled in place and
//! every call scans the text it is given. Whole words here are bounded by
//! alphanumeric chars only, so `_` counts as a separator.

use crate::engine::LiteralPattern;

#[derive(Debug, Clone, Default)]
pub struct FindReplaceEngine {
    case_sensitive: bool,
    whole_words: bool,
}

impl FindReplaceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    pub fn set_whole_words(&mut self, whole_words: bool) {
        self.whole_words = whole_words;
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_whole_words(&self) -> bool {
        self.whole_words
    }

    fn pattern(&self, term: &str) -> LiteralPattern {
        LiteralPattern::new(term, self.case_sensitive, self.whole_words)
            .with_word_chars(char::is_alphanumeric)
    }

    /// Every occurrence of `term`, overlapping ones included.
    pub fn find_all(&self, text: &str, term: &str) -> Vec<(usize, usize)> {
        self.pattern(term).find_spans(text)
    }

    /// First occurrence starting at or after `from`.
    pub fn find_next(&self, text: &str, term: &str, from: usize) -> Option<(usize, usize)> {
        self.find_all(text, term)
            .into_iter()
            .find(|&(start, _)| start >= from)
    }

    /// Last occurrence that ends at or before `before`.
    pub fn find_previous(&self, text: &str, term: &str, before: usize) -> Option<(usize, usize)> {
        self.find_all(text, term)
            .into_iter()
            .rev()
            .find(|&(_, end)| end <= before)
    }

    /// Replaces the first occurrence only.
    pub fn replace(&self, text: &str, term: &str, replacement: &str) -> (String, usize) {
        match self.find_all(text, term).first() {
            Some(&span) => replace_spans(text, &[span], replacement),
            None => (text.to_string(), 0),
        }
    }

    pub fn replace_all(&self, text: &str, term: &str, replacement: &str) -> (String, usize) {
        let spans = self.find_all(text, term);
        replace_spans(text, &spans, replacement)
    }
}

/// Splices `replacement` over each span, last span first, and returns the
/// new text with the number of spans.
///
/// `spans` must be sorted by start. Every span is spliced even when it
/// overlaps the one after it; its end is then clamped to the shortened text.
pub(crate) fn replace_spans(
    text: &str,
    spans: &[(usize, usize)],
    replacement: &str,
) -> (String, usize) {
    let mut replaced = text.to_string();

    for &(start, end) in spans.iter().rev() {
        let mut end = end.min(replaced.len());
        while !replaced.is_char_boundary(end) {
            end += 1;
        }
        replaced.replace_range(start.min(end)..end, replacement);
    }

    (replaced, spans.len())
}
