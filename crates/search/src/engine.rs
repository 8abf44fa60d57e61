use std::borrow::Cow;

use memchr::memmem;
use regex::{Regex, RegexBuilder};

use crate::error::PatternError;
use crate::matcher::Match;
use crate::position;
use crate::query::Query;

/// How a compiled query looks for occurrences.
#[derive(Debug, Clone)]
pub enum MatchStrategy {
    /// Plain substring scan. Overlapping occurrences are all reported.
    Literal(LiteralPattern),
    /// Regex scan using the engine's own non-overlapping iteration.
    Regex(Regex),
}

impl MatchStrategy {
    /// Byte ranges of every occurrence in `text`, ascending by start.
    pub fn find_spans(&self, text: &str) -> Vec<(usize, usize)> {
        match self {
            Self::Literal(literal) => literal.find_spans(text),
            Self::Regex(regex) => regex
                .find_iter(text)
                .filter(|m| !m.is_empty())
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }
}

/// A literal needle prepared for repeated scans.
#[derive(Debug, Clone)]
pub struct LiteralPattern {
    needle: String,
    case_sensitive: bool,
    whole_words: bool,
    word_char: fn(char) -> bool,
}

impl LiteralPattern {
    pub fn new(pattern: &str, case_sensitive: bool, whole_words: bool) -> Self {
        let needle = if case_sensitive {
            pattern.to_string()
        } else {
            fold_case(pattern)
        };
        Self {
            needle,
            case_sensitive,
            whole_words,
            word_char: is_word_char,
        }
    }

    /// Replaces the whole-word test for the chars around a hit.
    pub(crate) fn with_word_chars(mut self, word_char: fn(char) -> bool) -> Self {
        self.word_char = word_char;
        self
    }

    pub fn find_spans(&self, text: &str) -> Vec<(usize, usize)> {
        if self.needle.is_empty() || text.is_empty() {
            return Vec::new();
        }

        let haystack = Haystack::new(text, self.case_sensitive);
        let folded: &str = &haystack.folded;
        let finder = memmem::Finder::new(self.needle.as_bytes());

        let mut spans = Vec::new();
        let mut from = 0;
        while let Some(found) = finder.find(&folded.as_bytes()[from..]) {
            let pos = from + found;
            // Resume one character later so overlapping hits are still seen.
            from = pos + folded[pos..].chars().next().map_or(1, char::len_utf8);

            let Some((start, end)) = haystack.original_span(pos, pos + self.needle.len()) else {
                continue;
            };
            if self.whole_words && !is_whole_word(text, start, end, self.word_char) {
                continue;
            }
            spans.push((start, end));
        }
        spans
    }
}

/// The text as the literal scan sees it, plus a way back to original offsets.
struct Haystack<'a> {
    folded: Cow<'a, str>,
    // For each folded byte, the original offset of the char it came from when
    // that byte starts the char's lowercase expansion. Has one trailing entry
    // for the end of text. `None` when the text was not folded.
    origins: Option<Vec<Option<usize>>>,
}

impl<'a> Haystack<'a> {
    fn new(text: &'a str, case_sensitive: bool) -> Self {
        if case_sensitive {
            return Self {
                folded: Cow::Borrowed(text),
                origins: None,
            };
        }

        let mut folded = String::with_capacity(text.len());
        let mut origins = Vec::with_capacity(text.len() + 1);
        for (offset, ch) in text.char_indices() {
            let before = folded.len();
            folded.extend(ch.to_lowercase());
            origins.push(Some(offset));
            origins.extend(std::iter::repeat_n(None, folded.len() - before - 1));
        }
        origins.push(Some(text.len()));

        Self {
            folded: Cow::Owned(folded),
            origins: Some(origins),
        }
    }

    fn original_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        match &self.origins {
            None => Some((start, end)),
            Some(origins) => Some(((*origins.get(start)?)?, (*origins.get(end)?)?)),
        }
    }
}

fn fold_case(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// True when `text[start..end]` is not glued to a word character on either side.
fn is_whole_word(text: &str, start: usize, end: usize, word_char: fn(char) -> bool) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(word_char) && !after.is_some_and(word_char)
}

/// A query compiled into its matching strategy.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    query: Query,
    strategy: MatchStrategy,
}

impl SearchEngine {
    pub fn compile(query: &Query) -> Result<Self, PatternError> {
        let strategy = if query.is_regex() {
            let source = if query.is_whole_words() {
                format!(r"\b{}\b", query.pattern())
            } else {
                query.pattern().to_string()
            };
            let regex = RegexBuilder::new(&source)
                .case_insensitive(!query.is_case_sensitive())
                .build()
                .map_err(|e| PatternError::new(query.pattern(), e))?;
            MatchStrategy::Regex(regex)
        } else {
            MatchStrategy::Literal(LiteralPattern::new(
                query.pattern(),
                query.is_case_sensitive(),
                query.is_whole_words(),
            ))
        };

        Ok(Self {
            query: query.clone(),
            strategy,
        })
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn strategy(&self) -> &MatchStrategy {
        &self.strategy
    }

    pub fn find(&self, text: &str) -> Vec<Match> {
        if text.is_empty() || self.query.is_empty() {
            return Vec::new();
        }

        self.strategy
            .find_spans(text)
            .into_iter()
            .map(|(start, end)| Match::new(text, start, end, position::locate(text, start)))
            .collect()
    }
}

/// Compiles `query` and returns every match in `text`.
pub fn find_matches(text: &str, query: &Query) -> Result<Vec<Match>, PatternError> {
    if text.is_empty() || query.is_empty() {
        return Ok(Vec::new());
    }
    Ok(SearchEngine::compile(query)?.find(text))
}
