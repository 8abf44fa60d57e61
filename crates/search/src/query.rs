use std::hash::{Hash, Hasher};

use chrono::{DateTime, Local};

/// A search pattern together with the options that control how it matches.
///
/// Two queries are equal when their pattern and options are equal. The creation
/// timestamp is informational and takes no part in equality or hashing, so the
/// same search issued twice is recognised as one history entry.
#[derive(Debug, Clone)]
pub struct Query {
    pattern: String,
    case_sensitive: bool,
    whole_words: bool,
    use_regex: bool,
    created_at: DateTime<Local>,
}

impl Query {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            case_sensitive: false,
            whole_words: false,
            use_regex: false,
            created_at: Local::now(),
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_whole_words(mut self, whole_words: bool) -> Self {
        self.whole_words = whole_words;
        self
    }

    pub fn with_regex(mut self, use_regex: bool) -> Self {
        self.use_regex = use_regex;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_whole_words(&self) -> bool {
        self.whole_words
    }

    pub fn is_regex(&self) -> bool {
        self.use_regex
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    fn key(&self) -> (&str, bool, bool, bool) {
        (
            &self.pattern,
            self.case_sensitive,
            self.whole_words,
            self.use_regex,
        )
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Query {}

impl Hash for Query {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
