use thiserror::Error;

/// A regex query that failed to compile.
#[derive(Debug, Error)]
#[error("invalid search pattern `{pattern}`: {source}")]
pub struct PatternError {
    pattern: String,
    #[source]
    source: regex::Error,
}

impl PatternError {
    pub(crate) fn new(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self {
            pattern: pattern.into(),
            source,
        }
    }

    /// The pattern exactly as the caller supplied it.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
