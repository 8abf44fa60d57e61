//! Text search utilities for jsonpad.
//!
//! Literal and regex queries share one [`Query`] type. A [`SearchSession`]
//! keeps the results of the last search for one buffer, steps through them
//! with wraparound, and performs replacements.

mod engine;
mod error;
mod find_replace;
mod history;
mod matcher;
mod position;
mod query;
mod state;

pub use engine::{LiteralPattern, MatchStrategy, SearchEngine, find_matches};
pub use error::PatternError;
pub use find_replace::FindReplaceEngine;
pub use history::{DEFAULT_MAX_HISTORY, QueryHistory};
pub use matcher::{Match, SearchResults, highlight_regions};
pub use position::Position;
pub use query::Query;
pub use state::SearchSession;
