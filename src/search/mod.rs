//! Search execution.
//!
//! Runs a translated query end to end: parse the command, open scoped access
//! to the granted roots, query the file index once across all of them, then
//! post-filter, classify and cap the hits.

mod engine;
mod error;
mod filetype;
mod filter;
mod index;

pub use engine::{FailurePolicy, SearchEngine, SearchOptions, SearchPhase, collect_results};
pub use error::SearchError;
pub use filetype::classify;
pub use filter::{DateBasis, DateFilter, path_matches_hint};
pub use index::{IndexError, MdfindIndex, SearchIndex};
