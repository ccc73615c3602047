//! Backend command parsing.
//!
//! The translation service hands back an index-native command such as
//! `kind:pdf -onlyin "Downloads"`. The parser splits off the scope flag
//! pair (used later as a post-filter) and keeps the rest as the predicate
//! passed verbatim to the index.

mod parser;

pub use parser::{ParsedCommand, SCOPE_FLAG, extract_scope_hint, parse};
