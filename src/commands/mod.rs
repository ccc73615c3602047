//! CLI command implementations.

mod config;
mod grant;
mod search;
mod translate;

pub use config::ConfigCmd;
pub use grant::GrantCmd;
pub use search::SearchCmd;
pub use translate::TranslateCmd;
