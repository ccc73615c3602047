//! Search engine: translation, access, index query and filtering.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use super::error::SearchError;
use super::filetype::classify;
use super::filter::{DateFilter, path_matches_hint};
use super::index::{IndexError, SearchIndex};
use crate::query;
use crate::scope::{AccessScopeManager, ScopeError};
use crate::translate::Translate;
use crate::types::{FileResult, FileType, SearchHit, SearchOutcome};

/// What to do when the file index fails mid-search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and return an empty result.
    #[default]
    Degrade,
    /// Return the index error to the caller.
    Propagate,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Degrade => write!(f, "degrade"),
            FailurePolicy::Propagate => write!(f, "propagate"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub max_results: usize,
    pub on_index_failure: FailurePolicy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 1000,
            on_index_failure: FailurePolicy::Degrade,
        }
    }
}

/// Where the most recent search is in its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    TranslationPending,
    ParsePending,
    AccessPending,
    QueryRunning,
    Filtering,
    Done,
    Failed,
}

impl SearchPhase {
    /// Progress label for phases worth showing to a user.
    pub fn label(self) -> Option<&'static str> {
        match self {
            SearchPhase::TranslationPending => Some("Translating query"),
            SearchPhase::AccessPending => Some("Opening granted folders"),
            SearchPhase::QueryRunning => Some("Searching index"),
            SearchPhase::Filtering => Some("Filtering results"),
            _ => None,
        }
    }
}

/// Runs natural-language searches against a file index.
///
/// The access manager is shared; a search holds its lock from the moment
/// access is acquired until it is released, so searches through the same
/// manager run their access-holding phases one at a time.
pub struct SearchEngine<T, I> {
    translator: T,
    index: I,
    scopes: Arc<Mutex<AccessScopeManager>>,
    options: SearchOptions,
    phase: watch::Sender<SearchPhase>,
}

impl<T: Translate, I: SearchIndex> SearchEngine<T, I> {
    pub fn new(
        translator: T,
        index: I,
        scopes: Arc<Mutex<AccessScopeManager>>,
        options: SearchOptions,
    ) -> Self {
        let (phase, _) = watch::channel(SearchPhase::Idle);
        Self {
            translator,
            index,
            scopes,
            options,
            phase,
        }
    }

    /// Follow phase changes of searches run by this engine.
    pub fn subscribe(&self) -> watch::Receiver<SearchPhase> {
        self.phase.subscribe()
    }

    /// Search for files matching a natural-language query.
    ///
    /// Scoped access is released before this returns, on every path. If the
    /// returned future is dropped early, the index query is stopped and
    /// access is released as well.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let result = self.run(query).await;
        match &result {
            Ok(_) => self.set_phase(SearchPhase::Done),
            Err(e) => {
                debug!(error = %e, "search failed");
                self.set_phase(SearchPhase::Failed);
            }
        }
        result
    }

    async fn run(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        self.set_phase(SearchPhase::TranslationPending);
        let response = self.translator.translate(query).await?;

        let Some(command) = response.command() else {
            warn!(query, "translation returned no search command");
            return Err(SearchError::MissingCommand);
        };

        self.set_phase(SearchPhase::ParsePending);
        let parsed = query::parse(command);
        let dates = DateFilter::from_response(&response);
        debug!(
            predicate = %parsed.predicate,
            scope_hint = ?parsed.scope_hint,
            dates = ?dates,
            "parsed search command"
        );

        self.set_phase(SearchPhase::AccessPending);
        let mut scopes = self.scopes.lock().await;
        let session = ScopeSession::open(&mut scopes)?;
        if session.roots().is_empty() {
            warn!("no searchable roots");
            return Ok(SearchOutcome::empty());
        }

        self.set_phase(SearchPhase::QueryRunning);
        let paths = match self.index.query(&parsed.predicate, session.roots()).await {
            Ok(paths) => paths,
            Err(e @ IndexError::Unavailable(_)) => return Err(e.into()),
            Err(e) => match self.options.on_index_failure {
                FailurePolicy::Degrade => {
                    warn!(error = %e, "index query failed, returning no results");
                    return Ok(SearchOutcome::empty());
                }
                FailurePolicy::Propagate => return Err(e.into()),
            },
        };

        self.set_phase(SearchPhase::Filtering);
        let outcome = collect_results(
            &paths,
            parsed.scope_hint.as_deref(),
            dates.as_ref(),
            self.options.max_results,
            |path| self.index.stat(path),
            classify,
        );
        drop(session);

        info!(
            hits = paths.len(),
            results = outcome.total_results,
            has_more = outcome.has_more,
            "search complete"
        );
        Ok(outcome)
    }

    fn set_phase(&self, phase: SearchPhase) {
        debug!(?phase, "search phase");
        self.phase.send_replace(phase);
    }
}

/// Filter, cap and classify raw matches, keeping backend order.
///
/// `stat` runs only for paths that pass the hint filter, and only when the
/// date filter or the result needs timestamps. Collection stops at the first
/// admitted path past `max_results`; that path only sets `has_more` and is
/// never classified.
pub fn collect_results(
    paths: &[PathBuf],
    scope_hint: Option<&str>,
    dates: Option<&DateFilter>,
    max_results: usize,
    mut stat: impl FnMut(&Path) -> SearchHit,
    mut classify: impl FnMut(&str) -> FileType,
) -> SearchOutcome {
    let mut files = Vec::with_capacity(max_results.min(paths.len()));
    let mut has_more = false;

    for (idx, path) in paths.iter().enumerate() {
        let shown = path.to_string_lossy();
        if !path_matches_hint(&shown, scope_hint) {
            continue;
        }

        let dated = match dates {
            Some(filter) => {
                let hit = stat(path);
                if !filter.admits(&hit) {
                    continue;
                }
                Some(hit)
            }
            None => None,
        };

        if files.len() == max_results {
            has_more = true;
            break;
        }

        let hit = dated.unwrap_or_else(|| stat(path));
        files.push(FileResult::from_hit(idx, &hit, classify(&shown)));
    }

    SearchOutcome {
        total_results: files.len(),
        files,
        has_more,
    }
}

/// Scoped access held for one search. Dropping it releases every root.
struct ScopeSession<'a> {
    manager: &'a mut AccessScopeManager,
    roots: Vec<PathBuf>,
}

impl<'a> ScopeSession<'a> {
    fn open(manager: &'a mut AccessScopeManager) -> Result<Self, ScopeError> {
        match manager.resolve_or_request() {
            Ok(roots) => {
                debug!(roots = roots.len(), "scoped access acquired");
                Ok(Self { manager, roots })
            }
            Err(e) => {
                manager.release_all();
                Err(e)
            }
        }
    }

    fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl Drop for ScopeSession<'_> {
    fn drop(&mut self) {
        self.manager.release_all();
    }
}
