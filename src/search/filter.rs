//! Post-filters the index cannot express: path containment and date range.

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::warn;

use crate::translate::TranslationResponse;
use crate::types::SearchHit;

/// Bound format used by the translation service.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// True when `path` contains `hint` as whole path segment(s),
/// case-insensitively. No hint admits everything.
pub fn path_matches_hint(path: &str, hint: Option<&str>) -> bool {
    let Some(hint) = hint.map(normalize_hint).filter(|h| !h.is_empty()) else {
        return true;
    };

    let path = path.to_lowercase();
    let segment = format!("/{hint}");

    path.contains(&format!("{segment}/")) || path.ends_with(&segment)
}

fn normalize_hint(hint: &str) -> String {
    let hint = hint.trim();
    let hint = hint.strip_prefix('~').unwrap_or(hint);
    hint.trim_matches('/').to_lowercase()
}

/// Which timestamp a date range is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBasis {
    Created,
    Modified,
}

/// Inclusive calendar-day range. Missing bounds are open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub basis: DateBasis,
}

impl DateFilter {
    /// Build the filter carried by a translation response, if any.
    ///
    /// The filter exists whenever either bound key is present. A bound that
    /// fails to parse is treated as open.
    pub fn from_response(response: &TranslationResponse) -> Option<Self> {
        if !response.has_date_filter() {
            return None;
        }

        let basis = if response.use_creation_date() {
            DateBasis::Created
        } else {
            DateBasis::Modified
        };

        Some(Self {
            start: response.start_date_filter.as_deref().and_then(parse_bound),
            end: response.end_date_filter.as_deref().and_then(parse_bound),
            basis,
        })
    }

    /// Whether `hit` falls in the range. Hits with no timestamp for the
    /// chosen basis always pass.
    pub fn admits(&self, hit: &SearchHit) -> bool {
        let ts = match self.basis {
            DateBasis::Created => hit.created_at,
            DateBasis::Modified => hit.modified_at,
        };
        self.contains(ts)
    }

    pub fn contains(&self, ts: Option<DateTime<Utc>>) -> bool {
        let Some(ts) = ts else {
            return true;
        };
        let day = ts.with_timezone(&Local).date_naive();

        let after_start = self.start.is_none_or(|start| day >= start);
        let before_end = self.end.is_none_or(|end| day <= end);
        after_start && before_end
    }
}

fn parse_bound(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(bound = raw, error = %e, "ignoring unparseable date bound");
            None
        }
    }
}
