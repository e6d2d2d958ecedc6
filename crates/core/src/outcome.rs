//! Tagged outcome of one live search request.

use crate::client::SearchError;
use crate::types::SearchResult;

/// What a finished request means for the dropdown.
///
/// Every failure renders the same error row; the variant keeps the cause for callers
/// and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// At least one category has matches.
    Results(SearchResult),
    /// Valid response with all three categories empty.
    Empty,
    Failure(SearchError),
}

impl SearchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SearchOutcome::Failure(_))
    }

    pub fn result(&self) -> Option<&SearchResult> {
        match self {
            SearchOutcome::Results(result) => Some(result),
            _ => None,
        }
    }
}

impl From<Result<SearchResult, SearchError>> for SearchOutcome {
    fn from(response: Result<SearchResult, SearchError>) -> Self {
        match response {
            Ok(result) if result.is_empty() => SearchOutcome::Empty,
            Ok(result) => SearchOutcome::Results(result),
            Err(e) => SearchOutcome::Failure(e),
        }
    }
}
