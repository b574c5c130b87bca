// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Incremental multi-keyword search over the individual index.
//!
//! Queries are AND-of-substrings; result pages are produced lazily by
//! advancing a cursor through the index, so "load more" never rescans
//! records already visited.

use smol_str::SmolStr;

use crate::model::{matches, IndividualId, IndividualIndex, KeywordTokens, SearchState};

/// Matches the original runtime's page size; a single page may carry one
/// extra entry (the scan stops after *exceeding* the batch).
pub const DEFAULT_BATCH: usize = 25;

/// What the caller should do with the results panel after a query update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Token sequence identical to the previous query; no rescan, no UI
    /// churn.
    Unchanged,
    /// New non-empty keyword set; cursor reset, results should be rebuilt.
    ShowResults,
    /// Query cleared; results should be hidden.
    HideResults,
}

/// Trims, lowercases and splits the raw query on whitespace runs.
pub fn tokenize(raw: &str) -> KeywordTokens {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .map(SmolStr::new)
        .collect()
}

/// Applies a raw query string to the search state.
///
/// A query normalizing to the token sequence already in effect is a no-op;
/// this equality check is what keeps per-keystroke events cheap.
pub fn set_query(state: &mut SearchState, raw: &str) -> QueryOutcome {
    let tokens = tokenize(raw);

    if tokens.is_empty() {
        state.reset();
        return QueryOutcome::HideResults;
    }

    if tokens.as_slice() == state.tokens() {
        return QueryOutcome::Unchanged;
    }

    state.set_tokens(tokens);
    state.set_cursor(0);
    QueryOutcome::ShowResults
}

/// Scans the index from the cursor and returns the next page of matches.
pub fn next_page(state: &mut SearchState, index: &IndividualIndex) -> Vec<IndividualId> {
    next_page_with(state, index, DEFAULT_BATCH)
}

/// `next_page` with an explicit batch size.
///
/// The cursor advances to the absolute record position reached, so repeated
/// calls cover every record exactly once regardless of match density.
pub fn next_page_with(
    state: &mut SearchState,
    index: &IndividualIndex,
    batch: usize,
) -> Vec<IndividualId> {
    let mut row = state.cursor();
    let mut page = Vec::new();

    for (individual_id, record) in index.entries_from(state.cursor()) {
        row += 1;
        if matches(record, state.tokens()) {
            page.push(individual_id.clone());
            if page.len() > batch {
                break;
            }
        }
    }

    state.set_cursor(row);
    page
}
