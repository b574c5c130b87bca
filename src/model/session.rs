// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

use smallvec::SmallVec;
use smol_str::SmolStr;

use super::ids::{IndividualId, SheetId};
use crate::theme::Theme;

/// Keyword tokens of the current query, lowercase, in input order.
pub type KeywordTokens = SmallVec<[SmolStr; 4]>;

/// The one explicit session value threaded through the viewer.
///
/// Replaces the ambient globals of the original runtime (active sheet,
/// selection, search cursor); each component operates on the slice it needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewerSession {
    active_sheet_id: Option<SheetId>,
    selection: SelectionState,
    search: SearchState,
    theme: Theme,
}

impl ViewerSession {
    pub fn active_sheet_id(&self) -> Option<&SheetId> {
        self.active_sheet_id.as_ref()
    }

    pub fn set_active_sheet_id(&mut self, sheet_id: Option<SheetId>) {
        self.active_sheet_id = sheet_id;
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchState {
        &mut self.search
    }

    /// Split borrow for operations that update the search cursor while
    /// reading the selection.
    pub fn search_and_selection_mut(&mut self) -> (&mut SearchState, &mut SelectionState) {
        (&mut self.search, &mut self.selection)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}

/// At most one highlighted individual per active sheet and at most one
/// highlighted family-link group; the two are independent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    selected_individual_id: Option<IndividualId>,
    highlighted_family_tag: Option<SmolStr>,
    // The results entry whose detail is expanded; survives panel rebuilds
    // and drives recentering when the panel closes.
    results_selected_individual_id: Option<IndividualId>,
}

impl SelectionState {
    pub fn selected_individual_id(&self) -> Option<&IndividualId> {
        self.selected_individual_id.as_ref()
    }

    pub fn set_selected_individual_id(&mut self, individual_id: Option<IndividualId>) {
        self.selected_individual_id = individual_id;
    }

    pub fn highlighted_family_tag(&self) -> Option<&str> {
        self.highlighted_family_tag.as_deref()
    }

    pub fn set_highlighted_family_tag(&mut self, tag: Option<SmolStr>) {
        self.highlighted_family_tag = tag;
    }

    pub fn results_selected_individual_id(&self) -> Option<&IndividualId> {
        self.results_selected_individual_id.as_ref()
    }

    pub fn set_results_selected_individual_id(&mut self, individual_id: Option<IndividualId>) {
        self.results_selected_individual_id = individual_id;
    }
}

/// Current keyword list plus the scan cursor into the individual index.
///
/// The cursor records how many records have been scanned for the current
/// keyword set, so "load more" continues where the last page stopped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    tokens: KeywordTokens,
    cursor: usize,
}

impl SearchState {
    pub fn tokens(&self) -> &[SmolStr] {
        &self.tokens
    }

    pub fn set_tokens(&mut self, tokens: KeywordTokens) {
        self.tokens = tokens;
    }

    pub fn is_active(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub fn reset(&mut self) {
        self.tokens.clear();
        self.cursor = 0;
    }
}
