// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Search results panel.
//!
//! The panel is plain state: an incrementally filled entry list, a
//! visibility flag and an optional pinned snapshot. Operations that should
//! move the viewport return the individual to re-center on; the viewer owns
//! the actual centering.

use smol_str::SmolStr;

use crate::model::{
    Individual, IndividualId, IndividualIndex, SearchState, SelectionState, SheetRegistry,
};
use crate::search;

/// One row of the results list, fully resolved at creation time so a pinned
/// clone stays valid when the live list is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    individual_id: IndividualId,
    given_names: String,
    last_name: SmolStr,
    birth_date: SmolStr,
    sheet_label: SmolStr,
    detail: Option<EntryDetail>,
}

impl ResultEntry {
    fn build(
        individual_id: &IndividualId,
        record: &Individual,
        index: &IndividualIndex,
        registry: &SheetRegistry,
    ) -> Self {
        Self {
            individual_id: individual_id.clone(),
            given_names: record.given_names(),
            last_name: record.last_name().into(),
            birth_date: record.birth_date().into(),
            sheet_label: registry
                .label(record.sheet_id())
                .map(SmolStr::new)
                .unwrap_or_default(),
            detail: EntryDetail::build(record, index),
        }
    }

    pub fn individual_id(&self) -> &IndividualId {
        &self.individual_id
    }

    pub fn given_names(&self) -> &str {
        &self.given_names
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }

    pub fn sheet_label(&self) -> &str {
        &self.sheet_label
    }

    pub fn detail(&self) -> Option<&EntryDetail> {
        self.detail.as_ref()
    }
}

/// Expandable relationship detail. Sides whose reference does not resolve to
/// an individual with a non-empty name are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryDetail {
    father: Option<String>,
    mother: Option<String>,
    mates: Vec<String>,
}

impl EntryDetail {
    fn build(record: &Individual, index: &IndividualIndex) -> Option<Self> {
        if !record.has_relations() {
            return None;
        }

        let father = record
            .father_id()
            .and_then(|father_id| index.full_name_of(father_id))
            .filter(|name| !name.is_empty());
        let mother = record
            .mother_id()
            .and_then(|mother_id| index.full_name_of(mother_id))
            .filter(|name| !name.is_empty());
        let mates: Vec<String> = record
            .mate_ids()
            .iter()
            .filter_map(|mate_id| index.full_name_of(mate_id))
            .filter(|name| !name.is_empty())
            .collect();

        Some(Self {
            father,
            mother,
            mates,
        })
    }

    pub fn father(&self) -> Option<&str> {
        self.father.as_deref()
    }

    pub fn mother(&self) -> Option<&str> {
        self.mother.as_deref()
    }

    pub fn mates(&self) -> &[String] {
        &self.mates
    }
}

/// True when a scroll position has come within one unit of the bottom; the
/// threshold the live list uses to append the next page.
pub fn near_bottom(scroll_top: f64, client_height: f64, scroll_height: f64) -> bool {
    scroll_top + client_height + 1.0 >= scroll_height
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsPanel {
    entries: Vec<ResultEntry>,
    visible: bool,
    pinned: Option<ResultEntry>,
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn pinned(&self) -> Option<&ResultEntry> {
        self.pinned.as_ref()
    }

    /// Search controls swap to a clear button while the panel is visible and
    /// disappear entirely while an entry is pinned.
    pub fn search_controls_visible(&self) -> bool {
        self.pinned.is_none()
    }

    /// Opens the panel for a fresh query: drops stale entries and loads the
    /// first page. Returns the individual to re-center on, preferring the
    /// expanded results entry over the on-sheet selection.
    pub fn show(
        &mut self,
        state: &mut SearchState,
        index: &IndividualIndex,
        registry: &SheetRegistry,
        selection: &SelectionState,
    ) -> Option<IndividualId> {
        self.entries.clear();
        self.visible = true;
        self.load_more(state, index, registry);
        remembered(selection)
    }

    /// Appends the next page of matches to the entry list.
    pub fn load_more(
        &mut self,
        state: &mut SearchState,
        index: &IndividualIndex,
        registry: &SheetRegistry,
    ) {
        for individual_id in search::next_page(state, index) {
            if let Some(record) = index.get(&individual_id) {
                self.entries
                    .push(ResultEntry::build(&individual_id, record, index, registry));
            }
        }
    }

    /// Scroll notification from the hosting list; loads another page once
    /// the position is near the bottom.
    pub fn handle_scroll(
        &mut self,
        scroll_top: f64,
        client_height: f64,
        scroll_height: f64,
        state: &mut SearchState,
        index: &IndividualIndex,
        registry: &SheetRegistry,
    ) {
        if self.visible && near_bottom(scroll_top, client_height, scroll_height) {
            self.load_more(state, index, registry);
        }
    }

    /// Closes the panel, dropping any pinned overlay. Returns the individual
    /// to re-center on; the remembered results entry wins over the on-sheet
    /// selection and is forgotten afterwards.
    pub fn hide(&mut self, selection: &mut SelectionState) -> Option<IndividualId> {
        self.pinned = None;
        self.visible = false;
        let target = remembered(selection);
        selection.set_results_selected_individual_id(None);
        target
    }

    /// Toggles an entry's expanded relationship detail. A second tap on the
    /// expanded entry collapses it; either way the viewport re-centers on
    /// that entry's individual.
    pub fn toggle_detail(
        &self,
        selection: &mut SelectionState,
        individual_id: &IndividualId,
    ) -> IndividualId {
        if selection.results_selected_individual_id() == Some(individual_id) {
            selection.set_results_selected_individual_id(None);
        } else {
            selection.set_results_selected_individual_id(Some(individual_id.clone()));
        }
        individual_id.clone()
    }

    /// Pins a snapshot of an entry as a detached overlay and hides the live
    /// list together with the search controls. Returns the individual to
    /// re-center on, or `None` when the id is not in the current list.
    pub fn pin(&mut self, individual_id: &IndividualId) -> Option<IndividualId> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.individual_id() == individual_id)?
            .clone();
        self.pinned = Some(entry);
        self.visible = false;
        Some(individual_id.clone())
    }

    /// Removes the pinned overlay and restores the live list. The pinned
    /// individual becomes the remembered results entry; the viewport returns
    /// to the on-sheet selection when there is one.
    pub fn unpin(&mut self, selection: &mut SelectionState) -> Option<IndividualId> {
        if let Some(entry) = self.pinned.take() {
            selection.set_results_selected_individual_id(Some(entry.individual_id().clone()));
            self.visible = true;
        }
        selection.selected_individual_id().cloned()
    }
}

fn remembered(selection: &SelectionState) -> Option<IndividualId> {
    selection
        .results_selected_individual_id()
        .or_else(|| selection.selected_individual_id())
        .cloned()
}
