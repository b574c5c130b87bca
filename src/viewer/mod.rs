// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! The viewer engine.
//!
//! [`Viewer`] owns the loaded dataset and wires the components together:
//! input flows through search and selection, cross-sheet jumps go through
//! the sheet switcher, and every centering move goes through the viewport
//! controller of the active sheet. One engine serves both delivery modes;
//! the mode only decides how sheet diagrams reach the switcher.


use std::fmt;

use crate::geom::{Rect, Size};
use crate::model::{
    IndividualId, IndividualIndex, SheetId, SheetRegistry, ViewerSession,
};
use crate::results::ResultsPanel;
use crate::router::{self, RouteChange};
use crate::search::{self, QueryOutcome};
use crate::select::{self, SelectError};
use crate::sheet::{
    switch_to, SheetActivation, SheetFetcher, SheetMode, SheetSwitcher, SwitchError,
    SwitchOutcome,
};
use crate::store::Bundle;
use crate::surface::{MemorySurface, RegionRole, RenderSurface, SheetGeometry};
use crate::theme::{PreferenceError, PreferenceStore, Theme};
use crate::viewport::{MemoryPanZoom, ViewportController};

/// Where the results list lives relative to the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsPresentation {
    /// Docked beside the diagram; centering shifts by the panel width.
    Inline,
    /// Overlaid dialog; centering ignores it.
    Dialog,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    mode: SheetMode,
    results_presentation: ResultsPresentation,
    viewport_size: Size,
    results_width: f64,
}

impl ViewerConfig {
    pub fn new(mode: SheetMode) -> Self {
        Self {
            mode,
            results_presentation: ResultsPresentation::Inline,
            viewport_size: Size::new(1280.0, 800.0),
            results_width: 320.0,
        }
    }

    pub fn with_results_presentation(mut self, presentation: ResultsPresentation) -> Self {
        self.results_presentation = presentation;
        self
    }

    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.viewport_size = size;
        self
    }

    pub fn with_results_width(mut self, width: f64) -> Self {
        self.results_width = width;
        self
    }

    pub fn mode(&self) -> SheetMode {
        self.mode
    }
}

pub struct Viewer {
    config: ViewerConfig,
    index: IndividualIndex,
    registry: SheetRegistry,
    session: ViewerSession,
    switcher: SheetSwitcher,
    surface: MemorySurface,
    viewport: Option<ViewportController>,
    panel: ResultsPanel,
    fetcher: Box<dyn SheetFetcher>,
    preferences: Box<dyn PreferenceStore>,
    fragment: Option<String>,
}

impl Viewer {
    pub fn new(
        bundle: Bundle,
        config: ViewerConfig,
        fetcher: Box<dyn SheetFetcher>,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let (index, registry) = bundle.into_parts();
        let mut session = ViewerSession::default();
        session.set_theme(preferences.load_theme().unwrap_or_default());

        Self {
            switcher: SheetSwitcher::new(config.mode),
            config,
            index,
            registry,
            session,
            surface: MemorySurface::new(SheetGeometry::default()),
            viewport: None,
            panel: ResultsPanel::new(),
            fetcher,
            preferences,
            fragment: None,
        }
    }

    /// Registers a pre-rendered diagram with the switcher. Static mode seeds
    /// every sheet; dynamic mode seeds the embedded default.
    pub fn install_sheet(&mut self, sheet_id: SheetId, geometry: SheetGeometry) {
        self.switcher.install_resident(sheet_id, geometry);
    }

    /// Activates the initial sheet: the one a deep-link fragment names, or
    /// the first registered sheet.
    pub async fn start(&mut self, fragment: Option<&str>) -> Result<(), ViewerError> {
        let target = fragment
            .and_then(|fragment| router::decode_fragment(fragment, &self.registry))
            .unwrap_or_else(|| self.registry.default_id().clone());
        self.switch_sheet(&target).await?;
        Ok(())
    }

    /// Switches to `target`. Returns false when a newer switch superseded
    /// this one while its fetch was in flight.
    pub async fn switch_sheet(&mut self, target: &SheetId) -> Result<bool, ViewerError> {
        if !self.registry.has(target) {
            return Err(ViewerError::UnknownSheet {
                sheet_id: target.clone(),
            });
        }

        match switch_to(&mut self.switcher, self.fetcher.as_ref(), target).await {
            Ok(SwitchOutcome::AlreadyActive) => Ok(true),
            Ok(SwitchOutcome::Activated(activation)) => {
                self.activate(activation);
                Ok(true)
            }
            Ok(SwitchOutcome::Superseded) => Ok(false),
            Err(err) => Err(ViewerError::Switch(err)),
        }
    }

    fn activate(&mut self, activation: SheetActivation) {
        let sheet_id = activation.sheet_id().clone();

        // A fetched diagram carries no markers; the remembered selection
        // would point into the discarded sheet.
        if activation.via_fetch() {
            let selection = self.session.selection_mut();
            selection.set_selected_individual_id(None);
            selection.set_highlighted_family_tag(None);
        }

        self.surface.replace_diagram(activation.into_geometry());
        self.session.set_active_sheet_id(Some(sheet_id.clone()));
        self.viewport = Some(ViewportController::new(Box::new(MemoryPanZoom::new(
            self.config.viewport_size,
        ))));
        self.fragment = Some(router::encode_fragment(&sheet_id));
    }

    /// Reacts to an external deep-link change. Unknown and malformed
    /// fragments are ignored; a known different sheet is switched to and its
    /// view reset to unit scale.
    pub async fn handle_fragment_change(&mut self, fragment: &str) -> Result<(), ViewerError> {
        match router::route_fragment(fragment, self.session.active_sheet_id(), &self.registry) {
            RouteChange::SwitchTo(sheet_id) => {
                if self.switch_sheet(&sheet_id).await? {
                    if let Some(viewport) = &mut self.viewport {
                        viewport.normalize_real_zoom();
                    }
                }
                Ok(())
            }
            RouteChange::Ignore => Ok(()),
        }
    }

    /// Centers an individual in the viewport and selects it, switching to
    /// its owning sheet first when necessary.
    pub async fn scroll_into_view(
        &mut self,
        individual_id: &IndividualId,
    ) -> Result<(), ViewerError> {
        let owner = self
            .index
            .get(individual_id)
            .ok_or_else(|| ViewerError::UnknownIndividual {
                individual_id: individual_id.clone(),
            })?
            .sheet_id()
            .clone();

        let cross_sheet = self.session.active_sheet_id() != Some(&owner);
        if cross_sheet && !self.switch_sheet(&owner).await? {
            // Superseded mid-flight; the newer switch owns the viewport now.
            return Ok(());
        }

        self.center_on(individual_id, cross_sheet)?;
        select::highlight_individual(self.session.selection_mut(), &mut self.surface, individual_id)
            .map_err(ViewerError::Select)
    }

    fn center_on(&mut self, individual_id: &IndividualId, reset_zoom: bool) -> Result<(), ViewerError> {
        let offset = self.results_offset();
        let bounding_box = self
            .surface
            .bounding_box_of(individual_id.as_str())
            .ok_or_else(|| {
                ViewerError::Select(SelectError::MissingBoundingBox {
                    individual_id: individual_id.clone(),
                })
            })?;

        let viewport = self.viewport.as_mut().ok_or(ViewerError::Inactive)?;
        let target = viewport.center_target(offset);
        let element = apply_transform(bounding_box, viewport.zoom(), viewport.pan().x(), viewport.pan().y());
        // The surface element itself is untransformed and sits at the
        // viewport origin.
        let delta = ViewportController::translate(element, Rect::default(), target);
        viewport.pan_by(delta);

        if reset_zoom {
            let real_zoom = viewport.real_zoom();
            if real_zoom != 0.0 {
                viewport.zoom_at_point(1.0 / real_zoom, target);
            }
        }
        Ok(())
    }

    fn results_offset(&self) -> f64 {
        if self.panel.is_visible() && self.config.results_presentation == ResultsPresentation::Inline
        {
            self.config.results_width
        } else {
            0.0
        }
    }

    /// Dispatches a pointer hit on a diagram element by its region role.
    pub async fn click_region(&mut self, element_id: &str) -> Result<(), ViewerError> {
        let region = self
            .surface
            .region(element_id)
            .ok_or_else(|| {
                ViewerError::Select(SelectError::UnknownElement {
                    element_id: element_id.to_owned(),
                })
            })?;

        match region.role() {
            RegionRole::IndividualActiveArea => {
                let individual_id =
                    IndividualId::new(region.element_id()).map_err(|_| {
                        ViewerError::Select(SelectError::UnknownElement {
                            element_id: element_id.to_owned(),
                        })
                    })?;
                select::highlight_individual(
                    self.session.selection_mut(),
                    &mut self.surface,
                    &individual_id,
                )
                .map_err(ViewerError::Select)
            }
            RegionRole::IndividualLabelHyperlink => {
                let target = region
                    .target_id()
                    .and_then(|target| IndividualId::new(target).ok())
                    .ok_or_else(|| ViewerError::MissingTarget {
                        element_id: element_id.to_owned(),
                    })?;
                self.scroll_into_view(&target).await
            }
            RegionRole::FamilyLine | RegionRole::PedigreeLink => select::highlight_family_link(
                self.session.selection_mut(),
                &mut self.surface,
                element_id,
            )
            .map(|_| ())
            .map_err(ViewerError::Select),
        }
    }

    /// Applies a raw search input. Showing or hiding the results panel
    /// re-centers on the remembered individual.
    pub async fn set_query(&mut self, raw: &str) -> Result<QueryOutcome, ViewerError> {
        let outcome = search::set_query(self.session.search_mut(), raw);
        match outcome {
            QueryOutcome::ShowResults => {
                let (search, selection) = self.session.search_and_selection_mut();
                let recenter = self.panel.show(search, &self.index, &self.registry, selection);
                if let Some(individual_id) = recenter {
                    self.scroll_into_view(&individual_id).await?;
                }
            }
            QueryOutcome::HideResults => {
                let recenter = self.panel.hide(self.session.selection_mut());
                if let Some(individual_id) = recenter {
                    self.scroll_into_view(&individual_id).await?;
                }
            }
            QueryOutcome::Unchanged => {}
        }
        Ok(outcome)
    }

    /// Closes the results panel (the clear button next to the search input).
    pub async fn hide_results(&mut self) -> Result<(), ViewerError> {
        self.session.search_mut().reset();
        let recenter = self.panel.hide(self.session.selection_mut());
        if let Some(individual_id) = recenter {
            self.scroll_into_view(&individual_id).await?;
        }
        Ok(())
    }

    /// Scroll notification from the hosting results list.
    pub fn handle_results_scroll(
        &mut self,
        scroll_top: f64,
        client_height: f64,
        scroll_height: f64,
    ) {
        self.panel.handle_scroll(
            scroll_top,
            client_height,
            scroll_height,
            self.session.search_mut(),
            &self.index,
            &self.registry,
        );
    }

    /// Expands or collapses a result entry's detail and centers its
    /// individual.
    pub async fn toggle_entry_detail(
        &mut self,
        individual_id: &IndividualId,
    ) -> Result<(), ViewerError> {
        let target = self
            .panel
            .toggle_detail(self.session.selection_mut(), individual_id);
        self.scroll_into_view(&target).await
    }

    /// Pins a result entry as a detached overlay and centers its individual.
    pub async fn pin_entry(&mut self, individual_id: &IndividualId) -> Result<(), ViewerError> {
        if let Some(target) = self.panel.pin(individual_id) {
            self.scroll_into_view(&target).await?;
        }
        Ok(())
    }

    /// Removes the pinned overlay and returns to the on-sheet selection.
    pub async fn unpin_entry(&mut self) -> Result<(), ViewerError> {
        let recenter = self.panel.unpin(self.session.selection_mut());
        if let Some(individual_id) = recenter {
            self.scroll_into_view(&individual_id).await?;
        }
        Ok(())
    }

    /// Flips the theme and persists the choice.
    pub fn toggle_theme(&mut self) -> Result<Theme, ViewerError> {
        let theme = self.session.theme().toggled();
        self.session.set_theme(theme);
        self.preferences
            .save_theme(theme)
            .map_err(ViewerError::Preference)?;
        Ok(theme)
    }

    /// Captures pan and zoom ahead of printing.
    pub fn save_print_sizing(&mut self) {
        if let Some(viewport) = &mut self.viewport {
            viewport.save_sizing();
        }
    }

    /// Restores the sizing captured before printing; a no-op without a
    /// prior save.
    pub fn restore_print_sizing(&mut self) {
        if let Some(viewport) = &mut self.viewport {
            viewport.restore_sizing();
        }
    }

    pub fn session(&self) -> &ViewerSession {
        &self.session
    }

    pub fn index(&self) -> &IndividualIndex {
        &self.index
    }

    pub fn registry(&self) -> &SheetRegistry {
        &self.registry
    }

    pub fn results(&self) -> &ResultsPanel {
        &self.panel
    }

    pub fn surface(&self) -> &MemorySurface {
        &self.surface
    }

    pub fn viewport(&self) -> Option<&ViewportController> {
        self.viewport.as_ref()
    }

    /// Current deep-link fragment, once a sheet is active.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

fn apply_transform(rect: Rect, zoom: f64, pan_x: f64, pan_y: f64) -> Rect {
    Rect::new(
        rect.x() * zoom + pan_x,
        rect.y() * zoom + pan_y,
        rect.width() * zoom,
        rect.height() * zoom,
    )
}

#[derive(Debug)]
pub enum ViewerError {
    /// No sheet has been activated yet.
    Inactive,
    UnknownSheet { sheet_id: SheetId },
    UnknownIndividual { individual_id: IndividualId },
    /// A hyperlink region without a usable target id.
    MissingTarget { element_id: String },
    Switch(SwitchError),
    Select(SelectError),
    Preference(PreferenceError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "no active sheet"),
            Self::UnknownSheet { sheet_id } => {
                write!(f, "sheet is not registered (id={sheet_id})")
            }
            Self::UnknownIndividual { individual_id } => {
                write!(f, "individual is not in the dataset (id={individual_id})")
            }
            Self::MissingTarget { element_id } => {
                write!(f, "hyperlink has no target (id={element_id})")
            }
            Self::Switch(err) => err.fmt(f),
            Self::Select(err) => err.fmt(f),
            Self::Preference(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Switch(err) => Some(err),
            Self::Select(err) => Some(err),
            Self::Preference(err) => Some(err),
            _ => None,
        }
    }
}
