// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! The rendering-surface seam.
//!
//! The engine never touches a document tree directly; it talks to a
//! [`RenderSurface`], which exposes the diagram's interactive regions,
//! bounding boxes and overlay markers. A browser runtime backs this with the
//! live SVG; [`memory::MemorySurface`] backs it with parsed geometry for
//! headless operation and tests.

pub mod memory;

use std::collections::BTreeMap;

use smol_str::SmolStr;

use crate::geom::Rect;

pub use memory::MemorySurface;

/// Interactive element classes generated into every sheet diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionRole {
    /// Clickable body of an individual; selecting it draws handle markers.
    IndividualActiveArea,
    /// Label hyperlink jumping to another individual (possibly cross-sheet).
    IndividualLabelHyperlink,
    /// Family relationship line; selecting it highlights the family group.
    FamilyLine,
    /// Pedigree link line between sheets; highlights like a family line.
    PedigreeLink,
}

impl RegionRole {
    /// The class name the diagram generator emits for this role.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::IndividualActiveArea => "individual-active-area",
            Self::IndividualLabelHyperlink => "individual-label-hyperlink",
            Self::FamilyLine => "family-line",
            Self::PedigreeLink => "pedigree-link",
        }
    }

    pub fn from_class_name(name: &str) -> Option<Self> {
        match name {
            "individual-active-area" => Some(Self::IndividualActiveArea),
            "individual-label-hyperlink" => Some(Self::IndividualLabelHyperlink),
            "family-line" => Some(Self::FamilyLine),
            "pedigree-link" => Some(Self::PedigreeLink),
            _ => None,
        }
    }
}

/// One interactive element of the active diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    element_id: SmolStr,
    role: RegionRole,
    tags: Vec<SmolStr>,
    target_id: Option<SmolStr>,
}

impl Region {
    pub fn new(
        element_id: impl AsRef<str>,
        role: RegionRole,
        tags: Vec<SmolStr>,
        target_id: Option<SmolStr>,
    ) -> Self {
        Self {
            element_id: SmolStr::new(element_id.as_ref()),
            role,
            tags,
            target_id,
        }
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn role(&self) -> RegionRole {
        self.role
    }

    /// Class tags beyond the role class (includes the `fam<digits>` tag on
    /// family lines and pedigree links).
    pub fn tags(&self) -> &[SmolStr] {
        &self.tags
    }

    /// The `data-target-id` of a hyperlink region.
    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }
}

/// Parsed geometry of one sheet diagram: its surface extent, interactive
/// regions and the `-bb` bounding-box companions keyed by owner element id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetGeometry {
    surface_rect: Rect,
    regions: Vec<Region>,
    bounding_boxes: BTreeMap<SmolStr, Rect>,
}

impl SheetGeometry {
    pub fn new(
        surface_rect: Rect,
        regions: Vec<Region>,
        bounding_boxes: BTreeMap<SmolStr, Rect>,
    ) -> Self {
        Self {
            surface_rect,
            regions,
            bounding_boxes,
        }
    }

    pub fn surface_rect(&self) -> Rect {
        self.surface_rect
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn bounding_box(&self, element_id: &str) -> Option<Rect> {
        self.bounding_boxes.get(element_id).copied()
    }

    pub fn bounding_boxes(&self) -> &BTreeMap<SmolStr, Rect> {
        &self.bounding_boxes
    }
}

/// A fixed-size selection handle placed on the surface overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMarker {
    rect: Rect,
}

impl HandleMarker {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// The engine's view of the document's diagram area.
pub trait RenderSurface {
    /// Replaces the displayed diagram wholesale. Markers and link highlights
    /// do not survive the replacement.
    fn replace_diagram(&mut self, geometry: SheetGeometry);

    fn regions_by_role(&self, role: RegionRole) -> Vec<Region>;

    fn region(&self, element_id: &str) -> Option<Region>;

    /// Bounding box of the `-bb` companion for the given element.
    fn bounding_box_of(&self, element_id: &str) -> Option<Rect>;

    /// Extent of the containing diagram surface.
    fn surface_rect(&self) -> Rect;

    fn place_marker(&mut self, marker: HandleMarker);

    fn clear_markers(&mut self);

    fn markers(&self) -> Vec<HandleMarker>;

    /// Flags every element carrying `family_tag` as link-highlighted and
    /// returns how many were flagged.
    fn highlight_links(&mut self, family_tag: &str) -> usize;

    fn clear_link_highlights(&mut self);

    fn highlighted_link_tag(&self) -> Option<SmolStr>;
}
