// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

use smol_str::SmolStr;

use super::{HandleMarker, Region, RegionRole, RenderSurface, SheetGeometry};
use crate::geom::Rect;

/// Headless surface backed by parsed sheet geometry.
///
/// Mirrors what the browser runtime does to the live SVG: markers are an
/// overlay on top of the geometry, link highlighting is a flag per element.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    geometry: SheetGeometry,
    markers: Vec<HandleMarker>,
    highlighted_tag: Option<SmolStr>,
}

impl MemorySurface {
    pub fn new(geometry: SheetGeometry) -> Self {
        Self {
            geometry,
            markers: Vec::new(),
            highlighted_tag: None,
        }
    }

    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }
}

impl RenderSurface for MemorySurface {
    fn replace_diagram(&mut self, geometry: SheetGeometry) {
        self.geometry = geometry;
        self.markers.clear();
        self.highlighted_tag = None;
    }

    fn regions_by_role(&self, role: RegionRole) -> Vec<Region> {
        self.geometry
            .regions()
            .iter()
            .filter(|region| region.role() == role)
            .cloned()
            .collect()
    }

    fn region(&self, element_id: &str) -> Option<Region> {
        self.geometry
            .regions()
            .iter()
            .find(|region| region.element_id() == element_id)
            .cloned()
    }

    fn bounding_box_of(&self, element_id: &str) -> Option<Rect> {
        self.geometry.bounding_box(element_id)
    }

    fn surface_rect(&self) -> Rect {
        self.geometry.surface_rect()
    }

    fn place_marker(&mut self, marker: HandleMarker) {
        self.markers.push(marker);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn markers(&self) -> Vec<HandleMarker> {
        self.markers.clone()
    }

    fn highlight_links(&mut self, family_tag: &str) -> usize {
        let flagged = self
            .geometry
            .regions()
            .iter()
            .filter(|region| region.tags().iter().any(|tag| tag == family_tag))
            .count();
        self.highlighted_tag = (flagged > 0).then(|| SmolStr::new(family_tag));
        flagged
    }

    fn clear_link_highlights(&mut self) {
        self.highlighted_tag = None;
    }

    fn highlighted_link_tag(&self) -> Option<SmolStr> {
        self.highlighted_tag.clone()
    }
}
