// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Selection highlighting: handle markers around an individual and the
//! family-link group highlight.
//!
//! Every operation clears its own previous state before adding new state;
//! that is what keeps the synchronous mutations reentrant-safe.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use smol_str::SmolStr;

use crate::geom::Rect;
use crate::model::{IndividualId, SelectionState};
use crate::surface::{HandleMarker, RenderSurface};

/// Side length of a selection handle, in surface pixels.
pub const HANDLE_SIZE: f64 = 8.0;

fn family_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^fam[0-9]+").expect("static family tag pattern"))
}

/// Marks an individual on the active sheet with eight handle markers placed
/// at the corners and edge midpoints of its bounding box, straddling the
/// boundary by half the handle size.
///
/// Callers must ensure the owning sheet is active first; this only does the
/// on-sheet marker work.
pub fn highlight_individual(
    selection: &mut SelectionState,
    surface: &mut dyn RenderSurface,
    individual_id: &IndividualId,
) -> Result<(), SelectError> {
    surface.clear_markers();

    let bb = surface
        .bounding_box_of(individual_id.as_str())
        .ok_or_else(|| SelectError::MissingBoundingBox {
            individual_id: individual_id.clone(),
        })?;

    let (x, y) = (bb.x(), bb.y());
    let (w, h) = (bb.width(), bb.height());
    let half = HANDLE_SIZE / 2.0;

    let anchors = [
        (x - HANDLE_SIZE, y - HANDLE_SIZE),
        (x + w / 2.0 - half, y - HANDLE_SIZE),
        (x + w, y - HANDLE_SIZE),
        (x - HANDLE_SIZE, y + h / 2.0 - half),
        (x + w, y + h / 2.0 - half),
        (x - HANDLE_SIZE, y + h),
        (x + w / 2.0 - half, y + h),
        (x + w, y + h),
    ];

    for (hx, hy) in anchors {
        surface.place_marker(HandleMarker::new(Rect::new(hx, hy, HANDLE_SIZE, HANDLE_SIZE)));
    }

    selection.set_selected_individual_id(Some(individual_id.clone()));
    Ok(())
}

/// Highlights the family group of a clicked relationship line.
///
/// Clears any existing link highlight, resolves the `fam<digits>` tag from
/// the clicked element's tag set and flags every element sharing it.
/// Individual selection is independent and untouched.
pub fn highlight_family_link(
    selection: &mut SelectionState,
    surface: &mut dyn RenderSurface,
    element_id: &str,
) -> Result<SmolStr, SelectError> {
    surface.clear_link_highlights();
    selection.set_highlighted_family_tag(None);

    let region = surface
        .region(element_id)
        .ok_or_else(|| SelectError::UnknownElement {
            element_id: element_id.to_owned(),
        })?;

    let tag = region
        .tags()
        .iter()
        .find(|tag| family_tag_pattern().is_match(tag))
        .cloned()
        .ok_or_else(|| SelectError::NoFamilyTag {
            element_id: element_id.to_owned(),
        })?;

    surface.highlight_links(&tag);
    selection.set_highlighted_family_tag(Some(tag.clone()));
    Ok(tag)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    MissingBoundingBox { individual_id: IndividualId },
    UnknownElement { element_id: String },
    NoFamilyTag { element_id: String },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBoundingBox { individual_id } => {
                write!(f, "no bounding box on the active sheet (id={individual_id})")
            }
            Self::UnknownElement { element_id } => {
                write!(f, "element not present on the active sheet (id={element_id})")
            }
            Self::NoFamilyTag { element_id } => {
                write!(f, "element carries no family tag (id={element_id})")
            }
        }
    }
}

impl std::error::Error for SelectError {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use smol_str::SmolStr;

    use super::{highlight_family_link, highlight_individual, SelectError, HANDLE_SIZE};
    use crate::geom::Rect;
    use crate::model::{IndividualId, SelectionState};
    use crate::surface::{MemorySurface, Region, RegionRole, RenderSurface, SheetGeometry};

    fn id(value: &str) -> IndividualId {
        IndividualId::new(value).expect("individual id")
    }

    fn surface() -> MemorySurface {
        let regions = vec![
            Region::new("1", RegionRole::IndividualActiveArea, Vec::new(), None),
            Region::new(
                "l1",
                RegionRole::FamilyLine,
                vec![SmolStr::new("fam7")],
                None,
            ),
            Region::new(
                "l2",
                RegionRole::PedigreeLink,
                vec![SmolStr::new("fam7")],
                None,
            ),
            Region::new("plain", RegionRole::FamilyLine, Vec::new(), None),
        ];
        let mut boxes = BTreeMap::new();
        boxes.insert(SmolStr::new("1"), Rect::new(100.0, 50.0, 40.0, 20.0));
        MemorySurface::new(SheetGeometry::new(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            regions,
            boxes,
        ))
    }

    #[test]
    fn places_eight_handles_straddling_the_bounding_box() {
        let mut selection = SelectionState::default();
        let mut surface = surface();

        highlight_individual(&mut selection, &mut surface, &id("1")).expect("highlight");

        let markers = surface.markers();
        assert_eq!(markers.len(), 8);

        // Top-left handle sits one handle-size off the box origin.
        assert_eq!(markers[0].rect(), Rect::new(92.0, 42.0, HANDLE_SIZE, HANDLE_SIZE));
        // Top-middle handle is centered on the top edge.
        assert_eq!(markers[1].rect(), Rect::new(116.0, 42.0, HANDLE_SIZE, HANDLE_SIZE));
        // Bottom-right handle starts at the box corner.
        assert_eq!(markers[7].rect(), Rect::new(140.0, 70.0, HANDLE_SIZE, HANDLE_SIZE));

        assert_eq!(selection.selected_individual_id(), Some(&id("1")));
    }

    #[test]
    fn selecting_again_replaces_previous_markers() {
        let mut selection = SelectionState::default();
        let mut surface = surface();

        highlight_individual(&mut selection, &mut surface, &id("1")).expect("highlight");
        highlight_individual(&mut selection, &mut surface, &id("1")).expect("highlight");
        assert_eq!(surface.markers().len(), 8);
    }

    #[test]
    fn missing_bounding_box_is_an_error() {
        let mut selection = SelectionState::default();
        let mut surface = surface();
        let err = highlight_individual(&mut selection, &mut surface, &id("ghost")).unwrap_err();
        assert_eq!(
            err,
            SelectError::MissingBoundingBox {
                individual_id: id("ghost")
            }
        );
        assert!(selection.selected_individual_id().is_none());
    }

    #[test]
    fn family_link_highlight_flags_the_whole_group() {
        let mut selection = SelectionState::default();
        let mut surface = surface();

        let tag = highlight_family_link(&mut selection, &mut surface, "l1").expect("highlight");
        assert_eq!(tag.as_str(), "fam7");
        assert_eq!(selection.highlighted_family_tag(), Some("fam7"));
        assert_eq!(surface.highlighted_link_tag(), Some(SmolStr::new("fam7")));
    }

    #[test]
    fn link_without_family_tag_clears_and_errors() {
        let mut selection = SelectionState::default();
        let mut surface = surface();
        highlight_family_link(&mut selection, &mut surface, "l1").expect("highlight");

        let err = highlight_family_link(&mut selection, &mut surface, "plain").unwrap_err();
        assert!(matches!(err, SelectError::NoFamilyTag { .. }));
        assert_eq!(selection.highlighted_family_tag(), None);
        assert_eq!(surface.highlighted_link_tag(), None);
    }

    #[test]
    fn individual_and_link_highlights_coexist() {
        let mut selection = SelectionState::default();
        let mut surface = surface();

        highlight_individual(&mut selection, &mut surface, &id("1")).expect("highlight");
        highlight_family_link(&mut selection, &mut surface, "l2").expect("highlight");

        assert_eq!(surface.markers().len(), 8);
        assert_eq!(selection.selected_individual_id(), Some(&id("1")));
        assert_eq!(selection.highlighted_family_tag(), Some("fam7"));
    }
}
