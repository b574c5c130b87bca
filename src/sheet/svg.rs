// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Parsing of per-sheet diagram resources.
//!
//! A sheet resource is well-formed vector markup with a single `svg` root.
//! The generator tags interactive substructure with the role classes consumed
//! by the selection code, pairs each selectable element with an `<id>-bb`
//! bounding-box companion, and marks family groups with a `fam<digits>` class.

use std::collections::BTreeMap;
use std::fmt;

use roxmltree::{Document, Node};
use smol_str::SmolStr;

use crate::geom::Rect;
use crate::surface::{Region, RegionRole, SheetGeometry};

const BOUNDING_BOX_SUFFIX: &str = "-bb";

/// Parses fetched sheet markup into surface geometry.
pub fn parse_sheet(text: &str) -> Result<SheetGeometry, SheetParseError> {
    let doc = Document::parse(text).map_err(SheetParseError::Malformed)?;
    let root = doc.root_element();
    if !root.has_tag_name("svg") {
        return Err(SheetParseError::NotSvg {
            found: root.tag_name().name().to_owned(),
        });
    }

    let surface_rect = surface_rect(&root);

    let mut regions = Vec::new();
    let mut bounding_boxes = BTreeMap::new();

    for node in root.descendants().filter(Node::is_element) {
        if let Some(element_id) = node.attribute("id") {
            if let Some(owner) = element_id.strip_suffix(BOUNDING_BOX_SUFFIX) {
                let rect = rect_from_attributes(&node).ok_or_else(|| {
                    SheetParseError::InvalidBoundingBox {
                        element_id: element_id.to_owned(),
                    }
                })?;
                bounding_boxes.insert(SmolStr::new(owner), rect);
                continue;
            }
        }

        let Some(class_attr) = node.attribute("class") else {
            continue;
        };

        let mut role = None;
        let mut tags = Vec::new();
        for class in class_attr.split_whitespace() {
            match RegionRole::from_class_name(class) {
                Some(found) => role = Some(found),
                None => tags.push(SmolStr::new(class)),
            }
        }

        let Some(role) = role else {
            continue;
        };

        let element_id = node
            .attribute("id")
            .or_else(|| nearest_ancestor_id(&node))
            .unwrap_or_default();
        let target_id = node
            .attribute("data-target-id")
            .or_else(|| {
                node.ancestors()
                    .skip(1)
                    .filter(Node::is_element)
                    .find_map(|ancestor| ancestor.attribute("data-target-id"))
            })
            .map(SmolStr::new);

        regions.push(Region::new(element_id, role, tags, target_id));
    }

    Ok(SheetGeometry::new(surface_rect, regions, bounding_boxes))
}

fn nearest_ancestor_id<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.ancestors()
        .skip(1)
        .filter(Node::is_element)
        .find_map(|ancestor| ancestor.attribute("id"))
}

fn surface_rect(root: &Node<'_, '_>) -> Rect {
    if let Some(view_box) = root.attribute("viewBox") {
        let parts: Vec<f64> = view_box
            .split_whitespace()
            .filter_map(|part| part.parse().ok())
            .collect();
        if let [min_x, min_y, width, height] = parts.as_slice() {
            return Rect::new(*min_x, *min_y, *width, *height);
        }
    }

    let width = length_attribute(root, "width").unwrap_or(0.0);
    let height = length_attribute(root, "height").unwrap_or(0.0);
    Rect::new(0.0, 0.0, width, height)
}

fn length_attribute(node: &Node<'_, '_>, name: &str) -> Option<f64> {
    // Tolerates a `px` suffix; other units do not occur in generated sheets.
    let raw = node.attribute(name)?;
    raw.trim_end_matches("px").trim().parse().ok()
}

fn rect_from_attributes(node: &Node<'_, '_>) -> Option<Rect> {
    let x = node.attribute("x")?.parse().ok()?;
    let y = node.attribute("y")?.parse().ok()?;
    let width = node.attribute("width")?.parse().ok()?;
    let height = node.attribute("height")?.parse().ok()?;
    Some(Rect::new(x, y, width, height))
}

#[derive(Debug)]
pub enum SheetParseError {
    Malformed(roxmltree::Error),
    NotSvg { found: String },
    InvalidBoundingBox { element_id: String },
}

impl fmt::Display for SheetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "sheet markup is not well-formed: {err}"),
            Self::NotSvg { found } => {
                write!(f, "sheet root element must be svg (found <{found}>)")
            }
            Self::InvalidBoundingBox { element_id } => {
                write!(f, "bounding box {element_id} is missing x/y/width/height")
            }
        }
    }
}

impl std::error::Error for SheetParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_sheet, SheetParseError};
    use crate::geom::Rect;
    use crate::surface::RegionRole;

    pub(crate) const SHEET_MARKUP: &str = r#"
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 800 600">
          <g id="1" data-target-id="1">
            <rect class="individual-active-area"/>
            <text class="individual-label-hyperlink"/>
          </g>
          <rect id="1-bb" x="100" y="50" width="40" height="20"/>
          <path id="l1" class="family-line fam12"/>
          <path id="l2" class="pedigree-link fam12"/>
        </svg>
    "#;

    #[test]
    fn parses_regions_boxes_and_surface_extent() {
        let geometry = parse_sheet(SHEET_MARKUP).expect("geometry");

        assert_eq!(geometry.surface_rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(
            geometry.bounding_box("1"),
            Some(Rect::new(100.0, 50.0, 40.0, 20.0))
        );

        let roles: Vec<RegionRole> = geometry.regions().iter().map(|r| r.role()).collect();
        assert_eq!(
            roles,
            vec![
                RegionRole::IndividualActiveArea,
                RegionRole::IndividualLabelHyperlink,
                RegionRole::FamilyLine,
                RegionRole::PedigreeLink,
            ]
        );
    }

    #[test]
    fn active_area_inherits_the_enclosing_group_id_and_target() {
        let geometry = parse_sheet(SHEET_MARKUP).expect("geometry");
        let area = &geometry.regions()[0];
        assert_eq!(area.element_id(), "1");

        let hyperlink = &geometry.regions()[1];
        assert_eq!(hyperlink.target_id(), Some("1"));
    }

    #[test]
    fn family_tag_survives_as_region_tag() {
        let geometry = parse_sheet(SHEET_MARKUP).expect("geometry");
        let line = &geometry.regions()[2];
        assert_eq!(line.tags().len(), 1);
        assert_eq!(line.tags()[0].as_str(), "fam12");
    }

    #[test]
    fn rejects_markup_without_svg_root() {
        let err = parse_sheet("<html></html>").unwrap_err();
        assert!(matches!(err, SheetParseError::NotSvg { .. }));
    }

    #[test]
    fn rejects_malformed_markup() {
        let err = parse_sheet("<svg><unclosed></svg>").unwrap_err();
        assert!(matches!(err, SheetParseError::Malformed(_)));
    }

    #[test]
    fn rejects_bounding_box_without_extent() {
        let err = parse_sheet(r#"<svg><rect id="1-bb" x="1" y="2"/></svg>"#).unwrap_err();
        assert!(matches!(err, SheetParseError::InvalidBoundingBox { .. }));
    }
}
