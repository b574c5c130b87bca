// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Deep-link fragments.
//!
//! A shareable location is `#/sheet/<id>`; the router turns fragments into
//! registered sheet ids and back. Unknown or malformed fragments are ignored
//! rather than rejected, so a stale bookmark degrades to the default sheet.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{SheetId, SheetRegistry};

fn fragment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("#/sheet/([a-z0-9-]*)").expect("static fragment pattern"))
}

/// Fragment for the given sheet.
pub fn encode_fragment(sheet_id: &SheetId) -> String {
    format!("#/sheet/{sheet_id}")
}

/// Extracts a registered sheet id from a location fragment.
///
/// Returns `None` for fragments that do not match the pattern or that name
/// an unregistered sheet.
pub fn decode_fragment(fragment: &str, registry: &SheetRegistry) -> Option<SheetId> {
    let captures = fragment_pattern().captures(fragment)?;
    let sheet_id = SheetId::new(captures.get(1)?.as_str()).ok()?;
    registry.has(&sheet_id).then_some(sheet_id)
}

/// What an external fragment change should do to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteChange {
    /// Fragment names a registered sheet different from the active one.
    SwitchTo(SheetId),
    /// Same sheet, unknown sheet, or malformed fragment.
    Ignore,
}

/// Resolves an external fragment change against the active sheet.
pub fn route_fragment(
    fragment: &str,
    active: Option<&SheetId>,
    registry: &SheetRegistry,
) -> RouteChange {
    match decode_fragment(fragment, registry) {
        Some(sheet_id) if Some(&sheet_id) != active => RouteChange::SwitchTo(sheet_id),
        _ => RouteChange::Ignore,
    }
}
