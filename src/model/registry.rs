// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use smol_str::SmolStr;

use super::ids::SheetId;

/// The per-build set of pedigree sheets, in generation order.
///
/// The first registered sheet is the default active sheet when no deep link
/// selects another one, so the registry refuses to be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRegistry {
    entries: Vec<(SheetId, SmolStr)>,
}

impl SheetRegistry {
    pub fn from_entries(
        entries: impl IntoIterator<Item = (SheetId, String)>,
    ) -> Result<Self, SheetRegistryError> {
        let mut collected: Vec<(SheetId, SmolStr)> = Vec::new();
        for (sheet_id, label) in entries {
            if collected.iter().any(|(existing, _)| *existing == sheet_id) {
                return Err(SheetRegistryError::DuplicateSheet { sheet_id });
            }
            collected.push((sheet_id, SmolStr::new(label)));
        }

        if collected.is_empty() {
            return Err(SheetRegistryError::Empty);
        }

        Ok(Self { entries: collected })
    }

    pub fn has(&self, sheet_id: &SheetId) -> bool {
        self.entries.iter().any(|(id, _)| id == sheet_id)
    }

    pub fn label(&self, sheet_id: &SheetId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == sheet_id)
            .map(|(_, label)| label.as_str())
    }

    /// The first-registered sheet.
    pub fn default_id(&self) -> &SheetId {
        // Non-emptiness is enforced by the constructor.
        &self.entries[0].0
    }

    pub fn ids(&self) -> impl Iterator<Item = &SheetId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&SheetId, &str)> {
        self.entries.iter().map(|(id, label)| (id, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        // Always false; kept for symmetry with `len`.
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRegistryError {
    Empty,
    DuplicateSheet { sheet_id: SheetId },
}

impl fmt::Display for SheetRegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("sheet registry must contain at least one sheet"),
            Self::DuplicateSheet { sheet_id } => {
                write!(f, "sheet registered twice (id={sheet_id})")
            }
        }
    }
}

impl std::error::Error for SheetRegistryError {}

#[cfg(test)]
mod tests {
    use super::{SheetRegistry, SheetRegistryError};
    use crate::model::SheetId;

    fn sheet(id: &str) -> SheetId {
        SheetId::new(id).expect("sheet id")
    }

    fn fixture() -> SheetRegistry {
        SheetRegistry::from_entries([
            (sheet("main"), "Main Tree".to_owned()),
            (sheet("branch-2"), "Second Branch".to_owned()),
        ])
        .expect("registry")
    }

    #[test]
    fn rejects_empty_registry() {
        let result = SheetRegistry::from_entries([]);
        assert_eq!(result.unwrap_err(), SheetRegistryError::Empty);
    }

    #[test]
    fn rejects_duplicate_sheet() {
        let result = SheetRegistry::from_entries([
            (sheet("main"), "A".to_owned()),
            (sheet("main"), "B".to_owned()),
        ]);
        assert_eq!(
            result.unwrap_err(),
            SheetRegistryError::DuplicateSheet {
                sheet_id: sheet("main")
            }
        );
    }

    #[test]
    fn default_id_is_first_registered() {
        assert_eq!(fixture().default_id(), &sheet("main"));
    }

    #[test]
    fn ids_preserve_registration_order() {
        let registry = fixture();
        let ids: Vec<&str> = registry.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["main", "branch-2"]);
    }

    #[test]
    fn label_resolves_known_sheets_only() {
        let registry = fixture();
        assert_eq!(registry.label(&sheet("branch-2")), Some("Second Branch"));
        assert_eq!(registry.label(&sheet("nope")), None);
        assert!(registry.has(&sheet("main")));
        assert!(!registry.has(&sheet("nope")));
    }
}
