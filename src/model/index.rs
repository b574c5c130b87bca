// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fmt;

use memchr::memmem;

use super::ids::IndividualId;
use super::individual::Individual;

/// Immutable-after-load index of all individuals across all sheets.
///
/// Iteration order is dataset insertion order; the search cursor relies on it
/// being stable and restartable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndividualIndex {
    records: Vec<(IndividualId, Individual)>,
    positions: BTreeMap<IndividualId, usize>,
}

impl IndividualIndex {
    pub fn from_records(
        records: impl IntoIterator<Item = (IndividualId, Individual)>,
    ) -> Result<Self, IndexError> {
        let mut index = Self::default();
        for (individual_id, record) in records {
            if index.positions.contains_key(&individual_id) {
                return Err(IndexError::DuplicateIndividual { individual_id });
            }
            index
                .positions
                .insert(individual_id.clone(), index.records.len());
            index.records.push((individual_id, record));
        }
        Ok(index)
    }

    pub fn get(&self, individual_id: &IndividualId) -> Option<&Individual> {
        self.positions
            .get(individual_id)
            .map(|&pos| &self.records[pos].1)
    }

    /// Restartable iteration over `(id, record)` in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&IndividualId, &Individual)> {
        self.records.iter().map(|(id, record)| (id, record))
    }

    /// Entries starting at an absolute record position, for cursor-based
    /// incremental scans.
    pub fn entries_from(
        &self,
        position: usize,
    ) -> impl Iterator<Item = (&IndividualId, &Individual)> {
        self.records
            .iter()
            .skip(position)
            .map(|(id, record)| (id, record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full name of a referenced individual, or `None` when the reference
    /// does not resolve. Callers render `None` as an absent fragment.
    pub fn full_name_of(&self, individual_id: &IndividualId) -> Option<String> {
        self.get(individual_id).map(Individual::full_name)
    }
}

/// True iff every token is a case-insensitive substring of at least one
/// searchable field (first, middle, last name or birth date).
///
/// Tokens must already be lowercase; an empty token list matches everything.
pub fn matches(record: &Individual, tokens: &[impl AsRef<str>]) -> bool {
    tokens.iter().all(|token| {
        let token = token.as_ref().as_bytes();
        record
            .match_fields()
            .iter()
            .any(|field| memmem::find(field.as_bytes(), token).is_some())
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    DuplicateIndividual { individual_id: IndividualId },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateIndividual { individual_id } => {
                write!(f, "individual registered twice (id={individual_id})")
            }
        }
    }
}

impl std::error::Error for IndexError {}
