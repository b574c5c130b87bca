// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

use smol_str::SmolStr;

use super::ids::{IdError, IndividualId, SheetId};

/// One person record from the per-build dataset.
///
/// Relationship ids (father/mother/mates) are *not* validated against the
/// index here; a dangling id renders as an empty name fragment downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    sheet_id: SheetId,
    first_name: SmolStr,
    middle_name: SmolStr,
    last_name: SmolStr,
    birth_date: SmolStr,
    death_date: SmolStr,
    mate_ids: Vec<IndividualId>,
    father_id: Option<IndividualId>,
    mother_id: Option<IndividualId>,
    // Lowercased copies of the four searchable fields, fixed at load time so
    // the match predicate never allocates.
    match_fields: [SmolStr; 4],
}

impl Individual {
    /// Builds a record from the dataset's 9-field wire tuple
    /// `[sheetId, first, middle, last, birth, death, matesCsv, father, mother]`.
    pub fn from_fields(fields: &[String; 9]) -> Result<Self, IdError> {
        let sheet_id = SheetId::new(&fields[0])?;

        let mate_ids = fields[6]
            .split(',')
            .filter(|part| !part.is_empty())
            .map(IndividualId::new)
            .collect::<Result<Vec<_>, _>>()?;

        let father_id = optional_id(&fields[7])?;
        let mother_id = optional_id(&fields[8])?;

        let match_fields = [
            SmolStr::new(fields[1].to_lowercase()),
            SmolStr::new(fields[2].to_lowercase()),
            SmolStr::new(fields[3].to_lowercase()),
            SmolStr::new(fields[4].to_lowercase()),
        ];

        Ok(Self {
            sheet_id,
            first_name: SmolStr::new(&fields[1]),
            middle_name: SmolStr::new(&fields[2]),
            last_name: SmolStr::new(&fields[3]),
            birth_date: SmolStr::new(&fields[4]),
            death_date: SmolStr::new(&fields[5]),
            mate_ids,
            father_id,
            mother_id,
            match_fields,
        })
    }

    pub fn sheet_id(&self) -> &SheetId {
        &self.sheet_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn middle_name(&self) -> &str {
        &self.middle_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }

    pub fn death_date(&self) -> &str {
        &self.death_date
    }

    pub fn mate_ids(&self) -> &[IndividualId] {
        &self.mate_ids
    }

    pub fn father_id(&self) -> Option<&IndividualId> {
        self.father_id.as_ref()
    }

    pub fn mother_id(&self) -> Option<&IndividualId> {
        self.mother_id.as_ref()
    }

    /// First and middle name joined with a space, empty fragments skipped.
    pub fn given_names(&self) -> String {
        join_fragments(&[&self.first_name, &self.middle_name])
    }

    /// All name fragments joined with spaces, empty fragments skipped.
    pub fn full_name(&self) -> String {
        join_fragments(&[&self.first_name, &self.middle_name, &self.last_name])
    }

    /// Whether the record has any relationship data worth a detail row.
    pub fn has_relations(&self) -> bool {
        !self.mate_ids.is_empty() || self.father_id.is_some() || self.mother_id.is_some()
    }

    /// The lowercased searchable fields: first, middle, last, birth date.
    ///
    /// The death date is displayed but deliberately not searchable.
    pub fn match_fields(&self) -> &[SmolStr; 4] {
        &self.match_fields
    }
}

fn optional_id(value: &str) -> Result<Option<IndividualId>, IdError> {
    if value.is_empty() {
        return Ok(None);
    }
    IndividualId::new(value).map(Some)
}

fn join_fragments(fragments: &[&str]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if !fragment.is_empty() {
            parts.push(fragment);
        }
    }
    parts.join(" ")
}

#[cfg(test)]
pub(crate) fn fixture(fields: [&str; 9]) -> Individual {
    let owned: [String; 9] = fields.map(str::to_owned);
    Individual::from_fields(&owned).expect("fixture individual")
}
