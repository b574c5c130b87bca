// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Core data model: typed ids, individual records, the sheet registry, the
//! search index and the session context.
//!
//! Everything here is loaded once from the per-build dataset and immutable
//! for the session, except `ViewerSession` which carries the mutable
//! navigation/search/selection state.

pub mod ids;
pub mod index;
pub mod individual;
pub mod registry;
pub mod session;

pub use ids::{Id, IdError, IndividualId, SheetId};
pub use index::{matches, IndexError, IndividualIndex};
pub use individual::Individual;
pub use registry::{SheetRegistry, SheetRegistryError};
pub use session::{KeywordTokens, SearchState, SelectionState, ViewerSession};
