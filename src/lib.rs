// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Navigation, search and selection engine for generated offline
//! pedigree-chart viewers.
//!
//! A build of a family tree produces a dataset bundle (sheet diagrams plus
//! ordered individual/sheet maps); this crate is the runtime behind such a
//! viewer: multi-keyword search with incremental paging, cross-sheet
//! individual selection, deep-link routing and pan/zoom centering, all
//! behind headless-friendly seams ([`surface::RenderSurface`],
//! [`viewport::PanZoomProvider`], [`sheet::SheetFetcher`]).

pub mod geom;
pub mod model;
pub mod results;
pub mod router;
pub mod search;
pub mod select;
pub mod sheet;
pub mod store;
pub mod surface;
pub mod theme;
pub mod viewer;
pub mod viewport;
