// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use stemma::geom::Size;
use stemma::model::{IndividualId, SheetId};
use stemma::sheet::{parse_sheet, SheetMode};
use stemma::store::{load_bundle, load_sheet_markup, DirSheetFetcher};
use stemma::surface::RenderSurface;
use stemma::theme::MemoryPreferenceStore;
use stemma::viewer::{Viewer, ViewerConfig};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("two_sheet_bundle")
}

fn viewer_for(mode: SheetMode) -> Viewer {
    let dir = fixtures_dir();
    let bundle = load_bundle(&dir).expect("bundle should load from fixtures");

    let resident: Vec<SheetId> = match mode {
        SheetMode::Static => bundle.registry().ids().cloned().collect(),
        SheetMode::Dynamic => vec![bundle.registry().default_id().clone()],
    };

    let config = ViewerConfig::new(mode)
        .with_viewport_size(Size::new(1000.0, 700.0))
        .with_results_width(200.0);
    let mut viewer = Viewer::new(
        bundle,
        config,
        Box::new(DirSheetFetcher::new(&dir)),
        Box::new(MemoryPreferenceStore::default()),
    );
    for sheet_id in resident {
        let markup = load_sheet_markup(&dir, &sheet_id)
            .unwrap_or_else(|err| panic!("failed to read markup for {sheet_id}: {err}"));
        let geometry = parse_sheet(&markup)
            .unwrap_or_else(|err| panic!("failed to parse markup for {sheet_id}: {err}"));
        viewer.install_sheet(sheet_id, geometry);
    }
    viewer
}

fn individual(id: &str) -> IndividualId {
    IndividualId::new(id).expect("test individual id")
}

#[tokio::test]
async fn static_bundle_searches_and_jumps_across_sheets() {
    let mut viewer = viewer_for(SheetMode::Static);
    viewer.start(None).await.expect("start on default sheet");

    assert_eq!(
        viewer.session().active_sheet_id().map(SheetId::as_str),
        Some("a")
    );
    assert_eq!(viewer.fragment(), Some("#/sheet/a"));

    viewer.set_query("doe").await.expect("query");
    let ids: Vec<&str> = viewer
        .results()
        .entries()
        .iter()
        .map(|entry| entry.individual_id().as_str())
        .collect();
    assert_eq!(ids, ["1", "3"]);
    assert_eq!(viewer.results().entries()[0].sheet_label(), "Sheet A");

    // The death year must not be searchable.
    viewer.set_query("1980").await.expect("query by death year");
    assert!(viewer.results().entries().is_empty());

    viewer
        .scroll_into_view(&individual("2"))
        .await
        .expect("jump to the other sheet");
    assert_eq!(
        viewer.session().active_sheet_id().map(SheetId::as_str),
        Some("b")
    );
    assert_eq!(viewer.fragment(), Some("#/sheet/b"));
    assert_eq!(
        viewer.session().selection().selected_individual_id(),
        Some(&individual("2"))
    );
    assert_eq!(viewer.surface().markers().len(), 8);
}

#[tokio::test]
async fn dynamic_bundle_fetches_the_missing_sheet_from_disk() {
    let mut viewer = viewer_for(SheetMode::Dynamic);
    viewer
        .start(Some("#/sheet/a"))
        .await
        .expect("start on the embedded sheet");

    viewer
        .scroll_into_view(&individual("2"))
        .await
        .expect("jump should fetch b.svg");
    assert_eq!(
        viewer.session().active_sheet_id().map(SheetId::as_str),
        Some("b")
    );
    assert_eq!(
        viewer.session().selection().selected_individual_id(),
        Some(&individual("2"))
    );
    assert_eq!(viewer.surface().markers().len(), 8);
}

#[tokio::test]
async fn deep_link_to_the_second_sheet_wins_over_the_default() {
    let mut viewer = viewer_for(SheetMode::Static);
    viewer
        .start(Some("#/sheet/b"))
        .await
        .expect("start on a deep link");

    assert_eq!(
        viewer.session().active_sheet_id().map(SheetId::as_str),
        Some("b")
    );
    assert_eq!(viewer.fragment(), Some("#/sheet/b"));
}
