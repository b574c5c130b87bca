// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Stemma CLI entrypoint.
//!
//! Loads a dataset bundle and runs the viewer engine headlessly: search,
//! sheet switching and selection print their outcome to stdout. By default
//! every sheet diagram is parsed up front (static mode); `--dynamic` loads
//! diagrams on demand the way the generated site fetches them.

use std::error::Error;
use std::path::PathBuf;

use stemma::model::{IndividualId, SheetId};
use stemma::sheet::{parse_sheet, SheetMode};
use stemma::store::{self, DirSheetFetcher};
use stemma::theme::FilePreferenceStore;
use stemma::viewer::{Viewer, ViewerConfig};

const PREFERENCES_FILE: &str = "preferences.json";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <bundle-dir> [--dynamic] [--query <keywords>] [--sheet <id>] [--select <individual-id>] [--toggle-theme]\n\nThe bundle directory holds individuals.json, sheets.json and one <id>.svg per sheet.\n\n--dynamic fetches sheet diagrams on demand instead of parsing all of them up front.\n--query runs a multi-keyword search and prints the first page of results.\n--sheet activates the given sheet before any selection.\n--select centers and selects the given individual, switching sheets when needed.\n--toggle-theme flips the persisted light/dark flag."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    bundle_dir: Option<String>,
    dynamic: bool,
    query: Option<String>,
    sheet: Option<String>,
    select: Option<String>,
    toggle_theme: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dynamic" => {
                if options.dynamic {
                    return Err(());
                }
                options.dynamic = true;
            }
            "--query" => {
                if options.query.is_some() {
                    return Err(());
                }
                options.query = Some(args.next().ok_or(())?);
            }
            "--sheet" => {
                if options.sheet.is_some() {
                    return Err(());
                }
                options.sheet = Some(args.next().ok_or(())?);
            }
            "--select" => {
                if options.select.is_some() {
                    return Err(());
                }
                options.select = Some(args.next().ok_or(())?);
            }
            "--toggle-theme" => {
                if options.toggle_theme {
                    return Err(());
                }
                options.toggle_theme = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.bundle_dir.is_some() {
                    return Err(());
                }
                options.bundle_dir = Some(arg);
            }
        }
    }

    if options.bundle_dir.is_none() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "stemma".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let dir = PathBuf::from(options.bundle_dir.unwrap_or_default());
        let bundle = store::load_bundle(&dir)?;

        let mode = if options.dynamic {
            SheetMode::Dynamic
        } else {
            SheetMode::Static
        };

        let mut viewer = Viewer::new(
            bundle,
            ViewerConfig::new(mode),
            Box::new(DirSheetFetcher::new(&dir)),
            Box::new(FilePreferenceStore::new(dir.join(PREFERENCES_FILE))),
        );

        // Static mode needs every diagram resident; dynamic mode embeds only
        // the default sheet and fetches the rest.
        let resident: Vec<SheetId> = match mode {
            SheetMode::Static => viewer.registry().ids().cloned().collect(),
            SheetMode::Dynamic => vec![viewer.registry().default_id().clone()],
        };
        for sheet_id in resident {
            let markup = store::load_sheet_markup(&dir, &sheet_id)?;
            viewer.install_sheet(sheet_id, parse_sheet(&markup)?);
        }

        // File reads run on the blocking pool; no reactor drivers needed.
        let runtime = tokio::runtime::Builder::new_current_thread().build()?;

        runtime.block_on(async {
            viewer.start(None).await?;

            if options.toggle_theme {
                let theme = viewer.toggle_theme()?;
                println!("theme: {theme}");
            }

            if let Some(raw) = options.sheet {
                let sheet_id = SheetId::new(&raw)?;
                viewer.switch_sheet(&sheet_id).await?;
            }

            if let Some(query) = options.query {
                viewer.set_query(&query).await?;
                let entries = viewer.results().entries();
                println!("results ({}):", entries.len());
                for entry in entries {
                    println!(
                        "  {}  {} {}  {}  [{}]",
                        entry.individual_id(),
                        entry.given_names(),
                        entry.last_name(),
                        entry.birth_date(),
                        entry.sheet_label(),
                    );
                }
            }

            if let Some(raw) = options.select {
                let individual_id = IndividualId::new(&raw)?;
                viewer.scroll_into_view(&individual_id).await?;
            }

            if let Some(sheet_id) = viewer.session().active_sheet_id() {
                let label = viewer.registry().label(sheet_id).unwrap_or_default();
                println!("active sheet: {sheet_id} ({label})");
            }
            if let Some(fragment) = viewer.fragment() {
                println!("deep link: {fragment}");
            }
            if let Some(individual_id) = viewer.session().selection().selected_individual_id() {
                let name = viewer.index().full_name_of(individual_id).unwrap_or_default();
                println!("selected: {individual_id} ({name})");
            }

            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("stemma: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_bundle_dir_alone() {
        let options = parse_options(["bundle".to_owned()].into_iter()).expect("parse options");
        assert_eq!(
            options,
            CliOptions {
                bundle_dir: Some("bundle".to_owned()),
                ..CliOptions::default()
            }
        );
    }

    #[test]
    fn parses_all_flags() {
        let options = parse_options(
            [
                "bundle",
                "--dynamic",
                "--query",
                "john doe",
                "--sheet",
                "branch-2",
                "--select",
                "I042",
                "--toggle-theme",
            ]
            .map(str::to_owned)
            .into_iter(),
        )
        .expect("parse options");

        assert!(options.dynamic);
        assert!(options.toggle_theme);
        assert_eq!(options.query.as_deref(), Some("john doe"));
        assert_eq!(options.sheet.as_deref(), Some("branch-2"));
        assert_eq!(options.select.as_deref(), Some("I042"));
    }

    #[test]
    fn rejects_missing_bundle_dir() {
        parse_options(["--dynamic".to_owned()].into_iter()).unwrap_err();
        parse_options(std::iter::empty()).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_and_dangling_flags() {
        parse_options(["bundle", "--dynamic", "--dynamic"].map(str::to_owned).into_iter())
            .unwrap_err();
        parse_options(["bundle", "--query"].map(str::to_owned).into_iter()).unwrap_err();
        parse_options(["bundle", "extra"].map(str::to_owned).into_iter()).unwrap_err();
        parse_options(["bundle", "--unknown"].map(str::to_owned).into_iter()).unwrap_err();
    }
}
