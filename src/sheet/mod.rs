// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Sheet switching.
//!
//! The switcher is a small state machine (`Inactive` → `Loading` →
//! `Active`) kept free of I/O: `begin_switch` decides whether a target can
//! activate synchronously or needs its diagram resource fetched, and
//! `apply_fetched` validates a completed fetch against the newest request
//! before installing it. [`switch_to`] is the async driver that awaits the
//! single suspension point.
//!
//! While a fetch is outstanding the viewer keeps accepting input, so a
//! switch issued during `Loading` supersedes the in-flight request; the
//! stale response is recognized by its sequence number and discarded.

pub mod svg;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::model::SheetId;
use crate::surface::SheetGeometry;

pub use svg::{parse_sheet, SheetParseError};

/// File extension of per-sheet diagram resources.
pub const SHEET_RESOURCE_EXT: &str = "svg";

/// How sheet diagrams reach the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetMode {
    /// All diagrams are pre-rendered into the document; switching is
    /// synchronous.
    Static,
    /// Only the default sheet is embedded; other diagrams are fetched on
    /// demand.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SwitchState {
    Inactive,
    Loading {
        seq: u64,
        target: SheetId,
        previous: Option<SheetId>,
    },
    Active(SheetId),
}

/// Everything the viewer needs to make a freshly activated sheet
/// interactive: install the geometry, rebind region listeners, rebuild the
/// viewport controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetActivation {
    sheet_id: SheetId,
    geometry: SheetGeometry,
    via_fetch: bool,
}

impl SheetActivation {
    pub fn sheet_id(&self) -> &SheetId {
        &self.sheet_id
    }

    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    pub fn into_geometry(self) -> SheetGeometry {
        self.geometry
    }

    /// A fetched sheet carries no prior marker state; the viewer clears the
    /// session's individual selection when this is set.
    pub fn via_fetch(&self) -> bool {
        self.via_fetch
    }
}

/// Outcome of `begin_switch`.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchStep {
    /// The target was already the active sheet; nothing to do.
    AlreadyActive,
    /// The target activated synchronously (pre-rendered, or the embedded
    /// default on the very first dynamic activation).
    Activated(SheetActivation),
    /// A fetch for `resource` is required; pass the response to
    /// `apply_fetched` with the same sequence number.
    Fetching { seq: u64, resource: String },
}

/// Outcome of `apply_fetched`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Activated(SheetActivation),
    /// The response belonged to a superseded request and was discarded.
    Stale,
}

/// Outcome of the async `switch_to` driver.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchOutcome {
    AlreadyActive,
    Activated(SheetActivation),
    /// A newer switch was requested while this one was in flight.
    Superseded,
}

#[derive(Debug)]
pub struct SheetSwitcher {
    mode: SheetMode,
    state: SwitchState,
    request_seq: u64,
    resident: BTreeMap<SheetId, SheetGeometry>,
}

impl SheetSwitcher {
    pub fn new(mode: SheetMode) -> Self {
        Self {
            mode,
            state: SwitchState::Inactive,
            request_seq: 0,
            resident: BTreeMap::new(),
        }
    }

    /// Registers a pre-rendered diagram. Static mode installs every sheet;
    /// dynamic mode installs only the embedded default.
    pub fn install_resident(&mut self, sheet_id: SheetId, geometry: SheetGeometry) {
        self.resident.insert(sheet_id, geometry);
    }

    pub fn mode(&self) -> SheetMode {
        self.mode
    }

    pub fn active_sheet_id(&self) -> Option<&SheetId> {
        match &self.state {
            SwitchState::Active(sheet_id) => Some(sheet_id),
            SwitchState::Loading { previous, .. } => previous.as_ref(),
            SwitchState::Inactive => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SwitchState::Loading { .. })
    }

    /// Starts a switch to `target`.
    pub fn begin_switch(&mut self, target: &SheetId) -> Result<SwitchStep, SwitchError> {
        if matches!(&self.state, SwitchState::Active(active) if active == target) {
            return Ok(SwitchStep::AlreadyActive);
        }

        match self.mode {
            SheetMode::Static => {
                let geometry = self.resident.get(target).cloned().ok_or_else(|| {
                    SwitchError::NotResident {
                        sheet_id: target.clone(),
                    }
                })?;
                self.state = SwitchState::Active(target.clone());
                Ok(SwitchStep::Activated(SheetActivation {
                    sheet_id: target.clone(),
                    geometry,
                    via_fetch: false,
                }))
            }
            SheetMode::Dynamic => {
                // The very first activation reuses the embedded default
                // diagram instead of fetching it again.
                if matches!(self.state, SwitchState::Inactive) {
                    if let Some(geometry) = self.resident.get(target).cloned() {
                        self.state = SwitchState::Active(target.clone());
                        return Ok(SwitchStep::Activated(SheetActivation {
                            sheet_id: target.clone(),
                            geometry,
                            via_fetch: false,
                        }));
                    }
                }

                self.request_seq += 1;
                let seq = self.request_seq;
                let previous = match &self.state {
                    SwitchState::Active(active) => Some(active.clone()),
                    SwitchState::Loading { previous, .. } => previous.clone(),
                    SwitchState::Inactive => None,
                };
                self.state = SwitchState::Loading {
                    seq,
                    target: target.clone(),
                    previous,
                };
                Ok(SwitchStep::Fetching {
                    seq,
                    resource: format!("{target}.{SHEET_RESOURCE_EXT}"),
                })
            }
        }
    }

    /// Applies a completed fetch.
    ///
    /// Responses from superseded requests are discarded silently. A failed
    /// or unparseable fetch restores the pre-loading state and surfaces the
    /// error; the previously active sheet is never disturbed.
    pub fn apply_fetched(
        &mut self,
        seq: u64,
        body: Result<String, FetchError>,
    ) -> Result<FetchOutcome, SwitchError> {
        let (target, previous) = match &self.state {
            SwitchState::Loading {
                seq: current,
                target,
                previous,
            } if *current == seq => (target.clone(), previous.clone()),
            _ => return Ok(FetchOutcome::Stale),
        };

        let text = match body {
            Ok(text) => text,
            Err(error) => {
                self.state = restore_state(previous);
                return Err(SwitchError::Fetch(error));
            }
        };

        let geometry = match parse_sheet(&text) {
            Ok(geometry) => geometry,
            Err(source) => {
                self.state = restore_state(previous);
                return Err(SwitchError::Parse {
                    sheet_id: target,
                    source,
                });
            }
        };

        self.state = SwitchState::Active(target.clone());
        Ok(FetchOutcome::Activated(SheetActivation {
            sheet_id: target,
            geometry,
            via_fetch: true,
        }))
    }
}

fn restore_state(previous: Option<SheetId>) -> SwitchState {
    match previous {
        Some(sheet_id) => SwitchState::Active(sheet_id),
        None => SwitchState::Inactive,
    }
}

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Source of per-sheet diagram resources in dynamic mode.
pub trait SheetFetcher {
    fn fetch(&self, resource: &str) -> BoxFuture<'_, Result<String, FetchError>>;
}

/// Drives one switch end to end, awaiting the fetch when the target is not
/// resident. The staleness check still runs after the await: if a newer
/// switch was requested meanwhile, this one reports `Superseded`.
pub async fn switch_to<F>(
    switcher: &mut SheetSwitcher,
    fetcher: &F,
    target: &SheetId,
) -> Result<SwitchOutcome, SwitchError>
where
    F: SheetFetcher + ?Sized,
{
    match switcher.begin_switch(target)? {
        SwitchStep::AlreadyActive => Ok(SwitchOutcome::AlreadyActive),
        SwitchStep::Activated(activation) => Ok(SwitchOutcome::Activated(activation)),
        SwitchStep::Fetching { seq, resource } => {
            let body = fetcher.fetch(&resource).await;
            match switcher.apply_fetched(seq, body)? {
                FetchOutcome::Activated(activation) => Ok(SwitchOutcome::Activated(activation)),
                FetchOutcome::Stale => Ok(SwitchOutcome::Superseded),
            }
        }
    }
}

/// A failed diagram resource fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    resource: String,
    message: String,
}

impl FetchError {
    pub fn new(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to fetch {}: {}", self.resource, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug)]
pub enum SwitchError {
    /// Static mode was asked for a sheet that was never pre-rendered.
    NotResident { sheet_id: SheetId },
    Fetch(FetchError),
    Parse {
        sheet_id: SheetId,
        source: SheetParseError,
    },
}

impl fmt::Display for SwitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotResident { sheet_id } => {
                write!(f, "sheet diagram is not pre-rendered (id={sheet_id})")
            }
            Self::Fetch(error) => error.fmt(f),
            Self::Parse { sheet_id, source } => {
                write!(f, "sheet {sheet_id} diagram is invalid: {source}")
            }
        }
    }
}

impl std::error::Error for SwitchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(error) => Some(error),
            Self::Parse { source, .. } => Some(source),
            Self::NotResident { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{
        switch_to, BoxFuture, FetchError, FetchOutcome, SheetFetcher, SheetMode, SheetSwitcher,
        SwitchError, SwitchOutcome, SwitchStep,
    };
    use crate::model::SheetId;
    use crate::surface::SheetGeometry;

    fn sheet(id: &str) -> SheetId {
        SheetId::new(id).expect("sheet id")
    }

    fn markup(width: u32) -> String {
        format!(r#"<svg viewBox="0 0 {width} 600"><g id="root"></g></svg>"#)
    }

    struct MapFetcher {
        resources: BTreeMap<String, String>,
    }

    impl MapFetcher {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                resources: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl SheetFetcher for MapFetcher {
        fn fetch(&self, resource: &str) -> BoxFuture<'_, Result<String, FetchError>> {
            let result = self
                .resources
                .get(resource)
                .cloned()
                .ok_or_else(|| FetchError::new(resource, "not found"));
            Box::pin(async move { result })
        }
    }

    #[test]
    fn static_switch_activates_synchronously() {
        let mut switcher = SheetSwitcher::new(SheetMode::Static);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.install_resident(sheet("b"), SheetGeometry::default());

        let step = switcher.begin_switch(&sheet("b")).expect("switch");
        match step {
            SwitchStep::Activated(activation) => {
                assert_eq!(activation.sheet_id(), &sheet("b"));
                assert!(!activation.via_fetch());
            }
            other => panic!("expected activation, got {other:?}"),
        }
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("b")));
    }

    #[test]
    fn static_switch_to_missing_sheet_fails_without_transition() {
        let mut switcher = SheetSwitcher::new(SheetMode::Static);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.begin_switch(&sheet("a")).expect("switch");

        let err = switcher.begin_switch(&sheet("ghost")).unwrap_err();
        assert!(matches!(err, SwitchError::NotResident { .. }));
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("a")));
    }

    #[test]
    fn already_active_target_is_a_no_op() {
        let mut switcher = SheetSwitcher::new(SheetMode::Static);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.begin_switch(&sheet("a")).expect("switch");

        let step = switcher.begin_switch(&sheet("a")).expect("switch");
        assert_eq!(step, SwitchStep::AlreadyActive);
    }

    #[test]
    fn dynamic_first_activation_uses_the_embedded_default() {
        let mut switcher = SheetSwitcher::new(SheetMode::Dynamic);
        switcher.install_resident(sheet("a"), SheetGeometry::default());

        let step = switcher.begin_switch(&sheet("a")).expect("switch");
        assert!(matches!(step, SwitchStep::Activated(_)));
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("a")));
    }

    #[test]
    fn dynamic_later_switches_fetch_by_resource_convention() {
        let mut switcher = SheetSwitcher::new(SheetMode::Dynamic);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.begin_switch(&sheet("a")).expect("switch");

        let step = switcher.begin_switch(&sheet("b")).expect("switch");
        match step {
            SwitchStep::Fetching { seq, resource } => {
                assert_eq!(seq, 1);
                assert_eq!(resource, "b.svg");
            }
            other => panic!("expected fetch, got {other:?}"),
        }
        assert!(switcher.is_loading());
        // The previous sheet remains the reference point while loading.
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("a")));
    }

    #[test]
    fn successful_fetch_activates_and_marks_via_fetch() {
        let mut switcher = SheetSwitcher::new(SheetMode::Dynamic);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.begin_switch(&sheet("a")).expect("switch");

        let SwitchStep::Fetching { seq, .. } = switcher.begin_switch(&sheet("b")).expect("switch")
        else {
            panic!("expected fetch");
        };

        let outcome = switcher.apply_fetched(seq, Ok(markup(800))).expect("apply");
        match outcome {
            FetchOutcome::Activated(activation) => {
                assert_eq!(activation.sheet_id(), &sheet("b"));
                assert!(activation.via_fetch());
            }
            FetchOutcome::Stale => panic!("unexpected stale"),
        }
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("b")));
    }

    #[test]
    fn failed_fetch_restores_the_previous_sheet() {
        let mut switcher = SheetSwitcher::new(SheetMode::Dynamic);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.begin_switch(&sheet("a")).expect("switch");

        let SwitchStep::Fetching { seq, .. } = switcher.begin_switch(&sheet("b")).expect("switch")
        else {
            panic!("expected fetch");
        };

        let err = switcher
            .apply_fetched(seq, Err(FetchError::new("b.svg", "offline")))
            .unwrap_err();
        assert!(matches!(err, SwitchError::Fetch(_)));
        assert!(!switcher.is_loading());
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("a")));
    }

    #[test]
    fn unparseable_fetch_restores_the_previous_sheet() {
        let mut switcher = SheetSwitcher::new(SheetMode::Dynamic);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.begin_switch(&sheet("a")).expect("switch");

        let SwitchStep::Fetching { seq, .. } = switcher.begin_switch(&sheet("b")).expect("switch")
        else {
            panic!("expected fetch");
        };

        let err = switcher
            .apply_fetched(seq, Ok("<not-svg/>".to_owned()))
            .unwrap_err();
        assert!(matches!(err, SwitchError::Parse { .. }));
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("a")));
    }

    #[test]
    fn superseded_response_is_discarded_and_newest_wins() {
        let mut switcher = SheetSwitcher::new(SheetMode::Dynamic);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.begin_switch(&sheet("a")).expect("switch");

        let SwitchStep::Fetching { seq: seq_b, .. } =
            switcher.begin_switch(&sheet("b")).expect("switch")
        else {
            panic!("expected fetch");
        };
        let SwitchStep::Fetching { seq: seq_c, .. } =
            switcher.begin_switch(&sheet("c")).expect("switch")
        else {
            panic!("expected fetch");
        };
        assert!(seq_c > seq_b);

        // B's response arrives late and must not overwrite the newer target.
        let stale = switcher.apply_fetched(seq_b, Ok(markup(800))).expect("apply");
        assert_eq!(stale, FetchOutcome::Stale);
        assert!(switcher.is_loading());

        let outcome = switcher.apply_fetched(seq_c, Ok(markup(900))).expect("apply");
        assert!(matches!(outcome, FetchOutcome::Activated(_)));
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("c")));
    }

    #[tokio::test]
    async fn driver_switches_through_a_fetcher() {
        let mut switcher = SheetSwitcher::new(SheetMode::Dynamic);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.begin_switch(&sheet("a")).expect("switch");

        let fetcher = MapFetcher::new(&[("b.svg", markup(800).as_str())]);
        let outcome = switch_to(&mut switcher, &fetcher, &sheet("b"))
            .await
            .expect("switch");
        assert!(matches!(outcome, SwitchOutcome::Activated(_)));
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("b")));

        let outcome = switch_to(&mut switcher, &fetcher, &sheet("b"))
            .await
            .expect("switch");
        assert_eq!(outcome, SwitchOutcome::AlreadyActive);
    }

    #[tokio::test]
    async fn driver_surfaces_fetch_failures_without_changing_sheets() {
        let mut switcher = SheetSwitcher::new(SheetMode::Dynamic);
        switcher.install_resident(sheet("a"), SheetGeometry::default());
        switcher.begin_switch(&sheet("a")).expect("switch");

        let fetcher = MapFetcher::new(&[]);
        let err = switch_to(&mut switcher, &fetcher, &sheet("b"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchError::Fetch(_)));
        assert_eq!(switcher.active_sheet_id(), Some(&sheet("a")));
    }
}
