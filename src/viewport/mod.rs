// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Pan/zoom viewport state.
//!
//! The actual transform engine is an external primitive (the generated site
//! ships a pan-zoom script); the controller wraps it behind
//! [`PanZoomProvider`] and adds the coordinate translation and print-sizing
//! logic the viewer needs.

use crate::geom::{Delta, Point, Rect, Size};

/// The opaque pan/zoom primitive bound to the active diagram surface.
pub trait PanZoomProvider {
    fn pan(&self) -> Delta;
    fn set_pan(&mut self, pan: Delta);
    fn pan_by(&mut self, delta: Delta);
    fn zoom(&self) -> f64;
    fn set_zoom(&mut self, zoom: f64);
    fn zoom_by(&mut self, factor: f64);
    fn zoom_at_point(&mut self, factor: f64, point: Point);
    /// Effective on-screen zoom, including the fit-to-viewport scale the
    /// provider applies on initialization.
    fn real_zoom(&self) -> f64;
    fn viewport_size(&self) -> Size;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedSizing {
    pan: Delta,
    zoom: f64,
}

/// One controller per active sheet; rebuilt on every sheet switch.
pub struct ViewportController {
    provider: Box<dyn PanZoomProvider>,
    saved_sizing: Option<SavedSizing>,
}

impl ViewportController {
    pub fn new(provider: Box<dyn PanZoomProvider>) -> Self {
        Self {
            provider,
            saved_sizing: None,
        }
    }

    pub fn pan_by(&mut self, delta: Delta) {
        self.provider.pan_by(delta);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.provider.zoom_by(factor);
    }

    pub fn zoom_at_point(&mut self, factor: f64, point: Point) {
        self.provider.zoom_at_point(factor, point);
    }

    pub fn zoom(&self) -> f64 {
        self.provider.zoom()
    }

    pub fn pan(&self) -> Delta {
        self.provider.pan()
    }

    pub fn viewport_size(&self) -> Size {
        self.provider.viewport_size()
    }

    pub fn real_zoom(&self) -> f64 {
        self.provider.real_zoom()
    }

    /// Resets the effective zoom to 1:1, as done right after a sheet becomes
    /// interactive.
    pub fn normalize_real_zoom(&mut self) {
        let real_zoom = self.provider.real_zoom();
        if real_zoom != 0.0 {
            self.provider.zoom_by(1.0 / real_zoom);
        }
    }

    /// Pan vector that moves an element's current center onto a target
    /// screen point. Element and surface rects are external geometry
    /// queries, not controller state.
    pub fn translate(element_rect: Rect, surface_rect: Rect, target: Point) -> Delta {
        let center = element_rect.center();
        let current = Point::new(
            center.x() - surface_rect.x(),
            center.y() - surface_rect.y(),
        );
        current.delta_to(target)
    }

    /// Screen point an element should be centered on, keeping it clear of
    /// the results panel occupying `results_width` on one side.
    pub fn center_target(&self, results_width: f64) -> Point {
        let size = self.provider.viewport_size();
        Point::new(
            (size.width() + results_width) / 2.0,
            size.height() / 2.0,
        )
    }

    /// Captures pan and zoom ahead of a size-changing event (printing) and
    /// applies a no-op zoom/pan so the provider flushes pending transforms.
    pub fn save_sizing(&mut self) {
        self.saved_sizing = Some(SavedSizing {
            pan: self.provider.pan(),
            zoom: self.provider.zoom(),
        });
        self.provider.zoom_by(1.0);
        self.provider.pan_by(Delta::ZERO);
    }

    /// Reapplies the sizing captured by `save_sizing`. Without a prior save
    /// this is a no-op.
    pub fn restore_sizing(&mut self) {
        if let Some(saved) = self.saved_sizing.take() {
            self.provider.set_zoom(saved.zoom);
            self.provider.set_pan(saved.pan);
        }
    }

    pub fn has_saved_sizing(&self) -> bool {
        self.saved_sizing.is_some()
    }
}

impl std::fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportController")
            .field("pan", &self.provider.pan())
            .field("zoom", &self.provider.zoom())
            .field("saved_sizing", &self.saved_sizing)
            .finish()
    }
}

/// In-memory transform engine for headless runs and tests.
///
/// Screen position of a world point `w` is `w * zoom + pan`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPanZoom {
    pan: Delta,
    zoom: f64,
    viewport: Size,
}

impl MemoryPanZoom {
    pub fn new(viewport: Size) -> Self {
        Self {
            pan: Delta::ZERO,
            zoom: 1.0,
            viewport,
        }
    }
}

impl PanZoomProvider for MemoryPanZoom {
    fn pan(&self) -> Delta {
        self.pan
    }

    fn set_pan(&mut self, pan: Delta) {
        self.pan = pan;
    }

    fn pan_by(&mut self, delta: Delta) {
        self.pan = Delta::new(self.pan.x() + delta.x(), self.pan.y() + delta.y());
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    fn zoom_by(&mut self, factor: f64) {
        self.zoom *= factor;
    }

    fn zoom_at_point(&mut self, factor: f64, point: Point) {
        // Keeps `point` fixed on screen while scaling around it.
        self.zoom *= factor;
        self.pan = Delta::new(
            point.x() - factor * (point.x() - self.pan.x()),
            point.y() - factor * (point.y() - self.pan.y()),
        );
    }

    fn real_zoom(&self) -> f64 {
        self.zoom
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryPanZoom, PanZoomProvider, ViewportController};
    use crate::geom::{Delta, Point, Rect, Size};

    fn controller() -> ViewportController {
        ViewportController::new(Box::new(MemoryPanZoom::new(Size::new(1000.0, 700.0))))
    }

    #[test]
    fn translate_moves_element_center_to_target() {
        let element = Rect::new(100.0, 50.0, 40.0, 20.0);
        let surface = Rect::new(10.0, 10.0, 800.0, 600.0);
        let delta = ViewportController::translate(element, surface, Point::new(500.0, 350.0));
        // Element center on screen is (110, 50); the delta closes the gap.
        assert_eq!(delta, Delta::new(390.0, 300.0));
    }

    #[test]
    fn center_target_accounts_for_results_panel_width() {
        let controller = controller();
        let target = controller.center_target(200.0);
        assert_eq!(target, Point::new(600.0, 350.0));
    }

    #[test]
    fn save_and_restore_round_trips_pan_and_zoom() {
        let mut controller = controller();
        controller.pan_by(Delta::new(15.0, -5.0));
        controller.zoom_by(2.0);

        controller.save_sizing();
        controller.pan_by(Delta::new(100.0, 100.0));
        controller.zoom_by(0.25);

        controller.restore_sizing();
        assert_eq!(controller.pan(), Delta::new(15.0, -5.0));
        assert_eq!(controller.zoom(), 2.0);
        assert!(!controller.has_saved_sizing());
    }

    #[test]
    fn restore_without_save_is_a_no_op() {
        let mut controller = controller();
        controller.pan_by(Delta::new(3.0, 4.0));
        controller.restore_sizing();
        assert_eq!(controller.pan(), Delta::new(3.0, 4.0));
        assert_eq!(controller.zoom(), 1.0);
    }

    #[test]
    fn normalize_real_zoom_resets_to_unit_scale() {
        let mut controller = controller();
        controller.zoom_by(4.0);
        controller.normalize_real_zoom();
        assert_eq!(controller.zoom(), 1.0);
    }

    #[test]
    fn zoom_at_point_keeps_the_anchor_fixed() {
        let mut provider = MemoryPanZoom::new(Size::new(100.0, 100.0));
        provider.pan_by(Delta::new(10.0, 10.0));

        // World point mapping to the anchor before the zoom...
        let anchor = Point::new(30.0, 30.0);
        let world_x = (anchor.x() - provider.pan().x()) / provider.zoom();

        provider.zoom_at_point(2.0, anchor);

        // ...maps to the same screen position afterwards.
        let screen_x = world_x * provider.zoom() + provider.pan().x();
        assert!((screen_x - anchor.x()).abs() < 1e-9);
    }
}
