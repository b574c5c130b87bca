// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Screen-space geometry shared by the viewport, surface and selection code.
//!
//! All values are in surface pixels; the pan/zoom provider owns any further
//! coordinate transforms.

/// A point on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn delta_to(&self, target: Point) -> Delta {
        Delta::new(target.x - self.x, target.y - self.y)
    }
}

/// A pan vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delta {
    x: f64,
    y: f64,
}

impl Delta {
    pub const ZERO: Delta = Delta { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect};

    #[test]
    fn rect_center_is_midpoint() {
        let rect = Rect::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect.center(), Point::new(30.0, 50.0));
    }

    #[test]
    fn delta_to_points_from_source_to_target() {
        let delta = Point::new(5.0, 5.0).delta_to(Point::new(2.0, 9.0));
        assert_eq!(delta.x(), -3.0);
        assert_eq!(delta.y(), 4.0);
    }
}
