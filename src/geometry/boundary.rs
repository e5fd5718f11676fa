//! Axis-aligned bounding boxes.
//!
//! A [`Boundary`] is either empty or a normalized box. Emptiness is an
//! explicit state: a zero-sized box at the origin is a real box and is not
//! empty. On the wire both are written as `0 0 0 0`; reading `0 0 0 0` back
//! yields the empty boundary.
//!
//! Coordinates are held at the three decimal digits the wire form carries,
//! so a box reads back equal to the one that was written.

use super::Point;
use crate::common::number::parse_number_list;
use std::fmt;

/// Axis-aligned box with explicit emptiness.
#[derive(Debug, Clone, Copy)]
pub struct Boundary {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    empty: bool,
}

impl Default for Boundary {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Boundary {
    fn eq(&self, other: &Self) -> bool {
        match (self.empty, other.empty) {
            (true, true) => true,
            (false, false) => {
                self.xmin == other.xmin
                    && self.ymin == other.ymin
                    && self.xmax == other.xmax
                    && self.ymax == other.ymax
            },
            _ => false,
        }
    }
}

impl Boundary {
    /// The empty boundary: no geometry yet.
    pub const fn empty() -> Self {
        Self {
            xmin: 0.0,
            ymin: 0.0,
            xmax: 0.0,
            ymax: 0.0,
            empty: true,
        }
    }

    /// Box spanning two corners; the corners are normalized and snapped to
    /// three decimals.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (x0, y0, x1, y1) = (snap(x0), snap(y0), snap(x1), snap(y1));
        Self {
            xmin: x0.min(x1),
            ymin: y0.min(y1),
            xmax: x0.max(x1),
            ymax: y0.max(y1),
            empty: false,
        }
    }

    /// Box from origin and size (the `x y w h` form of ST_Box).
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Degenerate box at a single point.
    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Lower-left corner, or the origin when empty.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.xmin, self.ymin)
    }

    /// Grow to cover `other`. An empty self copies `other`; an empty
    /// `other` leaves self unchanged.
    pub fn union(&mut self, other: &Boundary) {
        if self.empty {
            *self = *other;
        } else if !other.empty {
            self.xmin = self.xmin.min(other.xmin);
            self.ymin = self.ymin.min(other.ymin);
            self.xmax = self.xmax.max(other.xmax);
            self.ymax = self.ymax.max(other.ymax);
        }
    }

    /// Value-returning form of [`Boundary::union`].
    pub fn united(mut self, other: &Boundary) -> Self {
        self.union(other);
        self
    }

    /// Shrink to the overlap with `other`. Either side empty is a no-op;
    /// disjoint boxes make self empty.
    pub fn intersect(&mut self, other: &Boundary) {
        if self.empty || other.empty {
            return;
        }
        if self.xmax < other.xmin
            || other.xmax < self.xmin
            || self.ymax < other.ymin
            || other.ymax < self.ymin
        {
            *self = Self::empty();
            return;
        }
        self.xmin = self.xmin.max(other.xmin);
        self.ymin = self.ymin.max(other.ymin);
        self.xmax = self.xmax.min(other.xmax);
        self.ymax = self.ymax.min(other.ymax);
    }

    /// Value-returning form of [`Boundary::intersect`].
    pub fn intersected(mut self, other: &Boundary) -> Self {
        self.intersect(other);
        self
    }

    pub fn include_point(&mut self, p: Point) {
        self.union(&Boundary::from_point(p));
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        if !self.empty {
            *self = Self::new(self.xmin + dx, self.ymin + dy, self.xmax + dx, self.ymax + dy);
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        !self.empty && p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }

    /// Parse an ST_Box (`x y w h`). `0 0 0 0` decodes to the empty boundary.
    pub fn parse_box(text: &str) -> Option<Self> {
        let values = parse_number_list(text)?;
        let [x, y, w, h] = <[f64; 4]>::try_from(values).ok()?;
        if x == 0.0 && y == 0.0 && w == 0.0 && h == 0.0 {
            return Some(Self::empty());
        }
        if w < 0.0 || h < 0.0 {
            return None;
        }
        Some(Self::from_origin_size(x, y, w, h))
    }
}

fn snap(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty {
            f.write_str("Boundary[empty]")
        } else {
            write!(
                f,
                "Boundary[{} {} -> {} {}]",
                self.xmin, self.ymin, self.xmax, self.ymax
            )
        }
    }
}
