//! Affine transforms (ST_Array of six numbers, the `CTM` attribute).

use super::{Boundary, Point};
use crate::common::number::{parse_number_list, write_number_list};

/// Affine matrix `[a b c d e f]` mapping `(x, y)` to
/// `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// `self` followed by `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform::new(
            self.a * other.a + self.b * other.c,
            self.a * other.b + self.b * other.d,
            self.c * other.a + self.d * other.c,
            self.c * other.b + self.d * other.d,
            self.e * other.a + self.f * other.c + other.e,
            self.e * other.b + self.f * other.d + other.f,
        )
    }

    /// Bounding box of `boundary` after transformation.
    pub fn map_boundary(&self, boundary: &Boundary) -> Boundary {
        if boundary.is_empty() {
            return *boundary;
        }
        let mut out = Boundary::empty();
        for (x, y) in [
            (boundary.xmin(), boundary.ymin()),
            (boundary.xmax(), boundary.ymin()),
            (boundary.xmin(), boundary.ymax()),
            (boundary.xmax(), boundary.ymax()),
        ] {
            out.include_point(self.apply(Point::new(x, y)));
        }
        out
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn parse(text: &str) -> Option<Self> {
        let values = parse_number_list(text)?;
        let [a, b, c, d, e, f] = <[f64; 6]>::try_from(values).ok()?;
        Some(Self::new(a, b, c, d, e, f))
    }

    pub fn to_attr(&self) -> String {
        let mut out = String::new();
        write_number_list(&mut out, &self.to_array());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_and_compose() {
        let t = Transform::translate(10.0, 5.0);
        let s = Transform::scale(2.0, 3.0);
        let p = Point::new(1.0, 1.0);
        assert_eq!(s.then(&t).apply(p), Point::new(12.0, 8.0));
        assert_eq!(t.then(&s).apply(p), Point::new(22.0, 18.0));
    }

    #[test]
    fn test_attr_round_trip() {
        let t = Transform::new(0.5, 0.0, 0.0, 0.5, 12.25, 40.0);
        assert_eq!(t.to_attr(), "0.5 0 0 0.5 12.25 40");
        assert_eq!(Transform::parse(&t.to_attr()), Some(t));
        assert_eq!(Transform::parse("1 0 0 1"), None);
    }
}
