//! Contours made of line and cubic Bézier segments.

use super::{Boundary, Point};

/// How a point was reached from its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Start of the subpath.
    Move,
    Line,
    /// First control point of a cubic segment.
    CurveControl1,
    /// Second control point of a cubic segment.
    CurveControl2,
    /// End point of a cubic segment.
    CurveEnd,
}

/// One contour.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    points: Vec<Point>,
    kinds: Vec<SegmentKind>,
    closed: bool,
}

impl Subpath {
    pub fn new(start: Point) -> Self {
        Self {
            points: vec![start],
            kinds: vec![SegmentKind::Move],
            closed: false,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn kinds(&self) -> &[SegmentKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn first_point(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn line_to(&mut self, p: Point) {
        self.push(p, SegmentKind::Line);
    }

    pub fn curve_to(&mut self, p0: Point, p1: Point, p2: Point) {
        self.push(p0, SegmentKind::CurveControl1);
        self.push(p1, SegmentKind::CurveControl2);
        self.push(p2, SegmentKind::CurveEnd);
    }

    fn push(&mut self, p: Point, kind: SegmentKind) {
        if self.points.is_empty() {
            self.points.push(p);
            self.kinds.push(SegmentKind::Move);
            return;
        }
        self.points.push(p);
        self.kinds.push(kind);
    }

    /// Close the contour. Appends the start point as a line segment unless
    /// it already coincides with the last point. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.closed || self.points.is_empty() {
            return;
        }
        let first = self.points[0];
        if self.points.last() != Some(&first) {
            self.points.push(first);
            self.kinds.push(SegmentKind::Line);
        }
        self.closed = true;
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            *p = p.offset(dx, dy);
        }
    }

    /// Bounds of every point, Bézier control points included.
    pub fn calculate_boundary(&self) -> Boundary {
        let mut b = Boundary::empty();
        for p in &self.points {
            b.include_point(*p);
        }
        b
    }

    /// Iterate over segments as drawing commands.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            subpath: self,
            index: 0,
        }
    }
}

/// A drawing command reconstructed from a subpath's point groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
}

pub struct Segments<'a> {
    subpath: &'a Subpath,
    index: usize,
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let points = &self.subpath.points;
        let kinds = &self.subpath.kinds;
        let i = self.index;
        if i >= points.len() {
            return None;
        }
        match kinds[i] {
            SegmentKind::Move => {
                self.index += 1;
                Some(Segment::MoveTo(points[i]))
            },
            SegmentKind::CurveControl1 if i + 2 < points.len() => {
                self.index += 3;
                Some(Segment::CurveTo(points[i], points[i + 1], points[i + 2]))
            },
            _ => {
                self.index += 1;
                Some(Segment::LineTo(points[i]))
            },
        }
    }
}

/// A drawable shape: an ordered list of subpaths and a current point.
#[derive(Debug, Clone, Default)]
pub struct Path {
    subpaths: Vec<Subpath>,
    current: Option<Point>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.subpaths == other.subpaths
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.subpaths.push(Subpath::new(p));
        self.current = Some(p);
        self
    }

    /// Line from the current point. After a close the segment opens a new
    /// subpath at the current point; without any current point `p` becomes
    /// the start of a new subpath.
    pub fn line_to(&mut self, p: Point) -> &mut Self {
        match self.ensure_open() {
            Some(sub) => sub.line_to(p),
            None => self.subpaths.push(Subpath::new(p)),
        }
        self.current = Some(p);
        self
    }

    /// Cubic Bézier from the current point through control points `p0`,
    /// `p1` to `p2`. Without a current point there is no curve to draw:
    /// `p0` starts a new subpath and the other two points follow as lines.
    pub fn curve_to(&mut self, p0: Point, p1: Point, p2: Point) -> &mut Self {
        match self.ensure_open() {
            Some(sub) => sub.curve_to(p0, p1, p2),
            None => {
                let mut sub = Subpath::new(p0);
                sub.line_to(p1);
                sub.line_to(p2);
                self.subpaths.push(sub);
            },
        }
        self.current = Some(p2);
        self
    }

    pub fn close_path(&mut self) -> &mut Self {
        if let Some(sub) = self.subpaths.last_mut() {
            sub.close();
            self.current = sub.first_point();
        }
        self
    }

    /// Convenience for a closed axis-aligned rectangle.
    pub fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        self.move_to(Point::new(x, y))
            .line_to(Point::new(x + w, y))
            .line_to(Point::new(x + w, y + h))
            .line_to(Point::new(x, y + h))
            .close_path()
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        for sub in &mut self.subpaths {
            sub.offset(dx, dy);
        }
        self.current = self.current.map(|p| p.offset(dx, dy));
    }

    /// Append every subpath of `other`.
    pub fn append(&mut self, other: &Path) {
        self.subpaths.extend(other.subpaths.iter().cloned());
        if other.current.is_some() {
            self.current = other.current;
        }
    }

    pub(crate) fn push_subpath(&mut self, sub: Subpath) {
        self.current = sub.last_point();
        self.subpaths.push(sub);
    }

    /// Bounds of all points including Bézier control points. This is a
    /// conservative approximation of the drawn extent.
    pub fn calculate_boundary(&self) -> Boundary {
        self.subpaths
            .iter()
            .fold(Boundary::empty(), |acc, sub| acc.united(&sub.calculate_boundary()))
    }

    fn ensure_open(&mut self) -> Option<&mut Subpath> {
        let reopen = match self.subpaths.last() {
            Some(sub) => sub.is_closed(),
            None => false,
        };
        if reopen || self.subpaths.is_empty() {
            let start = self.current?;
            self.subpaths.push(Subpath::new(start));
        }
        self.subpaths.last_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Path {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(10.0, 0.0))
            .line_to(Point::new(5.0, 8.0));
        path
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut path = triangle();
        path.close_path();
        let once = path.clone();
        path.close_path();
        assert_eq!(path, once);
        assert_eq!(path.subpaths()[0].len(), 4);
        assert!(path.subpaths()[0].is_closed());
    }

    #[test]
    fn test_close_skips_coincident_start() {
        let mut path = triangle();
        path.line_to(Point::new(0.0, 0.0)).close_path();
        assert_eq!(path.subpaths()[0].len(), 4);
    }

    #[test]
    fn test_line_after_close_starts_new_subpath() {
        let mut path = triangle();
        path.close_path().line_to(Point::new(20.0, 20.0));
        assert_eq!(path.subpaths().len(), 2);
    }

    #[test]
    fn test_boundary_includes_control_points() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0)).curve_to(
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        );
        let b = path.calculate_boundary();
        assert_eq!(b, Boundary::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_offset_and_append() {
        let mut a = triangle();
        let mut b = triangle();
        b.offset(100.0, 0.0);
        a.append(&b);
        assert_eq!(a.subpaths().len(), 2);
        assert_eq!(a.calculate_boundary().xmax(), 110.0);
        assert_eq!(a.current_point(), Some(Point::new(105.0, 8.0)));
    }

    #[test]
    fn test_curve_without_current_point() {
        let mut path = Path::new();
        path.curve_to(Point::new(1.0, 1.0), Point::new(2.0, 2.0), Point::new(3.0, 0.0));
        let sub = &path.subpaths()[0];
        assert_eq!(sub.points(), &[Point::new(1.0, 1.0), Point::new(2.0, 2.0), Point::new(3.0, 0.0)]);
        assert_eq!(sub.kinds(), &[SegmentKind::Move, SegmentKind::Line, SegmentKind::Line]);
        assert_eq!(path.current_point(), Some(Point::new(3.0, 0.0)));
    }

    #[test]
    fn test_segments() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0))
            .curve_to(Point::new(1.0, 1.0), Point::new(2.0, 1.0), Point::new(3.0, 0.0))
            .line_to(Point::new(4.0, 0.0));
        let segs: Vec<_> = path.subpaths()[0].segments().collect();
        assert_eq!(segs.len(), 3);
        assert!(matches!(segs[1], Segment::CurveTo(..)));
    }
}
