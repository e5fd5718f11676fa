//! AbbreviatedData: the compact path command string used by PathObject and
//! clip areas.
//!
//! Reading accepts `S`/`M`, `L`, `Q`, `B`, `A` and `C`. Quadratic segments
//! are raised to cubics and elliptical arcs are split into cubic segments
//! spanning at most a quarter turn, so a parsed [`Path`] only ever contains
//! lines and cubics. Writing emits `M`, `L`, `B` and `C`.

use super::path::{Segment, Subpath};
use super::{Path, Point};
use crate::common::number::{parse_f64, write_number};
use crate::common::{Error, Result};
use std::f64::consts::{FRAC_PI_2, PI};

/// Serialize `path` to AbbreviatedData.
pub fn write_path_data(path: &Path) -> String {
    let mut out = String::new();
    for sub in path.subpaths() {
        for segment in sub.segments() {
            if !out.is_empty() {
                out.push(' ');
            }
            match segment {
                Segment::MoveTo(p) => {
                    out.push('M');
                    push_point(&mut out, p);
                },
                Segment::LineTo(p) => {
                    out.push('L');
                    push_point(&mut out, p);
                },
                Segment::CurveTo(p0, p1, p2) => {
                    out.push('B');
                    push_point(&mut out, p0);
                    push_point(&mut out, p1);
                    push_point(&mut out, p2);
                },
            }
        }
        if sub.is_closed() {
            out.push_str(" C");
        }
    }
    out
}

fn push_point(out: &mut String, p: Point) {
    out.push(' ');
    write_number(out, p.x);
    out.push(' ');
    write_number(out, p.y);
}

/// Parse AbbreviatedData into a [`Path`].
pub fn parse_path_data(data: &str) -> Result<Path> {
    let mut parser = PathDataParser {
        tokens: data.split_ascii_whitespace().peekable(),
        path: Path::new(),
        current: None,
    };
    parser.run()?;
    Ok(parser.path)
}

struct PathDataParser<'a, I: Iterator<Item = &'a str>> {
    tokens: std::iter::Peekable<I>,
    path: Path,
    current: Option<Subpath>,
}

impl<'a, I: Iterator<Item = &'a str>> PathDataParser<'a, I> {
    fn run(&mut self) -> Result<()> {
        while let Some(command) = self.tokens.next() {
            match command {
                "S" | "M" => {
                    let p = self.point(command)?;
                    self.flush();
                    self.current = Some(Subpath::new(p));
                },
                "L" => {
                    let p = self.point(command)?;
                    self.subpath().line_to(p);
                },
                "Q" => {
                    let q = self.point(command)?;
                    let p = self.point(command)?;
                    let start = self.cursor();
                    let c1 = start.lerp(q, 2.0 / 3.0);
                    let c2 = p.lerp(q, 2.0 / 3.0);
                    self.subpath().curve_to(c1, c2, p);
                },
                "B" => {
                    let p0 = self.point(command)?;
                    let p1 = self.point(command)?;
                    let p2 = self.point(command)?;
                    self.subpath().curve_to(p0, p1, p2);
                },
                "A" => {
                    let rx = self.number(command)?;
                    let ry = self.number(command)?;
                    let angle = self.number(command)?;
                    let large = self.flag(command)?;
                    let sweep = self.flag(command)?;
                    let end = self.point(command)?;
                    let start = self.cursor();
                    let arc = EndpointArc {
                        start,
                        end,
                        rx,
                        ry,
                        rotation_deg: angle,
                        large_arc: large,
                        sweep,
                    };
                    let sub = self.subpath();
                    for [c1, c2, p] in arc.to_cubics() {
                        sub.curve_to(c1, c2, p);
                    }
                },
                "C" => {
                    if let Some(mut sub) = self.current.take() {
                        sub.close();
                        self.path.push_subpath(sub);
                    }
                },
                other => {
                    return Err(Error::PathData(format!("unknown command '{other}'")));
                },
            }
        }
        self.flush();
        Ok(())
    }

    fn flush(&mut self) {
        if let Some(sub) = self.current.take() {
            self.path.push_subpath(sub);
        }
    }

    /// Current subpath; a drawing command without a start point begins at
    /// the end of the previous subpath, or the origin.
    fn subpath(&mut self) -> &mut Subpath {
        let start = self.path.current_point().unwrap_or_default();
        self.current.get_or_insert_with(|| Subpath::new(start))
    }

    fn cursor(&self) -> Point {
        self.current
            .as_ref()
            .and_then(Subpath::last_point)
            .or_else(|| self.path.current_point())
            .unwrap_or_default()
    }

    fn number(&mut self, command: &str) -> Result<f64> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| Error::PathData(format!("'{command}' is missing operands")))?;
        parse_f64(token)
            .ok_or_else(|| Error::PathData(format!("'{command}' has a bad operand '{token}'")))
    }

    fn point(&mut self, command: &str) -> Result<Point> {
        Ok(Point::new(self.number(command)?, self.number(command)?))
    }

    fn flag(&mut self, command: &str) -> Result<bool> {
        Ok(self.number(command)? != 0.0)
    }
}

/// Elliptical arc in endpoint form.
#[derive(Debug, Clone, Copy)]
struct EndpointArc {
    start: Point,
    end: Point,
    rx: f64,
    ry: f64,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
}

impl EndpointArc {
    /// Cubic approximation as `[control1, control2, end]` triples, using the
    /// endpoint-to-center conversion of SVG 1.1 (implementation notes F.6).
    fn to_cubics(&self) -> Vec<[Point; 3]> {
        let (x0, y0, x1, y1) = (self.start.x, self.start.y, self.end.x, self.end.y);
        if self.rx.abs() < 1e-12 || self.ry.abs() < 1e-12 || self.start == self.end {
            return vec![[self.start, self.end, self.end]];
        }

        let phi = self.rotation_deg.to_radians();
        let (cos_phi, sin_phi) = (phi.cos(), phi.sin());
        let mut rx = self.rx.abs();
        let mut ry = self.ry.abs();

        let dx2 = (x0 - x1) / 2.0;
        let dy2 = (y0 - y1) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        let lam = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lam > 1.0 {
            let s = lam.sqrt();
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
        let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
        if den.abs() < 1e-24 {
            return vec![[self.start, self.end, self.end]];
        }
        let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
        let coef = sign * (num / den).max(0.0).sqrt();
        let cxp = coef * (rx * y1p) / ry;
        let cyp = coef * (-ry * x1p) / rx;
        let cx = cos_phi * cxp - sin_phi * cyp + (x0 + x1) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (y0 + y1) / 2.0;

        let ux = (x1p - cxp) / rx;
        let uy = (y1p - cyp) / ry;
        let vx = (-x1p - cxp) / rx;
        let vy = (-y1p - cyp) / ry;
        let theta1 = vec_angle(1.0, 0.0, ux, uy);
        let mut delta = vec_angle(ux, uy, vx, vy);
        if !self.sweep && delta > 0.0 {
            delta -= 2.0 * PI;
        } else if self.sweep && delta < 0.0 {
            delta += 2.0 * PI;
        }

        let pieces = (delta.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = delta / pieces as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();

        let map = |x: f64, y: f64| {
            Point::new(
                cx + rx * x * cos_phi - ry * y * sin_phi,
                cy + rx * x * sin_phi + ry * y * cos_phi,
            )
        };

        let mut out = Vec::with_capacity(pieces);
        let mut theta = theta1;
        for i in 0..pieces {
            let next = theta + step;
            let (c0, s0) = (theta.cos(), theta.sin());
            let (c1, s1) = (next.cos(), next.sin());
            let p1 = map(c0 - k * s0, s0 + k * c0);
            let p2 = map(c1 + k * s1, s1 - k * c1);
            let p3 = if i + 1 == pieces { self.end } else { map(c1, s1) };
            out.push([p1, p2, p3]);
            theta = next;
        }
        out
    }
}

fn vec_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let dot = ux * vx + uy * vy;
    let det = ux * vy - uy * vx;
    det.atan2(dot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_write_triangle() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(10.5, 0.0))
            .line_to(Point::new(5.0, 8.0))
            .close_path();
        assert_eq!(write_path_data(&path), "M 0 0 L 10.5 0 L 5 8 L 0 0 C");
    }

    #[test]
    fn test_parse_basic_commands() {
        let path = parse_path_data("S 0 0 L 10 0 B 10 5 5 10 0 10 C M 20 20 L 30 30").unwrap();
        assert_eq!(path.subpaths().len(), 2);
        let first = &path.subpaths()[0];
        assert!(first.is_closed());
        assert_eq!(first.len(), 6);
        assert!(!path.subpaths()[1].is_closed());
    }

    #[test]
    fn test_quadratic_becomes_cubic() {
        let path = parse_path_data("M 0 0 Q 3 3 6 0").unwrap();
        let segs: Vec<_> = path.subpaths()[0].segments().collect();
        assert_eq!(
            segs[1],
            Segment::CurveTo(Point::new(2.0, 2.0), Point::new(4.0, 2.0), Point::new(6.0, 0.0))
        );
    }

    #[test]
    fn test_semicircle_arc_is_split() {
        let path = parse_path_data("M 0 0 A 5 5 0 0 1 10 0").unwrap();
        let sub = &path.subpaths()[0];
        let curves = sub
            .segments()
            .filter(|s| matches!(s, Segment::CurveTo(..)))
            .count();
        assert_eq!(curves, 2);
        assert_eq!(sub.last_point(), Some(Point::new(10.0, 0.0)));
        let b = path.calculate_boundary();
        assert!(b.height() > 4.0 && b.height() < 7.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_path_data("M 0"), Err(Error::PathData(_))));
        assert!(matches!(parse_path_data("Z 1 2"), Err(Error::PathData(_))));
        assert!(matches!(parse_path_data("M 0 x"), Err(Error::PathData(_))));
    }

    fn coord() -> impl Strategy<Value = f64> {
        (-10_000i32..10_000).prop_map(|v| f64::from(v) / 8.0)
    }

    fn point() -> impl Strategy<Value = Point> {
        (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_commands_survive_text_form(
            start in point(),
            lines in prop::collection::vec(point(), 0..6),
            curve in prop::option::of((point(), point(), point())),
            close in any::<bool>(),
        ) {
            let mut path = Path::new();
            path.move_to(start);
            for p in &lines {
                path.line_to(*p);
            }
            if let Some((a, b, c)) = curve {
                path.curve_to(a, b, c);
            }
            if close {
                path.close_path();
            }
            let text = write_path_data(&path);
            let parsed = parse_path_data(&text).unwrap();
            prop_assert_eq!(parsed, path);
        }
    }
}
