use super::{color_reference, parse_color_child, write_color_opt, GraphicUnit, ParseContext};
use crate::color::{Color, Shading};
use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, ResourceKind, Result};
use crate::geometry::{parse_path_data, write_path_data, Boundary, Path, Transform};

/// Fill rule for self-intersecting contours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathObject {
    pub path: Path,
    pub stroke: bool,
    pub fill: bool,
    pub rule: FillRule,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    /// Gradient written inside `FillColor`.
    pub fill_shading: Option<Shading>,
}

impl PathObject {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            stroke: true,
            fill: false,
            rule: FillRule::NonZero,
            fill_color: None,
            stroke_color: None,
            fill_shading: None,
        }
    }

    /// Set a fill colour and enable filling.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = true;
        self.fill_color = Some(color);
        self
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke = true;
        self.stroke_color = Some(color);
        self
    }

    /// Bounds of the geometry, control points included.
    pub fn fit_boundary(&self) -> Boundary {
        self.path.calculate_boundary()
    }
}

impl GraphicUnit for PathObject {
    const TAG: &'static str = "PathObject";

    fn write_attrs(&self, w: &mut XmlWriter) {
        w.attr_bool_default("Stroke", self.stroke, true)
            .attr_bool_default("Fill", self.fill, false);
        if self.rule == FillRule::EvenOdd {
            w.attr("Rule", "Even-Odd");
        }
    }

    fn has_children(&self) -> bool {
        true
    }

    fn write_children(&self, w: &mut XmlWriter) {
        write_color_opt(w, "StrokeColor", self.stroke_color.as_ref());
        match (&self.fill_color, &self.fill_shading) {
            (color, Some(shading)) => {
                w.open("FillColor");
                if let Some(color) = color {
                    color.write_attrs(w);
                }
                w.end_attrs();
                shading.write_xml(w);
                w.close("FillColor");
            },
            (Some(color), None) => color.write_element(w, "FillColor"),
            (None, None) => {},
        }
        w.text_element("AbbreviatedData", &write_path_data(&self.path));
    }

    fn from_xml(el: &XmlElement, ctx: &ParseContext<'_>) -> Result<Self> {
        let rule = match el.attr("Rule") {
            None | Some("NonZero") => FillRule::NonZero,
            Some("Even-Odd") => FillRule::EvenOdd,
            Some(v) => return Err(Error::invalid_value(Self::TAG, "Rule", v)),
        };
        let data = el.required_child("AbbreviatedData")?;
        let path = parse_path_data(data.trimmed_text())?;
        let fill_shading = match el.child("FillColor") {
            Some(fill) => fill
                .children()
                .iter()
                .find(|c| Shading::is_shading(c))
                .map(|s| Shading::from_xml(s, &ctx.lookup))
                .transpose()?,
            None => None,
        };
        Ok(Self {
            path,
            stroke: el.attr_bool("Stroke")?.unwrap_or(true),
            fill: el.attr_bool("Fill")?.unwrap_or(false),
            rule,
            fill_color: parse_color_child(el, "FillColor", ctx)?,
            stroke_color: parse_color_child(el, "StrokeColor", ctx)?,
            fill_shading,
        })
    }

    /// An object without a boundary gets the bounds of its geometry.
    fn recalculate_boundary(&mut self, boundary: &Boundary, _ctm: &Transform) -> Option<Boundary> {
        if boundary.is_empty() && !self.path.is_empty() {
            Some(self.fit_boundary())
        } else {
            None
        }
    }

    fn collect_references(&self, out: &mut Vec<(ResourceKind, Id)>) {
        color_reference(self.fill_color.as_ref(), out);
        color_reference(self.stroke_color.as_ref(), out);
        if let Some(shading) = &self.fill_shading {
            for segment in shading.segments() {
                color_reference(Some(&segment.color), out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ShadingSegment;
    use crate::common::IdAllocator;
    use crate::geometry::Point;
    use crate::object::Object;
    use crate::resource::ResourceLookup;

    fn parse(xml: &str) -> Result<Object> {
        let ids = IdAllocator::new();
        let ctx = ParseContext {
            lookup: ResourceLookup::empty(),
            ids: &ids,
        };
        Object::from_xml(&XmlElement::parse(xml.as_bytes())?, &ctx)
    }

    #[test]
    fn test_shading_and_rule_round_trip() {
        let mut path = Path::new();
        path.rectangle(0.0, 0.0, 50.0, 20.0);
        let mut po = PathObject::new(path).with_fill(Color::rgb(255, 255, 255));
        po.rule = FillRule::EvenOdd;
        po.stroke = false;
        po.fill_shading = Some(Shading::axial(
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            vec![
                ShadingSegment::new(None, Color::gray(0)),
                ShadingSegment::new(None, Color::gray(255)),
            ],
        ));
        let fit = po.fit_boundary();
        let mut obj = Object::from(po).with_boundary(fit);
        obj.id = Id::new(2);

        let mut w = XmlWriter::fragment();
        obj.write_xml(&mut w);
        let xml = w.into_string();
        assert!(xml.contains(r#"Stroke="false" Fill="true" Rule="Even-Odd""#));
        assert!(xml.contains(r#"<ofd:FillColor Value="255 255 255"><ofd:AxialShd"#));
        assert_eq!(parse(&xml).unwrap(), obj);
    }

    #[test]
    fn test_abbreviated_data_required() {
        let err = parse(r#"<PathObject ID="1" Boundary="0 0 1 1"/>"#).unwrap_err();
        assert!(matches!(err, Error::MissingElement { .. }));
    }

    #[test]
    fn test_empty_boundary_fitted_to_path() {
        let mut path = Path::new();
        path.move_to(Point::new(10.0, 10.0))
            .curve_to(Point::new(20.0, 40.0), Point::new(30.0, 40.0), Point::new(40.0, 10.0));
        let mut obj = Object::from(PathObject::new(path));
        obj.recalculate_boundary();
        assert_eq!(obj.boundary, Boundary::new(10.0, 10.0, 40.0, 40.0));
    }

    #[test]
    fn test_explicit_boundary_kept() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0)).line_to(Point::new(100.0, 100.0));
        let mut obj = Object::from(PathObject::new(path)).with_boundary(Boundary::new(0.0, 0.0, 1.0, 1.0));
        obj.recalculate_boundary();
        assert_eq!(obj.boundary, Boundary::new(0.0, 0.0, 1.0, 1.0));
    }
}
