//! Gradient fills (CT_AxialShd / CT_RadialShd).

use super::{Color, ColorSpaceSource};
use crate::common::number::parse_number_list;
use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Result};
use crate::geometry::Point;

/// How the gradient repeats along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapType {
    #[default]
    Direct,
    Repeat,
    Reflect,
}

impl MapType {
    fn as_str(self) -> &'static str {
        match self {
            MapType::Direct => "Direct",
            MapType::Repeat => "Repeat",
            MapType::Reflect => "Reflect",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Direct" => Some(MapType::Direct),
            "Repeat" => Some(MapType::Repeat),
            "Reflect" => Some(MapType::Reflect),
            _ => None,
        }
    }
}

/// One colour stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingSegment {
    /// Stop position in `0.0..=1.0`; absent stops are spread evenly.
    pub position: Option<f64>,
    pub color: Color,
}

impl ShadingSegment {
    pub fn new(position: Option<f64>, color: Color) -> Self {
        Self { position, color }
    }
}

/// Parameters shared by both gradient kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShadingCommon {
    pub map_type: MapType,
    pub map_unit: Option<f64>,
    /// Bit 0 extends before the start, bit 1 beyond the end.
    pub extend: u8,
    pub segments: Vec<ShadingSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxialShading {
    pub start: Point,
    pub end: Point,
    pub common: ShadingCommon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialShading {
    pub start: Point,
    pub start_radius: f64,
    pub end: Point,
    pub end_radius: f64,
    pub eccentricity: f64,
    pub angle: f64,
    pub common: ShadingCommon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shading {
    Axial(AxialShading),
    Radial(RadialShading),
}

impl Shading {
    pub fn axial(start: Point, end: Point, segments: Vec<ShadingSegment>) -> Self {
        Shading::Axial(AxialShading {
            start,
            end,
            common: ShadingCommon {
                segments,
                ..ShadingCommon::default()
            },
        })
    }

    pub fn radial(
        start: Point,
        start_radius: f64,
        end: Point,
        end_radius: f64,
        segments: Vec<ShadingSegment>,
    ) -> Self {
        Shading::Radial(RadialShading {
            start,
            start_radius,
            end,
            end_radius,
            eccentricity: 0.0,
            angle: 0.0,
            common: ShadingCommon {
                segments,
                ..ShadingCommon::default()
            },
        })
    }

    pub fn common(&self) -> &ShadingCommon {
        match self {
            Shading::Axial(a) => &a.common,
            Shading::Radial(r) => &r.common,
        }
    }

    pub fn segments(&self) -> &[ShadingSegment] {
        &self.common().segments
    }

    pub(crate) fn write_xml(&self, w: &mut XmlWriter) {
        let tag = match self {
            Shading::Axial(_) => "AxialShd",
            Shading::Radial(_) => "RadialShd",
        };
        let common = self.common();
        w.open(tag);
        if common.map_type != MapType::Direct {
            w.attr("MapType", common.map_type.as_str());
        }
        if let Some(unit) = common.map_unit {
            w.attr_num("MapUnit", unit);
        }
        match self {
            Shading::Axial(a) => {
                w.attr_numbers("StartPoint", &[a.start.x, a.start.y])
                    .attr_numbers("EndPoint", &[a.end.x, a.end.y]);
            },
            Shading::Radial(r) => {
                w.attr_num_default("Eccentricity", r.eccentricity, 0.0)
                    .attr_num_default("Angle", r.angle, 0.0)
                    .attr_numbers("StartPoint", &[r.start.x, r.start.y])
                    .attr_num_default("StartRadius", r.start_radius, 0.0)
                    .attr_numbers("EndPoint", &[r.end.x, r.end.y])
                    .attr_num("EndRadius", r.end_radius);
            },
        }
        if common.extend != 0 {
            w.attr_u32("Extend", u32::from(common.extend));
        }
        w.end_attrs();
        for segment in &common.segments {
            w.open("Segment");
            if let Some(pos) = segment.position {
                w.attr_num("Position", pos);
            }
            w.end_attrs();
            segment.color.write_element(w, "Color");
            w.close("Segment");
        }
        w.close(tag);
    }

    /// Parse an `AxialShd` or `RadialShd` element.
    pub(crate) fn from_xml(el: &XmlElement, spaces: &dyn ColorSpaceSource) -> Result<Self> {
        let map_type = match el.attr("MapType") {
            None => MapType::Direct,
            Some(v) => MapType::parse(v).ok_or_else(|| Error::invalid_value(el.name(), "MapType", v))?,
        };
        let extend = match el.attr_u32("Extend")? {
            None => 0,
            Some(e @ 0..=3) => e as u8,
            Some(e) => return Err(Error::invalid_value(el.name(), "Extend", &e.to_string())),
        };
        let mut segments = Vec::new();
        for seg in el.children_named("Segment") {
            let color_el = seg.required_child("Color")?;
            let color = Color::from_xml(color_el, spaces)?
                .ok_or_else(|| Error::missing_attribute("Color", "Value"))?;
            segments.push(ShadingSegment::new(seg.attr_f64("Position")?, color));
        }
        let common = ShadingCommon {
            map_type,
            map_unit: el.attr_f64("MapUnit")?,
            extend,
            segments,
        };
        let start = point_attr(el, "StartPoint")?;
        let end = point_attr(el, "EndPoint")?;
        match el.name() {
            "AxialShd" => Ok(Shading::Axial(AxialShading { start, end, common })),
            "RadialShd" => Ok(Shading::Radial(RadialShading {
                start,
                start_radius: el.attr_f64("StartRadius")?.unwrap_or(0.0),
                end,
                end_radius: el.required_f64("EndRadius")?,
                eccentricity: el.attr_f64("Eccentricity")?.unwrap_or(0.0),
                angle: el.attr_f64("Angle")?.unwrap_or(0.0),
                common,
            })),
            other => Err(Error::InvalidFormat(format!("unsupported shading '{other}'"))),
        }
    }

    /// Whether `el` is a shading element this module understands.
    pub(crate) fn is_shading(el: &XmlElement) -> bool {
        matches!(el.name(), "AxialShd" | "RadialShd")
    }
}

fn point_attr(el: &XmlElement, name: &str) -> Result<Point> {
    let text = el.required_attr(name)?;
    match parse_number_list(text).as_deref() {
        Some([x, y]) => Ok(Point::new(*x, *y)),
        _ => Err(Error::invalid_value(el.name(), name, text)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DefaultColorSpaces;

    #[test]
    fn test_axial_round_trip() {
        let shading = Shading::axial(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            vec![
                ShadingSegment::new(Some(0.0), Color::rgb(255, 0, 0)),
                ShadingSegment::new(Some(1.0), Color::rgb(0, 0, 255)),
            ],
        );
        let mut w = XmlWriter::fragment();
        shading.write_xml(&mut w);
        let xml = w.into_string();
        assert!(xml.starts_with(r#"<ofd:AxialShd StartPoint="0 0" EndPoint="100 0">"#));
        let el = XmlElement::parse(xml.as_bytes()).unwrap();
        assert_eq!(Shading::from_xml(&el, &DefaultColorSpaces).unwrap(), shading);
    }

    #[test]
    fn test_radial_requires_end_radius() {
        let el = XmlElement::parse(
            br#"<RadialShd StartPoint="0 0" EndPoint="5 5"><Segment><Color Value="0"/></Segment></RadialShd>"#,
        )
        .unwrap();
        assert!(matches!(
            Shading::from_xml(&el, &DefaultColorSpaces),
            Err(Error::MissingAttribute { .. })
        ));
    }
}
