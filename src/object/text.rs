use super::{color_reference, parse_color_child, write_color_opt, GraphicUnit, ParseContext};
use crate::color::Color;
use crate::common::number::{parse_delta_list, write_delta_list};
use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, ResourceKind, Result};
use crate::geometry::{Boundary, Transform};
use crate::resource::{Font, ResourceLookup};

/// Reading or glyph direction, in degrees clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadDirection {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl ReadDirection {
    pub fn degrees(self) -> u32 {
        match self {
            ReadDirection::Deg0 => 0,
            ReadDirection::Deg90 => 90,
            ReadDirection::Deg180 => 180,
            ReadDirection::Deg270 => 270,
        }
    }

    pub fn from_degrees(deg: u32) -> Option<Self> {
        match deg {
            0 => Some(ReadDirection::Deg0),
            90 => Some(ReadDirection::Deg90),
            180 => Some(ReadDirection::Deg180),
            270 => Some(ReadDirection::Deg270),
            _ => None,
        }
    }
}

/// One positioned run of text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextCode {
    /// Origin of the first glyph, relative to the object boundary.
    pub x: f64,
    pub y: f64,
    /// Advance between consecutive glyphs. Missing entries fall back to the
    /// font size.
    pub delta_x: Vec<f64>,
    pub delta_y: Vec<f64>,
    pub text: String,
}

impl TextCode {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_delta_x(mut self, deltas: Vec<f64>) -> Self {
        self.delta_x = deltas;
        self
    }

    pub fn with_delta_y(mut self, deltas: Vec<f64>) -> Self {
        self.delta_y = deltas;
        self
    }
}

pub const DEFAULT_WEIGHT: u16 = 400;

/// Weights run from 100 to 900 in steps of 100.
fn check_weight(weight: u32) -> Result<u16> {
    match weight {
        100..=900 if weight % 100 == 0 => Ok(weight as u16),
        _ => Err(Error::invalid_value(TextObject::TAG, "Weight", &weight.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    pub font: Id,
    pub size: f64,
    pub stroke: bool,
    pub fill: bool,
    pub h_scale: f64,
    pub read_direction: ReadDirection,
    pub char_direction: ReadDirection,
    weight: u16,
    pub italic: bool,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub text_codes: Vec<TextCode>,
}

impl TextObject {
    pub fn new(font: Id, size: f64) -> Self {
        Self {
            font,
            size,
            stroke: false,
            fill: true,
            h_scale: 1.0,
            read_direction: ReadDirection::Deg0,
            char_direction: ReadDirection::Deg0,
            weight: DEFAULT_WEIGHT,
            italic: false,
            fill_color: None,
            stroke_color: None,
            text_codes: Vec::new(),
        }
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// Set the glyph weight. Values off the 100..=900 grid are rejected.
    pub fn set_weight(&mut self, weight: u16) -> Result<()> {
        self.weight = check_weight(u32::from(weight))?;
        Ok(())
    }

    pub fn with_weight(mut self, weight: u16) -> Result<Self> {
        self.set_weight(weight)?;
        Ok(self)
    }

    pub fn with_text_code(mut self, code: TextCode) -> Self {
        self.text_codes.push(code);
        self
    }

    pub fn text(&self) -> String {
        self.text_codes.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn resolve_font<'a>(&self, lookup: &ResourceLookup<'a>) -> Option<&'a Font> {
        lookup.font(self.font)
    }

    fn advance(&self) -> f64 {
        self.size * self.h_scale
    }
}

impl GraphicUnit for TextObject {
    const TAG: &'static str = "TextObject";

    fn write_attrs(&self, w: &mut XmlWriter) {
        w.attr_id("Font", self.font)
            .attr_num("Size", self.size)
            .attr_bool_default("Stroke", self.stroke, false)
            .attr_bool_default("Fill", self.fill, true)
            .attr_num_default("HScale", self.h_scale, 1.0);
        if self.read_direction != ReadDirection::Deg0 {
            w.attr_u32("ReadDirection", self.read_direction.degrees());
        }
        if self.char_direction != ReadDirection::Deg0 {
            w.attr_u32("CharDirection", self.char_direction.degrees());
        }
        if self.weight != DEFAULT_WEIGHT {
            w.attr_u32("Weight", u32::from(self.weight));
        }
        w.attr_bool_default("Italic", self.italic, false);
    }

    fn has_children(&self) -> bool {
        true
    }

    fn write_children(&self, w: &mut XmlWriter) {
        write_color_opt(w, "FillColor", self.fill_color.as_ref());
        write_color_opt(w, "StrokeColor", self.stroke_color.as_ref());
        for code in &self.text_codes {
            w.open("TextCode").attr_num("X", code.x).attr_num("Y", code.y);
            for (name, deltas) in [("DeltaX", &code.delta_x), ("DeltaY", &code.delta_y)] {
                if !deltas.is_empty() {
                    let mut value = String::new();
                    write_delta_list(&mut value, deltas);
                    w.attr(name, &value);
                }
            }
            w.end_attrs().text(&code.text).close("TextCode");
        }
    }

    fn from_xml(el: &XmlElement, ctx: &ParseContext<'_>) -> Result<Self> {
        let direction = |name: &str| -> Result<ReadDirection> {
            match el.attr_u32(name)? {
                None => Ok(ReadDirection::Deg0),
                Some(d) => ReadDirection::from_degrees(d)
                    .ok_or_else(|| Error::invalid_value(Self::TAG, name, &d.to_string())),
            }
        };
        let weight = match el.attr_u32("Weight")? {
            None => DEFAULT_WEIGHT,
            Some(w) => check_weight(w)?,
        };
        let mut text_codes = Vec::new();
        for code in el.children_named("TextCode") {
            let deltas = |name: &str| -> Result<Vec<f64>> {
                match code.attr(name) {
                    None => Ok(Vec::new()),
                    Some(v) => parse_delta_list(v).ok_or_else(|| Error::invalid_value("TextCode", name, v)),
                }
            };
            text_codes.push(TextCode {
                x: code.attr_f64("X")?.unwrap_or(0.0),
                y: code.attr_f64("Y")?.unwrap_or(0.0),
                delta_x: deltas("DeltaX")?,
                delta_y: deltas("DeltaY")?,
                text: code.text().to_owned(),
            });
        }
        Ok(Self {
            font: el.required_id("Font")?,
            size: el.required_f64("Size")?,
            stroke: el.attr_bool("Stroke")?.unwrap_or(false),
            fill: el.attr_bool("Fill")?.unwrap_or(true),
            h_scale: el.attr_f64("HScale")?.unwrap_or(1.0),
            read_direction: direction("ReadDirection")?,
            char_direction: direction("CharDirection")?,
            weight,
            italic: el.attr_bool("Italic")?.unwrap_or(false),
            fill_color: parse_color_child(el, "FillColor", ctx)?,
            stroke_color: parse_color_child(el, "StrokeColor", ctx)?,
            text_codes,
        })
    }

    /// Extent of the glyph runs, anchored at the current boundary origin.
    fn recalculate_boundary(&mut self, boundary: &Boundary, _ctm: &Transform) -> Option<Boundary> {
        if self.text_codes.is_empty() {
            return None;
        }
        let advance = self.advance();
        let mut width: f64 = 0.0;
        let mut height: f64 = 0.0;
        for code in &self.text_codes {
            let glyphs = code.text.chars().count();
            if glyphs == 0 {
                continue;
            }
            let mut x = code.x;
            let mut y = code.y;
            for i in 0..glyphs - 1 {
                x += code.delta_x.get(i).copied().unwrap_or(advance);
                y += code.delta_y.get(i).copied().unwrap_or(0.0);
            }
            width = width.max(x + advance);
            height = height.max(y.max(code.y));
        }
        let origin = boundary.origin();
        Some(Boundary::from_origin_size(origin.x, origin.y, width, height))
    }

    fn collect_references(&self, out: &mut Vec<(ResourceKind, Id)>) {
        out.push((ResourceKind::Font, self.font));
        color_reference(self.fill_color.as_ref(), out);
        color_reference(self.stroke_color.as_ref(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::IdAllocator;
    use crate::object::Object;

    fn round_trip(obj: &Object) -> Object {
        let mut w = XmlWriter::fragment();
        obj.write_xml(&mut w);
        let ids = IdAllocator::new();
        let ctx = ParseContext {
            lookup: ResourceLookup::empty(),
            ids: &ids,
        };
        Object::from_xml(&XmlElement::parse(w.into_string().as_bytes()).unwrap(), &ctx).unwrap()
    }

    #[test]
    fn test_text_round_trip() {
        let mut text = TextObject::new(Id::new(3), 10.5).with_text_code(
            TextCode::new(0.0, 9.0, "Hello  world").with_delta_x(vec![5.0; 11]),
        );
        text.set_weight(700).unwrap();
        text.read_direction = ReadDirection::Deg90;
        text.fill_color = Some(Color::rgb(10, 20, 30));
        let mut obj = Object::from(text).with_boundary(Boundary::from_origin_size(20.0, 30.0, 60.0, 12.0));
        obj.id = Id::new(11);

        let mut w = XmlWriter::fragment();
        obj.write_xml(&mut w);
        let xml = w.into_string();
        assert!(xml.contains(r#"DeltaX="g 11 5""#));
        assert!(xml.contains(r#"Weight="700""#));
        assert!(!xml.contains("HScale"));
        assert_eq!(round_trip(&obj), obj);
    }

    #[test]
    fn test_recalculate_keeps_origin() {
        let text = TextObject::new(Id::new(1), 4.0)
            .with_text_code(TextCode::new(0.0, 3.5, "abc").with_delta_x(vec![4.0, 4.0]));
        let mut obj = Object::from(text).with_boundary(Boundary::from_origin_size(10.0, 20.0, 1.0, 1.0));
        obj.recalculate_boundary();
        assert_eq!(obj.boundary, Boundary::from_origin_size(10.0, 20.0, 12.0, 3.5));
    }

    #[test]
    fn test_invalid_weight() {
        let ids = IdAllocator::new();
        let ctx = ParseContext {
            lookup: ResourceLookup::empty(),
            ids: &ids,
        };
        let el = XmlElement::parse(
            br#"<TextObject ID="1" Boundary="0 0 1 1" Font="2" Size="3" Weight="450"><TextCode X="0" Y="0">a</TextCode></TextObject>"#,
        )
        .unwrap();
        assert!(matches!(Object::from_xml(&el, &ctx), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_weight_off_grid_rejected() {
        let mut text = TextObject::new(Id::new(1), 4.0);
        assert!(matches!(text.set_weight(450), Err(Error::InvalidValue { .. })));
        assert!(text.set_weight(1000).is_err());
        assert!(text.set_weight(0).is_err());
        assert_eq!(text.weight(), DEFAULT_WEIGHT);

        let bold = TextObject::new(Id::new(1), 4.0).with_weight(700).unwrap();
        assert_eq!(bold.weight(), 700);
    }
}
