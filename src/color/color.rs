//! Colour values (CT_Color).

use super::space::{max_channel_value, ColorSpace, ColorSpaceKind, ColorSpaceSource};
use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, Result};
use smallvec::SmallVec;

/// Up to four channel values. Unused channels are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorValue {
    pub channels: [u16; 4],
}

impl ColorValue {
    /// Build from a slice of up to four channels; extra values are dropped.
    pub fn new(values: &[u16]) -> Self {
        let mut channels = [0u16; 4];
        for (slot, v) in channels.iter_mut().zip(values) {
            *slot = *v;
        }
        Self { channels }
    }

    /// Parse a `Value` string. Tokens are decimal or `#HH` hexadecimal.
    pub fn parse(text: &str) -> Option<Self> {
        let tokens: SmallVec<[u16; 4]> = text
            .split_ascii_whitespace()
            .map(parse_channel)
            .collect::<Option<_>>()?;
        if tokens.is_empty() || tokens.len() > 4 {
            return None;
        }
        Some(Self::new(&tokens))
    }

    /// Number of channels a `Value` string carries.
    pub(crate) fn count_in(text: &str) -> usize {
        text.split_ascii_whitespace().count()
    }

    pub fn to_value_string(&self, channels: usize) -> String {
        let mut out = String::new();
        let mut buf = itoa::Buffer::new();
        for (i, v) in self.channels.iter().take(channels.clamp(1, 4)).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(buf.format(*v));
        }
        out
    }
}

fn parse_channel(token: &str) -> Option<u16> {
    match token.strip_prefix('#') {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => token.parse::<u16>().ok().or_else(|| {
            crate::common::number::parse_f64(token)
                .filter(|v| (0.0..=65535.0).contains(v))
                .map(|v| v.round() as u16)
        }),
    }
}

/// Which representation of a colour is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSource {
    Value(ColorValue),
    /// Zero-based index into the colour space palette.
    Index(u32),
}

/// One colour expressed in a colour space.
///
/// The colour space is referenced by id; id 0 means the document default.
/// The kind and bit depth of the space are cached at construction so a
/// colour can be interpreted without a registry at hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    color_space: Id,
    kind: ColorSpaceKind,
    bits: u8,
    source: ColorSource,
    alpha: u8,
}

impl Color {
    pub fn gray(v: u8) -> Self {
        Self::direct(ColorSpaceKind::Gray, &[u16::from(v)])
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::direct(ColorSpaceKind::Rgb, &[u16::from(r), u16::from(g), u16::from(b)])
    }

    pub fn cmyk(c: u8, m: u8, y: u8, k: u8) -> Self {
        Self::direct(
            ColorSpaceKind::Cmyk,
            &[u16::from(c), u16::from(m), u16::from(y), u16::from(k)],
        )
    }

    fn direct(kind: ColorSpaceKind, values: &[u16]) -> Self {
        Self {
            color_space: Id::UNSET,
            kind,
            bits: 8,
            source: ColorSource::Value(ColorValue::new(values)),
            alpha: 255,
        }
    }

    /// Direct value in a declared colour space.
    pub fn from_value(space: &ColorSpace, value: ColorValue) -> Self {
        Self {
            color_space: space.id,
            kind: space.kind,
            bits: space.bits_per_component,
            source: ColorSource::Value(value),
            alpha: 255,
        }
    }

    /// Palette entry of a declared colour space.
    pub fn indexed(space: &ColorSpace, index: u32) -> Self {
        Self {
            color_space: space.id,
            kind: space.kind,
            bits: space.bits_per_component,
            source: ColorSource::Index(index),
            alpha: 255,
        }
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn color_space_id(&self) -> Id {
        self.color_space
    }

    pub fn kind(&self) -> ColorSpaceKind {
        self.kind
    }

    pub fn bits_per_component(&self) -> u8 {
        self.bits
    }

    pub fn source(&self) -> ColorSource {
        self.source
    }

    pub fn uses_palette(&self) -> bool {
        matches!(self.source, ColorSource::Index(_))
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    /// The colour space this colour refers to, if reachable.
    pub fn resolve<'a>(&self, spaces: &'a dyn ColorSpaceSource) -> Option<&'a ColorSpace> {
        spaces.color_space(self.color_space)
    }

    /// Channel values, looking palette indices up in the colour space.
    pub fn value(&self, spaces: &dyn ColorSpaceSource) -> Option<ColorValue> {
        match self.source {
            ColorSource::Value(v) => Some(v),
            ColorSource::Index(i) => self.resolve(spaces)?.palette_entry(i).copied(),
        }
    }

    /// Channel values scaled to `0.0..=1.0`. Palette colours yield `None`.
    pub fn normalized(&self) -> Option<[f64; 4]> {
        let ColorSource::Value(v) = self.source else {
            return None;
        };
        let max = f64::from(max_channel_value(self.bits));
        Some(v.channels.map(|c| f64::from(c) / max))
    }

    /// Compare two colours with a per-channel tolerance on the normalized
    /// scale. A delta of zero is exact equality.
    pub fn is_same_color(&self, other: &Color, delta: f64) -> bool {
        if self.kind != other.kind || self.color_space != other.color_space {
            return false;
        }
        if (f64::from(self.alpha) - f64::from(other.alpha)).abs() / 255.0 > delta {
            return false;
        }
        if self.bits != other.bits && delta == 0.0 {
            return false;
        }
        match (self.normalized(), other.normalized()) {
            (Some(a), Some(b)) => a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= delta),
            _ => self.source == other.source,
        }
    }

    /// Per-channel integer average of two direct colours. Palette colours
    /// cannot be averaged and return `self` unchanged.
    pub fn average(&self, other: &Color) -> Color {
        match (self.source, other.source) {
            (ColorSource::Value(a), ColorSource::Value(b)) => {
                let mut channels = [0u16; 4];
                for (i, slot) in channels.iter_mut().enumerate() {
                    *slot = ((u32::from(a.channels[i]) + u32::from(b.channels[i])) / 2) as u16;
                }
                Color {
                    source: ColorSource::Value(ColorValue { channels }),
                    alpha: ((u16::from(self.alpha) + u16::from(other.alpha)) / 2) as u8,
                    ..self.clone()
                }
            },
            _ => self.clone(),
        }
    }

    /// Write the colour attributes onto an open start tag.
    pub(crate) fn write_attrs(&self, w: &mut XmlWriter) {
        match self.source {
            ColorSource::Value(v) => {
                w.attr("Value", &v.to_value_string(self.kind.channels()));
            },
            ColorSource::Index(i) => {
                w.attr_u32("Index", i);
            },
        }
        w.attr_id_opt("ColorSpace", Some(self.color_space));
        if self.alpha != 255 {
            w.attr_u32("Alpha", u32::from(self.alpha));
        }
    }

    /// `<ofd:Tag .../>` for a plain colour.
    pub(crate) fn write_element(&self, w: &mut XmlWriter, tag: &str) {
        w.open(tag);
        self.write_attrs(w);
        w.close_empty();
    }

    /// Parse colour attributes. Returns `None` when the element carries
    /// neither `Value` nor `Index` (for example a FillColor that only wraps
    /// a shading).
    pub(crate) fn from_xml(el: &XmlElement, spaces: &dyn ColorSpaceSource) -> Result<Option<Self>> {
        let color_space = el.attr_id("ColorSpace")?.unwrap_or(Id::UNSET);
        let alpha = match el.attr_u32("Alpha")? {
            None => 255,
            Some(a) => u8::try_from(a)
                .map_err(|_| Error::invalid_value(el.name(), "Alpha", &a.to_string()))?,
        };
        let resolved = spaces.color_space(color_space);

        let value = el.attr("Value");
        let source = if let Some(index) = el.attr_u32("Index")? {
            ColorSource::Index(index)
        } else if let Some(value) = value {
            let parsed = ColorValue::parse(value)
                .ok_or_else(|| Error::invalid_value(el.name(), "Value", value))?;
            ColorSource::Value(parsed)
        } else {
            return Ok(None);
        };

        let (kind, bits) = match (resolved, source, value) {
            (Some(cs), ColorSource::Index(_), _) => (cs.kind, cs.bits_per_component),
            (Some(cs), ColorSource::Value(_), Some(text))
                if cs.kind.channels() == ColorValue::count_in(text) =>
            {
                (cs.kind, cs.bits_per_component)
            },
            (_, ColorSource::Value(_), Some(text)) => {
                let kind = ColorSpaceKind::from_channel_count(ColorValue::count_in(text))
                    .ok_or_else(|| Error::invalid_value(el.name(), "Value", text))?;
                (kind, resolved.map_or(8, |cs| cs.bits_per_component))
            },
            _ => (ColorSpaceKind::default(), 8),
        };

        Ok(Some(Color {
            color_space,
            kind,
            bits,
            source,
            alpha,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DefaultColorSpaces;

    fn parse(xml: &str) -> Option<Color> {
        let el = XmlElement::parse(xml.as_bytes()).unwrap();
        Color::from_xml(&el, &DefaultColorSpaces).unwrap()
    }

    #[test]
    fn test_default_alpha_is_suppressed() {
        let mut w = XmlWriter::fragment();
        Color::rgb(255, 0, 0).write_element(&mut w, "FillColor");
        assert_eq!(w.into_string(), r#"<ofd:FillColor Value="255 0 0"/>"#);

        let mut w = XmlWriter::fragment();
        Color::gray(128).with_alpha(10).write_element(&mut w, "StrokeColor");
        assert_eq!(w.into_string(), r#"<ofd:StrokeColor Value="128" Alpha="10"/>"#);
    }

    #[test]
    fn test_parse_infers_kind_from_count() {
        assert_eq!(parse(r#"<FillColor Value="255 0 0"/>"#), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse(r#"<FillColor Value="128"/>"#), Some(Color::gray(128)));
        assert_eq!(parse(r##"<FillColor Value="#FF #80 #00 #10"/>"##), Some(Color::cmyk(255, 128, 0, 16)));
        assert_eq!(parse(r#"<FillColor/>"#), None);
    }

    #[test]
    fn test_same_color() {
        let red = Color::rgb(255, 0, 0);
        assert!(red.is_same_color(&Color::rgb(255, 0, 0), 0.0));
        assert!(!red.is_same_color(&Color::rgb(254, 0, 0), 0.0));
        assert!(red.is_same_color(&Color::rgb(254, 0, 0), 0.01));
        assert!(!red.is_same_color(&Color::rgb(255, 0, 0).with_alpha(0), 0.5));
        assert!(!red.is_same_color(&Color::gray(255), 1.0));
    }

    #[test]
    fn test_average() {
        let avg = Color::rgb(255, 0, 100).average(&Color::rgb(1, 50, 100));
        assert_eq!(avg, Color::rgb(128, 25, 100));

        let mut cs = ColorSpace::new(ColorSpaceKind::Rgb);
        cs.id = Id::new(3);
        let indexed = Color::indexed(&cs, 1);
        assert_eq!(indexed.average(&Color::rgb(0, 0, 0)), indexed);
    }

    #[test]
    fn test_indexed_value() {
        struct One(ColorSpace);
        impl ColorSpaceSource for One {
            fn color_space(&self, id: Id) -> Option<&ColorSpace> {
                (id == self.0.id).then_some(&self.0)
            }
        }
        let mut cs = ColorSpace::new(ColorSpaceKind::Rgb)
            .with_palette(vec![ColorValue::new(&[1, 2, 3]), ColorValue::new(&[4, 5, 6])]);
        cs.id = Id::new(8);
        let src = One(cs);

        let el = XmlElement::parse(br#"<FillColor ColorSpace="8" Index="1"/>"#).unwrap();
        let color = Color::from_xml(&el, &src).unwrap().unwrap();
        assert!(color.uses_palette());
        assert_eq!(color.value(&src), Some(ColorValue::new(&[4, 5, 6])));
    }
}
