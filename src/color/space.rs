//! Colour spaces (CT_ColorSpace).

use super::ColorValue;
use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, Result};
use once_cell::sync::Lazy;

/// Channel semantics of a colour space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpaceKind {
    Gray,
    #[default]
    Rgb,
    Cmyk,
}

impl ColorSpaceKind {
    pub fn channels(self) -> usize {
        match self {
            ColorSpaceKind::Gray => 1,
            ColorSpaceKind::Rgb => 3,
            ColorSpaceKind::Cmyk => 4,
        }
    }

    /// Kind implied by a number of channel values.
    pub fn from_channel_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ColorSpaceKind::Gray),
            3 => Some(ColorSpaceKind::Rgb),
            4 => Some(ColorSpaceKind::Cmyk),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorSpaceKind::Gray => "GRAY",
            ColorSpaceKind::Rgb => "RGB",
            ColorSpaceKind::Cmyk => "CMYK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "GRAY" | "Gray" | "gray" => Some(ColorSpaceKind::Gray),
            "RGB" | "Rgb" | "rgb" => Some(ColorSpaceKind::Rgb),
            "CMYK" | "Cmyk" | "cmyk" => Some(ColorSpaceKind::Cmyk),
            _ => None,
        }
    }
}

/// Bits per channel allowed by the format.
pub const VALID_BITS: [u8; 5] = [1, 2, 4, 8, 16];

/// A declared colour space.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSpace {
    pub id: Id,
    pub kind: ColorSpaceKind,
    pub bits_per_component: u8,
    /// Embedded ICC profile location.
    pub profile: Option<String>,
    /// Palette entries, addressed by zero-based index.
    pub palette: Vec<ColorValue>,
}

/// Stand-in for colour-space id 0 when the document declares no DefaultCS.
pub static DEFAULT_COLOR_SPACE: Lazy<ColorSpace> = Lazy::new(|| ColorSpace::new(ColorSpaceKind::Rgb));

impl Default for ColorSpace {
    fn default() -> Self {
        Self::new(ColorSpaceKind::Rgb)
    }
}

impl ColorSpace {
    pub fn new(kind: ColorSpaceKind) -> Self {
        Self {
            id: Id::UNSET,
            kind,
            bits_per_component: 8,
            profile: None,
            palette: Vec::new(),
        }
    }

    pub fn with_bits(mut self, bits: u8) -> Self {
        self.bits_per_component = bits;
        self
    }

    pub fn with_palette(mut self, palette: Vec<ColorValue>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Largest channel value.
    pub fn max_value(&self) -> u16 {
        max_channel_value(self.bits_per_component)
    }

    pub fn palette_entry(&self, index: u32) -> Option<&ColorValue> {
        self.palette.get(index as usize)
    }

    pub(crate) fn write_xml(&self, w: &mut XmlWriter) {
        w.open("ColorSpace")
            .attr_id("ID", self.id)
            .attr("Type", self.kind.as_str());
        if self.bits_per_component != 8 {
            w.attr_u32("BitsPerComponent", u32::from(self.bits_per_component));
        }
        if let Some(profile) = &self.profile {
            w.attr_str_opt("Profile", profile);
        }
        if self.palette.is_empty() {
            w.close_empty();
            return;
        }
        w.end_attrs().open("Palette").end_attrs();
        for cv in &self.palette {
            w.text_element("CV", &cv.to_value_string(self.kind.channels()));
        }
        w.close("Palette").close("ColorSpace");
    }

    pub(crate) fn from_xml(el: &XmlElement) -> Result<Self> {
        let id = el.required_id("ID")?;
        let type_str = el.required_attr("Type")?;
        let kind = ColorSpaceKind::parse(type_str)
            .ok_or_else(|| Error::invalid_value("ColorSpace", "Type", type_str))?;
        let bits = match el.attr_u32("BitsPerComponent")? {
            None => 8,
            Some(b) => u8::try_from(b)
                .ok()
                .filter(|b| VALID_BITS.contains(b))
                .ok_or_else(|| Error::invalid_value("ColorSpace", "BitsPerComponent", &b.to_string()))?,
        };
        let mut palette = Vec::new();
        if let Some(p) = el.child("Palette") {
            for cv in p.children_named("CV") {
                let value = ColorValue::parse(cv.trimmed_text())
                    .ok_or_else(|| Error::invalid_value("CV", "text()", cv.trimmed_text()))?;
                palette.push(value);
            }
        }
        Ok(Self {
            id,
            kind,
            bits_per_component: bits,
            profile: el.attr("Profile").map(str::to_owned),
            palette,
        })
    }
}

#[inline]
pub(crate) fn max_channel_value(bits: u8) -> u16 {
    if bits >= 16 {
        u16::MAX
    } else {
        (1u16 << bits) - 1
    }
}

/// Resolves colour-space reference ids while parsing colours.
pub trait ColorSpaceSource {
    /// Look up a colour space. Id 0 resolves to the document default.
    fn color_space(&self, id: Id) -> Option<&ColorSpace>;
}

/// Source that knows only the built-in default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultColorSpaces;

impl ColorSpaceSource for DefaultColorSpaces {
    fn color_space(&self, id: Id) -> Option<&ColorSpace> {
        if id.is_set() {
            None
        } else {
            Some(&*DEFAULT_COLOR_SPACE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_round_trip() {
        let mut cs = ColorSpace::new(ColorSpaceKind::Rgb)
            .with_palette(vec![ColorValue::new(&[255, 0, 0]), ColorValue::new(&[0, 0, 255])]);
        cs.id = Id::new(4);
        let mut w = XmlWriter::fragment();
        cs.write_xml(&mut w);
        let xml = w.into_string();
        assert_eq!(
            xml,
            r#"<ofd:ColorSpace ID="4" Type="RGB"><ofd:Palette><ofd:CV>255 0 0</ofd:CV><ofd:CV>0 0 255</ofd:CV></ofd:Palette></ofd:ColorSpace>"#
        );
        let parsed = ColorSpace::from_xml(&XmlElement::parse(xml.as_bytes()).unwrap()).unwrap();
        assert_eq!(parsed, cs);
    }

    #[test]
    fn test_bad_bits_rejected() {
        let el = XmlElement::parse(br#"<ColorSpace ID="1" Type="GRAY" BitsPerComponent="3"/>"#).unwrap();
        assert!(matches!(ColorSpace::from_xml(&el), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_max_value() {
        assert_eq!(max_channel_value(1), 1);
        assert_eq!(max_channel_value(8), 255);
        assert_eq!(max_channel_value(16), 65535);
    }
}
