//! Font resources (CT_Font).

use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, Result};
use bitflags::bitflags;

bitflags! {
    /// Style flags declared on a font.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyle: u8 {
        const BOLD = 0b0001;
        const ITALIC = 0b0010;
        const SERIF = 0b0100;
        const FIXED_WIDTH = 0b1000;
    }
}

const STYLE_ATTRS: [(&str, FontStyle); 4] = [
    ("Bold", FontStyle::BOLD),
    ("Italic", FontStyle::ITALIC),
    ("Serif", FontStyle::SERIF),
    ("FixedWidth", FontStyle::FIXED_WIDTH),
];

/// Font program flavour, derived from the embedded file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontType {
    #[default]
    TrueType,
    CidType2,
    Type1,
    Type3,
}

impl FontType {
    pub fn extension(self) -> &'static str {
        match self {
            FontType::TrueType => "ttf",
            FontType::CidType2 => "otf",
            FontType::Type1 => "pfb",
            FontType::Type3 => "t3",
        }
    }

    pub fn from_file_name(name: &str) -> Self {
        let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("otf" | "cff") => FontType::CidType2,
            Some("pfb" | "pfa" | "t1") => FontType::Type1,
            Some("t3") => FontType::Type3,
            _ => FontType::TrueType,
        }
    }
}

/// Where the font program lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontLocation {
    /// Bytes stored in the container.
    Embedded,
    /// Referenced by URL outside the container.
    External,
    /// Installed on the reading system; no file.
    #[default]
    Resident,
}

/// A font declared by a resource registry.
///
/// The font program itself is opaque; it is loaded on demand by
/// [`ResourceRegistry::load_fonts`](super::ResourceRegistry::load_fonts).
#[derive(Debug, Clone)]
pub struct Font {
    pub id: Id,
    pub font_name: String,
    pub family_name: Option<String>,
    pub charset: String,
    pub style: FontStyle,
    pub font_type: FontType,
    pub location: FontLocation,
    /// Embedded file name relative to the registry base, or a URL.
    pub font_file: Option<String>,
    data: Option<Vec<u8>>,
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.font_name == other.font_name
            && self.family_name == other.family_name
            && self.charset == other.charset
            && self.style == other.style
            && self.font_type == other.font_type
            && self.location == other.location
            && self.font_file == other.font_file
    }
}

pub(crate) const DEFAULT_CHARSET: &str = "unicode";

impl Default for Font {
    fn default() -> Self {
        Self {
            id: Id::default(),
            font_name: String::new(),
            family_name: None,
            charset: DEFAULT_CHARSET.to_owned(),
            style: FontStyle::empty(),
            font_type: FontType::default(),
            location: FontLocation::default(),
            font_file: None,
            data: None,
        }
    }
}

impl Font {
    /// A resident font known by name.
    pub fn new(font_name: impl Into<String>) -> Self {
        Self {
            font_name: font_name.into(),
            ..Self::default()
        }
    }

    /// A font whose program is stored in the container.
    pub fn embedded(font_name: impl Into<String>, font_type: FontType, data: Vec<u8>) -> Self {
        Self {
            font_type,
            location: FontLocation::Embedded,
            data: Some(data),
            ..Self::new(font_name)
        }
    }

    /// An empty family name means no family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family_name = Some(family.into()).filter(|f| !f.is_empty());
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn is_bold(&self) -> bool {
        self.style.contains(FontStyle::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.style.contains(FontStyle::ITALIC)
    }

    /// Whether the program bytes are in memory.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Raw font program, once loaded.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = Some(data);
    }

    /// Drop the loaded bytes.
    pub fn unload(&mut self) {
        self.data = None;
    }

    /// Bring fields into the form they take after a write and read. An
    /// empty charset is `unicode` and an empty family is none. An external
    /// font without a URL is resident, and a resident font has no file to
    /// take its type from.
    pub(crate) fn normalize(&mut self) {
        if self.charset.is_empty() {
            self.charset = DEFAULT_CHARSET.to_owned();
        }
        if self.family_name.as_deref() == Some("") {
            self.family_name = None;
        }
        if self.location == FontLocation::External && self.font_file.is_none() {
            self.location = FontLocation::Resident;
        }
        if self.location == FontLocation::Resident {
            self.font_file = None;
            self.font_type = FontType::default();
        }
    }

    /// File name used when the font is stored by the writer.
    pub fn default_file_name(&self) -> String {
        format!("Font_{}.{}", self.id, self.font_type.extension())
    }

    pub(crate) fn write_xml(&self, w: &mut XmlWriter) {
        w.open("Font")
            .attr_id("ID", self.id)
            .attr("FontName", &self.font_name);
        if let Some(family) = &self.family_name {
            w.attr_str_opt("FamilyName", family);
        }
        if self.charset != DEFAULT_CHARSET {
            w.attr_str_opt("Charset", &self.charset);
        }
        for (name, flag) in STYLE_ATTRS {
            w.attr_bool_default(name, self.style.contains(flag), false);
        }
        match self.font_file.as_deref() {
            Some(file) if self.location != FontLocation::Resident => {
                w.end_attrs().text_element("FontFile", file).close("Font");
            },
            _ => {
                w.close_empty();
            },
        }
    }

    pub(crate) fn from_xml(el: &XmlElement) -> Result<Self> {
        let mut style = FontStyle::empty();
        for (name, flag) in STYLE_ATTRS {
            if el.attr_bool(name)?.unwrap_or(false) {
                style |= flag;
            }
        }
        let font_name = el.required_attr("FontName")?;
        if font_name.is_empty() {
            return Err(Error::invalid_value("Font", "FontName", font_name));
        }
        let font_file = el.child_text("FontFile").map(str::to_owned);
        let location = match font_file.as_deref() {
            None => FontLocation::Resident,
            Some(f) if f.contains("://") => FontLocation::External,
            Some(_) => FontLocation::Embedded,
        };
        Ok(Self {
            id: el.required_id("ID")?,
            font_name: font_name.to_owned(),
            family_name: el.attr("FamilyName").filter(|f| !f.is_empty()).map(str::to_owned),
            charset: el
                .attr("Charset")
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CHARSET)
                .to_owned(),
            style,
            font_type: font_file.as_deref().map(FontType::from_file_name).unwrap_or_default(),
            location,
            font_file,
            data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_xml_round_trip() {
        let mut font = Font::embedded("SimSun", FontType::TrueType, vec![0, 1])
            .with_family("SimSun")
            .with_style(FontStyle::BOLD | FontStyle::SERIF);
        font.id = Id::new(7);
        font.font_file = Some(font.default_file_name());

        let mut w = XmlWriter::fragment();
        font.write_xml(&mut w);
        let xml = w.into_string();
        assert_eq!(
            xml,
            r#"<ofd:Font ID="7" FontName="SimSun" FamilyName="SimSun" Bold="true" Serif="true"><ofd:FontFile>Font_7.ttf</ofd:FontFile></ofd:Font>"#
        );

        let parsed = Font::from_xml(&XmlElement::parse(xml.as_bytes()).unwrap()).unwrap();
        assert_eq!(parsed, font);
        assert!(!parsed.is_loaded());
    }

    #[test]
    fn test_resident_and_external() {
        let el = XmlElement::parse(br#"<Font ID="2" FontName="Arial"/>"#).unwrap();
        let font = Font::from_xml(&el).unwrap();
        assert_eq!(font.location, FontLocation::Resident);
        assert_eq!(font.charset, "unicode");

        let el = XmlElement::parse(
            br#"<Font ID="3" FontName="X"><FontFile>https://fonts.example/x.otf</FontFile></Font>"#,
        )
        .unwrap();
        let font = Font::from_xml(&el).unwrap();
        assert_eq!(font.location, FontLocation::External);
        assert_eq!(font.font_type, FontType::CidType2);
    }

    #[test]
    fn test_default_font_is_unicode() {
        assert_eq!(Font::default().charset, DEFAULT_CHARSET);
        assert_eq!(Font::new("Arial").with_family("").family_name, None);
    }

    #[test]
    fn test_normalize_matches_read_back() {
        let mut font = Font::new("Arial");
        font.id = Id::new(4);
        font.charset = String::new();
        font.family_name = Some(String::new());
        font.location = FontLocation::External;
        font.normalize();
        assert_eq!(font.charset, "unicode");
        assert_eq!(font.family_name, None);
        assert_eq!(font.location, FontLocation::Resident);

        let mut w = XmlWriter::fragment();
        font.write_xml(&mut w);
        let parsed = Font::from_xml(&XmlElement::parse(w.into_string().as_bytes()).unwrap()).unwrap();
        assert_eq!(parsed, font);
    }

    #[test]
    fn test_missing_font_name() {
        let el = XmlElement::parse(br#"<Font ID="2"/>"#).unwrap();
        assert!(matches!(Font::from_xml(&el), Err(Error::MissingAttribute { .. })));
    }
}
