//! Lightweight element tree built from `quick-xml` events.
//!
//! Container members are small and parsed once, so each member is read into
//! an [`XmlElement`] tree and the object model walks that tree. Names are
//! matched on their local part: `ofd:Page` and `Page` are the same element.

use super::escape::{resolve_entity, unescape_xml};
use crate::common::error::{Error, Result};
use crate::common::id::Id;
use crate::common::number::{parse_f64, parse_number_list};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One parsed XML element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

/// Strip a namespace prefix.
#[inline]
fn local(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, l)| l)
}

impl XmlElement {
    /// Parse a complete document and return its root element.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(Self::from_start(e)?);
                },
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = String::from_utf8(t.to_vec())?;
                        current.text.push_str(&unescape_xml(&raw));
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8(t.to_vec())?);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(current) = stack.last_mut() {
                        let name = String::from_utf8(r.to_vec())?;
                        match resolve_entity(&name) {
                            Some(ch) => current.text.push(ch),
                            None => {
                                current.text.push('&');
                                current.text.push_str(&name);
                                current.text.push(';');
                            },
                        }
                    }
                },
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(element),
                            None => return Ok(element),
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlError(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Err(Error::XmlError("No root element found".to_string()))
    }

    fn from_start(e: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8(e.name().as_ref().to_vec())?;
        let mut attributes = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())?;
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Local element name (namespace prefix removed).
    #[inline]
    pub fn name(&self) -> &str {
        local(&self.name)
    }

    /// Raw text content (not trimmed).
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text content with surrounding whitespace removed.
    #[inline]
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// All children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name() == name)
    }

    pub fn required_child(&self, name: &str) -> Result<&XmlElement> {
        self.child(name)
            .ok_or_else(|| Error::missing_element(self.name(), name))
    }

    /// Trimmed text of the first child with the given name, if non-empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.trimmed_text())
            .filter(|t| !t.is_empty())
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| local(k) == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn required_attr(&self, name: &str) -> Result<&str> {
        self.attr(name)
            .ok_or_else(|| Error::missing_attribute(self.name(), name))
    }

    fn invalid(&self, attribute: &str, value: &str) -> Error {
        Error::invalid_value(self.name(), attribute, value)
    }

    /// Optional floating-point attribute; present but unparseable is an error.
    pub fn attr_f64(&self, name: &str) -> Result<Option<f64>> {
        match self.attr(name) {
            None => Ok(None),
            Some(v) => parse_f64(v).map(Some).ok_or_else(|| self.invalid(name, v)),
        }
    }

    pub fn required_f64(&self, name: &str) -> Result<f64> {
        let v = self.required_attr(name)?;
        parse_f64(v).ok_or_else(|| self.invalid(name, v))
    }

    /// Optional `true`/`false` attribute (`1`/`0` are accepted as well).
    pub fn attr_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.attr(name) {
            None => Ok(None),
            Some(v) => match v.trim() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(self.invalid(name, v)),
            },
        }
    }

    pub fn attr_u32(&self, name: &str) -> Result<Option<u32>> {
        match self.attr(name) {
            None => Ok(None),
            Some(v) => v
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| self.invalid(name, v)),
        }
    }

    pub fn attr_id(&self, name: &str) -> Result<Option<Id>> {
        match self.attr(name) {
            None => Ok(None),
            Some(v) => Id::parse(v).map(Some).ok_or_else(|| self.invalid(name, v)),
        }
    }

    pub fn required_id(&self, name: &str) -> Result<Id> {
        let v = self.required_attr(name)?;
        Id::parse(v).ok_or_else(|| self.invalid(name, v))
    }

    /// Optional whitespace-separated number list.
    pub fn attr_numbers(&self, name: &str) -> Result<Option<Vec<f64>>> {
        match self.attr(name) {
            None => Ok(None),
            Some(v) => parse_number_list(v)
                .map(Some)
                .ok_or_else(|| self.invalid(name, v)),
        }
    }

    /// Parse the trimmed text of this element as an id.
    pub fn text_id(&self) -> Result<Id> {
        let t = self.trimmed_text();
        Id::parse(t).ok_or_else(|| Error::invalid_value(self.name(), "text()", t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_with_prefix() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Res xmlns:ofd="http://www.ofdspec.org/2016" BaseLoc="Res">
  <ofd:Fonts>
    <ofd:Font ID="7" FontName="SimSun" Bold="true"/>
    <ofd:Font ID="9" FontName="Kai &amp; Co"/>
  </ofd:Fonts>
</ofd:Res>"#;
        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.name(), "Res");
        assert_eq!(root.attr("BaseLoc"), Some("Res"));
        assert_eq!(root.attr("xmlns:ofd"), None);

        let fonts: Vec<_> = root.required_child("Fonts").unwrap().children_named("Font").collect();
        assert_eq!(fonts.len(), 2);
        assert_eq!(fonts[0].required_id("ID").unwrap(), Id::new(7));
        assert_eq!(fonts[0].attr_bool("Bold").unwrap(), Some(true));
        assert_eq!(fonts[1].attr("FontName"), Some("Kai & Co"));
    }

    #[test]
    fn test_text_with_entities() {
        let root = XmlElement::parse(b"<a><b>x &lt; y &#x4E2D;</b></a>").unwrap();
        assert_eq!(root.child_text("b"), Some("x < y \u{4E2D}"));
    }

    #[test]
    fn test_required_attribute_reports_context() {
        let root = XmlElement::parse(b"<ofd:TextObject ID=\"3\"/>").unwrap();
        match root.required_attr("Font") {
            Err(Error::MissingAttribute { element, attribute }) => {
                assert_eq!(element, "TextObject");
                assert_eq!(attribute, "Font");
            },
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            root.attr_f64("ID"),
            Ok(Some(v)) if v == 3.0
        ));
    }

    #[test]
    fn test_invalid_numeric_attribute() {
        let root = XmlElement::parse(b"<Obj Size=\"big\" Visible=\"maybe\"/>").unwrap();
        assert!(matches!(root.attr_f64("Size"), Err(Error::InvalidValue { .. })));
        assert!(matches!(root.attr_bool("Visible"), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_no_root() {
        assert!(XmlElement::parse(b"   ").is_err());
    }
}
