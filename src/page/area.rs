//! Page geometry (CT_PageArea).

use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Result};
use crate::geometry::Boundary;

/// Page boxes. Only the physical box is mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct PageArea {
    pub physical_box: Boundary,
    pub application_box: Option<Boundary>,
    pub content_box: Option<Boundary>,
    pub bleed_box: Option<Boundary>,
}

impl Default for PageArea {
    /// A4 portrait.
    fn default() -> Self {
        Self::a4()
    }
}

impl PageArea {
    pub fn new(physical_box: Boundary) -> Self {
        Self {
            physical_box,
            application_box: None,
            content_box: None,
            bleed_box: None,
        }
    }

    /// 210 x 297 mm.
    pub fn a4() -> Self {
        Self::new(Boundary::from_origin_size(0.0, 0.0, 210.0, 297.0))
    }

    pub fn with_application_box(mut self, b: Boundary) -> Self {
        self.application_box = Some(b);
        self
    }

    pub fn with_content_box(mut self, b: Boundary) -> Self {
        self.content_box = Some(b);
        self
    }

    pub fn with_bleed_box(mut self, b: Boundary) -> Self {
        self.bleed_box = Some(b);
        self
    }

    /// Box a renderer should display: the application box when present.
    pub fn display_box(&self) -> Boundary {
        self.application_box.unwrap_or(self.physical_box)
    }

    pub(crate) fn write_xml(&self, w: &mut XmlWriter, tag: &str) {
        w.open(tag).end_attrs().box_element("PhysicalBox", &self.physical_box);
        for (name, b) in [
            ("ApplicationBox", &self.application_box),
            ("ContentBox", &self.content_box),
            ("BleedBox", &self.bleed_box),
        ] {
            if let Some(b) = b {
                w.box_element(name, b);
            }
        }
        w.close(tag);
    }

    pub(crate) fn from_xml(el: &XmlElement) -> Result<Self> {
        let parse = |name: &str| -> Result<Option<Boundary>> {
            match el.child(name) {
                None => Ok(None),
                Some(c) => {
                    let text = c.trimmed_text();
                    Boundary::parse_box(text)
                        .map(Some)
                        .ok_or_else(|| Error::invalid_value(name, "text()", text))
                },
            }
        };
        Ok(Self {
            physical_box: parse("PhysicalBox")?
                .ok_or_else(|| Error::missing_element(el.name(), "PhysicalBox"))?,
            application_box: parse("ApplicationBox")?,
            content_box: parse("ContentBox")?,
            bleed_box: parse("BleedBox")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_round_trip() {
        let area = PageArea::a4().with_content_box(Boundary::from_origin_size(10.0, 10.0, 190.0, 277.0));
        let mut w = XmlWriter::fragment();
        area.write_xml(&mut w, "Area");
        let xml = w.into_string();
        assert_eq!(
            xml,
            "<ofd:Area><ofd:PhysicalBox>0.000 0.000 210.000 297.000</ofd:PhysicalBox>\
             <ofd:ContentBox>10.000 10.000 190.000 277.000</ofd:ContentBox></ofd:Area>"
        );
        let parsed = PageArea::from_xml(&XmlElement::parse(xml.as_bytes()).unwrap()).unwrap();
        assert_eq!(parsed, area);
    }

    #[test]
    fn test_physical_box_required() {
        let el = XmlElement::parse(b"<Area><ContentBox>0 0 1 1</ContentBox></Area>").unwrap();
        assert!(matches!(PageArea::from_xml(&el), Err(Error::MissingElement { .. })));
    }
}
