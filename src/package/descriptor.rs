//! The root descriptor `OFD.xml`.

use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Result};
use crate::document::DocInfo;

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_DOC_TYPE: &str = "OFD";

/// One `DocBody` entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct DocBody {
    pub info: DocInfo,
    /// Path of `Document.xml`.
    pub doc_root: String,
    pub signatures: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RootDescriptor {
    pub version: String,
    pub doc_type: String,
    pub bodies: Vec<DocBody>,
}

impl RootDescriptor {
    pub fn to_xml(&self) -> String {
        let mut w = XmlWriter::document();
        w.open_root("OFD")
            .attr("Version", &self.version)
            .attr("DocType", &self.doc_type)
            .end_attrs();
        for body in &self.bodies {
            w.open("DocBody").end_attrs();
            body.info.write_xml(&mut w);
            w.text_element("DocRoot", &body.doc_root)
                .text_element_opt("Signatures", body.signatures.as_deref());
            w.close("DocBody");
        }
        w.close("OFD");
        w.into_string()
    }

    pub fn from_xml(bytes: &[u8]) -> Result<Self> {
        let root = XmlElement::parse(bytes)?;
        if root.name() != "OFD" {
            return Err(Error::InvalidFormat(format!(
                "root descriptor has root element '{}'",
                root.name()
            )));
        }
        let mut bodies = Vec::new();
        for body in root.children_named("DocBody") {
            let info = match body.child("DocInfo") {
                Some(el) => DocInfo::from_xml(el)?,
                None => DocInfo::default(),
            };
            let doc_root = body
                .child_text("DocRoot")
                .ok_or_else(|| Error::missing_element("DocBody", "DocRoot"))?;
            bodies.push(DocBody {
                info,
                doc_root: doc_root.to_owned(),
                signatures: body.child_text("Signatures").map(str::to_owned),
            });
        }
        if bodies.is_empty() {
            return Err(Error::missing_element("OFD", "DocBody"));
        }
        Ok(Self {
            version: root.required_attr("Version")?.to_owned(),
            doc_type: root.attr("DocType").unwrap_or(DEFAULT_DOC_TYPE).to_owned(),
            bodies,
        })
    }
}
