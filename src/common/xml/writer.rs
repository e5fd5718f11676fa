//! XML generation with default suppression.
//!
//! Members are generated as compact UTF-8 text. Every element of the format
//! lives in the `ofd` namespace; the writer adds the prefix so callers pass
//! bare tag names.

use super::escape::escape_xml;
use crate::common::id::Id;
use crate::common::number::{write_fixed, write_number, write_number_list};
use crate::geometry::Boundary;

/// Namespace URI of every element of the format.
pub const OFD_NAMESPACE: &str = "http://www.ofdspec.org/2016";

const PREFIX: &str = "ofd:";

/// Tolerance used when comparing floating-point values against defaults.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Buffer-backed XML writer.
#[derive(Debug, Default)]
pub struct XmlWriter {
    buf: String,
}

impl XmlWriter {
    /// Start a complete document with an XML declaration.
    pub fn document() -> Self {
        let mut buf = String::with_capacity(1024);
        buf.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        Self { buf }
    }

    /// Start a fragment without declaration.
    pub fn fragment() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Open a start tag: `<ofd:Tag`.
    pub fn open(&mut self, tag: &str) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(PREFIX);
        self.buf.push_str(tag);
        self
    }

    /// Open the root start tag and declare the namespace.
    pub fn open_root(&mut self, tag: &str) -> &mut Self {
        self.open(tag);
        self.attr("xmlns:ofd", OFD_NAMESPACE)
    }

    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        self.buf.push_str(&escape_xml(value));
        self.buf.push('"');
        self
    }

    /// Attribute written only when `value` is non-empty.
    pub fn attr_str_opt(&mut self, name: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.attr(name, value);
        }
        self
    }

    pub fn attr_num(&mut self, name: &str, value: f64) -> &mut Self {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        write_number(&mut self.buf, value);
        self.buf.push('"');
        self
    }

    /// Numeric attribute suppressed when equal (within epsilon) to `default`.
    pub fn attr_num_default(&mut self, name: &str, value: f64, default: f64) -> &mut Self {
        if (value - default).abs() > DEFAULT_EPSILON {
            self.attr_num(name, value);
        }
        self
    }

    pub fn attr_numbers(&mut self, name: &str, values: &[f64]) -> &mut Self {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        write_number_list(&mut self.buf, values);
        self.buf.push('"');
        self
    }

    pub fn attr_u32(&mut self, name: &str, value: u32) -> &mut Self {
        let mut buf = itoa::Buffer::new();
        let formatted = buf.format(value);
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        self.buf.push_str(formatted);
        self.buf.push('"');
        self
    }

    pub fn attr_id(&mut self, name: &str, id: Id) -> &mut Self {
        self.attr_u32(name, id.get())
    }

    /// Reference id written only when set.
    pub fn attr_id_opt(&mut self, name: &str, id: Option<Id>) -> &mut Self {
        if let Some(id) = id.filter(|id| id.is_set()) {
            self.attr_id(name, id);
        }
        self
    }

    /// Boolean attribute suppressed when equal to `default`.
    pub fn attr_bool_default(&mut self, name: &str, value: bool, default: bool) -> &mut Self {
        if value != default {
            self.attr(name, if value { "true" } else { "false" });
        }
        self
    }

    /// Box attribute in `x y w h` form with three decimal digits.
    pub fn attr_box(&mut self, name: &str, boundary: &Boundary) -> &mut Self {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        write_box(&mut self.buf, boundary);
        self.buf.push('"');
        self
    }

    /// Finish a start tag that will have content.
    pub fn end_attrs(&mut self) -> &mut Self {
        self.buf.push('>');
        self
    }

    /// Finish a start tag as an empty element.
    pub fn close_empty(&mut self) -> &mut Self {
        self.buf.push_str("/>");
        self
    }

    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(PREFIX);
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape_xml(text));
        self
    }

    /// `<ofd:Tag>text</ofd:Tag>`
    pub fn text_element(&mut self, tag: &str, text: &str) -> &mut Self {
        self.open(tag).end_attrs().text(text).close(tag)
    }

    /// Text element written only when `text` is non-empty.
    pub fn text_element_opt(&mut self, tag: &str, text: Option<&str>) -> &mut Self {
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            self.text_element(tag, text);
        }
        self
    }

    /// `<ofd:Tag>x y w h</ofd:Tag>`
    pub fn box_element(&mut self, tag: &str, boundary: &Boundary) -> &mut Self {
        self.open(tag).end_attrs();
        write_box(&mut self.buf, boundary);
        self.close(tag)
    }

    /// Append an already generated fragment.
    pub fn append(&mut self, fragment: XmlWriter) -> &mut Self {
        self.buf.push_str(&fragment.buf);
        self
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

fn write_box(out: &mut String, boundary: &Boundary) {
    write_fixed(out, boundary.xmin());
    out.push(' ');
    write_fixed(out, boundary.ymin());
    out.push(' ');
    write_fixed(out, boundary.width());
    out.push(' ');
    write_fixed(out, boundary.height());
}
