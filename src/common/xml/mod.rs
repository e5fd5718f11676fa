//! XML helpers shared by every container member: escaping, an element tree
//! for parsing and a writer for generation.

mod element;
mod escape;
mod writer;

pub use element::XmlElement;
pub use escape::{escape_xml, unescape_xml};
pub use writer::{DEFAULT_EPSILON, OFD_NAMESPACE, XmlWriter};
