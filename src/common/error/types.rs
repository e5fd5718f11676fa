//! Error taxonomy for container, XML, reference and I/O failures.
use crate::common::id::Id;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of shared resource an object refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Font,
    ColorSpace,
    Image,
    Media,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Font => "font",
            ResourceKind::ColorSpace => "color space",
            ResourceKind::Image => "image",
            ResourceKind::Media => "multimedia",
        };
        f.write_str(name)
    }
}

/// Main error type for OFD operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML syntax error
    #[error("XML error: {0}")]
    XmlError(String),

    /// A member required by the container layout is absent
    #[error("Container member not found: {path}")]
    MissingMember { path: String },

    /// A required attribute is absent from an element
    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    /// A required child element is absent
    #[error("Missing element <{element}> in <{parent}>")]
    MissingElement { parent: String, element: String },

    /// An attribute or element value could not be decoded
    #[error("Invalid value '{value}' for {attribute} on <{element}>")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
    },

    /// Malformed path data string
    #[error("Invalid path data: {0}")]
    PathData(String),

    /// An object refers to a resource id no reachable registry declares
    #[error("Object {object} on page {page} refers to unknown {kind} {id}")]
    DanglingReference {
        page: usize,
        object: Id,
        kind: ResourceKind,
        id: Id,
    },

    /// Save target already exists
    #[error("Destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Document, page or resource not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        Error::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn missing_element(parent: &str, element: &str) -> Self {
        Error::MissingElement {
            parent: parent.to_string(),
            element: element.to_string(),
        }
    }

    pub(crate) fn invalid_value(element: &str, attribute: &str, value: &str) -> Self {
        Error::InvalidValue {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type for OFD operations.
pub type Result<T> = std::result::Result<T, Error>;
