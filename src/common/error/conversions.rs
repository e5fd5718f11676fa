//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from the
//! error types of the XML and ZIP crates to the unified Error type.

use super::types::Error;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipError(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::InvalidFormat(format!("Invalid UTF-8: {}", err))
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_error_conversion() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::ZipError(_)));
    }

    #[test]
    fn test_structured_messages() {
        let err = Error::missing_attribute("TextObject", "Font");
        assert_eq!(err.to_string(), "Missing attribute 'Font' on <TextObject>");

        let err = Error::invalid_value("PathObject", "Rule", "Winding");
        assert_eq!(
            err.to_string(),
            "Invalid value 'Winding' for Rule on <PathObject>"
        );
    }
}
