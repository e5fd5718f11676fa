//! Document metadata (CT_DocInfo), stored in the root descriptor.

use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Descriptive metadata of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocInfo {
    /// Globally unique document identifier
    pub doc_id: Option<String>,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Summary text
    pub abstract_text: Option<String>,
    /// Creation date
    pub creation_date: Option<NaiveDate>,
    /// Last modification date
    pub mod_date: Option<NaiveDate>,
    /// Usage category, e.g. `Normal` or `EBook`
    pub doc_usage: Option<String>,
    /// Cover image location
    pub cover: Option<String>,
    /// Keywords
    pub keywords: Vec<String>,
    /// Producing application
    pub creator: Option<String>,
    /// Producing application version
    pub creator_version: Option<String>,
    /// User-defined name/value pairs
    pub custom_data: Vec<(String, String)>,
}

impl DocInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn write_xml(&self, w: &mut XmlWriter) {
        w.open("DocInfo").end_attrs();
        w.text_element_opt("DocID", self.doc_id.as_deref())
            .text_element_opt("Title", self.title.as_deref())
            .text_element_opt("Author", self.author.as_deref())
            .text_element_opt("Subject", self.subject.as_deref())
            .text_element_opt("Abstract", self.abstract_text.as_deref());
        for (tag, date) in [("CreationDate", self.creation_date), ("ModDate", self.mod_date)] {
            if let Some(date) = date {
                w.text_element(tag, &date.format(DATE_FORMAT).to_string());
            }
        }
        w.text_element_opt("DocUsage", self.doc_usage.as_deref())
            .text_element_opt("Cover", self.cover.as_deref());
        if !self.keywords.is_empty() {
            w.open("Keywords").end_attrs();
            for keyword in &self.keywords {
                w.text_element("Keyword", keyword);
            }
            w.close("Keywords");
        }
        w.text_element_opt("Creator", self.creator.as_deref())
            .text_element_opt("CreatorVersion", self.creator_version.as_deref());
        if !self.custom_data.is_empty() {
            w.open("CustomDatas").end_attrs();
            for (name, value) in &self.custom_data {
                w.open("CustomData")
                    .attr("Name", name)
                    .end_attrs()
                    .text(value)
                    .close("CustomData");
            }
            w.close("CustomDatas");
        }
        w.close("DocInfo");
    }

    pub(crate) fn from_xml(el: &XmlElement) -> Result<Self> {
        let text = |name: &str| el.child_text(name).map(str::to_owned);
        let date = |name: &str| -> Result<Option<NaiveDate>> {
            match el.child_text(name) {
                None => Ok(None),
                Some(v) => parse_date(v)
                    .map(Some)
                    .ok_or_else(|| Error::invalid_value(name, "text()", v)),
            }
        };
        let keywords = el
            .child("Keywords")
            .map(|k| {
                k.children_named("Keyword")
                    .map(|kw| kw.trimmed_text().to_owned())
                    .filter(|kw| !kw.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let custom_data = match el.child("CustomDatas") {
            None => Vec::new(),
            Some(c) => c
                .children_named("CustomData")
                .map(|d| Ok((d.required_attr("Name")?.to_owned(), d.text().to_owned())))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(Self {
            doc_id: text("DocID"),
            title: text("Title"),
            author: text("Author"),
            subject: text("Subject"),
            abstract_text: text("Abstract"),
            creation_date: date("CreationDate")?,
            mod_date: date("ModDate")?,
            doc_usage: text("DocUsage"),
            cover: text("Cover"),
            keywords,
            creator: text("Creator"),
            creator_version: text("CreatorVersion"),
            custom_data,
        })
    }
}

/// Accept `xs:date` and a leading date of an `xs:dateTime`.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| text.get(..10).and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok()))
}
