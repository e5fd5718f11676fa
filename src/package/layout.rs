//! Fixed member layout of a written container.
//!
//! ```text
//! OFD.xml
//! Doc_<n>/Document.xml
//! Doc_<n>/PublicRes.xml
//! Doc_<n>/DocumentRes.xml
//! Doc_<n>/Pages/Page_<k>/Content.xml
//! Doc_<n>/Pages/Page_<k>/PageRes.xml
//! Doc_<n>/Pages/Page_<k>/Res/...
//! Doc_<n>/Res/Font_<id>.<ext>
//! Doc_<n>/Res/Image_<id>.<ext>
//! Doc_<n>/Signs/...
//! ```

pub const ROOT_DESCRIPTOR: &str = "OFD.xml";
pub const DOCUMENT_XML: &str = "Document.xml";
pub const CONTENT_XML: &str = "Content.xml";
pub const SIGNATURES_XML: &str = "Signatures.xml";

pub fn doc_root(doc: usize) -> String {
    format!("Doc_{doc}")
}

pub fn document_xml(doc: usize) -> String {
    format!("Doc_{doc}/{DOCUMENT_XML}")
}

/// Page directory relative to the document root; the `BaseLoc` of a page.
pub fn page_base_loc(page: usize) -> String {
    format!("Pages/Page_{page}")
}

pub fn pages_dir(doc: usize) -> String {
    format!("Doc_{doc}/Pages")
}

pub fn page_dir(doc: usize, page: usize) -> String {
    format!("Doc_{doc}/Pages/Page_{page}")
}

pub fn signs_dir(doc: usize) -> String {
    format!("Doc_{doc}/Signs")
}

/// Directory holding the resource files of the registry at `dir`.
pub fn res_dir(dir: &str) -> String {
    format!("{dir}/{}", crate::resource::DEFAULT_BASE_LOC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        assert_eq!(document_xml(0), "Doc_0/Document.xml");
        assert_eq!(page_dir(1, 2), "Doc_1/Pages/Page_2");
        assert_eq!(format!("{}/{}", doc_root(1), page_base_loc(2)), page_dir(1, 2));
        assert_eq!(res_dir(&doc_root(0)), "Doc_0/Res");
    }
}
