//! Documents: page lists, common data and document-level resources.

mod info;

pub use info::DocInfo;

use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, IdAllocator, Result};
use crate::package::container::{join, parent, Container};
use crate::page::{Page, PageArea};
use crate::resource::{LoadReport, ResourceLevel, ResourceLookup, ResourceRegistry};
use std::rc::Rc;
use tracing::debug;

/// Document-wide settings (CT_CommonData).
#[derive(Debug, Clone)]
pub struct CommonData {
    ids: IdAllocator,
    /// Area of pages that do not declare their own.
    pub page_area: PageArea,
    /// Colour space that id 0 refers to; unset means built-in RGB.
    pub default_cs: Id,
    public_res: ResourceRegistry,
    document_res: ResourceRegistry,
}

impl PartialEq for CommonData {
    fn eq(&self, other: &Self) -> bool {
        self.max_unit_id() == other.max_unit_id()
            && self.page_area == other.page_area
            && self.default_cs == other.default_cs
            && self.public_res == other.public_res
            && self.document_res == other.document_res
    }
}

impl CommonData {
    fn new(ids: IdAllocator) -> Self {
        Self {
            page_area: PageArea::default(),
            default_cs: Id::UNSET,
            public_res: ResourceRegistry::new(ResourceLevel::Public, ids.clone()),
            document_res: ResourceRegistry::new(ResourceLevel::Document, ids.clone()),
            ids,
        }
    }

    /// Largest id issued in the document.
    pub fn max_unit_id(&self) -> u32 {
        self.ids.max_unit_id()
    }

    /// Raise MaxUnitID after allocating ids outside of the object API.
    pub fn reserve_id(&self, id: Id) {
        self.ids.observe(id);
    }

    /// The shared id counter.
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn public_res(&self) -> &ResourceRegistry {
        &self.public_res
    }

    pub fn public_res_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.public_res
    }

    pub fn document_res(&self) -> &ResourceRegistry {
        &self.document_res
    }

    pub fn document_res_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.document_res
    }

    /// Lookup over the public and document registries.
    pub fn lookup(&self) -> ResourceLookup<'_> {
        ResourceLookup::new(&self.public_res, &self.document_res, self.default_cs)
    }
}

/// Opaque signature members carried over from an opened package.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Signatures {
    /// Path of the signature list, relative to the signature directory.
    pub list: String,
    /// Members below the signature directory, by relative path.
    pub members: Vec<(String, Vec<u8>)>,
}

/// One logical document.
#[derive(Debug, Clone)]
pub struct Document {
    doc_root: String,
    info: DocInfo,
    common_data: CommonData,
    pages: Vec<Page>,
    signatures: Option<Signatures>,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info && self.common_data == other.common_data && self.pages == other.pages
    }
}

impl Document {
    pub(crate) fn new(doc_root: String) -> Self {
        Self {
            doc_root,
            info: DocInfo::default(),
            common_data: CommonData::new(IdAllocator::new()),
            pages: Vec::new(),
            signatures: None,
        }
    }

    /// Directory of the document inside the container, e.g. `Doc_0`.
    pub fn doc_root(&self) -> &str {
        &self.doc_root
    }

    pub fn info(&self) -> &DocInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut DocInfo {
        &mut self.info
    }

    pub(crate) fn set_info(&mut self, info: DocInfo) {
        self.info = info;
    }

    pub fn common_data(&self) -> &CommonData {
        &self.common_data
    }

    pub fn common_data_mut(&mut self) -> &mut CommonData {
        &mut self.common_data
    }

    /// Append a new, empty page with a fresh id.
    pub fn add_new_page(&mut self) -> &mut Page {
        let ids = self.common_data.ids.clone();
        let index = self.pages.len();
        self.pages.push(Page::new(ids.next_id(), ids));
        &mut self.pages[index]
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page by index, as is. It may still be unloaded.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Page by index, parsed on first access.
    pub fn open_page(&mut self, index: usize) -> Result<&mut Page> {
        let Self {
            pages, common_data, ..
        } = self;
        let page = pages
            .get_mut(index)
            .ok_or_else(|| Error::ComponentNotFound(format!("page {index}")))?;
        page.open(&common_data.lookup())?;
        Ok(page)
    }

    /// Parse every page that is not loaded yet.
    pub fn open_all_pages(&mut self) -> Result<()> {
        let lookup = self.common_data.lookup();
        for page in &mut self.pages {
            page.open(&lookup)?;
        }
        Ok(())
    }

    /// Resource lookup as seen from the page at `index`.
    pub fn lookup_for_page(&self, index: usize) -> Option<ResourceLookup<'_>> {
        let page = self.pages.get(index)?;
        Some(self.common_data.lookup().with_page(page.resources()))
    }

    /// Load font and multimedia bytes of every registry of the document,
    /// pages included.
    pub fn load_resources(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        let cd = &mut self.common_data;
        for registry in [&mut cd.public_res, &mut cd.document_res] {
            report.merge(registry.load_fonts());
            report.merge(registry.load_images());
        }
        for page in &mut self.pages {
            report.merge(page.resources_mut().load_fonts());
            report.merge(page.resources_mut().load_images());
        }
        report
    }

    /// Every font, image, multimedia or colour-space reference of the loaded
    /// pages that no visible registry declares.
    pub fn check_references(&self) -> Vec<Error> {
        let lookup = self.common_data.lookup();
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, page)| page.is_open())
            .flat_map(|(index, page)| page.dangling_references(index, &lookup))
            .collect()
    }

    pub(crate) fn signatures(&self) -> Option<&Signatures> {
        self.signatures.as_ref()
    }

    pub(crate) fn set_doc_root(&mut self, doc_root: String) {
        self.doc_root = doc_root;
    }

    pub(crate) fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    /// Generate `Document.xml`. `page_base_loc` maps a page index to its
    /// directory relative to the document root.
    pub(crate) fn to_document_xml(&self, page_base_loc: impl Fn(usize) -> String) -> String {
        let cd = &self.common_data;
        let mut w = XmlWriter::document();
        w.open_root("Document").end_attrs();
        w.open("CommonData").end_attrs();
        w.text_element("MaxUnitID", &cd.max_unit_id().to_string());
        cd.page_area.write_xml(&mut w, "PageArea");
        w.text_element("PublicRes", cd.public_res.descriptor_name())
            .text_element("DocumentRes", cd.document_res.descriptor_name());
        if cd.default_cs.is_set() {
            w.text_element("DefaultCS", &cd.default_cs.to_string());
        }
        w.close("CommonData");
        w.open("Pages").end_attrs();
        for (index, page) in self.pages.iter().enumerate() {
            w.open("Page")
                .attr_id("ID", page.id())
                .attr("BaseLoc", &page_base_loc(index))
                .close_empty();
        }
        w.close("Pages").close("Document");
        w.into_string()
    }

    /// Read a document whose `Document.xml` lives at `document_path`.
    pub(crate) fn from_container(container: &Rc<Container>, document_path: &str) -> Result<Self> {
        let doc_root = parent(document_path).to_owned();
        let root = XmlElement::parse(&container.read(document_path)?)?;
        if root.name() != "Document" {
            return Err(Error::InvalidFormat(format!(
                "{document_path} has root element '{}'",
                root.name()
            )));
        }
        let common = root.required_child("CommonData")?;
        let max_unit_id = match common.child("MaxUnitID") {
            Some(el) => el.text_id()?.get(),
            None => return Err(Error::missing_element("CommonData", "MaxUnitID")),
        };
        let ids = IdAllocator::starting_at(max_unit_id);

        let read_registry = |tag: &str, level: ResourceLevel| -> Result<ResourceRegistry> {
            let Some(el) = common.child(tag) else {
                return Ok(ResourceRegistry::new(level, ids.clone()));
            };
            let path = join(&doc_root, el.trimmed_text());
            ResourceRegistry::from_xml(
                &container.read(&path)?,
                level,
                parent(&path),
                ids.clone(),
                Some(container.clone()),
            )
        };

        let page_area = match common.child("PageArea") {
            Some(el) => PageArea::from_xml(el)?,
            None => return Err(Error::missing_element("CommonData", "PageArea")),
        };
        let default_cs = match common.child("DefaultCS") {
            Some(el) => el.text_id()?,
            None => Id::UNSET,
        };
        let common_data = CommonData {
            page_area,
            default_cs,
            public_res: read_registry("PublicRes", ResourceLevel::Public)?,
            document_res: read_registry("DocumentRes", ResourceLevel::Document)?,
            ids: ids.clone(),
        };

        let mut pages = Vec::new();
        if let Some(list) = root.child("Pages") {
            for el in list.children_named("Page") {
                let id = el.required_id("ID")?;
                ids.observe(id);
                let base_loc = el.required_attr("BaseLoc")?;
                let content_path = if base_loc.ends_with(".xml") {
                    join(&doc_root, base_loc)
                } else {
                    join(&join(&doc_root, base_loc), "Content.xml")
                };
                pages.push(Page::unloaded(id, ids.clone(), container.clone(), content_path));
            }
        }
        debug!(doc_root = %doc_root, pages = pages.len(), max_unit_id, "read document");

        Ok(Self {
            doc_root,
            info: DocInfo::default(),
            common_data,
            pages,
            signatures: None,
        })
    }

    /// Keep the signature members found below the directory of
    /// `signatures_path` for re-emission on save. A list at the archive
    /// root shares its directory with everything else, so only the list
    /// itself is kept.
    pub(crate) fn capture_signatures(&mut self, container: &Container, signatures_path: &str) -> Result<()> {
        let dir = parent(signatures_path);
        let prefix_len = if dir.is_empty() { 0 } else { dir.len() + 1 };
        if !container.contains(signatures_path) {
            return Err(Error::MissingMember {
                path: signatures_path.to_owned(),
            });
        }
        let names = if dir.is_empty() {
            vec![signatures_path.to_owned()]
        } else {
            container.members_under(dir)
        };
        let mut members = Vec::new();
        for name in names {
            let bytes = container.read(&name)?;
            members.push((name[prefix_len..].to_owned(), bytes));
        }
        self.signatures = Some(Signatures {
            list: signatures_path[prefix_len..].to_owned(),
            members,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Path, Point};
    use crate::object::PathObject;
    use crate::page::LayerKind;
    use crate::resource::Font;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_page_and_object_ids_share_counter() {
        let mut doc = Document::new("Doc_0".into());
        let font = doc.common_data_mut().document_res_mut().add_font(Font::new("SimSun"));
        let page_id = doc.add_new_page().id();
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0)).line_to(Point::new(1.0, 1.0));
        let obj = doc.pages[0]
            .add_new_layer(LayerKind::Body)
            .add_object(PathObject::new(path));
        assert_eq!((font, page_id, obj), (Id::new(1), Id::new(2), Id::new(3)));
        assert_eq!(doc.common_data().max_unit_id(), 3);
    }

    #[test]
    fn test_document_xml() {
        let mut doc = Document::new("Doc_0".into());
        doc.add_new_page();
        let xml = doc.to_document_xml(|k| format!("Pages/Page_{k}"));
        assert!(xml.contains("<ofd:MaxUnitID>1</ofd:MaxUnitID>"));
        assert!(xml.contains("<ofd:PublicRes>PublicRes.xml</ofd:PublicRes>"));
        assert!(xml.contains(r#"<ofd:Page ID="1" BaseLoc="Pages/Page_0"/>"#));
        assert!(!xml.contains("DefaultCS"));
    }

    #[test]
    fn test_open_page_out_of_range() {
        let mut doc = Document::new("Doc_0".into());
        assert!(matches!(doc.open_page(0), Err(Error::ComponentNotFound(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_ids_unique_across_layers(layout in prop::collection::vec(prop::collection::vec(0usize..4, 1..4), 1..4)) {
            let mut doc = Document::new("Doc_0".into());
            let mut issued = Vec::new();
            for layers in &layout {
                let page = doc.add_new_page();
                issued.push(page.id().get());
                for count in layers {
                    let layer = page.add_new_layer(LayerKind::Body);
                    for i in 0..*count {
                        let mut path = Path::new();
                        path.move_to(Point::new(i as f64, 0.0)).line_to(Point::new(1.0, 1.0));
                        issued.push(layer.add_object(PathObject::new(path)).get());
                    }
                }
            }
            let unique: HashSet<_> = issued.iter().copied().collect();
            prop_assert_eq!(unique.len(), issued.len());
            let max = issued.iter().copied().max().unwrap_or(0);
            prop_assert!(doc.common_data().max_unit_id() >= max);
        }
    }
}
