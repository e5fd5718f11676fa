//! Pages and their content.
//!
//! A page read from a container starts out unloaded: it remembers where its
//! `Content.xml` lives and parses it on [`Page::open`]. Pages created
//! through the API start loaded.

mod area;
mod layer;

pub use area::PageArea;
pub use layer::{Layer, LayerKind};

use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, IdAllocator, ResourceKind, Result};
use crate::object::{Object, ParseContext};
use crate::package::container::{join, parent, Container};
use crate::resource::{ResourceLevel, ResourceLookup, ResourceRegistry};
use std::rc::Rc;
use tracing::debug;

/// Where an unloaded page reads its content from.
#[derive(Debug, Clone)]
pub(crate) struct PageSource {
    container: Rc<Container>,
    content_path: String,
}

#[derive(Debug, Clone)]
enum PageState {
    Loaded,
    Unloaded(PageSource),
}

/// One page.
#[derive(Debug, Clone)]
pub struct Page {
    id: Id,
    area: Option<PageArea>,
    layers: Vec<Layer>,
    resources: ResourceRegistry,
    ids: IdAllocator,
    state: PageState,
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.area == other.area
            && self.layers == other.layers
            && self.resources == other.resources
    }
}

impl Page {
    pub(crate) fn new(id: Id, ids: IdAllocator) -> Self {
        Self {
            id,
            area: None,
            layers: Vec::new(),
            resources: ResourceRegistry::new(ResourceLevel::Page, ids.clone()),
            ids,
            state: PageState::Loaded,
        }
    }

    pub(crate) fn unloaded(id: Id, ids: IdAllocator, container: Rc<Container>, content_path: String) -> Self {
        Self {
            state: PageState::Unloaded(PageSource {
                container,
                content_path,
            }),
            ..Self::new(id, ids)
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PageState::Loaded)
    }

    /// Page-specific area; `None` means the document default applies.
    pub fn area(&self) -> Option<&PageArea> {
        self.area.as_ref()
    }

    pub fn set_area(&mut self, area: PageArea) {
        self.area = Some(area);
    }

    /// Append a layer. Its id is the number of layers before it, so the
    /// first layer has id 0 and is the body layer.
    pub fn add_new_layer(&mut self, kind: LayerKind) -> &mut Layer {
        let id = Id::new(self.layers.len() as u32);
        let index = self.layers.len();
        self.layers.push(Layer::new(id, kind, self.ids.clone()));
        &mut self.layers[index]
    }

    /// The first layer.
    pub fn body_layer(&self) -> Option<&Layer> {
        self.layers.first()
    }

    pub fn body_layer_mut(&mut self) -> Option<&mut Layer> {
        self.layers.first_mut()
    }

    /// The first layer, created as a Body layer when the page has none.
    pub fn ensure_body_layer(&mut self) -> &mut Layer {
        if self.layers.is_empty() {
            self.add_new_layer(LayerKind::Body);
        }
        &mut self.layers[0]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.resources
    }

    /// Every object of every layer, composites expanded, in drawing order.
    pub fn objects(&self) -> Vec<&Object> {
        let mut out = Vec::new();
        for layer in &self.layers {
            for object in layer.objects() {
                object.walk(&mut |o| out.push(o));
            }
        }
        out
    }

    /// Parse the page content if it has not been parsed yet. On failure the
    /// page stays unloaded and may be opened again.
    pub fn open(&mut self, lookup: &ResourceLookup<'_>) -> Result<()> {
        let PageState::Unloaded(source) = &self.state else {
            return Ok(());
        };
        let bytes = source.container.read(&source.content_path)?;
        let page_dir = parent(&source.content_path).to_owned();
        let (area, layers, resources) =
            self.parse_content(&bytes, &page_dir, lookup, Some(source.container.clone()))?;
        debug!(page = %self.id, layers = layers.len(), "opened page");
        self.area = area;
        self.layers = layers;
        self.resources = resources;
        self.state = PageState::Loaded;
        Ok(())
    }

    fn parse_content(
        &self,
        bytes: &[u8],
        page_dir: &str,
        lookup: &ResourceLookup<'_>,
        container: Option<Rc<Container>>,
    ) -> Result<(Option<PageArea>, Vec<Layer>, ResourceRegistry)> {
        let root = XmlElement::parse(bytes)?;
        if root.name() != "Page" {
            return Err(Error::InvalidFormat(format!(
                "page content has root element '{}'",
                root.name()
            )));
        }

        let mut resources = ResourceRegistry::new(ResourceLevel::Page, self.ids.clone());
        for res in root.children_named("PageRes") {
            let Some(container) = &container else {
                break;
            };
            let path = join(page_dir, res.trimmed_text());
            let res_bytes = container.read(&path)?;
            resources = ResourceRegistry::from_xml(
                &res_bytes,
                ResourceLevel::Page,
                parent(&path),
                self.ids.clone(),
                Some(container.clone()),
            )?;
        }

        let area = root.child("Area").map(PageArea::from_xml).transpose()?;

        let ctx = ParseContext {
            lookup: lookup.with_page(&resources),
            ids: &self.ids,
        };
        let mut layers = Vec::new();
        if let Some(content) = root.child("Content") {
            for el in content.children_named("Layer") {
                layers.push(Layer::from_xml(el, &ctx)?);
            }
        }
        Ok((area, layers, resources))
    }

    /// Generate `Content.xml`. `with_page_res` adds the PageRes reference.
    pub(crate) fn to_content_xml(&self, with_page_res: bool) -> String {
        let mut w = XmlWriter::document();
        w.open_root("Page").end_attrs();
        if with_page_res {
            w.text_element("PageRes", self.resources.descriptor_name());
        }
        if let Some(area) = &self.area {
            area.write_xml(&mut w, "Area");
        }
        w.open("Content").end_attrs();
        for layer in &self.layers {
            layer.write_xml(&mut w);
        }
        w.close("Content").close("Page");
        w.into_string()
    }

    /// Resource references that resolve through none of the registries
    /// visible from this page.
    pub(crate) fn dangling_references(&self, page_index: usize, lookup: &ResourceLookup<'_>) -> Vec<Error> {
        let lookup = lookup.with_page(&self.resources);
        let mut out = Vec::new();
        for object in self.objects() {
            for (kind, id) in object.references() {
                let found = match kind {
                    ResourceKind::Font => lookup.font(id).is_some(),
                    ResourceKind::ColorSpace => lookup.color_space(id).is_some(),
                    ResourceKind::Image => lookup.image(id).is_some(),
                    ResourceKind::Media => lookup.media(id).is_some(),
                };
                if !found {
                    out.push(Error::DanglingReference {
                        page: page_index,
                        object: object.id,
                        kind,
                        id,
                    });
                }
            }
        }
        out
    }
}
