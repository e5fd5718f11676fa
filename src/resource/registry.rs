//! Scoped resource registries and their descriptor files.

use super::{Font, FontLocation, MultiMedia};
use crate::color::ColorSpace;
use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, IdAllocator, Result};
use crate::package::container::{join, Container, ContainerWriter};
use std::collections::BTreeMap;
use std::io::{Seek, Write};
use std::rc::Rc;
use tracing::{debug, warn};

/// Scope that declares a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceLevel {
    Public,
    Document,
    Page,
}

impl ResourceLevel {
    /// Name of the descriptor file at this scope.
    pub fn descriptor_name(self) -> &'static str {
        match self {
            ResourceLevel::Public => "PublicRes.xml",
            ResourceLevel::Document => "DocumentRes.xml",
            ResourceLevel::Page => "PageRes.xml",
        }
    }
}

/// Default BaseLoc of every registry written by this crate.
pub const DEFAULT_BASE_LOC: &str = "Res";

/// Outcome of a batch load. Failures are per item.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<Id>,
    pub failed: Vec<(Id, Error)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub(crate) fn merge(&mut self, other: LoadReport) {
        self.loaded.extend(other.loaded);
        self.failed.extend(other.failed);
    }
}

/// Fonts, colour spaces and multimedia declared at one scope.
///
/// Ids are drawn from the owning document's counter, so a resource id never
/// collides with a page or object id.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    level: ResourceLevel,
    /// Container directory holding the descriptor file.
    dir: String,
    base_loc: String,
    ids: IdAllocator,
    color_spaces: Vec<ColorSpace>,
    fonts: BTreeMap<Id, Font>,
    media: BTreeMap<Id, MultiMedia>,
    container: Option<Rc<Container>>,
}

impl PartialEq for ResourceRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level
            && self.color_spaces == other.color_spaces
            && self.fonts == other.fonts
            && self.media == other.media
    }
}

impl ResourceRegistry {
    pub fn new(level: ResourceLevel, ids: IdAllocator) -> Self {
        Self {
            level,
            dir: String::new(),
            base_loc: DEFAULT_BASE_LOC.to_owned(),
            ids,
            color_spaces: Vec::new(),
            fonts: BTreeMap::new(),
            media: BTreeMap::new(),
            container: None,
        }
    }

    pub fn level(&self) -> ResourceLevel {
        self.level
    }

    pub fn descriptor_name(&self) -> &'static str {
        self.level.descriptor_name()
    }

    pub fn base_loc(&self) -> &str {
        &self.base_loc
    }

    /// Container directory the registry was read from, empty for new ones.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn is_empty(&self) -> bool {
        self.color_spaces.is_empty() && self.fonts.is_empty() && self.media.is_empty()
    }

    fn claim_id(&self, id: Id) -> Id {
        if id.is_set() {
            self.ids.observe(id);
            id
        } else {
            self.ids.next_id()
        }
    }

    /// Insert a font, replacing any font with the same id. An unset id is
    /// allocated. Embedded fonts get the file name `Font_<id>.<ext>`.
    pub fn add_font(&mut self, mut font: Font) -> Id {
        font.id = self.claim_id(font.id);
        font.normalize();
        if font.location == FontLocation::Embedded {
            font.font_file = Some(font.default_file_name());
        }
        let id = font.id;
        self.fonts.insert(id, font);
        id
    }

    /// Insert a colour space, replacing any with the same id.
    pub fn add_color_space(&mut self, mut color_space: ColorSpace) -> Id {
        color_space.id = self.claim_id(color_space.id);
        let id = color_space.id;
        match self.color_spaces.iter_mut().find(|cs| cs.id == id) {
            Some(slot) => *slot = color_space,
            None => self.color_spaces.push(color_space),
        }
        id
    }

    /// Insert a multimedia resource; images get `Image_<id>.<ext>`.
    pub fn add_media(&mut self, mut media: MultiMedia) -> Id {
        media.id = self.claim_id(media.id);
        media.media_file = media.default_file_name();
        let id = media.id;
        self.media.insert(id, media);
        id
    }

    pub fn add_image(&mut self, image: MultiMedia) -> Id {
        self.add_media(image)
    }

    /// Font declared in this registry. Other scopes are not consulted.
    pub fn font(&self, id: Id) -> Option<&Font> {
        self.fonts.get(&id)
    }

    pub fn font_mut(&mut self, id: Id) -> Option<&mut Font> {
        self.fonts.get_mut(&id)
    }

    pub fn fonts(&self) -> impl Iterator<Item = &Font> {
        self.fonts.values()
    }

    pub fn color_space(&self, id: Id) -> Option<&ColorSpace> {
        self.color_spaces.iter().find(|cs| cs.id == id)
    }

    pub fn color_spaces(&self) -> &[ColorSpace] {
        &self.color_spaces
    }

    pub fn media(&self, id: Id) -> Option<&MultiMedia> {
        self.media.get(&id)
    }

    pub fn media_mut(&mut self, id: Id) -> Option<&mut MultiMedia> {
        self.media.get_mut(&id)
    }

    pub fn medias(&self) -> impl Iterator<Item = &MultiMedia> {
        self.media.values()
    }

    /// Image resource; other multimedia types are not returned.
    pub fn image(&self, id: Id) -> Option<&MultiMedia> {
        self.media(id)
            .filter(|m| m.media_type == super::MediaType::Image)
    }

    /// Generate the descriptor file body.
    pub fn to_xml(&self) -> String {
        let mut w = XmlWriter::document();
        w.open_root("Res").attr("BaseLoc", &self.base_loc).end_attrs();
        if !self.color_spaces.is_empty() {
            w.open("ColorSpaces").end_attrs();
            for cs in &self.color_spaces {
                cs.write_xml(&mut w);
            }
            w.close("ColorSpaces");
        }
        if !self.fonts.is_empty() {
            w.open("Fonts").end_attrs();
            for font in self.fonts.values() {
                font.write_xml(&mut w);
            }
            w.close("Fonts");
        }
        if !self.media.is_empty() {
            w.open("MultiMedias").end_attrs();
            for media in self.media.values() {
                media.write_xml(&mut w);
            }
            w.close("MultiMedias");
        }
        w.close("Res");
        w.into_string()
    }

    /// Parse a descriptor file read from `dir` inside `container`.
    pub fn from_xml(
        bytes: &[u8],
        level: ResourceLevel,
        dir: &str,
        ids: IdAllocator,
        container: Option<Rc<Container>>,
    ) -> Result<Self> {
        let root = XmlElement::parse(bytes)?;
        if root.name() != "Res" {
            return Err(Error::InvalidFormat(format!(
                "{} has root element '{}'",
                level.descriptor_name(),
                root.name()
            )));
        }
        let mut registry = Self::new(level, ids);
        registry.dir = dir.to_owned();
        registry.container = container;
        if let Some(base) = root.attr("BaseLoc") {
            registry.base_loc = base.trim_end_matches('/').to_owned();
        }
        for section in root.children() {
            match section.name() {
                "ColorSpaces" => {
                    for el in section.children_named("ColorSpace") {
                        let cs = ColorSpace::from_xml(el)?;
                        registry.ids.observe(cs.id);
                        registry.color_spaces.push(cs);
                    }
                },
                "Fonts" => {
                    for el in section.children_named("Font") {
                        let font = Font::from_xml(el)?;
                        registry.ids.observe(font.id);
                        registry.fonts.insert(font.id, font);
                    }
                },
                "MultiMedias" => {
                    for el in section.children_named("MultiMedia") {
                        let media = MultiMedia::from_xml(el)?;
                        registry.ids.observe(media.id);
                        registry.media.insert(media.id, media);
                    }
                },
                other => debug!(section = other, "skipping resource section"),
            }
        }
        Ok(registry)
    }

    /// Container path of a resource file name.
    fn member_path(&self, file: &str) -> String {
        if file.starts_with('/') {
            join("", file)
        } else {
            join(&join(&self.dir, &self.base_loc), file)
        }
    }

    /// Load the bytes of every embedded font that is not loaded yet. A
    /// failing font stays unloaded and is reported.
    pub fn load_fonts(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        let Some(container) = self.container.clone() else {
            return report;
        };
        let pending: Vec<(Id, String)> = self
            .fonts
            .values()
            .filter(|f| f.location == FontLocation::Embedded && !f.is_loaded())
            .filter_map(|f| f.font_file.as_ref().map(|file| (f.id, self.member_path(file))))
            .collect();
        for (id, path) in pending {
            match container.read(&path) {
                Ok(bytes) => {
                    if let Some(font) = self.fonts.get_mut(&id) {
                        font.set_data(bytes);
                    }
                    report.loaded.push(id);
                },
                Err(e) => {
                    warn!(font = %id, path = %path, error = %e, "failed to load font");
                    report.failed.push((id, e));
                },
            }
        }
        report
    }

    /// Load the bytes of every multimedia resource that is not loaded yet.
    pub fn load_images(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        let Some(container) = self.container.clone() else {
            return report;
        };
        let pending: Vec<(Id, String)> = self
            .media
            .values()
            .filter(|m| !m.is_loaded())
            .map(|m| (m.id, self.member_path(&m.media_file)))
            .collect();
        for (id, path) in pending {
            match container.read(&path) {
                Ok(bytes) => {
                    if let Some(media) = self.media.get_mut(&id) {
                        media.set_data(bytes);
                    }
                    report.loaded.push(id);
                },
                Err(e) => {
                    warn!(media = %id, path = %path, error = %e, "failed to load multimedia");
                    report.failed.push((id, e));
                },
            }
        }
        report
    }

    /// Rename every resource whose bytes are in memory to its deterministic
    /// file name and rebase the registry onto `dir`. Resources without bytes
    /// keep their file name.
    pub(crate) fn relocate(&mut self, dir: &str) {
        for font in self.fonts.values_mut() {
            if font.location != FontLocation::Embedded {
                continue;
            }
            if font.is_loaded() {
                font.font_file = Some(font.default_file_name());
            } else {
                warn!(font = %font.id, "embedded font has no bytes, keeping its file name");
            }
        }
        for media in self.media.values_mut() {
            if media.is_loaded() {
                media.media_file = media.default_file_name();
            } else {
                warn!(media = %media.id, "multimedia resource has no bytes, keeping its file name");
            }
        }
        self.dir = dir.to_owned();
        self.base_loc = DEFAULT_BASE_LOC.to_owned();
    }

    /// Write the bytes of every loaded resource below `<dir>/<BaseLoc>/`.
    pub(crate) fn write_payloads<W: Write + Seek>(&self, writer: &mut ContainerWriter<W>) -> Result<()> {
        for font in self.fonts.values() {
            if let (Some(data), Some(file)) = (font.data(), font.font_file.as_deref()) {
                writer.add_file(&self.member_path(file), data)?;
            }
        }
        for media in self.media.values() {
            if let Some(data) = media.data() {
                writer.add_file(&self.member_path(&media.media_file), data)?;
            }
        }
        Ok(())
    }

    /// Whether any resource has bytes to write.
    pub(crate) fn has_payloads(&self) -> bool {
        self.fonts.values().any(|f| f.is_loaded() && f.font_file.is_some())
            || self.media.values().any(MultiMedia::is_loaded)
    }
}
