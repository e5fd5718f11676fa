//! Resolution of resource ids across scopes.

use super::{Font, MultiMedia, ResourceRegistry};
use crate::color::{ColorSpace, ColorSpaceSource, DEFAULT_COLOR_SPACE};
use crate::common::Id;

/// Read-only view over the registries visible from one page.
///
/// Ids resolve in order: page registry, document registry, public registry.
/// Colour-space id 0 resolves to the document's DefaultCS, or to the
/// built-in RGB space when none is declared.
#[derive(Debug, Clone, Copy)]
pub struct ResourceLookup<'a> {
    page: Option<&'a ResourceRegistry>,
    document: Option<&'a ResourceRegistry>,
    public: Option<&'a ResourceRegistry>,
    default_cs: Id,
}

impl<'a> ResourceLookup<'a> {
    pub fn new(public: &'a ResourceRegistry, document: &'a ResourceRegistry, default_cs: Id) -> Self {
        Self {
            page: None,
            document: Some(document),
            public: Some(public),
            default_cs,
        }
    }

    /// A lookup that resolves nothing but the built-in colour space.
    pub fn empty() -> Self {
        Self {
            page: None,
            document: None,
            public: None,
            default_cs: Id::UNSET,
        }
    }

    /// Same lookup with a page registry in front.
    pub fn with_page(&self, page: &'a ResourceRegistry) -> Self {
        Self {
            page: Some(page),
            ..*self
        }
    }

    fn scopes(&self) -> impl Iterator<Item = &'a ResourceRegistry> {
        [self.page, self.document, self.public].into_iter().flatten()
    }

    pub fn font(&self, id: Id) -> Option<&'a Font> {
        self.scopes().find_map(|r| r.font(id))
    }

    pub fn media(&self, id: Id) -> Option<&'a MultiMedia> {
        self.scopes().find_map(|r| r.media(id))
    }

    pub fn image(&self, id: Id) -> Option<&'a MultiMedia> {
        self.scopes().find_map(|r| r.image(id))
    }

    /// Declared colour space; id 0 is the document default.
    pub fn color_space(&self, id: Id) -> Option<&'a ColorSpace> {
        if !id.is_set() {
            if self.default_cs.is_set() {
                if let Some(cs) = self.scopes().find_map(|r| r.color_space(self.default_cs)) {
                    return Some(cs);
                }
            }
            return Some(&*DEFAULT_COLOR_SPACE);
        }
        self.scopes().find_map(|r| r.color_space(id))
    }
}

impl ColorSpaceSource for ResourceLookup<'_> {
    fn color_space(&self, id: Id) -> Option<&ColorSpace> {
        ResourceLookup::color_space(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorSpaceKind;
    use crate::common::IdAllocator;
    use crate::resource::ResourceLevel;

    #[test]
    fn test_cascade_order() {
        let ids = IdAllocator::new();
        let mut public = ResourceRegistry::new(ResourceLevel::Public, ids.clone());
        let mut document = ResourceRegistry::new(ResourceLevel::Document, ids.clone());
        let mut page = ResourceRegistry::new(ResourceLevel::Page, ids.clone());

        let mut f = Font::new("Public");
        f.id = Id::new(5);
        public.add_font(f);
        let mut f = Font::new("Page");
        f.id = Id::new(5);
        page.add_font(f);
        let mut f = Font::new("Doc");
        f.id = Id::new(6);
        document.add_font(f);

        let lookup = ResourceLookup::new(&public, &document, Id::UNSET);
        assert_eq!(lookup.font(Id::new(5)).unwrap().font_name, "Public");
        assert_eq!(lookup.font(Id::new(6)).unwrap().font_name, "Doc");

        let page_lookup = lookup.with_page(&page);
        assert_eq!(page_lookup.font(Id::new(5)).unwrap().font_name, "Page");
        assert!(page_lookup.font(Id::new(99)).is_none());
    }

    #[test]
    fn test_default_color_space() {
        let ids = IdAllocator::new();
        let public = ResourceRegistry::new(ResourceLevel::Public, ids.clone());
        let mut document = ResourceRegistry::new(ResourceLevel::Document, ids);
        let cmyk = document.add_color_space(ColorSpace::new(ColorSpaceKind::Cmyk));

        let plain = ResourceLookup::new(&public, &document, Id::UNSET);
        assert_eq!(plain.color_space(Id::UNSET).unwrap().kind, ColorSpaceKind::Rgb);

        let declared = ResourceLookup::new(&public, &document, cmyk);
        assert_eq!(declared.color_space(Id::UNSET).unwrap().kind, ColorSpaceKind::Cmyk);
        assert!(ResourceLookup::empty().color_space(Id::new(1)).is_none());
    }
}
