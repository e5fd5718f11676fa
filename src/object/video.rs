use super::{GraphicUnit, ParseContext};
use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Id, ResourceKind, Result};
use crate::geometry::{Boundary, Transform};
use crate::resource::{MultiMedia, ResourceLookup};

/// Video clip placed through the object CTM onto the unit square.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoObject {
    pub resource_id: Id,
}

impl VideoObject {
    pub fn new(resource_id: Id) -> Self {
        Self { resource_id }
    }

    pub fn resolve_media<'a>(&self, lookup: &ResourceLookup<'a>) -> Option<&'a MultiMedia> {
        lookup.media(self.resource_id)
    }
}

impl GraphicUnit for VideoObject {
    const TAG: &'static str = "VideoObject";

    fn write_attrs(&self, w: &mut XmlWriter) {
        w.attr_id("ResourceID", self.resource_id);
    }

    fn has_children(&self) -> bool {
        false
    }

    fn write_children(&self, _w: &mut XmlWriter) {}

    fn from_xml(el: &XmlElement, _ctx: &ParseContext<'_>) -> Result<Self> {
        Ok(Self {
            resource_id: el.required_id("ResourceID")?,
        })
    }

    /// Size of the transformed unit square, anchored at the boundary origin.
    fn recalculate_boundary(&mut self, boundary: &Boundary, ctm: &Transform) -> Option<Boundary> {
        let frame = ctm.map_boundary(&Boundary::new(0.0, 0.0, 1.0, 1.0));
        let origin = boundary.origin();
        Some(Boundary::from_origin_size(origin.x, origin.y, frame.width(), frame.height()))
    }

    fn collect_references(&self, out: &mut Vec<(ResourceKind, Id)>) {
        out.push((ResourceKind::Media, self.resource_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;

    #[test]
    fn test_video_boundary_follows_ctm() {
        let mut obj = Object::from(VideoObject::new(Id::new(3)))
            .with_boundary(Boundary::from_origin_size(5.0, 5.0, 1.0, 1.0))
            .with_ctm(Transform::scale(160.0, 90.0));
        obj.recalculate_boundary();
        assert_eq!(obj.boundary, Boundary::from_origin_size(5.0, 5.0, 160.0, 90.0));
    }
}
