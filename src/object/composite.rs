use super::{GraphicUnit, Object, ParseContext};
use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Id, ResourceKind, Result};
use crate::geometry::{Boundary, Transform};
use tracing::debug;

/// A group of objects drawn as one unit.
///
/// Children are owned exclusively; they can only be moved in, so a
/// composite can never contain itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeObject {
    pub(crate) children: Vec<Object>,
}

impl CompositeObject {
    pub fn new(children: Vec<Object>) -> Self {
        Self { children }
    }

    pub fn push(&mut self, child: Object) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Object] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl GraphicUnit for CompositeObject {
    const TAG: &'static str = "CompositeObject";

    fn write_attrs(&self, _w: &mut XmlWriter) {}

    fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn write_children(&self, w: &mut XmlWriter) {
        for child in &self.children {
            child.write_xml(w);
        }
    }

    fn from_xml(el: &XmlElement, ctx: &ParseContext<'_>) -> Result<Self> {
        let mut children = Vec::new();
        for child in el.children() {
            if Object::is_object_element(child.name()) {
                children.push(Object::from_xml(child, ctx)?);
            } else {
                debug!(element = child.name(), "skipping composite child");
            }
        }
        Ok(Self { children })
    }

    fn recalculate_boundary(&mut self, _boundary: &Boundary, _ctm: &Transform) -> Option<Boundary> {
        for child in &mut self.children {
            child.recalculate_boundary();
        }
        None
    }

    fn collect_references(&self, out: &mut Vec<(ResourceKind, Id)>) {
        for child in &self.children {
            out.extend(child.references());
        }
    }
}
