//! Layers: ordered object lists within a page.

use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, IdAllocator, Result};
use crate::object::{Object, ParseContext};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerKind {
    #[default]
    Body,
    Background,
    Foreground,
    Custom,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Body => "Body",
            LayerKind::Background => "Background",
            LayerKind::Foreground => "Foreground",
            LayerKind::Custom => "Custom",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Body" => Some(LayerKind::Body),
            "Background" => Some(LayerKind::Background),
            "Foreground" => Some(LayerKind::Foreground),
            "Custom" => Some(LayerKind::Custom),
            _ => None,
        }
    }
}

/// An ordered list of objects.
#[derive(Debug, Clone)]
pub struct Layer {
    id: Id,
    kind: LayerKind,
    objects: Vec<Object>,
    ids: IdAllocator,
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind && self.objects == other.objects
    }
}

impl Layer {
    pub(crate) fn new(id: Id, kind: LayerKind, ids: IdAllocator) -> Self {
        Self {
            id,
            kind,
            objects: Vec::new(),
            ids,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Append an object. The object and any nested children receive fresh
    /// ids from the document counter, then derived boundaries are
    /// recomputed. Returns the object id.
    pub fn add_object(&mut self, object: impl Into<Object>) -> Id {
        let mut object = object.into();
        object.assign_ids(&self.ids);
        object.recalculate_boundary();
        let id = object.id;
        self.objects.push(object);
        id
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [Object] {
        &mut self.objects
    }

    pub fn object(&self, id: Id) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Remove and return an object by id.
    pub fn remove_object(&mut self, id: Id) -> Option<Object> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub(crate) fn write_xml(&self, w: &mut XmlWriter) {
        w.open("Layer").attr_id("ID", self.id);
        if self.kind != LayerKind::Body {
            w.attr("Type", self.kind.as_str());
        }
        if self.objects.is_empty() {
            w.close_empty();
            return;
        }
        w.end_attrs();
        for object in &self.objects {
            object.write_xml(w);
        }
        w.close("Layer");
    }

    pub(crate) fn from_xml(el: &XmlElement, ctx: &ParseContext<'_>) -> Result<Self> {
        let id = el.required_id("ID")?;
        ctx.ids.observe(id);
        let kind = match el.attr("Type") {
            None => LayerKind::Body,
            Some(v) => LayerKind::parse(v).ok_or_else(|| Error::invalid_value("Layer", "Type", v))?,
        };
        let mut objects = Vec::new();
        for child in el.children() {
            if Object::is_object_element(child.name()) {
                objects.push(Object::from_xml(child, ctx)?);
            } else {
                debug!(element = child.name(), "skipping layer child");
            }
        }
        Ok(Self {
            id,
            kind,
            objects,
            ids: ctx.ids.clone(),
        })
    }
}
