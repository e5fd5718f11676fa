//! Graphic objects: the drawable units held by a layer.
//!
//! [`Object`] carries the attributes every graphic unit shares (id,
//! boundary, transform, line style, alpha). The variant data lives in
//! [`ObjectKind`], a closed set of Text, Path, Image, Video and Composite.
//! Each variant implements [`GraphicUnit`], which covers XML generation,
//! XML parsing and boundary recalculation.

mod composite;
mod image;
mod path;
mod text;
mod video;

pub use composite::CompositeObject;
pub use image::{Border, ImageObject};
pub use path::{FillRule, PathObject};
pub use text::{ReadDirection, TextCode, TextObject};
pub use video::VideoObject;

use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, IdAllocator, ResourceKind, Result};
use crate::geometry::{Boundary, Transform};
use crate::resource::ResourceLookup;

/// Default stroke width in millimetres (one point).
pub const DEFAULT_LINE_WIDTH: f64 = 0.353;
pub const DEFAULT_MITER_LIMIT: f64 = 3.528;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    fn as_str(self) -> &'static str {
        match self {
            LineCap::Butt => "Butt",
            LineCap::Round => "Round",
            LineCap::Square => "Square",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Butt" => Some(LineCap::Butt),
            "Round" => Some(LineCap::Round),
            "Square" => Some(LineCap::Square),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    fn as_str(self) -> &'static str {
        match self {
            LineJoin::Miter => "Miter",
            LineJoin::Round => "Round",
            LineJoin::Bevel => "Bevel",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Miter" => Some(LineJoin::Miter),
            "Round" => Some(LineJoin::Round),
            "Bevel" => Some(LineJoin::Bevel),
            _ => None,
        }
    }
}

/// State shared while parsing the objects of one page.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParseContext<'a> {
    pub lookup: ResourceLookup<'a>,
    pub ids: &'a IdAllocator,
}

/// Variant-specific behaviour of a graphic unit.
pub(crate) trait GraphicUnit: Sized {
    /// Element name.
    const TAG: &'static str;

    /// Variant attributes, written after the common ones.
    fn write_attrs(&self, w: &mut XmlWriter);

    fn has_children(&self) -> bool;

    fn write_children(&self, w: &mut XmlWriter);

    fn from_xml(el: &XmlElement, ctx: &ParseContext<'_>) -> Result<Self>;

    /// New boundary derived from the variant's content, or `None` to keep
    /// the current one.
    fn recalculate_boundary(&mut self, _boundary: &Boundary, _ctm: &Transform) -> Option<Boundary> {
        None
    }

    /// Resource ids this unit refers to.
    fn collect_references(&self, _out: &mut Vec<(ResourceKind, Id)>) {}
}

/// The closed set of object variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Text(TextObject),
    Path(PathObject),
    Image(ImageObject),
    Video(VideoObject),
    Composite(CompositeObject),
}

impl ObjectKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ObjectKind::Text(_) => TextObject::TAG,
            ObjectKind::Path(_) => PathObject::TAG,
            ObjectKind::Image(_) => ImageObject::TAG,
            ObjectKind::Video(_) => VideoObject::TAG,
            ObjectKind::Composite(_) => CompositeObject::TAG,
        }
    }
}

/// Dispatch a [`GraphicUnit`] call over every variant.
macro_rules! with_unit {
    ($kind:expr, $unit:ident => $body:expr) => {
        match $kind {
            ObjectKind::Text($unit) => $body,
            ObjectKind::Path($unit) => $body,
            ObjectKind::Image($unit) => $body,
            ObjectKind::Video($unit) => $body,
            ObjectKind::Composite($unit) => $body,
        }
    };
}

/// One graphic unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Assigned when the object is added to a layer.
    pub id: Id,
    pub name: String,
    pub boundary: Boundary,
    pub ctm: Transform,
    pub visible: bool,
    pub line_width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
    pub dash_offset: f64,
    pub dash_pattern: Vec<f64>,
    pub alpha: u8,
    pub kind: ObjectKind,
}

impl From<TextObject> for Object {
    fn from(text: TextObject) -> Self {
        Object::new(ObjectKind::Text(text))
    }
}

impl From<PathObject> for Object {
    fn from(path: PathObject) -> Self {
        Object::new(ObjectKind::Path(path))
    }
}

impl From<ImageObject> for Object {
    fn from(image: ImageObject) -> Self {
        Object::new(ObjectKind::Image(image))
    }
}

impl From<VideoObject> for Object {
    fn from(video: VideoObject) -> Self {
        Object::new(ObjectKind::Video(video))
    }
}

impl From<CompositeObject> for Object {
    fn from(composite: CompositeObject) -> Self {
        Object::new(ObjectKind::Composite(composite))
    }
}

impl Object {
    /// An object with every optional attribute at its default.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            id: Id::UNSET,
            name: String::new(),
            boundary: Boundary::empty(),
            ctm: Transform::IDENTITY,
            visible: true,
            line_width: DEFAULT_LINE_WIDTH,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: DEFAULT_MITER_LIMIT,
            dash_offset: 0.0,
            dash_pattern: Vec::new(),
            alpha: 255,
            kind,
        }
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_ctm(mut self, ctm: Transform) -> Self {
        self.ctm = ctm;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn as_text(&self) -> Option<&TextObject> {
        match &self.kind {
            ObjectKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathObject> {
        match &self.kind {
            ObjectKind::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut PathObject> {
        match &mut self.kind {
            ObjectKind::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageObject> {
        match &self.kind {
            ObjectKind::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_video(&self) -> Option<&VideoObject> {
        match &self.kind {
            ObjectKind::Video(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeObject> {
        match &self.kind {
            ObjectKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    /// Recompute the boundary for variants that derive it from content.
    /// Text, video and composites always do; a path only fills in an empty
    /// boundary. Images keep the boundary they were given.
    pub fn recalculate_boundary(&mut self) {
        let Self {
            boundary, ctm, kind, ..
        } = self;
        if let Some(b) = with_unit!(kind, unit => unit.recalculate_boundary(boundary, ctm)) {
            *boundary = b;
        }
    }

    /// Give this object and every nested child an id from `ids`.
    pub(crate) fn assign_ids(&mut self, ids: &IdAllocator) {
        self.id = ids.next_id();
        if let ObjectKind::Composite(c) = &mut self.kind {
            for child in &mut c.children {
                child.assign_ids(ids);
            }
        }
    }

    /// Resource ids referenced by this object and its children.
    pub fn references(&self) -> Vec<(ResourceKind, Id)> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<(ResourceKind, Id)>) {
        with_unit!(&self.kind, unit => unit.collect_references(out));
    }

    /// Visit this object and every nested child, depth first.
    pub fn walk<'s>(&'s self, f: &mut dyn FnMut(&'s Object)) {
        f(self);
        if let ObjectKind::Composite(c) = &self.kind {
            for child in &c.children {
                child.walk(f);
            }
        }
    }

    pub(crate) fn write_xml(&self, w: &mut XmlWriter) {
        let tag = self.tag();
        w.open(tag)
            .attr_id("ID", self.id)
            .attr_box("Boundary", &self.boundary)
            .attr_str_opt("Name", &self.name)
            .attr_bool_default("Visible", self.visible, true);
        if !self.ctm.is_identity() {
            w.attr("CTM", &self.ctm.to_attr());
        }
        w.attr_num_default("LineWidth", self.line_width, DEFAULT_LINE_WIDTH);
        if self.cap != LineCap::Butt {
            w.attr("Cap", self.cap.as_str());
        }
        if self.join != LineJoin::Miter {
            w.attr("Join", self.join.as_str());
        }
        w.attr_num_default("MiterLimit", self.miter_limit, DEFAULT_MITER_LIMIT)
            .attr_num_default("DashOffset", self.dash_offset, 0.0);
        if !self.dash_pattern.is_empty() {
            w.attr_numbers("DashPattern", &self.dash_pattern);
        }
        if self.alpha != 255 {
            w.attr_u32("Alpha", u32::from(self.alpha));
        }
        with_unit!(&self.kind, unit => {
            unit.write_attrs(w);
            if unit.has_children() {
                w.end_attrs();
                unit.write_children(w);
                w.close(tag);
            } else {
                w.close_empty();
            }
        });
    }

    /// Whether an element name is one of the object variants.
    pub(crate) fn is_object_element(name: &str) -> bool {
        matches!(
            name,
            TextObject::TAG | PathObject::TAG | ImageObject::TAG | VideoObject::TAG | CompositeObject::TAG
        )
    }

    pub(crate) fn from_xml(el: &XmlElement, ctx: &ParseContext<'_>) -> Result<Self> {
        let kind = match el.name() {
            TextObject::TAG => ObjectKind::Text(TextObject::from_xml(el, ctx)?),
            PathObject::TAG => ObjectKind::Path(PathObject::from_xml(el, ctx)?),
            ImageObject::TAG => ObjectKind::Image(ImageObject::from_xml(el, ctx)?),
            VideoObject::TAG => ObjectKind::Video(VideoObject::from_xml(el, ctx)?),
            CompositeObject::TAG => ObjectKind::Composite(CompositeObject::from_xml(el, ctx)?),
            other => return Err(Error::InvalidFormat(format!("'{other}' is not a graphic object"))),
        };
        let id = el.required_id("ID")?;
        ctx.ids.observe(id);
        let boundary_text = el.required_attr("Boundary")?;
        let boundary = Boundary::parse_box(boundary_text)
            .ok_or_else(|| Error::invalid_value(el.name(), "Boundary", boundary_text))?;
        let ctm = match el.attr("CTM") {
            None => Transform::IDENTITY,
            Some(v) => Transform::parse(v).ok_or_else(|| Error::invalid_value(el.name(), "CTM", v))?,
        };
        let cap = match el.attr("Cap") {
            None => LineCap::Butt,
            Some(v) => LineCap::parse(v).ok_or_else(|| Error::invalid_value(el.name(), "Cap", v))?,
        };
        let join = match el.attr("Join") {
            None => LineJoin::Miter,
            Some(v) => LineJoin::parse(v).ok_or_else(|| Error::invalid_value(el.name(), "Join", v))?,
        };
        let alpha = match el.attr_u32("Alpha")? {
            None => 255,
            Some(a) => u8::try_from(a).map_err(|_| Error::invalid_value(el.name(), "Alpha", &a.to_string()))?,
        };
        Ok(Self {
            id,
            name: el.attr("Name").unwrap_or_default().to_owned(),
            boundary,
            ctm,
            visible: el.attr_bool("Visible")?.unwrap_or(true),
            line_width: el.attr_f64("LineWidth")?.unwrap_or(DEFAULT_LINE_WIDTH),
            cap,
            join,
            miter_limit: el.attr_f64("MiterLimit")?.unwrap_or(DEFAULT_MITER_LIMIT),
            dash_offset: el.attr_f64("DashOffset")?.unwrap_or(0.0),
            dash_pattern: el.attr_numbers("DashPattern")?.unwrap_or_default(),
            alpha,
            kind,
        })
    }
}

/// Write an optional colour element.
pub(crate) fn write_color_opt(w: &mut XmlWriter, tag: &str, color: Option<&crate::color::Color>) {
    if let Some(color) = color {
        color.write_element(w, tag);
    }
}

/// Parse an optional colour child element.
pub(crate) fn parse_color_child(
    el: &XmlElement,
    tag: &str,
    ctx: &ParseContext<'_>,
) -> Result<Option<crate::color::Color>> {
    match el.child(tag) {
        None => Ok(None),
        Some(c) => crate::color::Color::from_xml(c, &ctx.lookup),
    }
}

/// Colour-space ids used by a colour, for reference checking.
pub(crate) fn color_reference(color: Option<&crate::color::Color>, out: &mut Vec<(ResourceKind, Id)>) {
    if let Some(c) = color {
        if c.color_space_id().is_set() {
            out.push((ResourceKind::ColorSpace, c.color_space_id()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::{Path, Point};

    fn ctx_parse(xml: &str) -> Result<Object> {
        let ids = IdAllocator::new();
        let ctx = ParseContext {
            lookup: ResourceLookup::empty(),
            ids: &ids,
        };
        let el = XmlElement::parse(xml.as_bytes())?;
        Object::from_xml(&el, &ctx)
    }

    fn write(obj: &Object) -> String {
        let mut w = XmlWriter::fragment();
        obj.write_xml(&mut w);
        w.into_string()
    }

    fn triangle() -> PathObject {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(10.0, 0.0))
            .line_to(Point::new(5.0, 8.0));
        PathObject::new(path)
    }

    #[test]
    fn test_defaults_are_suppressed() {
        let mut obj = Object::from(triangle()).with_boundary(Boundary::new(0.0, 0.0, 10.0, 8.0));
        obj.id = Id::new(4);
        assert_eq!(
            write(&obj),
            r#"<ofd:PathObject ID="4" Boundary="0.000 0.000 10.000 8.000"><ofd:AbbreviatedData>M 0 0 L 10 0 L 5 8</ofd:AbbreviatedData></ofd:PathObject>"#
        );
        assert_eq!(ctx_parse(&write(&obj)).unwrap(), obj);
    }

    #[test]
    fn test_common_attributes_round_trip() {
        let mut obj = Object::from(triangle())
            .with_boundary(Boundary::from_origin_size(1.5, 2.25, 30.0, 40.125))
            .with_ctm(Transform::new(1.0, 0.0, 0.0, -1.0, 0.0, 40.0))
            .with_name("tri")
            .with_line_width(0.5)
            .with_alpha(128);
        obj.id = Id::new(9);
        obj.visible = false;
        obj.cap = LineCap::Round;
        obj.join = LineJoin::Bevel;
        obj.miter_limit = 10.0;
        obj.dash_offset = 1.0;
        obj.dash_pattern = vec![2.0, 1.0];

        let xml = write(&obj);
        assert!(xml.contains(r#"Visible="false""#));
        assert!(xml.contains(r#"CTM="1 0 0 -1 0 40""#));
        assert!(xml.contains(r#"Alpha="128""#));
        assert_eq!(ctx_parse(&xml).unwrap(), obj);
    }

    #[test]
    fn test_missing_required_attributes() {
        let err = ctx_parse(r#"<PathObject Boundary="0 0 1 1"><AbbreviatedData>M 0 0</AbbreviatedData></PathObject>"#)
            .unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { ref attribute, .. } if attribute == "ID"));

        let err = ctx_parse(r#"<PathObject ID="1"><AbbreviatedData>M 0 0</AbbreviatedData></PathObject>"#)
            .unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { ref attribute, .. } if attribute == "Boundary"));
    }

    #[test]
    fn test_assign_ids_recurses() {
        let composite = CompositeObject::new(vec![Object::from(triangle()), Object::from(triangle())]);
        let mut obj = Object::from(composite);
        let ids = IdAllocator::starting_at(3);
        obj.assign_ids(&ids);
        let mut seen = Vec::new();
        obj.walk(&mut |o| seen.push(o.id.get()));
        assert_eq!(seen, vec![4, 5, 6]);
    }

    #[test]
    fn test_references() {
        let mut text = TextObject::new(Id::new(7), 12.0);
        text.fill_color = Some(Color::rgb(0, 0, 0));
        let obj = Object::from(text);
        assert_eq!(obj.references(), vec![(ResourceKind::Font, Id::new(7))]);
    }
}
