use super::{color_reference, GraphicUnit, ParseContext, DEFAULT_LINE_WIDTH};
use crate::color::Color;
use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Id, ResourceKind, Result};
use crate::resource::{MultiMedia, ResourceLookup};

/// Frame drawn around an image (CT_Image/Border).
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub line_width: f64,
    pub horizontal_corner_radius: f64,
    pub vertical_corner_radius: f64,
    pub dash_offset: f64,
    pub dash_pattern: Vec<f64>,
    pub color: Option<Color>,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            horizontal_corner_radius: 0.0,
            vertical_corner_radius: 0.0,
            dash_offset: 0.0,
            dash_pattern: Vec::new(),
            color: None,
        }
    }
}

impl Border {
    fn write_xml(&self, w: &mut XmlWriter) {
        w.open("Border")
            .attr_num_default("LineWidth", self.line_width, DEFAULT_LINE_WIDTH)
            // The attribute name is spelled this way by the format.
            .attr_num_default("HorizonalCornerRadius", self.horizontal_corner_radius, 0.0)
            .attr_num_default("VerticalCornerRadius", self.vertical_corner_radius, 0.0)
            .attr_num_default("DashOffset", self.dash_offset, 0.0);
        if !self.dash_pattern.is_empty() {
            w.attr_numbers("DashPattern", &self.dash_pattern);
        }
        match &self.color {
            Some(color) => {
                w.end_attrs();
                color.write_element(w, "BorderColor");
                w.close("Border");
            },
            None => {
                w.close_empty();
            },
        }
    }

    fn from_xml(el: &XmlElement, ctx: &ParseContext<'_>) -> Result<Self> {
        let color = match el.child("BorderColor") {
            Some(c) => Color::from_xml(c, &ctx.lookup)?,
            None => None,
        };
        Ok(Self {
            line_width: el.attr_f64("LineWidth")?.unwrap_or(DEFAULT_LINE_WIDTH),
            horizontal_corner_radius: el.attr_f64("HorizonalCornerRadius")?.unwrap_or(0.0),
            vertical_corner_radius: el.attr_f64("VerticalCornerRadius")?.unwrap_or(0.0),
            dash_offset: el.attr_f64("DashOffset")?.unwrap_or(0.0),
            dash_pattern: el.attr_numbers("DashPattern")?.unwrap_or_default(),
            color,
        })
    }
}

/// Raster image placed through the object CTM onto the unit square.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageObject {
    pub resource_id: Id,
    /// Lower-resolution stand-in image.
    pub substitution: Option<Id>,
    pub image_mask: Option<Id>,
    pub border: Option<Border>,
}

impl ImageObject {
    pub fn new(resource_id: Id) -> Self {
        Self {
            resource_id,
            substitution: None,
            image_mask: None,
            border: None,
        }
    }

    pub fn resolve_image<'a>(&self, lookup: &ResourceLookup<'a>) -> Option<&'a MultiMedia> {
        lookup.image(self.resource_id)
    }
}

impl GraphicUnit for ImageObject {
    const TAG: &'static str = "ImageObject";

    fn write_attrs(&self, w: &mut XmlWriter) {
        w.attr_id("ResourceID", self.resource_id)
            .attr_id_opt("Substitution", self.substitution)
            .attr_id_opt("ImageMask", self.image_mask);
    }

    fn has_children(&self) -> bool {
        self.border.is_some()
    }

    fn write_children(&self, w: &mut XmlWriter) {
        if let Some(border) = &self.border {
            border.write_xml(w);
        }
    }

    fn from_xml(el: &XmlElement, ctx: &ParseContext<'_>) -> Result<Self> {
        Ok(Self {
            resource_id: el.required_id("ResourceID")?,
            substitution: el.attr_id("Substitution")?.filter(|id| id.is_set()),
            image_mask: el.attr_id("ImageMask")?.filter(|id| id.is_set()),
            border: el.child("Border").map(|b| Border::from_xml(b, ctx)).transpose()?,
        })
    }

    fn collect_references(&self, out: &mut Vec<(ResourceKind, Id)>) {
        out.push((ResourceKind::Image, self.resource_id));
        for id in [self.substitution, self.image_mask].into_iter().flatten() {
            out.push((ResourceKind::Image, id));
        }
        if let Some(border) = &self.border {
            color_reference(border.color.as_ref(), out);
        }
    }
}
