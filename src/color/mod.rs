//! Colour model: colour spaces, colours and gradient fills.

mod color;
mod shading;
mod space;

pub use color::{Color, ColorSource, ColorValue};
pub use shading::{AxialShading, MapType, RadialShading, Shading, ShadingCommon, ShadingSegment};
pub use space::{
    ColorSpace, ColorSpaceKind, ColorSpaceSource, DefaultColorSpaces, DEFAULT_COLOR_SPACE, VALID_BITS,
};
