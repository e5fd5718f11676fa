//! Resources shared by id: fonts, colour spaces and multimedia.

mod font;
mod lookup;
mod media;
mod registry;

pub use font::{Font, FontLocation, FontStyle, FontType};
pub use lookup::ResourceLookup;
pub use media::{Image, ImageInfo, MediaType, MultiMedia};
pub use registry::{LoadReport, ResourceLevel, ResourceRegistry, DEFAULT_BASE_LOC};
