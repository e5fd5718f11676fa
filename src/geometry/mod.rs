//! Geometry primitives shared by the object model.

pub mod abbreviated;
mod boundary;
mod path;
mod point;
mod transform;

pub use abbreviated::{parse_path_data, write_path_data};
pub use boundary::Boundary;
pub use path::{Path, Segment, SegmentKind, Segments, Subpath};
pub use point::Point;
pub use transform::Transform;
