//! End-to-end tests: build packages, write them out and read them back.

mod package;

use crate::color::Color;
use crate::geometry::{Path, Point};
use crate::object::PathObject;
use crate::package::Container;

/// The red triangle used by most scenarios.
fn red_triangle() -> PathObject {
    let mut path = Path::new();
    path.move_to(Point::new(10.0, 10.0))
        .line_to(Point::new(60.0, 10.0))
        .line_to(Point::new(35.0, 50.0));
    PathObject::new(path).with_fill(Color::rgb(255, 0, 0))
}

/// Read one member of a written archive as text.
fn member_text(bytes: &[u8], path: &str) -> String {
    let container = Container::from_bytes(bytes.to_vec()).expect("valid archive");
    String::from_utf8(container.read(path).expect("member present")).expect("utf-8 member")
}
