//! Ofd - reading and writing fixed-layout document containers
//!
//! A container is a ZIP archive of XML parts. Its object model is a tree:
//! a [`Package`] holds documents, a [`Document`] holds pages and
//! shared resources, a [`Page`] holds layers, and layers hold graphic
//! objects (text, paths, images, video and composites).
//!
//! # Features
//!
//! - **Lazy pages**: opened packages parse page content on first access
//! - **Resource cascade**: objects resolve fonts, images and colour spaces
//!   through page, document and public registries
//! - **Abbreviated path data**: the compact `M L B Q A C` path syntax
//! - **Deterministic output**: saved archives follow a fixed member layout
//!
//! # Example - Building and saving a document
//!
//! ```no_run
//! use ofd::color::Color;
//! use ofd::geometry::{Path, Point};
//! use ofd::object::PathObject;
//! use ofd::page::LayerKind;
//! use ofd::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pkg = Package::new();
//! let page = pkg.add_new_document().add_new_page();
//! let mut triangle = Path::new();
//! triangle
//!     .move_to(Point::new(0.0, 0.0))
//!     .line_to(Point::new(40.0, 0.0))
//!     .line_to(Point::new(20.0, 30.0));
//! page.add_new_layer(LayerKind::Body)
//!     .add_object(PathObject::new(triangle).with_fill(Color::rgb(255, 0, 0)));
//! pkg.save("out.ofd")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading a document
//!
//! ```no_run
//! use ofd::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pkg = Package::open("in.ofd")?;
//! let doc = pkg.document_mut(0).ok_or("no document")?;
//! for index in 0..doc.page_count() {
//!     let page = doc.open_page(index)?;
//!     for object in page.objects() {
//!         println!("{} {}", object.tag(), object.boundary);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Errors, identifiers, number formatting and the XML layer.
pub mod common;

/// Points, boundaries, transforms and paths.
pub mod geometry;

/// Colour spaces, colours and shadings.
pub mod color;

/// Fonts, multimedia and the resource registries.
pub mod resource;

/// Graphic objects.
pub mod object;

/// Pages, page areas and layers.
pub mod page;

/// Documents and their shared data.
pub mod document;

/// The container root and archive I/O.
pub mod package;

pub use common::{Error, Id, Result};
pub use document::{DocInfo, Document};
pub use object::{Object, ObjectKind};
pub use package::{OpenOptions, Package, SaveOptions};
pub use page::{Layer, LayerKind, Page};

#[cfg(test)]
mod tests;
