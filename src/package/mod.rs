//! The container root: documents, the root descriptor and archive I/O.
//!
//! # Examples
//!
//! ```no_run
//! use ofd::color::Color;
//! use ofd::geometry::{Path, Point};
//! use ofd::object::PathObject;
//! use ofd::page::LayerKind;
//! use ofd::package::Package;
//!
//! # fn main() -> ofd::common::Result<()> {
//! let mut package = Package::new();
//! let document = package.add_new_document();
//! let page = document.add_new_page();
//! let mut path = Path::new();
//! path.move_to(Point::new(10.0, 10.0))
//!     .line_to(Point::new(60.0, 10.0))
//!     .line_to(Point::new(35.0, 50.0));
//! page.add_new_layer(LayerKind::Body)
//!     .add_object(PathObject::new(path).with_fill(Color::rgb(255, 0, 0)));
//! package.save("triangle.ofd")?;
//!
//! let mut reopened = Package::open("triangle.ofd")?;
//! let page = reopened.document_mut(0).unwrap().open_page(0)?;
//! assert_eq!(page.body_layer().unwrap().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod container;
mod descriptor;
pub mod layout;
mod options;

pub use container::{Compression, Container, ContainerWriter};
pub use options::{OpenOptions, SaveOptions};

use crate::common::{Error, Result};
use crate::document::Document;
use crate::resource::ResourceRegistry;
use descriptor::{DocBody, RootDescriptor, DEFAULT_DOC_TYPE, DEFAULT_VERSION};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

/// A container holding one or more documents.
#[derive(Debug)]
pub struct Package {
    version: String,
    doc_type: String,
    documents: Vec<Document>,
    container: Option<Rc<Container>>,
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}

impl Package {
    /// An empty package.
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION.to_owned(),
            doc_type: DEFAULT_DOC_TYPE.to_owned(),
            documents: Vec::new(),
            container: None,
        }
    }

    /// Open a container file. Pages stay unloaded until opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, &OpenOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening package");
        let file = File::open(path)?;
        Self::from_container(Container::from_reader(BufReader::new(file))?, options)
    }

    /// Open a container held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_options(bytes, &OpenOptions::default())
    }

    pub fn from_bytes_with_options(bytes: Vec<u8>, options: &OpenOptions) -> Result<Self> {
        Self::from_container(Container::from_bytes(bytes)?, options)
    }

    fn from_container(container: Container, options: &OpenOptions) -> Result<Self> {
        let container = Rc::new(container);
        let descriptor = RootDescriptor::from_xml(&container.read(layout::ROOT_DESCRIPTOR)?)?;

        let mut documents = Vec::with_capacity(descriptor.bodies.len());
        for body in descriptor.bodies {
            let document_path = container::normalize(&body.doc_root);
            let mut document = Document::from_container(&container, &document_path)?;
            document.set_info(body.info);
            if let Some(signatures) = body.signatures.as_deref() {
                let path = container::normalize(signatures);
                if let Err(e) = document.capture_signatures(&container, &path) {
                    warn!(path = %path, error = %e, "signatures not carried over");
                }
            }
            if options.eager_pages {
                document.open_all_pages()?;
            }
            if options.load_resources {
                let report = document.load_resources();
                if !report.is_complete() {
                    warn!(failed = report.failed.len(), "some resources could not be loaded");
                }
            }
            documents.push(document);
        }
        debug!(documents = documents.len(), "opened package");

        Ok(Self {
            version: descriptor.version,
            doc_type: descriptor.doc_type,
            documents,
            container: Some(container),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// The archive this package was opened from, if any.
    pub fn container(&self) -> Option<&Rc<Container>> {
        self.container.as_ref()
    }

    /// Append a new document rooted at `Doc_<index>`.
    pub fn add_new_document(&mut self) -> &mut Document {
        let index = self.documents.len();
        self.documents.push(Document::new(layout::doc_root(index)));
        &mut self.documents[index]
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn document(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn document_mut(&mut self, index: usize) -> Option<&mut Document> {
        self.documents.get_mut(index)
    }

    /// Save to a new file. Fails with [`Error::AlreadyExists`] when the
    /// target exists.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with_options(path, &SaveOptions::default())
    }

    pub fn save_with_options(&mut self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        let path = path.as_ref();
        let file = match std::fs::OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(Error::AlreadyExists(path.to_path_buf()));
            },
            Err(e) => return Err(e.into()),
        };
        let written = self
            .write_to(BufWriter::new(file), options)
            .and_then(|mut w| w.flush().map_err(Error::from));
        if let Err(e) = written {
            let _ = std::fs::remove_file(path);
            return Err(e);
        }
        debug!(path = %path.display(), "saved package");
        Ok(())
    }

    /// Serialize to an in-memory archive.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.to_bytes_with_options(&SaveOptions::default())
    }

    pub fn to_bytes_with_options(&mut self, options: &SaveOptions) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()), options)?.into_inner())
    }

    /// Write the whole package to `writer` using the fixed layout.
    ///
    /// Every page is loaded first and, unless disabled in `options`, every
    /// font and image, so the written archive is self-contained. Documents
    /// are re-rooted at `Doc_<index>` and resources renamed to their
    /// deterministic file names.
    pub fn write_to<W: Write + Seek>(&mut self, writer: W, options: &SaveOptions) -> Result<W> {
        for document in &mut self.documents {
            document.open_all_pages()?;
            if options.load_resources {
                let report = document.load_resources();
                if !report.is_complete() {
                    warn!(failed = report.failed.len(), "some resources could not be loaded");
                }
            }
        }

        let descriptor = RootDescriptor {
            version: self.version.clone(),
            doc_type: self.doc_type.clone(),
            bodies: self
                .documents
                .iter()
                .enumerate()
                .map(|(n, document)| DocBody {
                    info: document.info().clone(),
                    doc_root: layout::document_xml(n),
                    signatures: document
                        .signatures()
                        .map(|s| format!("{}/{}", layout::signs_dir(n), s.list)),
                })
                .collect(),
        };

        let mut out = ContainerWriter::new(writer, options.compression, options.compression_level);
        out.add_file(layout::ROOT_DESCRIPTOR, descriptor.to_xml().as_bytes())?;
        let mut relocated = Vec::with_capacity(self.documents.len());
        for (n, document) in self.documents.iter().enumerate() {
            relocated.push(write_document(&mut out, n, document, options)?);
        }
        debug!(documents = self.documents.len(), members = out.members(), "wrote package");
        let writer = out.finish()?;
        for (document, relocated) in self.documents.iter_mut().zip(relocated) {
            relocated.commit(document);
        }
        Ok(writer)
    }
}

/// Registries of one document rebased onto the layout being written. They
/// replace the document's own registries once the archive is complete, so
/// a failed save leaves the package as it was.
struct Relocated {
    root: String,
    public_res: ResourceRegistry,
    document_res: ResourceRegistry,
    pages: Vec<ResourceRegistry>,
}

impl Relocated {
    fn new(n: usize, document: &Document) -> Self {
        let root = layout::doc_root(n);
        let relocate = |registry: &ResourceRegistry, dir: &str| {
            let mut registry = registry.clone();
            registry.relocate(dir);
            registry
        };
        let common = document.common_data();
        Self {
            public_res: relocate(common.public_res(), &root),
            document_res: relocate(common.document_res(), &root),
            pages: document
                .pages()
                .iter()
                .enumerate()
                .map(|(k, page)| relocate(page.resources(), &layout::page_dir(n, k)))
                .collect(),
            root,
        }
    }

    fn commit(self, document: &mut Document) {
        let common = document.common_data_mut();
        *common.public_res_mut() = self.public_res;
        *common.document_res_mut() = self.document_res;
        for (page, resources) in document.pages_mut().iter_mut().zip(self.pages) {
            *page.resources_mut() = resources;
        }
        document.set_doc_root(self.root);
    }
}

fn write_document<W: Write + Seek>(
    out: &mut ContainerWriter<W>,
    n: usize,
    document: &Document,
    options: &SaveOptions,
) -> Result<Relocated> {
    let relocated = Relocated::new(n, document);
    let root = &relocated.root;

    out.add_directory(root)?;
    out.add_file(
        &layout::document_xml(n),
        document.to_document_xml(layout::page_base_loc).as_bytes(),
    )?;
    let registries = [&relocated.public_res, &relocated.document_res];
    for registry in registries {
        out.add_file(
            &format!("{root}/{}", registry.descriptor_name()),
            registry.to_xml().as_bytes(),
        )?;
    }

    out.add_directory(&layout::pages_dir(n))?;
    for (k, (page, resources)) in document.pages().iter().zip(&relocated.pages).enumerate() {
        let dir = layout::page_dir(n, k);
        out.add_directory(&dir)?;
        let has_res = !resources.is_empty();
        out.add_file(
            &format!("{dir}/{}", layout::CONTENT_XML),
            page.to_content_xml(has_res).as_bytes(),
        )?;
        if has_res {
            out.add_file(
                &format!("{dir}/{}", resources.descriptor_name()),
                resources.to_xml().as_bytes(),
            )?;
            if resources.has_payloads() {
                out.add_directory(&layout::res_dir(&dir))?;
                resources.write_payloads(out)?;
            }
        }
    }

    let signatures = document.signatures();
    if signatures.is_some() || options.signs_directory {
        let signs = layout::signs_dir(n);
        out.add_directory(&signs)?;
        for (relative, bytes) in signatures.map(|s| s.members.as_slice()).unwrap_or_default() {
            out.add_file(&format!("{signs}/{relative}"), bytes)?;
        }
    }

    if registries.iter().any(|r| r.has_payloads()) {
        out.add_directory(&layout::res_dir(root))?;
        for registry in registries {
            registry.write_payloads(out)?;
        }
    }

    Ok(relocated)
}
