//! ZIP archive access.
//!
//! [`Container`] is the read side: an archive opened from a file or from
//! memory, shared by every page and resource registry that loads its data
//! lazily. [`ContainerWriter`] is the write side used by `Package::save`.

use crate::common::{Error, Result};
use std::cell::RefCell;
use std::fmt;
use std::io::{Cursor, Read, Seek, Write};
use tracing::debug;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

/// Any seekable byte source.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// An opened container archive.
pub struct Container {
    archive: RefCell<ZipArchive<Box<dyn ReadSeek>>>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("members", &self.archive.borrow().len())
            .finish()
    }
}

impl Container {
    /// Open an archive from a reader.
    pub fn from_reader<R: Read + Seek + 'static>(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(Box::new(reader) as Box<dyn ReadSeek>)
            .map_err(|e| Error::InvalidFormat(format!("not a ZIP container: {e}")))?;
        debug!(members = archive.len(), "opened container");
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Open an archive held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Read one member. A leading `/` is ignored.
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        let name = normalize(path);
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(&name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => Error::MissingMember { path: name.clone() },
            other => Error::from(other),
        })?;
        let mut content = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.archive.borrow_mut().by_name(&normalize(path)).is_ok()
    }

    /// Names of every member, directories included.
    pub fn member_names(&self) -> Vec<String> {
        self.archive
            .borrow()
            .file_names()
            .map(str::to_owned)
            .collect()
    }

    /// Names of the file members below `dir`.
    pub fn members_under(&self, dir: &str) -> Vec<String> {
        let dir = normalize(dir);
        let prefix = if dir.is_empty() { dir } else { format!("{dir}/") };
        let mut names: Vec<String> = self
            .member_names()
            .into_iter()
            .filter(|n| n.starts_with(&prefix) && !n.ends_with('/'))
            .collect();
        names.sort();
        names
    }
}

/// Strip a leading `/` and collapse `.` and `..` segments.
pub(crate) fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            p => parts.push(p),
        }
    }
    parts.join("/")
}

/// Join a member path onto a directory. Absolute paths are taken from the
/// archive root.
pub(crate) fn join(dir: &str, path: &str) -> String {
    if path.starts_with('/') || dir.is_empty() {
        normalize(path)
    } else {
        normalize(&format!("{dir}/{path}"))
    }
}

/// Parent directory of a member path, or `""` at the root.
pub(crate) fn parent(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Compression applied to written members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

/// Sequential archive writer.
pub struct ContainerWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    members: usize,
}

impl<W: Write + Seek> ContainerWriter<W> {
    pub fn new(writer: W, compression: Compression, level: Option<i64>) -> Self {
        let method = match compression {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .compression_level(level);
        Self {
            zip: ZipWriter::new(writer),
            options,
            members: 0,
        }
    }

    /// Add a directory entry. The trailing `/` is added when missing.
    pub fn add_directory(&mut self, path: &str) -> Result<()> {
        let name = format!("{}/", normalize(path));
        self.zip.add_directory(name, self.options)?;
        Ok(())
    }

    pub fn add_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let name = normalize(path);
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(content)?;
        self.members += 1;
        Ok(())
    }

    /// Number of file members written so far.
    pub fn members(&self) -> usize {
        self.members
    }

    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}
