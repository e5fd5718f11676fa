//! Options for opening and saving packages.

use super::container::Compression;

/// Options for [`Package::save_with_options`](super::Package::save_with_options).
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Compression method of every member.
    pub compression: Compression,
    /// Deflate level, `None` for the library default.
    pub compression_level: Option<i64>,
    /// Load every unloaded font and image before writing, so re-saving an
    /// opened package keeps its resource bytes.
    pub load_resources: bool,
    /// Emit a `Signs/` directory for every document even when it has no
    /// signatures.
    pub signs_directory: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            compression_level: None,
            load_resources: true,
            signs_directory: true,
        }
    }
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_load_resources(mut self, load: bool) -> Self {
        self.load_resources = load;
        self
    }

    pub fn with_signs_directory(mut self, emit: bool) -> Self {
        self.signs_directory = emit;
        self
    }
}

/// Options for [`Package::open_with_options`](super::Package::open_with_options).
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Parse every page immediately instead of on first access.
    pub eager_pages: bool,
    /// Load font and image bytes immediately.
    pub load_resources: bool,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_eager_pages(mut self, eager: bool) -> Self {
        self.eager_pages = eager;
        self
    }

    pub fn with_load_resources(mut self, load: bool) -> Self {
        self.load_resources = load;
        self
    }
}
