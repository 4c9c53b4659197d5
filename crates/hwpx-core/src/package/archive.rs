//! ZIP container codec.
//!
//! Reading keeps every entry in source order together with the compression
//! method it was stored with. Writing always emits `mimetype` first and
//! uncompressed, then the four structural parts, then everything else in
//! archive order.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::{HwpxError, Result};

/// Content of the `mimetype` entry.
pub const MIMETYPE: &str = "application/hwp+zip";

pub const MIMETYPE_PATH: &str = "mimetype";
pub const VERSION_PATH: &str = "version.xml";
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
pub const MANIFEST_PATH: &str = "META-INF/manifest.xml";
pub const CONTENT_PATH: &str = "Contents/content.hpf";

/// Structural parts in the order they are written after `mimetype`.
pub const STRUCTURAL_PARTS: [&str; 4] = [VERSION_PATH, CONTAINER_PATH, MANIFEST_PATH, CONTENT_PATH];

/// Method used for entries without a recorded one.
pub const DEFAULT_COMPRESSION: CompressionMethod = CompressionMethod::Deflated;

#[derive(Clone, Debug, PartialEq)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub compression: CompressionMethod,
}

impl ArchiveEntry {
    pub fn new(name: &str, data: Vec<u8>, compression: CompressionMethod) -> Self {
        Self {
            name: name.to_string(),
            data,
            compression,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }
}

/// Per-entry compression methods captured from a source archive.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressionInfo {
    methods: HashMap<String, CompressionMethod>,
    fallback: CompressionMethod,
}

impl Default for CompressionInfo {
    fn default() -> Self {
        Self {
            methods: HashMap::new(),
            fallback: DEFAULT_COMPRESSION,
        }
    }
}

impl CompressionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Method used for entries with nothing recorded.
    pub fn with_fallback(mut self, method: CompressionMethod) -> Self {
        self.fallback = method;
        self
    }

    pub fn get(&self, name: &str) -> Option<CompressionMethod> {
        self.methods.get(name).copied()
    }

    pub fn insert(&mut self, name: &str, method: CompressionMethod) {
        self.methods.insert(name.to_string(), method);
    }

    /// Recorded method for `name`, or the fallback ([`DEFAULT_COMPRESSION`] unless changed).
    pub fn method_for(&self, name: &str) -> CompressionMethod {
        self.get(name).unwrap_or(self.fallback)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Ordered in-memory image of an HWPX ZIP container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Read every entry and validate the `mimetype` marker.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut zip = ZipArchive::new(reader)
            .map_err(|e| HwpxError::format(format!("not a ZIP archive: {e}")))?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(ArchiveEntry {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
            });
        }

        let archive = Self { entries };
        archive.check_mimetype()?;
        Ok(archive)
    }

    /// Fail unless `mimetype` exists and names the HWPX content type.
    pub fn check_mimetype(&self) -> Result<()> {
        let data = self
            .get(MIMETYPE_PATH)
            .ok_or_else(|| HwpxError::format("missing mimetype"))?;
        let content = std::str::from_utf8(data)
            .map_err(|_| HwpxError::format("mimetype is not valid UTF-8"))?;
        if content.trim_end() != MIMETYPE {
            return Err(HwpxError::format(format!(
                "incorrect mimetype '{}'",
                content.trim_end()
            )));
        }
        Ok(())
    }

    /// Append an entry, replacing any existing entry of the same name in place.
    pub fn push(&mut self, name: &str, data: Vec<u8>, compression: CompressionMethod) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.data = data;
                entry.compression = compression;
            }
            None => self.entries.push(ArchiveEntry::new(name, data, compression)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entry(name).map(|e| e.data.as_slice())
    }

    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn compression_info(&self) -> CompressionInfo {
        let mut info = CompressionInfo::new();
        for entry in &self.entries {
            info.insert(&entry.name, entry.compression);
        }
        info
    }

    /// Entries in write order: mimetype, structural parts, then the rest as stored.
    pub fn ordered_entries(&self) -> Vec<&ArchiveEntry> {
        let mut ordered: Vec<&ArchiveEntry> = Vec::with_capacity(self.entries.len());
        ordered.extend(self.entry(MIMETYPE_PATH));
        for path in STRUCTURAL_PARTS {
            ordered.extend(self.entry(path));
        }
        ordered.extend(self.entries.iter().filter(|e| {
            e.name != MIMETYPE_PATH && !STRUCTURAL_PARTS.contains(&e.name.as_str())
        }));
        ordered
    }

    /// Write the archive to `path` through a temporary file in the same directory.
    ///
    /// Each entry uses the method recorded in `overrides`, falling back to
    /// [`DEFAULT_COMPRESSION`]; `mimetype` is always stored.
    pub fn create(path: impl AsRef<Path>, archive: &Archive, overrides: &CompressionInfo) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        archive.write_to(tmp.as_file_mut(), overrides)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| HwpxError::Io(e.error))?;
        Ok(())
    }

    pub fn to_bytes(&self, overrides: &CompressionInfo) -> Result<Vec<u8>> {
        let cursor = self.write_to(Cursor::new(Vec::new()), overrides)?;
        Ok(cursor.into_inner())
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W, overrides: &CompressionInfo) -> Result<W> {
        let mut zip = ZipWriter::new(writer);

        if !self.contains(MIMETYPE_PATH) {
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file(MIMETYPE_PATH, options)?;
            zip.write_all(MIMETYPE.as_bytes())?;
        }

        for entry in self.ordered_entries() {
            let method = if entry.name == MIMETYPE_PATH {
                CompressionMethod::Stored
            } else {
                writable(&entry.name, overrides.method_for(&entry.name))
            };
            let options = SimpleFileOptions::default().compression_method(method);

            if entry.is_dir() {
                zip.add_directory(entry.name.as_str(), options)?;
            } else {
                zip.start_file(entry.name.as_str(), options)?;
                zip.write_all(&entry.data)?;
            }
        }

        Ok(zip.finish()?)
    }
}

/// Methods the writer cannot produce are replaced by [`DEFAULT_COMPRESSION`].
fn writable(name: &str, method: CompressionMethod) -> CompressionMethod {
    match method {
        CompressionMethod::Stored | CompressionMethod::Deflated => method,
        other => {
            tracing::debug!(entry = %name, method = ?other, "unsupported compression method, deflating");
            DEFAULT_COMPRESSION
        }
    }
}
