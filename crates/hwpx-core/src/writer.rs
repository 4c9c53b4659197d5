//! Output that preserves everything the caller did not change.
//!
//! Unmodified XML parts, binaries, charts and unclaimed entries are copied
//! byte-for-byte; only parts in the modified set are reserialized. Entry order
//! follows the source archive after the fixed `mimetype` + structural prefix.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::edit::ModifiedParts;
use crate::error::{HwpxError, Result};
use crate::package::archive::{
    Archive, CompressionInfo, CONTAINER_PATH, MANIFEST_PATH, MIMETYPE, MIMETYPE_PATH, VERSION_PATH,
};
use crate::package::{HwpxPackage, PartOutput, XmlPart};
use crate::xml::builder;

pub struct CompatibleWriter<'a> {
    package: &'a HwpxPackage,
    modified: &'a ModifiedParts,
    compression: CompressionInfo,
}

impl<'a> CompatibleWriter<'a> {
    /// Writer using the package's own modified set and source compression.
    pub fn new(package: &'a HwpxPackage) -> Self {
        Self {
            package,
            modified: package.modified(),
            compression: package.compression_info().clone(),
        }
    }

    pub fn with_modified(mut self, modified: &'a ModifiedParts) -> Self {
        self.modified = modified;
        self
    }

    pub fn with_compression(mut self, compression: &CompressionInfo) -> Self {
        self.compression = compression.clone();
        self
    }

    /// Method for entries the compression info has no record of.
    pub fn with_default_compression(mut self, method: zip::CompressionMethod) -> Self {
        self.compression = self.compression.with_fallback(method);
        self
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let archive = self.build_archive()?;
        Archive::create(path, &archive, &self.compression)?;
        debug!(path = %path.display(), entries = archive.len(), "package written");
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.build_archive()?.to_bytes(&self.compression)
    }

    /// Assemble the output entries in write order.
    pub fn build_archive(&self) -> Result<Archive> {
        let package = self.package;
        let mut archive = Archive::new();
        let mut written: HashSet<&str> = HashSet::new();

        archive.push(MIMETYPE_PATH, MIMETYPE.as_bytes().to_vec(), zip::CompressionMethod::Stored);
        written.insert(MIMETYPE_PATH);

        let structural = [
            (VERSION_PATH, package.version()),
            (CONTAINER_PATH, package.container()),
            (MANIFEST_PATH, package.manifest()),
            (package.descriptor_path(), package.descriptor()),
        ];
        for (path, part) in structural {
            let part = part.ok_or_else(|| HwpxError::MissingPart {
                part_path: path.to_string(),
            })?;
            self.push_xml(&mut archive, part)?;
            written.insert(path);
        }

        for name in package.entry_order() {
            if written.contains(name.as_str()) {
                continue;
            }
            if self.push_named(&mut archive, name)? {
                written.insert(name.as_str());
            }
        }

        // Parts with no position in the source archive, by path.
        let mut remaining: Vec<&str> = package
            .parts()
            .iter()
            .map(|p| p.path.as_str())
            .chain(package.binaries().keys().map(String::as_str))
            .chain(package.charts().keys().map(String::as_str))
            .filter(|path| !written.contains(path))
            .collect();
        remaining.sort_unstable();
        remaining.dedup();
        for name in remaining {
            self.push_named(&mut archive, name)?;
        }

        Ok(archive)
    }

    /// Push the model's content for `name`; returns `false` if the model holds nothing under it.
    fn push_named(&self, archive: &mut Archive, name: &str) -> Result<bool> {
        let package = self.package;
        if let Some(part) = package.part(name) {
            self.push_xml(archive, part)?;
        } else if let Some(bytes) = package.binary(name).or_else(|| package.chart(name)) {
            archive.push(name, bytes.to_vec(), self.compression.method_for(name));
        } else if let Some(entry) = package.passthrough().iter().find(|e| e.name == name) {
            archive.push(name, entry.data.clone(), self.compression.method_for(name));
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    fn push_xml(&self, archive: &mut Archive, part: &XmlPart) -> Result<()> {
        let bytes = match part.output(self.modified.contains(&part.path)) {
            PartOutput::Verbatim(bytes) => bytes.to_vec(),
            PartOutput::Reserialize(tree) => {
                debug!(part = %part.path, "reserializing modified part");
                builder::serialize_bytes(tree, self.package.namespaces())?
            }
        };
        archive.push(&part.path, bytes, self.compression.method_for(&part.path));
        Ok(())
    }
}
