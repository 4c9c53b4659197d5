use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use super::archive::{
    Archive, ArchiveEntry, CompressionInfo, CONTAINER_PATH, CONTENT_PATH, MANIFEST_PATH,
    MIMETYPE_PATH, VERSION_PATH,
};
use super::container;
use super::content::{self, ManifestItem};
use super::parts::XmlPart;
use crate::edit::tracker::ModifiedParts;
use crate::error::{HwpxError, Result};
use crate::xml::NamespaceRegistry;

/// Attribute naming a chart part from inside a content part.
const CHART_REF_ATTR: &str = "chartIDRef";

/// In-memory model of an HWPX document.
///
/// Structural parts and content parts are held as parsed trees next to their
/// original bytes. Everything else in the archive (binary items, chart parts,
/// unclaimed entries) is carried as raw bytes so that it can be written back
/// untouched. `Clone` produces an independent deep copy.
#[derive(Clone, Debug)]
pub struct HwpxPackage {
    version: Option<XmlPart>,
    container: Option<XmlPart>,
    manifest: Option<XmlPart>,
    descriptor: Option<XmlPart>,
    descriptor_path: String,
    items: Vec<ManifestItem>,
    parts: Vec<XmlPart>,
    binaries: BTreeMap<String, Vec<u8>>,
    charts: BTreeMap<String, Vec<u8>>,
    passthrough: Vec<ArchiveEntry>,
    entry_order: Vec<String>,
    compression: CompressionInfo,
    namespaces: NamespaceRegistry,
    modified: ModifiedParts,
}

impl HwpxPackage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening package");
        Self::from_archive(&Archive::open(path)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(&Archive::from_bytes(bytes)?)
    }

    /// Build the package model from a decoded archive.
    ///
    /// A malformed container or descriptor is fatal. Manifest items and
    /// chart references that point at missing entries are skipped, and an
    /// XML item that fails to parse is kept as an opaque binary.
    pub fn from_archive(archive: &Archive) -> Result<Self> {
        archive.check_mimetype()?;

        let version = structural_part(archive, VERSION_PATH)?;
        let manifest = structural_part(archive, MANIFEST_PATH)?;
        let container = structural_part(archive, CONTAINER_PATH)?;

        let root_files = container
            .as_ref()
            .map(|c| container::root_files(&c.tree))
            .unwrap_or_default();
        let descriptor_path = container::package_path(&root_files)
            .unwrap_or(CONTENT_PATH)
            .to_string();
        let descriptor = structural_part(archive, &descriptor_path)?;

        let mut binaries = BTreeMap::new();
        for root in container::attachments(&root_files) {
            match archive.get(&root.full_path) {
                Some(bytes) => {
                    binaries.insert(root.full_path.clone(), bytes.to_vec());
                }
                None => debug!(part = %root.full_path, "rootfile not in archive, skipping"),
            }
        }

        let items = descriptor
            .as_ref()
            .map(|d| content::manifest_items(&d.tree))
            .unwrap_or_default();

        let mut parts: Vec<XmlPart> = Vec::new();
        for item in &items {
            let path = item.href.as_str();
            if is_structural(path, &descriptor_path)
                || parts.iter().any(|p| p.path == path)
                || binaries.contains_key(path)
            {
                continue;
            }
            let Some(bytes) = archive.get(path) else {
                debug!(part = %path, "manifest item not in archive, skipping");
                continue;
            };
            if !item.is_xml() {
                binaries.insert(path.to_string(), bytes.to_vec());
                continue;
            }
            match XmlPart::parse(path, item.media_type.as_deref(), bytes) {
                Ok(part) => parts.push(part),
                Err(e) => {
                    warn!(part = %path, error = %e, "content part failed to parse, keeping raw bytes");
                    binaries.insert(path.to_string(), bytes.to_vec());
                }
            }
        }

        let mut charts = BTreeMap::new();
        for part in &parts {
            for id in part.tree.elements() {
                let Some(chart_ref) = part.tree.get(id).and_then(|d| d.attribute(CHART_REF_ATTR))
                else {
                    continue;
                };
                if charts.contains_key(chart_ref)
                    || binaries.contains_key(chart_ref)
                    || parts.iter().any(|p| p.path == chart_ref)
                {
                    continue;
                }
                match archive.get(chart_ref) {
                    Some(bytes) => {
                        charts.insert(chart_ref.to_string(), bytes.to_vec());
                    }
                    None => debug!(part = %part.path, chart = %chart_ref, "chart not in archive, skipping"),
                }
            }
        }

        let mut namespaces = NamespaceRegistry::hwpx();
        for part in [&version, &container, &manifest, &descriptor].into_iter().flatten() {
            namespaces.observe(&part.tree);
        }
        for part in &parts {
            namespaces.observe(&part.tree);
        }

        let mut package = Self {
            version,
            container,
            manifest,
            descriptor,
            descriptor_path,
            items,
            parts,
            binaries,
            charts,
            passthrough: Vec::new(),
            entry_order: archive.names().map(str::to_string).collect(),
            compression: archive.compression_info(),
            namespaces,
            modified: ModifiedParts::new(),
        };
        package.passthrough = archive
            .entries()
            .iter()
            .filter(|e| e.name != MIMETYPE_PATH && !package.claims(&e.name))
            .cloned()
            .collect();

        debug!(
            parts = package.parts.len(),
            binaries = package.binaries.len(),
            charts = package.charts.len(),
            passthrough = package.passthrough.len(),
            "package loaded"
        );
        Ok(package)
    }

    /// Whether `path` is held by the model as a structural, content, binary or chart part.
    fn claims(&self, path: &str) -> bool {
        self.structural_parts().any(|p| p.path == path)
            || self.parts.iter().any(|p| p.path == path)
            || self.binaries.contains_key(path)
            || self.charts.contains_key(path)
    }

    pub fn version(&self) -> Option<&XmlPart> {
        self.version.as_ref()
    }

    pub fn container(&self) -> Option<&XmlPart> {
        self.container.as_ref()
    }

    pub fn manifest(&self) -> Option<&XmlPart> {
        self.manifest.as_ref()
    }

    /// The content descriptor (`Contents/content.hpf` unless the container says otherwise).
    pub fn descriptor(&self) -> Option<&XmlPart> {
        self.descriptor.as_ref()
    }

    pub fn descriptor_path(&self) -> &str {
        &self.descriptor_path
    }

    /// Structural parts that are present, in write order.
    pub fn structural_parts(&self) -> impl Iterator<Item = &XmlPart> {
        [&self.version, &self.container, &self.manifest, &self.descriptor]
            .into_iter()
            .flatten()
    }

    pub fn manifest_items(&self) -> &[ManifestItem] {
        &self.items
    }

    /// Content XML parts in manifest order.
    pub fn parts(&self) -> &[XmlPart] {
        &self.parts
    }

    pub fn part(&self, path: &str) -> Option<&XmlPart> {
        self.parts.iter().find(|p| p.path == path)
    }

    /// Any XML part, structural or content, by path.
    pub fn xml_part(&self, path: &str) -> Option<&XmlPart> {
        self.structural_parts()
            .find(|p| p.path == path)
            .or_else(|| self.part(path))
    }

    /// Mutable access to an XML part. Callers that change a tree directly
    /// must [`mark_modified`](Self::mark_modified) it for the change to be written.
    pub fn xml_part_mut(&mut self, path: &str) -> Option<&mut XmlPart> {
        let structural = [
            &mut self.version,
            &mut self.container,
            &mut self.manifest,
            &mut self.descriptor,
        ];
        for part in structural.into_iter().flatten() {
            if part.path == path {
                return Some(part);
            }
        }
        self.parts.iter_mut().find(|p| p.path == path)
    }

    pub fn binaries(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.binaries
    }

    pub fn binary(&self, path: &str) -> Option<&[u8]> {
        self.binaries.get(path).map(Vec::as_slice)
    }

    /// Chart parts keyed by the reference that named them.
    pub fn charts(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.charts
    }

    pub fn chart(&self, chart_ref: &str) -> Option<&[u8]> {
        self.charts.get(chart_ref).map(Vec::as_slice)
    }

    /// Entries not held by any other part of the model, in archive order.
    pub fn passthrough(&self) -> &[ArchiveEntry] {
        &self.passthrough
    }

    /// Entry names in source archive order.
    pub fn entry_order(&self) -> &[String] {
        &self.entry_order
    }

    pub fn compression_info(&self) -> &CompressionInfo {
        &self.compression
    }

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceRegistry {
        &mut self.namespaces
    }

    pub fn modified(&self) -> &ModifiedParts {
        &self.modified
    }

    pub fn is_modified(&self, path: &str) -> bool {
        self.modified.contains(path)
    }

    pub fn mark_modified(&mut self, path: &str) -> bool {
        self.modified.mark(path)
    }

    /// Re-derive the modified flag of content part `path` from its text.
    pub(crate) fn sync_modified(&mut self, path: &str) -> bool {
        match self.parts.iter().find(|p| p.path == path) {
            Some(part) => self.modified.sync(part),
            None => false,
        }
    }

    /// Content parts and the modified set, borrowed together for editing.
    pub(crate) fn parts_and_tracker_mut(&mut self) -> (&mut [XmlPart], &mut ModifiedParts) {
        (&mut self.parts, &mut self.modified)
    }

    /// Write through a [`CompatibleWriter`](crate::writer::CompatibleWriter) using the
    /// package's own modified set and compression info.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::writer::CompatibleWriter::new(self).write(path)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::writer::CompatibleWriter::new(self).to_bytes()
    }
}

fn is_structural(path: &str, descriptor_path: &str) -> bool {
    path == VERSION_PATH || path == CONTAINER_PATH || path == MANIFEST_PATH || path == descriptor_path
}

/// Parse a structural part. A missing entry is tolerated; malformed XML is a format error.
fn structural_part(archive: &Archive, path: &str) -> Result<Option<XmlPart>> {
    let Some(bytes) = archive.get(path) else {
        warn!(part = %path, "structural part missing");
        return Ok(None);
    };
    XmlPart::parse(path, Some("application/xml"), bytes)
        .map(Some)
        .map_err(|e| e.into_format(path))
}

impl TryFrom<&Archive> for HwpxPackage {
    type Error = HwpxError;

    fn try_from(archive: &Archive) -> Result<Self> {
        Self::from_archive(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::template::BlankTemplate;

    #[test]
    fn blank_template_loads() {
        let archive = BlankTemplate::new().build();
        let package = HwpxPackage::from_archive(&archive).unwrap();

        assert!(package.version().is_some());
        assert!(package.container().is_some());
        assert!(package.manifest().is_some());
        assert_eq!(package.descriptor_path(), CONTENT_PATH);

        let paths: Vec<_> = package.parts().iter().map(|p| p.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["Contents/header.xml", "Contents/section0.xml", "settings.xml"]
        );
        assert!(package.passthrough().is_empty());
        assert!(package.modified().is_empty());
    }

    #[test]
    fn unlisted_entries_pass_through() {
        let mut archive = BlankTemplate::new().build();
        archive.push("Preview/PrvText.txt", b"preview".to_vec(), zip::CompressionMethod::Stored);
        let package = HwpxPackage::from_archive(&archive).unwrap();

        let names: Vec<_> = package.passthrough().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Preview/PrvText.txt"]);
    }

    #[test]
    fn malformed_descriptor_is_fatal() {
        let mut archive = BlankTemplate::new().build();
        archive.push(CONTENT_PATH, b"<opf:package".to_vec(), zip::CompressionMethod::Deflated);
        let err = HwpxPackage::from_archive(&archive).unwrap_err();
        assert!(matches!(err, HwpxError::Format { .. }));
    }

    #[test]
    fn malformed_content_part_becomes_binary() {
        let mut archive = BlankTemplate::new().build();
        archive.push("settings.xml", b"<broken>".to_vec(), zip::CompressionMethod::Deflated);
        let package = HwpxPackage::from_archive(&archive).unwrap();

        assert!(package.part("settings.xml").is_none());
        assert_eq!(package.binary("settings.xml"), Some(&b"<broken>"[..]));
    }

    #[test]
    fn clone_is_independent() {
        let package = HwpxPackage::from_archive(&BlankTemplate::new().build()).unwrap();
        let mut copy = package.clone();
        copy.mark_modified("Contents/section0.xml");

        assert!(copy.is_modified("Contents/section0.xml"));
        assert!(!package.is_modified("Contents/section0.xml"));
    }
}
