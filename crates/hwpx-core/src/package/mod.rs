pub mod archive;
pub mod container;
pub mod content;
pub mod hwpx;
pub mod parts;
pub mod template;

pub use archive::{Archive, ArchiveEntry, CompressionInfo, MIMETYPE};
pub use content::ManifestItem;
pub use hwpx::HwpxPackage;
pub use parts::{PartOutput, XmlPart};
pub use template::BlankTemplate;
