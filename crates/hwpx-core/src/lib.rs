pub mod edit;
pub mod error;
pub mod package;
pub mod text;
pub mod writer;
pub mod xml;

pub use error::{HwpxError, Result};

pub use edit::{
    apply_replacements, apply_segments, collapse_whitespace, export_segments, lowercase,
    replace_text, segments_from_json, segments_to_json, transform_text, uppercase,
    ModifiedParts, NodeKey, ReplaceOptions, Replacement, TextSegment,
};
pub use package::{Archive, BlankTemplate, CompressionInfo, HwpxPackage, XmlPart};
pub use text::{extract_text, phrases, text_nodes, FormatContext, Phrase, TextNode, TextSlot};
pub use writer::CompatibleWriter;
