pub mod segments;
pub mod tracker;
pub mod transform;

pub use segments::{
    apply_segments, export_segments, segments_from_json, segments_to_json, TextSegment,
};
pub use tracker::ModifiedParts;
pub use transform::{
    apply_replacements, collapse_whitespace, lowercase, replace_text, transform_text, uppercase,
    NodeKey, ReplaceOptions, Replacement,
};
