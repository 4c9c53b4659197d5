//! Segment export/import for external processing (translation, review).
//!
//! A segment is a self-contained JSON record of one text node. Segments are
//! applied back by `(file, index, attr)`; anything that no longer lines up
//! with the package is skipped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::transform::{apply_replacements, NodeKey, Replacement};
use crate::error::{HwpxError, Result};
use crate::package::HwpxPackage;
use crate::text::{phrase_id, FormatContext, TextSlot};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub index: usize,
    pub file: String,
    pub attr: TextSlot,
    pub text: String,
    #[serde(default)]
    pub format: FormatContext,
    #[serde(default)]
    pub phrase_id: Option<String>,
}

pub fn export_segments(package: &HwpxPackage) -> Vec<TextSegment> {
    package
        .text_nodes()
        .filter_map(|node| {
            let doc = &package.part(node.part)?.tree;
            let owner = node.owner(doc);
            Some(TextSegment {
                index: node.index,
                file: node.part.to_string(),
                attr: node.slot,
                text: node.text.to_string(),
                format: FormatContext::of(doc, owner),
                phrase_id: phrase_id(doc, owner).map(str::to_string),
            })
        })
        .collect()
}

pub fn segments_to_json(segments: &[TextSegment]) -> Result<String> {
    Ok(serde_json::to_string_pretty(segments)?)
}

/// Parse a JSON array of segments.
///
/// A segment whose `text` is present but not a string is rejected with
/// [`HwpxError::UnsupportedContent`].
pub fn segments_from_json(json: &str) -> Result<Vec<TextSegment>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            if let Some(text) = value.get("text") {
                if !text.is_string() {
                    return Err(HwpxError::UnsupportedContent {
                        message: format!(
                            "segment {position} has non-string text ({})",
                            json_kind(text)
                        ),
                    });
                }
            }
            Ok(serde_json::from_value::<TextSegment>(value)?)
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Write segment texts back into the nodes they were exported from.
///
/// Returns the number of nodes whose value changed.
pub fn apply_segments(package: &mut HwpxPackage, segments: &[TextSegment]) -> usize {
    let slots: HashMap<(&str, usize), TextSlot> = package
        .text_nodes()
        .map(|node| ((node.part, node.index), node.slot))
        .collect();

    let mut replacements: HashMap<NodeKey, Replacement> = HashMap::new();
    for segment in segments {
        match slots.get(&(segment.file.as_str(), segment.index)) {
            Some(&slot) if slot == segment.attr => {
                replacements.insert(
                    NodeKey::new(&segment.file, segment.index),
                    Replacement::Text(segment.text.clone()),
                );
            }
            Some(_) => {
                debug!(file = %segment.file, index = segment.index, "segment slot differs, skipping");
            }
            None => {
                debug!(file = %segment.file, index = segment.index, "segment matches no text node, skipping");
            }
        }
    }

    apply_replacements(package, &replacements)
}
