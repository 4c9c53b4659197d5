//! Text edits applied through the text-node index.
//!
//! Every operation writes only into existing text nodes and leaves structure,
//! attributes and empty slots alone. A part is marked modified while its text
//! differs from the parsed value, so an edit that is later undone leaves the
//! part to be copied verbatim.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use memchr::memmem;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::package::HwpxPackage;
use crate::text::element_runs;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Apply `f` to every non-empty text slot in enumeration order.
///
/// Returns the number of slots whose value changed.
pub fn transform_text<F>(package: &mut HwpxPackage, mut f: F) -> usize
where
    F: FnMut(&str) -> String,
{
    let (parts, modified) = package.parts_and_tracker_mut();
    let mut changed = 0;

    for part in parts.iter_mut() {
        let mut part_changed = false;
        let runs: Vec<_> = part
            .tree
            .elements()
            .flat_map(|element| element_runs(&part.tree, element))
            .map(|(_, node)| node)
            .collect();
        for node in runs {
            let Some(current) = part.tree.text(node) else {
                continue;
            };
            let updated = f(current);
            if updated != current {
                part.tree.set_text(node, &updated);
                changed += 1;
                part_changed = true;
            }
        }
        if part_changed {
            modified.sync(part);
        }
    }

    debug!(changed, "transform applied");
    changed
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplaceOptions {
    pub case_sensitive: bool,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

impl ReplaceOptions {
    pub fn case_insensitive() -> Self {
        Self {
            case_sensitive: false,
        }
    }
}

/// Replace every literal occurrence of `search` in every text slot.
///
/// Returns the total number of occurrences replaced. An empty `search`
/// replaces nothing. Matches never span two slots.
pub fn replace_text(
    package: &mut HwpxPackage,
    search: &str,
    replacement: &str,
    options: ReplaceOptions,
) -> Result<usize> {
    if search.is_empty() {
        return Ok(0);
    }

    let mut occurrences = 0;
    if options.case_sensitive {
        let finder = memmem::Finder::new(search.as_bytes());
        transform_text(package, |text| {
            let found = finder.find_iter(text.as_bytes()).count();
            if found == 0 {
                return text.to_string();
            }
            occurrences += found;
            text.replace(search, replacement)
        });
    } else {
        let pattern = RegexBuilder::new(&regex::escape(search))
            .case_insensitive(true)
            .build()?;
        transform_text(package, |text| {
            let found = pattern.find_iter(text).count();
            if found == 0 {
                return text.to_string();
            }
            occurrences += found;
            pattern.replace_all(text, NoExpand(replacement)).into_owned()
        });
    }

    debug!(search, occurrences, "replace finished");
    Ok(occurrences)
}

pub fn uppercase(package: &mut HwpxPackage) -> usize {
    transform_text(package, str::to_uppercase)
}

pub fn lowercase(package: &mut HwpxPackage) -> usize {
    transform_text(package, str::to_lowercase)
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn collapse_whitespace(package: &mut HwpxPackage) -> usize {
    transform_text(package, |text| {
        WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
    })
}

/// Addresses a text node by part path and global enumeration index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub part: String,
    pub index: usize,
}

impl NodeKey {
    pub fn new(part: &str, index: usize) -> Self {
        Self {
            part: part.to_string(),
            index,
        }
    }
}

/// New value for one text node: a fixed string or a function of the current value.
pub enum Replacement {
    Text(String),
    Transform(Box<dyn Fn(&str) -> String>),
}

impl Replacement {
    pub fn transform(f: impl Fn(&str) -> String + 'static) -> Self {
        Replacement::Transform(Box::new(f))
    }

    fn apply(&self, current: &str) -> String {
        match self {
            Replacement::Text(text) => text.clone(),
            Replacement::Transform(f) => f(current),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Replacement::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

impl From<String> for Replacement {
    fn from(text: String) -> Self {
        Replacement::Text(text)
    }
}

impl From<&str> for Replacement {
    fn from(text: &str) -> Self {
        Replacement::Text(text.to_string())
    }
}

/// Apply replacements to the text nodes their keys address.
///
/// Keys that match no current node are ignored. Returns the number of
/// nodes whose value changed.
pub fn apply_replacements(
    package: &mut HwpxPackage,
    replacements: &HashMap<NodeKey, Replacement>,
) -> usize {
    if replacements.is_empty() {
        return 0;
    }

    let mut matched: HashSet<NodeKey> = HashSet::new();
    let mut updates: Vec<(String, indextree::NodeId, String)> = Vec::new();
    for node in package.text_nodes() {
        let key = NodeKey::new(node.part, node.index);
        let Some(replacement) = replacements.get(&key) else {
            continue;
        };
        let updated = replacement.apply(node.text);
        if updated != node.text {
            updates.push((key.part.clone(), node.node, updated));
        }
        matched.insert(key);
    }

    for key in replacements.keys().filter(|k| !matched.contains(*k)) {
        debug!(part = %key.part, index = key.index, "replacement key matches no text node");
    }

    let mut changed = 0;
    let mut touched = BTreeSet::new();
    for (path, node, updated) in updates {
        let Some(part) = package.xml_part_mut(&path) else {
            continue;
        };
        if part.tree.set_text(node, &updated) {
            changed += 1;
            touched.insert(path);
        }
    }
    for path in &touched {
        package.sync_modified(path);
    }
    changed
}
