pub mod extract;
pub mod format;
pub mod nodes;

pub use extract::{extract_text, phrases, Phrase};
pub use format::FormatContext;
pub use nodes::{element_runs, phrase_id, slot_owner, text_nodes, TextNode, TextNodes, TextSlot};
