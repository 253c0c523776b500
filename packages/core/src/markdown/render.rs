//! Block renderer
//!
//! Turns classified units into [`RenderableBlock`]s. Oversized paragraphs are
//! chunked as plain text and every chunk is tokenized on its own, so a split
//! never lands between a pair of emphasis markers.

use crate::markdown::chunk::split_paragraph;
use crate::markdown::classify::classify;
use crate::markdown::inline::{runs_char_len, tokenize};
use crate::models::{BlockKind, ListKind, LogicalUnit, RenderableBlock};

/// Render units in order; `max_chars` caps the text length of one paragraph block
pub fn render_units(units: &[LogicalUnit], max_chars: usize) -> Vec<RenderableBlock> {
    let mut blocks = Vec::with_capacity(units.len());

    for unit in units {
        match unit {
            LogicalUnit::Heading { level, text } => {
                blocks.push(RenderableBlock::heading(*level, tokenize(text)));
            }
            LogicalUnit::ListItem { kind, text } => {
                let kind = match kind {
                    ListKind::Bulleted => BlockKind::BulletedListItem,
                    ListKind::Numbered => BlockKind::NumberedListItem,
                };
                blocks.push(RenderableBlock::new(kind, tokenize(text)));
            }
            LogicalUnit::Paragraph { lines } => {
                render_paragraph(&lines.join("\n"), max_chars, &mut blocks);
            }
        }
    }

    blocks
}

fn render_paragraph(text: &str, max_chars: usize, blocks: &mut Vec<RenderableBlock>) {
    let runs = tokenize(text);
    if runs_char_len(&runs) <= max_chars {
        blocks.push(RenderableBlock::new(BlockKind::Paragraph, runs));
        return;
    }

    for chunk in split_paragraph(text, max_chars) {
        blocks.push(RenderableBlock::new(BlockKind::Paragraph, tokenize(&chunk)));
    }
}

/// Full pipeline: classify `markdown` and render the resulting units
///
/// # Examples
///
/// ```rust
/// use pagedigest_core::markdown::{markdown_to_blocks, DEFAULT_MAX_CHUNK_CHARS};
/// use pagedigest_core::models::BlockKind;
///
/// let blocks = markdown_to_blocks("###### Deep\n\n- **a**", DEFAULT_MAX_CHUNK_CHARS);
/// assert_eq!(blocks[0].kind, BlockKind::Heading { depth: 3 });
/// assert_eq!(blocks[1].kind, BlockKind::BulletedListItem);
/// assert!(blocks[1].runs[0].bold);
/// ```
pub fn markdown_to_blocks(markdown: &str, max_chars: usize) -> Vec<RenderableBlock> {
    render_units(&classify(markdown), max_chars)
}
