//! Markdown to Block Conversion
//!
//! A deliberately small markdown dialect, enough for generated summaries:
//!
//! - `inline` - bold / italic / bold+italic / inline code runs
//! - `classify` - headings, bulleted and numbered items, paragraphs
//! - `chunk` - splitting oversized paragraphs at natural boundaries
//! - `render` - typed blocks ready for the remote store
//!
//! Tables, links, images, block quotes and nested structure are not
//! recognized; such lines come through as paragraph text. None of these
//! functions fail: any input yields blocks (possibly none).

pub mod chunk;
pub mod classify;
pub mod inline;
pub mod render;

pub use chunk::{split_paragraph, DEFAULT_MAX_CHUNK_CHARS};
pub use classify::{classify, classify_line, BlockClassifier, LineKind};
pub use inline::tokenize;
pub use render::{markdown_to_blocks, render_units};
