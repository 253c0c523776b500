//! Block classifier
//!
//! Groups raw lines into [`LogicalUnit`]s. The classifier is a small state
//! machine threaded through the input one line at a time:
//!
//! ```rust
//! use pagedigest_core::markdown::BlockClassifier;
//! use pagedigest_core::models::LogicalUnit;
//!
//! let units = "# Title\nbody"
//!     .lines()
//!     .fold(BlockClassifier::new(), BlockClassifier::feed)
//!     .finish();
//! assert_eq!(units.len(), 2);
//! assert!(matches!(units[0], LogicalUnit::Heading { level: 1, .. }));
//! ```
//!
//! Heading levels are kept raw (1..=6); capping to the remote format happens
//! in the renderer.

use crate::models::{ListKind, LogicalUnit};
use regex::Regex;
use std::sync::LazyLock;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s+(.+)$").unwrap());
static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.+)$").unwrap());

/// What a single input line is, checked in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    Item { kind: ListKind, text: &'a str },
    Text(&'a str),
}

/// Classify one line
///
/// Leading and trailing whitespace is ignored, so indented (nested) list
/// items flatten into the surrounding list.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }

    if let Some(captures) = HEADING_RE.captures(line) {
        if let (Some(hashes), Some(text)) = (captures.get(1), captures.get(2)) {
            return LineKind::Heading {
                level: hashes.as_str().len() as u8,
                text: text.as_str(),
            };
        }
    }

    if let Some(text) = BULLET_RE.captures(line).and_then(|c| c.get(1)) {
        return LineKind::Item {
            kind: ListKind::Bulleted,
            text: text.as_str(),
        };
    }

    if let Some(text) = NUMBERED_RE.captures(line).and_then(|c| c.get(1)) {
        return LineKind::Item {
            kind: ListKind::Numbered,
            text: text.as_str(),
        };
    }

    LineKind::Text(line)
}

/// Line-scanning state: pending paragraph lines, pending list items and the
/// kind of the pending list
#[derive(Debug, Default)]
pub struct BlockClassifier {
    paragraph: Vec<String>,
    list: Vec<String>,
    list_kind: Option<ListKind>,
    units: Vec<LogicalUnit>,
}

impl BlockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line and return the advanced state
    pub fn feed(mut self, line: &str) -> Self {
        match classify_line(line) {
            LineKind::Blank => {
                self.flush_paragraph();
                self.flush_list();
            }
            LineKind::Heading { level, text } => {
                self.flush_paragraph();
                self.flush_list();
                self.units.push(LogicalUnit::Heading {
                    level,
                    text: text.to_string(),
                });
            }
            LineKind::Item { kind, text } => {
                self.flush_paragraph();
                if self.list_kind.is_some_and(|pending| pending != kind) {
                    self.flush_list();
                }
                self.list.push(text.to_string());
                self.list_kind = Some(kind);
            }
            LineKind::Text(text) => {
                self.flush_list();
                self.paragraph.push(text.to_string());
            }
        }
        self
    }

    /// Units emitted so far (pending paragraph/list not included)
    pub fn units(&self) -> &[LogicalUnit] {
        &self.units
    }

    /// Flush whatever is still pending and return all units in order
    pub fn finish(mut self) -> Vec<LogicalUnit> {
        self.flush_paragraph();
        self.flush_list();
        self.units
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.paragraph);
        if lines.join("\n").trim().is_empty() {
            return;
        }
        self.units.push(LogicalUnit::Paragraph { lines });
    }

    fn flush_list(&mut self) {
        let Some(kind) = self.list_kind.take() else {
            return;
        };
        for text in std::mem::take(&mut self.list) {
            self.units.push(LogicalUnit::ListItem { kind, text });
        }
    }
}

/// Classify a whole document
pub fn classify(text: &str) -> Vec<LogicalUnit> {
    text.lines()
        .fold(BlockClassifier::new(), BlockClassifier::feed)
        .finish()
}
