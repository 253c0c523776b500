//! Block Types
//!
//! Types flowing through the rendering pipeline and across the store boundary:
//!
//! - [`StyledRun`] - a contiguous span of text sharing one emphasis style
//! - [`LogicalUnit`] - format-agnostic markdown construct (classifier output)
//! - [`RenderableBlock`] - a typed block ready to be appended remotely
//! - [`BlockSpec`] - anything the reconciler asks a store to create
//! - [`RemoteBlock`] - a child as reported back by a store listing
//!
//! Block payloads use the remote API's JSON shape (`type` discriminator plus a
//! same-named object carrying `rich_text`). Every store encodes and decodes
//! through this module so that section matching behaves identically against
//! the real API and the in-memory store.

use crate::models::ContainerKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Deepest heading level the remote format supports
pub const MAX_HEADING_DEPTH: u8 = 3;

/// Block type used for labeled sections inside a container
pub const SECTION_BLOCK_TYPE: &str = "heading_3";

/// A run of text with one emphasis style
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl StyledRun {
    /// Unstyled run
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Run with explicit style flags
    pub fn styled(text: impl Into<String>, bold: bool, italic: bool, code: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
            code,
        }
    }

    /// Length in characters (not bytes), as the remote per-block limit counts it
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn to_rich_text(&self) -> Value {
        json!({
            "type": "text",
            "text": { "content": self.text },
            "annotations": {
                "bold": self.bold,
                "italic": self.italic,
                "strikethrough": false,
                "underline": false,
                "code": self.code,
                "color": "default"
            }
        })
    }
}

/// Kind of list a list item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bulleted,
    Numbered,
}

/// Intermediate representation of one markdown construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalUnit {
    /// Raw `#` count (1..=6); depth capping happens at render time
    Heading { level: u8, text: String },
    ListItem { kind: ListKind, text: String },
    Paragraph { lines: Vec<String> },
}

/// Closed set of block kinds the renderer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockKind {
    /// Depth is always within 1..=[`MAX_HEADING_DEPTH`]
    Heading { depth: u8 },
    BulletedListItem,
    NumberedListItem,
    Paragraph,
}

impl BlockKind {
    /// Remote type discriminator for this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Heading { depth: 1 } => "heading_1",
            BlockKind::Heading { depth: 2 } => "heading_2",
            BlockKind::Heading { .. } => "heading_3",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::NumberedListItem => "numbered_list_item",
            BlockKind::Paragraph => "paragraph",
        }
    }
}

/// A block ready to be appended under a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderableBlock {
    #[serde(flatten)]
    pub kind: BlockKind,
    pub runs: Vec<StyledRun>,
}

impl RenderableBlock {
    pub fn new(kind: BlockKind, runs: Vec<StyledRun>) -> Self {
        Self { kind, runs }
    }

    /// Heading with its depth clamped into 1..=3
    pub fn heading(level: u8, runs: Vec<StyledRun>) -> Self {
        let depth = level.clamp(1, MAX_HEADING_DEPTH);
        Self::new(BlockKind::Heading { depth }, runs)
    }

    /// Paragraph holding one empty run, used for an empty section body
    pub fn placeholder() -> Self {
        Self::new(BlockKind::Paragraph, vec![StyledRun::plain("")])
    }

    /// Concatenated run text
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    fn to_payload(&self) -> Value {
        let type_name = self.kind.type_name();
        let rich_text: Vec<Value> = self.runs.iter().map(StyledRun::to_rich_text).collect();
        json!({
            "object": "block",
            "type": type_name,
            type_name: {
                "rich_text": rich_text,
                "color": "default"
            }
        })
    }
}

/// Anything the reconciler asks a store to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSpec {
    /// Empty top-level grouping block
    Container(ContainerKind),
    /// Toggleable heading carrying the literal label
    Section { label: String },
    /// Rendered content
    Content(RenderableBlock),
}

impl BlockSpec {
    /// Remote type discriminator the created block will carry
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockSpec::Container(kind) => kind.type_name(),
            BlockSpec::Section { .. } => SECTION_BLOCK_TYPE,
            BlockSpec::Content(block) => block.kind.type_name(),
        }
    }

    /// Encode as a remote block object
    pub fn to_payload(&self) -> Value {
        match self {
            BlockSpec::Container(ContainerKind::Callout) => json!({
                "object": "block",
                "type": "callout",
                "callout": {
                    "rich_text": [],
                    "icon": { "type": "emoji", "emoji": "💡" },
                    "color": "gray_background"
                }
            }),
            BlockSpec::Container(ContainerKind::Toggle) => json!({
                "object": "block",
                "type": "toggle",
                "toggle": { "rich_text": [], "color": "default" }
            }),
            BlockSpec::Container(ContainerKind::Quote) => json!({
                "object": "block",
                "type": "quote",
                "quote": { "rich_text": [], "color": "default" }
            }),
            BlockSpec::Section { label } => json!({
                "object": "block",
                "type": SECTION_BLOCK_TYPE,
                SECTION_BLOCK_TYPE: {
                    "rich_text": [{
                        "type": "text",
                        "text": { "content": label }
                    }],
                    "is_toggleable": true,
                    "color": "default"
                }
            }),
            BlockSpec::Content(block) => block.to_payload(),
        }
    }
}

impl From<RenderableBlock> for BlockSpec {
    fn from(block: RenderableBlock) -> Self {
        BlockSpec::Content(block)
    }
}

/// A direct child as reported by a store listing
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteBlock {
    pub id: String,
    pub block_type: String,
    /// Full block object as returned by the store
    pub payload: Value,
}

impl RemoteBlock {
    /// Build from a remote block object, which must carry `id` and `type`
    pub fn from_payload(payload: Value) -> Option<Self> {
        let id = payload.get("id")?.as_str()?.to_string();
        let block_type = payload.get("type")?.as_str()?.to_string();
        Some(Self {
            id,
            block_type,
            payload,
        })
    }

    /// Typed object under the block's own type key (e.g. `payload["heading_3"]`)
    pub fn typed_payload(&self) -> Option<&Value> {
        self.payload.get(&self.block_type)
    }

    /// Literal content of the first run, when this block is a section marker
    ///
    /// Only toggleable `heading_3` blocks qualify; a plain heading with the
    /// same text is not a section.
    pub fn section_label(&self) -> Option<&str> {
        if self.block_type != SECTION_BLOCK_TYPE {
            return None;
        }
        let typed = self.typed_payload()?;
        if typed.get("is_toggleable").and_then(Value::as_bool) != Some(true) {
            return None;
        }
        typed
            .get("rich_text")?
            .get(0)?
            .get("text")?
            .get("content")?
            .as_str()
    }

    /// Concatenated run content (any block type with `rich_text`)
    pub fn plain_text(&self) -> String {
        self.typed_payload()
            .and_then(|typed| typed.get("rich_text"))
            .and_then(Value::as_array)
            .map(|runs| {
                runs.iter()
                    .filter_map(|run| run.get("text")?.get("content")?.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_depth_is_clamped() {
        assert_eq!(
            RenderableBlock::heading(6, vec![]).kind,
            BlockKind::Heading { depth: 3 }
        );
        assert_eq!(
            RenderableBlock::heading(2, vec![]).kind,
            BlockKind::Heading { depth: 2 }
        );
    }

    #[test]
    fn test_content_payload_shape() {
        let block = RenderableBlock::new(
            BlockKind::BulletedListItem,
            vec![
                StyledRun::styled("Name:", true, false, false),
                StyledRun::plain(" value"),
            ],
        );
        let payload = BlockSpec::from(block).to_payload();

        assert_eq!(payload["type"], "bulleted_list_item");
        let runs = payload["bulleted_list_item"]["rich_text"].as_array().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0]["text"]["content"], "Name:");
        assert_eq!(runs[0]["annotations"]["bold"], true);
        assert_eq!(runs[0]["annotations"]["strikethrough"], false);
        assert_eq!(runs[0]["annotations"]["underline"], false);
        assert_eq!(runs[0]["annotations"]["color"], "default");
        assert_eq!(runs[1]["annotations"]["bold"], false);
    }

    #[test]
    fn test_section_label_roundtrips_through_payload() {
        let mut payload = BlockSpec::Section {
            label: "Summary".to_string(),
        }
        .to_payload();
        payload["id"] = json!("block-1");

        let remote = RemoteBlock::from_payload(payload).unwrap();
        assert_eq!(remote.section_label(), Some("Summary"));
    }

    #[test]
    fn test_plain_heading_is_not_a_section() {
        let mut payload = BlockSpec::Content(RenderableBlock::heading(
            3,
            vec![StyledRun::plain("Summary")],
        ))
        .to_payload();
        payload["id"] = json!("block-1");

        let remote = RemoteBlock::from_payload(payload).unwrap();
        assert_eq!(remote.section_label(), None);
        assert_eq!(remote.plain_text(), "Summary");
    }

    #[test]
    fn test_from_payload_requires_id_and_type() {
        assert!(RemoteBlock::from_payload(json!({ "type": "paragraph" })).is_none());
        assert!(RemoteBlock::from_payload(json!({ "id": "x" })).is_none());
    }

    #[test]
    fn test_rendered_block_serializes_with_kind_tag() {
        let block = RenderableBlock::heading(1, vec![StyledRun::plain("Title")]);
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["kind"], "heading");
        assert_eq!(value["depth"], 1);
        assert_eq!(value["runs"][0]["text"], "Title");
    }
}
