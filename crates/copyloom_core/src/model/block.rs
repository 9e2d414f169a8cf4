//! Block domain model.
//!
//! # Responsibility
//! - Define the typed content unit a copy session is assembled from.
//! - Carry per-kind rendering configuration without a shared config bag.
//!
//! # Invariants
//! - `BlockBody::List` is the only variant holding a sequence of entries;
//!   every other variant holds one inline-markup string.
//! - Serialized form is tagged by `type`; unknown keys in incoming data are
//!   ignored, never rejected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable block identifier. Unique within one session, not globally.
pub type BlockId = Uuid;

/// Closed set of block categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    /// Paragraph text.
    Text,
    /// Primary heading.
    Headline,
    /// Secondary heading.
    Subheadline,
    /// Ordered entries rendered as a list.
    List,
    /// Call-to-action button.
    Button,
}

impl BlockType {
    /// Returns the stable lowercase label used in storage and wire data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Headline => "headline",
            Self::Subheadline => "subheadline",
            Self::List => "list",
            Self::Button => "button",
        }
    }

    /// Parses a stable label back into a block type.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "headline" => Some(Self::Headline),
            "subheadline" => Some(Self::Subheadline),
            "list" => Some(Self::List),
            "button" => Some(Self::Button),
            _ => None,
        }
    }
}

/// Marker style for list blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStyle {
    #[default]
    Bullet,
    Numbered,
}

/// Size preset for button blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Rendering configuration legal for button blocks only.
///
/// Wire keys keep the original camelCase naming so existing documents
/// deserialize unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonConfig {
    /// CSS color for the button background.
    pub background_color: Option<String>,
    /// CSS color for the label text.
    pub text_color: Option<String>,
    /// Size preset.
    #[serde(rename = "buttonSize")]
    pub size: ButtonSize,
    /// Target URL opened on click.
    pub link: Option<String>,
}

/// Typed content payload; each variant carries only its legal configuration.
///
/// The `content`-is-a-sequence-iff-list invariant of the source model is
/// structural here: only `List` holds entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockBody {
    /// Paragraph text with inline markup.
    Text { content: String },
    /// Primary heading with inline markup.
    Headline { content: String },
    /// Secondary heading with inline markup.
    Subheadline { content: String },
    /// Ordered plain-string entries; serialized under `content` like the
    /// other variants.
    List {
        #[serde(rename = "content", default)]
        items: Vec<String>,
        #[serde(rename = "listStyle", default)]
        style: ListStyle,
    },
    /// Button; `content` is the label.
    Button {
        content: String,
        #[serde(default)]
        config: ButtonConfig,
    },
}

impl BlockBody {
    /// One-line text body.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Primary heading body.
    pub fn headline(content: impl Into<String>) -> Self {
        Self::Headline {
            content: content.into(),
        }
    }

    /// Secondary heading body.
    pub fn subheadline(content: impl Into<String>) -> Self {
        Self::Subheadline {
            content: content.into(),
        }
    }

    /// List body with the default bullet style.
    pub fn list(items: Vec<String>) -> Self {
        Self::List {
            items,
            style: ListStyle::default(),
        }
    }

    /// Button body with default configuration.
    pub fn button(label: impl Into<String>) -> Self {
        Self::Button {
            content: label.into(),
            config: ButtonConfig::default(),
        }
    }

    /// Returns the category tag for this body.
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Text { .. } => BlockType::Text,
            Self::Headline { .. } => BlockType::Headline,
            Self::Subheadline { .. } => BlockType::Subheadline,
            Self::List { .. } => BlockType::List,
            Self::Button { .. } => BlockType::Button,
        }
    }
}

/// Atomic content unit within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Stable id, unique within the owning session.
    pub id: BlockId,
    /// Typed payload and per-kind configuration.
    #[serde(flatten)]
    pub body: BlockBody,
}

impl Block {
    /// Creates a block with a generated id.
    pub fn new(body: BlockBody) -> Self {
        Self::with_id(Uuid::new_v4(), body)
    }

    /// Creates a block with a caller-provided id.
    ///
    /// Used by storage and import paths where identity already exists.
    pub fn with_id(id: BlockId, body: BlockBody) -> Self {
        Self { id, body }
    }

    /// Returns the category tag for this block.
    pub fn block_type(&self) -> BlockType {
        self.body.block_type()
    }
}
