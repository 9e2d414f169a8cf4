//! Copy (document) domain model.
//!
//! # Responsibility
//! - Define the top-level user artifact: ordered sessions plus metadata.
//! - Validate structural invariants before persistence.
//!
//! # Invariants
//! - Session order is the canonical reading order.
//! - Session ids are unique within one copy; block ids within one session.
//! - An empty session list is valid (freshly created copy).
//! - Timestamps are storage-owned epoch milliseconds.

use crate::model::block::BlockId;
use crate::model::session::{Session, SessionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable copy identifier.
pub type CopyId = Uuid;

/// Opaque reference to the owning workspace.
pub type WorkspaceId = Uuid;

/// Closed set of copy categories; routing defaults are keyed on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyType {
    Ad,
    Email,
    LandingPage,
    ProductDescription,
    SocialPost,
}

impl CopyType {
    /// Every category in ascending label order.
    pub const ALL: [CopyType; 5] = [
        CopyType::Ad,
        CopyType::Email,
        CopyType::LandingPage,
        CopyType::ProductDescription,
        CopyType::SocialPost,
    ];

    /// Returns the stable lowercase label used in storage and wire data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ad => "ad",
            Self::Email => "email",
            Self::LandingPage => "landing_page",
            Self::ProductDescription => "product_description",
            Self::SocialPost => "social_post",
        }
    }

    /// Parses a stable label back into a copy type.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ad" => Some(Self::Ad),
            "email" => Some(Self::Email),
            "landing_page" => Some(Self::LandingPage),
            "product_description" => Some(Self::ProductDescription),
            "social_post" => Some(Self::SocialPost),
            _ => None,
        }
    }
}

impl Display for CopyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    Draft,
    Published,
}

impl CopyStatus {
    /// Returns the stable lowercase label used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Parses a stable label back into a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

/// Structural validation failures raised before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyValidationError {
    /// Title is empty after trim.
    BlankTitle,
    /// Two sessions share one id.
    DuplicateSessionId(SessionId),
    /// Two blocks share one id inside the same session.
    DuplicateBlockId {
        session_id: SessionId,
        block_id: BlockId,
    },
}

impl Display for CopyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "copy title must not be blank"),
            Self::DuplicateSessionId(id) => write!(f, "duplicate session id: {id}"),
            Self::DuplicateBlockId {
                session_id,
                block_id,
            } => write!(
                f,
                "duplicate block id {block_id} within session {session_id}"
            ),
        }
    }
}

impl Error for CopyValidationError {}

/// Top-level user artifact composed of ordered sessions.
///
/// Named `CopyDocument` rather than plain `Copy` to stay clear of the
/// `Copy` trait in the prelude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyDocument {
    /// Stable global id.
    pub id: CopyId,
    /// Owning workspace reference.
    pub workspace_id: WorkspaceId,
    /// User-facing title.
    pub title: String,
    /// Category driving routing defaults.
    pub copy_type: CopyType,
    /// Sessions in canonical reading order.
    pub sessions: Vec<Session>,
    /// Publication state.
    pub status: CopyStatus,
    /// Whether this copy serves as a reusable template.
    pub is_template: bool,
    /// Opaque author identity supplied by the auth collaborator.
    pub created_by: Option<String>,
    /// Epoch ms; set by storage on create, zero until first read-back.
    pub created_at: i64,
    /// Epoch ms; bumped by storage on every write.
    pub updated_at: i64,
}

impl CopyDocument {
    /// Creates an empty draft copy with a generated id.
    pub fn new(workspace_id: WorkspaceId, title: impl Into<String>, copy_type: CopyType) -> Self {
        Self::with_id(Uuid::new_v4(), workspace_id, title, copy_type)
    }

    /// Creates an empty draft copy with a caller-provided id.
    pub fn with_id(
        id: CopyId,
        workspace_id: WorkspaceId,
        title: impl Into<String>,
        copy_type: CopyType,
    ) -> Self {
        Self {
            id,
            workspace_id,
            title: title.into(),
            copy_type,
            sessions: Vec::new(),
            status: CopyStatus::Draft,
            is_template: false,
            created_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Appends one session at the end.
    pub fn push_session(&mut self, session: Session) {
        self.sessions.push(session);
    }

    /// Inserts one session at `index`, clamped to the current length.
    pub fn insert_session(&mut self, index: usize, session: Session) {
        let index = index.min(self.sessions.len());
        self.sessions.insert(index, session);
    }

    /// Removes one session by id and returns it when present.
    pub fn remove_session(&mut self, id: SessionId) -> Option<Session> {
        let index = self.sessions.iter().position(|session| session.id == id)?;
        Some(self.sessions.remove(index))
    }

    /// Moves one session to `target_index` (clamped), keeping the relative
    /// order of all others. Returns `false` when the id is unknown.
    pub fn move_session(&mut self, id: SessionId, target_index: usize) -> bool {
        let Some(index) = self.sessions.iter().position(|session| session.id == id) else {
            return false;
        };
        let session = self.sessions.remove(index);
        let target = target_index.min(self.sessions.len());
        self.sessions.insert(target, session);
        true
    }

    /// Returns one session by id.
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == id)
    }

    /// Returns one session by id for in-place editing.
    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|session| session.id == id)
    }

    /// Checks structural invariants.
    ///
    /// Repositories call this before every write; reads reject persisted
    /// state that no longer passes.
    pub fn validate(&self) -> Result<(), CopyValidationError> {
        if self.title.trim().is_empty() {
            return Err(CopyValidationError::BlankTitle);
        }

        let mut session_ids = HashSet::new();
        for session in &self.sessions {
            if !session_ids.insert(session.id) {
                return Err(CopyValidationError::DuplicateSessionId(session.id));
            }
            let mut block_ids = HashSet::new();
            for block in &session.blocks {
                if !block_ids.insert(block.id) {
                    return Err(CopyValidationError::DuplicateBlockId {
                        session_id: session.id,
                        block_id: block.id,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Request model for creating one copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCopy {
    /// Owning workspace reference.
    pub workspace_id: WorkspaceId,
    /// Title for the new copy; must not be blank.
    pub title: String,
    /// Category driving routing defaults.
    pub copy_type: CopyType,
    /// Whether the copy is created as a template.
    pub is_template: bool,
    /// Opaque author identity.
    pub created_by: Option<String>,
}
