//! Session domain model.
//!
//! # Responsibility
//! - Group blocks into one named, ordered reading unit.
//! - Provide order-preserving editing operations.
//!
//! # Invariants
//! - Block order is significant and survives every operation.
//! - Block ids are unique within one session; `CopyDocument::validate`
//!   enforces it before persistence.

use crate::model::block::{Block, BlockId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable session identifier. Unique within one copy.
pub type SessionId = Uuid;

/// Named, ordered sequence of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable id, unique within the owning copy.
    pub id: SessionId,
    /// User-facing session title.
    pub title: String,
    /// Blocks in canonical reading order.
    pub blocks: Vec<Block>,
}

impl Session {
    /// Creates an empty session with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates an empty session with a caller-provided id.
    pub fn with_id(id: SessionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Appends one block at the end.
    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Inserts one block at `index`, clamped to the current length.
    pub fn insert_block(&mut self, index: usize, block: Block) {
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
    }

    /// Removes one block by id and returns it when present.
    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|block| block.id == id)?;
        Some(self.blocks.remove(index))
    }

    /// Moves one block to `target_index` (clamped), keeping the relative
    /// order of all other blocks. Returns `false` when the id is unknown.
    pub fn move_block(&mut self, id: BlockId, target_index: usize) -> bool {
        let Some(index) = self.blocks.iter().position(|block| block.id == id) else {
            return false;
        };
        let block = self.blocks.remove(index);
        let target = target_index.min(self.blocks.len());
        self.blocks.insert(target, block);
        true
    }

    /// Returns one block by id.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    /// Returns one block by id for in-place editing.
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id == id)
    }
}
