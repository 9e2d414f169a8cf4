//! Domain model for marketing copy documents.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one typed shape for the copy -> session -> block hierarchy.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - `Vec` order is authoritative for sessions within a copy and for
//!   blocks within a session.

pub mod block;
pub mod copy;
pub mod session;

pub use block::{Block, BlockBody, BlockId, BlockType, ButtonConfig, ButtonSize, ListStyle};
pub use copy::{
    CopyDocument, CopyId, CopyStatus, CopyType, CopyValidationError, NewCopy, WorkspaceId,
};
pub use session::{Session, SessionId};
