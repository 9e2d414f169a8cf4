//! Core domain logic for copyloom.
//! This crate is the single source of truth for business invariants.

pub mod clipboard;
pub mod db;
pub mod extract;
pub mod logging;
pub mod model;
pub mod repo;
pub mod routing;
pub mod service;

pub use clipboard::{export_block_text, ClipboardSink, ClipboardWriteError, SystemClipboard};
pub use extract::{extract_block_text, inline_html_to_text, list_items_to_text};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{Block, BlockBody, BlockId, BlockType, ButtonConfig, ButtonSize, ListStyle};
pub use model::copy::{
    CopyDocument, CopyId, CopyStatus, CopyType, CopyValidationError, NewCopy, WorkspaceId,
};
pub use model::session::{Session, SessionId};
pub use repo::copy_repo::{
    CopyListQuery, CopyRepository, CopySummary, RepoError, RepoResult, SqliteCopyRepository,
};
pub use repo::routing_repo::{
    RoutingConfig, RoutingRepoError, RoutingRepoResult, RoutingStore, SqliteRoutingStore,
};
pub use routing::{
    deliver_best_effort, display_name, icon, tier_of, LogNotificationSink, ModelSwitchNotice,
    ModelSwitchNotifier, ModelTier, Notification, NotificationSeverity, NotificationSink,
    NotifyError,
};
pub use service::copy_service::{CopyService, CopyServiceError};
pub use service::routing_service::{RoutingService, RoutingServiceError, SelectedModel};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
