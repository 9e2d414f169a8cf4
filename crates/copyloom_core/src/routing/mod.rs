//! Model routing: tier rules, switch detection, notice delivery.
//!
//! # Responsibility
//! - Classify model identifiers into tiers and resolve display metadata.
//! - Detect sequential model switches and shape user-facing notices.
//!
//! # Invariants
//! - Classification and switch detection never fail.
//! - Notice delivery is best-effort and decoupled from state tracking.

pub mod notifier;
pub mod notify;
pub mod registry;

pub use notifier::{ModelSwitchNotice, ModelSwitchNotifier};
pub use notify::{
    deliver_best_effort, LogNotificationSink, Notification, NotificationSeverity,
    NotificationSink, NotifyError,
};
pub use registry::{display_name, icon, tier_of, ModelTier};
