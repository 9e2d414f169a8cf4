//! Model switch detection across sequential selections.
//!
//! # Responsibility
//! - Track the last model observed by one editing session.
//! - Emit exactly one notice per identifier change, classified by the
//!   new model's tier.
//!
//! # Invariants
//! - The very first observation never emits a notice.
//! - Comparison is on identifier equality, not tier equality; switching
//!   between two flagship models still notifies.
//! - The state transition happens whether or not the notice is delivered.
//! - One notifier instance belongs to exactly one session; sharing an
//!   instance across sessions misattributes transitions.

use crate::routing::notify::{Notification, NotificationSeverity};
use crate::routing::registry::{self, ModelTier};
use serde::{Deserialize, Serialize};

/// How long the toast layer should keep a switch notice on screen.
const SWITCH_NOTICE_DURATION_MS: u32 = 4_000;

/// User-facing payload emitted on a model switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSwitchNotice {
    /// Identifier of the model switched to.
    pub model_id: String,
    /// Resolved display name for the new model.
    pub display_name: String,
    /// Tier of the new model; drives the message wording.
    pub tier: ModelTier,
    /// Glyph matching the tier.
    pub icon: String,
    /// Whether the system picked this model rather than the user.
    pub auto_routed: bool,
    /// Complete message ready for display.
    pub message: String,
}

impl ModelSwitchNotice {
    /// Renders the channel-facing toast payload for this notice.
    ///
    /// Switch notices are informational; the tier glyph rides along so
    /// the channel can show it next to the message.
    pub fn to_notification(&self) -> Notification {
        Notification {
            severity: NotificationSeverity::Info,
            message: self.message.clone(),
            glyph: Some(self.icon.clone()),
            duration_ms: SWITCH_NOTICE_DURATION_MS,
        }
    }
}

/// Tracks model selections for one editing session.
///
/// Starts unset; holds the last observed identifier afterwards. Never
/// persisted, so a process restart resets it.
#[derive(Debug, Default)]
pub struct ModelSwitchNotifier {
    last_model: Option<String>,
}

impl ModelSwitchNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one model selection and reports whether it is a switch.
    ///
    /// Returns `None` on the first observation and whenever the
    /// identifier matches the previous one. Returns one notice when the
    /// identifier changed; the caller decides how to deliver it. The
    /// internal state advances unconditionally.
    pub fn observe(&mut self, model_id: &str, auto_routed: bool) -> Option<ModelSwitchNotice> {
        let switched = match self.last_model.as_deref() {
            None => false,
            Some(last) => last != model_id,
        };
        let first = self.last_model.is_none();
        self.last_model = Some(model_id.to_string());

        if first || !switched {
            return None;
        }
        Some(build_notice(model_id, auto_routed))
    }

    /// Returns the last observed model identifier, if any.
    pub fn last_model(&self) -> Option<&str> {
        self.last_model.as_deref()
    }
}

fn build_notice(model_id: &str, auto_routed: bool) -> ModelSwitchNotice {
    let tier = registry::tier_of(model_id);
    let display_name = registry::display_name(model_id);
    let wording = match tier {
        ModelTier::Flagship => "higher quality, higher cost",
        ModelTier::Economy => "faster, cheaper",
    };
    let mut message = format!("Switched to {display_name}: {wording}");
    if auto_routed {
        message.push_str(" (selected automatically)");
    }

    ModelSwitchNotice {
        model_id: model_id.to_string(),
        display_name,
        tier,
        icon: registry::icon(model_id).to_string(),
        auto_routed,
        message,
    }
}
