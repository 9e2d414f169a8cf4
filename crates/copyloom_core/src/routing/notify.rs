//! Best-effort delivery of model switch notices.
//!
//! # Responsibility
//! - Define the outbound channel contract for user-facing notifications.
//! - Keep delivery failures away from the notifier's state machine.
//!
//! # Invariants
//! - Delivery failure is logged and swallowed, never propagated.

use crate::routing::notifier::ModelSwitchNotice;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error raised when a delivery channel cannot accept a notification.
#[derive(Debug)]
pub enum NotifyError {
    ChannelUnavailable(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelUnavailable(detail) => {
                write!(f, "notification channel unavailable: {detail}")
            }
        }
    }
}

impl Error for NotifyError {}

/// Severity tag a delivery channel renders (toast color, log level).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSeverity {
    Info,
    Warning,
    Error,
}

impl NotificationSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Display for NotificationSeverity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel-facing payload: severity, message, optional glyph, duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: NotificationSeverity,
    pub message: String,
    pub glyph: Option<String>,
    pub duration_ms: u32,
}

/// Outbound channel for user-facing notifications. Fire-and-forget; the
/// core never waits for an acknowledgment.
pub trait NotificationSink {
    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Delivery channel that writes notifications to the application log.
#[derive(Debug, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            "event=model_switch module=routing status=ok severity={} glyph={} duration_ms={} message={}",
            notification.severity,
            notification.glyph.as_deref().unwrap_or("-"),
            notification.duration_ms,
            notification.message
        );
        Ok(())
    }
}

/// Renders a switch notice into its toast payload and delivers it,
/// swallowing channel failures.
///
/// The caller's state transition already happened; an unavailable
/// channel must not undo or crash it.
pub fn deliver_best_effort(sink: &mut dyn NotificationSink, notice: &ModelSwitchNotice) {
    let notification = notice.to_notification();
    if let Err(err) = sink.deliver(&notification) {
        error!(
            "event=model_switch module=routing status=error error_code=notify_failed error={err}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{
        deliver_best_effort, LogNotificationSink, Notification, NotificationSink, NotifyError,
    };
    use crate::routing::notifier::ModelSwitchNotifier;

    struct DeadChannel;

    impl NotificationSink for DeadChannel {
        fn deliver(&mut self, _notification: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::ChannelUnavailable("toast layer gone".to_string()))
        }
    }

    #[test]
    fn delivery_failure_does_not_disturb_notifier_state() {
        let mut notifier = ModelSwitchNotifier::new();
        notifier.observe("openai/gpt-5", false);

        let notice = notifier
            .observe("openai/gpt-5-mini", false)
            .expect("switch should notify");
        deliver_best_effort(&mut DeadChannel, &notice);

        assert_eq!(notifier.last_model(), Some("openai/gpt-5-mini"));
        assert!(notifier.observe("openai/gpt-5-mini", false).is_none());
    }

    #[test]
    fn log_sink_accepts_rendered_notifications() {
        let mut notifier = ModelSwitchNotifier::new();
        notifier.observe("a/one", false);
        let notice = notifier.observe("a/two", true).expect("switch should notify");

        let mut sink = LogNotificationSink;
        assert!(sink.deliver(&notice.to_notification()).is_ok());
    }
}
