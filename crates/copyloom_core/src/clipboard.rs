//! Clipboard export for extracted block text.
//!
//! # Responsibility
//! - Write one block's extracted plain text to the platform clipboard.
//! - Report the outcome as a boolean; clipboard trouble never escalates.
//!
//! # Invariants
//! - Extractions that trim to nothing are never written.
//! - Write failures are logged and recovered locally.
//! - Calls are independent; no state survives between exports.

use crate::extract::extract_block_text;
use crate::model::BlockBody;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error raised when the platform clipboard write fails.
#[derive(Debug)]
pub enum ClipboardWriteError {
    /// No clipboard service could be reached on this platform.
    Unavailable(String),
    /// The clipboard service rejected the write.
    WriteRejected(String),
}

impl Display for ClipboardWriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(detail) => write!(f, "clipboard unavailable: {detail}"),
            Self::WriteRejected(detail) => write!(f, "clipboard write rejected: {detail}"),
        }
    }
}

impl Error for ClipboardWriteError {}

/// Platform clipboard write primitive.
///
/// Implementations own whatever handle the platform needs; the export
/// path only ever asks for one plain-text write per call.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardWriteError>;
}

/// Clipboard sink backed by the operating system clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connects to the platform clipboard service.
    ///
    /// # Errors
    /// - Returns `ClipboardWriteError::Unavailable` when no clipboard
    ///   service exists (headless session, unsupported platform).
    pub fn try_new() -> Result<Self, ClipboardWriteError> {
        let inner = arboard::Clipboard::new()
            .map_err(|err| ClipboardWriteError::Unavailable(err.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardWriteError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|err| ClipboardWriteError::WriteRejected(err.to_string()))
    }
}

/// Extracts a block's plain text and writes it to the given sink.
///
/// Returns `false` without touching the sink when extraction yields only
/// whitespace. Returns `false` when the sink rejects the write; the
/// failure is logged, never propagated. Repeating the call with the same
/// input re-writes the same text.
pub fn export_block_text(sink: &mut dyn ClipboardSink, body: &BlockBody) -> bool {
    let text = extract_block_text(body);
    if text.is_empty() {
        info!("event=clipboard_export module=clipboard status=skipped reason=empty_text");
        return false;
    }

    match sink.write_text(&text) {
        Ok(()) => {
            info!(
                "event=clipboard_export module=clipboard status=ok chars={}",
                text.chars().count()
            );
            true
        }
        Err(err) => {
            error!(
                "event=clipboard_export module=clipboard status=error error_code=clipboard_write_failed error={err}"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{export_block_text, ClipboardSink, ClipboardWriteError};
    use crate::model::BlockBody;

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<String>,
    }

    impl ClipboardSink for RecordingSink {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardWriteError> {
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    struct FailingSink;

    impl ClipboardSink for FailingSink {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardWriteError> {
            Err(ClipboardWriteError::WriteRejected("denied".to_string()))
        }
    }

    #[test]
    fn export_writes_extracted_text_and_returns_true() {
        let mut sink = RecordingSink::default();
        let body = BlockBody::text("<p>Hello<br>World</p>");

        assert!(export_block_text(&mut sink, &body));
        assert_eq!(sink.writes, vec!["Hello\nWorld".to_string()]);
    }

    #[test]
    fn export_skips_write_when_extraction_is_blank() {
        let mut sink = RecordingSink::default();
        let body = BlockBody::text("  <div>  </div>  ");

        assert!(!export_block_text(&mut sink, &body));
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn export_returns_false_when_sink_rejects() {
        let mut sink = FailingSink;
        let body = BlockBody::headline("Launch");

        assert!(!export_block_text(&mut sink, &body));
    }

    #[test]
    fn export_is_idempotent_per_call() {
        let mut sink = RecordingSink::default();
        let body = BlockBody::list(vec!["Buy now".to_string(), "Save 20%".to_string()]);

        assert!(export_block_text(&mut sink, &body));
        assert!(export_block_text(&mut sink, &body));
        assert_eq!(sink.writes.len(), 2);
        assert_eq!(sink.writes[0], sink.writes[1]);
        assert_eq!(sink.writes[0], "\u{2022} Buy now\n\u{2022} Save 20%");
    }
}
