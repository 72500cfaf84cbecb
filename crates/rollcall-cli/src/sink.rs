//! Terminal notification sink.

use std::io::{self, Write};

use rollcall_core::{Notification, NotificationSink, Severity};

/// Prints notifications as they arrive: errors to stderr, the rest to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&mut self, notification: Notification) {
        let line = format_notification(&notification);
        let written = if notification.severity == Severity::Error {
            writeln!(io::stderr().lock(), "{line}")
        } else {
            writeln!(io::stdout().lock(), "{line}")
        };
        if let Err(err) = written {
            tracing::debug!(error = %err, "failed to print notification");
        }
    }
}

/// One line of terminal output for `notification`.
pub fn format_notification(notification: &Notification) -> String {
    let marker = match notification.severity {
        Severity::Success => "✓",
        Severity::Info => "·",
        Severity::Warning => "warning:",
        Severity::Error => "error:",
    };
    format!("{marker} {}", notification.message)
}
