//! Personal data in log output.
//!
//! Person names only reach the log when the process opted in with
//! [`set_log_data`]; otherwise [`redact_value`] substitutes a placeholder.

use std::sync::atomic::{AtomicBool, Ordering};

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when personal data logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Allow or forbid personal data in log output for the whole process.
pub fn set_log_data(enabled: bool) {
    LOG_DATA_ENABLED.store(enabled, Ordering::Release);
}

/// Returns true if personal data may be logged.
pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Acquire)
}

/// Returns the input value when personal data logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction_follows_flag() {
        set_log_data(false);
        assert_eq!(redact_value("Ana García"), REDACTED_VALUE);
        set_log_data(true);
        assert_eq!(redact_value("Ana García"), "Ana García");
        set_log_data(false);
    }
}
