//! Leveled message sink
//!
//! Components report precondition failures, configuration problems and
//! internal-consistency diagnostics through `log_message`. Messages are
//! routed to the `log` facade under the `gameplay` target, prefixed with the
//! reporting component's name, so the host decides where they end up.

use core::fmt;

/// Target used for every message emitted by the gameplay layers
pub const LOG_TARGET: &str = "gameplay";

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    /// Recoverable precondition failure
    Warning = 1,
    /// Configuration or internal-consistency problem
    Error = 2,
    /// Informational
    Notification = 4,
}

impl MessageKind {
    /// Matching `log` level
    pub fn level(self) -> log::Level {
        match self {
            Self::Warning => log::Level::Warn,
            Self::Error => log::Level::Error,
            Self::Notification => log::Level::Info,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Notification => "notification",
        };
        f.write_str(s)
    }
}

/// Emit a message on behalf of a named component
pub fn log_message(component: &str, kind: MessageKind, message: impl fmt::Display) {
    log::log!(target: LOG_TARGET, kind.level(), "[{}] {}", component, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_levels() {
        assert_eq!(MessageKind::Warning.level(), log::Level::Warn);
        assert_eq!(MessageKind::Error.level(), log::Level::Error);
        assert_eq!(MessageKind::Notification.level(), log::Level::Info);
    }

    #[test]
    fn test_kind_bits() {
        assert_eq!(MessageKind::Warning as u8, 1);
        assert_eq!(MessageKind::Error as u8, 2);
        assert_eq!(MessageKind::Notification as u8, 4);
        assert_eq!(MessageKind::Notification.to_string(), "notification");
    }

    #[test]
    fn test_log_without_logger_is_silent() {
        log_message("door", MessageKind::Warning, "already active");
    }
}
