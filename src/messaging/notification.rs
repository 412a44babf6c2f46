// Notification system for non-fatal advisories surfaced to the UI

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Which part of the system raised the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum NotificationCategory {
    Provider,
    Sequence,
    Transport,
    Engine,
}

/// Notification with timestamp and metadata
#[derive(Debug, Clone, serde::Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    pub timestamp: i64, // Unix timestamp in milliseconds
}

impl Notification {
    /// Creates a notification stamped with the current time
    pub fn new(level: NotificationLevel, category: NotificationCategory, message: String) -> Self {
        Self {
            level,
            category,
            message,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn info(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Info, category, message)
    }

    pub fn warning(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Warning, category, message)
    }

    pub fn error(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Error, category, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_creation() {
        let notif = Notification::warning(
            NotificationCategory::Provider,
            "using synthetic sequence".to_string(),
        );

        assert_eq!(notif.level, NotificationLevel::Warning);
        assert_eq!(notif.category, NotificationCategory::Provider);
        assert_eq!(notif.message, "using synthetic sequence");
        assert!(notif.timestamp > 0);
    }

    #[test]
    fn test_notification_helpers() {
        let info = Notification::info(NotificationCategory::Transport, "Info".to_string());
        let error = Notification::error(NotificationCategory::Sequence, "Error".to_string());

        assert_eq!(info.level, NotificationLevel::Info);
        assert_eq!(error.level, NotificationLevel::Error);
    }
}
