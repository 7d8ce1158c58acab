//! Desktop delivery of alarm reminders.
//!
//! The alarm engine decides *what* is due; this module only delivers.
//! Delivery failures are logged and never fatal: a reminder that could not
//! be shown stays marked as fired, matching the at-most-once policy.

use std::time::Duration;

use notify_rust::Notification;
#[cfg(target_os = "linux")]
use notify_rust::Urgency;
use tracing::{debug, error, info};

use crate::alarm::Reminder;

/// Configuration for reminder delivery.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Application name shown by the notification daemon.
    pub app_name: String,
    /// Notification timeout in seconds.
    pub timeout_secs: u32,
    /// Whether delivery is enabled at all.
    pub enabled: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            app_name: "aptbook".to_string(),
            timeout_secs: 10,
            enabled: true,
        }
    }
}

impl NotifyConfig {
    /// Builder: set app name.
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Builder: set timeout.
    pub fn with_timeout(mut self, secs: u32) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Builder: enable or disable delivery.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Sends desktop notifications for due reminders.
#[derive(Debug, Clone)]
pub struct ReminderNotifier {
    config: NotifyConfig,
}

impl ReminderNotifier {
    /// Creates a notifier with the given configuration.
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    /// Delivers each reminder; returns how many were shown.
    pub fn deliver(&self, reminders: &[Reminder]) -> usize {
        if !self.config.enabled {
            if !reminders.is_empty() {
                debug!(count = reminders.len(), "notifications disabled, dropping reminders");
            }
            return 0;
        }

        reminders
            .iter()
            .filter(|reminder| self.send(reminder))
            .count()
    }

    fn send(&self, reminder: &Reminder) -> bool {
        let body = format!("Scheduled for {}", reminder.scheduled_for);

        let mut notification = Notification::new();
        notification
            .appname(&self.config.app_name)
            .summary(&reminder.title)
            .body(&body)
            .timeout(Duration::from_secs(u64::from(self.config.timeout_secs)));

        #[cfg(target_os = "linux")]
        notification.urgency(Urgency::Normal);

        match notification.show() {
            Ok(_) => {
                info!(
                    id = reminder.appointment_id,
                    title = %reminder.title,
                    "reminder delivered"
                );
                true
            }
            Err(e) => {
                error!(
                    error = %e,
                    id = reminder.appointment_id,
                    title = %reminder.title,
                    "failed to deliver reminder"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn reminder(id: u64) -> Reminder {
        Reminder {
            appointment_id: id,
            title: format!("Appointment {id}"),
            starts_at: Local::now(),
            scheduled_for: "February 5, 2025 at 10:00 AM".to_string(),
        }
    }

    #[test]
    fn config_defaults() {
        let config = NotifyConfig::default();
        assert_eq!(config.app_name, "aptbook");
        assert!(config.enabled);
    }

    #[test]
    fn config_builders() {
        let config = NotifyConfig::default()
            .with_app_name("test")
            .with_timeout(3)
            .with_enabled(false);
        assert_eq!(config.app_name, "test");
        assert_eq!(config.timeout_secs, 3);
        assert!(!config.enabled);
    }

    #[test]
    fn disabled_notifier_delivers_nothing() {
        let notifier = ReminderNotifier::new(NotifyConfig::default().with_enabled(false));
        assert_eq!(notifier.deliver(&[reminder(1), reminder(2)]), 0);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let notifier = ReminderNotifier::new(NotifyConfig::default());
        assert_eq!(notifier.deliver(&[]), 0);
    }
}
