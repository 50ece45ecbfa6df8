//! User-facing notifications
//!
//! Export results are reported as transient notifications. How they are
//! presented is up to the [`Notifier`] implementation.

/// Outcome notification for one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// PDF was generated and delivered
    ExportSucceeded { title: String, filename: String },

    /// Export failed; the message is the generic user text
    ExportFailed { message: String },
}

impl Notification {
    /// Short headline
    pub fn title(&self) -> &'static str {
        match self {
            Notification::ExportSucceeded { .. } => "PDF Generated Successfully!",
            Notification::ExportFailed { .. } => "PDF Generation Failed",
        }
    }

    /// Longer description shown under the headline
    pub fn description(&self) -> String {
        match self {
            Notification::ExportSucceeded { filename, .. } => {
                format!("Downloaded as {}", filename)
            }
            Notification::ExportFailed { message } => message.clone(),
        }
    }
}

/// Receiver of notifications
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Reports notifications through the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match &notification {
            Notification::ExportSucceeded { title, .. } => log::info!(
                "{}: {} ({})",
                notification.title(),
                notification.description(),
                title
            ),
            Notification::ExportFailed { .. } => {
                log::error!("{}: {}", notification.title(), notification.description())
            }
        }
    }
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_text() {
        let n = Notification::ExportSucceeded {
            title: "Doc".to_string(),
            filename: "doc-2024-01-01T00-00-00.pdf".to_string(),
        };
        assert_eq!(n.title(), "PDF Generated Successfully!");
        assert_eq!(n.description(), "Downloaded as doc-2024-01-01T00-00-00.pdf");
        assert!(matches!(n, Notification::ExportSucceeded { .. }));
    }

    #[test]
    fn test_failure_text() {
        let n = Notification::ExportFailed {
            message: "try again".to_string(),
        };
        assert_eq!(n.title(), "PDF Generation Failed");
        assert_eq!(n.description(), "try again");
        assert!(matches!(n, Notification::ExportFailed { .. }));
    }

    #[test]
    fn test_vec_collects() {
        let mut sink: Vec<Notification> = Vec::new();
        sink.notify(Notification::ExportFailed {
            message: "x".to_string(),
        });
        assert_eq!(sink.len(), 1);
    }
}
