//! Transient desktop notifications.

use std::time::Duration;

use notify_rust::{Notification, Timeout};

pub trait Notifier {
    fn notify(&self, title: &str, body: &str);
}

#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    appname: String,
    timeout: Duration,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new(appname: impl Into<String>, timeout: Duration) -> Self {
        Self {
            appname: appname.into(),
            timeout,
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        let title = title.to_string();
        let body = body.to_string();
        let appname = self.appname.clone();
        let timeout = Timeout::Milliseconds(self.timeout.as_millis().min(u32::MAX as u128) as u32);

        // Showing can block on the notification daemon.
        tokio::task::spawn_blocking(move || {
            if let Err(e) = Notification::new()
                .summary(&title)
                .body(&body)
                .appname(&appname)
                .timeout(timeout)
                .show()
            {
                tracing::warn!("Failed to show notification: {}", e);
            }
        });
    }
}
