//! Navigation side effect of session teardown
//!
//! Logging out ends in a full navigation to the login entry point. The client
//! issues it through [`Navigator`] so the effect is observable and does not
//! depend on how the caller renders its UI.

use colored::Colorize;

/// Receives full-navigation commands.
pub trait Navigator: Send + Sync {
    /// Navigate to `location`, discarding any state tied to the old session.
    fn navigate(&self, location: &str);
}

/// Terminal rendition of a navigation: tell the user where to sign in again.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, location: &str) {
        eprintln!(
            "{} Signed out. Run {} to sign in again ({}).",
            "→".cyan(),
            "sponsorsclub login".bold(),
            location.dimmed()
        );
    }
}

/// Records navigations instead of performing them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    locations: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every location navigated to, oldest first
    pub fn locations(&self) -> Vec<String> {
        self.locations
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl Navigator for RecordingNavigator {
    fn navigate(&self, location: &str) {
        if let Ok(mut locations) = self.locations.lock() {
            locations.push(location.to_string());
        }
    }
}
