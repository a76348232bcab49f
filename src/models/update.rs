use std::time::Instant;

/// Version string the application reports for itself.
pub const CURRENT_VERSION: &str = "1.0.0";

/// Version offered whenever the simulated check finds an update.
pub const SIMULATED_NEW_VERSION: &str = "1.1.0";

/// Snapshot of the simulated self-update cycle.
///
/// Published by [`crate::services::UpdateSimulator`] through a watch channel;
/// only the simulator writes it.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateState {
    pub update_available: bool,
    pub update_downloaded: bool,
    pub checking: bool,
    pub downloading: bool,
    pub current_version: &'static str,
    /// Empty until a check finds an update.
    pub new_version: String,
    /// 0..=100
    pub download_progress: u8,
    pub last_check_time: Option<Instant>,
}

impl Default for UpdateState {
    fn default() -> Self {
        Self {
            update_available: false,
            update_downloaded: false,
            checking: false,
            downloading: false,
            current_version: CURRENT_VERSION,
            new_version: String::new(),
            download_progress: 0,
            last_check_time: None,
        }
    }
}

impl UpdateState {
    /// True while a check or download is in flight.
    pub fn is_busy(&self) -> bool {
        self.checking || self.downloading
    }

    /// Short status line for the sidebar update panel.
    pub fn status_text(&self) -> String {
        if self.checking {
            "Checking for updates...".to_string()
        } else if self.downloading {
            format!(
                "Downloading version {} ({}%)",
                self.new_version, self.download_progress
            )
        } else if self.update_downloaded {
            format!("Version {} is ready to install", self.new_version)
        } else if self.update_available {
            format!("Version {} is available", self.new_version)
        } else if self.last_check_time.is_some() {
            "You're up to date".to_string()
        } else {
            format!("Version {}", self.current_version)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = UpdateState::default();
        assert!(!state.update_available);
        assert!(!state.is_busy());
        assert_eq!(state.current_version, "1.0.0");
        assert_eq!(state.status_text(), "Version 1.0.0");
    }

    #[test]
    fn test_status_text() {
        let mut state = UpdateState {
            checking: true,
            ..Default::default()
        };
        assert_eq!(state.status_text(), "Checking for updates...");

        state.checking = false;
        state.downloading = true;
        state.update_available = true;
        state.new_version = SIMULATED_NEW_VERSION.to_string();
        state.download_progress = 45;
        assert_eq!(state.status_text(), "Downloading version 1.1.0 (45%)");

        state.downloading = false;
        state.update_downloaded = true;
        assert_eq!(state.status_text(), "Version 1.1.0 is ready to install");
    }
}
