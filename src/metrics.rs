// Anonymous usage statistics
//
// In-memory counters for the main user actions. They are only recorded while the
// `anonymousUsageStats` setting is on and are written to the log at shutdown;
// nothing leaves the machine.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Usage counters for one application run.
///
/// Uses atomic operations so any thread can record without locks.
#[derive(Debug)]
pub struct UsageStats {
    enabled: AtomicBool,

    /// Files accepted as the uploaded dataset
    pub uploads: AtomicU64,

    /// Uploads refused because of their file type
    pub rejected_uploads: AtomicU64,

    /// Cleaning runs that reached the cleaned step
    pub cleanings_applied: AtomicU64,

    /// Export artifacts written to disk
    pub exports: AtomicU64,

    /// Update checks started by the user
    pub update_checks: AtomicU64,

    /// Theme switches
    pub theme_changes: AtomicU64,

    start_time: Instant,
}

impl UsageStats {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            uploads: AtomicU64::new(0),
            rejected_uploads: AtomicU64::new(0),
            cleanings_applied: AtomicU64::new(0),
            exports: AtomicU64::new(0),
            update_checks: AtomicU64::new(0),
            theme_changes: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Follow the `anonymousUsageStats` setting.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn bump(&self, counter: &AtomicU64) {
        if self.is_enabled() {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_upload(&self) {
        self.bump(&self.uploads);
    }

    pub fn record_rejected_upload(&self) {
        self.bump(&self.rejected_uploads);
    }

    pub fn record_cleaning(&self) {
        self.bump(&self.cleanings_applied);
    }

    pub fn record_export(&self) {
        self.bump(&self.exports);
    }

    pub fn record_update_check(&self) {
        self.bump(&self.update_checks);
    }

    pub fn record_theme_change(&self) {
        self.bump(&self.theme_changes);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log the counters. Does nothing when collection is disabled.
    pub fn log_summary(&self) {
        if !self.is_enabled() {
            return;
        }

        tracing::info!("=== Usage Summary ===");
        tracing::info!("Session length: {:.0}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Uploads: {} accepted, {} rejected",
            self.uploads.load(Ordering::Relaxed),
            self.rejected_uploads.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Cleanings applied: {}, exports: {}",
            self.cleanings_applied.load(Ordering::Relaxed),
            self.exports.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Update checks: {}, theme changes: {}",
            self.update_checks.load(Ordering::Relaxed),
            self.theme_changes.load(Ordering::Relaxed)
        );
    }
}

impl Default for UsageStats {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_records_nothing() {
        let stats = UsageStats::default();
        stats.record_upload();
        stats.record_export();

        assert_eq!(stats.uploads.load(Ordering::Relaxed), 0);
        assert_eq!(stats.exports.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_enabled_counts() {
        let stats = UsageStats::new(true);
        stats.record_upload();
        stats.record_upload();
        stats.record_rejected_upload();
        stats.record_cleaning();
        stats.record_update_check();

        assert_eq!(stats.uploads.load(Ordering::Relaxed), 2);
        assert_eq!(stats.rejected_uploads.load(Ordering::Relaxed), 1);
        assert_eq!(stats.cleanings_applied.load(Ordering::Relaxed), 1);
        assert_eq!(stats.update_checks.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_toggle_at_runtime() {
        let stats = UsageStats::new(true);
        stats.record_theme_change();
        stats.set_enabled(false);
        stats.record_theme_change();

        assert_eq!(stats.theme_changes.load(Ordering::Relaxed), 1);
        assert!(!stats.is_enabled());
    }
}
