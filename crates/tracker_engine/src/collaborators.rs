use tracker_core::{HostIdentifier, Snapshot};

/// Produces the current progress observation, if the page has one.
pub trait Scraper {
    fn capture_snapshot(&mut self) -> Option<Snapshot>;
}

/// The on-page settings control.
pub trait UiControl {
    /// Idempotent; called on every tick.
    fn ensure_control_present(&mut self);
    /// Returns the entered value, or `None` when the user cancelled.
    fn prompt_for_host_identifier(&mut self, current: &HostIdentifier) -> Option<String>;
    fn notify(&mut self, message: &str);
}
