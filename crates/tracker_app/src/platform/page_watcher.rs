//! Turns changes to the page file into content-mutation ticks.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;
use tracker_engine::EngineHandle;
use tracker_logging::{tracker_debug, tracker_warn};

/// Keeps the OS watch alive; dropping it stops the notifications.
pub struct PageWatcher {
    _watcher: RecommendedWatcher,
    changes: UnboundedReceiver<()>,
}

impl PageWatcher {
    /// Watches the directory holding `page` so that editors replacing the file
    /// through a rename are still noticed.
    pub fn new(page: &Path) -> notify::Result<Self> {
        let (tx, changes) = mpsc::unbounded_channel();
        let target = page.to_path_buf();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) if touches_page(&event, &target) => {
                    let _ = tx.send(());
                }
                Ok(_) => {}
                Err(err) => tracker_warn!("Page watcher error: {err}"),
            }
        })?;
        watcher.watch(&watch_dir(page), RecursiveMode::NonRecursive)?;
        Ok(Self {
            _watcher: watcher,
            changes,
        })
    }

    /// Forwards every change to the engine until `shutdown` is cancelled.
    pub async fn forward(mut self, handle: EngineHandle, shutdown: CancellationToken) {
        loop {
            let changed = tokio::select! {
                _ = shutdown.cancelled() => None,
                changed = self.changes.recv() => changed,
            };
            if changed.is_none() {
                return;
            }
            tracker_debug!("Page file changed");
            handle.notify_content_mutated();
        }
    }
}

fn watch_dir(page: &Path) -> PathBuf {
    match page.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Content writes and (re)creations of the page count; reads and removals do not.
fn touches_page(event: &Event, page: &Path) -> bool {
    let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    relevant
        && event
            .paths
            .iter()
            .any(|path| path.file_name().is_some() && path.file_name() == page.file_name())
}
