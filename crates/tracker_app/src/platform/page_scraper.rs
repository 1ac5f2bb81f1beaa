//! Scraper backed by a JSON description of the page.
//!
//! The file stands in for the live page: it is re-read on every capture, and a
//! missing `tasks` list plays the role of the missing task-list anchor.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::Deserialize;
use tracker_core::{Progress, Snapshot};
use tracker_engine::Scraper;
use tracker_logging::tracker_debug;

const ANONYMOUS: &str = "Anonymous";
const UNKNOWN_TASK: &str = "Unknown Machine";

#[derive(Debug, Deserialize)]
struct PageFile {
    username: Option<String>,
    machine: Option<String>,
    /// Declared item count; the task list length is used when absent or 0.
    total: Option<u32>,
    tasks: Option<Vec<TaskEntry>>,
}

#[derive(Debug, Deserialize)]
struct TaskEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    solved: bool,
}

pub struct PageFileScraper {
    path: PathBuf,
}

impl PageFileScraper {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Scraper for PageFileScraper {
    fn capture_snapshot(&mut self) -> Option<Snapshot> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                tracker_debug!("Page file {:?} unavailable: {err}", self.path);
                return None;
            }
        };
        let page: PageFile = match serde_json::from_str(&text) {
            Ok(page) => page,
            Err(err) => {
                tracker_debug!("Page file {:?} unreadable: {err}", self.path);
                return None;
            }
        };
        snapshot_from_page(page, Utc::now().timestamp_millis())
    }
}

fn snapshot_from_page(page: PageFile, captured_at_ms: i64) -> Option<Snapshot> {
    let tasks = page.tasks?;

    let declared = page.total.unwrap_or(0);
    let total = if declared == 0 {
        u32::try_from(tasks.len()).unwrap_or(u32::MAX)
    } else {
        declared
    };
    let solved = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.solved)
        .map(|(index, task)| {
            let name = task.name.trim();
            if name.is_empty() {
                format!("Task {}", index + 1)
            } else {
                name.to_string()
            }
        })
        .collect();

    Some(Snapshot {
        subject: non_blank(page.username).unwrap_or_else(|| ANONYMOUS.to_string()),
        task: non_blank(page.machine).unwrap_or_else(|| UNKNOWN_TASK.to_string()),
        progress: Progress::from_completed(total, solved),
        captured_at_ms,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
