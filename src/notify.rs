//! Notification rendering and output sinks.
//!
//! [`render`] converts the task forest plus list title into a
//! [`NotificationPayload`]; a [`NotificationSink`] then displays it into a
//! single persistent slot, each `show` replacing the previous content. The
//! sink is a collaborator seam: the daemon ships a terminal sink and a
//! status-file sink, tests plug in capturing sinks.

use crate::error::Result;
use crate::tree::{StyledLine, TaskNode};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Structured notification content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Title of the watched list, if known.
    pub subtitle: Option<String>,
    /// Comma-joined root task titles, or `"No Tasks"`.
    pub summary: String,
    /// Body: one line per root task, each followed by its subtask lines.
    pub lines: Vec<StyledLine>,
    /// Optional tap target.
    pub link: Option<String>,
}

/// Render the task forest into a notification payload.
///
/// An empty or absent forest yields summary `"No Tasks"` and a single
/// `"No Tasks"` body line.
#[must_use]
pub fn render(list_title: Option<&str>, forest: Option<&[TaskNode]>) -> NotificationPayload {
    let mut summary = String::new();
    let mut lines = Vec::new();

    if let Some(forest) = forest {
        for node in forest {
            if !summary.is_empty() {
                summary.push_str(", ");
            }
            summary.push_str(&node.title);

            lines.push(node.line.clone());
            for child in &node.children {
                lines.push(child.line.clone());
            }
        }
    }

    if summary.is_empty() {
        summary.push_str("No Tasks");
        lines.push(StyledLine {
            text: "No Tasks".to_owned(),
            detail_from: None,
        });
    }

    NotificationPayload {
        subtitle: list_title.map(str::to_owned),
        summary,
        lines,
        link: None,
    }
}

/// Displays notification payloads into a persistent slot.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Display the payload, replacing whatever the slot showed before.
    async fn show(&self, payload: &NotificationPayload) -> Result<()>;
}

/// ANSI terminal sink.
///
/// Writes the notification as a block to stdout, with the due/notes detail
/// segments dimmed the way the original rendered them in grey.
#[derive(Debug, Default)]
pub struct ConsoleSink;

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

impl ConsoleSink {
    fn format_line(line: &StyledLine) -> String {
        match line.detail_from {
            Some(from) => format!("{}{DIM}{}{RESET}", &line.text[..from], &line.text[from..]),
            None => line.text.clone(),
        }
    }

    fn format_block(payload: &NotificationPayload) -> String {
        let mut block = String::new();
        match &payload.subtitle {
            Some(subtitle) => block.push_str(&format!("{subtitle} — {}\n", payload.summary)),
            None => block.push_str(&format!("{}\n", payload.summary)),
        }
        for line in &payload.lines {
            block.push_str(&Self::format_line(line));
            block.push('\n');
        }
        if let Some(link) = &payload.link {
            block.push_str(&format!("{DIM}{link}{RESET}\n"));
        }
        block
    }
}

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn show(&self, payload: &NotificationPayload) -> Result<()> {
        debug!("displaying notification");
        println!("{}", Self::format_block(payload));
        Ok(())
    }
}

/// Plain-text file sink for status-bar style consumers.
///
/// Rewrites the file atomically (write-then-rename) so readers never observe
/// a half-written notification.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create a sink writing to `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn format_block(payload: &NotificationPayload) -> String {
        let mut block = String::new();
        match &payload.subtitle {
            Some(subtitle) => block.push_str(&format!("{subtitle}: {}\n", payload.summary)),
            None => block.push_str(&format!("{}\n", payload.summary)),
        }
        for line in &payload.lines {
            block.push_str(&line.text);
            block.push('\n');
        }
        block
    }
}

#[async_trait]
impl NotificationSink for FileSink {
    async fn show(&self, payload: &NotificationPayload) -> Result<()> {
        debug!(path = %self.path.display(), "writing notification file");
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, Self::format_block(payload)).map_err(|e| {
            crate::error::TaskwatchError::Notify(format!("cannot write status file: {e}"))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            crate::error::TaskwatchError::Notify(format!("cannot replace status file: {e}"))
        })?;
        Ok(())
    }
}
