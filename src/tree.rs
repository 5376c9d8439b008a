//! Task forest construction and display-line formatting.
//!
//! Turns the flat, position-keyed record batch from the service into a
//! two-level forest of [`TaskNode`]s, each carrying a precomputed
//! [`StyledLine`] ready for the notification body. Due dates are labelled
//! relative to the current day ("Today", "Tomorrow", or a short calendar
//! string).

use crate::api::TaskRecord;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

/// Day boundaries used to label due dates.
///
/// `tomorrow` and `after_tomorrow` are the starts of the next two calendar
/// days; due timestamps are compared as naive UTC date-times against them,
/// so a date-only due of "start of today" labels as "Today".
#[derive(Debug, Clone, Copy)]
pub struct DayBoundaries {
    tomorrow: NaiveDateTime,
    after_tomorrow: NaiveDateTime,
}

impl DayBoundaries {
    /// Boundaries for the current local day.
    #[must_use]
    pub fn now() -> Self {
        Self::from_day(Local::now().date_naive())
    }

    /// Boundaries for an explicit "today" (used by tests).
    #[must_use]
    pub fn from_day(today: NaiveDate) -> Self {
        let start = today.and_time(NaiveTime::MIN);
        Self {
            tomorrow: start + Duration::days(1),
            after_tomorrow: start + Duration::days(2),
        }
    }
}

/// One display line with an optional de-emphasized tail.
///
/// `detail_from` is the byte offset where the due/notes segment begins;
/// sinks render everything from there in a dimmer style than the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    /// Full line text.
    pub text: String,
    /// Start of the de-emphasized segment, if the line has one.
    pub detail_from: Option<usize>,
}

/// In-memory task tree node, built fresh on every poll.
#[derive(Debug, Clone)]
pub struct TaskNode {
    /// Opaque task identifier.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Free-form notes, if any.
    pub notes: Option<String>,
    /// Due timestamp, if any.
    pub due: Option<DateTime<Utc>>,
    /// Subtasks in position order.
    pub children: Vec<TaskNode>,
    /// Precomputed display line.
    pub line: StyledLine,
}

impl TaskNode {
    fn from_record(record: TaskRecord, bounds: &DayBoundaries) -> Self {
        let is_subtask = record.parent.is_some();
        let line = display_line(
            &record.title,
            record.notes.as_deref(),
            record.due,
            is_subtask,
            bounds,
        );
        Self {
            id: record.id,
            title: record.title,
            notes: record.notes,
            due: record.due,
            children: Vec::new(),
            line,
        }
    }
}

/// Build the task forest from a raw record batch.
///
/// Records are stable-sorted so that parentless records come first, each
/// partition ordered by the service's `position` key; a single pass then
/// appends every record either to the root sequence or to its already-built
/// parent. A record whose parent is absent from the batch is constructed and
/// indexed (later records may still attach beneath it) but never linked into
/// the forest, so it is not rendered — only warned about.
#[must_use]
pub fn build_forest(mut records: Vec<TaskRecord>, bounds: &DayBoundaries) -> Vec<TaskNode> {
    records.sort_by(compare_records);

    let mut nodes: Vec<Option<TaskNode>> = Vec::with_capacity(records.len());
    let mut by_id: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut roots: Vec<usize> = Vec::new();
    let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();

    for record in records {
        let parent_id = record.parent.clone();
        let idx = nodes.len();
        let node = TaskNode::from_record(record, bounds);
        by_id.insert(node.id.clone(), idx);

        match parent_id {
            None => roots.push(idx),
            // Because of the sort, a parent present in the batch is visited
            // before its subtasks and is already indexed here.
            Some(parent_id) => match by_id.get(&parent_id) {
                Some(&parent_idx) => children_of.entry(parent_idx).or_default().push(idx),
                None => warn!(task_id = %node.id, parent_id = %parent_id, "task's parent not found in batch"),
            },
        }

        nodes.push(Some(node));
    }

    roots
        .into_iter()
        .filter_map(|idx| materialize(idx, &mut nodes, &children_of))
        .collect()
}

fn materialize(
    idx: usize,
    nodes: &mut [Option<TaskNode>],
    children_of: &HashMap<usize, Vec<usize>>,
) -> Option<TaskNode> {
    let mut node = nodes[idx].take()?;
    if let Some(child_indices) = children_of.get(&idx) {
        for &child_idx in child_indices {
            if let Some(child) = materialize(child_idx, nodes, children_of) {
                node.children.push(child);
            }
        }
    }
    Some(node)
}

/// Parented records sort after parentless ones; within each partition,
/// ascending by position key. The sort is stable.
fn compare_records(a: &TaskRecord, b: &TaskRecord) -> Ordering {
    match (a.parent.is_some(), b.parent.is_some()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => a.position.cmp(&b.position),
    }
}

fn display_line(
    title: &str,
    notes: Option<&str>,
    due: Option<DateTime<Utc>>,
    is_subtask: bool,
    bounds: &DayBoundaries,
) -> StyledLine {
    let mut text = String::new();
    if is_subtask {
        text.push_str("   ");
    }
    text.push_str("- ");
    text.push_str(title);

    let mut detail_from = None;
    if due.is_some() || notes.is_some() {
        text.push_str(": ");
        detail_from = Some(text.len());
        if let Some(due) = due {
            text.push_str(&due_label(due, bounds));
        }
        if due.is_some() && notes.is_some() {
            text.push_str(", ");
        }
        if let Some(notes) = notes {
            text.push_str(notes);
        }
    }

    StyledLine { text, detail_from }
}

/// Label a due timestamp relative to the day boundaries.
fn due_label(due: DateTime<Utc>, bounds: &DayBoundaries) -> String {
    let due = due.naive_utc();
    if due < bounds.tomorrow {
        "Today".to_owned()
    } else if due < bounds.after_tomorrow {
        "Tomorrow".to_owned()
    } else {
        due.format("%a %d %b").to_string()
    }
}
