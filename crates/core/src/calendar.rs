//! Calendar events derived from projects.
//!
//! Each project contributes up to two events: its shoot window (when both
//! dates are known) and its deadline (when a due date is set). Events carry
//! the project id as a field, so a client never has to parse it back out of
//! the event id.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

pub const COLOR_ACTIVE_SHOOT: &str = "#5fda6e";
pub const COLOR_PIPELINE_SHOOT: &str = "#d59d5a";
pub const COLOR_DEADLINE: &str = "#ae1414";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Shoot,
    Deadline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    /// Unique per event: `"{project_id}-shoot"` or `"{project_id}-due"`.
    pub id: String,
    pub project_id: DbId,
    pub kind: EventKind,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub summary: String,
    pub color: &'static str,
}

/// The project fields the calendar reads.
#[derive(Debug, Clone, Copy)]
pub struct CalendarEntry<'a> {
    pub project_id: DbId,
    pub name: &'a str,
    pub client: &'a str,
    pub approved: bool,
    pub shoot_start: Option<Timestamp>,
    pub shoot_end: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
}

/// Build the events for `entries`: all shoot windows first, then all
/// deadlines, each group in input order.
pub fn build_events<'a, I>(entries: I) -> Vec<CalendarEvent>
where
    I: IntoIterator<Item = CalendarEntry<'a>>,
{
    let entries: Vec<CalendarEntry<'a>> = entries.into_iter().collect();

    let shoots = entries.iter().filter_map(|e| {
        let (start, end) = (e.shoot_start?, e.shoot_end?);
        let label = if e.approved { "Active" } else { "Pipeline" };
        Some(CalendarEvent {
            id: format!("{}-shoot", e.project_id),
            project_id: e.project_id,
            kind: EventKind::Shoot,
            start_at: start,
            end_at: end,
            summary: format!("{label} Shoot: {} | {}", e.name, e.client),
            color: if e.approved {
                COLOR_ACTIVE_SHOOT
            } else {
                COLOR_PIPELINE_SHOOT
            },
        })
    });

    let deadlines = entries.iter().filter_map(|e| {
        let due = e.due_date?;
        Some(CalendarEvent {
            id: format!("{}-due", e.project_id),
            project_id: e.project_id,
            kind: EventKind::Deadline,
            start_at: due,
            end_at: due,
            summary: format!("Deadline: {} | {}", e.name, e.client),
            color: COLOR_DEADLINE,
        })
    });

    shoots.chain(deadlines).collect()
}
