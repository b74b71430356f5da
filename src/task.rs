use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Format of `Due::date` as sent by the API.
const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A task as returned by the remote service. Identifiers are server-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub section_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    /// 1 (normal) to 4 (urgent).
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due: Option<Due>,
    #[serde(default)]
    pub duration: Option<TaskDuration>,
    #[serde(default)]
    pub url: String,
}

fn default_priority() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub datetime: Option<String>,
    /// Human readable phrase, e.g. "every monday".
    #[serde(default)]
    pub string: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Due {
    /// Parse the calendar date. Some payloads carry a full timestamp in
    /// `date`, so only the leading `YYYY-MM-DD` is considered.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let day = self.date.get(..10)?;
        NaiveDate::parse_from_str(day, DUE_DATE_FORMAT).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDuration {
    pub amount: u32,
    /// "minute" or "day".
    pub unit: String,
}

impl Task {
    /// Due date of the task, `None` when absent or unparsable.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due.as_ref().and_then(Due::calendar_date)
    }

    /// Priority clamped into the valid 1..=4 range.
    pub fn priority(&self) -> u8 {
        self.priority.clamp(1, 4)
    }
}

/// Labels the API priority the way the Todoist apps do: 4 is shown as P1.
pub fn priority_label(priority: u8) -> &'static str {
    match priority {
        4 => "P1",
        3 => "P2",
        2 => "P3",
        _ => "P4",
    }
}

pub fn priority_description(priority: u8) -> &'static str {
    match priority {
        4 => "P1 (Urgent)",
        3 => "P2 (High)",
        2 => "P3 (Normal)",
        _ => "P4 (Low)",
    }
}

/// Request body for creating a task. Optional fields are left out of the
/// JSON when empty so the service applies its own defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
}

impl NewTask {
    pub fn new(content: &str, priority: u8, project_id: Option<&str>, deadline: &str) -> Self {
        Self {
            content: content.to_string(),
            project_id: project_id
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            priority: priority.clamp(1, 4),
            due_string: if deadline.trim().is_empty() {
                None
            } else {
                Some(deadline.to_string())
            },
        }
    }
}
