use chrono::NaiveDate;
use std::cmp::Reverse;

use crate::task::Task;

/// Where a task sits relative to the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    DueToday,
    Upcoming,
    Undated,
}

impl Urgency {
    pub fn of(task: &Task, today: NaiveDate) -> Self {
        match task.due_date() {
            None => Urgency::Undated,
            Some(date) if date < today => Urgency::Overdue,
            Some(date) if date == today => Urgency::DueToday,
            Some(_) => Urgency::Upcoming,
        }
    }
}

pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    Urgency::of(task, today) == Urgency::Overdue
}

/// Build the display order for the working set.
///
/// Only tasks due on or before `today` are kept. Overdue tasks come first,
/// oldest due date first; tasks due today follow, most urgent first. Both
/// sorts are stable, so ties keep fetch order.
pub fn classify(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let mut overdue: Vec<(NaiveDate, &Task)> = Vec::new();
    let mut due_today: Vec<&Task> = Vec::new();

    for task in tasks {
        match task.due_date() {
            Some(date) if date < today => overdue.push((date, task)),
            Some(date) if date == today => due_today.push(task),
            _ => {}
        }
    }

    overdue.sort_by_key(|(date, _)| *date);
    due_today.sort_by_key(|task| Reverse(task.priority()));

    overdue
        .into_iter()
        .map(|(_, task)| task)
        .chain(due_today)
        .cloned()
        .collect()
}

/// Number of leading overdue entries in an already classified list.
pub fn overdue_count(classified: &[Task], today: NaiveDate) -> usize {
    classified
        .iter()
        .take_while(|t| is_overdue(t, today))
        .count()
}
