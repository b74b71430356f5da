mod helpers;

use chrono::Duration;
use helpers::{make_task, today};
use todoist_tui::classify::{classify, is_overdue, overdue_count, Urgency};

fn ids(tasks: &[todoist_tui::task::Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn classify_orders_overdue_then_today_by_priority() {
    let t = today();
    let tasks = vec![
        make_task("yesterday", Some(t - Duration::days(1)), 1),
        make_task("today-p4", Some(t), 4),
        make_task("today-p2", Some(t), 2),
        make_task("tomorrow", Some(t + Duration::days(1)), 4),
    ];

    let classified = classify(&tasks, t);

    assert_eq!(ids(&classified), vec!["yesterday", "today-p4", "today-p2"]);
}

#[test]
fn classify_excludes_undated_tasks() {
    let t = today();
    let tasks = vec![
        make_task("none", None, 4),
        make_task("today", Some(t), 1),
    ];

    let classified = classify(&tasks, t);

    assert_eq!(ids(&classified), vec!["today"]);
    assert!(classified.iter().all(|task| task.due.is_some()));
}

#[test]
fn classify_puts_every_overdue_task_before_today_regardless_of_priority() {
    let t = today();
    let tasks = vec![
        make_task("today-urgent", Some(t), 4),
        make_task("old-low", Some(t - Duration::days(30)), 1),
        make_task("today-low", Some(t), 1),
        make_task("recent-low", Some(t - Duration::days(1)), 1),
    ];

    let classified = classify(&tasks, t);

    assert_eq!(
        ids(&classified),
        vec!["old-low", "recent-low", "today-urgent", "today-low"]
    );
    assert_eq!(overdue_count(&classified, t), 2);
}

#[test]
fn classify_orders_overdue_oldest_first() {
    let t = today();
    let tasks = vec![
        make_task("b", Some(t - Duration::days(2)), 4),
        make_task("a", Some(t - Duration::days(5)), 1),
        make_task("c", Some(t - Duration::days(1)), 2),
    ];

    let classified = classify(&tasks, t);

    assert_eq!(ids(&classified), vec!["a", "b", "c"]);
}

#[test]
fn classify_keeps_fetch_order_on_ties() {
    let t = today();
    let tasks = vec![
        make_task("first", Some(t), 3),
        make_task("second", Some(t), 3),
        make_task("third", Some(t), 3),
    ];

    let classified = classify(&tasks, t);

    assert_eq!(ids(&classified), vec!["first", "second", "third"]);
}

#[test]
fn classify_does_not_mutate_input() {
    let t = today();
    let tasks = vec![
        make_task("today", Some(t), 1),
        make_task("old", Some(t - Duration::days(1)), 1),
    ];
    let before = tasks.clone();

    let _ = classify(&tasks, t);

    assert_eq!(tasks, before);
}

#[test]
fn classify_ignores_unparsable_due_dates() {
    let t = today();
    let mut broken = make_task("broken", Some(t), 4);
    if let Some(due) = broken.due.as_mut() {
        due.date = "someday".to_string();
    }

    let classified = classify(&[broken], t);

    assert!(classified.is_empty());
}

#[test]
fn classify_reads_date_prefix_of_timestamps() {
    let t = today();
    let mut timed = make_task("timed", Some(t), 2);
    if let Some(due) = timed.due.as_mut() {
        due.date = format!("{}T09:00:00", t.format("%Y-%m-%d"));
    }

    let classified = classify(&[timed], t);

    assert_eq!(ids(&classified), vec!["timed"]);
}

#[test]
fn urgency_of_task() {
    let t = today();
    assert_eq!(Urgency::of(&make_task("a", Some(t - Duration::days(1)), 1), t), Urgency::Overdue);
    assert_eq!(Urgency::of(&make_task("b", Some(t), 1), t), Urgency::DueToday);
    assert_eq!(Urgency::of(&make_task("c", Some(t + Duration::days(1)), 1), t), Urgency::Upcoming);
    assert_eq!(Urgency::of(&make_task("d", None, 1), t), Urgency::Undated);
    assert!(is_overdue(&make_task("e", Some(t - Duration::days(3)), 1), t));
    assert!(!is_overdue(&make_task("f", Some(t), 1), t));
}
