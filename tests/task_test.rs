use todoist_tui::project::{project_name, Project, UNKNOWN_PROJECT};
use todoist_tui::task::{priority_description, priority_label, NewTask, Task};

#[test]
fn task_decodes_api_payload() {
    let json = r#"{
        "id": "2995104339",
        "project_id": "2203306141",
        "section_id": null,
        "content": "Buy Milk",
        "description": "",
        "is_completed": false,
        "labels": ["Food", "Shopping"],
        "priority": 4,
        "comment_count": 10,
        "created_at": "2019-12-11T22:36:50.000000Z",
        "due": {
            "date": "2016-09-01",
            "is_recurring": false,
            "datetime": "2016-09-01T12:00:00.000000Z",
            "string": "tomorrow at 12",
            "timezone": "Europe/Moscow"
        },
        "url": "https://todoist.com/showTask?id=2995104339",
        "creator_id": "2671355",
        "assignee_id": null
    }"#;

    let task: Task = serde_json::from_str(json).unwrap();

    assert_eq!(task.id, "2995104339");
    assert_eq!(task.priority(), 4);
    assert_eq!(task.labels, vec!["Food", "Shopping"]);
    assert_eq!(
        task.due_date(),
        chrono::NaiveDate::from_ymd_opt(2016, 9, 1)
    );
    assert_eq!(task.due.unwrap().string.as_deref(), Some("tomorrow at 12"));
}

#[test]
fn task_decodes_minimal_payload() {
    let task: Task = serde_json::from_str(r#"{"id": "1", "content": "x"}"#).unwrap();

    assert_eq!(task.priority, 1);
    assert!(task.due_date().is_none());
    assert!(task.url.is_empty());
}

#[test]
fn priority_labels_are_inverted() {
    assert_eq!(priority_label(4), "P1");
    assert_eq!(priority_label(3), "P2");
    assert_eq!(priority_label(2), "P3");
    assert_eq!(priority_label(1), "P4");
    assert_eq!(priority_description(4), "P1 (Urgent)");
    assert_eq!(priority_description(1), "P4 (Low)");
}

#[test]
fn new_task_omits_empty_optionals() {
    let request = NewTask::new("Write report", 3, Some(""), "  ");

    assert_eq!(request.project_id, None);
    assert_eq!(request.due_string, None);

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"content": "Write report", "priority": 3})
    );
}

#[test]
fn new_task_forwards_deadline_verbatim() {
    let request = NewTask::new("Call", 9, Some("p2"), "next monday at 9 ");

    assert_eq!(request.priority, 4);
    assert_eq!(request.project_id.as_deref(), Some("p2"));
    assert_eq!(request.due_string.as_deref(), Some("next monday at 9 "));
}

#[test]
fn unknown_project_name() {
    let projects = vec![Project {
        id: "p1".to_string(),
        name: "Inbox".to_string(),
        color: String::new(),
    }];

    assert_eq!(project_name(&projects, "p1"), "Inbox");
    assert_eq!(project_name(&projects, "missing"), UNKNOWN_PROJECT);
}
