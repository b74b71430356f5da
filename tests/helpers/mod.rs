#![allow(dead_code)]

use chrono::NaiveDate;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Mutex;
use tempfile::TempDir;

use todoist_tui::config::Config;
use todoist_tui::error::ServiceError;
use todoist_tui::project::Project;
use todoist_tui::service::TaskService;
use todoist_tui::task::{Due, NewTask, Task};

/// Build a Config rooted in the temp dir.
pub fn test_config(tmp: &TempDir) -> Config {
    let base_dir = tmp.path().join(".todoist-tui");
    let cache_dir = tmp.path().join("cache");
    Config::new(base_dir, cache_dir)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Reference date used across the controller tests.
pub fn today() -> NaiveDate {
    date(2024, 3, 15)
}

/// A task in the "Inbox" project (id "p1"), optionally due on `due`.
pub fn make_task(id: &str, due: Option<NaiveDate>, priority: u8) -> Task {
    Task {
        id: id.to_string(),
        project_id: "p1".to_string(),
        section_id: None,
        content: format!("Task {}", id),
        description: String::new(),
        is_completed: false,
        labels: Vec::new(),
        priority,
        comment_count: 0,
        created_at: None,
        due: due.map(|d| Due {
            date: d.format("%Y-%m-%d").to_string(),
            is_recurring: false,
            datetime: None,
            string: None,
            timezone: None,
        }),
        duration: None,
        url: format!("https://todoist.com/showTask?id={}", id),
    }
}

pub fn make_project(id: &str, name: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        color: "grey".to_string(),
    }
}

pub fn sample_projects() -> Vec<Project> {
    vec![
        make_project("p1", "Inbox"),
        make_project("p2", "Work"),
        make_project("p3", "Home"),
    ]
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

/// In-memory service that records every call.
pub struct FakeService {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    /// When set, every call fails with this HTTP status.
    pub fail_status: Option<u16>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeService {
    pub fn new(tasks: Vec<Task>, projects: Vec<Project>) -> Self {
        Self {
            tasks,
            projects,
            fail_status: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::new(Vec::new(), Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_status {
            Some(status) => Err(ServiceError::Status { status }),
            None => Ok(()),
        }
    }
}

impl TaskService for FakeService {
    fn fetch_todays_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.record("fetch_tasks".to_string())?;
        Ok(self.tasks.clone())
    }

    fn fetch_projects(&self) -> Result<Vec<Project>, ServiceError> {
        self.record("fetch_projects".to_string())?;
        Ok(self.projects.clone())
    }

    fn create_task(&self, task: &NewTask) -> Result<Task, ServiceError> {
        self.record(format!("create:{}", task.content))?;
        let mut created = make_task("new", Some(today()), task.priority);
        created.content = task.content.clone();
        Ok(created)
    }

    fn complete_task(&self, task_id: &str) -> Result<(), ServiceError> {
        self.record(format!("complete:{}", task_id))
    }

    fn delete_task(&self, task_id: &str) -> Result<(), ServiceError> {
        self.record(format!("delete:{}", task_id))
    }
}
