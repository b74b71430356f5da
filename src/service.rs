use chrono::Local;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::classify::classify;
use crate::error::ServiceError;
use crate::project::Project;
use crate::task::{NewTask, Task};

pub const DEFAULT_API_BASE: &str = "https://api.todoist.com/rest/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The remote task service as seen by the rest of the application.
///
/// Implementations block; callers run them off the interaction thread.
pub trait TaskService: Send + Sync {
    /// Active tasks due today or earlier, in display order.
    fn fetch_todays_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    fn fetch_projects(&self) -> Result<Vec<Project>, ServiceError>;
    fn create_task(&self, task: &NewTask) -> Result<Task, ServiceError>;
    fn complete_task(&self, task_id: &str) -> Result<(), ServiceError>;
    fn delete_task(&self, task_id: &str) -> Result<(), ServiceError>;
}

/// Blocking client for the Todoist REST API.
pub struct TodoistClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl TodoistClient {
    pub fn with_options(token: &str, base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        tracing::debug!(path, "GET");
        let response = self
            .agent
            .get(&self.url(path))
            .set("Authorization", &self.auth_header())
            .set("Content-Type", "application/json")
            .call()?;
        Ok(response.into_json::<T>()?)
    }

    /// Fetch every active task, unfiltered.
    pub fn fetch_all_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.get_json("/tasks")
    }
}

impl TaskService for TodoistClient {
    fn fetch_todays_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let all = self.fetch_all_tasks()?;
        let today = Local::now().date_naive();
        let todays = classify(&all, today);
        tracing::info!(total = all.len(), due = todays.len(), "fetched tasks");
        Ok(todays)
    }

    fn fetch_projects(&self) -> Result<Vec<Project>, ServiceError> {
        let projects: Vec<Project> = self.get_json("/projects")?;
        tracing::info!(count = projects.len(), "fetched projects");
        Ok(projects)
    }

    fn create_task(&self, task: &NewTask) -> Result<Task, ServiceError> {
        let body = serde_json::to_string(task)?;
        tracing::debug!(content = %task.content, priority = task.priority, "POST /tasks");
        let response = self
            .agent
            .post(&self.url("/tasks"))
            .set("Authorization", &self.auth_header())
            .set("Content-Type", "application/json")
            .send_string(&body)?;
        let created: Task = response.into_json()?;
        tracing::info!(task_id = %created.id, "created task");
        Ok(created)
    }

    fn complete_task(&self, task_id: &str) -> Result<(), ServiceError> {
        tracing::debug!(task_id, "closing task");
        self.agent
            .post(&self.url(&format!("/tasks/{}/close", task_id)))
            .set("Authorization", &self.auth_header())
            .call()?;
        tracing::info!(task_id, "completed task");
        Ok(())
    }

    fn delete_task(&self, task_id: &str) -> Result<(), ServiceError> {
        tracing::debug!(task_id, "deleting task");
        self.agent
            .delete(&self.url(&format!("/tasks/{}", task_id)))
            .set("Authorization", &self.auth_header())
            .call()?;
        tracing::info!(task_id, "deleted task");
        Ok(())
    }
}
