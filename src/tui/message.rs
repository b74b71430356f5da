use crate::project::Project;
use crate::task::{NewTask, Task};

/// Where a loaded collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Remote,
}

/// Background operations, named in failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchTasks,
    FetchProjects,
    CreateTask,
    CompleteTask,
    DeleteTask,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operation::FetchTasks => "load tasks",
            Operation::FetchProjects => "load projects",
            Operation::CreateTask => "create task",
            Operation::CompleteTask => "complete task",
            Operation::DeleteTask => "delete task",
        };
        write!(f, "{}", s)
    }
}

/// Results delivered back to the controller from background work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    TasksLoaded { tasks: Vec<Task>, source: Source },
    ProjectsLoaded { projects: Vec<Project>, source: Source },
    TaskCreated(Task),
    TaskCompleted(String),
    TaskDeleted(String),
    OperationFailed { operation: Operation, error: String },
}

/// Work the controller asks for. Executed off the interaction thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pre-seed both collections from the cache, fetching the stale ones.
    SeedFromCache { force_remote: bool },
    FetchTasks,
    FetchProjects,
    CreateTask(NewTask),
    CompleteTask(String),
    DeleteTask(String),
    OpenUrl(String),
}
