use chrono::{Local, NaiveDate};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

use crate::classify::classify;
use crate::project::{project_name, Project};
use crate::task::Task;

use super::form::{CreateTaskForm, FormInput};
use super::message::{Command, Message, Operation, Source};

/// How long a status message stays in the status bar.
const STATUS_TTL: Duration = Duration::from_secs(4);

const MISSING_TOKEN_MESSAGE: &str = "TODOIST_TOKEN environment variable is required";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    Error(String),
    List,
    Popup,
    CreateForm,
    DeleteConfirm { task_id: String },
}

/// The application controller.
///
/// Owns the view state, the task and project lists, the selection and the
/// create form. Input and background results go in; `Command`s for the
/// worker come out. Nothing here performs I/O.
pub struct App {
    pub view: View,
    /// Tasks as last delivered, before classification.
    raw_tasks: Vec<Task>,
    /// Classified display order; the selection indexes into this.
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub selected: Option<usize>,
    pub form: CreateTaskForm,
    pub creating: bool,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
    pub width: u16,
    pub height: u16,
    awaiting_tasks: bool,
    projects_received: bool,
    has_loaded: bool,
    tasks_from_remote: bool,
    projects_from_remote: bool,
    fixed_today: Option<NaiveDate>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            view: View::Loading,
            raw_tasks: Vec::new(),
            tasks: Vec::new(),
            projects: Vec::new(),
            selected: None,
            form: CreateTaskForm::default(),
            creating: false,
            should_quit: false,
            status_message: None,
            width: 80,
            height: 24,
            awaiting_tasks: true,
            projects_received: false,
            has_loaded: false,
            tasks_from_remote: false,
            projects_from_remote: false,
            fixed_today: None,
        }
    }

    /// Controller for a start without credentials. It never loads anything.
    pub fn missing_credential() -> Self {
        let mut app = Self::new();
        app.view = View::Error(MISSING_TOKEN_MESSAGE.to_string());
        app.awaiting_tasks = false;
        app
    }

    /// Pin the reference date used for classification.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Commands to run at startup. None when starting in the error state.
    pub fn init(&self, force_remote: bool) -> Vec<Command> {
        match self.view {
            View::Error(_) => Vec::new(),
            _ => vec![Command::SeedFromCache { force_remote }],
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|i| self.tasks.get(i))
    }

    pub fn project_name(&self, project_id: &str) -> &str {
        project_name(&self.projects, project_id)
    }

    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    pub fn clear_old_status(&mut self) {
        if let Some((_, instant)) = &self.status_message {
            if instant.elapsed() > STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    // ------------------------------------------------------------------
    // Background results
    // ------------------------------------------------------------------

    pub fn handle_message(&mut self, message: Message) -> Vec<Command> {
        match message {
            Message::TasksLoaded { tasks, source } => {
                if source == Source::Cache && self.tasks_from_remote {
                    tracing::debug!("ignoring cached tasks, remote tasks already applied");
                    return Vec::new();
                }
                if source == Source::Remote {
                    self.tasks_from_remote = true;
                }
                tracing::debug!(count = tasks.len(), ?source, "tasks loaded");
                self.replace_tasks(tasks);
                self.awaiting_tasks = false;
                self.finish_loading();
                Vec::new()
            }
            Message::ProjectsLoaded { projects, source } => {
                if source == Source::Cache && self.projects_from_remote {
                    tracing::debug!("ignoring cached projects, remote projects already applied");
                    return Vec::new();
                }
                if source == Source::Remote {
                    self.projects_from_remote = true;
                }
                tracing::debug!(count = projects.len(), ?source, "projects loaded");
                self.projects = projects.clone();
                self.form.set_projects(projects);
                self.projects_received = true;
                self.finish_loading();
                Vec::new()
            }
            Message::TaskCreated(task) => {
                tracing::info!(task_id = %task.id, "task created, refreshing list");
                self.creating = false;
                self.form.reset();
                self.set_status(format!("Created: {}", task.content));
                self.start_refresh()
            }
            Message::TaskCompleted(task_id) => {
                if let Some(task) = self.remove_task(&task_id) {
                    self.set_status(format!("Completed: {}", task.content));
                }
                Vec::new()
            }
            Message::TaskDeleted(task_id) => {
                if let Some(task) = self.remove_task(&task_id) {
                    self.set_status(format!("Deleted: {}", task.content));
                }
                Vec::new()
            }
            Message::OperationFailed { operation, error } => {
                self.operation_failed(operation, error);
                Vec::new()
            }
        }
    }

    fn operation_failed(&mut self, operation: Operation, error: String) {
        tracing::warn!(%operation, %error, "background operation failed");

        match operation {
            Operation::FetchTasks => self.awaiting_tasks = false,
            Operation::CreateTask => self.creating = false,
            _ => {}
        }

        if !self.has_loaded {
            self.view = View::Error(error);
            return;
        }

        if self.view == View::Loading {
            self.view = View::List;
        }
        self.set_status(format!("Failed to {}: {}", operation, error));
    }

    /// Leave `Loading` once tasks for this cycle and projects are both in.
    fn finish_loading(&mut self) {
        if self.view != View::Loading || self.awaiting_tasks || !self.projects_received {
            return;
        }
        self.view = View::List;
        self.has_loaded = true;
        if self.selected.is_none() && !self.tasks.is_empty() {
            self.selected = Some(0);
        }
    }

    fn replace_tasks(&mut self, tasks: Vec<Task>) {
        let previous = self.selected_task().map(|t| t.id.clone());
        self.raw_tasks = tasks;
        self.tasks = classify(&self.raw_tasks, self.today());
        self.reselect(previous);
    }

    /// Drop a task by id from both lists. Unknown ids are a no-op.
    fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == task_id);
        self.raw_tasks.retain(|t| t.id != task_id);
        let Some(index) = index else {
            tracing::debug!(task_id, "result for task no longer listed, ignoring");
            return None;
        };

        let previous = self.selected_task().map(|t| t.id.clone());
        let removed = self.tasks.remove(index);
        self.reselect(previous);
        Some(removed)
    }

    /// Restore the selection after the list changed: follow the previously
    /// selected task when it is still present, otherwise clamp. Overlays
    /// that referred to a vanished task are closed.
    fn reselect(&mut self, previous: Option<String>) {
        let still_there = previous
            .as_deref()
            .and_then(|id| self.tasks.iter().position(|t| t.id == id));

        self.selected = match (still_there, self.selected) {
            _ if self.tasks.is_empty() => None,
            (Some(i), _) => Some(i),
            (None, Some(i)) => Some(i.min(self.tasks.len() - 1)),
            (None, None) => Some(0),
        };

        let overlay_orphaned = match &self.view {
            View::Popup => previous.is_some() && still_there.is_none(),
            View::DeleteConfirm { task_id } => !self.tasks.iter().any(|t| &t.id == task_id),
            _ => false,
        };
        if overlay_orphaned {
            self.view = View::List;
        }
    }

    fn start_refresh(&mut self) -> Vec<Command> {
        self.view = View::Loading;
        self.awaiting_tasks = true;
        vec![Command::FetchTasks]
    }

    /// Explicit refresh: projects may have been renamed since startup.
    fn refresh_all(&mut self) -> Vec<Command> {
        let mut commands = self.start_refresh();
        commands.push(Command::FetchProjects);
        commands
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            tracing::debug!("force quit");
            self.should_quit = true;
            return Vec::new();
        }

        if key.code == KeyCode::Backspace
            && key.modifiers.contains(KeyModifiers::ALT)
            && matches!(self.view, View::List | View::Popup)
        {
            self.open_delete_confirm();
            return Vec::new();
        }

        match self.view {
            View::Loading | View::Error(_) => {
                if key.code == KeyCode::Esc {
                    self.should_quit = true;
                }
                Vec::new()
            }
            View::List => self.handle_list_key(key),
            View::Popup => self.handle_popup_key(key),
            View::CreateForm => self.handle_form_key(key),
            View::DeleteConfirm { .. } => self.handle_delete_confirm_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                return self.refresh_all();
            }
            KeyCode::Up | KeyCode::Char('k') => self.previous_task(),
            KeyCode::Down | KeyCode::Char('j') => self.next_task(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.selected_task().is_some() {
                    self.view = View::Popup;
                }
            }
            KeyCode::Char('o') | KeyCode::Char('O') => return self.open_selected(),
            KeyCode::Char('e') | KeyCode::Char('E') => return self.complete_selected(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.open_form(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.view = View::List;
            }
            KeyCode::Char('o') | KeyCode::Char('O') => return self.open_selected(),
            KeyCode::Char('e') | KeyCode::Char('E') => return self.complete_selected(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.open_form(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if self.creating {
            return Vec::new();
        }

        let input = match key.code {
            KeyCode::Esc => {
                self.form.reset();
                self.view = View::List;
                return Vec::new();
            }
            KeyCode::Enter => return self.submit_form(),
            KeyCode::Tab => FormInput::NextField,
            KeyCode::BackTab => FormInput::PrevField,
            KeyCode::Backspace if !key.modifiers.contains(KeyModifiers::ALT) => FormInput::Backspace,
            KeyCode::Left => FormInput::Left,
            KeyCode::Right => FormInput::Right,
            KeyCode::Up => FormInput::Up,
            KeyCode::Down => FormInput::Down,
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                FormInput::Char(c)
            }
            _ => return Vec::new(),
        };
        self.form.handle(input);
        Vec::new()
    }

    fn handle_delete_confirm_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let task_id = match &self.view {
            View::DeleteConfirm { task_id } => task_id.clone(),
            _ => return Vec::new(),
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                tracing::debug!(%task_id, "delete confirmed");
                self.view = View::List;
                vec![Command::DeleteTask(task_id)]
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.view = View::List;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn next_task(&mut self) {
        if !self.tasks.is_empty() {
            self.selected = Some(match self.selected {
                Some(i) if i + 1 < self.tasks.len() => i + 1,
                _ => 0,
            });
        }
    }

    fn previous_task(&mut self) {
        if !self.tasks.is_empty() {
            self.selected = Some(match self.selected {
                Some(i) if i > 0 => i - 1,
                _ => self.tasks.len() - 1,
            });
        }
    }

    fn open_selected(&self) -> Vec<Command> {
        match self.selected_task() {
            Some(task) => vec![Command::OpenUrl(task.url.clone())],
            None => Vec::new(),
        }
    }

    fn complete_selected(&self) -> Vec<Command> {
        match self.selected_task() {
            Some(task) => {
                tracing::debug!(task_id = %task.id, "completing task");
                vec![Command::CompleteTask(task.id.clone())]
            }
            None => Vec::new(),
        }
    }

    fn open_form(&mut self) {
        if self.creating {
            self.set_status("A task is already being created".to_string());
            return;
        }
        self.form.reset();
        self.view = View::CreateForm;
    }

    fn submit_form(&mut self) -> Vec<Command> {
        match self.form.to_new_task() {
            Some(new_task) => {
                tracing::debug!(content = %new_task.content, "submitting new task");
                self.creating = true;
                vec![Command::CreateTask(new_task)]
            }
            None => Vec::new(),
        }
    }

    fn open_delete_confirm(&mut self) {
        if let Some(task_id) = self.selected_task().map(|t| t.id.clone()) {
            self.view = View::DeleteConfirm { task_id };
        }
    }

    /// Task targeted by the delete confirmation, if it is still listed.
    pub fn delete_target(&self) -> Option<&Task> {
        match &self.view {
            View::DeleteConfirm { task_id } => self.tasks.iter().find(|t| &t.id == task_id),
            _ => None,
        }
    }
}
