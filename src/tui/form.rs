use crate::fuzzy::filter_projects;
use crate::project::Project;
use crate::task::NewTask;

pub const DEFAULT_PRIORITY: u8 = 1;
pub const DEFAULT_DEADLINE: &str = "today";
/// Shown when no project is chosen; the service files such tasks in the inbox.
pub const FALLBACK_PROJECT_NAME: &str = "Inbox";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectChoice {
    pub id: String,
    pub name: String,
}

impl From<&Project> for ProjectChoice {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
        }
    }
}

/// Search state of the project field. Lives only while that field has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPicker {
    pub search: String,
    pub matches: Vec<Project>,
    pub selected: Option<usize>,
}

impl ProjectPicker {
    /// Start with every project listed and the current choice highlighted.
    fn open(projects: &[Project], current: Option<&ProjectChoice>) -> Self {
        let matches = projects.to_vec();
        let selected = current
            .and_then(|c| matches.iter().position(|p| p.id == c.id))
            .or(if matches.is_empty() { None } else { Some(0) });
        Self {
            search: String::new(),
            matches,
            selected,
        }
    }

    fn refilter(&mut self, projects: &[Project]) {
        self.matches = filter_projects(projects, &self.search);
        self.selected = if self.matches.is_empty() { None } else { Some(0) };
    }

    fn step(&mut self, forward: bool) {
        let len = self.matches.len();
        if len == 0 {
            return;
        }
        let current = self.selected.unwrap_or(0);
        self.selected = Some(if forward {
            (current + 1) % len
        } else if current == 0 {
            len - 1
        } else {
            current - 1
        });
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected.and_then(|i| self.matches.get(i))
    }
}

/// The focused field. Only the project field carries extra state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Content,
    Priority,
    Project(ProjectPicker),
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Content,
    Priority,
    Project,
    Deadline,
}

impl FormField {
    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::Content => FieldKind::Content,
            FormField::Priority => FieldKind::Priority,
            FormField::Project(_) => FieldKind::Project,
            FormField::Deadline => FieldKind::Deadline,
        }
    }
}

impl FieldKind {
    fn next(self) -> Self {
        match self {
            FieldKind::Content => FieldKind::Priority,
            FieldKind::Priority => FieldKind::Project,
            FieldKind::Project => FieldKind::Deadline,
            FieldKind::Deadline => FieldKind::Content,
        }
    }

    fn prev(self) -> Self {
        match self {
            FieldKind::Content => FieldKind::Deadline,
            FieldKind::Priority => FieldKind::Content,
            FieldKind::Project => FieldKind::Priority,
            FieldKind::Deadline => FieldKind::Project,
        }
    }
}

/// Input the form understands, already decoded from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Char(char),
    Backspace,
    Left,
    Right,
    Up,
    Down,
    NextField,
    PrevField,
}

#[derive(Debug, Clone)]
pub struct CreateTaskForm {
    pub content: String,
    pub priority: u8,
    pub project: Option<ProjectChoice>,
    pub deadline: String,
    pub field: FormField,
    projects: Vec<Project>,
}

impl Default for CreateTaskForm {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CreateTaskForm {
    pub fn new(projects: Vec<Project>) -> Self {
        let project = projects.first().map(ProjectChoice::from);
        Self {
            content: String::new(),
            priority: DEFAULT_PRIORITY,
            project,
            deadline: DEFAULT_DEADLINE.to_string(),
            field: FormField::Content,
            projects,
        }
    }

    /// Back to defaults, keeping the known projects.
    pub fn reset(&mut self) {
        let projects = std::mem::take(&mut self.projects);
        *self = Self::new(projects);
    }

    /// Replace the project list and reseed the default project.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.project = projects.first().map(ProjectChoice::from);
        self.projects = projects;
        if let FormField::Project(picker) = &mut self.field {
            *picker = ProjectPicker::open(&self.projects, self.project.as_ref());
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn active_field(&self) -> FieldKind {
        self.field.kind()
    }

    pub fn project_name(&self) -> &str {
        self.project
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or(FALLBACK_PROJECT_NAME)
    }

    pub fn can_submit(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Request for the service, or `None` while the content is blank.
    pub fn to_new_task(&self) -> Option<NewTask> {
        if !self.can_submit() {
            return None;
        }
        Some(NewTask::new(
            &self.content,
            self.priority,
            self.project.as_ref().map(|p| p.id.as_str()),
            &self.deadline,
        ))
    }

    pub fn focus(&mut self, kind: FieldKind) {
        self.field = match kind {
            FieldKind::Content => FormField::Content,
            FieldKind::Priority => FormField::Priority,
            FieldKind::Project => {
                let picker = ProjectPicker::open(&self.projects, self.project.as_ref());
                self.project = picker.selected_project().map(ProjectChoice::from);
                FormField::Project(picker)
            }
            FieldKind::Deadline => FormField::Deadline,
        };
    }

    pub fn handle(&mut self, input: FormInput) {
        match input {
            FormInput::NextField => self.focus(self.active_field().next()),
            FormInput::PrevField => self.focus(self.active_field().prev()),
            _ => self.handle_field_input(input),
        }
    }

    fn handle_field_input(&mut self, input: FormInput) {
        match &mut self.field {
            FormField::Content => match input {
                FormInput::Char(c) => push_printable(&mut self.content, c),
                FormInput::Backspace => {
                    self.content.pop();
                }
                FormInput::Up => self.focus(FieldKind::Content.prev()),
                FormInput::Down => self.focus(FieldKind::Content.next()),
                _ => {}
            },
            FormField::Priority => match input {
                FormInput::Left => self.priority = self.priority.saturating_sub(1).max(1),
                FormInput::Right => self.priority = (self.priority + 1).min(4),
                FormInput::Up => self.focus(FieldKind::Priority.prev()),
                FormInput::Down => self.focus(FieldKind::Priority.next()),
                _ => {}
            },
            FormField::Project(picker) => {
                match input {
                    FormInput::Char(c) if !c.is_control() => {
                        picker.search.push(c);
                        picker.refilter(&self.projects);
                    }
                    FormInput::Backspace => {
                        if picker.search.pop().is_some() {
                            picker.refilter(&self.projects);
                        }
                    }
                    FormInput::Right | FormInput::Down => picker.step(true),
                    FormInput::Left | FormInput::Up => picker.step(false),
                    _ => return,
                }
                self.project = picker.selected_project().map(ProjectChoice::from);
            }
            FormField::Deadline => match input {
                FormInput::Char(c) => push_printable(&mut self.deadline, c),
                FormInput::Backspace => {
                    self.deadline.pop();
                }
                FormInput::Up => self.focus(FieldKind::Deadline.prev()),
                FormInput::Down => self.focus(FieldKind::Deadline.next()),
                _ => {}
            },
        }
    }
}

fn push_printable(target: &mut String, c: char) {
    if !c.is_control() {
        target.push(c);
    }
}
