use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::classify::{is_overdue, overdue_count};
use crate::platform::KeyLabels;
use crate::task::{priority_description, priority_label, Task};

use super::app::{App, View};
use super::form::{FieldKind, FormField};

/// Columns of the task table, selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Column {
    Priority,
    Task,
    Project,
}

pub const DEFAULT_COLUMNS: [Column; 2] = [Column::Task, Column::Project];

/// Colors and styles, built once at startup.
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub error: Color,
    pub selection_fg: Color,
    pub selection_bg: Color,
    /// Indexed by priority - 1.
    pub priority: [Color; 4],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(124, 58, 237),
            text: Color::Gray,
            muted: Color::DarkGray,
            error: Color::LightRed,
            selection_fg: Color::Rgb(91, 33, 182),
            selection_bg: Color::Rgb(237, 233, 254),
            priority: [
                Color::Rgb(156, 163, 175),
                Color::Rgb(99, 102, 241),
                Color::Rgb(245, 158, 11),
                Color::Rgb(249, 115, 22),
            ],
        }
    }
}

impl Theme {
    fn priority_color(&self, priority: u8) -> Color {
        self.priority[(priority.clamp(1, 4) - 1) as usize]
    }

    fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    fn label(&self) -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    fn hint(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

/// Everything rendering needs besides the controller state.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub theme: Theme,
    pub columns: Vec<Column>,
    pub keys: KeyLabels,
}

pub fn draw(f: &mut Frame, app: &App, presentation: &Presentation) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(f.area());

    match &app.view {
        View::Loading => draw_notice(f, presentation, chunks[0], "Loading tasks...", false),
        View::Error(message) => {
            draw_notice(f, presentation, chunks[0], &format!("Error: {}", message), true)
        }
        View::List => draw_task_list(f, app, presentation, chunks[0]),
        View::Popup => {
            draw_task_list(f, app, presentation, chunks[0]);
            draw_task_popup(f, app, presentation);
        }
        View::CreateForm => {
            draw_task_list(f, app, presentation, chunks[0]);
            draw_create_form(f, app, presentation);
        }
        View::DeleteConfirm { .. } => {
            draw_task_list(f, app, presentation, chunks[0]);
            draw_delete_confirm(f, app, presentation);
        }
    }

    draw_status_bar(f, app, presentation, chunks[1]);
}

fn outer_block<'a>(theme: &Theme, count: Option<usize>) -> Block<'a> {
    let mut title = vec![Span::styled(" Today's Tasks & Overdue ", theme.title())];
    if let Some(count) = count {
        title.push(Span::styled(format!("({}) ", count), theme.hint()));
    }
    Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
}

fn draw_notice(f: &mut Frame, presentation: &Presentation, area: Rect, text: &str, is_error: bool) {
    let theme = &presentation.theme;
    let color = if is_error { theme.error } else { theme.muted };
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", text), Style::default().fg(color))),
    ])
    .wrap(Wrap { trim: false })
    .block(outer_block(theme, None));
    f.render_widget(body, area);
}

/// Widths of the priority, task and project columns for a given width.
fn column_widths(total: u16) -> (usize, usize, usize) {
    let available = (total as usize).saturating_sub(8);
    let priority_width = 8;
    let mut project_width = 20;
    let mut task_width = available.saturating_sub(priority_width + project_width + 6);
    if task_width < 20 {
        task_width = 20;
        project_width = 15;
    }
    (priority_width, task_width, project_width)
}

fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn header_line(presentation: &Presentation, widths: (usize, usize, usize)) -> Line<'static> {
    let (pw, tw, jw) = widths;
    let style = presentation.theme.label();
    let mut spans = vec![Span::raw("  ")];
    for column in &presentation.columns {
        let (name, width) = match column {
            Column::Priority => ("PRIORITY", pw),
            Column::Task => ("TASK", tw),
            Column::Project => ("PROJECT", jw),
        };
        spans.push(Span::styled(pad(name, width), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn task_line(
    app: &App,
    presentation: &Presentation,
    task: &Task,
    selected: bool,
    widths: (usize, usize, usize),
) -> Line<'static> {
    let theme = &presentation.theme;
    let (pw, tw, jw) = widths;
    let base = if selected {
        Style::default()
            .fg(theme.selection_fg)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.priority_color(task.priority()))
    };

    let marker = if selected { "▸ " } else { "  " };
    let mut spans = vec![Span::styled(marker, base)];
    for column in &presentation.columns {
        let cell = match column {
            Column::Priority => Span::styled(pad(priority_label(task.priority()), pw), base),
            Column::Task => Span::styled(pad(&task.content, tw), base),
            Column::Project => {
                let style = if selected {
                    base
                } else {
                    Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC)
                };
                Span::styled(pad(app.project_name(&task.project_id), jw), style)
            }
        };
        spans.push(cell);
        spans.push(Span::styled("  ", base));
    }
    Line::from(spans)
}

fn draw_task_list(f: &mut Frame, app: &App, presentation: &Presentation, area: Rect) {
    let theme = &presentation.theme;
    let block = outer_block(theme, Some(app.tasks.len()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.tasks.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No tasks due today! Great job!",
                Style::default().fg(theme.text),
            )),
        ]);
        f.render_widget(empty, inner);
        return;
    }

    let today = app.today();
    let widths = column_widths(inner.width);
    let split = overdue_count(&app.tasks, today);

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0usize;

    let sections = [
        ("Overdue", &app.tasks[..split], 0usize, theme.error),
        ("Today", &app.tasks[split..], split, theme.accent),
    ];
    for (title, tasks, offset, color) in sections {
        if tasks.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            format!(" {} ", title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(header_line(presentation, widths));
        for (i, task) in tasks.iter().enumerate() {
            let selected = app.selected == Some(offset + i);
            if selected {
                selected_line = lines.len();
            }
            lines.push(task_line(app, presentation, task, selected, widths));
        }
    }

    let visible = inner.height as usize;
    let scroll = if visible > 0 && selected_line >= visible {
        selected_line + 1 - visible
    } else {
        0
    };

    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
}

fn popup_block<'a>(title: &'a str, color: Color) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn draw_task_popup(f: &mut Frame, app: &App, presentation: &Presentation) {
    let Some(task) = app.selected_task() else {
        return;
    };
    let theme = &presentation.theme;
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{}: ", name), theme.label()),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        field("Title", task.content.clone()),
        Line::from(""),
        field("Priority", priority_description(task.priority()).to_string()),
        Line::from(""),
        field("Project", app.project_name(&task.project_id).to_string()),
        Line::from(""),
    ];

    let due = match &task.due {
        Some(due) => {
            let mut text = due.date.clone();
            if let Some(phrase) = due.string.as_deref().filter(|s| !s.is_empty()) {
                text.push_str(&format!(" ({})", phrase));
            }
            if due.is_recurring {
                text.push_str(" ↻");
            }
            text
        }
        None => "No due date".to_string(),
    };
    let mut due_spans = vec![
        Span::styled("Due Date: ", theme.label()),
        Span::raw(due),
    ];
    if is_overdue(task, app.today()) {
        due_spans.push(Span::styled(
            "  OVERDUE",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(due_spans));
    lines.push(Line::from(""));

    if !task.description.is_empty() {
        lines.push(Line::from(Span::styled("Description:", theme.label())));
        for text in task.description.lines() {
            lines.push(Line::from(text.to_string()));
        }
        lines.push(Line::from(""));
    }

    if !task.labels.is_empty() {
        lines.push(field("Labels", task.labels.join(", ")));
        lines.push(Line::from(""));
    }

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(popup_block(" Task Details ", theme.accent));
    f.render_widget(popup, area);
}

fn draw_create_form(f: &mut Frame, app: &App, presentation: &Presentation) {
    let theme = &presentation.theme;
    let form = &app.form;
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let active = form.active_field();
    let caret = |kind: FieldKind| if active == kind && !app.creating { "│" } else { "" };
    let label = |kind: FieldKind, name: &str| {
        let prefix = if active == kind { "→ " } else { "  " };
        let style = if active == kind {
            theme.title()
        } else {
            theme.label()
        };
        Span::styled(format!("{}{}: ", prefix, name), style)
    };

    let mut content = form.content.clone();
    if app.creating {
        content.push_str(" (Creating...)");
    }

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            label(FieldKind::Content, "Task"),
            Span::raw(format!("{}{}", content, caret(FieldKind::Content))),
        ]),
        Line::from(""),
        Line::from(vec![
            label(FieldKind::Priority, "Priority"),
            Span::styled(
                priority_description(form.priority),
                Style::default().fg(theme.priority_color(form.priority)),
            ),
        ]),
        Line::from(""),
    ];

    match &form.field {
        FormField::Project(picker) => {
            lines.push(Line::from(vec![
                label(FieldKind::Project, "Project"),
                Span::raw(format!("Search: {}│", picker.search)),
            ]));
            let selection = match (picker.selected_project(), picker.selected) {
                (Some(project), Some(i)) => format!(
                    "      Selected: ◀ {} ▶ ({}/{})",
                    project.name,
                    i + 1,
                    picker.matches.len()
                ),
                _ => "      No matching projects".to_string(),
            };
            lines.push(Line::from(Span::styled(selection, theme.hint())));
        }
        _ => {
            lines.push(Line::from(vec![
                label(FieldKind::Project, "Project"),
                Span::raw(form.project_name().to_string()),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        label(FieldKind::Deadline, "Deadline"),
        Span::raw(format!("{}{}", form.deadline, caret(FieldKind::Deadline))),
    ]));
    lines.push(Line::from(""));

    let hint = if app.creating {
        "Creating task...".to_string()
    } else {
        let field_hint = match active {
            FieldKind::Priority => "←/→: change priority",
            FieldKind::Project => "Type: search • ←/→/↑/↓: select • Backspace: clear",
            _ => "Type to edit field",
        };
        format!("Tab: navigate • Enter: create • Esc: cancel\n{}", field_hint)
    };
    for text in hint.lines() {
        lines.push(Line::from(Span::styled(text.to_string(), theme.hint())));
    }

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(popup_block(" Create New Task ", theme.accent));
    f.render_widget(popup, area);
}

fn draw_delete_confirm(f: &mut Frame, app: &App, presentation: &Presentation) {
    let theme = &presentation.theme;
    let area = centered_rect(50, 40, f.area());
    f.render_widget(Clear, area);

    let content = app
        .delete_target()
        .map(|t| t.content.clone())
        .unwrap_or_default();

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Task: ", theme.label()),
            Span::raw(content),
        ]),
        Line::from(""),
        Line::from("Are you sure you want to permanently delete this task?"),
        Line::from(Span::styled(
            "This action cannot be undone.",
            Style::default().fg(theme.error),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press 'y' to confirm • 'n' or Esc to cancel",
            theme.hint(),
        )),
    ];

    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(popup_block(" Delete Task ", theme.error));
    f.render_widget(popup, area);
}

fn key_hint(key: &str, action: &str, theme: &Theme) -> Vec<Span<'static>> {
    vec![
        Span::styled(key.to_string(), Style::default().fg(Color::LightCyan)),
        Span::styled(format!(" {}  ", action), theme.hint()),
    ]
}

fn draw_status_bar(f: &mut Frame, app: &App, presentation: &Presentation, area: Rect) {
    let theme = &presentation.theme;
    let delete = presentation.keys.delete;

    let hints: Vec<(&str, &str)> = match &app.view {
        View::Loading | View::Error(_) => vec![("Esc/Ctrl+C", "quit")],
        View::List if app.tasks.is_empty() => {
            vec![("r", "refresh"), ("q", "new task"), ("Esc/Ctrl+C", "quit")]
        }
        View::List => vec![
            ("↑/↓ j/k", "nav"),
            ("Enter", "details"),
            ("e", "complete"),
            ("o", "open"),
            ("q", "new"),
            ("r", "refresh"),
            ("Esc", "quit"),
        ],
        View::Popup => vec![
            ("e", "complete"),
            ("o", "open in Todoist"),
            ("q", "new"),
            ("Esc", "close"),
        ],
        View::CreateForm => vec![("Enter", "create"), ("Esc", "cancel")],
        View::DeleteConfirm { .. } => vec![("y", "confirm"), ("n/Esc", "cancel")],
    };

    let mut spans: Vec<Span> = hints
        .into_iter()
        .flat_map(|(key, action)| key_hint(key, action, theme))
        .collect();

    if matches!(app.view, View::List | View::Popup) && !app.tasks.is_empty() {
        spans.push(Span::styled(delete.to_string(), theme.hint()));
    }

    if let Some((msg, _)) = &app.status_message {
        spans.push(Span::styled(" │ ", theme.hint()));
        spans.push(Span::styled(msg.clone(), Style::default().fg(Color::LightYellow)));
    }

    let status = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.hint()),
    );
    f.render_widget(status, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
