mod helpers;

use helpers::sample_projects;
use todoist_tui::tui::form::{
    CreateTaskForm, FieldKind, FormField, FormInput, DEFAULT_DEADLINE, DEFAULT_PRIORITY,
    FALLBACK_PROJECT_NAME,
};

fn type_str(form: &mut CreateTaskForm, text: &str) {
    for c in text.chars() {
        form.handle(FormInput::Char(c));
    }
}

fn project_form() -> CreateTaskForm {
    let mut form = CreateTaskForm::new(sample_projects());
    form.focus(FieldKind::Project);
    form
}

#[test]
fn new_form_has_defaults() {
    let form = CreateTaskForm::new(sample_projects());

    assert!(form.content.is_empty());
    assert_eq!(form.priority, DEFAULT_PRIORITY);
    assert_eq!(form.deadline, DEFAULT_DEADLINE);
    assert_eq!(form.active_field(), FieldKind::Content);
    assert_eq!(form.project_name(), "Inbox");
}

#[test]
fn form_without_projects_falls_back_to_inbox() {
    let form = CreateTaskForm::default();

    assert!(form.project.is_none());
    assert_eq!(form.project_name(), FALLBACK_PROJECT_NAME);
}

#[test]
fn focus_cycles_both_ways() {
    let mut form = CreateTaskForm::new(sample_projects());

    let mut seen = Vec::new();
    for _ in 0..4 {
        form.handle(FormInput::NextField);
        seen.push(form.active_field());
    }
    assert_eq!(
        seen,
        vec![
            FieldKind::Priority,
            FieldKind::Project,
            FieldKind::Deadline,
            FieldKind::Content
        ]
    );

    form.handle(FormInput::PrevField);
    assert_eq!(form.active_field(), FieldKind::Deadline);
}

#[test]
fn content_appends_and_backspaces() {
    let mut form = CreateTaskForm::new(sample_projects());

    type_str(&mut form, "Buy milk");
    form.handle(FormInput::Backspace);

    assert_eq!(form.content, "Buy mil");
}

#[test]
fn priority_is_clamped() {
    let mut form = CreateTaskForm::new(sample_projects());
    form.focus(FieldKind::Priority);

    form.handle(FormInput::Left);
    assert_eq!(form.priority, 1);

    for _ in 0..10 {
        form.handle(FormInput::Right);
    }
    assert_eq!(form.priority, 4);
}

#[test]
fn project_search_filters_and_selects_first_match() {
    let mut form = project_form();

    type_str(&mut form, "ork");

    match &form.field {
        FormField::Project(picker) => {
            assert_eq!(picker.search, "ork");
            assert_eq!(picker.matches.len(), 1);
            assert_eq!(picker.selected, Some(0));
        }
        other => panic!("unexpected field {:?}", other),
    }
    assert_eq!(form.project_name(), "Work");
}

#[test]
fn project_search_without_match_clears_selection() {
    let mut form = project_form();

    type_str(&mut form, "xyz");

    match &form.field {
        FormField::Project(picker) => assert_eq!(picker.selected, None),
        other => panic!("unexpected field {:?}", other),
    }
    assert!(form.project.is_none());

    form.handle(FormInput::Backspace);
    form.handle(FormInput::Backspace);
    form.handle(FormInput::Backspace);
    assert_eq!(form.project_name(), "Inbox");
}

#[test]
fn refocusing_project_after_failed_search_keeps_picker_and_request_in_sync() {
    let mut form = project_form();
    type_str(&mut form, "zzz");
    assert!(form.project.is_none());

    form.handle(FormInput::NextField);
    form.handle(FormInput::PrevField);
    assert_eq!(form.active_field(), FieldKind::Project);

    let highlighted = match &form.field {
        FormField::Project(picker) => picker.selected_project().map(|p| p.id.clone()),
        other => panic!("unexpected field {:?}", other),
    };
    form.content = "Call mom".to_string();
    let request = form.to_new_task().unwrap();

    assert_eq!(highlighted.as_deref(), Some("p1"));
    assert_eq!(request.project_id, highlighted);
    assert_eq!(form.project_name(), "Inbox");
}

#[test]
fn project_selection_wraps() {
    let mut form = project_form();

    form.handle(FormInput::Left);
    assert_eq!(form.project_name(), "Home");

    form.handle(FormInput::Right);
    assert_eq!(form.project_name(), "Inbox");

    form.handle(FormInput::Down);
    form.handle(FormInput::Down);
    form.handle(FormInput::Down);
    assert_eq!(form.project_name(), "Inbox");
}

#[test]
fn arrows_move_focus_outside_project_field() {
    let mut form = CreateTaskForm::new(sample_projects());

    form.handle(FormInput::Down);
    assert_eq!(form.active_field(), FieldKind::Priority);

    form.handle(FormInput::Up);
    form.handle(FormInput::Up);
    assert_eq!(form.active_field(), FieldKind::Deadline);
}

#[test]
fn submission_requires_content() {
    let mut form = CreateTaskForm::new(sample_projects());
    assert!(form.to_new_task().is_none());

    type_str(&mut form, "   ");
    assert!(!form.can_submit());
    assert!(form.to_new_task().is_none());

    type_str(&mut form, "Pay rent");
    form.focus(FieldKind::Deadline);
    for _ in 0..DEFAULT_DEADLINE.len() {
        form.handle(FormInput::Backspace);
    }
    type_str(&mut form, "every friday");

    let request = form.to_new_task().unwrap();
    assert_eq!(request.content, "   Pay rent");
    assert_eq!(request.project_id.as_deref(), Some("p1"));
    assert_eq!(request.due_string.as_deref(), Some("every friday"));
}

#[test]
fn reset_keeps_projects() {
    let mut form = CreateTaskForm::new(sample_projects());
    type_str(&mut form, "draft");
    form.focus(FieldKind::Project);
    form.handle(FormInput::Right);

    form.reset();

    assert!(form.content.is_empty());
    assert_eq!(form.active_field(), FieldKind::Content);
    assert_eq!(form.projects().len(), 3);
    assert_eq!(form.project_name(), "Inbox");
}
