use clap::Parser;

use todoist_tui::tui::ui::{Column, DEFAULT_COLUMNS};

#[derive(Parser, Debug)]
#[command(name = "todoist-tui")]
#[command(about = "Todoist TUI - Today's and overdue tasks in your terminal")]
#[command(version)]
pub struct Cli {
    /// Columns of the task table, comma separated
    #[arg(long, value_enum, value_delimiter = ',', default_value = "task,project")]
    pub columns: Vec<Column>,

    /// Ignore the cache age and fetch everything from Todoist at startup
    #[arg(long)]
    pub refresh: bool,
}

impl Cli {
    pub fn columns(&self) -> Vec<Column> {
        if self.columns.is_empty() {
            DEFAULT_COLUMNS.to_vec()
        } else {
            self.columns.clone()
        }
    }
}
