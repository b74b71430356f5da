mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use todoist_tui::config::Config;
use todoist_tui::tui::run_tui;

fn main() -> Result<()> {
    better_panic::install();

    let cli = Cli::parse();

    let config = Config::load()?;

    // Keep the log file under 1000 lines
    logging::rotate_log(&config);
    logging::setup_logging(&config)?;

    tracing::debug!(?cli, "starting");

    config.ensure_dirs()?;
    run_tui(config, cli.columns(), cli.refresh)
}
