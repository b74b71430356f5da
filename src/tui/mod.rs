pub mod app;
pub mod form;
pub mod message;
pub mod ui;
pub mod worker;

use anyhow::{Context, Result};
use ratatui::crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::cache::CacheGateway;
use crate::config::Config;
use crate::platform::KeyLabels;
use crate::service::TodoistClient;

use app::App;
use message::Command;
use ui::{Column, Presentation, Theme};
use worker::Worker;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run_tui(config: Config, columns: Vec<Column>, force_refresh: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let (sender, mut receiver) = mpsc::unbounded_channel();

    let (mut app, worker) = match &config.token {
        Some(token) => {
            let client = TodoistClient::with_options(token, &config.api_base, config.request_timeout);
            let worker = Worker::new(
                runtime.handle().clone(),
                Arc::new(client),
                CacheGateway::new(config.cache_dir.clone()),
                config.cache_max_age,
                sender,
            );
            (App::new(), Some(worker))
        }
        None => {
            tracing::warn!("no API token configured");
            (App::missing_credential(), None)
        }
    };

    let presentation = Presentation {
        theme: Theme::default(),
        columns,
        keys: KeyLabels::current(),
    };

    let dispatch = |commands: Vec<Command>| {
        if let Some(worker) = &worker {
            for command in commands {
                worker.dispatch(command);
            }
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    app.resize(size.width, size.height);
    dispatch(app.init(force_refresh));

    let result = event_loop(&mut terminal, &mut app, &presentation, &mut receiver, &dispatch);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    runtime.shutdown_background();
    tracing::debug!("interface closed");
    result
}

fn event_loop<F>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    presentation: &Presentation,
    receiver: &mut mpsc::UnboundedReceiver<message::Message>,
    dispatch: &F,
) -> Result<()>
where
    F: Fn(Vec<Command>),
{
    loop {
        terminal.draw(|f| ui::draw(f, app, presentation))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => dispatch(app.handle_key(key)),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        while let Ok(message) = receiver.try_recv() {
            dispatch(app.handle_message(message));
        }

        if app.should_quit {
            return Ok(());
        }

        app.clear_old_status();
    }
}
