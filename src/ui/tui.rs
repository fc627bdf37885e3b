// src/ui/tui.rs
//! Terminal setup and the main event/render loop.

use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::{app::App, config::AppConfig};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the player until the user quits. `initial` is opened before the first frame.
pub fn run(config: AppConfig, initial: Option<PathBuf>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config, initial);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("player exited with error: {:#}", e);
    }
    result
}

fn run_app(terminal: &mut Term, config: AppConfig, initial: Option<PathBuf>) -> Result<()> {
    let mut app = App::new(config)?;
    if let Some(path) = initial {
        app.open(&path);
    }

    let tick_rate = Duration::from_secs_f64(1.0 / app.config().display.tick_hz as f64);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| app.draw(f))?;

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if app.on_key(key) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.on_tick();
        }
    }

    app.shutdown();
    Ok(())
}
