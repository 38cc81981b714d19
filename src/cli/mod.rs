//! TUI front-end entry (Ratatui + Crossterm)
//! - Opens the SQLite store directly, no server needed
//! - Sets up terminal

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::database::db::{migrate, queries};

pub mod api;
pub mod state;
pub mod input;
pub mod util;
pub mod ui;


pub async fn run(config: &Config) -> Result<()> {

    let mut app = init_app(config).await?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    // restore the terminal even when the loop failed
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut state::App,
) -> Result<()> {
    app.refresh_expenses().await?;

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key).await?;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.quit {
            return Ok(());
        }
    }
}

pub async fn init_app(config: &Config) -> Result<state::App> {
    let client = api::Client::sqlite(&config.database_url, config.max_connections).await?;

    let pool = client.pool();
    migrate::run_migrations(pool).await?;
    queries::seed_fixed_categories(pool).await?;

    Ok(state::App::new(client))
}
