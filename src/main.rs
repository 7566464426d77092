//! Pricewatch - a terminal client for the Price Tracker service.
//!
//! This application provides a fast, keyboard-driven interface for
//! browsing the product catalog, managing favorites, and charting
//! price history across shopping platforms.

mod api;
mod app;
mod auth;
mod config;
mod models;
mod router;
mod ui;
mod utils;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::ApiClient;
use app::{App, AppState};
use auth::{CredentialStore, SessionData, SessionStore, TokenStore};
use config::Config;
use router::{NavigationError, Navigator, Route};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name in the cache directory
const LOG_FILE: &str = "pricewatch.log";

/// Initialize tracing to a log file.
///
/// The terminal is owned by the TUI, so logs go to a rolling file under
/// the cache directory. Use RUST_LOG to control the level.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = Config::log_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Some(guard)
}

/// Navigator for headless CLI runs.
///
/// There are no screens to move between, so navigation requests are
/// accepted and dropped. A 401 still clears the stored session before
/// the error reaches the caller.
struct HeadlessNavigator;

impl Navigator for HeadlessNavigator {
    fn current_path(&self) -> String {
        "/".to_string()
    }

    fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        debug!(path, "headless run, navigation request dropped");
        Ok(())
    }

    fn force_redirect(&self, path: &str) {
        debug!(path, "headless run, hard redirect dropped");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--login" {
        return login_cli().await;
    }
    if args.len() > 1 && args[1] == "--scrape" {
        return scrape_cli(args.get(2).cloned()).await;
    }

    info!("Pricewatch starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new()?;

    if app.is_authenticated() {
        app.refresh_all();
    } else {
        app.navigate(Route::Login);
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Pricewatch shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Apply completed fetches, navigation requests, forced redirects
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

/// Headless login: authenticate and persist a session for later runs
async fn login_cli() -> Result<()> {
    let mut config = Config::load()?;

    let email = {
        let default = config.last_email.clone().unwrap_or_default();
        if default.is_empty() {
            print!("Email: ");
        } else {
            print!("Email [{}]: ", default);
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();
        if input.is_empty() {
            default
        } else {
            input.to_string()
        }
    };

    if email.is_empty() {
        anyhow::bail!("An email address is required");
    }

    let password = if CredentialStore::is_remembered(&email) {
        print!("Use remembered password? [Y/n]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().eq_ignore_ascii_case("n") {
            rpassword::prompt_password("Password: ")?
        } else {
            CredentialStore::recall(&email)?
        }
    } else {
        rpassword::prompt_password("Password: ")?
    };

    println!("Authenticating...");

    let tokens = Arc::new(SessionStore::new(Config::data_dir()?));
    let api = ApiClient::new(
        config.api_base_url(),
        tokens.clone(),
        Arc::new(HeadlessNavigator),
    )?;

    let token = api.login(&email, &password).await?;
    tokens.write(&SessionData::new(token.access_token, email.clone()))?;

    if let Err(e) = CredentialStore::remember(&email, &password) {
        eprintln!("Warning: could not store password in keychain: {}", e);
    }

    config.last_email = Some(email);
    config.save()?;

    println!("Login successful.");
    Ok(())
}

/// Headless scrape trigger using the saved session
async fn scrape_cli(target: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let tokens = Arc::new(SessionStore::new(Config::data_dir()?));

    if tokens.load()?.is_none() {
        anyhow::bail!("No saved session. Run `pricewatch --login` first.");
    }

    let api = ApiClient::new(
        config.api_base_url(),
        tokens.clone(),
        Arc::new(HeadlessNavigator),
    )?;

    let task = api.trigger_scrape(target.as_deref()).await?;
    match task.task_id {
        Some(id) => println!("Scrape {} (task {})", task.status, id),
        None => println!("Scrape {}", task.status),
    }
    Ok(())
}
