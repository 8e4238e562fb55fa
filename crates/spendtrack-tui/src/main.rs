//! SpendTrack - a terminal client for the expense-tracker backend.
//!
//! Runs the interactive shell by default. A few flags run one-shot commands
//! against the backend instead (see `print_usage`).

mod app;
mod ui;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spendtrack_core::api::ApiClient;
use spendtrack_core::auth::{Session, SessionContext};
use spendtrack_core::config::Config;
use spendtrack_core::flow::{LoginForm, LoginOutcome};
use spendtrack_core::notify::ToastHost;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written in interactive mode
const LOG_FILE: &str = "spendtrack.log";

/// Initialize the tracing subscriber for logging.
///
/// With a log directory, output goes to a file there so it does not draw
/// over the terminal UI; otherwise it goes to stderr.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(dir) = log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(filter)
            .init();
        return None;
    };

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if let Some(command) = args.get(1) {
        init_tracing(None);
        return run_command(command, &args[2..]).await;
    }

    let config = Config::load().context("Failed to load config")?;
    let _log_guard = init_tracing(config.data_dir().ok().as_deref());
    info!("SpendTrack starting");

    // Build the app before touching the terminal so config errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

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

    info!("SpendTrack shutting down");
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
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Settle finished auth requests, then expire old toasts
        app.check_background_tasks();
        app.tick();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// CLI Commands
// ============================================================================

fn print_usage() {
    eprintln!("Usage: spendtrack [COMMAND]");
    eprintln!();
    eprintln!("Without a command, starts the interactive client.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  --health            Check the backend health endpoint");
    eprintln!("  --status            Show the backend status");
    eprintln!("  --activate <token>  Activate a newly registered profile");
    eprintln!("  --login             Log in and store the session token");
    eprintln!("  --logout            Forget the stored session token");
}

async fn run_command(command: &str, rest: &[String]) -> Result<()> {
    match command {
        "--health" => {
            let api = build_client(&Config::load()?)?;
            let body = api.health().await?;
            println!("{}", body);
        }
        "--status" => {
            let api = build_client(&Config::load()?)?;
            let body = api.status().await?;
            println!("{}", body);
        }
        "--activate" => {
            let token = rest
                .first()
                .ok_or_else(|| anyhow::anyhow!("--activate requires an activation token"))?;
            let api = build_client(&Config::load()?)?;
            let body = api.activate(token).await?;
            println!("{}", body);
        }
        "--login" => login_interactive().await?,
        "--logout" => {
            let config = Config::load()?;
            let session = Session::new(config.token_store()?, SessionContext::new());
            session.sign_out()?;
            eprintln!("Logged out.");
        }
        "--help" | "-h" => print_usage(),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {}", other);
        }
    }
    Ok(())
}

/// API client carrying the stored token, if any
fn build_client(config: &Config) -> Result<ApiClient> {
    let endpoints = config
        .endpoints()
        .context("Invalid API endpoint configuration")?;
    let mut api = ApiClient::new(endpoints)?;

    let session = Session::new(config.token_store()?, SessionContext::new());
    match session.stored_token() {
        Ok(Some(token)) => api.set_token(token),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Failed to read stored token"),
    }
    Ok(api)
}

/// Run the login form from the command line
async fn login_interactive() -> Result<()> {
    let mut config = Config::load()?;
    let api = build_client(&config)?;
    let session = Session::new(config.token_store()?, SessionContext::new());
    let (mut toasts, toaster) = ToastHost::new();

    let default_email = std::env::var("SPENDTRACK_EMAIL")
        .ok()
        .or_else(|| config.last_email.clone())
        .unwrap_or_default();
    let email = prompt_line("Email", &default_email)?;
    let password = match std::env::var("SPENDTRACK_PASSWORD") {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    let mut form = LoginForm::with_email(email);
    form.password = password;

    let outcome = form.submit(&api, &session, &toaster).await;

    toasts.poll(Utc::now());
    for toast in toasts.visible() {
        eprintln!("{}", toast.message);
    }

    match outcome {
        LoginOutcome::LoggedIn { .. } => {
            config.last_email = Some(form.email.trim().to_string());
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            if let Some(user) = session.context().user() {
                eprintln!("Signed in as {}", user.display_name());
            }
            Ok(())
        }
        LoginOutcome::MissingToken => anyhow::bail!("Login response did not include a token"),
        LoginOutcome::Invalid(e) => anyhow::bail!("{}", e),
        LoginOutcome::Failed(message) => anyhow::bail!("{}", message),
        LoginOutcome::Ignored => Ok(()),
    }
}

fn prompt_line(label: &str, default: &str) -> Result<String> {
    if default.is_empty() {
        eprint!("{}: ", label);
    } else {
        eprint!("{} [{}]: ", label, default);
    }
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    Ok(if line.is_empty() { default } else { line }.to_string())
}
