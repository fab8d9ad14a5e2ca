use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use cloudcate::api::{format_search_error, SearchClient};
use cloudcate::app::App;
use cloudcate::config::Config;
use cloudcate::location::{location_url, query_from_url, HistoryLocation};
use cloudcate::query::SearchQuery;
use cloudcate::search::{run_search, SearchController, SearchState};
use cloudcate::ui::results::{format_plain, results_view};
use cloudcate::{event, ui};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use url::Url;

/// Search a cloud resource inventory by name
#[derive(Parser, Debug)]
#[command(name = "cloudcate", version, about, long_about = None)]
struct Args {
    /// Search backend base URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Start from a shared location (e.g. http://host/?q=web&type=ec2)
    #[arg(short, long)]
    location: Option<String>,

    /// Resource name to search for (may be partial)
    #[arg(short, long)]
    name: Option<String>,

    /// Resource type filter, optionally with subtype (e.g. s3, iam:user)
    #[arg(short = 't', long = "type")]
    resource_type: Option<String>,

    /// Run one search, print the table to stdout and exit
    #[arg(long)]
    print: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cloudcate started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cloudcate").join("cloudcate.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cloudcate").join("cloudcate.log");
    }
    PathBuf::from("cloudcate.log")
}

/// Endpoint precedence: --endpoint, then the origin of --location, then
/// environment/config, then the default.
fn resolve_endpoint(args: &Args, config: &Config) -> Result<String> {
    if args.endpoint.is_some() {
        return Ok(config.effective_endpoint(args.endpoint.as_deref()));
    }
    if let Some(href) = &args.location {
        let url = Url::parse(href).with_context(|| format!("Invalid location: {}", href))?;
        return Ok(url.origin().ascii_serialization());
    }
    Ok(config.effective_endpoint(None))
}

/// Starting location: --location, else the last session's query rebased
/// onto the current endpoint, else the endpoint root.
fn initial_location(args: &Args, config: &Config, client: &SearchClient) -> Result<HistoryLocation> {
    if let Some(href) = &args.location {
        return HistoryLocation::parse(href);
    }

    let query = config
        .last_location
        .as_deref()
        .and_then(|href| match Url::parse(href) {
            Ok(url) => Some(query_from_url(&url)),
            Err(e) => {
                tracing::warn!("Ignoring saved location {:?}: {}", href, e);
                None
            },
        })
        .unwrap_or_default();

    Ok(HistoryLocation::new(location_url(client.endpoint(), &query)))
}

/// Apply --name / --type on top of the location's query
fn query_overrides(args: &Args, base: &SearchQuery) -> Option<SearchQuery> {
    if args.name.is_none() && args.resource_type.is_none() {
        return None;
    }
    let mut query = base.clone();
    if let Some(name) = &args.name {
        query.term = name.clone();
    }
    if let Some(selector) = &args.resource_type {
        if selector.is_empty() {
            query.clear_selector();
        } else {
            query.set_selector(selector);
        }
    }
    Some(query)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = Config::load();
    let endpoint = resolve_endpoint(&args, &config)?;
    tracing::info!("Using endpoint: {}", endpoint);

    let client = SearchClient::new(&endpoint, config.effective_timeout())?;
    let location = initial_location(&args, &config, &client)?;

    let mut app = App::new(client, location, config);
    if let Some(query) = query_overrides(&args, &app.query) {
        app.set_query(query);
    }

    if args.print {
        return print_once(&app).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = run_app(&mut terminal, &mut app).await;
    cleanup_terminal(&mut terminal)?;
    app.save_location();

    if let Err(err) = run_result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Run the current query once and write the outcome to stdout
async fn print_once(app: &App) -> Result<()> {
    let mut controller = SearchController::new();
    let Some(request) = controller.dispatch(&app.query) else {
        bail!("Nothing to search for: pass --name or a location with a non-blank q");
    };

    let message = run_search(&app.client, &request).await;
    controller.handle(message);

    match controller.state() {
        SearchState::Failed(err) => bail!(format_search_error(err)),
        _ => {
            print!("{}", format_plain(&results_view(controller.results())));
            Ok(())
        },
    }
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app).await? {
            return Ok(());
        }

        app.drain_messages();
        app.on_tick();
    }
}
