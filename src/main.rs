mod app;
use app::App;

mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use ratatui::Terminal;
use ratatui::crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::{Backend, CrosstermBackend};
use ratatui_image::picker::Picker;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::config::{Config, default_log_file};
use crate::app::decoder::CatalogDecoder;
use crate::app::movie::Movie;
use crate::app::network::{HttpFetcher, TcpProbe};
use crate::app::orchestrator::Pipeline;
use crate::app::sort::SortMode;
use crate::app::{CurrentScreen, ScreenState};

#[derive(Parser)]
#[command(name = "popular_movies")]
#[command(about = "Browse TMDB's popular and top rated movies in the terminal")]
#[command(version)]
struct Cli {
    /// TMDB API key (overrides TMDB_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,
    /// Print one catalog to stdout and exit, no interactive TUI
    #[arg(long)]
    cli: bool,
    /// Catalog printed in --cli mode
    #[arg(long, value_enum, default_value_t = SortArg::Popular)]
    sort: SortArg,
    /// Where to write the log file in TUI mode
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Popular,
    TopRated,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Popular => SortMode::Popular,
            SortArg::TopRated => SortMode::TopRated,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.cli {
        init_stderr_logging();
    } else {
        let log_file = cli.log_file.clone().unwrap_or_else(default_log_file);
        init_file_logging(&log_file)?;
    }

    let config = Config::load()?.with_api_key(cli.api_key.clone());
    let pipeline = build_pipeline(&config)?;

    if cli.cli {
        return run_headless(&config, &pipeline, cli.sort.into());
    }

    // setup terminal
    enable_raw_mode()?;
    let mut stderr = io::stderr(); // This is a special case. Normally using stdout is fine
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let mut app = App::new(config, pipeline);
    app.picker = Some(Picker::from_query_stdio().unwrap_or_else(|_| Picker::from_fontsize((8, 16))));
    app.watch_connectivity(app.config.connectivity_poll_interval());
    app.start();
    let result = run_app(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "terminal loop failed");
    }
    result
}

fn init_stderr_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("popular_movies=warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_filter(filter))
        .init();
}

// The terminal belongs to the UI, so logs go to a file.
fn init_file_logging(path: &Path) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create log directory: {}", dir.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("popular_movies=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(filter),
        )
        .init();
    Ok(())
}

fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let connectivity = TcpProbe::for_url(&config.api_base, config.probe_timeout())
        .with_context(|| format!("Invalid API base URL: {}", config.api_base))?;

    Ok(Pipeline {
        fetcher: Arc::new(fetcher),
        connectivity: Arc::new(connectivity),
        decoder: CatalogDecoder::new(config.image_base.clone(), config.image_size.clone()),
    })
}

fn run_headless(config: &Config, pipeline: &Pipeline, sort: SortMode) -> Result<()> {
    if config.api_key.is_none() {
        bail!("No TMDB API key configured. Set TMDB_API_KEY or pass --api-key");
    }
    let url = config
        .endpoint(sort)
        .context("No endpoint for the requested sort order")?;

    let movies = pipeline
        .load_catalog(&url)
        .with_context(|| format!("Failed to load the {} catalog", sort.label().to_lowercase()))?;
    info!(count = movies.len(), "catalog loaded");

    print!("{}", format_catalog(&movies));
    Ok(())
}

fn format_catalog(movies: &[Movie]) -> String {
    let mut out = String::new();
    for (rank, movie) in movies.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<45} {:>4.1}  {}\n",
            rank + 1,
            movie.title(),
            movie.vote_average(),
            movie.release_date()
        ));
    }
    out
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: std::error::Error + Send + Sync + 'static,
{
    loop {
        app.tick();
        terminal.draw(|f| ui::ui(f, app))?;

        // Apply results from background fetches
        app.handle_fetch_messages();

        // Poll for events with a timeout to allow UI updates
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Release {
                    // Skip events that are not KeyEventKind::Press
                    continue;
                }

                match app.current_screen {
                    CurrentScreen::Main => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('p') => app.select_sort(SortMode::Popular),
                        KeyCode::Char('r') => app.select_sort(SortMode::TopRated),
                        KeyCode::Enter => {
                            if let Some(event) = app.select_current_movie() {
                                app.handle_event(event);
                            }
                        }
                        _ if app.state == ScreenState::Displaying => match key.code {
                            KeyCode::Down | KeyCode::Char('j') => app.grid.move_down(),
                            KeyCode::Up | KeyCode::Char('k') => app.grid.move_up(),
                            KeyCode::Right | KeyCode::Char('l') => app.grid.move_right(),
                            KeyCode::Left | KeyCode::Char('h') => app.grid.move_left(),
                            _ => {}
                        },
                        _ => {}
                    },
                    CurrentScreen::MovieDetail => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Esc | KeyCode::Char('b') => app.close_detail(),
                        _ => {}
                    },
                }
            }
        }
    }
}
