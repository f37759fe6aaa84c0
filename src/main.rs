use std::{
    error::Error,
    fmt::Write as _,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use stride::{
    app::{App, KeyOutcome},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, StrideEvent, Ticker},
    seed::{load_sessions_file, predefined_sessions},
    session::Session,
    ui::{self, truncate_to_width},
    util::format_time,
};

/// treadmill interval sessions: edit segments, then run them against the clock
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Build treadmill interval sessions out of timed segments (speed and incline) and run them with a live countdown that warns you before every change."
)]
pub struct Cli {
    /// start the countdown as soon as a workout opens
    #[clap(short = 'a', long)]
    auto_start: bool,

    /// JSON file with extra sessions to list next to the built-in ones
    #[clap(short = 's', long, value_name = "FILE")]
    sessions: Option<PathBuf>,

    /// log level written to the log file (error, warn, info, debug, trace)
    #[clap(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// print the available sessions and exit
    #[clap(long)]
    list: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Flags given on the command line win over the stored config
    fn merge_into(&self, mut config: Config) -> Config {
        if self.auto_start {
            config.auto_start = true;
        }
        if let Some(path) = &self.sessions {
            config.sessions_file = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config
    }
}

/// Built-in sessions followed by the ones from `config.sessions_file`.
/// A broken file is reported, not fatal.
fn load_sessions(config: &Config) -> (Vec<Session>, Option<String>) {
    let mut sessions = predefined_sessions();
    let mut notice = None;
    if let Some(path) = &config.sessions_file {
        match load_sessions_file(path) {
            Ok(extra) => sessions.extend(extra),
            Err(e) => {
                tracing::warn!(path = %path.display(), "could not load sessions: {e}");
                notice = Some(format!("Could not load {}: {e}", path.display()));
            }
        }
    }
    (sessions, notice)
}

fn session_listing(sessions: &[Session]) -> String {
    let mut out = String::new();
    for session in sessions {
        let _ = writeln!(
            out,
            "{:<28} {:>3} segments  {}",
            truncate_to_width(&session.name, 28),
            session.segment_count(),
            format_time(session.total_duration())
        );
    }
    out
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let config = cli.merge_into(store.load());

    // logging is best effort; a read-only state dir must not stop a workout
    let _log_guard = logging::init(&AppDirs::log_dir(), &config.log_level).ok();
    tracing::info!(?config, "starting");

    if cli.save_config {
        store.save(&config)?;
        println!("saved config to {}", store.path().display());
    }

    let (sessions, notice) = load_sessions(&config);

    if cli.list {
        if let Some(notice) = notice {
            eprintln!("{notice}");
        }
        print!("{}", session_listing(&sessions));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(sessions, config.auto_start);
    app.notice = notice;
    let ticker = FixedTicker::new(Duration::from_millis(config.tick_interval_ms.max(1)));
    let mut runner = Runner::new(CrosstermEventSource::new(), ticker);
    let result = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match runner.step() {
            StrideEvent::Tick => {
                if app.on_tick() {
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            }
            StrideEvent::Resize => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            StrideEvent::Key(key) => {
                match app.handle_key(key) {
                    KeyOutcome::Quit => break,
                    KeyOutcome::RearmTicker => runner.rearm(),
                    KeyOutcome::Continue => {}
                }
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }
    }

    Ok(())
}
