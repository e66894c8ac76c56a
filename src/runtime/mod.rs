use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use cadence::app::App;
use cadence::engine::RodioBackend;
use cadence::player::{PlayerOptions, TrackPlayer};

mod event_loop;
mod logging;
mod settings;
mod startup;

/// Command-line arguments for cadence
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Play a directory or playlist manifest in the terminal")]
#[command(version)]
pub struct Args {
    /// Music directory or `.toml` playlist manifest (defaults to the current directory)
    pub source: Option<PathBuf>,

    /// Index of the track to load first
    #[arg(short, long)]
    pub track: Option<usize>,

    /// Config file to read instead of the default location
    #[arg(short, long, env = "CADENCE_CONFIG_PATH")]
    pub config: Option<PathBuf>,
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = settings::load_settings(args.config.as_deref());
    logging::init(&settings.logging);

    let source = match args.source.clone() {
        Some(p) => p,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };
    let supply = startup::load_playlist(&source, &settings.library)?;
    let initial = startup::clamp_index(
        startup::initial_index(args.track, supply.initial, settings.player.initial_track),
        supply.playlist.len(),
    );
    info!(source = %source.display(), tracks = supply.playlist.len(), initial, "starting");

    let backend = RodioBackend::open_default().context("cannot open the default audio output")?;
    let mut player = TrackPlayer::new(
        backend,
        supply.playlist,
        PlayerOptions::from(&settings.player),
    );
    let mut app = App::new();
    app.settle(player.load(initial));

    enable_raw_mode()?;
    let mut terminal = restore_on_error(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        restore_terminal,
    )?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut player);

    player.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

/// Run `setup`, calling `restore` before handing back its error.
fn restore_on_error<T>(setup: impl FnOnce() -> io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    setup().inspect_err(|_| restore())
}

/// Best-effort undo of raw mode and the alternate screen.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}
