//! Terminal falling-block game (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `blockfall-term`.
//! Logs go to `--log-file` when given, since stdout belongs to the game screen.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::prelude::*;

use blockfall::engine::{AudioSettings, AudioSink, Engine, JsonFileStore};
use blockfall::core::GameSnapshot;
use blockfall::input::{should_quit, TerminalKeys};
use blockfall::term::{FrameBuffer, GameView, Hud, TerminalRenderer, Viewport};
use blockfall::types::{Cue, SessionState};

/// Target frame interval (~60 Hz).
const FRAME_MS: u64 = 16;

#[derive(Debug, Parser)]
#[command(name = "blockfall", version, about = "Falling-block puzzle game for the terminal")]
struct Cli {
    #[arg(long, help = "Seed for the piece sequence (default: derived from the clock)")]
    seed: Option<u32>,

    #[arg(long, help = "Directory holding settings.json and best_score.json")]
    config_dir: Option<PathBuf>,

    #[arg(long, help = "Write logs to this file")]
    log_file: Option<PathBuf>,

    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,
}

/// Rings the terminal bell for the cues worth hearing.
#[derive(Debug, Default)]
struct TerminalBell {
    audible: bool,
}

impl AudioSink for TerminalBell {
    fn play(&mut self, cue: Cue) -> Result<()> {
        if !self.audible || !matches!(cue, Cue::LineClear | Cue::LevelUp) {
            return Ok(());
        }
        let mut stdout = io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(())
    }

    fn apply_settings(&mut self, settings: &AudioSettings) -> Result<()> {
        self.audible = settings.effective_gain() > 0.0;
        Ok(())
    }
}

enum KeyOutcome {
    Continue,
    Start,
    Quit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    info!("starting blockfall");

    let mut term = TerminalRenderer::new();
    let key_releases = term.enter()?;

    let result = run(&mut term, &cli, key_releases);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, cli: &Cli, key_releases: bool) -> Result<()> {
    let store = JsonFileStore::from_env(cli.config_dir.as_deref());
    let settings = store.load_settings();
    if !store.settings_path().exists() {
        if let Err(err) = store.save_settings(&settings) {
            warn!(error = %err, "could not write default settings");
        }
    }
    debug!(dir = %store.dir().display(), key_releases, "config loaded");

    let seed = cli.seed.unwrap_or_else(clock_seed);
    let mut engine = Engine::with_collaborators(
        settings,
        seed,
        Box::new(TerminalBell::default()),
        Box::new(store),
    );

    let mut keys = if key_releases {
        TerminalKeys::with_release_timeout(None)
    } else {
        TerminalKeys::new()
    };

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snapshot = GameSnapshot::default();

    let clock = Instant::now();
    let frame = Duration::from_millis(FRAME_MS);
    let mut next_frame = Instant::now();

    loop {
        let timeout = next_frame.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            loop {
                let now_ms = clock.elapsed().as_millis() as u64;
                match event::read()? {
                    Event::Key(key) => match handle_key(&engine, &mut keys, key, now_ms) {
                        KeyOutcome::Quit => return Ok(()),
                        KeyOutcome::Start => {
                            let seed = cli.seed.unwrap_or_else(clock_seed);
                            keys.clear();
                            engine.start(seed);
                        }
                        KeyOutcome::Continue => {}
                    },
                    Event::Resize(_, _) => term.invalidate(),
                    _ => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if Instant::now() < next_frame {
            continue;
        }
        next_frame = Instant::now() + frame;

        let now_ms = clock.elapsed().as_millis() as u64;
        engine.tick(now_ms, keys.held(now_ms));

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        engine.snapshot_into(&mut snapshot);
        let hud = Hud {
            best_score: engine.best_score(),
        };
        view.render_into(&snapshot, &hud, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}

fn handle_key(engine: &Engine, keys: &mut TerminalKeys, key: KeyEvent, now_ms: u64) -> KeyOutcome {
    if key.kind == KeyEventKind::Press {
        if should_quit(key) {
            return KeyOutcome::Quit;
        }
        match (engine.session(), key.code) {
            (SessionState::Title | SessionState::GameOver, KeyCode::Enter) => {
                return KeyOutcome::Start;
            }
            (SessionState::Playing | SessionState::GameOver, KeyCode::Char('r' | 'R')) => {
                return KeyOutcome::Start;
            }
            _ => {}
        }
    }
    keys.handle_event(key, now_ms);
    KeyOutcome::Continue
}
