mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use helix_up::assets::Sprites;
use helix_up::compute::{set_moving, tick};
use helix_up::config::GameConfig;
use helix_up::entities::{EventKind, GameState};
use helix_up::error::Result;
use helix_up::input::{apply, command_for, Command};
use helix_up::logging::init_log;
use helix_up::phase::{advance, enter_intro};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

#[derive(Parser, Debug)]
#[command(name = "helix_up", about = "Side-on arcade shooter for the terminal")]
struct Cli {
    /// TOML file with rule and logging overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the spawn RNG; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Enable the force-spawn key (E).
    #[arg(long)]
    debug_keys: bool,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn log_events<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    for event in &state.events {
        if event.is_noteworthy() {
            info!("{}", event);
        } else {
            debug!("{}", event);
        }
        if event.kind == EventKind::CursorHidden {
            out.execute(cursor::Hide)?;
        }
    }
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  One iteration is one tick: drain input,
/// apply it, advance the phase script and the simulation, then draw.
///
/// Up/Down are tracked with a `key_frame` map that records the frame of the
/// last press/repeat event for every key, so holding a direction keeps the
/// player moving on terminals with and without key-release reporting.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    sprites: &Sprites,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> Result<GameState> {
    let clock = Instant::now();
    let frame_budget = Duration::from_secs_f64(1.0 / config.rules.fps as f64);
    let mut state = enter_intro(config.rules, 0.0);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        let now = clock.elapsed().as_secs_f64();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match command_for(code, modifiers, state.phase, config.debug_keys) {
                        Some(Command::Quit) => return Ok(state),
                        Some(command) => {
                            state = apply(&state, command, now, rng);
                            log_events(out, &state)?;
                        }
                        None => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let up = is_held(&key_frame, &KeyCode::Up, frame);
        let down = is_held(&key_frame, &KeyCode::Down, frame);
        state = set_moving(&state, up, down);

        state = advance(&state, now);
        log_events(out, &state)?;
        state = tick(&state, now, rng);
        log_events(out, &state)?;

        display::render(out, &state, sprites, now)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GameConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.debug_keys |= cli.debug_keys;

    init_log(config.level_filter()?, &config.log_file)?;
    info!("helix_up start... config={:?}", cli.config);

    // Assets are required before the first tick; a missing file is fatal.
    let sprites = Sprites::load(config.assets_dir.as_deref())?;

    let mut rng = match cli.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &config, &sprites, &mut rng, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    let state = result?;
    info!(
        "Session over in phase {}: {} destroyed, {} escaped, edge score {}",
        state.phase, state.destroyed, state.escaped, state.boundary_score
    );
    Ok(())
}
