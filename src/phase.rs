/// Phase state machine: Intro → Starting → Playing → GameOver.
///
/// The intro and starting phases are a scripted sequence of fades keyed to
/// the time spent in the phase.  `compute::tick` owns everything that happens
/// while `Playing`; this module owns the edges between phases.

use log::info;

use crate::config::Rules;
use crate::entities::{
    EventKind, FadeOverlay, GameEvent, GamePhase, GameState, Meter, Player, LOWER_ALPHA,
    MAX_ALPHA,
};

/// Alpha change per tick for the splash and title fades.
pub const INTRO_FADE_STEP: f32 = 4.0;
/// The title card stops just short of fully opaque.
pub const TITLE_TARGET_ALPHA: f32 = 250.0;
pub const INTRO_BACKGROUND_BASELINE: f32 = 5.0;
pub const INTRO_BACKGROUND_TARGET: f32 = 10.0;
pub const INTRO_BACKGROUND_STEP: f32 = 0.5;

/// Intro script boundaries, in seconds since entering `Intro`.
pub const SPLASH_FADE_IN_END: f64 = 2.0;
pub const SPLASH_FADE_OUT_END: f64 = 4.0;
pub const TITLE_FADE_IN_END: f64 = 6.0;

/// Seconds spent in `Starting` before play begins.
pub const STARTING_DWELL: f64 = 2.0;

/// Build the initial game state, in `Intro`, entered at clock reading `now`.
pub fn enter_intro(rules: Rules, now: f64) -> GameState {
    info!("Entering {} at {:.2}s", GamePhase::Intro, now);
    GameState {
        phase: GamePhase::Intro,
        phase_entered_at: now,
        playing_started_at: None,
        player: Player::new(rules.screen_width, rules.screen_height),
        enemies: Vec::new(),
        bullets: Vec::new(),
        background: FadeOverlay::background(INTRO_BACKGROUND_BASELINE),
        splash: FadeOverlay::hidden(),
        title: FadeOverlay::hidden(),
        meter: Meter::new(rules.screen_height),
        escaped: 0,
        destroyed: 0,
        boundary_score: 0,
        frame: 0,
        rules,
        events: Vec::new(),
    }
}

/// Move to `to`, stamping the entry time and appending a `PhaseChanged` event
/// to the state's existing events.
///
/// # Panics
///
/// If `to` is not the successor of the current phase.  The phase set is
/// closed and linear, so any other edge is a bug in the caller.
pub fn transition(state: &GameState, to: GamePhase, now: f64) -> GameState {
    let from = state.phase;
    assert!(
        from.can_advance_to(to),
        "illegal phase transition {} -> {}",
        from,
        to
    );
    info!("Changing phase {} -> {} at {:.2}s", from, to, now);

    let mut next = state.clone();
    next.phase = to;
    next.phase_entered_at = now;
    next.events.push(GameEvent {
        at: now,
        kind: EventKind::PhaseChanged { from, to },
    });
    next
}

/// Confirm input.  Skips the rest of the intro; ignored in any other phase.
pub fn confirm(state: &GameState, now: f64) -> GameState {
    if state.phase != GamePhase::Intro {
        let mut next = state.clone();
        next.events.clear();
        return next;
    }
    let mut cleared = state.clone();
    cleared.events.clear();
    transition(&cleared, GamePhase::Starting, now)
}

/// Run the scripted part of the current phase for one tick.
pub fn advance(state: &GameState, now: f64) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    let elapsed = now - state.phase_entered_at;

    match state.phase {
        GamePhase::Intro => {
            if elapsed < SPLASH_FADE_IN_END {
                next.splash.fade_in(MAX_ALPHA, INTRO_FADE_STEP);
            } else if elapsed < SPLASH_FADE_OUT_END {
                next.splash.fade_out(0.0, INTRO_FADE_STEP);
            } else if elapsed < TITLE_FADE_IN_END {
                next.title.fade_in(TITLE_TARGET_ALPHA, INTRO_FADE_STEP);
                next.background
                    .fade_in(INTRO_BACKGROUND_TARGET, INTRO_BACKGROUND_STEP);
            }
            next
        }
        GamePhase::Starting => {
            next.splash.fade_out(0.0, INTRO_FADE_STEP);
            next.title.fade_out(0.0, INTRO_FADE_STEP);
            if elapsed >= STARTING_DWELL {
                next = start_playing(&next, now);
            }
            next
        }
        GamePhase::Playing | GamePhase::GameOver => next,
    }
}

fn start_playing(state: &GameState, now: f64) -> GameState {
    let mut next = transition(state, GamePhase::Playing, now);
    next.playing_started_at = Some(now);
    next.splash.alpha = 0.0;
    next.title.alpha = 0.0;
    next.background = FadeOverlay::background(LOWER_ALPHA);
    next.events.push(GameEvent {
        at: now,
        kind: EventKind::CursorHidden,
    });
    next
}
