/// Key bindings.  Maps a pressed key to a `Command` and applies it to the
/// game state.  Up/Down are not commands; the game loop tracks them as held
/// keys and feeds them to `compute::set_moving` once per frame.

use crossterm::event::{KeyCode, KeyModifiers};
use rand::Rng;

use crate::compute::{fire, force_spawn, swap_side};
use crate::entities::{GamePhase, GameState};
use crate::phase::confirm;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Confirm,
    Fire,
    SwapSide,
    ForceSpawn,
}

/// Command bound to a key press in `phase`, if any.  Space confirms during
/// the intro and fires otherwise; `e` only counts with `debug_keys`.
pub fn command_for(
    code: KeyCode,
    modifiers: KeyModifiers,
    phase: GamePhase,
    debug_keys: bool,
) -> Option<Command> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char(' ') if phase == GamePhase::Intro => Some(Command::Confirm),
        KeyCode::Char(' ') => Some(Command::Fire),
        KeyCode::Tab | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::SwapSide),
        KeyCode::Char('e') | KeyCode::Char('E') if debug_keys => Some(Command::ForceSpawn),
        _ => None,
    }
}

/// New state after `command`.  Its `events` hold only what this command
/// produced.
pub fn apply(state: &GameState, command: Command, now: f64, rng: &mut impl Rng) -> GameState {
    match command {
        Command::Confirm => confirm(state, now),
        Command::Fire => fire(state, now, rng),
        Command::SwapSide => swap_side(state),
        Command::ForceSpawn => force_spawn(state, now, rng),
        Command::Quit => {
            let mut next = state.clone();
            next.events.clear();
            next
        }
    }
}
