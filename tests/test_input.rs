use crossterm::event::{KeyCode, KeyModifiers};
use helix_up::compute::tick;
use helix_up::config::Rules;
use helix_up::entities::*;
use helix_up::input::*;
use helix_up::phase::enter_intro;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn playing_state() -> GameState {
    let mut s = enter_intro(
        Rules {
            initial_spawn_chance: 0.0,
            ..Rules::default()
        },
        0.0,
    );
    s.phase = GamePhase::Playing;
    s.playing_started_at = Some(0.0);
    s
}

/// A playing state whose last tick let an enemy through.
fn state_after_escape() -> GameState {
    let mut s = playing_state();
    s.enemies.push(Enemy {
        x: 1440.0 - 5.0,
        y: 100.0,
        side: Side::Left,
        variant: 5,
    });
    let s = tick(&s, 1.0, &mut seeded_rng());
    assert_eq!(s.escaped, 1);
    assert!(!s.events.is_empty());
    s
}

fn press(code: KeyCode, phase: GamePhase) -> Option<Command> {
    command_for(code, KeyModifiers::NONE, phase, false)
}

// ── command_for ──────────────────────────────────────────────────────────────

#[test]
fn quit_keys() {
    assert_eq!(press(KeyCode::Esc, GamePhase::Playing), Some(Command::Quit));
    assert_eq!(press(KeyCode::Char('q'), GamePhase::Intro), Some(Command::Quit));
    assert_eq!(
        command_for(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            GamePhase::GameOver,
            false
        ),
        Some(Command::Quit)
    );
    assert_eq!(press(KeyCode::Char('c'), GamePhase::Playing), None);
}

#[test]
fn space_confirms_in_intro_and_fires_afterwards() {
    assert_eq!(press(KeyCode::Char(' '), GamePhase::Intro), Some(Command::Confirm));
    assert_eq!(press(KeyCode::Char(' '), GamePhase::Playing), Some(Command::Fire));
}

#[test]
fn swap_keys() {
    assert_eq!(press(KeyCode::Tab, GamePhase::Playing), Some(Command::SwapSide));
    assert_eq!(press(KeyCode::Char('s'), GamePhase::Playing), Some(Command::SwapSide));
}

#[test]
fn movement_keys_are_not_commands() {
    assert_eq!(press(KeyCode::Up, GamePhase::Playing), None);
    assert_eq!(press(KeyCode::Down, GamePhase::Playing), None);
}

#[test]
fn force_spawn_needs_debug_keys() {
    assert_eq!(press(KeyCode::Char('e'), GamePhase::Playing), None);
    assert_eq!(
        command_for(KeyCode::Char('e'), KeyModifiers::NONE, GamePhase::Playing, true),
        Some(Command::ForceSpawn)
    );
}

// ── apply ────────────────────────────────────────────────────────────────────

#[test]
fn commands_never_carry_previous_tick_events() {
    let s = state_after_escape();
    for command in [
        Command::Quit,
        Command::Confirm,
        Command::SwapSide,
        Command::ForceSpawn,
        Command::Fire,
    ] {
        let next = apply(&s, command, 2.0, &mut seeded_rng());
        assert!(
            next.events
                .iter()
                .all(|e| !matches!(e.kind, EventKind::EnemyEscaped { .. })),
            "{:?} repeated an escape",
            command
        );
    }
}

#[test]
fn fire_reports_exactly_one_bullet() {
    let s = state_after_escape();
    let next = apply(&s, Command::Fire, 2.0, &mut seeded_rng());
    assert_eq!(
        next.events,
        vec![GameEvent {
            at: 2.0,
            kind: EventKind::BulletFired {
                direction: Side::Left
            }
        }]
    );
}

#[test]
fn ignored_commands_report_nothing() {
    let s = state_after_escape();
    // Confirm outside the intro is ignored.
    let next = apply(&s, Command::Confirm, 2.0, &mut seeded_rng());
    assert_eq!(next.phase, GamePhase::Playing);
    assert!(next.events.is_empty());
}
