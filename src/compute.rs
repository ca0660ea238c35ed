/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (plus the clock reading and, where needed, an RNG handle) and
/// returns a brand-new `GameState`.  Side effects are limited to the injected
/// RNG.  Events produced along the way are left in the returned state's
/// `events` for the caller to log.

use rand::Rng;

use crate::config::Rules;
use crate::entities::{
    Bullet, BulletColor, Collidable, Enemy, EventKind, GameEvent, GamePhase, GameState, Meter,
    Rect, Side, ENEMY_SPAWN_INSET, PLAYER_HEIGHT,
};
use crate::phase;

// ── Difficulty curve ─────────────────────────────────────────────────────────

/// Percent chance per tick that an enemy spawns, `t` seconds into play.
pub fn spawn_chance(rules: &Rules, t: f64) -> f32 {
    rules.initial_spawn_chance + (t.max(0.0) as f32) / rules.spawn_chance_divisor
}

/// Enemy speed in pixels per tick, `t` seconds into play.
pub fn enemy_speed(rules: &Rules, t: f64) -> f32 {
    rules.initial_enemy_speed + (t.max(0.0) as f32) / rules.enemy_speed_divisor
}

/// A roll in `0..100` spawns an enemy when it is below the current chance.
pub fn should_spawn(roll: u32, chance: f32) -> bool {
    (roll as f32) < chance
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Strict AABB overlap; boxes that only touch do not intersect.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && b.left() < a.right() && a.top() < b.bottom() && b.top() < a.bottom()
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Roll a fresh enemy: random side, random row inside the spawn inset and a
/// random sprite from that side's set.
pub fn random_enemy(rules: &Rules, rng: &mut impl Rng) -> Enemy {
    let side = if rng.gen_bool(0.5) {
        Side::Left
    } else {
        Side::Right
    };
    let variant = match side {
        Side::Left => rng.gen_range(5..=8),
        Side::Right => rng.gen_range(1..=4),
    };
    let low = ENEMY_SPAWN_INSET.min(rules.screen_height / 2.0);
    let high = (rules.screen_height - ENEMY_SPAWN_INSET).max(low);
    let center_y = rng.gen_range(low..=high);
    Enemy::spawn(side, center_y, variant, rules.screen_width)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn set_moving(state: &GameState, up: bool, down: bool) -> GameState {
    let mut next = state.clone();
    next.player.moving.up = up;
    next.player.moving.down = down;
    next.events.clear();
    next
}

/// Mirror the player to the other side of the centre line.
pub fn swap_side(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if state.phase == GamePhase::Playing {
        next.player = state.player.swapped(state.screen_width());
    }
    next
}

/// Fire a bullet in the facing direction, capped at `rules.max_bullets`.
pub fn fire(state: &GameState, now: f64, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if state.phase != GamePhase::Playing || state.bullets.len() >= state.rules.max_bullets {
        return next;
    }
    let palette = BulletColor::palette(state.player.facing);
    let color = palette[rng.gen_range(0..palette.len())];
    let bullet = Bullet::fired_by(&state.player, state.rules.bullet_speed, color);
    next.events.push(GameEvent {
        at: now,
        kind: EventKind::BulletFired {
            direction: bullet.direction,
        },
    });
    next.bullets.push(bullet);
    next
}

/// Debug key: spawn an enemy regardless of the difficulty roll.
pub fn force_spawn(state: &GameState, now: f64, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if state.phase != GamePhase::Playing {
        return next;
    }
    let enemy = random_enemy(&state.rules, rng);
    next.events.push(GameEvent {
        at: now,
        kind: EventKind::EnemySpawned { side: enemy.side },
    });
    next.enemies.push(enemy);
    next
}

// ── Per-frame tick (nearly pure, RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  Does nothing unless the phase is
/// `Playing`.  All randomness comes through `rng` so callers control
/// determinism (useful for tests with a seeded RNG).
pub fn tick(state: &GameState, now: f64, rng: &mut impl Rng) -> GameState {
    if state.phase != GamePhase::Playing {
        let mut next = state.clone();
        next.events.clear();
        return next;
    }
    let roll = rng.gen_range(0..100);
    tick_with_roll(state, now, roll, rng)
}

/// `tick` with the spawn roll (`0..100`) supplied by the caller.  `rng` is
/// still used for the spawned enemy's side, row and sprite.
pub fn tick_with_roll(state: &GameState, now: f64, roll: u32, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if state.phase != GamePhase::Playing {
        return next;
    }

    let rules = state.rules;
    let width = rules.screen_width;
    let t = state.playing_elapsed(now);
    next.frame = state.frame + 1;

    // ── 1. Overlays ──────────────────────────────────────────────────────────
    next.background.cycle();
    next.meter.overlay.cycle();

    // ── 2. Player ────────────────────────────────────────────────────────────
    let dir = state.player.moving.vertical();
    if dir != 0.0 {
        let max_y = (rules.screen_height - PLAYER_HEIGHT).max(0.0);
        let wanted = state.player.y + dir * rules.player_speed;
        let clamped = wanted.clamp(0.0, max_y);
        next.player.y = clamped;
        if clamped != wanted && rules.score_on_clamp {
            next.boundary_score += 1;
        }
    }

    // ── 3. Bullets ───────────────────────────────────────────────────────────
    let bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .map(|b| Bullet {
            x: b.x + b.vx,
            ..b.clone()
        })
        .filter(|b| !b.is_off_field(width))
        .collect();

    // ── 4. Spawn ─────────────────────────────────────────────────────────────
    let chance = spawn_chance(&rules, t);
    let speed = enemy_speed(&rules, t);
    let mut enemies = state.enemies.clone();
    if should_spawn(roll, chance) {
        let enemy = random_enemy(&rules, rng);
        next.events.push(GameEvent {
            at: now,
            kind: EventKind::EnemySpawned { side: enemy.side },
        });
        enemies.push(enemy);
    }

    // ── 5. Enemies move at the current speed ─────────────────────────────────
    let enemies: Vec<Enemy> = enemies
        .into_iter()
        .map(|e| Enemy {
            x: e.x + e.side.travel_sign() * speed,
            ..e
        })
        .collect();

    // ── 6. Escapes ───────────────────────────────────────────────────────────
    let (crossed, enemies): (Vec<Enemy>, Vec<Enemy>) =
        enemies.into_iter().partition(|e| e.has_crossed(width));
    for _ in &crossed {
        next.escaped = (next.escaped + 1).min(rules.escape_cap);
        next.events.push(GameEvent {
            at: now,
            kind: EventKind::EnemyEscaped {
                escaped: next.escaped,
                elapsed: t,
            },
        });
    }

    // ── 7. Collision: bullets ↔ enemies ──────────────────────────────────────
    let (hit, enemies): (Vec<Enemy>, Vec<Enemy>) = enemies
        .into_iter()
        .partition(|e| bullets.iter().any(|b| intersects(&b.bounds(), &e.bounds())));
    for _ in &hit {
        next.destroyed += 1;
        next.events.push(GameEvent {
            at: now,
            kind: EventKind::EnemyDestroyed {
                destroyed: next.destroyed,
            },
        });
    }

    let bullets: Vec<Bullet> = if rules.consume_bullet_on_hit && !hit.is_empty() {
        bullets
            .into_iter()
            .filter(|b| !hit.iter().any(|e| intersects(&b.bounds(), &e.bounds())))
            .collect()
    } else {
        bullets
    };

    next.bullets = bullets;
    next.enemies = enemies;

    // ── 8. Meter & game over ─────────────────────────────────────────────────
    next.meter.bar.x = Meter::bar_x(next.escaped, rules.escape_cap, width);
    if next.escaped >= rules.escape_cap {
        next = phase::transition(&next, GamePhase::GameOver, now);
    }

    next
}
