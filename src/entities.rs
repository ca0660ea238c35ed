/// All game entity types: mostly data, with the small amount of behaviour
/// that belongs to a single entity (bounds, fades, mirroring).

use std::fmt;

use crate::config::Rules;

// ── Fixed entity dimensions (logical pixels) ─────────────────────────────────

pub const PLAYER_WIDTH: f32 = 60.0;
pub const PLAYER_HEIGHT: f32 = 90.0;
/// Horizontal distance of the player's centre from the middle of the field.
pub const PLAYER_SIDE_OFFSET: f32 = 60.0;

pub const ENEMY_WIDTH: f32 = 40.0;
pub const ENEMY_HEIGHT: f32 = 60.0;
/// Enemies spawn with their centre this far outside the spawn edge.
pub const ENEMY_SPAWN_MARGIN: f32 = 100.0;
/// Vertical inset kept clear when picking an enemy's spawn row.
pub const ENEMY_SPAWN_INSET: f32 = 50.0;

pub const BULLET_WIDTH: f32 = 20.0;
pub const BULLET_HEIGHT: f32 = 5.0;
/// Distance in front of the player's centre at which a bullet appears.
pub const BULLET_MUZZLE_OFFSET: f32 = 40.0;

// ── Overlay constants ────────────────────────────────────────────────────────

pub const MAX_ALPHA: f32 = 255.0;
pub const LOWER_ALPHA: f32 = 30.0;
pub const HIGHER_ALPHA: f32 = 60.0;
pub const ALPHA_STEP: f32 = 0.5;

/// The meter pulses between these bounds.
pub const METER_LOWER_ALPHA: f32 = 150.0;
pub const METER_PULSE_STEP: f32 = 5.0;

pub const METER_START_X: f32 = 40.0;
pub const METER_WIDTH: f32 = 30.0;
pub const METER_HEIGHT: f32 = 30.0;
pub const DANGER_WIDTH: f32 = 60.0;
pub const DANGER_HEIGHT: f32 = 50.0;
/// Gap between the bottom of the field and the meter track.
const METER_BOTTOM_GAP: f32 = 60.0;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle; `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Which side of the field something belongs to.
///
/// For the player and bullets this is the facing / travel direction.  For
/// enemies it is the spawn edge, so a `Left` enemy travels rightward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of the horizontal velocity of an enemy spawned on this side.
    pub fn travel_sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

// ── Capabilities ─────────────────────────────────────────────────────────────

pub trait Positioned {
    /// Top-left corner.
    fn position(&self) -> (f32, f32);
}

pub trait Collidable: Positioned {
    fn size(&self) -> (f32, f32);

    fn bounds(&self) -> Rect {
        let (x, y) = self.position();
        let (w, h) = self.size();
        Rect::new(x, y, w, h)
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovingFlags {
    pub up: bool,
    pub down: bool,
}

impl MovingFlags {
    /// -1 for up, +1 for down, 0 when neither or both are held.
    pub fn vertical(&self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub moving: MovingFlags,
    pub facing: Side,
}

impl Player {
    /// Player facing left, vertically centred on the field.
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            x: Self::home_x(Side::Left, screen_width),
            y: (screen_height - PLAYER_HEIGHT) / 2.0,
            moving: MovingFlags::default(),
            facing: Side::Left,
        }
    }

    /// Left edge of the player when facing `side`.
    pub fn home_x(side: Side, screen_width: f32) -> f32 {
        let center = match side {
            Side::Left => screen_width / 2.0 - PLAYER_SIDE_OFFSET,
            Side::Right => screen_width / 2.0 + PLAYER_SIDE_OFFSET,
        };
        center - PLAYER_WIDTH / 2.0
    }

    pub fn swapped(&self, screen_width: f32) -> Self {
        let facing = self.facing.opposite();
        Self {
            x: Self::home_x(facing, screen_width),
            facing,
            ..self.clone()
        }
    }
}

impl Positioned for Player {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl Collidable for Player {
    fn size(&self) -> (f32, f32) {
        (PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    /// Spawn edge; fixed for the enemy's lifetime.
    pub side: Side,
    /// Sprite number, 1..=8.  No gameplay effect.
    pub variant: u8,
}

impl Enemy {
    /// Build an enemy whose centre sits `ENEMY_SPAWN_MARGIN` outside `side`.
    pub fn spawn(side: Side, center_y: f32, variant: u8, screen_width: f32) -> Self {
        let center_x = match side {
            Side::Left => -ENEMY_SPAWN_MARGIN,
            Side::Right => screen_width + ENEMY_SPAWN_MARGIN,
        };
        Self {
            x: center_x - ENEMY_WIDTH / 2.0,
            y: center_y - ENEMY_HEIGHT / 2.0,
            side,
            variant,
        }
    }

    /// True once the whole box has passed the edge opposite the spawn side.
    pub fn has_crossed(&self, screen_width: f32) -> bool {
        let b = self.bounds();
        match self.side {
            Side::Left => b.left() > screen_width,
            Side::Right => b.right() < 0.0,
        }
    }
}

impl Positioned for Enemy {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl Collidable for Enemy {
    fn size(&self) -> (f32, f32) {
        (ENEMY_WIDTH, ENEMY_HEIGHT)
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BulletColor {
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
}

impl BulletColor {
    /// Palette a bullet fired towards `direction` picks from.
    pub fn palette(direction: Side) -> [BulletColor; 3] {
        match direction {
            Side::Left => [BulletColor::Green, BulletColor::Teal, BulletColor::Blue],
            Side::Right => [BulletColor::Red, BulletColor::Orange, BulletColor::Yellow],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    /// Travel direction, copied from the player's facing side when fired.
    pub direction: Side,
    /// Signed horizontal velocity, fixed at creation.
    pub vx: f32,
    pub color: BulletColor,
}

impl Bullet {
    pub fn fired_by(player: &Player, speed: f32, color: BulletColor) -> Self {
        let (cx, cy) = player.bounds().center();
        let (muzzle_x, vx) = match player.facing {
            Side::Left => (cx - BULLET_MUZZLE_OFFSET, -speed),
            Side::Right => (cx + BULLET_MUZZLE_OFFSET, speed),
        };
        Self {
            x: muzzle_x - BULLET_WIDTH / 2.0,
            y: cy - BULLET_HEIGHT / 2.0,
            direction: player.facing,
            vx,
            color,
        }
    }

    /// True when the box lies entirely outside `[0, screen_width]`.
    pub fn is_off_field(&self, screen_width: f32) -> bool {
        let b = self.bounds();
        b.right() < 0.0 || b.left() > screen_width
    }
}

impl Positioned for Bullet {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl Collidable for Bullet {
    fn size(&self) -> (f32, f32) {
        (BULLET_WIDTH, BULLET_HEIGHT)
    }
}

// ── Overlays ─────────────────────────────────────────────────────────────────

/// A full-screen layer whose transparency can cycle or fade.
#[derive(Clone, Debug, PartialEq)]
pub struct FadeOverlay {
    pub alpha: f32,
    /// Signed increment applied by `cycle`.
    pub alpha_mod: f32,
    pub lower: f32,
    pub upper: f32,
}

impl FadeOverlay {
    pub fn new(alpha: f32, step: f32, lower: f32, upper: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, MAX_ALPHA),
            alpha_mod: step.abs(),
            lower,
            upper,
        }
    }

    /// Overlay that starts at `alpha` and cycles between the background bounds.
    pub fn background(alpha: f32) -> Self {
        Self::new(alpha, ALPHA_STEP, LOWER_ALPHA, HIGHER_ALPHA)
    }

    /// Overlay used only for scripted fades.
    pub fn hidden() -> Self {
        Self::new(0.0, 0.0, 0.0, MAX_ALPHA)
    }

    /// Triangle wave between `lower` and `upper`.
    pub fn cycle(&mut self) {
        let step = self.alpha_mod.abs();
        if self.alpha >= self.upper {
            self.alpha_mod = -step;
        } else if self.alpha <= self.lower {
            self.alpha_mod = step;
        }
        self.alpha = (self.alpha + self.alpha_mod).clamp(0.0, MAX_ALPHA);
    }

    pub fn fade_in(&mut self, target: f32, step: f32) {
        if self.alpha < target {
            self.alpha = (self.alpha + step).min(target).min(MAX_ALPHA);
        }
    }

    pub fn fade_out(&mut self, target: f32, step: f32) {
        if self.alpha > target {
            self.alpha = (self.alpha - step).max(target).max(0.0);
        }
    }

    /// Alpha quantised for the renderer.
    pub fn alpha_u8(&self) -> u8 {
        self.alpha.round().clamp(0.0, MAX_ALPHA) as u8
    }
}

/// Escape meter: a small bar that slides toward the danger zone as enemies escape.
#[derive(Clone, Debug, PartialEq)]
pub struct Meter {
    pub overlay: FadeOverlay,
    pub bar: Rect,
}

impl Meter {
    pub fn new(screen_height: f32) -> Self {
        Self {
            overlay: FadeOverlay::new(
                METER_LOWER_ALPHA,
                METER_PULSE_STEP,
                METER_LOWER_ALPHA,
                MAX_ALPHA,
            ),
            bar: Rect::new(
                METER_START_X,
                Self::track_y(screen_height),
                METER_WIDTH,
                METER_HEIGHT,
            ),
        }
    }

    fn track_y(screen_height: f32) -> f32 {
        screen_height - METER_BOTTOM_GAP
    }

    /// Threshold rectangle at the right end of the meter track.
    pub fn danger_zone(screen_width: f32, screen_height: f32) -> Rect {
        let y = Self::track_y(screen_height) - (DANGER_HEIGHT - METER_HEIGHT) / 2.0;
        Rect::new(
            screen_width - METER_START_X - DANGER_WIDTH,
            y,
            DANGER_WIDTH,
            DANGER_HEIGHT,
        )
    }

    /// Left edge of the bar for a given escape count; linear, reaching the
    /// danger zone exactly at `cap`.
    pub fn bar_x(escaped: u32, cap: u32, screen_width: f32) -> f32 {
        let danger_x = screen_width - METER_START_X - DANGER_WIDTH;
        let frac = if cap == 0 {
            1.0
        } else {
            escaped.min(cap) as f32 / cap as f32
        };
        METER_START_X + (danger_x - METER_START_X) * frac
    }
}

// ── Phase & events ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Intro,
    Starting,
    Playing,
    GameOver,
}

impl GamePhase {
    /// The phase set is linear; each phase has exactly one successor.
    pub fn can_advance_to(self, next: GamePhase) -> bool {
        matches!(
            (self, next),
            (GamePhase::Intro, GamePhase::Starting)
                | (GamePhase::Starting, GamePhase::Playing)
                | (GamePhase::Playing, GamePhase::GameOver)
        )
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Intro => "intro",
            GamePhase::Starting => "starting",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "game-over",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// The input layer should hide the pointer / cursor from now on.
    CursorHidden,
    EnemySpawned { side: Side },
    BulletFired { direction: Side },
    EnemyDestroyed { destroyed: u32 },
    /// `elapsed` is seconds of play when the enemy got through.
    EnemyEscaped { escaped: u32, elapsed: f64 },
}

/// Something the core wants the logging collaborator to record.
#[derive(Clone, Debug, PartialEq)]
pub struct GameEvent {
    /// Seconds since the clock origin the caller passes in.
    pub at: f64,
    pub kind: EventKind,
}

impl GameEvent {
    pub fn is_noteworthy(&self) -> bool {
        !matches!(
            self.kind,
            EventKind::EnemySpawned { .. } | EventKind::BulletFired { .. }
        )
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}s] ", self.at)?;
        match &self.kind {
            EventKind::PhaseChanged { from, to } => write!(f, "phase {} -> {}", from, to),
            EventKind::CursorHidden => write!(f, "cursor hidden"),
            EventKind::EnemySpawned { side } => write!(f, "enemy spawned on the {}", side),
            EventKind::BulletFired { direction } => write!(f, "bullet fired {}", direction),
            EventKind::EnemyDestroyed { destroyed } => {
                write!(f, "enemy destroyed (total {})", destroyed)
            }
            EventKind::EnemyEscaped { escaped, elapsed } => {
                write!(f, "enemy escaped after {:.1}s of play ({} so far)", elapsed, escaped)
            }
        }
    }
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub phase: GamePhase,
    /// Clock reading when the current phase was entered.
    pub phase_entered_at: f64,
    /// Origin of the difficulty curve; set on entering `Playing`.
    pub playing_started_at: Option<f64>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub background: FadeOverlay,
    /// Studio splash shown first in the intro.
    pub splash: FadeOverlay,
    /// Title card shown after the splash.
    pub title: FadeOverlay,
    pub meter: Meter,
    /// Enemies that crossed the field; saturates at `rules.escape_cap`.
    pub escaped: u32,
    pub destroyed: u32,
    /// Points for touching the top or bottom edge, when `rules.score_on_clamp` is on.
    pub boundary_score: u32,
    pub frame: u64,
    pub rules: Rules,
    /// Events produced by the most recent transition.
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn screen_width(&self) -> f32 {
        self.rules.screen_width
    }

    pub fn screen_height(&self) -> f32 {
        self.rules.screen_height
    }

    /// Seconds of gameplay so far; zero before `Playing` was entered.
    pub fn playing_elapsed(&self, now: f64) -> f64 {
        self.playing_started_at
            .map(|start| (now - start).max(0.0))
            .unwrap_or(0.0)
    }

    /// Play time for the HUD: stops advancing once the game is over.
    pub fn play_time(&self, now: f64) -> f64 {
        match self.phase {
            GamePhase::GameOver => self.playing_elapsed(self.phase_entered_at),
            _ => self.playing_elapsed(now),
        }
    }
}
