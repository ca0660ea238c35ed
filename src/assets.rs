/// Text-art sprites.  Every sprite has a built-in frame; the three full-screen
/// overlays can be replaced by files in a configured asset directory.

use std::collections::HashMap;
use std::path::Path;

use log::info;

use crate::entities::BulletColor;
use crate::error::{GameError, Result};

/// Closed set of things the renderer knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Background,
    Splash,
    Title,
    PlayerLeft,
    PlayerRight,
    /// Enemy sprite number, 1..=8.
    Enemy(u8),
    Bullet(BulletColor),
    Meter,
    DangerZone,
}

/// One sprite frame, row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Art {
    pub lines: Vec<String>,
    /// Repeat the frame to cover the whole destination instead of centring it.
    pub tiled: bool,
}

impl Art {
    fn centred(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            tiled: false,
        }
    }

    fn tiled(lines: &[&str]) -> Self {
        Self {
            tiled: true,
            ..Self::centred(lines)
        }
    }

    fn from_text(text: &str, tiled: bool) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            tiled,
        }
    }

    pub fn width(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

// ── Built-in frames ──────────────────────────────────────────────────────────

const SPLASH: &[&str] = &[
    "##  ##  ######  ##      ######  ##  ##",
    "##  ##  ##      ##        ##     ####",
    "######  ####    ##        ##      ##",
    "##  ##  ##      ##        ##     ####",
    "##  ##  ######  ######  ######  ##  ##",
    "",
    "           g  a  m  e  s",
];

const TITLE: &[&str] = &[
    "##    ##  ######",
    "##    ##  ##   ##",
    "##    ##  ######",
    "##    ##  ##",
    " ######   ##",
    "",
    "  press SPACE",
];

const BACKGROUND: &[&str] = &[
    ".       *         .           ",
    "            .          +      ",
    "   +              .         . ",
    "        .     *               ",
];

const PLAYER_LEFT: &[&str] = &["<=[#]", "  /|\\"];
const PLAYER_RIGHT: &[&str] = &["[#]=>", "/|\\  "];
const METER: &[&str] = &["[=]"];
const DANGER: &[&str] = &["!!!!"];

fn enemy_frame(variant: u8) -> &'static [&'static str] {
    match variant {
        1 => &["<o)"],
        2 => &["<@="],
        3 => &["{<}"],
        4 => &["<X|"],
        5 => &["(o>"],
        6 => &["=@>"],
        7 => &["{>}"],
        _ => &["|X>"],
    }
}

/// File names that override the full-screen overlays.
pub const OVERLAY_FILES: [(SpriteId, &str); 3] = [
    (SpriteId::Splash, "screen_helix.txt"),
    (SpriteId::Title, "screen_up.txt"),
    (SpriteId::Background, "screen_background.txt"),
];

#[derive(Default)]
pub struct Sprites {
    overrides: HashMap<SpriteId, Art>,
}

impl Sprites {
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Built-in art, with the overlays replaced from `dir` when it is given.
    /// Every overlay file must be present.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut sprites = Self::builtin();
        let Some(dir) = dir else {
            return Ok(sprites);
        };
        for (id, name) in OVERLAY_FILES {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(GameError::MissingAsset(path));
            }
            let text = std::fs::read_to_string(&path)?;
            info!("asset load:{:?}", path);
            sprites
                .overrides
                .insert(id, Art::from_text(&text, id == SpriteId::Background));
        }
        Ok(sprites)
    }

    pub fn art(&self, id: SpriteId) -> Art {
        if let Some(art) = self.overrides.get(&id) {
            return art.clone();
        }
        match id {
            SpriteId::Background => Art::tiled(BACKGROUND),
            SpriteId::Splash => Art::centred(SPLASH),
            SpriteId::Title => Art::centred(TITLE),
            SpriteId::PlayerLeft => Art::centred(PLAYER_LEFT),
            SpriteId::PlayerRight => Art::centred(PLAYER_RIGHT),
            SpriteId::Enemy(variant) => Art::centred(enemy_frame(variant)),
            SpriteId::Bullet(_) => Art::centred(&["-"]),
            SpriteId::Meter => Art::centred(METER),
            SpriteId::DangerZone => Art::centred(DANGER),
        }
    }
}
