/// Tunable rules and runtime settings, loaded from an optional TOML file.
///
/// Every key is optional; anything left out falls back to the defaults below.
///
/// ```toml
/// log_level = "debug"
///
/// [rules]
/// max_bullets = 3
/// score_on_clamp = true
/// ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, Result};

/// Numbers that drive the simulation.  Copied into every `GameState`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    pub screen_width: f32,
    pub screen_height: f32,
    pub fps: u32,
    pub player_speed: f32,
    pub bullet_speed: f32,
    pub max_bullets: usize,
    pub escape_cap: u32,
    pub initial_spawn_chance: f32,
    /// Seconds of play per extra percentage point of spawn chance.
    pub spawn_chance_divisor: f32,
    pub initial_enemy_speed: f32,
    /// Seconds of play per extra pixel/tick of enemy speed.
    pub enemy_speed_divisor: f32,
    /// Award a point whenever the player is clamped at the top or bottom edge.
    pub score_on_clamp: bool,
    /// Remove a bullet when it destroys an enemy.  Off keeps bullets piercing.
    pub consume_bullet_on_hit: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            screen_width: 1440.0,
            screen_height: 900.0,
            fps: 30,
            player_speed: 30.0,
            bullet_speed: 60.0,
            max_bullets: 2,
            escape_cap: 20,
            initial_spawn_chance: 5.0,
            spawn_chance_divisor: 3.0,
            initial_enemy_speed: 10.0,
            enemy_speed_divisor: 1.0,
            score_on_clamp: false,
            consume_bullet_on_hit: false,
        }
    }
}

impl Rules {
    pub fn validate(&self) -> Result<()> {
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "screen size must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.fps == 0 {
            return Err(GameError::InvalidConfig("fps must be > 0".into()));
        }
        if !(self.spawn_chance_divisor > 0.0) || !(self.enemy_speed_divisor > 0.0) {
            return Err(GameError::InvalidConfig(
                "difficulty divisors must be > 0".into(),
            ));
        }
        if self.max_bullets == 0 {
            return Err(GameError::InvalidConfig("max_bullets must be > 0".into()));
        }
        if self.escape_cap == 0 {
            return Err(GameError::InvalidConfig("escape_cap must be > 0".into()));
        }
        if self.player_speed < 0.0 || self.bullet_speed < 0.0 || self.initial_enemy_speed < 0.0 {
            return Err(GameError::InvalidConfig("speeds must not be negative".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub rules: Rules,
    pub log_file: PathBuf,
    pub log_level: String,
    /// Directory holding replacement overlay art.  Built-in art when unset.
    pub assets_dir: Option<PathBuf>,
    /// Enables the force-spawn key.
    pub debug_keys: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            log_file: PathBuf::from("log/helix_up.log"),
            log_level: "info".to_string(),
            assets_dir: None,
            debug_keys: false,
        }
    }
}

impl GameConfig {
    /// Defaults when `path` is `None`; otherwise parse and validate the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text).map_err(|source| GameError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.rules.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| GameError::InvalidConfig(format!("unknown log level '{}'", self.log_level)))
    }
}
