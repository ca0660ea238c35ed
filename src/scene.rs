/// Render list: the ordered set of sprites the display layer should draw for
/// one frame.  Back to front; later items cover earlier ones.

use crate::assets::SpriteId;
use crate::entities::{Collidable, FadeOverlay, GamePhase, GameState, Meter, Rect, Side};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub sprite: SpriteId,
    /// Destination in logical pixels.
    pub rect: Rect,
    pub alpha: u8,
}

fn overlay(sprite: SpriteId, layer: &FadeOverlay, screen: Rect) -> Option<DrawItem> {
    let alpha = layer.alpha_u8();
    (alpha > 0).then_some(DrawItem {
        sprite,
        rect: screen,
        alpha,
    })
}

pub fn render_list(state: &GameState) -> Vec<DrawItem> {
    let screen = Rect::new(0.0, 0.0, state.screen_width(), state.screen_height());
    let mut items: Vec<DrawItem> = Vec::new();

    items.extend(overlay(SpriteId::Background, &state.background, screen));

    match state.phase {
        GamePhase::Intro | GamePhase::Starting => {
            items.extend(overlay(SpriteId::Splash, &state.splash, screen));
            items.extend(overlay(SpriteId::Title, &state.title, screen));
        }
        GamePhase::Playing | GamePhase::GameOver => {
            items.push(DrawItem {
                sprite: SpriteId::DangerZone,
                rect: Meter::danger_zone(state.screen_width(), state.screen_height()),
                alpha: u8::MAX,
            });
            items.push(DrawItem {
                sprite: SpriteId::Meter,
                rect: state.meter.bar,
                alpha: state.meter.overlay.alpha_u8(),
            });

            let player_sprite = match state.player.facing {
                Side::Left => SpriteId::PlayerLeft,
                Side::Right => SpriteId::PlayerRight,
            };
            items.push(DrawItem {
                sprite: player_sprite,
                rect: state.player.bounds(),
                alpha: u8::MAX,
            });
            items.extend(state.bullets.iter().map(|b| DrawItem {
                sprite: SpriteId::Bullet(b.color),
                rect: b.bounds(),
                alpha: u8::MAX,
            }));
            items.extend(state.enemies.iter().map(|e| DrawItem {
                sprite: SpriteId::Enemy(e.variant),
                rect: e.bounds(),
                alpha: u8::MAX,
            }));
        }
    }

    items
}
