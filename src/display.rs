/// Rendering layer.  All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// the render list into terminal commands, scaling logical pixels down to
/// terminal cells and tinting each sprite by its alpha.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use helix_up::assets::{Art, SpriteId, Sprites};
use helix_up::entities::{BulletColor, GamePhase, GameState, Rect};
use helix_up::scene::{render_list, DrawItem};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD: (u8, u8, u8) = (240, 220, 90);
const C_HINT: Color = Color::DarkGrey;
const C_GAME_OVER: Color = Color::Red;

fn base_rgb(sprite: SpriteId) -> (u8, u8, u8) {
    match sprite {
        SpriteId::Background => (255, 255, 255),
        SpriteId::Splash => (120, 200, 255),
        SpriteId::Title => (255, 220, 120),
        SpriteId::PlayerLeft | SpriteId::PlayerRight => (255, 255, 255),
        SpriteId::Enemy(variant) if variant >= 5 => (110, 230, 110),
        SpriteId::Enemy(_) => (240, 100, 100),
        SpriteId::Bullet(color) => match color {
            BulletColor::Red => (255, 60, 60),
            BulletColor::Orange => (255, 160, 40),
            BulletColor::Yellow => (255, 240, 60),
            BulletColor::Green => (80, 240, 80),
            BulletColor::Teal => (60, 220, 200),
            BulletColor::Blue => (80, 140, 255),
        },
        SpriteId::Meter => (250, 210, 60),
        SpriteId::DangerZone => (230, 40, 40),
    }
}

fn tint((r, g, b): (u8, u8, u8), alpha: u8) -> Color {
    let scale = |c: u8| ((c as u16 * alpha as u16) / 255) as u8;
    Color::Rgb {
        r: scale(r),
        g: scale(g),
        b: scale(b),
    }
}

// ── Cell mapping ──────────────────────────────────────────────────────────────

/// The play field occupies every terminal row except the HUD (row 0) and the
/// hint line (last row).
struct Viewport {
    cols: u16,
    rows: u16,
    field_w: f32,
    field_h: f32,
}

impl Viewport {
    fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(2).max(1)
    }

    /// Cell rectangle `(col, row, w, h)` covering `rect`, at least one cell.
    fn cells(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let sx = self.cols as f32 / self.field_w;
        let sy = self.field_rows() as f32 / self.field_h;
        let col = (rect.x * sx).floor() as i32;
        let row = 1 + (rect.y * sy).floor() as i32;
        let w = ((rect.w * sx).round() as i32).max(1);
        let h = ((rect.h * sy).round() as i32).max(1);
        (col, row, w, h)
    }

    fn in_field(&self, row: i32) -> bool {
        row >= 1 && row <= self.field_rows() as i32
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.  `now` is the clock reading the frame was
/// simulated at.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    sprites: &Sprites,
    now: f64,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let view = Viewport {
        cols,
        rows,
        field_w: state.screen_width(),
        field_h: state.screen_height(),
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for item in render_list(state) {
        draw_item(out, &view, &sprites.art(item.sprite), &item)?;
    }

    if matches!(state.phase, GamePhase::Playing | GamePhase::GameOver) {
        draw_hud(out, state, &view, now)?;
    }
    draw_controls_hint(out, state, &view)?;

    if state.phase == GamePhase::GameOver {
        draw_game_over(out, state, &view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Sprites ───────────────────────────────────────────────────────────────────

fn draw_item<W: Write>(
    out: &mut W,
    view: &Viewport,
    art: &Art,
    item: &DrawItem,
) -> std::io::Result<()> {
    if art.height() == 0 || art.width() == 0 {
        return Ok(());
    }
    out.queue(style::SetForegroundColor(tint(base_rgb(item.sprite), item.alpha)))?;

    let (col, row, w, h) = view.cells(&item.rect);
    if art.tiled {
        for dy in 0..h {
            let line: Vec<char> = art.lines[dy as usize % art.height()].chars().collect();
            if line.is_empty() {
                continue;
            }
            let text: String = (0..w).map(|dx| line[dx as usize % line.len()]).collect();
            print_clipped(out, view, col, row + dy, &text)?;
        }
        return Ok(());
    }

    // Centre the frame on the destination rectangle.
    let art_w = art.width() as i32;
    let art_h = art.height() as i32;
    let left = col + (w - art_w) / 2;
    let top = row + (h - art_h) / 2;
    for (i, line) in art.lines.iter().enumerate() {
        print_clipped(out, view, left, top + i as i32, line)?;
    }
    Ok(())
}

/// Print `text` at `(col, row)`, dropping whatever falls outside the field.
fn print_clipped<W: Write>(
    out: &mut W,
    view: &Viewport,
    col: i32,
    row: i32,
    text: &str,
) -> std::io::Result<()> {
    if !view.in_field(row) {
        return Ok(());
    }
    let skip = (-col).max(0) as usize;
    let start = col.max(0);
    let room = (view.cols as i32 - start).max(0) as usize;
    let visible: String = text.chars().skip(skip).take(room).collect();
    if visible.is_empty() {
        return Ok(());
    }
    out.queue(cursor::MoveTo(start as u16, row as u16))?;
    out.queue(Print(visible))?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
    now: f64,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(tint(C_HUD, u8::MAX)))?;
    let mut hud = format!(
        "Time:{:>6.1}s  Kills:{:>4}  Escaped:{:>2}/{}",
        state.play_time(now),
        state.destroyed,
        state.escaped,
        state.rules.escape_cap
    );
    if state.rules.score_on_clamp {
        hud.push_str(&format!("  Edge:{:>4}", state.boundary_score));
    }
    let room = view.cols.saturating_sub(1) as usize;
    out.queue(Print(hud.chars().take(room).collect::<String>()))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
) -> std::io::Result<()> {
    let hint = match state.phase {
        GamePhase::Intro | GamePhase::Starting => "SPACE : Start   ESC / Q : Quit",
        GamePhase::Playing => "↑ ↓ : Move   SPACE : Shoot   TAB / S : Turn   ESC / Q : Quit",
        GamePhase::GameOver => "ESC / Q : Quit",
    };
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let kills_line = format!("Enemies destroyed: {:>4}", state.destroyed);
    let lines: [(&str, Color); 3] = [
        ("╔════════════════════╗", C_GAME_OVER),
        ("║    GAME  OVER      ║", C_GAME_OVER),
        ("╚════════════════════╝", C_GAME_OVER),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let totals = [
        kills_line,
        format!("Enemies escaped:  {:>2}/{}", state.escaped, state.rules.escape_cap),
    ];
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    for (i, line) in totals.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + (lines.len() + i) as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}
