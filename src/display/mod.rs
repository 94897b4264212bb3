/// Terminal renderer for the playfield, HUD and commander panel.
///
/// `draw` paints an immutable view of the session onto a `Surface`;
/// `present` turns the surface into terminal commands.  No game logic is
/// performed here.

pub mod surface;

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::commander::CommanderPanel;
use crate::entities::{
    Enemy, EnemyKind, GameState, GameStatus, Player, COLOR_BULLET, COLOR_ENGINE, COLOR_PLAYER,
    FIELD_HEIGHT, FIELD_WIDTH,
};
use crate::session::Session;
use surface::{rgb, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_STAR: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::Green;
const C_HUD_LEVEL: Color = Color::Blue;
const C_HEALTH: Color = Color::Green;
const C_HEALTH_EMPTY: Color = Color::DarkGrey;
const C_PANEL: Color = Color::Blue;
const C_PANEL_TEXT: Color = Color::White;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_FAILED: Color = Color::Red;

const STAR_COUNT: u64 = 50;
const HEALTH_BAR_WIDTH: usize = 20;
const PANEL_WIDTH: u16 = 44;

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    surface: &mut Surface,
    session: &Session,
    elapsed_ms: u64,
) -> std::io::Result<()> {
    draw(surface, session, elapsed_ms);
    present(out, surface)
}

/// Paint the whole frame onto `surface`.  Cosmetic randomness (stars,
/// engine flicker) is seeded from `elapsed_ms`.
pub fn draw(surface: &mut Surface, session: &Session, elapsed_ms: u64) {
    let mut rng = StdRng::seed_from_u64(elapsed_ms);
    let game = &session.game;

    surface.clear();
    draw_starfield(surface, elapsed_ms, &mut rng);

    for bullet in &game.player.bullets {
        let b = &bullet.body;
        let color = rgb(COLOR_BULLET);
        surface.fill_rect(b.x, b.y, b.width, b.height, '┃', color);
        surface.glow(b.x, b.y, b.width, b.height, '·', color);
    }

    draw_player(surface, &game.player, &mut rng);

    for enemy in &game.enemies {
        draw_enemy(surface, enemy);
    }

    draw_hud(surface, game);
    draw_commander(surface, &session.commander);

    match game.status {
        GameStatus::Menu => draw_menu(surface),
        GameStatus::GameOver => draw_game_over(surface, game),
        GameStatus::Playing => {}
    }
}

/// Flush `surface` to the terminal, one colour run at a time.
pub fn present<W: Write>(out: &mut W, surface: &Surface) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for row in 0..surface.rows() {
        out.queue(cursor::MoveTo(0, row))?;
        let mut run = String::new();
        let mut run_color = Color::Reset;
        for cell in surface.row(row) {
            if cell.color != run_color && !run.is_empty() {
                out.queue(style::SetForegroundColor(run_color))?;
                out.queue(Print(&run))?;
                run.clear();
            }
            run_color = cell.color;
            run.push(cell.ch);
        }
        out.queue(style::SetForegroundColor(run_color))?;
        out.queue(Print(&run))?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, surface.rows().saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

fn draw_starfield(surface: &mut Surface, elapsed_ms: u64, rng: &mut StdRng) {
    for i in 0..STAR_COUNT {
        let x = rng.gen::<f32>() * FIELD_WIDTH;
        let y = ((elapsed_ms / 20 + i * 50) as f32) % FIELD_HEIGHT;
        surface.plot(x, y, '.', C_STAR);
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player(surface: &mut Surface, player: &Player, rng: &mut StdRng) {
    // Arrowhead with a notched tail.
    let p = &player.body;
    let hull = [
        (p.x + p.width / 2.0, p.y),
        (p.x + p.width, p.y + p.height),
        (p.x + p.width / 2.0, p.y + p.height * 0.8),
        (p.x, p.y + p.height),
    ];
    surface.fill_polygon(&hull, '█', rgb(COLOR_PLAYER));

    let flicker = 5.0 + rng.gen::<f32>() * 5.0;
    surface.fill_circle(
        p.x + p.width / 2.0,
        p.y + p.height,
        flicker,
        '*',
        rgb(COLOR_ENGINE),
    );
}

fn draw_enemy(surface: &mut Surface, enemy: &Enemy) {
    let e = &enemy.body;
    let color = rgb(enemy.color);
    match enemy.kind {
        EnemyKind::Bomber => surface.fill_rect(e.x, e.y, e.width, e.height, '▓', color),
        EnemyKind::Scout | EnemyKind::Interceptor => {
            let hull = [
                (e.x + e.width / 2.0, e.y + e.height),
                (e.x + e.width, e.y),
                (e.x, e.y),
            ];
            surface.fill_polygon(&hull, '█', color);
        }
    }
    surface.glow(e.x, e.y, e.width, e.height, '░', color);
}

// ── HUD (rows 0-1) ────────────────────────────────────────────────────────────

/// `[████░░░░]` bar for health, clamped at zero.
pub fn health_bar(health: i32, max_health: i32) -> (String, String) {
    let clamped = health.clamp(0, max_health.max(1));
    let filled = (clamped as usize * HEALTH_BAR_WIDTH) / max_health.max(1) as usize;
    ("█".repeat(filled), "░".repeat(HEALTH_BAR_WIDTH - filled))
}

fn draw_hud(surface: &mut Surface, game: &GameState) {
    let player = &game.player;
    surface.text(1, 0, &format!("SCORE: {}", player.score), C_HUD_SCORE);

    let (full, empty) = health_bar(player.health, player.max_health);
    surface.text(1, 1, "[", C_HINT);
    surface.text(2, 1, &full, C_HEALTH);
    let empty_col = 2 + full.chars().count() as u16;
    surface.text(empty_col, 1, &empty, C_HEALTH_EMPTY);
    surface.text(
        empty_col + empty.chars().count() as u16,
        1,
        &format!("] {}%", player.health.max(0)),
        C_HINT,
    );

    let level = format!("LEVEL {}", game.level);
    let col = surface
        .cols()
        .saturating_sub(level.chars().count() as u16 + 1);
    surface.text(col, 0, &level, C_HUD_LEVEL);
}

// ── Commander panel (bottom right) ────────────────────────────────────────────

/// Greedy word wrap to `width` characters.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn draw_commander(surface: &mut Surface, panel: &CommanderPanel) {
    let width = PANEL_WIDTH.min(surface.cols());
    let inner = width.saturating_sub(4) as usize;
    if inner == 0 {
        return;
    }
    let body = wrap(&format!("\"{}\"", panel.message), inner);
    let height = body.len() as u16 + 2;
    let col = surface.cols() - width;
    let top = surface.rows().saturating_sub(height);

    let title = " TACTICAL COMMANDER ";
    let status = format!(" {} ", panel.status.label());
    let fill = (width as usize)
        .saturating_sub(2 + title.chars().count() + status.chars().count());
    let header = format!("┌{title}{}{status}┐", "─".repeat(fill));
    surface.text(col, top, &header, C_PANEL);

    for (i, line) in body.iter().enumerate() {
        let row = top + 1 + i as u16;
        let padded = format!("{line:<inner$}");
        surface.text(col, row, "│ ", C_PANEL);
        surface.text(col + 2, row, &padded, C_PANEL_TEXT);
        surface.text(col + width - 2, row, " │", C_PANEL);
    }

    let footer = format!("└{}┘", "─".repeat(width.saturating_sub(2) as usize));
    surface.text(col, top + height - 1, &footer, C_PANEL);
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_menu(surface: &mut Surface) {
    let cy = surface.rows() / 2;
    let lines: &[(&str, Color)] = &[
        ("S K Y   G U A R D I A N", C_TITLE),
        ("THE AI COMMANDER PROTOCOL", C_HINT),
        ("", C_HINT),
        ("WASD / ARROWS : NAVIGATION", Color::Blue),
        ("SPACE BAR     : WEAPONS SYSTEM", Color::Green),
        ("", C_HINT),
        ("[ENTER] ENGAGE MISSION    [Q] QUIT", Color::White),
    ];
    let start = cy.saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        surface.text_centered(start + i as u16, text, *color);
    }
}

fn draw_game_over(surface: &mut Surface, game: &GameState) {
    let cy = surface.rows() / 2;
    let score = format!("FINAL SCORE: {}", game.player.score);
    let lines: [(&str, Color); 5] = [
        ("╔════════════════════╗", C_FAILED),
        ("║   MISSION FAILED   ║", C_FAILED),
        ("╚════════════════════╝", C_FAILED),
        (score.as_str(), Color::Yellow),
        ("[R] REDEPLOY    [Q] QUIT", Color::White),
    ];
    let start = cy.saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        surface.text_centered(start + i as u16, text, *color);
    }
}
