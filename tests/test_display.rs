use crossterm::style::Color;

use sky_guardian::commander::CommanderUpdate;
use sky_guardian::display::surface::Surface;
use sky_guardian::display::{draw, health_bar, present, render, wrap};
use sky_guardian::entities::*;
use sky_guardian::session::Session;

fn find_row(surface: &Surface, needle: &str) -> Option<u16> {
    (0..surface.rows()).find(|&r| surface.row_text(r).contains(needle))
}

// ── Surface ───────────────────────────────────────────────────────────────────

#[test]
fn logical_points_map_to_cells() {
    let s = Surface::new(80, 60); // 10×10 logical units per cell
    assert_eq!(s.to_cell(0.0, 0.0), Some((0, 0)));
    assert_eq!(s.to_cell(15.0, 25.0), Some((1, 2)));
    assert_eq!(s.to_cell(799.9, 599.9), Some((79, 59)));
    assert_eq!(s.to_cell(-1.0, 10.0), None);
    assert_eq!(s.to_cell(10.0, 600.0), None);
}

#[test]
fn fill_rect_paints_covered_cells() {
    let mut s = Surface::new(80, 60);
    s.fill_rect(0.0, 0.0, 20.0, 20.0, '#', Color::Red);
    for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(s.cell(col, row).unwrap().ch, '#');
    }
    assert!(s.cell(2, 0).unwrap().is_blank());
    assert!(s.cell(0, 2).unwrap().is_blank());
}

#[test]
fn tiny_shapes_still_paint_a_cell() {
    let mut s = Surface::new(80, 60);
    // 4 units wide: no cell centre inside, but the centre cell is painted.
    s.fill_rect(101.0, 203.0, 4.0, 4.0, '|', Color::Yellow);
    assert_eq!(s.cell(10, 20).unwrap().ch, '|');
}

#[test]
fn offscreen_shapes_are_clipped() {
    let mut s = Surface::new(80, 60);
    s.fill_rect(-100.0, -100.0, 50.0, 50.0, '#', Color::Red);
    s.fill_rect(790.0, 590.0, 100.0, 100.0, '#', Color::Red);
    assert_eq!(s.cell(79, 59).unwrap().ch, '#');
    assert!(s.cell(0, 0).unwrap().is_blank());
}

#[test]
fn triangle_points_down() {
    let mut s = Surface::new(80, 60);
    // Downward triangle: wide top edge, tip at the bottom centre.
    s.fill_polygon(&[(50.0, 40.0), (40.0, 0.0), (0.0, 0.0)], '#', Color::Cyan);
    let top = s.row_text(0);
    let bottom = s.row_text(3);
    assert!(top.matches('#').count() > bottom.matches('#').count());
}

#[test]
fn glow_only_touches_blank_cells() {
    let mut s = Surface::new(80, 60);
    s.set(1, 1, 'X', Color::White);
    s.fill_rect(20.0, 20.0, 10.0, 10.0, '#', Color::Red);
    s.glow(20.0, 20.0, 10.0, 10.0, '░', Color::Red);
    assert_eq!(s.cell(2, 2).unwrap().ch, '#');
    assert_eq!(s.cell(1, 1).unwrap().ch, 'X');
    assert_eq!(s.cell(3, 3).unwrap().ch, '░');
    assert_eq!(s.cell(2, 1).unwrap().ch, '░');
}

#[test]
fn text_is_clipped_at_right_edge() {
    let mut s = Surface::new(10, 2);
    s.text(7, 0, "ABCDEF", Color::White);
    assert_eq!(s.row_text(0), "       ABC");
}

// ── HUD helpers ───────────────────────────────────────────────────────────────

#[test]
fn health_bar_clamps_at_zero() {
    let (full, empty) = health_bar(-5, 100);
    assert_eq!(full.chars().count(), 0);
    assert_eq!(empty.chars().count(), 20);

    let (full, empty) = health_bar(55, 100);
    assert_eq!(full.chars().count(), 11);
    assert_eq!(empty.chars().count(), 9);
}

#[test]
fn wrap_respects_width() {
    let lines = wrap("Comms disrupted. Continue the engagement.", 16);
    assert_eq!(lines, vec!["Comms disrupted.", "Continue the", "engagement."]);
    assert!(wrap("", 10).is_empty());
}

// ── Frames ────────────────────────────────────────────────────────────────────

#[test]
fn menu_frame_shows_title_and_commander() {
    let session = Session::new();
    let mut s = Surface::new(100, 40);
    draw(&mut s, &session, 0);
    assert!(find_row(&s, "S K Y   G U A R D I A N").is_some());
    assert!(find_row(&s, "ENGAGE MISSION").is_some());
    assert!(find_row(&s, "TACTICAL COMMANDER").is_some());
    assert!(find_row(&s, "IDLE").is_some());
}

#[test]
fn playing_frame_shows_hud_and_entities() {
    let mut session = Session::new();
    session.start();
    session.game.player.score = 1234;
    session.game.level = 2;

    let mut s = Surface::new(100, 40);
    draw(&mut s, &session, 1_000);

    assert!(s.row_text(0).contains("SCORE: 1234"));
    assert!(s.row_text(0).contains("LEVEL 2"));
    assert!(s.row_text(1).contains("100%"));
    assert!(find_row(&s, "MISSION FAILED").is_none());
    // The player hull is somewhere on the field.
    assert!((0..s.rows()).any(|r| s.row(r).iter().any(|c| c.ch == '█')));
}

#[test]
fn game_over_frame_shows_overlay_and_clamped_health() {
    let mut session = Session::new();
    session.start();
    session.game.player.health = -5;
    session.game.status = GameStatus::GameOver;

    let mut s = Surface::new(100, 40);
    draw(&mut s, &session, 0);

    assert!(find_row(&s, "MISSION FAILED").is_some());
    assert!(find_row(&s, "REDEPLOY").is_some());
    assert!(s.row_text(1).contains("] 0%"));
}

#[test]
fn commander_panel_shows_latest_message() {
    let mut session = Session::new();
    let ticket = session.commander.begin();
    session.apply(CommanderUpdate::Spoke {
        ticket,
        text: "Bandits inbound".to_string(),
    });
    let mut s = Surface::new(100, 40);
    draw(&mut s, &session, 0);
    assert!(find_row(&s, "Bandits inbound").is_some());
    assert!(find_row(&s, "TALKING").is_some());
}

#[test]
fn drawing_does_not_touch_state() {
    let mut session = Session::new();
    session.start();
    let before = session.game.clone();
    let mut s = Surface::new(80, 24);
    for t in 0..10 {
        draw(&mut s, &session, t * 16);
    }
    assert_eq!(session.game, before);
}

#[test]
fn starfield_is_deterministic_per_timestamp() {
    let session = Session::new();
    let mut a = Surface::new(80, 24);
    let mut b = Surface::new(80, 24);
    draw(&mut a, &session, 4_242);
    draw(&mut b, &session, 4_242);
    for r in 0..a.rows() {
        assert_eq!(a.row(r), b.row(r));
    }
}

#[test]
fn present_emits_terminal_commands() {
    let mut s = Surface::new(20, 5);
    s.text(0, 0, "hi", Color::Green);
    let mut out: Vec<u8> = Vec::new();
    present(&mut out, &s).unwrap();
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("hi"));
    assert!(text.contains('\u{1b}'));
}

#[test]
fn render_survives_tiny_terminals() {
    let mut session = Session::new();
    session.start();
    let mut s = Surface::new(3, 2);
    let mut out: Vec<u8> = Vec::new();
    render(&mut out, &mut s, &session, 0).unwrap();
    assert!(!out.is_empty());
}
