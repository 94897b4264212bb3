use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use sky_guardian::advisor::{Advisor, GeminiAdvisor};
use sky_guardian::commander::{CommanderUpdate, Dispatcher};
use sky_guardian::config::Config;
use sky_guardian::display::{self, surface::Surface};
use sky_guardian::error::AppError;
use sky_guardian::input::InputTracker;
use sky_guardian::logging;
use sky_guardian::session::Session;

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drive the session until the user quits: drain input and commander
/// updates, tick the simulation, render, then sleep out the frame.
///
/// Input model: key events only update the `InputTracker`; each frame takes
/// one snapshot of the held controls and the simulation applies all of them
/// at once, so fire and movement can be held together.
fn game_loop<W: Write, A: Advisor>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    mut input: InputTracker,
    dispatcher: &Dispatcher<A>,
    updates: &mut UnboundedReceiver<CommanderUpdate>,
    frame_len: Duration,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut session = Session::new();
    let (cols, rows) = terminal::size()?;
    let mut surface = Surface::new(cols, rows);

    let clock = Instant::now();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending terminal events (non-blocking) ──────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Enter => {
                                if session.start() {
                                    input.clear();
                                }
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                if session.restart() {
                                    input.clear();
                                }
                            }
                            _ => {}
                        }
                        input.press(code, frame);
                    }
                    KeyEventKind::Repeat => {
                        input.press(code, frame);
                    }
                    KeyEventKind::Release => input.release(code),
                },
                Event::Resize(cols, rows) => surface.resize(cols, rows),
                _ => {}
            }
        }

        // ── Commander updates from finished advice tasks ──────────────────────
        while let Ok(update) = updates.try_recv() {
            session.apply(update);
        }

        // ── Simulation ────────────────────────────────────────────────────────
        let now_ms = clock.elapsed().as_millis() as u64;
        let held = input.held(frame);
        for (ticket, event) in session.advance(&held, now_ms, &mut rng) {
            dispatcher.dispatch(ticket, &event);
        }

        display::render(out, &mut surface, &session, now_ms)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), AppError> {
    let config = Config::from_env();
    logging::init(&config.log_file)?;
    info!(model = %config.model, language = %config.language, "starting sky guardian");
    if config.api_key.is_none() {
        info!("no API key configured; the commander will use fallback lines");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let advisor = GeminiAdvisor::new(&config)?;
    let (dispatcher, mut updates) = Dispatcher::new(advisor, runtime.handle().clone());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the
    // hold window.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    info!(keyboard_enhanced, "terminal input mode");

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let input = InputTracker::new(keyboard_enhanced);
    let result = game_loop(
        &mut out,
        &rx,
        input,
        &dispatcher,
        &mut updates,
        config.frame,
    );

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    // Pending advice requests are abandoned rather than awaited.
    runtime.shutdown_background();
    info!("sky guardian stopped");

    result.map_err(AppError::from)
}
