//! Terminal Tetris runner (default binary).
//!
//! Single-threaded loop: poll crossterm input until the next tick deadline,
//! feed held-key repeats and gravity, drain game events into the log and the
//! banner, then draw the frame.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use term_tetris::core::{validate_catalog, GameSession, GameSnapshot};
use term_tetris::input::{handle_key_event, should_quit, InputHandler};
use term_tetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use term_tetris::types::{GameAction, GameEvent};
use term_tetris::{EventLog, GameConfig};

const GAME_OVER_BANNER: &str = "GAME OVER";

fn main() -> Result<()> {
    // Refuse to start on a broken piece table, before the terminal is touched.
    validate_catalog().context("built-in piece catalog is invalid")?;

    let config = GameConfig::from_env();
    let mut log = EventLog::from_config(&config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config, &mut log);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: &GameConfig, log: &mut EventLog) -> Result<()> {
    let mut session = GameSession::new(config.seed);
    log.session_start(session.seed());

    let view = GameView::default();
    let mut input = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut banner_until: Option<Instant> = None;
    let banner_for = Duration::from_millis(config.banner_ms.into());

    let tick_duration = Duration::from_millis(config.tick_ms.into());
    let mut last_tick = Instant::now();

    loop {
        // Render.
        session.snapshot_into(&mut snap);
        let banner = banner_until
            .filter(|until| Instant::now() < *until)
            .map(|_| GAME_OVER_BANNER);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into_with_banner(&snap, banner, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input until the next tick is due.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(action) = handle_key_event(key).and_then(|a| input.press(a)) {
                            if action == GameAction::Restart {
                                input.reset();
                                log.restart();
                                banner_until = None;
                            }
                            session.apply_action(action);
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(action) = handle_key_event(key) {
                            input.release(action);
                        }
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick with the real elapsed time.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);

            for action in input.update(elapsed_ms) {
                session.apply_action(action);
            }
            session.tick(elapsed_ms);
        }

        for event in session.take_events() {
            log.record(&event);
            if matches!(event, GameEvent::GameOver { .. }) {
                input.reset();
                banner_until = Some(Instant::now() + banner_for);
            }
        }
    }
}
