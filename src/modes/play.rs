use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::game::{GameEngine, GameEvent, ScheduleId};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

/// Frames the head stays highlighted after eating
const FLASH_FRAMES: u8 = 6;

/// Interactive terminal session around one engine
pub struct PlayMode {
    engine: GameEngine,
    events: Receiver<GameEvent>,
    renderer: Renderer,
    input_handler: InputHandler,
    ticker: Ticker,
    flash_frames: u8,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(engine: GameEngine) -> Self {
        let events = engine.subscribe();

        Self {
            engine,
            events,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            ticker: Ticker::default(),
            flash_frames: 0,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut guard = TerminalGuard::enter()?;

        let result = self.run_game_loop(&mut guard.terminal).await;

        self.engine.shutdown();
        self.ticker.sync(None, Duration::ZERO);
        guard.restore()?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = tokio::time::interval(Duration::from_millis(33));
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let schedule = self.engine.schedule();
            self.ticker.sync(schedule.active(), schedule.period());

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick, only while the engine has a live schedule
                _ = self.ticker.tick() => {
                    self.engine.tick();
                }

                // React to engine notifications
                event = self.events.recv() => {
                    self.handle_game_event(event);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.flash_frames = self.flash_frames.saturating_sub(1);
                    let snapshot = self.engine.snapshot();
                    let flash = self.flash_frames > 0;
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, flash);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => self.engine.set_direction(direction),
                KeyAction::Toggle => self.engine.toggle(),
                KeyAction::Restart => self.engine.restart(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn handle_game_event(&mut self, event: Result<GameEvent, RecvError>) {
        match event {
            Ok(GameEvent::FoodEaten { .. }) => self.flash_frames = FLASH_FRAMES,
            Ok(GameEvent::GameOver { reason, score }) => {
                log::info!("game over: {:?}, score {}", reason, score);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                log::warn!("dropped {} game events", skipped);
            }
            // the engine lives in self, so the sender cannot be gone
            Err(RecvError::Closed) => {}
        }
    }
}

/// The one tokio interval mirroring the engine's active tick schedule
#[derive(Default)]
struct Ticker {
    current: Option<(ScheduleId, Interval)>,
}

impl Ticker {
    /// Replace the interval when the schedule changed, drop it when inactive
    fn sync(&mut self, active: Option<ScheduleId>, period: Duration) {
        let current_id = self.current.as_ref().map(|(id, _)| *id);
        if current_id == active {
            return;
        }

        self.current = active.map(|id| {
            // first tick one full period after (re)starting
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            (id, interval)
        });
    }

    async fn tick(&mut self) {
        match self.current.as_mut() {
            Some((_, interval)) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

/// Raw-mode alternate screen that is restored however the session ends
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    restored: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        if let Err(err) = execute!(stderr, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err).context("Failed to enter alternate screen");
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stderr)) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = execute!(std::io::stderr(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(err).context("Failed to create terminal");
            }
        };

        // from here on, dropping the guard restores the terminal
        let mut guard = Self {
            terminal,
            restored: false,
        };
        guard.terminal.hide_cursor().context("Failed to hide cursor")?;
        guard.terminal.clear().context("Failed to clear terminal")?;

        Ok(guard)
    }

    fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::error!("could not restore terminal: {:#}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameStatus};
    use crate::storage::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> PlayMode {
        let engine = GameEngine::with_seed(GameConfig::default(), Box::new(MemoryStore::new()), 9);
        PlayMode::new(engine)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_space_drives_lifecycle() {
        let mut mode = mode();

        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.engine.status(), GameStatus::Playing);

        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.engine.status(), GameStatus::Paused);

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.engine.status(), GameStatus::Playing);

        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_food_event_starts_flash() {
        let mut mode = mode();
        mode.handle_game_event(Ok(GameEvent::FoodEaten {
            at: crate::game::Point::new(5, 5),
            score: 10,
        }));
        assert_eq!(mode.flash_frames, FLASH_FRAMES);
    }

    #[tokio::test]
    async fn test_ticker_follows_schedule() {
        let mut mode = mode();
        let period = Duration::from_millis(150);

        mode.engine.start();
        let first = mode.engine.schedule().active();
        mode.ticker.sync(first, period);
        assert_eq!(mode.ticker.current.as_ref().map(|(id, _)| *id), first);

        // pause and resume establish a new schedule; the interval is swapped
        mode.engine.pause();
        mode.ticker.sync(mode.engine.schedule().active(), period);
        assert!(mode.ticker.current.is_none());

        mode.engine.resume();
        let second = mode.engine.schedule().active();
        mode.ticker.sync(second, period);
        assert_ne!(first, second);
        assert_eq!(mode.ticker.current.as_ref().map(|(id, _)| *id), second);
    }
}
