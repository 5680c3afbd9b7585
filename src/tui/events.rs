use crate::error::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
}

pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Blocks for at most one tick; anything other than a key press or a
    /// mouse event becomes a `Tick` so async results still get drained.
    pub fn next_event(&self) -> Result<AppEvent> {
        if !event::poll(TICK_RATE)? {
            return Ok(AppEvent::Tick);
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(AppEvent::Key(key)),
            Event::Mouse(mouse) => Ok(AppEvent::Mouse(mouse)),
            _ => Ok(AppEvent::Tick),
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
