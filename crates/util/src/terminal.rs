//! Non-blocking keyboard input for the terminal the player was started from.
//! See [QuitKey].

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// The key that quits playback unless another one is configured.
pub const DEFAULT_QUIT_KEY: char = 'q';

/// Puts the terminal into raw mode and watches it for a quit key press.
///
/// The terminal is restored to its previous mode when this is dropped. While
/// raw mode is enabled `Ctrl+C` no longer produces `SIGINT`, so it is treated
/// as a quit key press as well.
#[derive(Debug)]
pub struct QuitKey {
    key: char,
}

impl QuitKey {
    /// Enable raw mode and start watching for `key`.
    ///
    /// This fails if stdin isn't a terminal.
    pub fn enable(key: char) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        log::debug!("Terminal raw mode enabled (quit key is `{key}`).");
        Ok(Self { key })
    }

    /// The key this is watching for.
    pub fn key(&self) -> char {
        self.key
    }

    /// Drain every pending terminal event without blocking and return whether
    /// any of them was a quit key press. Other keys are ignored.
    pub fn pressed(&mut self) -> Result<bool, io::Error> {
        let mut pressed = false;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key_event) = event::read()? {
                if is_quit(&key_event, self.key) {
                    pressed = true;
                } else if key_event.kind == KeyEventKind::Press {
                    log::trace!("Ignoring key press {:?}.", key_event.code);
                }
            }
        }

        Ok(pressed)
    }
}

impl Drop for QuitKey {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("Failed to restore the terminal: {e}");
        }
    }
}

/// Whether `key_event` should stop playback when the quit key is `quit_key`.
pub fn is_quit(key_event: &KeyEvent, quit_key: char) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    match key_event.code {
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char(c) => c == quit_key,
        _ => false,
    }
}
