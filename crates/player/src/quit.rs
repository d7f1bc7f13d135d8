//! Contains [PlayerQuit], the player's [QuitSignal].

use playout::QuitSignal;
use util::stop_signals;
use util::terminal::QuitKey;

/// Quits when a stop signal is received or the quit key is pressed.
///
/// Stop signal polling has to be [enabled](stop_signals::polling::enable)
/// separately.
pub struct PlayerQuit {
    key: Option<QuitKey>,
}

impl PlayerQuit {
    /// Watch for stop signals, and for `quit_key` if there is one.
    ///
    /// If the terminal can't be watched the player can still be stopped with a
    /// stop signal.
    pub fn new(quit_key: Option<char>) -> Self {
        let key = quit_key.and_then(|key| match QuitKey::enable(key) {
            Ok(quit_key) => {
                log::info!("Press `{key}` to quit.");
                Some(quit_key)
            }
            Err(e) => {
                log::warn!("Can't read keys from the terminal ({e}), use Ctrl+C to quit.");
                None
            }
        });

        Self { key }
    }
}

impl QuitSignal for PlayerQuit {
    fn should_quit(&mut self) -> bool {
        if stop_signals::polling::consume() {
            log::info!("Received a stop signal.");
            return true;
        }

        let Some(key) = self.key.as_mut() else {
            return false;
        };

        match key.pressed() {
            Ok(true) => {
                log::info!("`{}` pressed.", key.key());
                true
            }
            Ok(false) => false,
            Err(e) => {
                log::warn!("Failed to read from the terminal, the quit key is disabled: {e}");
                self.key = None;
                false
            }
        }
    }
}
