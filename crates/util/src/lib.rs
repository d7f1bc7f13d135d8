//! Process-level helpers shared by the player's crates: stop signal polling
//! and non-blocking terminal key input.

pub mod stop_signals;
pub mod terminal;
