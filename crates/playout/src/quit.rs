//! The [QuitSignal] trait.

/// Tells the playout loop when to stop. Checked between frames and between
/// compressed units, so it can't block.
#[cfg_attr(test, mockall::automock)]
pub trait QuitSignal {
    fn should_quit(&mut self) -> bool;
}

impl<F: FnMut() -> bool> QuitSignal for F {
    fn should_quit(&mut self) -> bool {
        self()
    }
}
