//! Tools for handling stop signals (e.g. `SIGINT`). See [polling].
//!
//! Note that enabling the handlers in [polling] will disable the default
//! stop-signal handler, so the process won't die on `SIGINT`/`SIGTERM` until
//! it decides to.

pub mod polling;

const THREAD_EXPECT_MSG: &str = "The other thread shouldn't panic.";
