//! Logger setup. Everything is logged to stderr.

use std::io::Write;

use env_logger::{Builder, Env};

/// Initialize the global logger. The default level is `info` (`debug` if
/// `verbose`), `RUST_LOG` overrides both.
///
/// While the terminal is in raw mode a bare `\n` doesn't return the cursor to
/// the start of the line, so `raw_terminal` switches lines to ending in
/// `\r\n`.
pub fn init(verbose: bool, raw_terminal: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let line_ending = if raw_terminal { "\r\n" } else { "\n" };

    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(move |buf, record| {
            write!(
                buf,
                "[{} {:<5} {}] {}{line_ending}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
