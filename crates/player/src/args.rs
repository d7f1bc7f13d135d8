//! Contains [Args], which are parsed command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use playout::RestartPolicy;
use util::terminal::DEFAULT_QUIT_KEY;

/// Parsed command line arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "ndi-player",
    about = "Plays a video file over NDI at its native frame rate, looping until you quit."
)]
pub struct Args {
    /// The video file to play.
    #[arg(env = "NDIPLAYER_INPUT_FILE")]
    pub input: PathBuf,

    /// The name other NDI applications will see this source as.
    #[arg(long, default_value = "ndi-player")]
    pub ndi_name: String,

    /// The key that stops playback.
    #[arg(long, default_value_t = DEFAULT_QUIT_KEY)]
    pub quit_key: char,

    /// Don't read keys from the terminal. Playback can still be stopped with
    /// `SIGINT`/`SIGTERM`.
    #[arg(long)]
    pub no_keyboard: bool,

    /// Give up after this many failed passes over the input in a row.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_failures: u32,

    /// How long to wait before starting over after the first failure, in
    /// milliseconds. The wait doubles with every failure in a row.
    #[arg(long, default_value_t = 100)]
    pub backoff_ms: u64,

    /// The longest to ever wait before starting over, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub max_backoff_ms: u64,

    /// Decode, convert and pace frames as usual but don't send them anywhere.
    #[arg(long)]
    pub dry_run: bool,

    /// Log every frame (same as `RUST_LOG=debug`).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// How the player should recover from failed passes.
    pub fn restart_policy(&self) -> RestartPolicy {
        RestartPolicy {
            max_consecutive_failures: self.max_failures,
            backoff_base: Duration::from_millis(self.backoff_ms),
            backoff_max: Duration::from_millis(self.max_backoff_ms.max(self.backoff_ms)),
        }
    }
}

impl Default for Args {
    fn default() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["ndi-player", "clip.mp4"]).unwrap();

        assert_eq!(args.input, PathBuf::from("clip.mp4"));
        assert_eq!(args.ndi_name, "ndi-player");
        assert_eq!(args.quit_key, 'q');
        assert!(!args.dry_run);
        assert_eq!(args.restart_policy(), RestartPolicy::default());
    }

    #[test]
    fn max_backoff_is_never_below_the_base() {
        let args = Args::try_parse_from([
            "ndi-player",
            "clip.mp4",
            "--backoff-ms",
            "800",
            "--max-backoff-ms",
            "200",
        ])
        .unwrap();

        let policy = args.restart_policy();
        assert_eq!(policy.backoff_base, Duration::from_millis(800));
        assert_eq!(policy.backoff_max, Duration::from_millis(800));
    }

    #[test]
    fn zero_failures_is_rejected() {
        assert!(Args::try_parse_from(["ndi-player", "clip.mp4", "--max-failures", "0"]).is_err());
    }

    #[test]
    fn quit_key_must_be_one_character() {
        let args = Args::try_parse_from(["ndi-player", "clip.mp4", "--quit-key", "x"]).unwrap();
        assert_eq!(args.quit_key, 'x');

        assert!(Args::try_parse_from(["ndi-player", "clip.mp4", "--quit-key", "xy"]).is_err());
    }
}
