#[cfg_attr(not(feature = "ffmpeg"), allow(dead_code))]
mod args;
mod logging;
#[cfg(feature = "ndi")]
#[cfg_attr(not(feature = "ffmpeg"), allow(dead_code))]
mod ndi_sink;
#[cfg_attr(not(feature = "ffmpeg"), allow(dead_code))]
mod quit;

use std::error::Error;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use playout::{EmitterError, HealthSummary};

use args::Args;

fn main() -> ExitCode {
    let args = Args::default();

    let use_keyboard = !args.no_keyboard && io::stdin().is_terminal();
    logging::init(args.verbose, use_keyboard);

    match play(&args, use_keyboard) {
        Ok(summary) => {
            log::info!("Done. {summary}.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error_chain(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "ffmpeg")]
fn play(args: &Args, use_keyboard: bool) -> Result<HealthSummary, PlayerError> {
    use util::stop_signals;

    stop_signals::polling::enable().map_err(PlayerError::StopSignals)?;
    let result = play_file(args, use_keyboard);
    stop_signals::polling::disable();

    result
}

#[cfg(not(feature = "ffmpeg"))]
fn play(_args: &Args, _use_keyboard: bool) -> Result<HealthSummary, PlayerError> {
    Err(PlayerError::NoDecoder)
}

#[cfg(feature = "ffmpeg")]
fn play_file(args: &Args, use_keyboard: bool) -> Result<HealthSummary, PlayerError> {
    use media::source::FileSource;
    use playout::DiscardSink;

    let source = FileSource::open(&args.input).map_err(|source| PlayerError::Open {
        path: args.input.clone(),
        source,
    })?;

    if args.dry_run {
        log::info!("Dry run, frames won't be sent anywhere.");
        return emit(args, use_keyboard, source, DiscardSink);
    }

    send_over_ndi(args, use_keyboard, source)
}

#[cfg(all(feature = "ffmpeg", feature = "ndi"))]
fn send_over_ndi(
    args: &Args,
    use_keyboard: bool,
    source: media::source::FileSource,
) -> Result<HealthSummary, PlayerError> {
    let ndi = grafton_ndi::NDI::new()?;
    log::info!("NDI initialized.");

    let sink = ndi_sink::NdiSink::new(&ndi, &args.ndi_name)?;
    emit(args, use_keyboard, source, sink)
}

#[cfg(all(feature = "ffmpeg", not(feature = "ndi")))]
fn send_over_ndi(
    _args: &Args,
    _use_keyboard: bool,
    _source: media::source::FileSource,
) -> Result<HealthSummary, PlayerError> {
    Err(PlayerError::NoSender)
}

/// Play `source` into `sink` until quit.
#[cfg(feature = "ffmpeg")]
fn emit<S, K>(
    args: &Args,
    use_keyboard: bool,
    source: S,
    sink: K,
) -> Result<HealthSummary, PlayerError>
where
    S: media::source::MediaSource,
    K: playout::VideoSink,
{
    use playout::{Emitter, SystemClock};

    let quit = quit::PlayerQuit::new(use_keyboard.then_some(args.quit_key));
    let emitter = Emitter::new(source, sink, quit, SystemClock, args.restart_policy());

    Ok(emitter.run()?)
}

/// Log an error and everything that caused it, skipping causes that the
/// previous message already ends with.
fn log_error_chain(e: &PlayerError) {
    let mut shown = e.to_string();
    log::error!("{shown}");

    let mut source = e.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if !shown.ends_with(&message) {
            log::error!("Caused by: {message}");
        }
        shown = message;
        source = cause.source();
    }
}

/// Everything that can stop the player from playing.
#[derive(thiserror::Error, Debug)]
#[cfg_attr(not(feature = "ffmpeg"), allow(dead_code))]
enum PlayerError {
    #[error("Failed to enable stop signal polling.")]
    StopSignals(#[source] io::Error),
    #[cfg(feature = "ffmpeg")]
    #[error("Failed to open `{}`.", .path.display())]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: media::source::FileSourceError,
    },
    #[cfg(not(feature = "ffmpeg"))]
    #[error("This build can't decode video, rebuild it with `--features ffmpeg`.")]
    NoDecoder,
    #[cfg(not(feature = "ndi"))]
    #[error("This build can't send over NDI, rebuild it with `--features ndi` or use `--dry-run`.")]
    NoSender,
    #[cfg(feature = "ndi")]
    #[error("Failed to set up NDI.")]
    Ndi(#[from] grafton_ndi::Error),
    #[error(transparent)]
    Emitter(#[from] EmitterError),
}
