//! Contains the [Emitter], the loop that decodes, converts, sends and paces
//! every frame of a [MediaSource] and starts it over when it runs out.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use media::convert::{self, ConvertError};
use media::frame::{FrameRate, PlanarFrame};
use media::source::{MediaSource, Retrieved, SourceError};

use crate::{Clock, Health, HealthSummary, Pacer, PacingState, QuitSignal, RestartPolicy};
use crate::{SinkError, VideoSink};

/// The state of an [Emitter].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmitterState {
    /// Frames are being decoded and sent.
    Running,
    /// The source ran out (or a pass failed) and is about to be started over.
    Restarting,
    /// The quit signal was observed. Nothing else will be sent.
    Cancelled,
    /// Playback can't continue.
    Fatal,
}

impl EmitterState {
    /// Check if this state transition is valid.
    pub fn can_transition_to(&self, target: EmitterState) -> bool {
        use EmitterState::*;

        match (self, target) {
            (Running, Running | Restarting | Cancelled) => true,
            (Restarting, Running | Cancelled | Fatal) => true,

            // Both of these are final.
            (Cancelled, _) | (Fatal, _) => false,

            _ => false,
        }
    }

    /// Whether an [Emitter] in this state will never send another frame.
    pub fn is_final(&self) -> bool {
        matches!(self, EmitterState::Cancelled | EmitterState::Fatal)
    }

    /// Get a human-readable description of this state.
    pub fn description(&self) -> &'static str {
        match self {
            EmitterState::Running => "Running",
            EmitterState::Restarting => "Restarting",
            EmitterState::Cancelled => "Cancelled",
            EmitterState::Fatal => "Fatal",
        }
    }
}

impl Display for EmitterState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Sends every frame of a [MediaSource] to a [VideoSink] at the source's frame
/// rate, looping forever until a [QuitSignal] says to stop.
///
/// Drive it with [Emitter::run], or one transition at a time with
/// [Emitter::step].
pub struct Emitter<S, K, Q, C> {
    source: S,
    output: Output<K, C>,
    quit: Q,
    policy: RestartPolicy,
    state: EmitterState,
    consecutive_failures: u32,
    last_failure: Option<CycleError>,
}

/// Everything a frame passes through after it's been decoded. Kept apart from
/// the source so a frame borrowed from the source can be sent.
struct Output<K, C> {
    sink: K,
    clock: C,
    pacer: Pacer,
    pacing: PacingState,
    rate: FrameRate,
    health: Health,
}

/// How one compressed unit's worth of work ended.
enum Cycle {
    Continue,
    Exhausted,
    Quit,
}

impl<S, K, Q, C> Emitter<S, K, Q, C>
where
    S: MediaSource,
    K: VideoSink,
    Q: QuitSignal,
    C: Clock,
{
    /// Create an emitter that sends `source`'s frames to `sink` at the
    /// source's frame rate.
    pub fn new(source: S, sink: K, quit: Q, clock: C, policy: RestartPolicy) -> Self {
        let rate = source.stats().rate;

        Self {
            source,
            output: Output {
                sink,
                clock,
                pacer: Pacer::from_rate(rate),
                pacing: PacingState::new(),
                rate,
                health: Health::new(),
            },
            quit,
            policy,
            state: EmitterState::Running,
            consecutive_failures: 0,
            last_failure: None,
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn health(&self) -> &Health {
        &self.output.health
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run until the quit signal is observed (returning a summary of what was
    /// sent) or playback fails for good.
    pub fn run(mut self) -> Result<HealthSummary, EmitterError> {
        log::info!(
            "Sending at {} fps (one frame every {:?}).",
            self.output.rate,
            self.output.pacer.interval()
        );

        let result = loop {
            match self.step() {
                Ok(state) if state.is_final() => break Ok(self.output.health.summary()),
                Ok(_) => {}
                Err(e) => break Err(e),
            }
        };

        log::info!("Health: {}.", self.output.health.summary());
        result
    }

    /// Make one transition: a unit's worth of frames while
    /// [Running](EmitterState::Running), a restart while
    /// [Restarting](EmitterState::Restarting). Final states stay put.
    ///
    /// An error means the emitter is now [Fatal](EmitterState::Fatal).
    pub fn step(&mut self) -> Result<EmitterState, EmitterError> {
        let next = match self.state {
            EmitterState::Running => Ok(self.run_cycle()),
            EmitterState::Restarting => self.restart(),
            EmitterState::Cancelled | EmitterState::Fatal => return Ok(self.state),
        };

        match next {
            Ok(state) => {
                self.transition(state);
                Ok(state)
            }
            Err(e) => {
                log::error!("{e}");
                self.transition(EmitterState::Fatal);
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: EmitterState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "Invalid emitter transition from {} to {next}.",
            self.state
        );

        if self.state != next {
            log::debug!("Emitter: {} -> {next}.", self.state);
            self.state = next;
        }
    }

    fn run_cycle(&mut self) -> EmitterState {
        if self.quit.should_quit() {
            return EmitterState::Cancelled;
        }

        match self.next_unit() {
            Ok(Cycle::Continue) => EmitterState::Running,
            Ok(Cycle::Quit) => EmitterState::Cancelled,
            Ok(Cycle::Exhausted) => EmitterState::Restarting,
            Err(e) => {
                self.consecutive_failures += 1;
                self.output.health.record_failure();
                log::error!(
                    "{e} (failure {} of {}).",
                    self.consecutive_failures,
                    self.policy.max_consecutive_failures
                );
                self.last_failure = Some(e);
                EmitterState::Restarting
            }
        }
    }

    /// Read, submit and drain one compressed unit. Once the source is out of
    /// units, flush the decoder and drain what it was holding instead.
    fn next_unit(&mut self) -> Result<Cycle, CycleError> {
        let Some(unit) = self.source.read_unit()? else {
            log::debug!("The source is out of units, flushing the decoder.");
            self.source.finish()?;
            return Ok(match self.drain()? {
                Cycle::Quit => Cycle::Quit,
                _ => Cycle::Exhausted,
            });
        };

        self.source.submit(&unit)?;
        self.drain()
    }

    /// Send every frame the decoder has ready.
    fn drain(&mut self) -> Result<Cycle, CycleError> {
        let mut frames = 0;

        loop {
            match self.source.retrieve()? {
                Retrieved::Frame(frame) => {
                    self.output.emit(&frame)?;
                    self.consecutive_failures = 0;
                    frames += 1;

                    if self.quit.should_quit() {
                        return Ok(Cycle::Quit);
                    }
                }
                Retrieved::NeedMore => {
                    log::trace!("Frames per unit: {frames}.");
                    return Ok(Cycle::Continue);
                }
                Retrieved::End => return Ok(Cycle::Exhausted),
            }
        }
    }

    fn restart(&mut self) -> Result<EmitterState, EmitterError> {
        if let Some(failure) = self.last_failure.take() {
            if self.policy.is_fatal(self.consecutive_failures) {
                return Err(EmitterError::TooManyFailures {
                    failures: self.consecutive_failures,
                    last: failure,
                });
            }

            let delay = self.policy.backoff(self.consecutive_failures);
            log::warn!("Starting the source over in {delay:?}.");
            if self.back_off(delay) {
                return Ok(EmitterState::Cancelled);
            }
        } else {
            log::info!(
                "Reached the end of the source, starting over. Health: {}.",
                self.output.health.summary()
            );
        }

        if self.quit.should_quit() {
            return Ok(EmitterState::Cancelled);
        }

        self.source.start_over().map_err(EmitterError::StartOver)?;
        self.output.health.record_restart();

        Ok(EmitterState::Running)
    }

    /// Sleep for `delay`, at most a frame interval at a time so the quit
    /// signal is still checked every frame. Returns whether it said to quit.
    fn back_off(&mut self, delay: Duration) -> bool {
        let slice = self.output.pacer.interval().max(Duration::from_millis(1));
        let mut remaining = delay;

        while !remaining.is_zero() {
            if self.quit.should_quit() {
                return true;
            }

            let step = remaining.min(slice);
            self.output.clock.sleep(step);
            remaining -= step;
        }

        let now = self.output.clock.now();
        self.output.pacing.resync(now);
        false
    }
}

impl<K: VideoSink, C: Clock> Output<K, C> {
    /// Convert, send and pace a single frame.
    fn emit(&mut self, frame: &PlanarFrame<'_>) -> Result<(), CycleError> {
        log::debug!(
            "{} {} {}",
            frame.info(),
            frame.format(),
            frame.dimensions()
        );

        let convert_start = self.clock.now();
        let packed = convert::yuv420p_to_uyvy(frame, self.rate)?;
        log::trace!(
            "Time to convert color: {}us.",
            self.clock
                .now()
                .saturating_duration_since(convert_start)
                .as_micros()
        );

        self.sink.send(&packed)?;

        let first_frame = self.pacing.is_first_frame();
        let plan = self.pacer.pace(&mut self.pacing, &self.clock);
        if !first_frame {
            log::trace!("Time to process frame: {}us.", plan.elapsed.as_micros());
        }

        if plan.shortfall {
            self.health.record_shortfall();
            log::warn!(
                "Processing a frame took {}us, longer than a frame lasts ({}us). \
                The output won't keep up with the source frame rate.",
                plan.elapsed.as_micros(),
                self.pacer.interval().as_micros()
            );
        }

        self.health
            .record_frame(packed.data().len(), frame.info().key_frame);

        Ok(())
    }
}

/// Indicates that a single pass over the source failed. The [Emitter] starts
/// the source over after one of these.
#[derive(thiserror::Error, Debug)]
pub enum CycleError {
    #[error("Failed to decode a frame: {0}")]
    Decode(#[from] SourceError),
    #[error("Failed to convert a frame: {0}")]
    Convert(#[from] ConvertError),
    #[error("Failed to send a frame: {0}")]
    Send(#[from] SinkError),
}

/// Indicates that an [Emitter] can't continue.
#[derive(thiserror::Error, Debug)]
pub enum EmitterError {
    #[error("Failed to start the source over: {0}")]
    StartOver(#[source] SourceError),
    #[error("Giving up after {failures} failures in a row.")]
    TooManyFailures {
        failures: u32,
        #[source]
        last: CycleError,
    },
}
