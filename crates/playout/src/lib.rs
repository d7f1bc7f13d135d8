//! Real-time playout: takes decoded frames from a
//! [MediaSource](media::source::MediaSource), converts them, hands them to a
//! [VideoSink] and paces the loop to the source's frame rate. See [Emitter].

pub mod clock;
pub mod emitter;
pub mod health;
pub mod pacer;
pub mod quit;
pub mod restart;
pub mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use emitter::{CycleError, Emitter, EmitterError, EmitterState};
pub use health::{Health, HealthSummary};
pub use pacer::{PacePlan, Pacer, PacingState};
pub use quit::QuitSignal;
pub use restart::RestartPolicy;
pub use sink::{DiscardSink, SinkError, VideoSink};
