//! Chartrace is a bar-chart-race animation engine.
//!
//! It turns a sparse, irregularly-sampled time series of named entities into
//! a dense sequence of interpolated, stably-ranked animation frames
//! (`FrameSequence`) and drives two mutually exclusive consumers of that
//! sequence: a human-paced playback controller and a capture-paced recording
//! controller that submits rendered frames to an external video-compilation
//! service.
//!
//! # Pipeline overview
//!
//! 1. **Ingest**: `RacePayload + TimeUnit -> Dataset` (one sampling
//!    granularity is selected; dates are parsed and validated)
//! 2. **Build**: `Dataset -> FrameSequence` (pure keyframe interpolation and
//!    ranking; colors assigned once per sequence)
//! 3. **Play**: `PlaybackController` advances frames on a speed-derived
//!    cadence with pause/scrub support
//! 4. **Record** (alternative to play): `RecordingController` walks the same
//!    frames, paced against per-frame network submissions, and downloads the
//!    compiled video
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: keyframe building and ranking are pure and
//!   stable for a given input; color assignment is owned by the sequence, not
//!   process-wide, so concurrent charts never bleed into each other.
//! - **One position owner**: the frame position is owned by whichever
//!   controller is active; mode switches go through
//!   [`ChartSession::begin_recording`].
//! - **Cancellation-safe recording**: stopping a session from any phase tears
//!   it down to a clean idle state and aborts the in-flight compile request.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dataset;
mod foundation;
mod keyframes;
mod playback;
mod record;
mod render;
mod session;

pub use dataset::model::{Dataset, Element, RacePayload, Snapshot, SnapshotRecord, parse_date};
pub use foundation::core::{
    DEFAULT_INTERPOLATION_STEPS, DEFAULT_MAX_RANK, SETTLE_TRANSITION, Speed, TimeUnit,
};
pub use foundation::error::{RaceError, RaceResult};
pub use keyframes::builder::{Frame, FrameSequence, build};
pub use keyframes::rank::{ColorMap, Palette, RankedEntry, rank_entities};
pub use playback::controller::{PlaybackController, PlaybackState};
pub use record::controller::{
    RecordingConfig, RecordingController, RecordingHandle, RecordingOutcome, RecordingPhase,
    SubmitFailurePolicy,
};
pub use record::service::{
    DEFAULT_VIDEO_FILENAME, HttpVideoService, SessionId, VideoFile, VideoService,
    filename_from_content_disposition, save_video,
};
pub use render::sink::FrameSink;
pub use render::svg::SvgBarChart;
pub use session::host::{ChartSession, RaceOptions};
