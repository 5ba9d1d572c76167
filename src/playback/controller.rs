use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::foundation::core::{SETTLE_TRANSITION, Speed};
use crate::keyframes::builder::FrameSequence;
use crate::render::sink::FrameSink;

/// Human-paced playback state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlaybackState {
    /// Not advancing; either never started or stopped at the final frame.
    #[default]
    Idle,
    /// Advancing one frame per speed-derived interval.
    Playing,
    /// Suspended mid-sequence by the user.
    Paused,
}

/// Timer-driven playback over one immutable [`FrameSequence`].
///
/// The controller owns the single authoritative frame position; the host
/// polls [`PlaybackController::tick`] on its event loop and the controller
/// advances when the speed-derived interval has elapsed. `Instant` arithmetic
/// keeps the cadence frame-accurate rather than drifting with poll jitter.
///
/// The render surface is passed into each method rather than owned, so the
/// same sink can be handed to the recording controller when modes switch
/// (the two never advance the position concurrently).
#[derive(Clone, Debug)]
pub struct PlaybackController {
    sequence: Arc<FrameSequence>,
    current: usize,
    state: PlaybackState,
    speed: Speed,
    last_advance: Option<Instant>,
}

impl PlaybackController {
    /// Create a controller positioned at frame 0.
    pub fn new(sequence: Arc<FrameSequence>, speed: Speed) -> Self {
        Self {
            sequence,
            current: 0,
            state: PlaybackState::Idle,
            speed,
            last_advance: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the committed frame.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Playback speed.
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// The sequence being played.
    pub fn sequence(&self) -> &Arc<FrameSequence> {
        &self.sequence
    }

    /// Interval between frame advances at the current speed.
    pub fn frame_interval(&self) -> Duration {
        self.speed.frame_interval()
    }

    /// Whether the committed frame is the final one.
    pub fn at_end(&self) -> bool {
        !self.sequence.is_empty() && self.current + 1 >= self.sequence.len()
    }

    /// Begin advancing.
    ///
    /// No-op at the final frame (scrub back first) and on empty sequences.
    pub fn play(&mut self) {
        if self.sequence.is_empty() || self.at_end() {
            return;
        }
        self.state = PlaybackState::Playing;
        self.last_advance = None;
        trace!(index = self.current, "playback started");
    }

    /// Stop advancing and re-render the committed frame with the fixed
    /// settle transition.
    pub fn pause(&mut self, sink: &mut impl FrameSink) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Paused;
        self.last_advance = None;
        if let Some(frame) = self.sequence.frame(self.current) {
            sink.render(frame, SETTLE_TRANSITION);
        }
        trace!(index = self.current, "playback paused");
    }

    /// Jump to `index`, cancel any pending advance, and force not-playing.
    ///
    /// Out-of-range indices are a no-op. Scrubbing twice to the same index
    /// renders the same frame both times.
    pub fn scrub_to(&mut self, index: usize, sink: &mut impl FrameSink) {
        let Some(frame) = self.sequence.frame(index) else {
            return;
        };
        self.current = index;
        self.state = if self.at_end() {
            PlaybackState::Idle
        } else {
            PlaybackState::Paused
        };
        self.last_advance = None;
        sink.render(frame, SETTLE_TRANSITION);
        trace!(index, "scrubbed");
    }

    /// Advance if playing and the speed-derived interval has elapsed.
    ///
    /// Returns the newly committed frame index when an advance happened.
    /// Reaching the final frame auto-transitions to [`PlaybackState::Idle`].
    pub fn tick(&mut self, now: Instant, sink: &mut impl FrameSink) -> Option<usize> {
        if self.state != PlaybackState::Playing {
            return None;
        }

        let interval = self.frame_interval();
        if let Some(last) = self.last_advance
            && now.duration_since(last) < interval
        {
            return None;
        }

        let next = self.current + 1;
        let Some(frame) = self.sequence.frame(next) else {
            self.state = PlaybackState::Idle;
            self.last_advance = None;
            return None;
        };

        sink.render(frame, interval);
        self.current = next;
        self.last_advance = Some(now);
        if self.at_end() {
            trace!("reached final frame, stopping");
            self.state = PlaybackState::Idle;
            self.last_advance = None;
        }
        Some(next)
    }

    /// Render the committed frame immediately (used after a rebuild to show
    /// frame 0 without starting playback).
    pub fn render_current(&self, sink: &mut impl FrameSink) {
        if let Some(frame) = self.sequence.frame(self.current) {
            sink.render(frame, Duration::ZERO);
        }
    }

    /// Replace the sequence and reset to `Idle` at frame 0, discarding any
    /// pending advance. Called on every dataset/options rebuild.
    pub fn rebind(&mut self, sequence: Arc<FrameSequence>, speed: Speed) {
        self.sequence = sequence;
        self.speed = speed;
        self.current = 0;
        self.force_idle();
    }

    /// Force `Idle` at the current position, discarding any pending advance.
    ///
    /// Entering recording mode calls this before the recorder's first render
    /// so the two controllers never drive the surface concurrently.
    pub fn force_idle(&mut self) {
        self.state = PlaybackState::Idle;
        self.last_advance = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
