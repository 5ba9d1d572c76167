use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tracing::{debug, info, warn};

use crate::foundation::core::Speed;
use crate::foundation::error::{RaceError, RaceResult};
use crate::keyframes::builder::FrameSequence;
use crate::record::service::{VideoFile, VideoService};
use crate::render::sink::FrameSink;

/// Fraction of a frame's transition at which its visual state is captured.
/// Keeps the ordering value `index + fraction` strictly below the next
/// frame's, so submissions sort correctly even when responses race.
const CAPTURE_PROGRESS: f64 = 0.95;

/// Recording lifecycle phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RecordingPhase {
    /// No session active.
    #[default]
    Idle,
    /// Creating the server-side session.
    Initializing,
    /// Walking the frame sequence and submitting captures.
    Capturing,
    /// Waiting out in-flight submissions, compiling, downloading.
    Finalizing,
}

/// What to do when an individual frame submission fails.
///
/// Continuing past submission errors may drop frames from the compiled video,
/// so the choice is an explicit policy rather than a fixed behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SubmitFailurePolicy {
    /// Log and keep capturing (best-effort video, frames may be missing).
    #[default]
    ContinueLogging,
    /// Treat the first failed submission as fatal to the session.
    Abort,
}

/// Pacing and policy knobs for one recording session.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct RecordingConfig {
    /// Source ticks per second; one frame transition spans `1/speed` sec.
    pub speed: Speed,
    /// Frame rate passed to the compile request.
    pub framerate: u32,
    /// Startup delay before the capture loop, in frame intervals.
    pub startup_spacing: u32,
    /// Spacing between capture iterations, in frame intervals. Larger than
    /// the playback spacing so network submission has time to settle.
    pub capture_spacing: u32,
    /// Wait before finalizing, letting in-flight submissions land.
    pub settle_delay: Duration,
    /// Upper bound on concurrently in-flight frame submissions.
    pub max_in_flight: usize,
    /// Policy for individual submission failures.
    pub submit_failure: SubmitFailurePolicy,
}

impl RecordingConfig {
    /// Defaults for a given playback speed.
    pub fn new(speed: Speed) -> Self {
        Self {
            speed,
            framerate: 36,
            startup_spacing: 2,
            capture_spacing: 3,
            settle_delay: Duration::from_secs(1),
            max_in_flight: 4,
            submit_failure: SubmitFailurePolicy::default(),
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self::new(Speed::default())
    }
}

/// How a recording session ended.
#[derive(Clone, Debug)]
pub enum RecordingOutcome {
    /// The session ran to completion; the compiled video is ready to save.
    Completed(VideoFile),
    /// The caller stopped the session; all state was torn down. Not an error.
    Cancelled,
}

/// Observer/stop handle for a running recording session.
///
/// Cloneable and usable from UI code while [`RecordingController::run`] is in
/// flight. Stopping is idempotent.
#[derive(Clone, Debug)]
pub struct RecordingHandle {
    stop: watch::Sender<bool>,
    phase: watch::Receiver<RecordingPhase>,
    percent: watch::Receiver<Option<f64>>,
}

impl RecordingHandle {
    /// Request cancellation. Safe to call repeatedly or when idle.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RecordingPhase {
        *self.phase.borrow()
    }

    /// Completion percentage, `None` when no session is active. Capturing
    /// covers 0–99; the final 1% is reserved for the compile step.
    pub fn percent_complete(&self) -> Option<f64> {
        *self.percent.borrow()
    }

    /// Watch channel for progress updates (for reactive UI display).
    pub fn subscribe_percent(&self) -> watch::Receiver<Option<f64>> {
        self.percent.clone()
    }
}

/// Capture-paced recording over one immutable [`FrameSequence`].
///
/// Walks the same frames as playback, but paces itself against the external
/// video service: each iteration renders a frame, serializes the surface, and
/// fires a bounded, non-awaited submission before sleeping a multiple of the
/// speed-derived interval. Cancellation from any phase tears the session down
/// to a clean `Idle`; re-running starts a fresh server-side session.
#[derive(Debug)]
pub struct RecordingController<V> {
    service: Arc<V>,
    config: RecordingConfig,
    phase: watch::Sender<RecordingPhase>,
    percent: watch::Sender<Option<f64>>,
    stop: watch::Sender<bool>,
}

impl<V: VideoService + 'static> RecordingController<V> {
    /// Create a controller over `service`.
    pub fn new(service: V, config: RecordingConfig) -> Self {
        let (phase, _) = watch::channel(RecordingPhase::Idle);
        let (percent, _) = watch::channel(None);
        let (stop, _) = watch::channel(false);
        Self {
            service: Arc::new(service),
            config,
            phase,
            percent,
            stop,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RecordingPhase {
        *self.phase.borrow()
    }

    /// Completion percentage, `None` when no session is active.
    pub fn percent_complete(&self) -> Option<f64> {
        *self.percent.borrow()
    }

    /// Observer/stop handle for a session driven by [`Self::run`].
    pub fn handle(&self) -> RecordingHandle {
        RecordingHandle {
            stop: self.stop.clone(),
            phase: self.phase.subscribe(),
            percent: self.percent.subscribe(),
        }
    }

    /// Rough wall-clock estimate for capturing and compiling `frames` frames,
    /// suitable for a UI countdown (capture time plus roughly one second of
    /// compile time per frame).
    pub fn estimated_duration(&self, frames: usize) -> Duration {
        let play_secs = (frames as f64 / self.config.speed.as_f64()).ceil();
        Duration::from_secs_f64(4.0 * play_secs + frames as f64)
    }

    /// Drive one recording session to completion or cancellation.
    ///
    /// On success the compiled video is returned for the caller to save. Any
    /// failure resets the controller to `Idle` (no partial state survives)
    /// and surfaces as a single error. Frames are rendered and submitted in
    /// strictly increasing order; ordering values are strictly monotonic
    /// across the session.
    #[tracing::instrument(skip_all, fields(frames = sequence.len()))]
    pub async fn run<S: FrameSink>(
        &self,
        sequence: &FrameSequence,
        sink: &mut S,
    ) -> RaceResult<RecordingOutcome> {
        if sequence.is_empty() {
            return Err(RaceError::validation("cannot record an empty frame sequence"));
        }
        if self.phase() != RecordingPhase::Idle {
            return Err(RaceError::session("a recording session is already active"));
        }
        // Fresh stop flag per session; a stale stop must not cancel a new run.
        self.stop.send_replace(false);
        self.phase.send_replace(RecordingPhase::Initializing);

        let session = match self.guarded(self.service.create_session()).await {
            Some(Ok(session)) => session,
            Some(Err(error)) => {
                warn!(%error, "recording session creation failed");
                self.reset();
                return Err(error);
            }
            None => return Ok(self.cancelled()),
        };
        info!(session = session.as_str(), "recording session created");

        self.phase.send_replace(RecordingPhase::Capturing);
        let interval = self.config.speed.frame_interval();
        if self.sleep_or_stop(interval * self.config.startup_spacing).await {
            return Ok(self.cancelled());
        }

        let len = sequence.len();
        let submits = Arc::new(Semaphore::new(self.config.max_in_flight.max(1)));
        let submit_failed = Arc::new(AtomicBool::new(false));

        for index in 0..len {
            if self.config.submit_failure == SubmitFailurePolicy::Abort
                && submit_failed.load(Ordering::Relaxed)
            {
                self.reset();
                return Err(RaceError::capture("frame submission failed, aborting session"));
            }
            let Some(frame) = sequence.frame(index) else {
                break;
            };
            sink.render(frame, interval);
            let svg = sink.snapshot_svg();
            let ordering = index as f64 + CAPTURE_PROGRESS;

            let permit = match self.guarded(Arc::clone(&submits).acquire_owned()).await {
                Some(Ok(permit)) => permit,
                Some(Err(_)) => {
                    self.reset();
                    return Err(RaceError::capture("submission queue closed"));
                }
                None => return Ok(self.cancelled()),
            };
            let service = Arc::clone(&self.service);
            let session = session.clone();
            let failed = Arc::clone(&submit_failed);
            // Fire-and-initiate: the loop's cadence stays timer-driven, the
            // permit bounds how many submissions can be in flight at once.
            tokio::spawn(async move {
                let _permit = permit;
                if let Err(error) = service.submit_frame(&session, ordering, svg).await {
                    warn!(ordering, %error, "frame submission failed");
                    failed.store(true, Ordering::Relaxed);
                }
            });

            self.percent
                .send_replace(Some(99.0 * (index + 1) as f64 / len as f64));
            if self.sleep_or_stop(interval * self.config.capture_spacing).await {
                return Ok(self.cancelled());
            }
        }

        self.phase.send_replace(RecordingPhase::Finalizing);
        if self.sleep_or_stop(self.config.settle_delay).await {
            return Ok(self.cancelled());
        }

        // The final frame is awaited before compiling, unlike the loop above.
        let final_svg = sink.snapshot_svg();
        match self
            .guarded(self.service.submit_frame(&session, len as f64 + 1.0, final_svg))
            .await
        {
            Some(Ok(())) => {}
            Some(Err(error)) => {
                warn!(%error, "final frame submission failed");
                self.reset();
                return Err(RaceError::finalize(error.to_string()));
            }
            None => return Ok(self.cancelled()),
        }

        // The compile call is the one long-running request; cancellation
        // aborts it by dropping the in-flight future.
        let file = match self
            .guarded(self.service.generate(&session, self.config.framerate))
            .await
        {
            Some(Ok(file)) => file,
            Some(Err(error)) => {
                warn!(%error, "video compilation failed");
                self.reset();
                return Err(error);
            }
            None => return Ok(self.cancelled()),
        };

        self.percent.send_replace(Some(100.0));
        info!(
            filename = %file.filename,
            bytes = file.bytes.len(),
            "recording compiled"
        );
        self.reset();
        Ok(RecordingOutcome::Completed(file))
    }

    fn reset(&self) {
        self.phase.send_replace(RecordingPhase::Idle);
        self.percent.send_replace(None);
    }

    fn cancelled(&self) -> RecordingOutcome {
        debug!("recording cancelled");
        self.reset();
        RecordingOutcome::Cancelled
    }

    /// Sleep for `duration`, returning true if a stop request arrived first.
    async fn sleep_or_stop(&self, duration: Duration) -> bool {
        let mut stop = self.stop.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            _ = stop.wait_for(|stopped| *stopped) => true,
        }
    }

    /// Await `future`, returning `None` if a stop request won the race.
    async fn guarded<T>(&self, future: impl Future<Output = T>) -> Option<T> {
        let mut stop = self.stop.subscribe();
        tokio::select! {
            value = future => Some(value),
            _ = stop.wait_for(|stopped| *stopped) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/controller.rs"]
mod tests;
