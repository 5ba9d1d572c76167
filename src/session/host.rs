use std::sync::Arc;

use crate::dataset::model::{Dataset, RacePayload};
use crate::foundation::core::{DEFAULT_INTERPOLATION_STEPS, DEFAULT_MAX_RANK, Speed, TimeUnit};
use crate::foundation::error::RaceResult;
use crate::keyframes::builder::{FrameSequence, build};
use crate::keyframes::rank::Palette;
use crate::playback::controller::PlaybackController;
use crate::record::controller::RecordingConfig;
use crate::render::svg::SvgBarChart;

/// Chart-level configuration. Changing any field rebuilds the frame sequence
/// wholesale and resets playback.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RaceOptions {
    /// Chart title.
    pub title: String,
    /// Playback speed in source ticks per second.
    pub speed: Speed,
    /// Bar color palette.
    pub palette: Palette,
    /// Sampling granularity (also drives ticker formatting).
    pub time_unit: TimeUnit,
    /// Visible bar slots / rank cap.
    pub max_rank: usize,
    /// Interpolated frames per snapshot pair.
    pub steps: usize,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            speed: Speed::default(),
            palette: Palette::default(),
            time_unit: TimeUnit::default(),
            max_rank: DEFAULT_MAX_RANK,
            steps: DEFAULT_INTERPOLATION_STEPS,
        }
    }
}

/// Owner of one chart's animation state.
///
/// Holds the dataset, the immutable built [`FrameSequence`] shared by both
/// controllers, and the playback controller. Recording and playback are
/// mutually exclusive consumers of the rendering surface:
/// [`ChartSession::begin_recording`] forces playback idle before handing out
/// the sequence, so the recorder's first render never races a pending
/// playback advance.
#[derive(Clone, Debug)]
pub struct ChartSession {
    options: RaceOptions,
    dataset: Dataset,
    sequence: Arc<FrameSequence>,
    playback: PlaybackController,
}

impl ChartSession {
    /// Build a session from an already-selected dataset.
    pub fn new(dataset: Dataset, options: RaceOptions) -> Self {
        let sequence = Arc::new(build(
            &dataset,
            options.max_rank,
            options.steps,
            &options.palette,
        ));
        let playback = PlaybackController::new(Arc::clone(&sequence), options.speed);
        Self {
            options,
            dataset,
            sequence,
            playback,
        }
    }

    /// Build a session from the external payload, selecting the granularity
    /// named by `options.time_unit`.
    pub fn from_payload(payload: &RacePayload, options: RaceOptions) -> RaceResult<Self> {
        let dataset = payload.dataset(options.time_unit)?;
        Ok(Self::new(dataset, options))
    }

    /// Current options.
    pub fn options(&self) -> &RaceOptions {
        &self.options
    }

    /// The dataset behind the current sequence.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The shared immutable frame sequence.
    pub fn sequence(&self) -> &Arc<FrameSequence> {
        &self.sequence
    }

    /// Mutable access to playback controls.
    pub fn playback(&mut self) -> &mut PlaybackController {
        &mut self.playback
    }

    /// Read-only access to playback state.
    pub fn playback_ref(&self) -> &PlaybackController {
        &self.playback
    }

    /// Replace the options, rebuilding the sequence and resetting playback
    /// to idle at frame 0.
    pub fn set_options(&mut self, options: RaceOptions) {
        self.options = options;
        self.rebuild();
    }

    /// Replace the dataset, rebuilding the sequence and resetting playback.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.rebuild();
    }

    /// A recording configuration paced to this session's speed.
    pub fn recording_config(&self) -> RecordingConfig {
        RecordingConfig::new(self.options.speed)
    }

    /// An SVG surface configured for this session's sequence.
    pub fn sink(&self, width: f64) -> SvgBarChart {
        SvgBarChart::new(
            width,
            self.options.title.clone(),
            self.options.time_unit,
            self.sequence.colors().clone(),
            self.options.max_rank,
        )
    }

    /// Enter recording mode: force playback idle and hand out the sequence
    /// for the recording controller to walk.
    pub fn begin_recording(&mut self) -> Arc<FrameSequence> {
        self.playback.force_idle();
        Arc::clone(&self.sequence)
    }

    fn rebuild(&mut self) {
        self.sequence = Arc::new(build(
            &self.dataset,
            self.options.max_rank,
            self.options.steps,
            &self.options.palette,
        ));
        self.playback
            .rebind(Arc::clone(&self.sequence), self.options.speed);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/host.rs"]
mod tests;
