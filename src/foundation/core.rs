use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};

use crate::foundation::error::{RaceError, RaceResult};

/// Default number of visible bar slots (and rank cap).
pub const DEFAULT_MAX_RANK: usize = 12;

/// Default number of interpolated frames per snapshot pair.
pub const DEFAULT_INTERPOLATION_STEPS: usize = 10;

/// Fixed short transition used for pause/scrub re-renders, independent of
/// playback speed.
pub const SETTLE_TRANSITION: Duration = Duration::from_millis(250);

/// Playback speed in source-time ticks per second.
///
/// One tick is one frame of the built sequence, so a speed of 10 with the
/// default interpolation step count advances one real snapshot per second.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Speed(f64);

impl Speed {
    /// Create a speed; must be finite and > 0.
    pub fn new(ticks_per_sec: f64) -> RaceResult<Self> {
        if !ticks_per_sec.is_finite() || ticks_per_sec <= 0.0 {
            return Err(RaceError::validation("speed must be finite and > 0"));
        }
        Ok(Self(ticks_per_sec))
    }

    /// Speed as ticks per second.
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Duration of one frame advance at this speed (`1000/speed` ms).
    pub fn frame_interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(10.0)
    }
}

/// Sampling granularity of the source time series.
///
/// Selection happens at payload ingestion; the keyframe builder only ever
/// sees one chosen snapshot sequence. The unit also drives how a frame's
/// timestamp is shown on the chart ticker.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Yearly snapshots; ticker shows `2005`.
    #[default]
    Year,
    /// Monthly snapshots; ticker shows `2005-03`.
    Month,
    /// Daily snapshots; ticker shows `2005-03-17`.
    Day,
}

impl TimeUnit {
    /// Format a frame timestamp for ticker display at this granularity.
    pub fn format_timestamp(self, ts: &DateTime<Utc>) -> String {
        match self {
            Self::Year => format!("{:04}", ts.year()),
            Self::Month => format!("{:04}-{:02}", ts.year(), ts.month()),
            Self::Day => format!("{:04}-{:02}-{:02}", ts.year(), ts.month(), ts.day()),
        }
    }
}
