use chrono::{DateTime, Utc};

use crate::dataset::model::{Dataset, Snapshot};
use crate::keyframes::rank::{ColorMap, Palette, RankedEntry, rank_entities};

/// One fully-specified, ranked snapshot of all entities at a real or
/// interpolated point in time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    /// Real or synthetic timestamp for this frame.
    pub timestamp: DateTime<Utc>,
    /// All entities ordered by descending value (not truncated to top-N).
    pub ranked: Vec<RankedEntry>,
}

impl Frame {
    /// Leader value, used as the x-axis domain maximum.
    pub fn top_value(&self) -> f64 {
        self.ranked.first().map(|e| e.value).unwrap_or(0.0)
    }
}

/// The complete animation timeline derived once from a dataset.
///
/// Immutable after construction; any dataset/title/speed/palette/time-unit
/// change rebuilds the whole sequence rather than patching it. The color
/// assignment is owned by the sequence so concurrent charts never share
/// mutable scale state.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    colors: ColorMap,
    max_rank: usize,
}

impl FrameSequence {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, if in range.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// All frames in timeline order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The color assignment fixed for this sequence.
    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    /// Rank cap used when building the sequence.
    pub fn max_rank(&self) -> usize {
        self.max_rank
    }
}

/// Build the interpolated, ranked frame sequence for a dataset.
///
/// Pure: no side effects, no IO. For `m` snapshots and `steps` interpolation
/// steps the output holds `(m - 1) * steps + 1` frames (`m == 1` yields a
/// single exact frame, `m == 0` an empty sequence). The first frame is the
/// first snapshot's exact ranked values; each consecutive snapshot pair
/// `(A, B)` contributes `steps - 1` linearly interpolated frames at
/// `t = i/steps` followed by the exact `B` frame. An entity missing from a
/// snapshot counts as 0 on the missing side only.
///
/// Snapshots are expected sorted ascending by timestamp; violations yield
/// time-inverted synthetic frames, not an error.
#[tracing::instrument(skip(dataset, palette), fields(snapshots = dataset.snapshots.len()))]
pub fn build(dataset: &Dataset, max_rank: usize, steps: usize, palette: &Palette) -> FrameSequence {
    let steps = steps.max(1);
    let colors = ColorMap::assign(&dataset.elements, palette);

    let mut frames = Vec::new();
    if let Some(first) = dataset.snapshots.first() {
        frames.reserve((dataset.snapshots.len() - 1) * steps + 1);
        frames.push(exact_frame(dataset, max_rank, first));

        for pair in dataset.snapshots.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            for i in 1..steps {
                let t = i as f64 / steps as f64;
                frames.push(Frame {
                    timestamp: lerp_timestamp(&a.timestamp, &b.timestamp, t),
                    ranked: rank_entities(&dataset.elements, max_rank, |name| {
                        let va = a.values.get(name).copied().unwrap_or(0.0);
                        let vb = b.values.get(name).copied().unwrap_or(0.0);
                        va * (1.0 - t) + vb * t
                    }),
                });
            }
            frames.push(exact_frame(dataset, max_rank, b));
        }
    }

    tracing::debug!(frames = frames.len(), "frame sequence built");
    FrameSequence {
        frames,
        colors,
        max_rank,
    }
}

fn exact_frame(dataset: &Dataset, max_rank: usize, snapshot: &Snapshot) -> Frame {
    Frame {
        timestamp: snapshot.timestamp,
        ranked: rank_entities(&dataset.elements, max_rank, |name| {
            snapshot.values.get(name).copied().unwrap_or(0.0)
        }),
    }
}

fn lerp_timestamp(a: &DateTime<Utc>, b: &DateTime<Utc>, t: f64) -> DateTime<Utc> {
    let ma = a.timestamp_millis() as f64;
    let mb = b.timestamp_millis() as f64;
    let ms = (ma * (1.0 - t) + mb * t).round() as i64;
    DateTime::from_timestamp_millis(ms).unwrap_or(*a)
}

#[cfg(test)]
#[path = "../../tests/unit/keyframes/builder.rs"]
mod tests;
