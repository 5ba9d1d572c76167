use std::time::Duration;

use crate::keyframes::builder::Frame;

/// The single render/update contract shared by playback and recording.
///
/// Both controllers drive the same visual surface through this seam; they
/// differ only in pacing and failure semantics. The surface is exclusively
/// owned by whichever controller is active, so implementations need no
/// internal locking.
pub trait FrameSink {
    /// Commit `frame` to the surface over `transition`.
    ///
    /// Playback passes its speed-derived interval (or the fixed settle
    /// duration for pause/scrub); recording passes the same speed-derived
    /// interval so captured motion matches what playback shows.
    fn render(&mut self, frame: &Frame, transition: Duration);

    /// Serialize the currently committed visual state as SVG markup.
    ///
    /// Recording submits this string to the frame-compilation service.
    fn snapshot_svg(&self) -> String;
}
