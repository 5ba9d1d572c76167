use super::*;
use crate::dataset::model::{Dataset, Element, Snapshot};
use crate::keyframes::builder::{Frame, build};
use crate::keyframes::rank::Palette;

#[derive(Default)]
struct TestSink {
    renders: Vec<(f64, Duration)>,
}

impl FrameSink for TestSink {
    fn render(&mut self, frame: &Frame, transition: Duration) {
        self.renders.push((frame.top_value(), transition));
    }

    fn snapshot_svg(&self) -> String {
        format!("<svg>{}</svg>", self.renders.len())
    }
}

fn snapshot(date: &str, value: f64) -> Snapshot {
    Snapshot {
        timestamp: crate::dataset::model::parse_date(date).unwrap(),
        values: [("a".to_string(), value)].into_iter().collect(),
    }
}

/// 11 frames; frame i has value i.
fn sequence() -> Arc<FrameSequence> {
    let ds = Dataset::new(
        vec![Element::new("a")],
        vec![snapshot("2000-01-01", 0.0), snapshot("2010-01-01", 10.0)],
    );
    Arc::new(build(&ds, 12, 10, &Palette::default()))
}

fn controller() -> PlaybackController {
    PlaybackController::new(sequence(), Speed::new(10.0).unwrap())
}

#[test]
fn starts_idle_at_frame_zero() {
    let pc = controller();
    assert_eq!(pc.state(), PlaybackState::Idle);
    assert_eq!(pc.current_index(), 0);
    assert_eq!(pc.frame_interval(), Duration::from_millis(100));
}

#[test]
fn first_tick_after_play_advances_immediately() {
    let mut pc = controller();
    let mut sink = TestSink::default();
    pc.play();
    assert_eq!(pc.state(), PlaybackState::Playing);
    assert_eq!(pc.tick(Instant::now(), &mut sink), Some(1));
    assert_eq!(sink.renders.last().unwrap().0, 1.0);
    // Transition duration matches the speed-derived interval.
    assert_eq!(sink.renders.last().unwrap().1, Duration::from_millis(100));
}

#[test]
fn tick_respects_the_interval() {
    let mut pc = controller();
    let mut sink = TestSink::default();
    pc.play();
    let t0 = Instant::now();
    assert_eq!(pc.tick(t0, &mut sink), Some(1));
    // Too early: no advance.
    assert_eq!(pc.tick(t0 + Duration::from_millis(50), &mut sink), None);
    assert_eq!(pc.tick(t0 + Duration::from_millis(100), &mut sink), Some(2));
}

#[test]
fn reaching_the_final_frame_goes_idle() {
    let mut pc = controller();
    let mut sink = TestSink::default();
    pc.play();
    let mut now = Instant::now();
    for _ in 0..20 {
        pc.tick(now, &mut sink);
        now += Duration::from_millis(100);
    }
    assert_eq!(pc.current_index(), 10);
    assert!(pc.at_end());
    assert_eq!(pc.state(), PlaybackState::Idle);
    // Cannot resume past the end.
    pc.play();
    assert_eq!(pc.state(), PlaybackState::Idle);
}

#[test]
fn pause_rerenders_with_the_settle_transition() {
    let mut pc = controller();
    let mut sink = TestSink::default();
    pc.play();
    pc.tick(Instant::now(), &mut sink);
    pc.pause(&mut sink);
    assert_eq!(pc.state(), PlaybackState::Paused);
    let last = sink.renders.last().unwrap();
    assert_eq!(last.0, 1.0); // committed frame re-rendered
    assert_eq!(last.1, SETTLE_TRANSITION);
}

#[test]
fn pause_when_not_playing_is_a_noop() {
    let mut pc = controller();
    let mut sink = TestSink::default();
    pc.pause(&mut sink);
    assert!(sink.renders.is_empty());
    assert_eq!(pc.state(), PlaybackState::Idle);
}

#[test]
fn scrub_is_idempotent_and_stops_playback() {
    let mut pc = controller();
    let mut sink = TestSink::default();
    pc.play();
    pc.scrub_to(4, &mut sink);
    assert_eq!(pc.state(), PlaybackState::Paused);
    assert_eq!(pc.current_index(), 4);
    pc.scrub_to(4, &mut sink);
    let last_two: Vec<_> = sink.renders.iter().rev().take(2).collect();
    assert_eq!(last_two[0], last_two[1]);
    assert_eq!(last_two[0].1, SETTLE_TRANSITION);
}

#[test]
fn scrub_out_of_range_is_a_noop() {
    let mut pc = controller();
    let mut sink = TestSink::default();
    pc.scrub_to(99, &mut sink);
    assert!(sink.renders.is_empty());
    assert_eq!(pc.current_index(), 0);
}

#[test]
fn scrub_back_from_the_end_allows_replay() {
    let mut pc = controller();
    let mut sink = TestSink::default();
    pc.scrub_to(10, &mut sink);
    assert_eq!(pc.state(), PlaybackState::Idle);
    pc.play();
    assert_eq!(pc.state(), PlaybackState::Idle); // still at end

    pc.scrub_to(0, &mut sink);
    pc.play();
    assert_eq!(pc.state(), PlaybackState::Playing);
}

#[test]
fn rebind_resets_to_idle_at_zero() {
    let mut pc = controller();
    let mut sink = TestSink::default();
    pc.play();
    pc.tick(Instant::now(), &mut sink);
    assert_eq!(pc.current_index(), 1);

    pc.rebind(sequence(), Speed::new(5.0).unwrap());
    assert_eq!(pc.state(), PlaybackState::Idle);
    assert_eq!(pc.current_index(), 0);
    assert_eq!(pc.frame_interval(), Duration::from_millis(200));
}

#[test]
fn empty_sequence_never_plays() {
    let ds = Dataset::default();
    let seq = Arc::new(build(&ds, 12, 10, &Palette::default()));
    let mut pc = PlaybackController::new(seq, Speed::default());
    let mut sink = TestSink::default();
    pc.play();
    assert_eq!(pc.state(), PlaybackState::Idle);
    assert_eq!(pc.tick(Instant::now(), &mut sink), None);
}
