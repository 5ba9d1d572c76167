use super::*;
use crate::dataset::model::Element;

fn ts(date: &str) -> DateTime<Utc> {
    crate::dataset::model::parse_date(date).unwrap()
}

fn snapshot(date: &str, pairs: &[(&str, f64)]) -> Snapshot {
    Snapshot {
        timestamp: ts(date),
        values: pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
    }
}

fn single_entity_dataset() -> Dataset {
    Dataset::new(
        vec![Element::new("a")],
        vec![
            snapshot("2000-01-01", &[("a", 10.0)]),
            snapshot("2010-01-01", &[("a", 20.0)]),
        ],
    )
}

#[test]
fn length_contract() {
    // (m - 1) * steps + 1 for m >= 2.
    let ds = Dataset::new(
        vec![Element::new("a")],
        vec![
            snapshot("2000-01-01", &[("a", 1.0)]),
            snapshot("2001-01-01", &[("a", 2.0)]),
            snapshot("2002-01-01", &[("a", 3.0)]),
            snapshot("2003-01-01", &[("a", 4.0)]),
        ],
    );
    for steps in [1, 2, 10] {
        let seq = build(&ds, 12, steps, &Palette::default());
        assert_eq!(seq.len(), 3 * steps + 1);
    }
}

#[test]
fn degenerate_inputs() {
    let empty = Dataset::default();
    assert_eq!(build(&empty, 12, 10, &Palette::default()).len(), 0);

    let single = Dataset::new(
        vec![Element::new("a")],
        vec![snapshot("2000-01-01", &[("a", 5.0)])],
    );
    let seq = build(&single, 12, 10, &Palette::default());
    assert_eq!(seq.len(), 1);
    assert_eq!(seq.frame(0).unwrap().ranked[0].value, 5.0);
}

#[test]
fn midpoint_interpolation_is_linear() {
    // Years 2000 (10) and 2010 (20), k = 10: 11 frames, midpoint value 15.
    let seq = build(&single_entity_dataset(), 12, 10, &Palette::default());
    assert_eq!(seq.len(), 11);
    assert_eq!(seq.frame(0).unwrap().ranked[0].value, 10.0);
    assert_eq!(seq.frame(5).unwrap().ranked[0].value, 15.0);
    assert_eq!(seq.frame(10).unwrap().ranked[0].value, 20.0);
}

#[test]
fn synthetic_timestamps_interpolate_between_snapshots() {
    let seq = build(&single_entity_dataset(), 12, 10, &Palette::default());
    let first = seq.frame(0).unwrap().timestamp;
    let mid = seq.frame(5).unwrap().timestamp;
    let last = seq.frame(10).unwrap().timestamp;
    assert_eq!(first, ts("2000-01-01"));
    assert_eq!(last, ts("2010-01-01"));
    assert!(first < mid && mid < last);
}

#[test]
fn boundary_frames_are_exact_not_duplicated() {
    let ds = Dataset::new(
        vec![Element::new("a")],
        vec![
            snapshot("2000-01-01", &[("a", 0.0)]),
            snapshot("2001-01-01", &[("a", 10.0)]),
            snapshot("2002-01-01", &[("a", 30.0)]),
        ],
    );
    let seq = build(&ds, 12, 5, &Palette::default());
    assert_eq!(seq.len(), 11);
    // Snapshot values land exactly once, at indices 0, 5, 10.
    assert_eq!(seq.frame(5).unwrap().ranked[0].value, 10.0);
    assert_eq!(seq.frame(6).unwrap().ranked[0].value, 14.0);
    assert_eq!(seq.frame(10).unwrap().ranked[0].value, 30.0);
}

#[test]
fn missing_entity_interpolates_from_zero() {
    let ds = Dataset::new(
        vec![Element::new("a"), Element::new("b")],
        vec![
            snapshot("2000-01-01", &[("a", 10.0)]),
            snapshot("2001-01-01", &[("a", 10.0), ("b", 8.0)]),
        ],
    );
    let seq = build(&ds, 12, 4, &Palette::default());
    let mid = seq.frame(2).unwrap();
    let b = mid.ranked.iter().find(|e| e.name == "b").unwrap();
    assert_eq!(b.value, 4.0);
}

#[test]
fn every_frame_contains_every_element() {
    let ds = Dataset::new(
        vec![Element::new("a"), Element::new("b"), Element::new("c")],
        vec![
            snapshot("2000-01-01", &[("a", 1.0)]),
            snapshot("2001-01-01", &[("b", 2.0)]),
        ],
    );
    let seq = build(&ds, 1, 6, &Palette::default());
    for frame in seq.frames() {
        let mut names: Vec<&str> = frame.ranked.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}

#[test]
fn ranks_are_monotone_in_value_within_a_frame() {
    let ds = Dataset::new(
        vec![Element::new("a"), Element::new("b"), Element::new("c")],
        vec![
            snapshot("2000-01-01", &[("a", 3.0), ("b", 2.0), ("c", 1.0)]),
            snapshot("2001-01-01", &[("a", 1.0), ("b", 2.0), ("c", 3.0)]),
        ],
    );
    let seq = build(&ds, 12, 10, &Palette::default());
    for frame in seq.frames() {
        for pair in frame.ranked.windows(2) {
            assert!(pair[0].value >= pair[1].value);
            assert!(pair[0].rank <= pair[1].rank);
        }
    }
}

#[test]
fn sequence_carries_its_color_assignment() {
    let ds = Dataset::new(
        vec![Element::new("a"), Element::new("b")],
        vec![
            snapshot("2000-01-01", &[("a", 1.0), ("b", 2.0)]),
            snapshot("2001-01-01", &[("a", 2.0), ("b", 1.0)]),
        ],
    );
    let seq = build(&ds, 12, 10, &Palette::default());
    assert!(seq.colors().color_of("a").is_some());
    assert_ne!(seq.colors().color_of("a"), seq.colors().color_of("b"));
    assert_eq!(seq.max_rank(), 12);
}
