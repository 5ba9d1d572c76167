use super::*;
use crate::dataset::model::Element;
use crate::keyframes::rank::{Palette, rank_entities};

fn frame(values: &[(&str, f64)]) -> Frame {
    let elements: Vec<Element> = values.iter().map(|(n, _)| Element::new(*n)).collect();
    Frame {
        timestamp: crate::dataset::model::parse_date("2005-03-17").unwrap(),
        ranked: rank_entities(&elements, 12, |name| {
            values.iter().find(|(n, _)| *n == name).unwrap().1
        }),
    }
}

fn chart(values: &[(&str, f64)]) -> SvgBarChart {
    let elements: Vec<Element> = values.iter().map(|(n, _)| Element::new(*n)).collect();
    let colors = ColorMap::assign(&elements, &Palette::tableau10());
    SvgBarChart::new(960.0, "Test & Title", TimeUnit::Year, colors, 12)
}

#[test]
fn snapshot_is_empty_before_first_render() {
    let chart = chart(&[("a", 1.0)]);
    assert_eq!(chart.snapshot_svg(), "");
}

#[test]
fn renders_bars_labels_and_ticker() {
    let values = [("alpha", 30.0), ("beta", 10.0)];
    let mut chart = chart(&values);
    chart.render(&frame(&values), Duration::from_millis(100));
    let svg = chart.snapshot_svg();

    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches("<rect").count(), 2);
    assert!(svg.contains("alpha"));
    assert!(svg.contains("beta"));
    assert!(svg.contains(">2005<")); // year ticker
    assert!(svg.contains("Test &amp; Title")); // escaped title
}

#[test]
fn only_top_max_rank_bars_are_drawn() {
    let values: Vec<(String, f64)> = (0..20)
        .map(|i| (format!("e{i}"), (20 - i) as f64))
        .collect();
    let borrowed: Vec<(&str, f64)> = values.iter().map(|(n, v)| (n.as_str(), *v)).collect();
    let mut chart = chart(&borrowed);
    chart.render(&frame(&borrowed), Duration::from_millis(100));
    assert_eq!(chart.snapshot_svg().matches("<rect").count(), 12);
}

#[test]
fn leader_bar_spans_the_plot_width() {
    let values = [("a", 50.0), ("b", 25.0)];
    let mut chart = chart(&values);
    chart.render(&frame(&values), Duration::from_millis(100));
    let svg = chart.snapshot_svg();
    // Leader width is the full span (960 - 16 right margin); runner-up half.
    assert!(svg.contains("width=\"944.0\""));
    assert!(svg.contains("width=\"472.0\""));
}

#[test]
fn rerender_replaces_snapshot() {
    let values = [("a", 1.0)];
    let mut chart = chart(&values);
    chart.render(&frame(&values), Duration::from_millis(100));
    let first = chart.snapshot_svg();
    chart.render(&frame(&[("a", 2.0)]), Duration::from_millis(100));
    assert_ne!(chart.snapshot_svg(), first);
}
