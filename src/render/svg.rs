use std::fmt::Write as _;
use std::time::Duration;

use crate::foundation::core::TimeUnit;
use crate::keyframes::builder::Frame;
use crate::keyframes::rank::ColorMap;
use crate::render::sink::FrameSink;

const MARGIN_TOP: f64 = 32.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 32.0;
const MARGIN_LEFT: f64 = 0.0;
const BAR_SIZE: f64 = 48.0;
const TITLE_SPACE: f64 = 30.0;
// scaleBand-style slot padding.
const SLOT_PAD: f64 = 0.1;

/// A [`FrameSink`] that lays the ranked frame out as standalone SVG markup.
///
/// This is the visual state serialized during recording. Geometry follows the
/// classic bar-chart-race layout: top-N horizontal bars in rank slots, value
/// labels at the bar ends, and a large date ticker in the lower right.
/// Transitions are the consumer's concern (the downstream compiler spaces
/// frames in time), so `render` commits the end state of each transition.
#[derive(Clone, Debug)]
pub struct SvgBarChart {
    width: f64,
    title: String,
    time_unit: TimeUnit,
    colors: ColorMap,
    max_rank: usize,
    last: String,
}

impl SvgBarChart {
    /// Create a chart surface of `width` CSS pixels.
    pub fn new(
        width: f64,
        title: impl Into<String>,
        time_unit: TimeUnit,
        colors: ColorMap,
        max_rank: usize,
    ) -> Self {
        Self {
            width,
            title: title.into(),
            time_unit,
            colors,
            max_rank,
            last: String::new(),
        }
    }

    fn x(&self, value: f64, top_value: f64) -> f64 {
        let span = self.width - MARGIN_LEFT - MARGIN_RIGHT;
        let domain = if top_value > 0.0 { top_value } else { 1.0 };
        MARGIN_LEFT + span * (value / domain)
    }

    fn y(&self, rank: usize) -> f64 {
        MARGIN_TOP + BAR_SIZE * (1.0 + SLOT_PAD) * rank as f64
    }

    fn height(&self) -> f64 {
        MARGIN_TOP + BAR_SIZE * (1.0 + SLOT_PAD) * (self.max_rank as f64 + 1.0) + MARGIN_BOTTOM
    }

    fn draw(&self, frame: &Frame) -> String {
        let height = self.height();
        let top_value = frame.top_value();
        let mut svg = String::new();

        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 {} {} {}\">",
            -TITLE_SPACE,
            self.width,
            height + TITLE_SPACE,
        );
        if !self.title.is_empty() {
            let _ = write!(
                svg,
                "<text x=\"{:.1}\" y=\"-11\" text-anchor=\"middle\" \
                 font-size=\"24px\" font-weight=\"bold\">{}</text>",
                self.width / 2.0,
                escape_xml(&self.title),
            );
        }

        svg.push_str("<g fill-opacity=\"0.6\">");
        for entry in frame.ranked.iter().take(self.max_rank) {
            let color = self.colors.color_of(&entry.name).unwrap_or("#999999");
            let _ = write!(
                svg,
                "<rect fill=\"{}\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\"/>",
                escape_xml(color),
                self.x(0.0, top_value),
                self.y(entry.rank),
                self.x(entry.value, top_value) - self.x(0.0, top_value),
                BAR_SIZE,
            );
        }
        svg.push_str("</g>");

        svg.push_str("<g font-size=\"12px\" font-weight=\"bold\" text-anchor=\"end\">");
        for entry in frame.ranked.iter().take(self.max_rank) {
            let bar_end = self.x(entry.value, top_value);
            let mid = self.y(entry.rank) + BAR_SIZE / 2.0;
            let _ = write!(
                svg,
                "<text x=\"{:.1}\" y=\"{:.1}\">{}\
                 <tspan x=\"{:.1}\" dy=\"1.15em\" fill-opacity=\"0.7\" \
                 font-weight=\"normal\">{:.0}</tspan></text>",
                bar_end - 6.0,
                mid - 4.0,
                escape_xml(&entry.name),
                bar_end - 6.0,
                entry.value,
            );
        }
        svg.push_str("</g>");

        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-weight=\"bold\" \
             font-size=\"{:.0}px\">{}</text>",
            self.width - 6.0,
            MARGIN_TOP + BAR_SIZE * (self.max_rank as f64 - 0.45),
            BAR_SIZE,
            self.time_unit.format_timestamp(&frame.timestamp),
        );
        svg.push_str("</svg>");
        svg
    }
}

impl FrameSink for SvgBarChart {
    fn render(&mut self, frame: &Frame, _transition: Duration) {
        self.last = self.draw(frame);
    }

    fn snapshot_svg(&self) -> String {
        self.last.clone()
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
