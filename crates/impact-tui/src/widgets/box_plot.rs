//! One-line horizontal box plot with an optional value marker.
//!
//! ```text
//! ├────████┃██████──────────┤
//! 0        12               88
//! ```

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use impact_core::BoxPlotSummary;

use crate::theme;

/// Columns of the five summary values inside a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxColumns {
    pub min: u16,
    pub q1: u16,
    pub median: u16,
    pub q3: u16,
    pub max: u16,
}

impl BoxColumns {
    pub fn layout(summary: &BoxPlotSummary, width: u16) -> Self {
        let at = |v| position(v, summary.min, summary.max, width);
        Self {
            min: at(summary.min),
            q1: at(summary.first_quartile),
            median: at(summary.median),
            q3: at(summary.third_quartile),
            max: at(summary.max),
        }
    }
}

/// Column of `value` on a `lo..=hi` scale drawn `width` cells wide.
/// Out-of-range values are clamped; a zero span puts everything mid-way.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn position(value: f64, lo: f64, hi: f64, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let last = f64::from(width - 1);
    let span = hi - lo;
    let t = if span > 0.0 {
        ((value - lo) / span).clamp(0.0, 1.0)
    } else {
        0.5
    };
    (t * last).round() as u16
}

/// The glyph row for `cols`, `width` characters long.
pub fn glyphs(cols: BoxColumns, width: u16, marker: Option<u16>) -> String {
    (0..width)
        .map(|x| {
            if marker == Some(x) {
                '◆'
            } else if x == cols.median {
                '┃'
            } else if x == cols.min {
                '├'
            } else if x == cols.max {
                '┤'
            } else if (cols.q1..=cols.q3).contains(&x) {
                '█'
            } else if x > cols.min && x < cols.max {
                '─'
            } else {
                ' '
            }
        })
        .collect()
}

pub struct BoxPlot<'a> {
    summary: &'a BoxPlotSummary,
    color: Color,
    marker: Option<f64>,
}

impl<'a> BoxPlot<'a> {
    pub fn new(summary: &'a BoxPlotSummary) -> Self {
        Self {
            summary,
            color: theme::ACCENT,
            marker: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Highlight one value on the scale (an entity's own index).
    pub fn marker(mut self, value: f64) -> Self {
        self.marker = Some(value);
        self
    }

    fn label_row(&self, cols: BoxColumns, width: u16) -> String {
        let mut row = vec![' '; usize::from(width)];
        let mut place = |col: u16, text: String| {
            let len = text.chars().count();
            let start = usize::from(col)
                .saturating_sub(len / 2)
                .min(row.len().saturating_sub(len));
            for (slot, ch) in row.iter_mut().skip(start).zip(text.chars()) {
                *slot = ch;
            }
        };
        place(cols.min, format!("{:.0}", self.summary.min));
        place(cols.max, format!("{:.0}", self.summary.max));
        place(cols.median, format!("{:.0}", self.summary.median));
        row.into_iter().collect()
    }
}

impl Widget for BoxPlot<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let cols = BoxColumns::layout(self.summary, area.width);
        let marker = self
            .marker
            .map(|v| position(v, self.summary.min, self.summary.max, area.width));

        let spans: Vec<Span> = glyphs(cols, area.width, marker)
            .chars()
            .map(|ch| {
                let style = match ch {
                    '█' | '┃' => Style::default().fg(self.color),
                    '◆' => Style::default().fg(theme::CORAL),
                    _ => theme::muted(),
                };
                Span::styled(ch.to_string(), style)
            })
            .collect();
        Line::from(spans).render(Rect { height: 1, ..area }, buf);

        if area.height > 1 {
            let labels = self.label_row(cols, area.width);
            Line::styled(labels, Style::default().fg(theme::DIM_WHITE)).render(
                Rect {
                    y: area.y + 1,
                    height: 1,
                    ..area
                },
                buf,
            );
        }
    }
}
