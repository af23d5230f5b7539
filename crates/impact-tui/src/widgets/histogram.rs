//! Index distribution as a vertical bar chart.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup};

use impact_core::HistogramBar;

use crate::theme;

const GAP: u16 = 1;
const MAX_BAR_WIDTH: u16 = 12;

/// Widest bar that fits `bars` bars (and their gaps) into `width`.
pub fn bar_width(bars: usize, width: u16) -> u16 {
    let Ok(n @ 1..) = u16::try_from(bars) else {
        return 1;
    };
    let gaps = GAP.saturating_mul(n - 1);
    (width.saturating_sub(gaps) / n).clamp(1, MAX_BAR_WIDTH)
}

/// Bars labelled by bucket range, annotated with the population share.
pub fn histogram(bars: &[HistogramBar], color: Color, width: u16) -> BarChart<'_> {
    let items: Vec<Bar> = bars
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.count)
                .label(Line::from(b.label.as_str()))
                .text_value(format!("{:.1}%", b.percentage))
        })
        .collect();

    BarChart::default()
        .data(BarGroup::default().bars(&items))
        .bar_width(bar_width(bars.len(), width))
        .bar_gap(GAP)
        .bar_style(Style::default().fg(color))
        .value_style(
            Style::default()
                .fg(theme::BG_DARK)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
        .label_style(theme::muted())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_share_the_width() {
        // 4 bars + 3 gaps in 40 cols
        assert_eq!(bar_width(4, 40), 9);
        assert_eq!(bar_width(2, 100), MAX_BAR_WIDTH);
        assert_eq!(bar_width(50, 20), 1);
        assert_eq!(bar_width(0, 20), 1);
    }
}
