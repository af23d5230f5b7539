//! A small bordered card: label in the border, value centered and bold.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use crate::theme;

pub struct StatCard<'a> {
    label: &'a str,
    value: String,
    color: Color,
}

impl<'a> StatCard<'a> {
    pub fn new(label: &'a str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            color: theme::CYAN,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Widget for StatCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(theme::muted())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.value)
            .alignment(Alignment::Center)
            .style(Style::default().fg(self.color).add_modifier(Modifier::BOLD))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_label_and_value() {
        let area = Rect::new(0, 0, 16, 3);
        let mut buf = Buffer::empty(area);
        StatCard::new("Index", "1,234").render(area, &mut buf);

        let top: String = (0..16u16).map(|x| buf[(x, 0u16)].symbol()).collect();
        let middle: String = (0..16u16).map(|x| buf[(x, 1u16)].symbol()).collect();
        assert!(top.contains("Index"));
        assert!(middle.contains("1,234"));
    }
}
