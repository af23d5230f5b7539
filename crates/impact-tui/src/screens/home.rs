//! Home screen: the supported-site list with a name filter and a detail
//! panel for the highlighted site.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Gauge, Paragraph, Row, Table, TableState, Wrap,
};

use impact_core::Site;
use impact_core::format::{percent, thousands};
use impact_core::view::box_plot;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::box_plot::BoxPlot;
use crate::widgets::stat_card::StatCard;

use super::{step, stat};

pub struct HomeScreen {
    focused: bool,
    sites: Arc<Vec<Arc<Site>>>,
    loaded: bool,
    filter: String,
    filtering: bool,
    table_state: TableState,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self {
            focused: true,
            sites: Arc::new(Vec::new()),
            loaded: false,
            filter: String::new(),
            filtering: false,
            table_state: TableState::default(),
        }
    }

    fn filtered(&self) -> Vec<&Arc<Site>> {
        self.sites
            .iter()
            .filter(|s| s.name_matches(&self.filter))
            .collect()
    }

    fn selected_site(&self) -> Option<Arc<Site>> {
        let idx = self.table_state.selected()?;
        self.filtered().get(idx).copied().cloned()
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.filtered().len();
        self.table_state
            .select(step(self.table_state.selected(), len, delta));
    }

    /// Select `name` if it is still listed, else the first row.
    fn reselect(&mut self, name: Option<&str>) {
        let rows = self.filtered();
        let idx = name
            .and_then(|n| rows.iter().position(|s| s.name == n))
            .or_else(|| (!rows.is_empty()).then_some(0));
        self.table_state.select(idx);
    }

    fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.reselect(None);
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.filtering = false;
                self.set_filter(String::new());
            }
            KeyCode::Enter => self.filtering = false,
            KeyCode::Backspace => {
                let mut filter = self.filter.clone();
                filter.pop();
                self.set_filter(filter);
            }
            KeyCode::Char(c) => {
                let mut filter = self.filter.clone();
                filter.push(c);
                self.set_filter(filter);
            }
            KeyCode::Down => self.move_selection(1),
            KeyCode::Up => self.move_selection(-1),
            _ => {}
        }
        None
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let rows = self.filtered();
        let title = if self.filter.is_empty() {
            format!(" Sites ({}) ", self.sites.len())
        } else {
            format!(" Sites ({}/{}) ", rows.len(), self.sites.len())
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(inner);

        let filter_line = if self.filtering || !self.filter.is_empty() {
            let cursor = if self.filtering { "▏" } else { "" };
            Line::from(vec![
                Span::styled(" / ", theme::key_hint_key()),
                Span::styled(format!("{}{cursor}", self.filter), theme::table_row()),
            ])
        } else {
            Line::from(Span::styled(" / filter sites", theme::muted()))
        };
        frame.render_widget(Paragraph::new(filter_line), layout[0]);

        if !self.loaded {
            frame.render_widget(
                Paragraph::new(Span::styled("  Loading sites…", theme::muted())),
                layout[1],
            );
            return;
        }
        if rows.is_empty() {
            let msg = if self.sites.is_empty() {
                "  No sites available.".to_owned()
            } else {
                format!("  No sites match '{}'", self.filter.trim())
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, theme::muted())), layout[1]);
            return;
        }

        let header = Row::new(
            ["Site", "Ranks", "Tracked", "Median"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let body: Vec<Row> = rows
            .iter()
            .map(|site| {
                let tracked = site
                    .coverage
                    .and_then(|c| c.ratio())
                    .map_or_else(|| "-".to_owned(), |r| percent(r * 100.0));
                Row::new(vec![
                    Cell::from(site.name.clone())
                        .style(Style::default().fg(theme::site_color(site.primary_color))),
                    Cell::from(format!("{} by {}", site.entity_name, site.metric_name)),
                    Cell::from(tracked),
                    Cell::from(stat(site.stats.median)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            body,
            [
                Constraint::Fill(2),
                Constraint::Fill(3),
                Constraint::Length(8),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[1], &mut state);
    }

    #[allow(clippy::unused_self)]
    fn render_detail(&self, frame: &mut Frame, area: Rect, site: &Site) {
        let color = theme::site_color(site.primary_color);
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", site.name),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(3),    // description
            Constraint::Length(1), // tracked gauge
            Constraint::Length(1),
            Constraint::Length(3), // stat cards
            Constraint::Length(2), // box plot
        ])
        .split(inner);

        let mut text = vec![Line::from(Span::styled(
            format!("{} ranked by {}", site.entity_name, site.metric_name),
            theme::title_style(),
        ))];
        if let Some(ref d) = site.description {
            text.push(Line::from(Span::styled(d.clone(), theme::table_row())));
        }
        if let Some(ref d) = site.index_description {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(d.clone(), theme::muted())));
        }
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), layout[0]);

        if let Some(coverage) = site.coverage {
            let ratio = coverage.ratio().unwrap_or(0.0);
            let gauge = Gauge::default()
                .ratio(ratio)
                .label(format!(
                    "{} / {} tracked",
                    thousands(coverage.current),
                    thousands(coverage.target)
                ))
                .gauge_style(Style::default().fg(color).bg(theme::BG_HIGHLIGHT));
            frame.render_widget(gauge, layout[1]);
        }

        if site.stats.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No statistics published yet.", theme::muted())),
                layout[3],
            );
            return;
        }

        let cards = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(layout[3]);
        frame.render_widget(StatCard::new("Mean", stat(site.stats.mean)), cards[0]);
        frame.render_widget(
            StatCard::new("Median", stat(site.stats.median)).color(color),
            cards[1],
        );
        frame.render_widget(StatCard::new("Std dev", stat(site.stats.std_dev)), cards[2]);

        if let Some(summary) = box_plot(&site.stats) {
            frame.render_widget(BoxPlot::new(&summary).color(color), layout[4]);
        }
    }
}

impl Component for HomeScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.filtering {
            return Ok(self.handle_filter_key(key));
        }
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.move_selection(isize::MIN);
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.move_selection(isize::MAX);
                None
            }
            KeyCode::Char('/') => {
                self.filtering = true;
                None
            }
            KeyCode::Enter => self.selected_site().map(|s| Action::OpenSite(s.name.clone())),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SitesUpdated(sites) = action {
            let previous = self.selected_site();
            self.sites = Arc::clone(sites);
            self.loaded = true;
            self.reselect(previous.as_deref().map(|s| s.name.as_str()));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
        self.render_list(frame, chunks[0]);
        if let Some(site) = self.selected_site() {
            self.render_detail(frame, chunks[1], &site);
        }
    }

    fn dismiss(&mut self) -> bool {
        if self.filter.is_empty() {
            return false;
        }
        self.set_filter(String::new());
        true
    }

    fn captures_input(&self) -> bool {
        self.filtering
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static str {
        if self.filtering {
            "type to filter  Enter done  Esc clear"
        } else {
            "j/k move  Enter open  / filter"
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use impact_core::SiteStats;

    use super::*;

    fn site(name: &str) -> Arc<Site> {
        Arc::new(Site {
            name: name.into(),
            description: None,
            index_description: None,
            entity_name: "User".into(),
            metric_name: "upvotes".into(),
            primary_color: None,
            secondary_color: None,
            coverage: None,
            stats: SiteStats::default(),
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> HomeScreen {
        let mut home = HomeScreen::new();
        let sites = Arc::new(vec![site("reddit"), site("youtube"), site("github")]);
        home.update(&Action::SitesUpdated(sites)).unwrap();
        home
    }

    #[test]
    fn enter_opens_the_selected_site() {
        let mut home = screen();
        home.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        let action = home.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::OpenSite(ref name)) if name == "youtube"));
    }

    #[test]
    fn filter_narrows_and_escape_clears() {
        let mut home = screen();
        home.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        assert!(home.captures_input());
        for c in "TUB".chars() {
            home.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(home.filtered().len(), 1);
        assert_eq!(home.selected_site().unwrap().name, "youtube");

        home.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!home.captures_input());
        assert_eq!(home.filtered().len(), 3);
    }

    #[test]
    fn kept_filter_is_dismissed_before_navigation() {
        let mut home = screen();
        assert!(!home.dismiss());
        home.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        home.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        home.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(!home.captures_input());
        assert_eq!(home.filtered().len(), 1);

        assert!(home.dismiss());
        assert_eq!(home.filtered().len(), 3);
        assert!(!home.dismiss());
    }

    #[test]
    fn refresh_keeps_the_selected_site() {
        let mut home = screen();
        home.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(home.selected_site().unwrap().name, "github");

        let reordered = Arc::new(vec![site("github"), site("reddit")]);
        home.update(&Action::SitesUpdated(reordered)).unwrap();
        assert_eq!(home.table_state.selected(), Some(0));
        assert_eq!(home.selected_site().unwrap().name, "github");
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut home = HomeScreen::new();
        home.update(&Action::SitesUpdated(Arc::new(Vec::new())))
            .unwrap();
        assert!(home.selected_site().is_none());
        assert!(home.handle_key_event(key(KeyCode::Enter)).unwrap().is_none());
    }
}
