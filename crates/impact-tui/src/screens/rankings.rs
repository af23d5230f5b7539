//! Rankings screen: one site's leaderboard.
//!
//! Header and distribution charts on top, a search bar that filters the
//! loaded page while suggesting identifiers from the backend, and a sortable
//! paginated table. Resting on a row opens a preview of the entity's
//! profile link when previews are enabled.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use impact_core::format::{age, thousands};
use impact_core::view::{box_plot, histogram_bars, preview_url};
use impact_core::{
    BackendConfig, Debouncer, RankedEntity, RankingView, Site, SortKey, Suggestion, Theme,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::box_plot::BoxPlot;
use crate::widgets::histogram::histogram;
use crate::widgets::stat_card::StatCard;

use super::{stat, step};

/// Typed query plus the suggestions returned for it.
#[derive(Debug, Default)]
struct SearchBar {
    input: String,
    active: bool,
    suggestions: Vec<Suggestion>,
    /// `None` submits the literal term.
    selected: Option<usize>,
}

impl SearchBar {
    fn query(&self) -> &str {
        self.input.trim()
    }

    /// Identifier that Enter would open.
    fn target(&self) -> Option<String> {
        match self.selected.and_then(|i| self.suggestions.get(i)) {
            Some(s) => Some(s.identifier.clone()),
            None => (!self.query().is_empty()).then(|| self.query().to_owned()),
        }
    }

    fn move_selection(&mut self, down: bool) {
        self.selected = match (self.selected, down) {
            (None, true) if !self.suggestions.is_empty() => Some(0),
            (Some(i), true) => Some((i + 1).min(self.suggestions.len().saturating_sub(1))),
            (Some(0), false) | (None, _) => None,
            (Some(i), false) => Some(i - 1),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Preview {
    identifier: String,
    url: String,
}

pub struct RankingsScreen {
    focused: bool,
    per_page: u32,
    search_delay: Duration,
    preview_delay: Duration,
    preview_theme: Theme,

    sites: Arc<Vec<Arc<Site>>>,
    sites_loaded: bool,
    /// Requested site name, kept for the not-found message.
    site_name: Option<String>,
    site: Option<Arc<Site>>,
    view: Option<RankingView>,
    table_state: TableState,
    throbber: ThrobberState,

    search: SearchBar,
    search_debouncer: Option<Debouncer<Action>>,

    preview_enabled: bool,
    preview: Option<Preview>,
    preview_debouncer: Option<Debouncer<Action>>,
}

impl RankingsScreen {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            focused: false,
            per_page: config.per_page,
            search_delay: config.search_debounce,
            preview_delay: config.preview_delay,
            preview_theme: config.theme,
            sites: Arc::new(Vec::new()),
            sites_loaded: false,
            site_name: None,
            site: None,
            view: None,
            table_state: TableState::default(),
            throbber: ThrobberState::default(),
            search: SearchBar::default(),
            search_debouncer: None,
            preview_enabled: true,
            preview: None,
            preview_debouncer: None,
        }
    }

    // ── Site resolution ──────────────────────────────────────────────

    /// Exact name first, then case-insensitive.
    fn lookup(&self, name: &str) -> Option<Arc<Site>> {
        self.sites
            .iter()
            .find(|s| s.name == name)
            .or_else(|| self.sites.iter().find(|s| s.name.eq_ignore_ascii_case(name)))
            .cloned()
    }

    fn site_missing(&self) -> bool {
        self.sites_loaded && self.site_name.is_some() && self.site.is_none()
    }

    fn open_site(&mut self, name: &str) -> Option<Action> {
        self.close_preview();
        self.clear_search();
        self.table_state.select(None);
        self.site = self.lookup(name);
        let name = self.site.as_ref().map_or(name, |s| s.name.as_str()).to_owned();
        self.site_name = Some(name.clone());

        if self.site_missing() {
            debug!(site = %name, "site not in directory");
            self.view = None;
            return None;
        }

        let mut view = RankingView::new(name, self.per_page);
        let ticket = view.begin_load(1);
        let request = self.request(&view, 1, ticket);
        self.view = Some(view);
        Some(request)
    }

    fn request(&self, view: &RankingView, page: u32, ticket: u64) -> Action {
        Action::RequestRanking {
            site: view.site().to_owned(),
            page,
            per_page: self.per_page,
            ticket,
        }
    }

    fn on_sites_updated(&mut self, sites: &Arc<Vec<Arc<Site>>>) -> Option<Action> {
        let was_missing = self.site_missing();
        self.sites = Arc::clone(sites);
        self.sites_loaded = true;

        let name = self.site_name.clone()?;
        let Some(site) = self.lookup(&name) else {
            self.site = None;
            self.view = None;
            self.close_preview();
            return None;
        };
        // Opened before the directory arrived, or under a different case.
        let stale = was_missing || self.view.as_ref().is_none_or(|v| v.site() != site.name);
        self.site = Some(Arc::clone(&site));
        if stale {
            self.open_site(&site.name)
        } else {
            None
        }
    }

    // ── Table ────────────────────────────────────────────────────────

    fn visible(&self) -> Vec<&RankedEntity> {
        self.view
            .as_ref()
            .map(RankingView::visible_rows)
            .unwrap_or_default()
    }

    fn selected_row(&self) -> Option<&RankedEntity> {
        let idx = self.table_state.selected()?;
        self.visible().get(idx).copied()
    }

    fn reset_selection(&mut self) {
        let any = !self.visible().is_empty();
        self.table_state.select(any.then_some(0));
        self.selection_changed();
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        let before = self.table_state.selected();
        self.table_state.select(step(before, len, delta));
        if self.table_state.selected() != before {
            self.selection_changed();
        }
    }

    fn toggle_sort(&mut self, key: SortKey) {
        if let Some(view) = self.view.as_mut() {
            view.toggle_sort(key);
            self.reset_selection();
        }
    }

    fn change_page(&mut self, forward: bool) -> Option<Action> {
        let view = self.view.as_mut()?;
        let (page, ticket) = if forward {
            view.load_next()?
        } else {
            view.load_previous()?
        };
        self.close_preview();
        let view = self.view.as_ref()?;
        Some(self.request(view, page, ticket))
    }

    fn reload(&mut self) -> Option<Action> {
        if let Some(view) = self.view.as_mut() {
            let page = view.pager().page();
            let ticket = view.begin_load(page);
            let view = self.view.as_ref()?;
            return Some(self.request(view, page, ticket));
        }
        let name = self.site_name.clone()?;
        self.open_site(&name)
    }

    fn open_selected(&self) -> Option<Action> {
        let view = self.view.as_ref()?;
        let row = self.selected_row()?;
        Some(Action::OpenProfile {
            site: view.site().to_owned(),
            identifier: row.entity.identifier.clone(),
        })
    }

    // ── Search ───────────────────────────────────────────────────────

    fn clear_search(&mut self) {
        self.search = SearchBar::default();
        if let Some(d) = self.search_debouncer.as_mut() {
            d.cancel();
        }
        if let Some(view) = self.view.as_mut() {
            view.set_search_term("");
        }
    }

    fn input_changed(&mut self) {
        self.search.selected = None;
        if let Some(view) = self.view.as_mut() {
            view.set_search_term(self.search.input.clone());
        }
        self.reset_selection();

        let query = self.search.query().to_owned();
        let site = self.view.as_ref().map(|v| v.site().to_owned());
        let Some(debouncer) = self.search_debouncer.as_mut() else {
            return;
        };
        match site {
            Some(site) if !query.is_empty() => {
                debouncer.schedule(Action::RequestSuggestions { site, query });
            }
            _ => {
                debouncer.cancel();
                self.search.suggestions.clear();
            }
        }
    }

    fn submit_search(&mut self) -> Option<Action> {
        let identifier = self.search.target()?;
        let site = self.view.as_ref()?.site().to_owned();
        self.clear_search();
        self.reset_selection();
        Some(Action::OpenProfile { site, identifier })
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.search.active = false;
                self.search.suggestions.clear();
                self.search.selected = None;
                if let Some(d) = self.search_debouncer.as_mut() {
                    d.cancel();
                }
                self.selection_changed();
                None
            }
            KeyCode::Enter => self.submit_search(),
            KeyCode::Backspace => {
                self.search.input.pop();
                self.input_changed();
                None
            }
            KeyCode::Char(c) => {
                self.search.input.push(c);
                self.input_changed();
                None
            }
            KeyCode::Down => {
                self.search.move_selection(true);
                None
            }
            KeyCode::Up => {
                self.search.move_selection(false);
                None
            }
            _ => None,
        }
    }

    fn on_suggestions(&mut self, site: &str, query: &str, hits: &[Suggestion]) {
        let current = self.view.as_ref().is_some_and(|v| v.site() == site);
        // Results for an older query are dropped.
        if current && self.search.query() == query {
            self.search.suggestions = hits.to_vec();
            self.search.selected = None;
        }
    }

    // ── Hover preview ────────────────────────────────────────────────

    fn close_preview(&mut self) {
        self.preview = None;
        if let Some(d) = self.preview_debouncer.as_mut() {
            d.cancel();
        }
    }

    fn selection_changed(&mut self) {
        self.close_preview();
        if !self.preview_enabled || self.search.active {
            return;
        }
        let Some(view) = self.view.as_ref() else {
            return;
        };
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.entity.url.is_none() {
            return;
        }
        let due = Action::PreviewDue {
            site: view.site().to_owned(),
            identifier: row.entity.identifier.clone(),
        };
        if let Some(d) = self.preview_debouncer.as_mut() {
            d.schedule(due);
        }
    }

    fn on_preview_due(&mut self, site: &str, identifier: &str) {
        if !self.preview_enabled || self.search.active {
            return;
        }
        let Some(view) = self.view.as_ref() else {
            return;
        };
        if view.site() != site {
            return;
        }
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.entity.identifier != identifier {
            return;
        }
        let url = row
            .entity
            .url
            .as_deref()
            .map(|u| preview_url(u, self.preview_theme));
        if let Some(url) = url {
            self.preview = Some(Preview {
                identifier: identifier.to_owned(),
                url,
            });
        }
    }

    fn toggle_preview(&mut self) {
        self.preview_enabled = !self.preview_enabled;
        if self.preview_enabled {
            self.selection_changed();
        } else {
            self.close_preview();
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_header(frame: &mut Frame, area: Rect, site: &Site) {
        let color = theme::site_color(site.primary_color);
        let mut lines = vec![Line::from(vec![
            Span::styled(
                site.name.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} by {}", site.entity_name, site.metric_name),
                theme::muted(),
            ),
        ])];
        if let Some(ref d) = site.index_description {
            lines.push(Line::from(Span::styled(d.clone(), theme::table_row())));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }

    fn render_charts(frame: &mut Frame, area: Rect, site: &Site) {
        let color = theme::site_color(site.primary_color);
        let chunks =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);

        let hist_block = Block::default()
            .title(" Distribution ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let hist_inner = hist_block.inner(chunks[0]);
        frame.render_widget(hist_block, chunks[0]);
        let bars = histogram_bars(&site.stats.histogram);
        if bars.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No histogram published.", theme::muted())),
                hist_inner,
            );
        } else {
            frame.render_widget(histogram(&bars, color, hist_inner.width), hist_inner);
        }

        let right = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(chunks[1]);
        let cards = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(right[0]);
        frame.render_widget(
            StatCard::new("Median", stat(site.stats.median)).color(color),
            cards[0],
        );
        frame.render_widget(StatCard::new("Mean", stat(site.stats.mean)), cards[1]);
        frame.render_widget(
            StatCard::new("Tracked", thousands(site.stats.population())),
            cards[2],
        );
        if let Some(summary) = box_plot(&site.stats) {
            frame.render_widget(BoxPlot::new(&summary).color(color), right[2]);
        }
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let line = if self.search.active || !self.search.input.is_empty() {
            let cursor = if self.search.active { "▏" } else { "" };
            Line::from(vec![
                Span::styled(" / ", theme::key_hint_key()),
                Span::styled(format!("{}{cursor}", self.search.input), theme::table_row()),
            ])
        } else {
            Line::from(Span::styled(" / search", theme::muted()))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Dropdown under the search bar: suggestions, then the literal term.
    fn render_suggestions(&self, frame: &mut Frame, below: Rect, limit: Rect) {
        if !self.search.active || self.search.query().is_empty() {
            return;
        }
        let mut lines: Vec<Line> = self
            .search
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let style = if self.search.selected == Some(i) {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                Line::from(vec![
                    Span::styled(format!(" {:<24}", s.identifier), style),
                    Span::styled(format!("index {}", s.index), theme::muted()),
                ])
            })
            .collect();
        let literal_style = if self.search.selected.is_none() {
            theme::table_selected()
        } else {
            theme::muted()
        };
        lines.push(Line::from(Span::styled(
            format!(" ↵ try indexing {}", self.search.query()),
            literal_style,
        )));

        let height = u16::try_from(lines.len() + 2)
            .unwrap_or(u16::MAX)
            .min(limit.bottom().saturating_sub(below.y));
        let area = Rect {
            x: below.x,
            y: below.y,
            width: below.width.min(48),
            height,
        };
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, view: &RankingView) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if view.is_loading() && !view.has_data() {
            let throbber = Throbber::default()
                .label(" Loading rankings…")
                .style(theme::muted())
                .throbber_style(Style::default().fg(theme::ACCENT));
            frame.render_stateful_widget(throbber, inner, &mut self.throbber.clone());
            return;
        }

        if view.no_results() {
            let entity = self
                .site
                .as_ref()
                .map_or("entries", |s| s.entity_name.as_str());
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(
                        "  No {} match '{}' on this page",
                        entity.to_lowercase(),
                        view.search_term().trim()
                    ),
                    theme::muted(),
                )),
                inner,
            );
            return;
        }

        let sort = view.sort();
        let metric = self.site.as_ref().map_or("Metrics", |s| s.metric_name.as_str());
        let header = Row::new(vec![
            Cell::from("#"),
            Cell::from(format!("Identifier{}", sort.indicator(SortKey::Identifier))),
            Cell::from(format!("Index{}", sort.indicator(SortKey::Index))),
            Cell::from(format!("{metric}{}", sort.indicator(SortKey::TotalMetrics))),
            Cell::from("Updated"),
        ])
        .style(theme::table_header());

        let now = chrono::Utc::now();
        let rows: Vec<Row> = view
            .visible_rows()
            .into_iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.rank.to_string()).style(theme::muted()),
                    Cell::from(r.entity.identifier.clone()),
                    Cell::from(r.entity.index.to_string())
                        .style(Style::default().fg(theme::CYAN)),
                    Cell::from(thousands(r.entity.total_metrics)),
                    Cell::from(
                        r.entity
                            .last_updated_at
                            .map_or_else(|| "-".to_owned(), |t| age(t, now)),
                    )
                    .style(theme::muted()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Fill(3),
                Constraint::Length(8),
                Constraint::Fill(1),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, view: &RankingView) {
        let pager = view.pager();
        let mut spans = vec![Span::styled(
            format!(
                " Page {} of {} ({} total)",
                pager.page(),
                pager.total_pages(),
                thousands(pager.total_items())
            ),
            theme::table_row(),
        )];
        if view.is_loading() && view.has_data() {
            spans.push(Span::styled("  loading…", Style::default().fg(theme::YELLOW)));
        }
        let nav = |enabled: bool, text: &'static str| {
            Span::styled(
                text,
                if enabled {
                    theme::key_hint_key()
                } else {
                    theme::muted()
                },
            )
        };
        spans.push(Span::raw("   "));
        spans.push(nav(pager.has_previous(), "← prev"));
        spans.push(Span::raw("  "));
        spans.push(nav(pager.has_next(), "next →"));
        spans.push(Span::styled(
            if self.preview_enabled {
                "   preview on"
            } else {
                "   preview off"
            },
            theme::muted(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let Some(ref preview) = self.preview else {
            return;
        };
        let width = area.width.saturating_sub(8).min(72);
        let height = 6u16.min(area.height);
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(format!(" {} ", preview.identifier))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        let lines = vec![
            Line::from(Span::styled(
                preview.url.clone(),
                Style::default()
                    .fg(theme::CYAN)
                    .add_modifier(Modifier::UNDERLINED),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Enter open profile   p disable previews   Esc close",
                theme::muted(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_message(frame: &mut Frame, area: Rect, title: &str, body: &str) {
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Span::styled(body.to_owned(), theme::muted())).wrap(Wrap { trim: true }),
            inner,
        );
    }
}

impl Component for RankingsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.search_debouncer = Some(Debouncer::new(self.search_delay, action_tx.clone()));
        self.preview_debouncer = Some(Debouncer::new(self.preview_delay, action_tx));
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search.active {
            return Ok(self.handle_search_key(key));
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
            KeyCode::Char('h') | KeyCode::Left => self.change_page(false),
            KeyCode::Char('l') | KeyCode::Right => self.change_page(true),
            KeyCode::Char('i') => {
                self.toggle_sort(SortKey::Index);
                None
            }
            KeyCode::Char('m') => {
                self.toggle_sort(SortKey::TotalMetrics);
                None
            }
            KeyCode::Char('n') => {
                self.toggle_sort(SortKey::Identifier);
                None
            }
            KeyCode::Char('p') => {
                self.toggle_preview();
                None
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('/') if self.view.is_some() => {
                self.search.active = true;
                self.close_preview();
                None
            }
            KeyCode::Enter => self.open_selected(),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let follow_up = match action {
            Action::OpenSite(name) => self.open_site(name),
            Action::SitesUpdated(sites) => self.on_sites_updated(sites),
            Action::RankingLoaded { ticket, page } => {
                let applied = self
                    .view
                    .as_mut()
                    .filter(|v| v.site() == page.site)
                    .is_some_and(|v| v.apply_page(*ticket, page.clone()));
                if applied {
                    self.reset_selection();
                }
                None
            }
            Action::SuggestionsLoaded { site, query, hits } => {
                self.on_suggestions(site, query, hits);
                None
            }
            Action::PreviewDue { site, identifier } => {
                self.on_preview_due(site, identifier);
                None
            }
            Action::Tick => {
                if self.view.as_ref().is_some_and(RankingView::is_loading) {
                    self.throbber.calc_next();
                }
                None
            }
            _ => None,
        };
        Ok(follow_up)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ref name) = self.site_name else {
            Self::render_message(
                frame,
                area,
                "Rankings",
                "Pick a site on the Sites screen (press 1) and hit Enter.",
            );
            return;
        };
        if self.site_missing() {
            Self::render_message(
                frame,
                area,
                "Not found",
                &format!("There is no leaderboard for '{name}'. Press Esc to return to the site list."),
            );
            return;
        }
        let Some(ref view) = self.view else {
            return;
        };

        let has_charts = self.site.as_ref().is_some_and(|s| !s.stats.is_empty());
        let layout = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(if has_charts { 9 } else { 0 }),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(ref site) = self.site {
            Self::render_header(frame, layout[0], site);
            if has_charts {
                Self::render_charts(frame, layout[1], site);
            }
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled(view.site().to_owned(), theme::title_style())),
                layout[0],
            );
        }
        self.render_search(frame, layout[2]);
        self.render_table(frame, layout[3], view);
        self.render_footer(frame, layout[4], view);
        self.render_suggestions(frame, layout[3], area);
        self.render_preview(frame, area);
    }

    fn dismiss(&mut self) -> bool {
        if self.preview.is_some() {
            self.close_preview();
            return true;
        }
        if !self.search.input.is_empty() {
            self.clear_search();
            self.reset_selection();
            return true;
        }
        false
    }

    fn captures_input(&self) -> bool {
        self.search.active
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.close_preview();
        }
    }

    fn hints(&self) -> &'static str {
        if self.search.active {
            "type to search  ↑/↓ pick  Enter open  Esc done"
        } else {
            "Enter profile  i/m/n sort  h/l page  / search  p preview  r reload"
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use impact_core::{Entity, Pagination, RankingPage, SiteStats};
    use tokio::sync::mpsc;

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

    fn entity(identifier: &str, index: u32, total: u64) -> Entity {
        Entity {
            id: None,
            identifier: identifier.into(),
            index,
            total_metrics: total,
            created_at: None,
            last_updated_at: None,
            url: Some(format!("https://example.com/u/{identifier}")),
        }
    }

    fn page(n: u32, entities: Vec<Entity>) -> RankingPage {
        RankingPage {
            site: "reddit".into(),
            entities,
            pagination: Pagination {
                page: n,
                per_page: 10,
                total_items: 25,
                total_pages: 3,
            },
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> (RankingsScreen, mpsc::UnboundedReceiver<Action>) {
        let config = BackendConfig {
            search_debounce: Duration::from_millis(300),
            preview_delay: Duration::from_millis(500),
            ..BackendConfig::default()
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let mut screen = RankingsScreen::new(&config);
        screen.init(tx).unwrap();
        let sites = Arc::new(vec![site("reddit"), site("youtube")]);
        screen.update(&Action::SitesUpdated(sites)).unwrap();
        (screen, rx)
    }

    /// Open reddit and apply the first page; returns the screen.
    fn loaded() -> (RankingsScreen, mpsc::UnboundedReceiver<Action>) {
        let (mut screen, rx) = screen();
        let request = screen.update(&Action::OpenSite("REDDIT".into())).unwrap();
        let Some(Action::RequestRanking {
            site, page: 1, ticket, ..
        }) = request
        else {
            panic!("expected a ranking request");
        };
        assert_eq!(site, "reddit");
        screen
            .update(&Action::RankingLoaded {
                ticket,
                page: page(
                    1,
                    vec![
                        entity("alice", 30, 900),
                        entity("bob", 28, 2_000),
                        entity("alina", 25, 100),
                    ],
                ),
            })
            .unwrap();
        (screen, rx)
    }

    fn identifiers(screen: &RankingsScreen) -> Vec<String> {
        screen
            .visible()
            .iter()
            .map(|r| r.entity.identifier.clone())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_site_renders_not_found() {
        let (mut screen, _rx) = screen();
        let request = screen.update(&Action::OpenSite("myspace".into())).unwrap();
        assert!(request.is_none());
        assert!(screen.site_missing());

        // Appearing on a later refresh triggers the load.
        let sites = Arc::new(vec![site("reddit"), site("myspace")]);
        let request = screen.update(&Action::SitesUpdated(sites)).unwrap();
        assert!(matches!(request, Some(Action::RequestRanking { page: 1, .. })));
        assert!(!screen.site_missing());
    }

    #[tokio::test(start_paused = true)]
    async fn site_opened_before_directory_is_canonicalised() {
        let config = BackendConfig::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut screen = RankingsScreen::new(&config);
        screen.init(tx).unwrap();

        let first = screen.update(&Action::OpenSite("Reddit".into())).unwrap();
        assert!(matches!(first, Some(Action::RequestRanking { ref site, .. }) if site == "Reddit"));
        assert!(!screen.site_missing());

        let sites = Arc::new(vec![site("reddit")]);
        let again = screen.update(&Action::SitesUpdated(sites)).unwrap();
        assert!(matches!(again, Some(Action::RequestRanking { ref site, .. }) if site == "reddit"));
    }

    #[tokio::test(start_paused = true)]
    async fn sort_keys_toggle_and_keep_ranks() {
        let (mut screen, _rx) = loaded();
        screen.handle_key_event(key(KeyCode::Char('m'))).unwrap();
        assert_eq!(identifiers(&screen), ["bob", "alice", "alina"]);
        assert_eq!(screen.selected_row().unwrap().rank, 2);

        screen.handle_key_event(key(KeyCode::Char('m'))).unwrap();
        assert_eq!(identifiers(&screen), ["alina", "alice", "bob"]);

        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(identifiers(&screen), ["bob", "alina", "alice"]);
    }

    #[tokio::test(start_paused = true)]
    async fn paging_requests_and_drops_stale_pages() {
        let (mut screen, _rx) = loaded();
        assert!(screen.handle_key_event(key(KeyCode::Char('h'))).unwrap().is_none());

        let Some(Action::RequestRanking { page: 2, ticket: stale, .. }) =
            screen.handle_key_event(key(KeyCode::Char('l'))).unwrap()
        else {
            panic!("expected page 2");
        };
        let Some(Action::RequestRanking { page: 3, ticket, .. }) =
            screen.handle_key_event(key(KeyCode::Right)).unwrap()
        else {
            panic!("expected page 3");
        };

        screen
            .update(&Action::RankingLoaded {
                ticket: stale,
                page: page(2, vec![entity("late", 1, 1)]),
            })
            .unwrap();
        assert!(screen.view.as_ref().unwrap().is_loading());

        screen
            .update(&Action::RankingLoaded {
                ticket,
                page: page(3, vec![entity("zed", 2, 5)]),
            })
            .unwrap();
        assert_eq!(identifiers(&screen), ["zed"]);
        assert_eq!(screen.selected_row().unwrap().rank, 21);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_filters_and_debounces_suggestions() {
        let (mut screen, mut rx) = loaded();
        screen.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        assert!(screen.captures_input());
        for c in "ALI".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(identifiers(&screen), ["alice", "alina"]);

        tokio::time::sleep(Duration::from_millis(301)).await;
        let mut requests = Vec::new();
        while let Ok(action) = rx.try_recv() {
            if let Action::RequestSuggestions { query, .. } = action {
                requests.push(query);
            }
        }
        assert_eq!(requests, ["ALI"]);

        // A stale response is ignored; the current one is shown.
        let hit = |id: &str| Suggestion {
            identifier: id.into(),
            index: 1,
            url: None,
        };
        screen
            .update(&Action::SuggestionsLoaded {
                site: "reddit".into(),
                query: "AL".into(),
                hits: vec![hit("old")],
            })
            .unwrap();
        assert!(screen.search.suggestions.is_empty());
        screen
            .update(&Action::SuggestionsLoaded {
                site: "reddit".into(),
                query: "ALI".into(),
                hits: vec![hit("alice"), hit("alicia")],
            })
            .unwrap();
        assert_eq!(screen.search.suggestions.len(), 2);

        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        let open = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            open,
            Some(Action::OpenProfile { ref identifier, .. }) if identifier == "alicia"
        ));
        assert!(!screen.captures_input());
        assert_eq!(identifiers(&screen).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_query_issues_no_request_and_submits_literal() {
        let (mut screen, mut rx) = loaded();
        screen.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        while let Ok(action) = rx.try_recv() {
            assert!(!matches!(action, Action::RequestSuggestions { .. }));
        }
        assert!(screen.handle_key_event(key(KeyCode::Enter)).unwrap().is_none());

        for c in "newbie ".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        let open = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            open,
            Some(Action::OpenProfile { ref identifier, .. }) if identifier == "newbie"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn preview_opens_after_resting_and_closes_on_move() {
        let (mut screen, mut rx) = loaded();

        tokio::time::sleep(Duration::from_millis(501)).await;
        let due = std::iter::from_fn(|| rx.try_recv().ok())
            .find(|a| matches!(a, Action::PreviewDue { .. }))
            .unwrap();
        screen.update(&due).unwrap();
        assert_eq!(
            screen.preview.as_ref().map(|p| p.url.as_str()),
            Some("https://example.com/u/alice?theme=dark")
        );

        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        assert!(screen.preview.is_none());

        // A due notice for a row no longer selected is ignored.
        screen.update(&due).unwrap();
        assert!(screen.preview.is_none());

        screen.handle_key_event(key(KeyCode::Char('p'))).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(std::iter::from_fn(|| rx.try_recv().ok())
            .all(|a| !matches!(a, Action::PreviewDue { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn escape_closes_overlays_before_navigating() {
        let (mut screen, _rx) = loaded();
        screen
            .update(&Action::PreviewDue {
                site: "reddit".into(),
                identifier: "alice".into(),
            })
            .unwrap();
        assert!(screen.preview.is_some());
        assert!(screen.dismiss());
        assert!(screen.preview.is_none());
        assert!(!screen.dismiss());
    }
}
