//! Application core: event loop, screen management, action dispatch, and
//! the backend tasks behind `Request*` actions.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use impact_core::{Backend, CoreError, ProfileView};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Backend reachability as last observed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

pub struct App {
    backend: Backend,
    /// Site to open once the loop starts.
    initial_site: Option<String>,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    connection_status: ConnectionStatus,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Stops the data bridge on exit.
    data_cancel: CancellationToken,
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(backend: Backend, initial_site: Option<String>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(backend.config()).into_iter().collect();

        Self {
            backend,
            initial_site,
            active_screen: ScreenId::default(),
            screens,
            running: true,
            connection_status: ConnectionStatus::default(),
            help_visible: false,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
            notification: None,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let bridge = {
            let backend = self.backend.clone();
            let tx = self.action_tx.clone();
            let cancel = self.data_cancel.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(backend, tx, cancel).await;
            })
        };

        if let Some(site) = self.initial_site.take() {
            self.action_tx.send(Action::OpenSite(site))?;
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                // The next frame picks up the new size.
                Event::Resize(..) | Event::Render => self.action_tx.send(Action::Render)?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        if let Err(e) = bridge.await {
            warn!(error = %e, "data bridge task failed");
        }
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Global keys are handled here; everything else goes to the active
    /// screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let Some(screen) = self.screens.get_mut(&self.active_screen) else {
            return Ok(None);
        };

        // Text entry owns the keyboard.
        if screen.captures_input() {
            return screen.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                let n = u8::try_from(c).map_or(0, |b| b - b'0');
                if let Some(target) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(target)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => {
                if screen.dismiss() {
                    return Ok(None);
                }
                return Ok(Some(Action::GoBack));
            }

            _ => {}
        }

        screen.handle_key_event(key)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render => {}

            Action::SwitchScreen(target) => self.focus(*target),

            Action::GoBack => {
                if let Some(parent) = self.active_screen.parent() {
                    self.focus(parent);
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Connected => {
                if self.connection_status == ConnectionStatus::Disconnected {
                    let host = self.backend.config().url.host_str().unwrap_or("backend");
                    self.notification = Some((
                        Notification::info(format!("Reconnected to {host}")),
                        Instant::now(),
                    ));
                }
                self.connection_status = ConnectionStatus::Connected;
            }

            Action::Disconnected(reason) => {
                debug!(%reason, "backend unreachable");
                self.connection_status = ConnectionStatus::Disconnected;
            }

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                self.broadcast(action)?;
            }

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            Action::OpenSite(_) => {
                self.focus(ScreenId::Rankings);
                self.broadcast(action)?;
            }

            Action::OpenProfile { .. } => {
                self.focus(ScreenId::Profile);
                self.broadcast(action)?;
            }

            Action::RequestRanking {
                site,
                page,
                per_page,
                ticket,
            } => self.fetch_ranking(site.clone(), *page, *per_page, *ticket),

            Action::RequestProfile { site, identifier } => {
                self.fetch_profile(site.clone(), identifier.clone());
            }

            Action::RequestSuggestions { site, query } => {
                self.fetch_suggestions(site.clone(), query.clone());
            }

            // Results go to every screen so they stay in sync.
            Action::SitesUpdated(_)
            | Action::RankingLoaded { .. }
            | Action::ProfileLoaded { .. }
            | Action::SuggestionsLoaded { .. }
            | Action::PreviewDue { .. } => self.broadcast(action)?,
        }
        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn focus(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    // ── Backend requests ─────────────────────────────────────────────

    fn fetch_ranking(&self, site: String, page: u32, per_page: u32, ticket: u64) {
        let backend = self.backend.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match backend.ranking(&site, page, per_page).await {
                Ok(page) => {
                    let _ = tx.send(Action::Connected);
                    let _ = tx.send(Action::RankingLoaded { ticket, page });
                }
                Err(e) => {
                    warn!(site = %site, page, error = %e, "ranking fetch failed");
                    report_failure(&tx, &e, format!("Could not load {site} rankings: {e}"));
                }
            }
        });
    }

    fn fetch_profile(&self, site: String, identifier: String) {
        let backend = self.backend.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = backend
                .site_profile(&site, &identifier)
                .await
                .map(|(_, profile)| profile);
            if let Err(ref e) = result {
                if e.is_not_found() {
                    debug!(site = %site, identifier = %identifier, "profile not found");
                } else {
                    warn!(site = %site, identifier = %identifier, error = %e, "profile lookup failed");
                    if is_unreachable(e) {
                        let _ = tx.send(Action::Disconnected(e.to_string()));
                    }
                }
            }
            let view = ProfileView::resolve(&site, &identifier, result);
            let _ = tx.send(Action::ProfileLoaded {
                site,
                identifier,
                view: Box::new(view),
            });
        });
    }

    /// Failed suggestion lookups are logged only; typing carries on.
    fn fetch_suggestions(&self, site: String, query: String) {
        let backend = self.backend.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match backend.search(&site, &query).await {
                Ok(hits) => {
                    let _ = tx.send(Action::SuggestionsLoaded { site, query, hits });
                }
                Err(e) => warn!(site = %site, query = %query, error = %e, "search failed"),
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::muted()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let connection = match self.connection_status {
            ConnectionStatus::Connected => {
                Span::styled("● connected", Style::default().fg(theme::GREEN))
            }
            ConnectionStatus::Disconnected => {
                Span::styled("○ unreachable", Style::default().fg(theme::RED))
            }
            ConnectionStatus::Connecting => {
                Span::styled("◐ connecting", Style::default().fg(theme::YELLOW))
            }
        };

        let config = self.backend.config();
        let host = config.url.host_str().unwrap_or("backend").to_owned();
        let mut spans = vec![
            Span::raw(" "),
            connection,
            Span::styled(format!(" {host}"), theme::muted()),
        ];
        if !config.site_refresh_interval.is_zero() {
            spans.push(Span::styled(
                format!(
                    " ⟳ {}",
                    humantime::format_duration(config.site_refresh_interval)
                ),
                theme::muted(),
            ));
        }
        let hints = self
            .screens
            .get(&self.active_screen)
            .map_or("", |s| s.hints());
        spans.push(Span::styled(format!(" │ {hints}"), theme::muted()));
        spans.push(Span::styled("  ? help  q quit", theme::muted()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn is_unreachable(e: &CoreError) -> bool {
    matches!(
        e,
        CoreError::ConnectionFailed { .. } | CoreError::Timeout { .. }
    )
}

/// Toast the failure; connection-level errors also flip the status bar.
fn report_failure(tx: &mpsc::UnboundedSender<Action>, e: &CoreError, message: String) {
    if is_unreachable(e) {
        let _ = tx.send(Action::Disconnected(e.to_string()));
    }
    let _ = tx.send(Action::Notify(Notification::error(message)));
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 62, 24);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::CYAN),
        ))
    };
    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::muted()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        section("Global"),
        key("1-3 Tab", "Switch screen"),
        key("Esc", "Close overlay / back"),
        key("?", "This help"),
        key("q", "Quit"),
        Line::from(""),
        section("Lists"),
        key("j/k ↑/↓", "Move"),
        key("g/G", "Top / bottom"),
        key("Enter", "Open"),
        key("/", "Filter sites / search entries"),
        Line::from(""),
        section("Rankings"),
        key("i m n", "Sort by index, metric, identifier"),
        key("h/l ←/→", "Previous / next page"),
        key("p", "Toggle hover preview"),
        key("r", "Reload"),
        Line::from(""),
        Line::from(Span::styled(
            "                           Esc or ? to close",
            theme::muted(),
        )),
    ];
    frame.render_widget(Paragraph::new(help_text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len
        .saturating_add(6)
        .clamp(20, 72)
        .min(area.width.saturating_sub(2));
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (color, icon) = match notif.level {
        NotificationLevel::Error => (theme::RED, "✗"),
        NotificationLevel::Info => (theme::CYAN, "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
