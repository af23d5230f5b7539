//! Profile screen: one entity's index, metric total, and where it sits in
//! the site's distribution.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};

use impact_core::format::{age, percent, thousands, top_share};
use impact_core::view::{box_plot, not_found_message};
use impact_core::{Profile, ProfileView, Site};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::box_plot::BoxPlot;
use crate::widgets::stat_card::StatCard;

pub struct ProfileScreen {
    focused: bool,
    sites: Arc<Vec<Arc<Site>>>,
    /// `(site, identifier)` of the lookup in flight or shown.
    target: Option<(String, String)>,
    view: Option<ProfileView>,
    throbber: ThrobberState,
}

impl ProfileScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            sites: Arc::new(Vec::new()),
            target: None,
            view: None,
            throbber: ThrobberState::default(),
        }
    }

    fn site(&self, name: &str) -> Option<&Arc<Site>> {
        self.sites
            .iter()
            .find(|s| s.name == name)
            .or_else(|| self.sites.iter().find(|s| s.name.eq_ignore_ascii_case(name)))
    }

    fn open(&mut self, site: &str, identifier: &str) -> Option<Action> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        self.target = Some((site.to_owned(), identifier.to_owned()));
        self.view = Some(ProfileView::loading(site, identifier));
        Some(Action::RequestProfile {
            site: site.to_owned(),
            identifier: identifier.to_owned(),
        })
    }

    fn reload(&mut self) -> Option<Action> {
        let (site, identifier) = self.target.clone()?;
        self.open(&site, &identifier)
    }

    fn frame_block(&self, title: String) -> Block<'static> {
        Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            })
    }

    fn render_message(&self, frame: &mut Frame, area: Rect, title: &str, body: &str) {
        let block = self.frame_block(format!(" {title} "));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {body}"), theme::table_row())),
            Line::from(""),
            Line::from(Span::styled("  Esc to go back", theme::muted())),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_loaded(&self, frame: &mut Frame, area: Rect, profile: &Profile) {
        let site = self.site(&profile.site);
        let color = theme::site_color(site.and_then(|s| s.primary_color));
        let metric = site.map_or("Metrics", |s| s.metric_name.as_str());
        let entity = &profile.entity;

        let block = self.frame_block(format!(" {} on {} ", entity.identifier, profile.site));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

        let now = chrono::Utc::now();
        let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(layout[0]);
        frame.render_widget(
            StatCard::new("Index", entity.index.to_string()).color(color),
            cards[0],
        );
        frame.render_widget(StatCard::new(metric, thousands(entity.total_metrics)), cards[1]);
        frame.render_widget(
            StatCard::new(
                "Rank",
                profile.percentile.map_or_else(|| "-".into(), top_share),
            ),
            cards[2],
        );
        frame.render_widget(
            StatCard::new(
                "Updated",
                entity
                    .last_updated_at
                    .map_or_else(|| "-".into(), |t| age(t, now)),
            ),
            cards[3],
        );

        if let Some(p) = profile.percentile {
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(color).bg(theme::BG_HIGHLIGHT))
                .ratio((p / 100.0).clamp(0.0, 1.0))
                .label(format!("{} percentile", percent(p)));
            frame.render_widget(gauge, layout[2]);
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    " No percentile published for this site.",
                    theme::muted(),
                )),
                layout[2],
            );
        }

        let mut details = Vec::new();
        if let Some(ref url) = entity.url {
            details.push(Line::from(vec![
                Span::styled(" Profile  ", theme::muted()),
                Span::styled(
                    url.clone(),
                    Style::default()
                        .fg(theme::CYAN)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }
        if let Some(created) = entity.created_at {
            details.push(Line::from(vec![
                Span::styled(" Tracked  ", theme::muted()),
                Span::styled(created.format("%Y-%m-%d").to_string(), theme::table_row()),
            ]));
        }
        frame.render_widget(Paragraph::new(details), layout[4]);

        if let Some(summary) = site.and_then(|s| box_plot(&s.stats)) {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    " Where this index sits among everyone tracked",
                    theme::muted(),
                )),
                layout[5],
            );
            frame.render_widget(
                BoxPlot::new(&summary)
                    .color(color)
                    .marker(f64::from(entity.index)),
                layout[6],
            );
        }
    }
}

impl Component for ProfileScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('r') => self.reload(),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let follow_up = match action {
            Action::OpenProfile { site, identifier } => self.open(site, identifier),
            Action::ProfileLoaded {
                site,
                identifier,
                view,
            } => {
                let current = self
                    .target
                    .as_ref()
                    .is_some_and(|(s, i)| s == site && i == identifier);
                if current {
                    self.view = Some(view.as_ref().clone());
                }
                None
            }
            Action::SitesUpdated(sites) => {
                self.sites = Arc::clone(sites);
                None
            }
            Action::Tick => {
                if self.view.as_ref().is_some_and(ProfileView::is_loading) {
                    self.throbber.calc_next();
                }
                None
            }
            _ => None,
        };
        Ok(follow_up)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match self.view {
            None => self.render_message(
                frame,
                area,
                "Profile",
                "Pick a row on the Rankings screen, or search for an identifier with /.",
            ),
            Some(ProfileView::Loading {
                ref site,
                ref identifier,
            }) => {
                let block = self.frame_block(format!(" {identifier} on {site} "));
                let inner = block.inner(area);
                frame.render_widget(block, area);
                let throbber = Throbber::default()
                    .label(format!(" Looking up {identifier}…"))
                    .style(theme::muted())
                    .throbber_style(Style::default().fg(theme::ACCENT));
                frame.render_stateful_widget(throbber, inner, &mut self.throbber.clone());
            }
            Some(ProfileView::Loaded(ref profile)) => self.render_loaded(frame, area, profile),
            Some(ProfileView::NotFound {
                ref site,
                ref identifier,
            }) => {
                let entity = self.site(site).map_or("entry", |s| s.entity_name.as_str());
                self.render_message(
                    frame,
                    area,
                    "Not found",
                    &not_found_message(entity, identifier, site),
                );
            }
            Some(ProfileView::SiteNotFound { ref site }) => self.render_message(
                frame,
                area,
                "Not found",
                &format!("There is no leaderboard for '{site}'."),
            ),
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn hints(&self) -> &'static str {
        "r reload  Esc back"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use impact_core::Entity;

    use super::*;

    fn loaded(site: &str, identifier: &str) -> ProfileView {
        ProfileView::Loaded(Profile {
            site: site.into(),
            entity: Entity {
                id: None,
                identifier: identifier.into(),
                index: 12,
                total_metrics: 4_000,
                created_at: None,
                last_updated_at: None,
                url: None,
            },
            percentile: Some(97.5),
        })
    }

    fn settled(site: &str, identifier: &str, view: ProfileView) -> Action {
        Action::ProfileLoaded {
            site: site.into(),
            identifier: identifier.into(),
            view: Box::new(view),
        }
    }

    #[test]
    fn open_requests_a_trimmed_lookup() {
        let mut screen = ProfileScreen::new();
        let request = screen
            .update(&Action::OpenProfile {
                site: "reddit".into(),
                identifier: "  alice ".into(),
            })
            .unwrap();
        assert!(matches!(
            request,
            Some(Action::RequestProfile { ref identifier, .. }) if identifier == "alice"
        ));
        assert!(screen.view.as_ref().unwrap().is_loading());
    }

    #[test]
    fn blank_identifier_is_ignored() {
        let mut screen = ProfileScreen::new();
        let request = screen
            .update(&Action::OpenProfile {
                site: "reddit".into(),
                identifier: "   ".into(),
            })
            .unwrap();
        assert!(request.is_none());
        assert!(screen.view.is_none());
    }

    #[test]
    fn result_for_an_older_lookup_is_dropped() {
        let mut screen = ProfileScreen::new();
        for id in ["alice", "bob"] {
            screen
                .update(&Action::OpenProfile {
                    site: "reddit".into(),
                    identifier: id.into(),
                })
                .unwrap();
        }
        screen
            .update(&settled("reddit", "alice", loaded("reddit", "alice")))
            .unwrap();
        assert!(screen.view.as_ref().unwrap().is_loading());

        // The server may normalise the identifier's case.
        screen
            .update(&settled("reddit", "bob", loaded("reddit", "Bob")))
            .unwrap();
        assert!(matches!(screen.view, Some(ProfileView::Loaded(_))));
    }

    #[test]
    fn not_found_states_are_kept() {
        let mut screen = ProfileScreen::new();
        screen
            .update(&Action::OpenProfile {
                site: "myspace".into(),
                identifier: "tom".into(),
            })
            .unwrap();
        screen
            .update(&settled(
                "myspace",
                "tom",
                ProfileView::SiteNotFound {
                    site: "myspace".into(),
                },
            ))
            .unwrap();
        assert_eq!(
            screen.view,
            Some(ProfileView::SiteNotFound {
                site: "myspace".into()
            })
        );
    }

    #[test]
    fn reload_repeats_the_lookup() {
        let mut screen = ProfileScreen::new();
        let key = KeyEvent::new(KeyCode::Char('r'), crossterm::event::KeyModifiers::NONE);
        assert!(screen.handle_key_event(key).unwrap().is_none());

        screen
            .update(&Action::OpenProfile {
                site: "reddit".into(),
                identifier: "alice".into(),
            })
            .unwrap();
        screen
            .update(&settled("reddit", "alice", loaded("reddit", "alice")))
            .unwrap();
        let again = screen.handle_key_event(key).unwrap();
        assert!(matches!(again, Some(Action::RequestProfile { .. })));
        assert!(screen.view.as_ref().unwrap().is_loading());
    }
}
