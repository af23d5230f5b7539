//! Every state change in the TUI travels through the action channel as an
//! [`Action`]. Backend results come back the same way.

use std::sync::Arc;

use impact_core::{ProfileView, RankingPage, Site, Suggestion};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A toast shown in the bottom-right corner for a few seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    /// Open a site's leaderboard on the Rankings screen.
    OpenSite(String),
    /// Open an entity on the Profile screen.
    OpenProfile { site: String, identifier: String },
    ToggleHelp,

    // ── Backend status ────────────────────────────────────────────
    Connected,
    Disconnected(String),

    // ── Requests (spawned by the app) ─────────────────────────────
    RequestRanking {
        site: String,
        page: u32,
        per_page: u32,
        ticket: u64,
    },
    RequestProfile { site: String, identifier: String },
    RequestSuggestions { site: String, query: String },

    // ── Results ───────────────────────────────────────────────────
    SitesUpdated(Arc<Vec<Arc<Site>>>),
    RankingLoaded {
        ticket: u64,
        page: RankingPage,
    },
    /// Settled lookup for the `(site, identifier)` that was requested.
    ProfileLoaded {
        site: String,
        identifier: String,
        view: Box<ProfileView>,
    },
    SuggestionsLoaded {
        site: String,
        query: String,
        hits: Vec<Suggestion>,
    },

    // ── Hover preview ─────────────────────────────────────────────
    /// The selection rested on `identifier` for the preview delay.
    PreviewDue { site: String, identifier: String },

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
