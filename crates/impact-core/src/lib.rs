//! Shared data layer between `impact-api` and UI consumers (CLI / TUI).
//!
//! - **[`Backend`]**: Cheap-clone facade over the HTTP client. Owns the
//!   [`SiteDirectory`] and maps wire payloads into the domain model.
//!   [`Backend::spawn_site_refresh`] keeps the directory revalidated in the
//!   background.
//!
//! - **[`SiteDirectory`]**: Ordered, lock-free site list with `watch`-based
//!   change notification, vended to consumers as a [`SiteStream`].
//!
//! - **View state** ([`view`]): Everything a ranking or profile view needs
//!   that is not rendering: client-side sort, search filter, pagination,
//!   debounced input, hover-preview URLs, and chart reshaping.
//!
//! - **Domain model** ([`model`]): `Site`, `Entity`, `Profile`,
//!   `RankingPage`, `Suggestion`.

pub mod backend;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod model;
pub mod store;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::Backend;
pub use config::{BackendConfig, TlsVerification};
pub use error::CoreError;
pub use store::{SiteDirectory, SiteStream};

pub use model::{
    Coverage, Entity, HistogramBucket, Pagination, Profile, RankingPage, Rgb, Site, SiteStats,
    Suggestion,
};
pub use view::{
    BoxPlotSummary, Debouncer, HistogramBar, Pager, ProfileView, RankedEntity, RankingView,
    SortDirection, SortKey, SortState, Theme, box_plot, histogram_bars, not_found_message,
};
