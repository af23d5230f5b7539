// ── View state ──
//
// Rendering-independent state for the ranking and profile views. The TUI
// drives these from key events; the CLI uses the same types so both
// surfaces sort, filter, and paginate identically.

mod chart;
mod debounce;
mod filter;
mod pagination;
mod preview;
mod profile;
mod ranking;
mod sort;

pub use chart::{BinPoint, BoxPlotSummary, HistogramBar, box_plot, histogram_bars};
pub use debounce::Debouncer;
pub use filter::{identifier_matches, normalize_term};
pub use pagination::Pager;
pub use preview::{Theme, preview_url};
pub use profile::{ProfileView, not_found_message};
pub use ranking::{RankedEntity, RankingView};
pub use sort::{SortDirection, SortKey, SortState};
