// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. Built from wire types in
// `convert`; serializable for structured (JSON/YAML) output.

pub mod entity;
pub mod site;

pub use entity::{Entity, Pagination, Profile, RankingPage, Suggestion};
pub use site::{Coverage, HistogramBucket, Rgb, Site, SiteStats};
