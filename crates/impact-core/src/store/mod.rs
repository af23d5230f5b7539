// ── In-memory stores ──
//
// The only state that outlives a single view: the site directory.

mod directory;

pub use directory::{SiteDirectory, SiteStream};
