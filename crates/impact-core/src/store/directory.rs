// ── Site directory ──
//
// Ordered site list keyed by name. Replaced wholesale on every refresh;
// readers take lock-free snapshots and subscribers are woken through a
// `watch` channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use tokio::sync::watch;

use crate::model::Site;

type Snapshot = Arc<Vec<Arc<Site>>>;

/// The set of supported sites, in backend order.
pub struct SiteDirectory {
    by_name: ArcSwap<IndexMap<String, Arc<Site>>>,
    snapshot: watch::Sender<Snapshot>,
    loaded: AtomicBool,
}

impl Default for SiteDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteDirectory {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_name: ArcSwap::from_pointee(IndexMap::new()),
            snapshot,
            loaded: AtomicBool::new(false),
        }
    }

    /// Replace the whole directory. Returns `true` if the contents changed.
    ///
    /// Later duplicates of a name win, but keep the first one's position.
    pub fn replace(&self, sites: Vec<Site>) -> bool {
        let mut next: IndexMap<String, Arc<Site>> = IndexMap::with_capacity(sites.len());
        for site in sites {
            next.insert(site.name.clone(), Arc::new(site));
        }

        self.loaded.store(true, Ordering::Release);
        let current = self.by_name.load();
        if current.iter().eq(next.iter()) {
            return false;
        }

        let values: Vec<Arc<Site>> = next.values().cloned().collect();
        self.by_name.store(Arc::new(next));
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        true
    }

    /// Whether at least one refresh (successful or empty) has landed.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Look up a site by its route name.
    ///
    /// Exact match first, then an ASCII case-insensitive match.
    pub fn get(&self, name: &str) -> Option<Arc<Site>> {
        let map = self.by_name.load();
        if let Some(site) = map.get(name) {
            return Some(Arc::clone(site));
        }
        map.values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(Arc::clone)
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Sites whose name contains `query`, case-insensitively.
    /// An empty query returns every site.
    pub fn filter(&self, query: &str) -> Vec<Arc<Site>> {
        self.snapshot()
            .iter()
            .filter(|s| s.name_matches(query))
            .map(Arc::clone)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.load().is_empty()
    }

    /// Subscribe to directory changes.
    pub fn subscribe(&self) -> SiteStream {
        SiteStream::new(self.snapshot.subscribe())
    }
}

/// A subscription to the site directory.
pub struct SiteStream {
    current: Snapshot,
    receiver: watch::Receiver<Snapshot>,
}

impl SiteStream {
    fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// The latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the directory has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::SiteStats;

    fn site(name: &str) -> Site {
        Site {
            name: name.into(),
            description: None,
            index_description: None,
            entity_name: "User".into(),
            metric_name: "upvotes".into(),
            primary_color: None,
            secondary_color: None,
            coverage: None,
            stats: SiteStats::default(),
        }
    }

    #[test]
    fn replace_keeps_backend_order() {
        let dir = SiteDirectory::new();
        assert!(!dir.is_loaded());
        assert!(dir.replace(vec![site("youtube"), site("github"), site("reddit")]));
        let names: Vec<String> = dir.snapshot().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, ["youtube", "github", "reddit"]);
        assert!(dir.is_loaded());
        assert_eq!(dir.len(), 3);
    }

    #[test]
    fn identical_replace_reports_no_change() {
        let dir = SiteDirectory::new();
        assert!(dir.replace(vec![site("github")]));
        assert!(!dir.replace(vec![site("github")]));
        assert!(dir.replace(vec![]));
        assert!(dir.is_empty());
    }

    #[test]
    fn get_falls_back_to_case_insensitive() {
        let dir = SiteDirectory::new();
        dir.replace(vec![site("GitHub")]);
        assert_eq!(dir.get("GitHub").unwrap().name, "GitHub");
        assert_eq!(dir.get("github").unwrap().name, "GitHub");
        assert!(dir.get("gitlab").is_none());
    }

    #[test]
    fn filter_matches_substring_case_insensitively() {
        let dir = SiteDirectory::new();
        dir.replace(vec![site("GitHub"), site("Reddit"), site("Hacker News")]);
        let hits: Vec<String> = dir.filter("HUB").iter().map(|s| s.name.clone()).collect();
        assert_eq!(hits, ["GitHub"]);
        assert_eq!(dir.filter("").len(), 3);
        assert_eq!(dir.filter("  ").len(), 3);
        assert!(dir.filter("zzz").is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let dir = SiteDirectory::new();
        let mut stream = dir.subscribe();
        assert!(stream.current().is_empty());

        dir.replace(vec![site("reddit")]);
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(stream.current().len(), 1);
        assert_eq!(stream.latest()[0].name, "reddit");
    }
}
