// ── Ranking view state ──
//
// One site's leaderboard page: fetched rows in server order, plus the
// client-side search filter and sort applied on top. Fetches are tagged with
// a load ticket so a page that resolves after the user has moved on is
// dropped instead of overwriting newer state.

use serde::Serialize;

use super::filter::{identifier_matches, normalize_term};
use super::pagination::Pager;
use super::sort::{SortKey, SortState};
use crate::model::{Entity, RankingPage};

/// A fetched row with its overall rank in server order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity {
    pub rank: u64,
    #[serde(flatten)]
    pub entity: Entity,
}

#[derive(Debug, Clone)]
pub struct RankingView {
    site: String,
    pager: Pager,
    rows: Vec<RankedEntity>,
    loading: bool,
    loaded_once: bool,
    sort: SortState,
    term: String,
    ticket: u64,
}

impl RankingView {
    pub fn new(site: impl Into<String>, per_page: u32) -> Self {
        Self {
            site: site.into(),
            pager: Pager::new(per_page),
            rows: Vec::new(),
            loading: false,
            loaded_once: false,
            sort: SortState::default(),
            term: String::new(),
            ticket: 0,
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether any page has been applied yet.
    pub fn has_data(&self) -> bool {
        self.loaded_once
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Start loading `page`; returns the ticket the result must carry.
    pub fn begin_load(&mut self, page: u32) -> u64 {
        self.ticket += 1;
        self.loading = true;
        self.pager.go_to(page);
        self.ticket
    }

    /// Apply a fetched page. Returns `false` (and changes nothing) if
    /// `ticket` belongs to a superseded load.
    pub fn apply_page(&mut self, ticket: u64, page: RankingPage) -> bool {
        if ticket != self.ticket {
            return false;
        }
        self.pager.update(&page.pagination);
        let first = self.pager.first_rank();
        self.rows = page
            .entities
            .into_iter()
            .zip(first..)
            .map(|(entity, rank)| RankedEntity { rank, entity })
            .collect();
        self.loading = false;
        self.loaded_once = true;
        true
    }

    /// Ticket for the next page, if there is one.
    pub fn load_next(&mut self) -> Option<(u32, u64)> {
        let page = self.pager.next_page()?;
        Some((page, self.begin_load(page)))
    }

    /// Ticket for the previous page, if there is one.
    pub fn load_previous(&mut self) -> Option<(u32, u64)> {
        let page = self.pager.previous_page()?;
        Some((page, self.begin_load(page)))
    }

    // ── Search & sort ────────────────────────────────────────────────

    pub fn search_term(&self) -> &str {
        &self.term
    }

    /// Set the filter term. A blank term restores the full page.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
    }

    /// Every fetched row, in server order.
    pub fn rows(&self) -> &[RankedEntity] {
        &self.rows
    }

    /// Rows matching the search term, in the active sort order.
    pub fn visible_rows(&self) -> Vec<&RankedEntity> {
        let mut rows: Vec<&RankedEntity> = match normalize_term(&self.term) {
            Some(term) => self
                .rows
                .iter()
                .filter(|r| identifier_matches(&r.entity.identifier, &term))
                .collect(),
            None => self.rows.iter().collect(),
        };
        self.sort.apply(&mut rows, |r| &r.entity);
        rows
    }

    /// A non-blank term matched nothing on the loaded page.
    pub fn no_results(&self) -> bool {
        !self.loading
            && normalize_term(&self.term).is_some_and(|term| {
                !self
                    .rows
                    .iter()
                    .any(|r| identifier_matches(&r.entity.identifier, &term))
            })
    }
}
