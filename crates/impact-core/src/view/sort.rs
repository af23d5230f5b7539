// ── Client-side sorting of a ranking page ──

use std::cmp::Ordering;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use crate::model::Entity;

/// Sortable ranking column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Index,
    #[strum(to_string = "metrics", serialize = "total-metrics")]
    TotalMetrics,
    Identifier,
}

impl SortKey {
    fn compare(self, a: &Entity, b: &Entity) -> Ordering {
        match self {
            Self::Index => a.index.cmp(&b.index),
            Self::TotalMetrics => a.total_metrics.cmp(&b.total_metrics),
            Self::Identifier => a.identifier.to_lowercase().cmp(&b.identifier.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Active sort column and direction. Defaults to index, descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header click semantics: the active column flips from descending to
    /// ascending; anything else (another column, or ascending) goes to
    /// descending on `key`.
    pub fn toggle(&mut self, key: SortKey) {
        self.direction = if self.key == key && self.direction == SortDirection::Descending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        self.key = key;
    }

    /// Arrow for `key`'s column header, if it is the active one.
    pub fn indicator(&self, key: SortKey) -> &'static str {
        if self.key == key {
            self.direction.arrow()
        } else {
            ""
        }
    }

    /// Order two entities. Ties keep their incoming order (stable sort).
    pub fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        let ord = self.key.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    /// Sort in place with `compare`.
    pub fn apply<T, F>(&self, rows: &mut [T], entity: F)
    where
        F: Fn(&T) -> &Entity,
    {
        rows.sort_by(|a, b| self.compare(entity(a), entity(b)));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entity(identifier: &str, index: u32, total: u64) -> Entity {
        Entity {
            id: None,
            identifier: identifier.into(),
            index,
            total_metrics: total,
            created_at: None,
            last_updated_at: None,
            url: None,
        }
    }

    fn names(rows: &[Entity]) -> Vec<&str> {
        rows.iter().map(|e| e.identifier.as_str()).collect()
    }

    #[test]
    fn toggle_flips_active_column_then_resets_on_new_column() {
        let mut sort = SortState::default();
        assert_eq!(sort, SortState::new(SortKey::Index, SortDirection::Descending));

        sort.toggle(SortKey::Index);
        assert_eq!(sort.direction, SortDirection::Ascending);

        sort.toggle(SortKey::Index);
        assert_eq!(sort.direction, SortDirection::Descending);

        sort.toggle(SortKey::Index);
        sort.toggle(SortKey::TotalMetrics);
        assert_eq!(
            sort,
            SortState::new(SortKey::TotalMetrics, SortDirection::Descending)
        );
    }

    #[test]
    fn toggling_twice_reverses_consistently() {
        let mut rows = vec![entity("a", 3, 10), entity("b", 9, 5), entity("c", 6, 99)];
        let mut sort = SortState::default();

        sort.apply(&mut rows, |e| e);
        assert_eq!(names(&rows), ["b", "c", "a"]);

        sort.toggle(SortKey::Index);
        sort.apply(&mut rows, |e| e);
        assert_eq!(names(&rows), ["a", "c", "b"]);

        sort.toggle(SortKey::TotalMetrics);
        sort.apply(&mut rows, |e| e);
        assert_eq!(names(&rows), ["c", "a", "b"]);
    }

    #[test]
    fn ties_keep_server_order() {
        let mut rows = vec![entity("x", 5, 1), entity("y", 5, 2), entity("z", 5, 3)];
        SortState::default().apply(&mut rows, |e| e);
        assert_eq!(names(&rows), ["x", "y", "z"]);
    }

    #[test]
    fn identifier_sort_ignores_case() {
        let mut rows = vec![entity("bob", 1, 1), entity("Alice", 1, 1), entity("carol", 1, 1)];
        SortState::new(SortKey::Identifier, SortDirection::Ascending).apply(&mut rows, |e| e);
        assert_eq!(names(&rows), ["Alice", "bob", "carol"]);
    }

    #[test]
    fn sort_key_parses_aliases() {
        assert_eq!("index".parse::<SortKey>().unwrap(), SortKey::Index);
        assert_eq!("metrics".parse::<SortKey>().unwrap(), SortKey::TotalMetrics);
        assert_eq!(
            "total-metrics".parse::<SortKey>().unwrap(),
            SortKey::TotalMetrics
        );
        assert_eq!("Identifier".parse::<SortKey>().unwrap(), SortKey::Identifier);
        assert_eq!(SortKey::TotalMetrics.to_string(), "metrics");
    }
}
