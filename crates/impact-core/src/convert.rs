// ── Wire → domain conversion ──
//
// Maps `impact-api` payloads into `model` types: label defaults, color
// parsing, timestamp normalization, and pagination fix-ups.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::trace;

use impact_api::{ApiEntity, ApiHistogramBucket, ApiSite, ApiSuggestion, ApiTopResponse};

use crate::model::{
    Coverage, Entity, HistogramBucket, Pagination, RankingPage, Rgb, Site, SiteStats, Suggestion,
};

const DEFAULT_ENTITY_NAME: &str = "Entity";
const DEFAULT_METRIC_NAME: &str = "metrics";

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 as well as naive ISO-8601 (with or without fractional
/// seconds), which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .ok()
}

fn parse_color(raw: Option<&str>) -> Option<Rgb> {
    let raw = raw?;
    match raw.parse() {
        Ok(rgb) => Some(rgb),
        Err(e) => {
            trace!(error = %e, "ignoring site color");
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<ApiHistogramBucket> for HistogramBucket {
    fn from(b: ApiHistogramBucket) -> Self {
        Self {
            start: b.bucket_start,
            end: b.bucket_end,
            count: b.count,
            percentage: b.percentage,
        }
    }
}

impl From<ApiSite> for Site {
    fn from(s: ApiSite) -> Self {
        let raw_stats = s.stats();
        let primary_color = parse_color(s.primary_color.as_deref());
        let secondary_color = parse_color(s.secondary_color.as_deref());
        let coverage = match (s.current_entities, s.target_entities) {
            (Some(current), Some(target)) => Some(Coverage { current, target }),
            (Some(current), None) => Some(Coverage { current, target: 0 }),
            _ => None,
        };

        let mut histogram: Vec<HistogramBucket> =
            s.histogram.into_iter().map(HistogramBucket::from).collect();
        histogram.sort_by(|a, b| a.start.total_cmp(&b.start));

        Self {
            name: s.name,
            description: non_empty(s.description),
            index_description: non_empty(s.index_description),
            entity_name: non_empty(s.entity_name).unwrap_or_else(|| DEFAULT_ENTITY_NAME.into()),
            metric_name: non_empty(s.metric_name).unwrap_or_else(|| DEFAULT_METRIC_NAME.into()),
            primary_color,
            secondary_color,
            coverage,
            stats: SiteStats {
                mean: raw_stats.mean,
                median: raw_stats.median,
                std_dev: raw_stats.std_dev,
                first_quartile: raw_stats.first_quartile,
                third_quartile: raw_stats.third_quartile,
                min: raw_stats.min,
                max: raw_stats.max,
                histogram,
            },
        }
    }
}

impl From<ApiEntity> for Entity {
    fn from(e: ApiEntity) -> Self {
        Self {
            id: e.id,
            created_at: e.created_at.as_deref().and_then(parse_timestamp),
            last_updated_at: e.last_updated_at.as_deref().and_then(parse_timestamp),
            identifier: e.identifier,
            index: e.index,
            total_metrics: e.total_metrics,
            url: non_empty(e.url),
        }
    }
}

impl From<ApiSuggestion> for Suggestion {
    fn from(s: ApiSuggestion) -> Self {
        Self {
            identifier: s.identifier,
            index: s.index,
            url: non_empty(s.url),
        }
    }
}

/// Build a `RankingPage`, filling pagination gaps from the request.
///
/// A missing page or page size falls back to what was asked for, and
/// `total_pages` is floored at 1.
pub fn ranking_page(
    site: &str,
    requested_page: u32,
    requested_per_page: u32,
    raw: ApiTopResponse,
) -> RankingPage {
    let p = raw.pagination;
    let pagination = Pagination {
        page: if p.page == 0 { requested_page } else { p.page },
        per_page: if p.per_page == 0 {
            requested_per_page
        } else {
            p.per_page
        },
        total_items: p.total_items,
        total_pages: p.total_pages.max(1),
    };
    RankingPage {
        site: site.to_owned(),
        entities: raw.entities.into_iter().map(Entity::from).collect(),
        pagination,
    }
}
