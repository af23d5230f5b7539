// Backend response types
//
// Shapes returned by the leaderboard backend. The backend is not owned by this
// client, so nearly every field uses `#[serde(default)]` and unknown fields are
// ignored. Any payload may arrive bare or wrapped in `{ "response": ... }`.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Strip the optional `{ "response": ... }` wrapper.
///
/// `/supported-sites` and the profile endpoint wrap their payload, ranking
/// pages usually do not. Only an object carrying a `response` key is
/// unwrapped; everything else is returned untouched.
pub fn strip_envelope(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map) if map.contains_key("response") => {
            map.remove("response").unwrap_or_default()
        }
        other => other,
    }
}

// ── Site ─────────────────────────────────────────────────────────────

/// A supported site from `GET /supported-sites`.
///
/// `name` doubles as the site's route identifier in every other endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSite {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub index_description: Option<String>,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub metric_name: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub target_entities: Option<u64>,
    #[serde(default)]
    pub current_entities: Option<u64>,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub median: Option<f64>,
    #[serde(default, alias = "stddev", alias = "std")]
    pub std_dev: Option<f64>,
    #[serde(default, alias = "q1", alias = "p25")]
    pub first_quartile: Option<f64>,
    #[serde(default, alias = "q3", alias = "p75")]
    pub third_quartile: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub histogram: Vec<ApiHistogramBucket>,
}

/// Index distribution bucket. `percentage` is 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiHistogramBucket {
    pub bucket_start: f64,
    pub bucket_end: f64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub percentage: f64,
}

/// Precomputed statistics carried inline on [`ApiSite`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ApiSiteStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub first_quartile: Option<f64>,
    pub third_quartile: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ApiSite {
    pub fn stats(&self) -> ApiSiteStats {
        ApiSiteStats {
            mean: self.mean,
            median: self.median,
            std_dev: self.std_dev,
            first_quartile: self.first_quartile,
            third_quartile: self.third_quartile,
            min: self.min,
            max: self.max,
        }
    }
}

// ── Entity ───────────────────────────────────────────────────────────

/// A ranked entity (user, channel, ...).
///
/// Timestamps are left as strings: the backend emits naive ISO-8601 without
/// an offset, and `impact-core` owns the parsing policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEntity {
    #[serde(default)]
    pub id: Option<String>,
    pub identifier: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub total_metrics: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_updated_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// ── Ranking ──────────────────────────────────────────────────────────

/// `GET /{site}/ranking/{page}/{per_page}` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiTopResponse {
    #[serde(default)]
    pub entities: Vec<ApiEntity>,
    #[serde(default)]
    pub pagination: ApiPagination,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u32,
}

// ── Profile ──────────────────────────────────────────────────────────

/// `GET /{site}/{account}` payload. A null `entity` means "not indexed".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiProfile {
    #[serde(default)]
    pub entity: Option<ApiEntity>,
    #[serde(default)]
    pub stats: Option<ApiProfileStats>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiProfileStats {
    #[serde(default)]
    pub percentile: Option<f64>,
}

// ── Search ───────────────────────────────────────────────────────────

/// A search hit from `GET /api/search/{site}?q=`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSuggestion {
    pub identifier: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub url: Option<String>,
}

/// The search endpoint answers with either a flat suggestion list or a
/// ranking-shaped page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SearchPayload {
    Suggestions(Vec<ApiSuggestion>),
    Page(ApiTopResponse),
}

impl SearchPayload {
    pub fn into_suggestions(self) -> Vec<ApiSuggestion> {
        match self {
            Self::Suggestions(list) => list,
            Self::Page(page) => page
                .entities
                .into_iter()
                .map(|e| ApiSuggestion {
                    identifier: e.identifier,
                    index: e.index,
                    url: e.url,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_accepts_wrapped_and_bare() {
        let wrapped = strip_envelope(json!({
            "response": { "entities": [{ "identifier": "alice", "index": 3 }] }
        }));
        let bare = strip_envelope(json!({
            "entities": [{ "identifier": "alice", "index": 3 }]
        }));
        let wrapped: ApiTopResponse = serde_json::from_value(wrapped).unwrap();
        let bare: ApiTopResponse = serde_json::from_value(bare).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(bare.entities[0].identifier, "alice");
    }

    #[test]
    fn null_response_decodes_as_none() {
        let value = strip_envelope(json!({ "response": null }));
        let sites: Option<Vec<ApiSite>> = serde_json::from_value(value).unwrap();
        assert!(sites.is_none());

        let value = strip_envelope(json!([]));
        let sites: Option<Vec<ApiSite>> = serde_json::from_value(value).unwrap();
        assert_eq!(sites, Some(vec![]));
    }

    #[test]
    fn bare_suggestion_list_is_not_mistaken_for_a_page() {
        let value = strip_envelope(json!([{ "identifier": "carol", "index": 2 }]));
        let payload: SearchPayload = serde_json::from_value(value).unwrap();
        assert_eq!(payload.into_suggestions()[0].identifier, "carol");
    }

    #[test]
    fn site_stat_aliases() {
        let site: ApiSite = serde_json::from_value(json!({
            "name": "reddit",
            "stddev": 2.5,
            "q1": 1.0,
            "p75": 9.0,
            "histogram": [
                { "bucket_start": 0, "bucket_end": 5, "count": 10, "percentage": 50.0 }
            ]
        }))
        .unwrap();
        let stats = site.stats();
        assert_eq!(stats.std_dev, Some(2.5));
        assert_eq!(stats.first_quartile, Some(1.0));
        assert_eq!(stats.third_quartile, Some(9.0));
        assert_eq!(site.histogram.len(), 1);
        assert!((site.histogram[0].bucket_end - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn search_page_flattens_to_suggestions() {
        let payload: SearchPayload = serde_json::from_value(json!({
            "entities": [{ "identifier": "bob", "index": 7, "url": "https://x/bob" }],
            "pagination": { "page": 1, "per_page": 10, "total_items": 1, "total_pages": 1 }
        }))
        .unwrap();
        let list = payload.into_suggestions();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].identifier, "bob");
        assert_eq!(list[0].index, 7);
    }
}
