// ── Site domain type ──

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A leaderboard site (one "thing" being H-indexed).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    /// Route identifier; also the display name.
    pub name: String,
    pub description: Option<String>,
    /// What the index means on this site, shown above the ranking.
    pub index_description: Option<String>,
    /// Singular noun for a ranked entity ("User", "Channel").
    pub entity_name: String,
    /// Plural noun for the counted metric ("upvotes", "views").
    pub metric_name: String,
    pub primary_color: Option<Rgb>,
    pub secondary_color: Option<Rgb>,
    pub coverage: Option<Coverage>,
    pub stats: SiteStats,
}

impl Site {
    /// Case-insensitive substring match on the site name.
    pub fn name_matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Indexing progress: how many entities are tracked versus targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub current: u64,
    pub target: u64,
}

impl Coverage {
    /// Fraction in `0.0..=1.0`; `None` when no target is set.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn ratio(&self) -> Option<f64> {
        (self.target > 0).then(|| (self.current as f64 / self.target as f64).clamp(0.0, 1.0))
    }
}

/// Precomputed index distribution for a site.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub first_quartile: Option<f64>,
    pub third_quartile: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub histogram: Vec<HistogramBucket>,
}

impl SiteStats {
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
            && self.mean.is_none()
            && self.median.is_none()
            && self.first_quartile.is_none()
            && self.third_quartile.is_none()
    }

    /// Total entities across all buckets.
    pub fn population(&self) -> u64 {
        self.histogram.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub start: f64,
    pub end: f64,
    pub count: u64,
    /// Share of the population, 0-100.
    pub percentage: f64,
}

impl HistogramBucket {
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

// ── Rgb ──────────────────────────────────────────────────────────────

/// A display color parsed from a `#rrggbb` / `#rgb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0:?}")]
pub struct ParseRgbError(pub String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let err = || ParseRgbError(s.to_owned());
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            3 => {
                let short = |digit: &str| channel(digit).map(|v| v * 17);
                Ok(Self {
                    r: short(&hex[0..1])?,
                    g: short(&hex[1..2])?,
                    b: short(&hex[2..3])?,
                })
            }
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(
            "#ff4500".parse::<Rgb>().unwrap(),
            Rgb {
                r: 255,
                g: 69,
                b: 0
            }
        );
        assert_eq!(
            "0af".parse::<Rgb>().unwrap(),
            Rgb {
                r: 0,
                g: 170,
                b: 255
            }
        );
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn display_round_trips_to_lower_hex() {
        let c: Rgb = "#FF4500".parse().unwrap();
        assert_eq!(c.to_string(), "#ff4500");
    }

    #[test]
    fn coverage_ratio_clamps() {
        let cov = Coverage {
            current: 150,
            target: 100,
        };
        assert_eq!(cov.ratio(), Some(1.0));
        let none = Coverage {
            current: 5,
            target: 0,
        };
        assert_eq!(none.ratio(), None);
    }
}
