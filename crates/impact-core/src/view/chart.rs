// ── Chart reshaping ──
//
// Turns a site's histogram and summary statistics into the series the
// chart widgets draw: one bar per bucket, and a five-number summary with
// bin outline for the box plot.

use serde::Serialize;

use crate::format::bucket_label;
use crate::model::{HistogramBucket, SiteStats};

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBar {
    /// `"{start}-{end}"`, both rounded to integers.
    pub label: String,
    pub count: u64,
    /// Share of the population, 0-100.
    pub percentage: f64,
}

pub fn histogram_bars(buckets: &[HistogramBucket]) -> Vec<HistogramBar> {
    buckets
        .iter()
        .map(|b| HistogramBar {
            label: bucket_label(b.start, b.end),
            count: b.count,
            percentage: b.percentage,
        })
        .collect()
}

/// A point on the box plot's density outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinPoint {
    pub value: f64,
    pub count: u64,
}

/// Five-number summary plus the per-bucket outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotSummary {
    pub min: f64,
    pub first_quartile: f64,
    pub median: f64,
    pub third_quartile: f64,
    pub max: f64,
    /// Always empty: the backend publishes no per-entity outliers.
    pub outliers: Vec<f64>,
    pub bins: Vec<BinPoint>,
}

/// Build the box plot for a site.
///
/// Published statistics win; anything missing is estimated from the
/// histogram by linear interpolation over cumulative counts. Returns `None`
/// when there is neither a histogram nor a full set of statistics. The
/// result always satisfies `min <= q1 <= median <= q3 <= max`.
pub fn box_plot(stats: &SiteStats) -> Option<BoxPlotSummary> {
    let buckets = &stats.histogram;

    let hist_min = buckets.iter().map(|b| b.start).reduce(f64::min);
    let hist_max = buckets.iter().map(|b| b.end).reduce(f64::max);

    let min = stats.min.or(hist_min)?;
    let max = stats.max.or(hist_max)?;
    let q1 = stats
        .first_quartile
        .or_else(|| histogram_quantile(buckets, 0.25))?;
    let median = stats.median.or_else(|| histogram_quantile(buckets, 0.5))?;
    let q3 = stats
        .third_quartile
        .or_else(|| histogram_quantile(buckets, 0.75))?;

    // Mixed published/estimated values can disagree; force monotone order.
    let first_quartile = q1.max(min);
    let median = median.max(first_quartile);
    let third_quartile = q3.max(median);
    let max = max.max(third_quartile);

    Some(BoxPlotSummary {
        min,
        first_quartile,
        median,
        third_quartile,
        max,
        outliers: Vec::new(),
        bins: buckets
            .iter()
            .map(|b| BinPoint {
                value: b.midpoint(),
                count: b.count,
            })
            .collect(),
    })
}

/// Estimate the `q` quantile (0..=1) from bucket counts.
///
/// Buckets are assumed sorted by start. With no counts at all, falls back to
/// picking bucket boundaries by position.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn histogram_quantile(buckets: &[HistogramBucket], q: f64) -> Option<f64> {
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    if total == 0 {
        let last = buckets.len().checked_sub(1)?;
        let idx = ((buckets.len() as f64 * q).floor() as usize).min(last);
        let bucket = buckets.get(idx)?;
        return Some(if q <= 0.5 { bucket.start } else { bucket.end });
    }

    let target = q * total as f64;
    let mut cumulative = 0.0;
    for bucket in buckets.iter().filter(|b| b.count > 0) {
        let count = bucket.count as f64;
        if cumulative + count >= target {
            let within = ((target - cumulative) / count).clamp(0.0, 1.0);
            return Some(bucket.start + within * (bucket.end - bucket.start));
        }
        cumulative += count;
    }
    buckets.last().map(|b| b.end)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bucket(start: f64, end: f64, count: u64) -> HistogramBucket {
        HistogramBucket {
            start,
            end,
            count,
            percentage: 0.0,
        }
    }

    fn stats(histogram: Vec<HistogramBucket>) -> SiteStats {
        SiteStats {
            histogram,
            ..SiteStats::default()
        }
    }

    #[test]
    fn bars_carry_rounded_labels() {
        let bars = histogram_bars(&[
            HistogramBucket {
                start: 0.0,
                end: 4.4,
                count: 7,
                percentage: 70.0,
            },
            HistogramBucket {
                start: 4.4,
                end: 9.0,
                count: 3,
                percentage: 30.0,
            },
        ]);
        assert_eq!(bars[0].label, "0-4");
        assert_eq!(bars[1].label, "4-9");
        assert_eq!(bars[1].count, 3);
        assert!((bars[0].percentage - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quartiles_interpolate_cumulative_counts() {
        let plot = box_plot(&stats(vec![
            bucket(0.0, 10.0, 50),
            bucket(10.0, 20.0, 30),
            bucket(20.0, 30.0, 20),
        ]))
        .unwrap();

        assert!((plot.min - 0.0).abs() < 1e-9);
        assert!((plot.first_quartile - 5.0).abs() < 1e-9);
        assert!((plot.median - 10.0).abs() < 1e-9);
        assert!((plot.third_quartile - (10.0 + 25.0 / 30.0 * 10.0)).abs() < 1e-9);
        assert!((plot.max - 30.0).abs() < 1e-9);
        assert!(plot.outliers.is_empty());
        assert_eq!(
            plot.bins,
            vec![
                BinPoint {
                    value: 5.0,
                    count: 50
                },
                BinPoint {
                    value: 15.0,
                    count: 30
                },
                BinPoint {
                    value: 25.0,
                    count: 20
                },
            ]
        );
    }

    #[test]
    fn published_statistics_win() {
        let mut s = stats(vec![bucket(0.0, 10.0, 5), bucket(10.0, 20.0, 5)]);
        s.median = Some(7.0);
        s.first_quartile = Some(3.0);
        s.third_quartile = Some(12.0);
        let plot = box_plot(&s).unwrap();
        assert!((plot.median - 7.0).abs() < f64::EPSILON);
        assert!((plot.first_quartile - 3.0).abs() < f64::EPSILON);
        assert!((plot.third_quartile - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_is_monotone_when_sources_disagree() {
        let mut s = stats(vec![bucket(0.0, 10.0, 1), bucket(10.0, 100.0, 99)]);
        s.median = Some(2.0);
        let plot = box_plot(&s).unwrap();
        assert!(plot.min <= plot.first_quartile);
        assert!(plot.first_quartile <= plot.median);
        assert!(plot.median <= plot.third_quartile);
        assert!(plot.third_quartile <= plot.max);
    }

    #[test]
    fn zero_counts_fall_back_to_positions() {
        let plot = box_plot(&stats(vec![
            bucket(0.0, 1.0, 0),
            bucket(1.0, 2.0, 0),
            bucket(2.0, 3.0, 0),
            bucket(3.0, 4.0, 0),
        ]))
        .unwrap();
        assert!((plot.first_quartile - 1.0).abs() < f64::EPSILON);
        assert!((plot.median - 2.0).abs() < f64::EPSILON);
        assert!((plot.third_quartile - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nothing_to_plot() {
        assert!(box_plot(&SiteStats::default()).is_none());
    }
}
