//! Site command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use impact_core::format::{percent, thousands};
use impact_core::{Backend, BoxPlotSummary, Site, box_plot, histogram_bars};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const BAR_WIDTH: usize = 30;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Site")]
    name: String,
    #[tabled(rename = "Ranks")]
    entity: String,
    #[tabled(rename = "By")]
    metric: String,
    #[tabled(rename = "Tracked")]
    tracked: String,
    #[tabled(rename = "Median")]
    median: String,
}

impl From<&Arc<Site>> for SiteRow {
    fn from(s: &Arc<Site>) -> Self {
        Self {
            name: s.name.clone(),
            entity: s.entity_name.clone(),
            metric: s.metric_name.clone(),
            tracked: s.coverage.map_or_else(
                || "-".into(),
                |c| format!("{} / {}", thousands(c.current), thousands(c.target)),
            ),
            median: util::stat(s.stats.median),
        }
    }
}

/// `sites show` payload for the structured formats.
#[derive(Serialize)]
struct SiteDetail<'a> {
    #[serde(flatten)]
    site: &'a Site,
    box_plot: Option<BoxPlotSummary>,
}

// ── Detail view ─────────────────────────────────────────────────────

fn detail(d: &SiteDetail<'_>, color: bool) -> String {
    let site = d.site;
    let mut out = String::new();

    let title = output::heading(&site.name, color);
    let _ = writeln!(out, "{}", output::paint(&title, site.primary_color, color));
    if let Some(ref desc) = site.description {
        let _ = writeln!(out, "{desc}");
    }
    if let Some(ref about) = site.index_description {
        let _ = writeln!(out, "{}", output::muted(about, color));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  Ranks      {} by {}", site.entity_name, site.metric_name);
    if let Some(c) = site.coverage {
        let ratio = c.ratio().unwrap_or(0.0);
        let _ = writeln!(
            out,
            "  Tracked    {} / {}  {} {}",
            thousands(c.current),
            thousands(c.target),
            output::paint(&util::bar(ratio, 20), site.secondary_color, color),
            percent(ratio * 100.0)
        );
    }

    let stats = &site.stats;
    if stats.is_empty() {
        let _ = writeln!(out, "\n  {}", output::muted("No statistics published yet.", color));
        return out.trim_end().to_owned();
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", output::heading("Statistics", color));
    let _ = writeln!(out, "  Mean       {}", util::stat(stats.mean));
    let _ = writeln!(out, "  Median     {}", util::stat(stats.median));
    let _ = writeln!(out, "  Std dev    {}", util::stat(stats.std_dev));
    let _ = writeln!(
        out,
        "  Quartiles  {} / {}",
        util::stat(stats.first_quartile),
        util::stat(stats.third_quartile)
    );

    let bars = histogram_bars(&stats.histogram);
    if !bars.is_empty() {
        let tallest = bars.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        let label_width = bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}", output::heading("Distribution", color));
        for b in &bars {
            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            let fraction = b.count as f64 / tallest as f64;
            let _ = writeln!(
                out,
                "  {:>label_width$}  {} {} ({})",
                b.label,
                output::paint(&util::bar(fraction, BAR_WIDTH), site.primary_color, color),
                thousands(b.count),
                percent(b.percentage),
            );
        }
    }

    if let Some(ref bp) = d.box_plot {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  {}  min {:.1} | q1 {:.1} | median {:.1} | q3 {:.1} | max {:.1}",
            output::heading("Box plot", color),
            bp.min,
            bp.first_quartile,
            bp.median,
            bp.third_quartile,
            bp.max
        );
    }

    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backend: &Backend,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SitesCommand::List { filter } => {
            let all =
                util::with_spinner("Loading sites", global.quiet, backend.refresh_sites()).await?;
            let sites: Vec<Arc<Site>> = match filter.as_deref() {
                Some(query) => all.iter().filter(|s| s.name_matches(query)).cloned().collect(),
                None => all.to_vec(),
            };
            let out = output::render_list(
                &global.output,
                &sites,
                |s| SiteRow::from(s),
                |s| s.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Show { site } => {
            let site = util::with_spinner("Loading site", global.quiet, backend.site(&site)).await?;
            let color = output::should_color(&global.color);
            let payload = SiteDetail {
                box_plot: box_plot(&site.stats),
                site: &site,
            };
            let out = output::render_single(
                &global.output,
                &payload,
                |d| detail(d, color),
                |d| d.site.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
