//! Ranking command handler.

use chrono::Utc;
use tabled::Tabled;

use impact_core::format::{age, thousands};
use impact_core::{Backend, RankedEntity, RankingView, SortDirection, SortKey, SortState};

use crate::cli::{GlobalOpts, OutputFormat, RankingArgs, SortColumn};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RankingRow {
    #[tabled(rename = "#")]
    rank: u64,
    #[tabled(rename = "Identifier")]
    identifier: String,
    #[tabled(rename = "Index")]
    index: u32,
    #[tabled(rename = "Metrics")]
    metrics: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&&RankedEntity> for RankingRow {
    fn from(r: &&RankedEntity) -> Self {
        let now = Utc::now();
        Self {
            rank: r.rank,
            identifier: r.entity.identifier.clone(),
            index: r.entity.index,
            metrics: thousands(r.entity.total_metrics),
            updated: util::or_dash(r.entity.last_updated_at.map(|t| age(t, now))),
        }
    }
}

fn sort_state(column: SortColumn, ascending: bool) -> SortState {
    let key = match column {
        SortColumn::Index => SortKey::Index,
        SortColumn::Metrics => SortKey::TotalMetrics,
        SortColumn::Identifier => SortKey::Identifier,
    };
    let direction = if ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    SortState::new(key, direction)
}

pub async fn handle(
    backend: &Backend,
    args: RankingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let per_page = args.per_page.unwrap_or(backend.config().per_page);

    // Unknown sites fail here, whatever the ranking endpoint would answer.
    let site = util::with_spinner("Loading sites", global.quiet, backend.site(&args.site)).await?;

    let mut view = RankingView::new(site.name.as_str(), per_page);
    view.set_sort(sort_state(args.sort, args.asc));
    if let Some(term) = args.search {
        view.set_search_term(term);
    }

    let ticket = view.begin_load(args.page);
    let page = util::with_spinner(
        "Loading ranking",
        global.quiet,
        backend.ranking(&site.name, args.page, per_page),
    )
    .await?;
    view.apply_page(ticket, page);

    let rows = view.visible_rows();
    let out = output::render_list(
        &global.output,
        &rows,
        |r| RankingRow::from(r),
        |r| r.entity.identifier.clone(),
    );
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) {
        if view.no_results() {
            output::print_note(
                &format!("No entries on this page match '{}'", view.search_term().trim()),
                global.quiet,
            );
        }
        let pager = view.pager();
        output::print_note(
            &format!(
                "Page {} of {} ({} total)",
                pager.page(),
                pager.total_pages(),
                thousands(pager.total_items())
            ),
            global.quiet,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_flags_map_to_state() {
        let s = sort_state(SortColumn::Metrics, false);
        assert_eq!(s.key, SortKey::TotalMetrics);
        assert_eq!(s.direction, SortDirection::Descending);

        let s = sort_state(SortColumn::Identifier, true);
        assert_eq!(s.key, SortKey::Identifier);
        assert_eq!(s.direction, SortDirection::Ascending);
    }
}
