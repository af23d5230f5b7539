//! Search command handler.

use tabled::Tabled;

use impact_core::{Backend, Suggestion};

use crate::cli::{GlobalOpts, OutputFormat, SearchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Identifier")]
    identifier: String,
    #[tabled(rename = "Index")]
    index: u32,
    #[tabled(rename = "Link")]
    url: String,
}

impl From<&Suggestion> for SuggestionRow {
    fn from(s: &Suggestion) -> Self {
        Self {
            identifier: s.identifier.clone(),
            index: s.index,
            url: util::or_dash(s.url.as_deref()),
        }
    }
}

pub async fn handle(
    backend: &Backend,
    args: SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let hits = util::with_spinner(
        "Searching",
        global.quiet,
        backend.search(&args.site, &args.query),
    )
    .await?;

    if hits.is_empty() && matches!(global.output, OutputFormat::Table) {
        output::print_note(
            &format!("No matches for '{}' on {}", args.query.trim(), args.site),
            global.quiet,
        );
        return Ok(());
    }

    let out = output::render_list(
        &global.output,
        &hits,
        |s| SuggestionRow::from(s),
        |s| s.identifier.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
