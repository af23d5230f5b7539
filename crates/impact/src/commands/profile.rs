//! Profile command handler.

use std::fmt::Write as _;

use chrono::Utc;

use impact_core::format::{age, thousands, top_share};
use impact_core::{Backend, CoreError, Profile, Site, not_found_message};

use crate::cli::{GlobalOpts, ProfileArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(profile: &Profile, site: Option<&Site>, color: bool) -> String {
    let entity = &profile.entity;
    let metric = site.map_or("metrics", |s| s.metric_name.as_str());
    let accent = site.and_then(|s| s.primary_color);
    let now = Utc::now();

    let mut out = String::new();
    let title = output::heading(&entity.identifier, color);
    let _ = writeln!(out, "{}", output::paint(&title, accent, color));
    let _ = writeln!(out, "{}", output::muted(&profile.site, color));
    let _ = writeln!(out);
    let _ = writeln!(out, "  Index      {}", entity.index);
    let _ = writeln!(out, "  {:<10} {}", capitalize(metric), thousands(entity.total_metrics));
    if let Some(p) = profile.percentile {
        let _ = writeln!(
            out,
            "  Standing   {} {}",
            output::paint(&util::bar(p / 100.0, 20), accent, color),
            top_share(p)
        );
    }
    if let Some(t) = entity.created_at {
        let since = t.format("%Y-%m-%d");
        let _ = writeln!(out, "  Tracked    since {since} ({})", age(t, now));
    }
    if let Some(t) = entity.last_updated_at {
        let _ = writeln!(out, "  Updated    {}", age(t, now));
    }
    if let Some(ref url) = entity.url {
        let _ = writeln!(out, "  Link       {url}");
    }
    out.trim_end().to_owned()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

pub async fn handle(
    backend: &Backend,
    args: ProfileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let site = util::with_spinner("Loading sites", global.quiet, backend.site(&args.site)).await?;

    let result = util::with_spinner(
        "Loading profile",
        global.quiet,
        backend.profile(&site.name, &args.identifier),
    )
    .await;

    let profile = match result {
        Ok(profile) => profile,
        Err(CoreError::EntityNotFound { site: name, identifier }) => {
            let entity_name = site.entity_name.as_str();
            return Err(CliError::NotFound {
                resource_type: format!("{name} {}", entity_name.to_lowercase()),
                hint: not_found_message(entity_name, &identifier, &name),
                identifier,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &profile,
        |p| detail(p, Some(site.as_ref()), color),
        |p| p.entity.identifier.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use impact_core::Entity;

    use super::*;

    fn profile() -> Profile {
        Profile {
            site: "reddit".into(),
            entity: Entity {
                id: None,
                identifier: "spez".into(),
                index: 42,
                total_metrics: 1_234_567,
                created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
                last_updated_at: None,
                url: Some("https://reddit.com/u/spez".into()),
            },
            percentile: Some(99.5),
        }
    }

    #[test]
    fn detail_shows_index_and_standing() {
        let text = detail(&profile(), None, false);
        assert!(text.starts_with("spez\nreddit"));
        assert!(text.contains("Index      42"));
        assert!(text.contains("Metrics    1,234,567"));
        assert!(text.contains("top 0.5%"));
        assert!(text.contains("since 2024-03-01"));
        assert!(text.contains("https://reddit.com/u/spez"));
        assert!(!text.contains("Updated"));
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("upvotes"), "Upvotes");
        assert_eq!(capitalize(""), "");
    }
}
