// ── Hover preview ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Color theme requested from the profile preview page.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Append `theme=<theme>` to a profile URL, using `&` if it already has a
/// query string.
pub fn preview_url(url: &str, theme: Theme) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}theme={theme}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_with_question_mark() {
        assert_eq!(
            preview_url("https://example.com/u/alice", Theme::Dark),
            "https://example.com/u/alice?theme=dark"
        );
    }

    #[test]
    fn appends_with_ampersand() {
        assert_eq!(
            preview_url("https://example.com/profile?id=7", Theme::Light),
            "https://example.com/profile?id=7&theme=light"
        );
    }
}
