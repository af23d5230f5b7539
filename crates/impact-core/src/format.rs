// ── Display formatting helpers ──
//
// Shared by the CLI tables and TUI widgets so both surfaces print numbers
// the same way.

use chrono::{DateTime, Utc};

/// Insert thousands separators: `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `"99.5%"`; one decimal place.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Percentile rendered as the share of entities ranked above: `99.5` → `"top 0.5%"`.
pub fn top_share(percentile: f64) -> String {
    let share = (100.0 - percentile).clamp(0.0, 100.0);
    if share < 0.1 {
        "top 0.1%".into()
    } else {
        format!("top {share:.1}%")
    }
}

/// Coarse relative age: `"just now"`, `"12m ago"`, `"3h ago"`, `"5d ago"`.
pub fn age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match secs {
        s if s < 60 => "just now".into(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 86_400 * 60 => format!("{}d ago", s / 86_400),
        s => format!("{}mo ago", s / (86_400 * 30)),
    }
}

/// Histogram bucket label: `"0-5"`.
pub fn bucket_label(start: f64, end: f64) -> String {
    format!("{start:.0}-{end:.0}")
}
