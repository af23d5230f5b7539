//! Shared helpers for command handlers.

use std::future::Future;

use crate::output;

/// Await `fut` behind a spinner that is cleared before anything is printed.
pub async fn with_spinner<T>(message: &str, quiet: bool, fut: impl Future<Output = T>) -> T {
    let spinner = output::spinner(message, quiet);
    let result = fut.await;
    spinner.finish_and_clear();
    result
}

/// `Some(v)` as a string, `None` as a dash.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

/// One-decimal float, or a dash.
pub fn stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.1}"))
}

/// Horizontal bar of `width` cells filled to `fraction` (clamped to 0..=1).
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let mut out = "█".repeat(filled);
    out.push_str(&"░".repeat(width - filled));
    out
}
