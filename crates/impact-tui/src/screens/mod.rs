//! Screen implementations. Each screen is a top-level Component.

pub mod home;
pub mod profile;
pub mod rankings;

use impact_core::BackendConfig;

use crate::component::Component;
use crate::screen::ScreenId;

pub fn create_screens(config: &BackendConfig) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Home, Box::new(home::HomeScreen::new())),
        (
            ScreenId::Rankings,
            Box::new(rankings::RankingsScreen::new(config)),
        ),
        (ScreenId::Profile, Box::new(profile::ProfileScreen::new())),
    ]
}

/// Move a list selection by `delta`, clamped to `0..len`. An empty list
/// has no selection.
pub(crate) fn step(selected: Option<usize>, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = selected.unwrap_or(0);
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta.unsigned_abs())
    };
    Some(next.min(len - 1))
}

/// Summary statistic to one decimal, `-` when unpublished.
pub(crate) fn stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.1}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_clamps_to_bounds() {
        assert_eq!(step(Some(0), 3, -1), Some(0));
        assert_eq!(step(Some(1), 3, 1), Some(2));
        assert_eq!(step(Some(2), 3, 1), Some(2));
        assert_eq!(step(None, 3, 1), Some(1));
        assert_eq!(step(Some(1), 3, isize::MIN), Some(0));
        assert_eq!(step(Some(0), 3, isize::MAX), Some(2));
        assert_eq!(step(Some(4), 0, 1), None);
    }

    #[test]
    fn stat_formats_or_dashes() {
        assert_eq!(stat(Some(4.26)), "4.3");
        assert_eq!(stat(None), "-");
    }
}
