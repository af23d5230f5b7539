//! Screen identifiers.

use std::fmt;

/// Primary screens, navigable by number keys 1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Home,
    Rankings,
    Profile,
}

impl ScreenId {
    /// Tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Home, Self::Rankings, Self::Profile];

    pub fn number(self) -> u8 {
        match self {
            Self::Home => 1,
            Self::Rankings => 2,
            Self::Profile => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Home),
            2 => Some(Self::Rankings),
            3 => Some(Self::Profile),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Where `Esc` leads. Home has nowhere to go.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Home => None,
            Self::Rankings => Some(Self::Home),
            Self::Profile => Some(Self::Rankings),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Sites",
            Self::Rankings => "Rankings",
            Self::Profile => "Profile",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_round_trip() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(4), None);
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(ScreenId::Profile.next(), ScreenId::Home);
        assert_eq!(ScreenId::Home.prev(), ScreenId::Profile);
    }

    #[test]
    fn escape_walks_back_to_home() {
        assert_eq!(ScreenId::Profile.parent(), Some(ScreenId::Rankings));
        assert_eq!(ScreenId::Rankings.parent(), Some(ScreenId::Home));
        assert_eq!(ScreenId::Home.parent(), None);
    }
}
