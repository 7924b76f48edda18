//! Presentation view mode.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the current listing is rendered.
///
/// Presentation-only; has no effect on store data or ordering.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ViewMode {
    /// Card grid (default).
    #[default]
    Grid,
    /// Detail list.
    List,
}

impl ViewMode {
    /// Toggle between grid and list.
    pub fn toggle(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(ViewMode::Grid.toggle(), ViewMode::List);
        assert_eq!(ViewMode::List.toggle(), ViewMode::Grid);
    }

    #[test]
    fn test_parse() {
        assert_eq!(ViewMode::from_str("grid").unwrap(), ViewMode::Grid);
        assert_eq!(ViewMode::from_str("LIST").unwrap(), ViewMode::List);
        assert!(ViewMode::from_str("tiles").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ViewMode::Grid.to_string(), "grid");
        assert_eq!(ViewMode::List.to_string(), "list");
    }
}
