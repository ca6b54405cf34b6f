/// Sort selection for the gallery
///
/// The selector offers three keys. Picking the key that is already active
/// flips the direction; picking another key starts it descending.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the working set is ordered by
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Number of likes
    #[default]
    Popular,
    /// Publication date
    New,
    /// Number of comments
    Discussed,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Popular, SortKey::New, SortKey::Discussed];

    /// Selector value as used by the filter form
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Popular => "popular",
            SortKey::New => "new",
            SortKey::Discussed => "discussed",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popular" => Ok(SortKey::Popular),
            "new" => Ok(SortKey::New),
            "discussed" => Ok(SortKey::Discussed),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Active sort key and direction
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    /// `false` = descending (most liked / newest / most discussed first)
    pub ascending: bool,
}

impl SortState {
    pub fn new(key: SortKey, ascending: bool) -> Self {
        Self { key, ascending }
    }

    /// State after the user picks `key` in the selector
    pub fn select(self, key: SortKey) -> Self {
        if key == self.key {
            Self { key, ascending: !self.ascending }
        } else {
            Self { key, ascending: false }
        }
    }

    /// Back to the default (popular, descending)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_popular_descending() {
        let sort = SortState::default();
        assert_eq!(sort.key, SortKey::Popular);
        assert!(!sort.ascending);
    }

    #[test]
    fn test_same_key_toggles() {
        let sort = SortState::default().select(SortKey::Popular);
        assert!(sort.ascending);

        let sort = sort.select(SortKey::Popular);
        assert_eq!(sort, SortState::default());
    }

    #[test]
    fn test_other_key_starts_descending() {
        let sort = SortState::new(SortKey::Popular, true).select(SortKey::New);
        assert_eq!(sort, SortState::new(SortKey::New, false));
    }

    #[test]
    fn test_key_names() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!(" Discussed ".parse::<SortKey>().unwrap(), SortKey::Discussed);
        assert!("oldest".parse::<SortKey>().is_err());
    }
}
