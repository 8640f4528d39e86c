//! Ordered access levels used for authorization comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Privilege rank of a user, lowest to highest.
///
/// Comparisons go through the derived `Ord`, so gating logic compares
/// numeric rank rather than identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    /// No persisted record exists for the user.
    Unregistered,
    /// Default rank for a persisted user.
    Registered,
    /// Trusted user with moderation privileges.
    Moderator,
    /// Server administrator.
    Administrator,
    /// Bot developer; exempt from the administrator ratchet.
    Developer,
}

impl AccessLevel {
    /// Numeric rank, for logging and storage.
    pub const fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unregistered => "UNREGISTERED",
            Self::Registered => "REGISTERED",
            Self::Moderator => "MODERATOR",
            Self::Administrator => "ADMINISTRATOR",
            Self::Developer => "DEVELOPER",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_totally_ordered() {
        assert!(AccessLevel::Unregistered < AccessLevel::Registered);
        assert!(AccessLevel::Registered < AccessLevel::Moderator);
        assert!(AccessLevel::Moderator < AccessLevel::Administrator);
        assert!(AccessLevel::Administrator < AccessLevel::Developer);
    }

    #[test]
    fn test_rank_matches_order() {
        assert_eq!(AccessLevel::Unregistered.rank(), 0);
        assert_eq!(AccessLevel::Developer.rank(), 4);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&AccessLevel::Administrator).unwrap();
        assert_eq!(json, "\"ADMINISTRATOR\"");
        let level: AccessLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(level, AccessLevel::Administrator);
    }
}
