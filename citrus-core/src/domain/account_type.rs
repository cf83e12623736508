//! Account type domain model

use serde::{Deserialize, Serialize};

use super::ids::AccountTypeId;

/// Ids of the built-in guest-mode account types. These cannot be deleted;
/// remote mode never injects them (the server list is sole source of truth).
pub const BUILTIN_TYPE_IDS: [&str; 4] = ["type-1", "type-2", "type-3", "type-4"];

/// Visual theme tag for an account type card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Blue,
    Emerald,
    Orange,
    Purple,
    Rose,
    Slate,
    Indigo,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Blue => "blue",
            Theme::Emerald => "emerald",
            Theme::Orange => "orange",
            Theme::Purple => "purple",
            Theme::Rose => "rose",
            Theme::Slate => "slate",
            Theme::Indigo => "indigo",
        }
    }

    /// Parse a theme name, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Some(Theme::Blue),
            "emerald" => Some(Theme::Emerald),
            "orange" => Some(Theme::Orange),
            "purple" => Some(Theme::Purple),
            "rose" => Some(Theme::Rose),
            "slate" => Some(Theme::Slate),
            "indigo" => Some(Theme::Indigo),
            _ => None,
        }
    }
}

/// A user-defined or built-in account type label.
///
/// The label is the join key used by `Account::account_type`; there is no
/// referential integrity, so deleting a type leaves accounts using its label
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountType {
    pub id: AccountTypeId,
    pub label: String,
    pub theme: Theme,
}

impl AccountType {
    /// Create a new custom type with a generated id
    pub fn new(label: impl Into<String>, theme: Theme) -> Self {
        Self {
            id: AccountTypeId::generate(),
            label: label.into(),
            theme,
        }
    }

    /// True for the fixed guest-mode default types, which are immutable
    pub fn is_builtin(id: &AccountTypeId) -> bool {
        BUILTIN_TYPE_IDS.contains(&id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_roundtrip() {
        assert_eq!(Theme::parse("emerald"), Some(Theme::Emerald));
        assert_eq!(Theme::parse(" Indigo "), Some(Theme::Indigo));
        assert_eq!(Theme::parse("magenta"), None);
    }

    #[test]
    fn test_theme_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Rose).unwrap(), "\"rose\"");
    }

    #[test]
    fn test_builtin_detection() {
        assert!(AccountType::is_builtin(&AccountTypeId::from("type-1")));
        assert!(!AccountType::is_builtin(&AccountTypeId::from("type-99")));
        let custom = AccountType::new("Holiday", Theme::Purple);
        assert!(!AccountType::is_builtin(&custom.id));
    }
}
