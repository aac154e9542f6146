//! The closed set of credential kinds the meal planner knows about

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reverse-domain prefix shared by every credential identifier
pub const IDENTIFIER_PREFIX: &str = "com.mealplanner";

/// A named slot for one third-party API secret
///
/// Each kind maps to its own vault namespace (see [`identifier`](Self::identifier)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    /// Nutrition database (USDA FoodData Central) API key
    NutritionDatabase,
    /// OpenAI assistant provider
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic assistant provider
    Anthropic,
    /// Google Gemini assistant provider
    Gemini,
}

impl CredentialKind {
    /// Every kind, in display order
    pub const ALL: [CredentialKind; 4] = [
        CredentialKind::NutritionDatabase,
        CredentialKind::OpenAi,
        CredentialKind::Anthropic,
        CredentialKind::Gemini,
    ];

    /// The assistant provider kinds
    pub const ASSISTANTS: [CredentialKind; 3] = [
        CredentialKind::OpenAi,
        CredentialKind::Anthropic,
        CredentialKind::Gemini,
    ];

    /// Short stable name used in config files and host bindings
    pub fn slug(&self) -> &'static str {
        match self {
            CredentialKind::NutritionDatabase => "nutrition-database",
            CredentialKind::OpenAi => "openai",
            CredentialKind::Anthropic => "anthropic",
            CredentialKind::Gemini => "gemini",
        }
    }

    /// Reverse-domain identifier, used as the vault namespace
    pub fn identifier(&self) -> &'static str {
        match self {
            CredentialKind::NutritionDatabase => "com.mealplanner.nutrition-database",
            CredentialKind::OpenAi => "com.mealplanner.openai",
            CredentialKind::Anthropic => "com.mealplanner.anthropic",
            CredentialKind::Gemini => "com.mealplanner.gemini",
        }
    }

    /// Human-readable label for status displays
    pub fn display_name(&self) -> &'static str {
        match self {
            CredentialKind::NutritionDatabase => "Nutrition Database",
            CredentialKind::OpenAi => "OpenAI",
            CredentialKind::Anthropic => "Anthropic",
            CredentialKind::Gemini => "Gemini",
        }
    }

    /// Environment variables that may carry this credential, in priority order
    pub fn env_vars(&self) -> &'static [&'static str] {
        match self {
            CredentialKind::NutritionDatabase => &["USDA_API_KEY", "FDC_API_KEY"],
            CredentialKind::OpenAi => &["OPENAI_API_KEY"],
            CredentialKind::Anthropic => &["ANTHROPIC_API_KEY"],
            CredentialKind::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        }
    }

    /// Whether a stored demo-mode sentinel counts as "not configured"
    pub fn honors_demo_sentinel(&self) -> bool {
        matches!(self, CredentialKind::NutritionDatabase)
    }

    pub fn is_assistant(&self) -> bool {
        !matches!(self, CredentialKind::NutritionDatabase)
    }

    /// Look a kind up by its slug (case-insensitive)
    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.to_lowercase();
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    /// Look a kind up by its vault namespace
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.identifier() == identifier)
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error returned when parsing an unknown credential kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown credential kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for CredentialKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s)
            .or_else(|| Self::from_identifier(s))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_are_unique_and_prefixed() {
        for (i, a) in CredentialKind::ALL.iter().enumerate() {
            assert!(a.identifier().starts_with(IDENTIFIER_PREFIX));
            assert!(a.identifier().ends_with(a.slug()));
            for b in &CredentialKind::ALL[i + 1..] {
                assert_ne!(a.identifier(), b.identifier());
            }
        }
    }

    #[test]
    fn test_parse_slug_and_identifier() {
        assert_eq!(
            "nutrition-database".parse::<CredentialKind>().unwrap(),
            CredentialKind::NutritionDatabase
        );
        assert_eq!("OpenAI".parse::<CredentialKind>().unwrap(), CredentialKind::OpenAi);
        assert_eq!(
            "com.mealplanner.gemini".parse::<CredentialKind>().unwrap(),
            CredentialKind::Gemini
        );
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "mistral".parse::<CredentialKind>().unwrap_err();
        assert_eq!(err, UnknownKind("mistral".to_string()));
        assert_eq!(CredentialKind::from_identifier("com.other.openai"), None);
    }

    #[test]
    fn test_only_nutrition_database_honors_sentinel() {
        assert!(CredentialKind::NutritionDatabase.honors_demo_sentinel());
        for kind in CredentialKind::ASSISTANTS {
            assert!(!kind.honors_demo_sentinel());
            assert!(kind.is_assistant());
        }
    }

    #[test]
    fn test_serde_uses_slugs() {
        let json = serde_json::to_string(&CredentialKind::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");

        let kind: CredentialKind = serde_json::from_str("\"nutrition-database\"").unwrap();
        assert_eq!(kind, CredentialKind::NutritionDatabase);
    }

    #[test]
    fn test_display() {
        assert_eq!(CredentialKind::Anthropic.to_string(), "anthropic");
        assert_eq!(CredentialKind::Anthropic.display_name(), "Anthropic");
    }
}
