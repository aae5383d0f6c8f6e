//! Tokenizer encoding selection.
//!
//! Maps a model-name hint onto a tiktoken encoding family and loads the
//! matching encoder. Selection is a pure function of the hint; loading is
//! the only fallible step, and callers decide how to recover.

use tiktoken_rs::CoreBPE;

use crate::types::TokenizerError;

/// The tiktoken encoding families this crate can count with exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingFamily {
    /// `o200k_base`, used by the GPT-4o and GPT-5 model families.
    O200k,
    /// `cl100k_base`, used by the GPT-3.5 and GPT-4 model families.
    Cl100k,
}

impl EncodingFamily {
    /// Pick the encoding family for a model-name hint.
    ///
    /// Matching is case-insensitive on substrings, modern family first
    /// ("gpt-4o" contains "gpt-4" and must not fall through to the legacy
    /// rule):
    ///
    /// - hint contains `gpt-4o` or `gpt-5` → [`EncodingFamily::O200k`]
    /// - hint contains `gpt-3.5` or `gpt-4` → [`EncodingFamily::Cl100k`]
    /// - anything else (including no hint) → `None`, meaning no exact
    ///   encoder applies and counting falls back to the character heuristic
    pub fn for_hint(hint: Option<&str>) -> Option<Self> {
        let hint = hint?.to_lowercase();
        if hint.contains("gpt-4o") || hint.contains("gpt-5") {
            Some(Self::O200k)
        } else if hint.contains("gpt-3.5") || hint.contains("gpt-4") {
            Some(Self::Cl100k)
        } else {
            None
        }
    }

    /// Load the tiktoken encoder for this family.
    ///
    /// The encoder owns its rank tables and releases them when dropped;
    /// counting code keeps it scoped to a single call so the resource never
    /// outlives the work, including on unwind.
    pub fn load(self) -> Result<CoreBPE, TokenizerError> {
        let built = match self {
            Self::O200k => tiktoken_rs::o200k_base(),
            Self::Cl100k => tiktoken_rs::cl100k_base(),
        };
        built.map_err(|e| TokenizerError::Load {
            family: self,
            message: e.to_string(),
        })
    }

    /// Canonical tiktoken name for this family.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::O200k => "o200k_base",
            Self::Cl100k => "cl100k_base",
        }
    }
}

impl std::fmt::Display for EncodingFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_hints_select_o200k() {
        assert_eq!(
            EncodingFamily::for_hint(Some("gpt-4o")),
            Some(EncodingFamily::O200k)
        );
        assert_eq!(
            EncodingFamily::for_hint(Some("gpt-4o-mini")),
            Some(EncodingFamily::O200k)
        );
        assert_eq!(
            EncodingFamily::for_hint(Some("gpt-5-mini")),
            Some(EncodingFamily::O200k)
        );
    }

    #[test]
    fn legacy_hints_select_cl100k() {
        assert_eq!(
            EncodingFamily::for_hint(Some("gpt-4-turbo")),
            Some(EncodingFamily::Cl100k)
        );
        assert_eq!(
            EncodingFamily::for_hint(Some("gpt-3.5-turbo")),
            Some(EncodingFamily::Cl100k)
        );
    }

    #[test]
    fn modern_rule_wins_over_legacy_substring() {
        // "gpt-4o" also contains "gpt-4"; the o200k rule must take it.
        assert_eq!(
            EncodingFamily::for_hint(Some("gpt-4o-2024-08-06")),
            Some(EncodingFamily::O200k)
        );
    }

    #[test]
    fn hint_matching_is_case_insensitive() {
        assert_eq!(
            EncodingFamily::for_hint(Some("GPT-4O-MINI")),
            Some(EncodingFamily::O200k)
        );
        assert_eq!(
            EncodingFamily::for_hint(Some("GPT-3.5-Turbo")),
            Some(EncodingFamily::Cl100k)
        );
    }

    #[test]
    fn unrecognized_hints_select_nothing() {
        assert_eq!(EncodingFamily::for_hint(Some("claude-3.5-sonnet")), None);
        assert_eq!(EncodingFamily::for_hint(Some("grok-2")), None);
        assert_eq!(EncodingFamily::for_hint(Some("")), None);
        assert_eq!(EncodingFamily::for_hint(None), None);
    }

    #[test]
    fn both_families_load() {
        assert!(EncodingFamily::O200k.load().is_ok());
        assert!(EncodingFamily::Cl100k.load().is_ok());
    }

    #[test]
    fn family_names_match_tiktoken() {
        assert_eq!(EncodingFamily::O200k.to_string(), "o200k_base");
        assert_eq!(EncodingFamily::Cl100k.to_string(), "cl100k_base");
    }
}
