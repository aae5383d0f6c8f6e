//! Model context-window limits.
//!
//! A static substring table maps model names to context-window sizes.
//! Callers may supply their own table per call; the supplied table replaces
//! the built-in one entirely, it is never merged with it.

use serde::{Deserialize, Serialize};

/// Context window applied when the model name is missing or matches nothing.
pub const DEFAULT_CONTEXT_LIMIT: u32 = 128_000;

/// Built-in context window sizes, in match order.
///
/// Patterns are lowercase model-name substrings. The first matching entry
/// wins, so more specific variants sit before their family prefix.
pub const DEFAULT_MODEL_LIMITS: &[(&str, u32)] = &[
    // OpenAI models
    ("gpt-4o-mini", 128_000),
    ("gpt-4o", 128_000),
    ("gpt-5-mini", 400_000),
    ("gpt-5", 400_000),
    // Anthropic models
    ("claude-3.5-sonnet", 200_000),
    ("claude-3.5-haiku", 200_000),
    // xAI models
    ("grok", 131_072),
];

/// One limit entry: a model-name substring and its context window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLimitEntry {
    /// Model name substring (matched case-insensitively).
    pub pattern: String,
    /// Maximum context window size in tokens.
    pub context_tokens: u32,
}

/// Ordered model-limit table.
///
/// Iteration order is match priority. Serializes as an array of
/// [`ModelLimitEntry`] values so callers can ship override tables inside
/// their own configuration; patterns are lowercased on every construction
/// path, deserialization included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ModelLimitEntry>", into = "Vec<ModelLimitEntry>")]
pub struct ModelLimitTable {
    entries: Vec<(String, u32)>,
}

impl ModelLimitTable {
    /// Build a table from `(pattern, context window)` pairs.
    ///
    /// Patterns are lowercased; pair order becomes match priority.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(pattern, limit)| (pattern.into().to_lowercase(), limit))
                .collect(),
        }
    }

    /// Parse a table from its JSON form, an array of entries.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Window of the first entry whose pattern is a substring of the name.
    pub fn lookup(&self, model_name: &str) -> Option<u32> {
        let lowered = model_name.to_lowercase();
        self.entries
            .iter()
            .find(|(pattern, _)| lowered.contains(pattern.as_str()))
            .map(|(_, limit)| *limit)
    }
}

impl Default for ModelLimitTable {
    fn default() -> Self {
        Self::from_entries(DEFAULT_MODEL_LIMITS.iter().copied())
    }
}

impl From<Vec<ModelLimitEntry>> for ModelLimitTable {
    fn from(entries: Vec<ModelLimitEntry>) -> Self {
        Self::from_entries(entries.into_iter().map(|e| (e.pattern, e.context_tokens)))
    }
}

impl From<ModelLimitTable> for Vec<ModelLimitEntry> {
    fn from(table: ModelLimitTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(pattern, context_tokens)| ModelLimitEntry {
                pattern,
                context_tokens,
            })
            .collect()
    }
}

/// Resolve the context window for a model name.
///
/// A missing or empty name resolves to [`DEFAULT_CONTEXT_LIMIT`] without
/// consulting any table. A caller-supplied `table` replaces the built-in
/// one for this call.
pub fn get_model_context_limit(model_name: Option<&str>, table: Option<&ModelLimitTable>) -> u32 {
    let name = match model_name {
        Some(name) if !name.is_empty() => name,
        _ => return DEFAULT_CONTEXT_LIMIT,
    };

    match table {
        Some(table) => table.lookup(name),
        None => lookup_default(name),
    }
    .unwrap_or(DEFAULT_CONTEXT_LIMIT)
}

fn lookup_default(model_name: &str) -> Option<u32> {
    let lowered = model_name.to_lowercase();
    DEFAULT_MODEL_LIMITS
        .iter()
        .find(|(pattern, _)| lowered.contains(*pattern))
        .map(|(_, limit)| *limit)
}
