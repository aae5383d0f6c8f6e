//! token_budget - Token counting and output-budget clamping for LLM requests
//!
//! This crate sizes chat requests before they go to a model:
//! - `counter` - token cost of text fragments, exact (tiktoken) or heuristic
//! - `limits` - context-window sizes keyed by model-name substrings
//! - `clamp` - fit a requested `max_tokens` into the remaining window
//! - `encoding` - model hint to tiktoken encoding selection
//! - `types` - chat messages, clamp results, and reason tags

pub mod clamp;
pub mod counter;
pub mod encoding;
pub mod limits;
pub mod types;

// Re-export the public API
pub use clamp::clamp_max_tokens;
pub use counter::{
    count_prompt_tokens, count_tokens, ExactTokenCounter, HeuristicTokenCounter, TokenCounter,
    CHARS_PER_TOKEN_HEURISTIC,
};
pub use encoding::EncodingFamily;
pub use limits::{
    get_model_context_limit, ModelLimitEntry, ModelLimitTable, DEFAULT_CONTEXT_LIMIT,
    DEFAULT_MODEL_LIMITS,
};
pub use types::{ChatMessage, ClampReason, ClampResult, Role, TokenizerError};
