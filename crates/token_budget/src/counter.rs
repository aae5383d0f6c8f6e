//! Token counting.
//!
//! Exact counting uses a tiktoken encoder selected from the model hint;
//! every other model falls back to a character heuristic. Counting never
//! fails: an encoder that cannot be loaded silently downgrades to the
//! heuristic estimate.

use tiktoken_rs::CoreBPE;

use crate::encoding::EncodingFamily;
use crate::types::{ChatMessage, TokenizerError};

/// Characters per token assumed by the heuristic estimate.
pub const CHARS_PER_TOKEN_HEURISTIC: usize = 4;

/// Trait for token counting implementations.
pub trait TokenCounter: Send + Sync {
    /// Count tokens in a single text fragment.
    fn count_text(&self, text: &str) -> usize;

    /// Count tokens across multiple fragments.
    ///
    /// Defaults to summing the per-fragment counts; implementations
    /// override this when the total is not a plain sum.
    fn count_texts(&self, texts: &[&str]) -> usize {
        texts.iter().map(|t| self.count_text(t)).sum()
    }
}

/// Character-based token estimation: `ceil(chars / 4)`.
///
/// Counts Unicode scalar values rather than bytes, so multi-byte text is
/// not over-counted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenCounter;

impl TokenCounter for HeuristicTokenCounter {
    fn count_text(&self, text: &str) -> usize {
        text.chars().count().div_ceil(CHARS_PER_TOKEN_HEURISTIC)
    }

    /// Rounds up once over the combined character count, not per fragment.
    fn count_texts(&self, texts: &[&str]) -> usize {
        let chars: usize = texts.iter().map(|t| t.chars().count()).sum();
        chars.div_ceil(CHARS_PER_TOKEN_HEURISTIC)
    }
}

/// Exact token counting over a loaded tiktoken encoder.
///
/// The encoder owns its rank tables; keep the counter scoped to the work at
/// hand and let drop release it.
pub struct ExactTokenCounter {
    bpe: CoreBPE,
}

impl ExactTokenCounter {
    /// Load the encoder for the given encoding family.
    pub fn for_family(family: EncodingFamily) -> Result<Self, TokenizerError> {
        Ok(Self {
            bpe: family.load()?,
        })
    }
}

impl TokenCounter for ExactTokenCounter {
    fn count_text(&self, text: &str) -> usize {
        // encode_ordinary treats special-token text as plain text, so the
        // encode path cannot fail once the encoder is built.
        self.bpe.encode_ordinary(text).len()
    }
}

/// Estimate the total token count of `texts`.
///
/// `model_hint` selects the counting strategy: GPT-4o/GPT-5 hints use the
/// `o200k_base` encoding, GPT-3.5/GPT-4 hints use `cl100k_base`, and
/// anything else is estimated as `ceil(total chars / 4)`. An encoder that
/// fails to load downgrades to the same heuristic rather than surfacing an
/// error.
///
/// An empty `texts` returns 0 without constructing any encoder.
pub fn count_tokens<S: AsRef<str>>(texts: &[S], model_hint: Option<&str>) -> usize {
    if texts.is_empty() {
        return 0;
    }

    let fragments: Vec<&str> = texts.iter().map(|t| t.as_ref()).collect();

    match EncodingFamily::for_hint(model_hint) {
        Some(family) => match ExactTokenCounter::for_family(family) {
            Ok(counter) => counter.count_texts(&fragments),
            Err(e) => {
                tracing::debug!("{e}, falling back to heuristic estimate");
                HeuristicTokenCounter.count_texts(&fragments)
            }
        },
        None => HeuristicTokenCounter.count_texts(&fragments),
    }
}

/// Total token cost of a prompt's message contents.
///
/// Missing content counts as empty. The total is a sum over contents, so
/// permuting the messages never changes it.
pub fn count_prompt_tokens(messages: &[ChatMessage], model_hint: Option<&str>) -> usize {
    let contents: Vec<&str> = messages.iter().map(ChatMessage::text).collect();
    count_tokens(&contents, model_hint)
}
