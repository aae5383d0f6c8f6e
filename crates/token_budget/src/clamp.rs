//! Output-budget clamping.
//!
//! Shrinks a requested `max_tokens` so prompt plus completion stay inside
//! the model's context window, reporting which clamping rules fired.

use crate::counter::count_prompt_tokens;
use crate::limits::{get_model_context_limit, ModelLimitTable};
use crate::types::{ChatMessage, ClampReason, ClampResult};

/// Clamp a desired output-token count to what the context window allows.
///
/// The algorithm, in order:
/// 1. Normalize `desired_max`: non-finite values, and values that floor to
///    zero or less, become 1 and are reported as
///    [`ClampReason::InvalidDesired`]; everything else is floored.
/// 2. Resolve the model's context window from `model_name` and the optional
///    override `limit_table`.
/// 3. Count the prompt's tokens; `model_name` doubles as the tokenizer hint.
/// 4. Compute the room left for output: window minus prompt, floored at 0.
/// 5. Take the smaller of the desired value and that room.
/// 6. A result of 0 becomes 1; any reduction is reported as
///    [`ClampReason::ModelLimit`].
///
/// # Arguments
///
/// * `messages` - The prompt that will precede the completion
/// * `desired_max` - The caller's requested `max_tokens`
/// * `model_name` - Target model, for both the limit lookup and token counting
/// * `limit_table` - Optional replacement for the built-in limit table
///
/// # Returns
///
/// A [`ClampResult`] whose `max_tokens` is always at least 1. No input
/// panics or errors.
///
/// # Examples
///
/// ```
/// use token_budget::{clamp_max_tokens, ChatMessage};
///
/// let messages = vec![ChatMessage::user("hi")];
/// let result = clamp_max_tokens(&messages, 100_000.0, Some("unknown-model"), None);
/// assert_eq!(result.max_tokens, 100_000);
/// assert!(result.reasons.is_empty());
/// ```
pub fn clamp_max_tokens(
    messages: &[ChatMessage],
    desired_max: f64,
    model_name: Option<&str>,
    limit_table: Option<&ModelLimitTable>,
) -> ClampResult {
    let mut reasons = Vec::new();

    // 1. Normalize the desired value
    let desired: u64 = if !desired_max.is_finite() || desired_max.floor() <= 0.0 {
        tracing::warn!("Invalid desired max_tokens ({desired_max}), using 1");
        reasons.push(ClampReason::InvalidDesired);
        1
    } else {
        // The cast saturates for values past u64::MAX; step 5 bounds the
        // result by the context window anyway.
        desired_max.floor() as u64
    };

    // 2. Resolve the context window
    let model_limit = get_model_context_limit(model_name, limit_table);

    // 3. Count prompt tokens
    let prompt_tokens = count_prompt_tokens(messages, model_name) as u64;

    // 4. Room left for output
    let available = u64::from(model_limit).saturating_sub(prompt_tokens);

    // 5. Fit the desired value into that room
    let fitted = desired.min(available);

    // 6. Never hand the API a zero output budget
    let max_tokens = if fitted == 0 {
        tracing::warn!(
            "Prompt ({prompt} tokens) fills the {limit}-token window of {model:?}, forcing max_tokens to 1",
            prompt = prompt_tokens,
            limit = model_limit,
            model = model_name,
        );
        reasons.push(ClampReason::ModelLimit);
        1
    } else {
        if desired > available {
            tracing::debug!(
                "Clamped max_tokens from {desired} to {fitted} (prompt {prompt} of {limit})",
                prompt = prompt_tokens,
                limit = model_limit,
            );
            reasons.push(ClampReason::ModelLimit);
        }
        fitted as u32
    };

    ClampResult {
        max_tokens,
        reasons,
    }
}
