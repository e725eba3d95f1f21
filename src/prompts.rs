//! Prompts for pitch-deck content generation.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing what the model is asked for (new
//!    section, different tone) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    calling a real model, making prompt regressions easy to catch.
//!
//! The section key list is generated from [`SECTION_ORDER`], so the prompt
//! can never drift from the order the renderer walks. Callers can override
//! the system prompt via [`crate::config::DeckConfigBuilder::system_prompt`];
//! the constant here is used only when no override is provided.

use crate::deck::SECTION_ORDER;

/// Default system prompt pinning the model to bare JSON output.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that responds with valid \
JSON only. Do not include any explanatory text, markdown formatting, or code blocks in your \
response.";

/// Build the user prompt for one idea.
///
/// Deterministic: the same idea always yields the same prompt. The idea is
/// embedded verbatim; trimming and validation happen before this point.
pub fn user_prompt(idea: &str) -> String {
    format!(
        "Generate a JSON object for a startup pitch deck based on the idea: '{idea}'. \
         Include the following keys: {keys}. \
         Make sure the output is strictly valid JSON without any markdown formatting or \
         explanatory text. The response must be a JSON object that can be parsed directly.",
        keys = SECTION_ORDER.join(", "),
    )
}
