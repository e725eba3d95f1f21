//! Generation entry points.
//!
//! [`create_deck`] is the primary API: idea in, PDF + JSON side-car out.
//! [`create_deck_with_title`] is the same run with a document title
//! independent of the idea text. [`generate`] stops after the content stage
//! for callers that want the parsed [`PitchDeck`] without touching the
//! filesystem (pair it with [`crate::assemble`] to finish the job).
//! [`create_deck_sync`] wraps the whole run for synchronous callers.

use crate::assemble::assemble;
use crate::config::{DeckConfig, MODEL_KEY_ENV};
use crate::deck::PitchDeck;
use crate::error::DeckError;
use crate::output::{DeckOutput, DeckStats};
use crate::pipeline::llm::{self, Usage};
use crate::pipeline::parse;
use std::time::Instant;
use tracing::info;

/// Content stage result: the deck plus everything the stats need.
pub(crate) struct ContentReport {
    pub deck: PitchDeck,
    pub usage: Usage,
    pub used_fallback: bool,
    pub llm_duration_ms: u64,
}

/// Generate pitch-deck content for an idea.
///
/// Makes exactly one completion request and parses the reply. An unparseable
/// reply is not an error: the returned deck carries placeholder text in every
/// canonical section (and the raw reply is logged at debug level).
///
/// # Errors
/// * [`DeckError::EmptyIdea`] when `idea` is blank
/// * [`DeckError::MissingApiKey`] when no model key is configured (checked
///   before any network call)
/// * Remote-service errors from the completion request (auth, rate limit,
///   transport, unusable envelope)
pub async fn generate(idea: &str, config: &DeckConfig) -> Result<PitchDeck, DeckError> {
    Ok(generate_content(idea, config).await?.deck)
}

pub(crate) async fn generate_content(
    idea: &str,
    config: &DeckConfig,
) -> Result<ContentReport, DeckError> {
    let start = Instant::now();

    let idea = idea.trim();
    if idea.is_empty() {
        return Err(DeckError::EmptyIdea);
    }
    let Some(api_key) = config.credentials.model_key() else {
        return Err(DeckError::MissingApiKey {
            service: "Model service",
            env_var: MODEL_KEY_ENV,
        });
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_start(&config.model);
    }

    let completion = llm::request_completion(idea, api_key, config).await?;
    let (deck, used_fallback) = parse::parse_reply(&completion.content);

    if let Some(ref cb) = config.progress_callback {
        cb.on_content_ready(deck.sections.len(), used_fallback);
    }

    let llm_duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Content ready: {} sections in {}ms{}",
        deck.sections.len(),
        llm_duration_ms,
        if used_fallback { " (placeholder)" } else { "" }
    );

    Ok(ContentReport {
        deck,
        usage: completion.usage,
        used_fallback,
        llm_duration_ms,
    })
}

/// Generate a complete pitch deck: content, photos, PDF, and JSON side-car.
///
/// This is the primary entry point for the library. The idea doubles as the
/// document title (and, sanitized, as the output filename stem); use
/// [`generate`] + [`crate::assemble`] to title the deck independently.
///
/// # Example
/// ```rust,no_run
/// use idea2deck::{create_deck, Credentials, DeckConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DeckConfig::builder()
///     .credentials(Credentials::from_env())
///     .build()?;
/// let output = create_deck("A subscription box for artisanal coffee", &config).await?;
/// println!("{}", output.pdf_path.display());
/// # Ok(())
/// # }
/// ```
pub async fn create_deck(idea: &str, config: &DeckConfig) -> Result<DeckOutput, DeckError> {
    create_deck_with_title(idea, idea.trim(), config).await
}

/// Like [`create_deck`], but with a document title independent of the idea.
///
/// The title drives the title block and the output filename stem; the idea
/// drives the content. Run statistics (token usage, fallback flag, timings)
/// are identical to a [`create_deck`] run — titling a deck never loses them.
pub async fn create_deck_with_title(
    idea: &str,
    title: &str,
    config: &DeckConfig,
) -> Result<DeckOutput, DeckError> {
    let start = Instant::now();

    let content = generate_content(idea, config).await?;
    let mut output = assemble(&content.deck, title, config).await?;

    apply_content_stats(&mut output.stats, &content);
    output.stats.total_duration_ms = start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Merge the content stage's report into stats assembled from the deck alone.
fn apply_content_stats(stats: &mut DeckStats, content: &ContentReport) {
    stats.prompt_tokens = content.usage.prompt_tokens;
    stats.completion_tokens = content.usage.completion_tokens;
    stats.used_fallback = content.used_fallback;
    stats.llm_duration_ms = content.llm_duration_ms;
}

/// Synchronous wrapper around [`create_deck`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn create_deck_sync(idea: &str, config: &DeckConfig) -> Result<DeckOutput, DeckError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DeckError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(create_deck(idea, config))
}
