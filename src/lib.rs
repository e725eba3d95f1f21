//! # idea2deck
//!
//! Turn a one-line startup idea into an investor pitch-deck PDF using an LLM.
//!
//! ## Why this crate?
//!
//! Drafting a first pitch deck is mostly structure: the same nine sections
//! (Problem, Solution, Market Analysis, ...) filled with a coherent first
//! pass of content. This crate asks an OpenAI-compatible model for exactly
//! that structure as JSON, optionally decorates each section with a stock
//! photo, and typesets the result as a paginated US-Letter PDF — plus a JSON
//! side-car so the content stays machine-readable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! idea
//!  │
//!  ├─ 1. LLM      one chat-completion call, JSON mode, no retries
//!  ├─ 2. Parse    strict JSON → PitchDeck, or a placeholder deck
//!  ├─ 3. Photos   one best-effort stock photo per section (sequential)
//!  ├─ 4. Layout   content → styled blocks (pure, unit-tested rules)
//!  ├─ 5. PDF      printpdf build in spawn_blocking, page breaks at margin
//!  └─ 6. Output   {stem}_pitch_deck.pdf + {stem}_pitch_deck.json + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use idea2deck::{create_deck, Credentials, DeckConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Keys from NOVITA_API_KEY / UNSPLASH_ACCESS_KEY
//!     let config = DeckConfig::builder()
//!         .credentials(Credentials::from_env())
//!         .build()?;
//!     let output = create_deck("A subscription box for artisanal coffee", &config).await?;
//!     println!("{}", output.pdf_path.display());
//!     eprintln!(
//!         "tokens: {} in / {} out, {} photos",
//!         output.stats.prompt_tokens,
//!         output.stats.completion_tokens,
//!         output.stats.images_embedded
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `idea2deck` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! idea2deck = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Only three things abort a run: bad input (empty idea, missing model key),
//! a failed or unusable completion *envelope*, and filesystem or rendering
//! errors. A model reply that is not valid JSON degrades to a placeholder
//! deck; a failed photo lookup degrades to a section without a photo. See
//! [`DeckError`] for the full taxonomy.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod assemble;
pub mod config;
pub mod deck;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use assemble::{assemble, sanitize_title};
pub use config::{
    Credentials, DeckConfig, DeckConfigBuilder, DEFAULT_API_BASE, DEFAULT_IMAGE_API_BASE,
    DEFAULT_MODEL,
};
pub use deck::{FieldValue, PitchDeck, SectionContent, FALLBACK_SECTION_TEXT, SECTION_ORDER};
pub use error::DeckError;
pub use generate::{create_deck, create_deck_sync, create_deck_with_title, generate};
pub use output::{DeckOutput, DeckStats};
pub use progress::{DeckProgressCallback, NoopProgressCallback, ProgressCallback};
