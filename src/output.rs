//! Output types returned by a generation run.
//!
//! [`DeckOutput`] bundles everything a caller might want after
//! [`crate::create_deck`] finishes: the parsed deck, the on-disk paths, and
//! run statistics. Everything is `Serialize` so a host application (or the
//! CLI's `--json` flag) can emit the whole result as one JSON document.

use crate::deck::PitchDeck;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of one pitch-deck generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckOutput {
    /// The generated content, exactly as persisted in the JSON side-car.
    pub deck: PitchDeck,

    /// Absolute path of the written PDF document.
    pub pdf_path: PathBuf,

    /// Absolute path of the written JSON side-car.
    pub json_path: PathBuf,

    /// Statistics about the run.
    pub stats: DeckStats,
}

/// Statistics for one generation run.
///
/// Token counts come from the completion response's usage block and are zero
/// when the endpoint omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckStats {
    /// Sections rendered into the document (always the canonical count).
    pub sections_rendered: usize,

    /// Sections that got a stock photo embedded.
    pub images_embedded: usize,

    /// Sections where a photo was fetched but could not be embedded, or was
    /// fetched and then rejected by the decoder.
    pub images_skipped: usize,

    /// Prompt tokens consumed by the completion call.
    pub prompt_tokens: u32,

    /// Completion tokens produced by the model.
    pub completion_tokens: u32,

    /// True when the model reply was unparseable and the deck carries
    /// placeholder text.
    pub used_fallback: bool,

    /// Wall-clock time of the completion call, in milliseconds.
    pub llm_duration_ms: u64,

    /// Wall-clock time of image lookup plus document assembly, in milliseconds.
    pub assembly_duration_ms: u64,

    /// Total wall-clock time of the run, in milliseconds.
    pub total_duration_ms: u64,
}
