//! Document assembly: deck content to PDF + JSON side-car on disk.
//!
//! The assembler walks the canonical sections in order, looks up one
//! best-effort stock photo per section, renders everything through
//! [`crate::pipeline::pdf`], and writes two files next to each other:
//! `{stem}_pitch_deck.pdf` and `{stem}_pitch_deck.json`, where `{stem}` is
//! the sanitized title.
//!
//! ## Why two phases?
//!
//! printpdf documents are not `Send`, so the build is split: photo lookups
//! run first (sequential awaits, collecting raw bytes per section), then the
//! entire synchronous document build — decode, re-encode to staged JPEG temp
//! files, layout, save — happens inside one `spawn_blocking` closure. The
//! temp files are dropped (and deleted) on every exit path of that closure,
//! success or failure.

use crate::config::DeckConfig;
use crate::deck::{PitchDeck, SECTION_ORDER};
use crate::error::DeckError;
use crate::output::{DeckOutput, DeckStats};
use crate::pipeline::{images, layout, pdf::DeckPdf};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Subtitle line rendered under the deck title.
const SUBTITLE: &str = "AI-Generated Startup Pitch Deck";

/// Render a deck to disk.
///
/// `title` becomes the document's title line and, sanitized, the filename
/// stem. Photos are fetched only when `config.fetch_images` is set and an
/// image key is configured; every lookup failure degrades to "no photo".
///
/// Returns output paths as absolute paths. The run fails only on filesystem
/// or rendering errors; a partially-written PDF may remain on disk when the
/// failure happens mid-save.
pub async fn assemble(
    deck: &PitchDeck,
    title: &str,
    config: &DeckConfig,
) -> Result<DeckOutput, DeckError> {
    let start = Instant::now();
    let stem = sanitize_title(title);
    let pdf_path = config.output_dir.join(format!("{stem}_pitch_deck.pdf"));
    let json_path = config.output_dir.join(format!("{stem}_pitch_deck.json"));
    info!("Assembling '{}'", pdf_path.display());

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|e| DeckError::OutputWriteFailed {
            path: config.output_dir.clone(),
            source: e,
        })?;

    // ── Step 1: Look up one photo per section ────────────────────────────
    let photos = fetch_section_photos(config).await;

    // ── Step 2: Build and save the PDF (blocking) ────────────────────────
    let build_deck = deck.clone();
    let build_title = title.to_string();
    let build_path = pdf_path.clone();
    let report = tokio::task::spawn_blocking(move || {
        build_document(&build_deck, &build_title, &photos, &build_path)
    })
    .await
    .map_err(|e| DeckError::Internal(format!("document build task failed: {e}")))??;

    // ── Step 3: Write the JSON side-car ──────────────────────────────────
    let json_text = serde_json::to_string_pretty(deck)
        .map_err(|e| DeckError::Internal(format!("deck serialisation failed: {e}")))?;
    tokio::fs::write(&json_path, json_text)
        .await
        .map_err(|e| DeckError::OutputWriteFailed {
            path: json_path.clone(),
            source: e,
        })?;

    // ── Step 4: Finalise paths and stats ─────────────────────────────────
    let pdf_path = absolutise(pdf_path).await;
    let json_path = absolutise(json_path).await;
    info!(
        "Saved '{}' ({} photos embedded)",
        pdf_path.display(),
        report.embedded
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_deck_complete(&pdf_path);
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    Ok(DeckOutput {
        deck: deck.clone(),
        pdf_path,
        json_path,
        stats: DeckStats {
            sections_rendered: SECTION_ORDER.len(),
            images_embedded: report.embedded,
            images_skipped: report.skipped,
            assembly_duration_ms: elapsed_ms,
            total_duration_ms: elapsed_ms,
            ..DeckStats::default()
        },
    })
}

/// Make a title safe as a filename stem.
///
/// Lowercases, replaces path-unsafe characters (`/ \ : * ? " < > |`) with
/// `-`, truncates to 50 characters, and swaps spaces for underscores.
/// Idempotent: sanitizing a sanitized title changes nothing.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            other => other,
        })
        .collect();
    let truncated: String = replaced.chars().take(50).collect();
    truncated.replace(' ', "_")
}

async fn absolutise(path: PathBuf) -> PathBuf {
    match tokio::fs::canonicalize(&path).await {
        Ok(abs) => abs,
        Err(_) => path,
    }
}

/// One photo per canonical section, in document order.
///
/// Fires the per-section progress events; lookups are skipped entirely (and
/// the events still fire) when photos are disabled or unusable.
async fn fetch_section_photos(config: &DeckConfig) -> Vec<Option<Vec<u8>>> {
    let total = SECTION_ORDER.len();
    let client = if config.fetch_images {
        images::lookup_client(config.image_timeout_secs)
    } else {
        debug!("photo lookup disabled by configuration");
        None
    };
    let key = config.credentials.image_key();

    let mut photos = Vec::with_capacity(total);
    for (i, section) in SECTION_ORDER.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_section_start(i + 1, total, section);
        }
        let bytes = match client {
            Some(ref client) => {
                images::find_image(client, &config.image_api_base, key, section).await
            }
            None => None,
        };
        if let Some(ref cb) = config.progress_callback {
            cb.on_section_complete(i + 1, total, section, bytes.is_some());
        }
        photos.push(bytes);
    }
    photos
}

struct EmbedReport {
    embedded: usize,
    skipped: usize,
}

/// Synchronous document build: layout, photos, save.
///
/// Runs inside `spawn_blocking`. Staged photo temp files live in `staged`
/// for the whole build and are deleted when it returns, whichever way it
/// returns.
fn build_document(
    deck: &PitchDeck,
    title: &str,
    photos: &[Option<Vec<u8>>],
    path: &Path,
) -> Result<EmbedReport, DeckError> {
    let mut doc = DeckPdf::new(title)?;
    doc.title_block(title, SUBTITLE);

    let mut staged: Vec<NamedTempFile> = Vec::new();
    let mut embedded = 0;
    let mut skipped = 0;

    for (i, section) in SECTION_ORDER.iter().enumerate() {
        doc.section_heading(section, i == 0);

        if let Some(bytes) = photos.get(i).and_then(|p| p.as_deref()) {
            match stage_jpeg(section, bytes) {
                Ok(tmp) => {
                    match doc.embed_jpeg(tmp.path()) {
                        Ok(()) => embedded += 1,
                        Err(e) => {
                            skipped += 1;
                            warn!("skipping photo for '{section}': {e}");
                        }
                    }
                    staged.push(tmp);
                }
                Err(e) => {
                    skipped += 1;
                    warn!("could not stage photo for '{section}': {e}");
                }
            }
        }

        for block in layout::section_blocks(deck.section(section)) {
            doc.push_block(&block);
        }
    }

    doc.save(path)?;
    debug!("removing {} staged photo files", staged.len());
    Ok(EmbedReport { embedded, skipped })
}

/// Normalise fetched photo bytes to an RGB JPEG in a uniquely named temp file.
///
/// Unsplash serves various formats and colour modes; re-encoding through the
/// image crate guarantees the embedder sees a baseline RGB JPEG. The temp
/// filename carries a section slug plus the platform's random suffix, so
/// concurrent runs never collide.
fn stage_jpeg(section: &str, bytes: &[u8]) -> Result<NamedTempFile, String> {
    let decoded = image::load_from_memory(bytes).map_err(|e| format!("decode: {e}"))?;
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());

    let slug: String = section
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!("deck_{slug}_"))
        .suffix(".jpg")
        .tempfile()
        .map_err(|e| format!("temp file: {e}"))?;

    rgb.write_to(tmp.as_file_mut(), image::ImageFormat::Jpeg)
        .map_err(|e| format!("encode: {e}"))?;
    Ok(tmp)
}
