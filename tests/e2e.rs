//! End-to-end integration tests for idea2deck.
//!
//! Most tests here run fully offline: they exercise the assembly half of the
//! pipeline (layout, PDF build, side-car write) against hand-built decks, and
//! the pre-network validation of the generation half.
//!
//! Tests that make live LLM or image-search API calls are gated behind the
//! `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture
//!
//! To include the live tests:
//!   E2E_ENABLED=1 NOVITA_API_KEY=... cargo test --test e2e -- --nocapture

use idea2deck::{
    assemble, create_deck, generate, sanitize_title, Credentials, DeckConfig, DeckError,
    DeckOutput, PitchDeck, SectionContent, FALLBACK_SECTION_TEXT, SECTION_ORDER,
};
use std::path::Path;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Config that writes into `dir`, never fetches photos, and holds no keys.
fn offline_config(dir: &Path) -> DeckConfig {
    DeckConfig::builder()
        .output_dir(dir)
        .fetch_images(false)
        .build()
        .expect("offline config must build")
}

/// Deck where every canonical section is one plain sentence.
fn sentence_deck() -> PitchDeck {
    let sections = SECTION_ORDER
        .iter()
        .map(|name| {
            (
                name.to_string(),
                SectionContent::Text(format!("{name} explained in one sentence.")),
            )
        })
        .collect();
    PitchDeck { sections }
}

/// Skip this test unless E2E_ENABLED is set *and* `var` holds a key.
macro_rules! e2e_skip_unless_key {
    ($var:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        match std::env::var($var) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                println!("SKIP — {} not set", $var);
                return;
            }
        }
    }};
}

/// Assert that a finished run left a plausible PDF and side-car behind.
fn assert_output_quality(output: &DeckOutput, context: &str) {
    assert!(
        output.pdf_path.is_absolute(),
        "[{context}] PDF path must be absolute, got {}",
        output.pdf_path.display()
    );
    assert!(
        output.pdf_path.exists(),
        "[{context}] PDF file missing: {}",
        output.pdf_path.display()
    );
    assert!(
        output.json_path.exists(),
        "[{context}] JSON side-car missing: {}",
        output.json_path.display()
    );

    let pdf = std::fs::read(&output.pdf_path).expect("PDF must be readable");
    assert!(pdf.starts_with(b"%PDF"), "[{context}] Output is not a PDF");
    assert!(
        pdf.len() > 500,
        "[{context}] PDF suspiciously small: {} bytes",
        pdf.len()
    );

    // The side-car must be derivable from the PDF path by suffix swap.
    assert_eq!(
        output.json_path.with_extension("pdf"),
        output.pdf_path,
        "[{context}] PDF and JSON stems differ"
    );

    println!(
        "[{context}] ✓  {} bytes of PDF, side-car present",
        pdf.len()
    );
}

/// Parse the side-car and assert it is structurally equal to `deck`.
fn assert_sidecar_roundtrip(output: &DeckOutput, deck: &PitchDeck, context: &str) {
    let raw = std::fs::read_to_string(&output.json_path).expect("side-car must be readable");
    let reparsed: PitchDeck = serde_json::from_str(&raw)
        .unwrap_or_else(|e| panic!("[{context}] side-car is not a valid deck: {e}"));
    assert_eq!(&reparsed, deck, "[{context}] side-car does not round-trip");
}

// ── Assembly tests (offline, always run) ─────────────────────────────────────

#[tokio::test]
async fn test_assemble_sentence_deck_produces_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let deck = sentence_deck();

    let output = assemble(&deck, "A subscription box for artisanal coffee", &config)
        .await
        .expect("assembly must succeed");

    assert_output_quality(&output, "sentence-deck");
    assert_sidecar_roundtrip(&output, &deck, "sentence-deck");

    // Filename stem comes from the sanitized title.
    let name = output.pdf_path.file_name().unwrap().to_string_lossy();
    assert_eq!(
        name,
        "a_subscription_box_for_artisanal_coffee_pitch_deck.pdf"
    );

    // Nine string-valued keys in the side-car.
    let raw = std::fs::read_to_string(&output.json_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = value.as_object().expect("side-car must be a JSON object");
    assert_eq!(object.len(), SECTION_ORDER.len());
    for key in SECTION_ORDER {
        assert!(
            object.get(key).is_some_and(serde_json::Value::is_string),
            "expected a string value for '{key}'"
        );
    }

    assert_eq!(output.stats.sections_rendered, SECTION_ORDER.len());
    assert_eq!(output.stats.images_embedded, 0);
}

#[tokio::test]
async fn test_assemble_fallback_deck_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let deck = PitchDeck::fallback();

    let output = assemble(&deck, "Fallback Run", &config)
        .await
        .expect("a placeholder deck must still assemble");

    assert_output_quality(&output, "fallback-deck");
    assert_sidecar_roundtrip(&output, &deck, "fallback-deck");

    // Every side-car value is the literal fallback string.
    let raw = std::fs::read_to_string(&output.json_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for key in SECTION_ORDER {
        assert_eq!(value[key], FALLBACK_SECTION_TEXT, "wrong fallback for '{key}'");
    }
}

#[tokio::test]
async fn test_assemble_tolerates_missing_and_extra_sections() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());

    // Two canonical sections, one invented by the model.
    let deck: PitchDeck = serde_json::from_str(
        r#"{
            "Problem": "Coffee goes stale. Shipping is slow.",
            "Solution": ["Roast on demand", "Ship weekly"],
            "Bonus Slide": "never rendered"
        }"#,
    )
    .unwrap();

    let output = assemble(&deck, "Sparse Deck", &config)
        .await
        .expect("a sparse deck must still assemble");

    assert_output_quality(&output, "sparse-deck");
    // The side-car keeps the invented section even though it is not rendered.
    assert_sidecar_roundtrip(&output, &deck, "sparse-deck");
}

#[tokio::test]
async fn test_assemble_mixed_content_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());

    let deck: PitchDeck = serde_json::from_str(
        r#"{
            "Problem": "Plants die when owners travel. Nobody waters them.",
            "Solution": ["Moisture sensors", "Automatic watering", "An app"],
            "Market Analysis": {
                "Description": "Houseplant spending keeps growing.",
                "TAM": "$2B",
                "Segments": ["Urban renters", "Offices"],
                "Growth": {"2025": "8%", "2026": "11%"}
            },
            "Competitors": {"Description": "Mostly manual solutions."},
            "Unique Selling Proposition (USP)": "Set and forget.",
            "Business Model": {"Pricing": "Tiered subscriptions", "Year 1 Revenue": 500000},
            "Financial Projections": "Break-even in year two. Profitable in year three.",
            "Team Overview": ["Two founders", "One advisor"],
            "Call to Action": "Join the seed round."
        }"#,
    )
    .unwrap();

    let output = assemble(&deck, "A drone that waters house plants", &config)
        .await
        .expect("every content shape must render");

    assert_output_quality(&output, "mixed-shapes");
    assert_sidecar_roundtrip(&output, &deck, "mixed-shapes");
}

#[tokio::test]
async fn test_assemble_without_image_key_makes_no_lookup() {
    let dir = tempfile::tempdir().unwrap();

    // Photos enabled, but no access key and an unroutable image endpoint:
    // the credential guard must short-circuit before any request.
    let config = DeckConfig::builder()
        .output_dir(dir.path())
        .fetch_images(true)
        .image_api_base("http://127.0.0.1:1")
        .image_timeout_secs(1)
        .build()
        .unwrap();

    let output = assemble(&sentence_deck(), "No Key Run", &config)
        .await
        .expect("assembly must succeed without an image key");

    assert_output_quality(&output, "no-image-key");
    assert_eq!(output.stats.images_embedded, 0);
    assert_eq!(output.stats.images_skipped, 0);
}

#[tokio::test]
async fn test_assemble_survives_unreachable_image_service() {
    let dir = tempfile::tempdir().unwrap();

    // A key is set but the service is unreachable: every lookup degrades to
    // "no photo" and the run still completes.
    let config = DeckConfig::builder()
        .output_dir(dir.path())
        .credentials(Credentials::new(None, Some("test-access-key".into())))
        .image_api_base("http://127.0.0.1:1")
        .image_timeout_secs(1)
        .build()
        .unwrap();

    let output = assemble(&sentence_deck(), "Dead Image Service", &config)
        .await
        .expect("image failures must never abort assembly");

    assert_output_quality(&output, "dead-image-service");
    assert_eq!(output.stats.images_embedded, 0);
}

#[tokio::test]
async fn test_output_json_serialisable() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let deck = sentence_deck();

    let output = assemble(&deck, "Serialise Me", &config).await.unwrap();

    // The whole DeckOutput must survive a JSON round-trip (the CLI's --json
    // flag relies on this).
    let json = serde_json::to_string_pretty(&output).expect("output must serialise");
    let back: DeckOutput = serde_json::from_str(&json).expect("output must deserialise");
    assert_eq!(back.deck, output.deck);
    assert_eq!(back.pdf_path, output.pdf_path);
    assert_eq!(back.stats.sections_rendered, output.stats.sections_rendered);
}

// ── Title sanitisation (always run) ──────────────────────────────────────────

#[test]
fn test_sanitize_title_is_idempotent() {
    for title in [
        "A Subscription Box for Artisanal Coffee",
        "what/about: unsafe*chars?",
        "Ünïcode Càfé",
    ] {
        let once = sanitize_title(title);
        assert_eq!(sanitize_title(&once), once, "not idempotent for '{title}'");
    }
}

#[test]
fn test_sanitize_title_collapses_unsafe_variants() {
    // Titles differing only by which path-unsafe character they contain
    // collapse to the same stem.
    assert_eq!(sanitize_title("my:idea"), sanitize_title("my*idea"));
    assert_eq!(sanitize_title(r"my\idea"), sanitize_title("my/idea"));
}

// ── Generation validation (offline, always run) ──────────────────────────────

#[tokio::test]
async fn test_generate_rejects_empty_idea() {
    let config = DeckConfig::default();
    let err = generate("   ", &config).await;
    assert!(matches!(err, Err(DeckError::EmptyIdea)));
}

#[tokio::test]
async fn test_generate_requires_model_key_before_network() {
    // No key and an unroutable endpoint: the error must be MissingApiKey,
    // not a transport failure, proving no request was attempted.
    let config = DeckConfig::builder()
        .api_base("http://127.0.0.1:1")
        .build()
        .unwrap();
    let err = generate("a real idea", &config).await;
    assert!(
        matches!(err, Err(DeckError::MissingApiKey { .. })),
        "expected MissingApiKey, got {err:?}"
    );
}

#[tokio::test]
async fn test_generate_maps_unreachable_endpoint_to_transport_error() {
    let config = DeckConfig::builder()
        .api_base("http://127.0.0.1:1")
        .api_timeout_secs(2)
        .credentials(Credentials::new(Some("test-key".into()), None))
        .build()
        .unwrap();
    let err = generate("a real idea", &config).await;
    match err {
        Err(DeckError::Transport { service, .. }) => {
            assert_eq!(service, "model service");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_deck_fails_cleanly_without_output_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = DeckConfig::builder()
        .api_base("http://127.0.0.1:1")
        .api_timeout_secs(2)
        .credentials(Credentials::new(Some("test-key".into()), None))
        .output_dir(dir.path())
        .build()
        .unwrap();

    let err = create_deck("an idea that never reaches a model", &config).await;
    assert!(err.is_err(), "unreachable endpoint must fail the run");

    // A fatal generation error must leave no partial output behind.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(
        leftovers.is_empty(),
        "no output files expected, found {leftovers:?}"
    );
}

// ── Live tests (need E2E_ENABLED + real keys) ────────────────────────────────

/// Full pipeline against the real model endpoint.
#[tokio::test]
async fn test_live_create_deck() {
    let api_key = e2e_skip_unless_key!("NOVITA_API_KEY");

    let dir = tempfile::tempdir().unwrap();
    let config = DeckConfig::builder()
        .credentials(Credentials::new(Some(api_key), None))
        .fetch_images(false)
        .output_dir(dir.path())
        .build()
        .unwrap();

    let output = create_deck("A subscription box for artisanal coffee", &config)
        .await
        .expect("live generation should succeed");

    assert_output_quality(&output, "live-create-deck");
    assert_sidecar_roundtrip(&output, &output.deck, "live-create-deck");
    assert!(
        !output.stats.used_fallback,
        "live model reply should parse as JSON"
    );
    assert!(
        output.stats.completion_tokens > 0,
        "live run should report token usage"
    );

    println!(
        "live deck: {} sections, {} tokens in / {} out, {}ms",
        output.deck.sections.len(),
        output.stats.prompt_tokens,
        output.stats.completion_tokens,
        output.stats.total_duration_ms
    );
}

/// Content stage only: the model should cover the canonical sections.
#[tokio::test]
async fn test_live_generate_covers_canonical_sections() {
    let api_key = e2e_skip_unless_key!("NOVITA_API_KEY");

    let config = DeckConfig::builder()
        .credentials(Credentials::new(Some(api_key), None))
        .build()
        .unwrap();

    let deck = generate("An AI copilot for tax accountants", &config)
        .await
        .expect("live generation should succeed");

    // JSON mode plus an explicit key list makes full coverage the norm; a
    // missing section here points at a prompt regression.
    for name in SECTION_ORDER {
        assert!(
            deck.section(name).is_some(),
            "live reply is missing section '{name}'"
        );
    }
}

/// Full pipeline with live stock photos.
#[tokio::test]
async fn test_live_create_deck_with_photos() {
    let api_key = e2e_skip_unless_key!("NOVITA_API_KEY");
    let image_key = e2e_skip_unless_key!("UNSPLASH_ACCESS_KEY");

    let dir = tempfile::tempdir().unwrap();
    let config = DeckConfig::builder()
        .credentials(Credentials::new(Some(api_key), Some(image_key)))
        .output_dir(dir.path())
        .build()
        .unwrap();

    let output = create_deck("A dog-walking marketplace", &config)
        .await
        .expect("live generation with photos should succeed");

    assert_output_quality(&output, "live-photos");
    println!(
        "live photos: {} embedded, {} skipped",
        output.stats.images_embedded, output.stats.images_skipped
    );
}
