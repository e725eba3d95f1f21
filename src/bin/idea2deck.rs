//! CLI binary for idea2deck.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `DeckConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use idea2deck::{
    create_deck_with_title, Credentials, DeckConfig, DeckProgressCallback, ProgressCallback,
    DEFAULT_API_BASE, DEFAULT_IMAGE_API_BASE, DEFAULT_MODEL, SECTION_ORDER,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while the model writes, then a
/// section-by-section bar while the document is laid out.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Sections that got a photo, for the final summary line.
    photos: AtomicUsize,
}

impl CliProgressCallback {
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_content_ready

        // Initial style: spinner only (the completion call has no sub-steps).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Generating");
        bar.set_message("warming up…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            photos: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once layout starts.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>2}/{len} sections  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Laying out");
    }
}

impl DeckProgressCallback for CliProgressCallback {
    fn on_generation_start(&self, model: &str) {
        self.bar.set_message(format!("asking {model}…"));
    }

    fn on_content_ready(&self, sections: usize, used_fallback: bool) {
        if used_fallback {
            self.bar.println(format!(
                "{} {}",
                cyan("⚠"),
                bold("model reply was not valid JSON; using placeholder content")
            ));
        } else {
            self.bar.println(format!(
                "{} {}",
                cyan("◆"),
                bold(&format!("content ready ({sections} sections)"))
            ));
        }
        self.activate_bar(SECTION_ORDER.len());
    }

    fn on_section_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_section_complete(&self, index: usize, total: usize, name: &str, image: bool) {
        if image {
            self.photos.fetch_add(1, Ordering::SeqCst);
        }
        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {:<34}  {}",
            green("✓"),
            index,
            total,
            name,
            if image { dim("photo") } else { dim("no photo") },
        ));
        self.bar.inc(1);
    }

    fn on_deck_complete(&self, _pdf_path: &Path) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} sections laid out, {} photos",
            green("✔"),
            bold(&SECTION_ORDER.len().to_string()),
            self.photos.load(Ordering::SeqCst),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate a deck in the current directory
  idea2deck "A subscription box for artisanal coffee"

  # Title the deck separately from the idea text
  idea2deck --title "BrewCrate" "A subscription box for artisanal coffee"

  # Skip stock photos
  idea2deck --no-images "An AI copilot for tax accountants"

  # Any OpenAI-compatible endpoint works
  idea2deck --api-base https://api.openai.com/v1 --model gpt-4o-mini "A dog-walking marketplace"

  # Machine-readable result on stdout
  idea2deck --json --quiet "A drone that waters house plants" > result.json

OUTPUT FILES:
  <stem>_pitch_deck.pdf    the deck document (US Letter)
  <stem>_pitch_deck.json   the generated content as JSON
  <stem> is the sanitized title: lowercased, path-unsafe characters replaced,
  truncated to 50 characters, spaces as underscores.

ENVIRONMENT VARIABLES:
  NOVITA_API_KEY        Model-service API key (required)
  UNSPLASH_ACCESS_KEY   Image-search access key (optional; photos are skipped
                        without it)

SETUP:
  1. Set API key:   export NOVITA_API_KEY=...
  2. Generate:      idea2deck "your startup idea"
"#;

/// Generate an investor pitch-deck PDF from a one-line startup idea.
#[derive(Parser, Debug)]
#[command(
    name = "idea2deck",
    version,
    about = "Generate an investor pitch-deck PDF from a one-line startup idea",
    long_about = "Generate a nine-section investor pitch deck (Problem, Solution, Market \
Analysis, ...) from a short idea description. Content comes from an OpenAI-compatible \
chat-completion endpoint in JSON mode; each section optionally gets a stock photo; the \
result is written as a paginated PDF plus a JSON side-car.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// The startup idea to pitch (a sentence or two).
    idea: String,

    /// Document title. Defaults to the idea text itself.
    #[arg(long)]
    title: Option<String>,

    /// Directory receiving the PDF and JSON outputs.
    #[arg(short, long, env = "IDEA2DECK_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Chat-completion model identifier.
    #[arg(long, env = "IDEA2DECK_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible endpoint base URL (without /chat/completions).
    #[arg(long, env = "IDEA2DECK_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Image-search endpoint base URL.
    #[arg(long, env = "IDEA2DECK_IMAGE_API_BASE", default_value = DEFAULT_IMAGE_API_BASE)]
    image_api_base: String,

    /// Model-service API key.
    #[arg(long, env = "NOVITA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Image-search access key. Leave unset to skip photos.
    #[arg(long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    image_key: Option<String>,

    /// Skip photo lookup entirely.
    #[arg(long, env = "IDEA2DECK_NO_IMAGES")]
    no_images: bool,

    /// Max tokens the model may generate.
    #[arg(long, env = "IDEA2DECK_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: u32,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "IDEA2DECK_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Completion-call timeout in seconds.
    #[arg(long, env = "IDEA2DECK_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Per-photo request timeout in seconds.
    #[arg(long, env = "IDEA2DECK_IMAGE_TIMEOUT", default_value_t = 30)]
    image_timeout: u64,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "IDEA2DECK_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Output the structured result (paths, deck, stats) as JSON on stdout.
    #[arg(long, env = "IDEA2DECK_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "IDEA2DECK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IDEA2DECK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the output path.
    #[arg(short, long, env = "IDEA2DECK_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn DeckProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;

    // ── Run ──────────────────────────────────────────────────────────────
    // One shared path whether titled or not, so token usage, timings, and
    // the fallback flag always reach the summary below.
    let title = cli.title.as_deref().unwrap_or(cli.idea.trim());
    let output = create_deck_with_title(&cli.idea, title, &config)
        .await
        .context("Pitch-deck generation failed")?;

    // ── Print results ────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    // The PDF path goes to stdout so scripts can capture it.
    println!("{}", output.pdf_path.display());

    if !cli.quiet {
        eprintln!(
            "{}  {}",
            green("✔"),
            bold(&output.pdf_path.display().to_string())
        );
        eprintln!("   side-car  {}", output.json_path.display());
        eprintln!(
            "   {} photos  {}  {}ms total",
            output.stats.images_embedded,
            dim(&format!(
                "{} tokens in / {} tokens out",
                output.stats.prompt_tokens, output.stats.completion_tokens
            )),
            output.stats.total_duration_ms,
        );
        if output.stats.used_fallback && !show_progress {
            eprintln!(
                "{} model reply was not valid JSON; the deck carries placeholder text",
                cyan("⚠")
            );
        }
    }

    Ok(())
}

/// Map CLI args to `DeckConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<DeckConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = DeckConfig::builder()
        .model(&cli.model)
        .api_base(&cli.api_base)
        .image_api_base(&cli.image_api_base)
        .credentials(Credentials::new(cli.api_key.clone(), cli.image_key.clone()))
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .fetch_images(!cli.no_images)
        .output_dir(&cli.output_dir)
        .api_timeout_secs(cli.api_timeout)
        .image_timeout_secs(cli.image_timeout);

    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
