//! Configuration types for pitch-deck generation.
//!
//! All generation behaviour is controlled through [`DeckConfig`], built via
//! its [`DeckConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across threads, log them (credentials are
//! redacted in `Debug`), and diff two runs to understand why their outputs
//! differ.
//!
//! # Design choice: builder over constructor
//! A fifteen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::DeckError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Default chat-completion model.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct-fp8";

/// Default OpenAI-compatible completion endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.novita.ai/v3/openai";

/// Default image-search endpoint.
pub const DEFAULT_IMAGE_API_BASE: &str = "https://api.unsplash.com";

/// Environment variable holding the model-service API key.
pub const MODEL_KEY_ENV: &str = "NOVITA_API_KEY";

/// Environment variable holding the image-search access key.
pub const IMAGE_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

// Placeholder values from sample dotfiles; treated the same as "unset" so a
// copied template never reaches the network.
const MODEL_KEY_PLACEHOLDER: &str = "YOUR_NOVITA_API_KEY";
const IMAGE_KEY_PLACEHOLDER: &str = "YOUR_UNSPLASH_API_KEY";

/// API credentials for the two remote services.
///
/// Both keys are optional at construction time. A missing model key fails the
/// run before any network call; a missing image key merely disables
/// illustrations. `Debug` never prints key material.
#[derive(Clone, Default)]
pub struct Credentials {
    model_api_key: Option<String>,
    image_access_key: Option<String>,
}

impl Credentials {
    /// Credentials from explicit values. `None` means "not configured".
    pub fn new(model_api_key: Option<String>, image_access_key: Option<String>) -> Self {
        Self {
            model_api_key,
            image_access_key,
        }
    }

    /// Credentials from [`MODEL_KEY_ENV`] and [`IMAGE_KEY_ENV`].
    ///
    /// The process environment is read exactly here; nothing else in the
    /// library touches it.
    pub fn from_env() -> Self {
        Self {
            model_api_key: std::env::var(MODEL_KEY_ENV).ok(),
            image_access_key: std::env::var(IMAGE_KEY_ENV).ok(),
        }
    }

    /// Usable model-service key: set, non-empty, and not the placeholder.
    pub fn model_key(&self) -> Option<&str> {
        usable(self.model_api_key.as_deref(), MODEL_KEY_PLACEHOLDER)
    }

    /// Usable image-search key: set, non-empty, and not the placeholder.
    pub fn image_key(&self) -> Option<&str> {
        usable(self.image_access_key.as_deref(), IMAGE_KEY_PLACEHOLDER)
    }
}

fn usable<'a>(value: Option<&'a str>, placeholder: &str) -> Option<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != placeholder)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("model_api_key", &redact(self.model_key()))
            .field("image_access_key", &redact(self.image_key()))
            .finish()
    }
}

fn redact(key: Option<&str>) -> &'static str {
    if key.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}

/// Configuration for one pitch-deck generation run.
///
/// Built via [`DeckConfig::builder()`] or using [`DeckConfig::default()`].
///
/// # Example
/// ```rust
/// use idea2deck::DeckConfig;
///
/// let config = DeckConfig::builder()
///     .temperature(0.8)
///     .max_tokens(2048)
///     .fetch_images(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct DeckConfig {
    /// Chat-completion model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Base URL of the OpenAI-compatible completion endpoint, without the
    /// `/chat/completions` suffix. Default: [`DEFAULT_API_BASE`].
    ///
    /// Any endpoint speaking the same protocol works; the request includes a
    /// `response_format` of `json_object`, so the endpoint should support
    /// JSON mode.
    pub api_base: String,

    /// Base URL of the image-search endpoint. Default: [`DEFAULT_IMAGE_API_BASE`].
    pub image_api_base: String,

    /// API credentials for both services. Default: empty (no keys).
    pub credentials: Credentials,

    /// Sampling temperature. Range 0.0–2.0. Default: 0.7.
    ///
    /// Deck copy benefits from some variation; 0.7 keeps the JSON structure
    /// stable while letting the wording breathe. Lower it for more
    /// reproducible content.
    pub temperature: f32,

    /// Nucleus sampling cutoff. Range 0.0–1.0. Default: 1.0.
    pub top_p: f32,

    /// Presence penalty. Default: 0.0.
    pub presence_penalty: f32,

    /// Frequency penalty. Default: 0.0.
    pub frequency_penalty: f32,

    /// Top-k sampling cutoff. Default: 50.
    ///
    /// A sampling extension accepted by the default endpoint; other
    /// OpenAI-compatible endpoints may ignore it.
    pub top_k: u32,

    /// Repetition penalty. Default: 1.0 (off). Same caveat as `top_k`.
    pub repetition_penalty: f32,

    /// Minimum token probability cutoff. Default: 0.0 (off). Same caveat as
    /// `top_k`.
    pub min_p: f32,

    /// Maximum tokens the model may generate. Default: 4096.
    ///
    /// Nine prose sections fit comfortably in 2 000–3 000 tokens; 4 096
    /// leaves headroom so the JSON is never truncated mid-object (a truncated
    /// reply fails parsing and the whole deck falls back to placeholders).
    pub max_tokens: u32,

    /// Look up one stock photo per section. Default: true.
    ///
    /// Lookups are best-effort: any failure renders that section without an
    /// illustration. Requires an image access key to have any effect.
    pub fetch_images: bool,

    /// Directory receiving the PDF and JSON outputs. Created if missing.
    /// Default: the current directory.
    pub output_dir: PathBuf,

    /// Custom system prompt. If None, uses
    /// [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Per-request timeout for the completion call, in seconds. Default: 120.
    ///
    /// A full nine-section deck is a long completion; generous by design.
    pub api_timeout_secs: u64,

    /// Per-request timeout for image search and download, in seconds.
    /// Default: 30.
    pub image_timeout_secs: u64,

    /// Optional progress callback, invoked at generation and layout
    /// milestones. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_api_base: DEFAULT_IMAGE_API_BASE.to_string(),
            credentials: Credentials::default(),
            temperature: 0.7,
            top_p: 1.0,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            top_k: 50,
            repetition_penalty: 1.0,
            min_p: 0.0,
            max_tokens: 4096,
            fetch_images: true,
            output_dir: PathBuf::from("."),
            system_prompt: None,
            api_timeout_secs: 120,
            image_timeout_secs: 30,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for DeckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckConfig")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("image_api_base", &self.image_api_base)
            .field("credentials", &self.credentials)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .field("fetch_images", &self.fetch_images)
            .field("output_dir", &self.output_dir)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn DeckProgressCallback>"),
            )
            .finish()
    }
}

impl DeckConfig {
    /// Create a new builder for `DeckConfig`.
    pub fn builder() -> DeckConfigBuilder {
        DeckConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DeckConfig`].
#[derive(Debug)]
pub struct DeckConfigBuilder {
    config: DeckConfig,
}

impl DeckConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    pub fn image_api_base(mut self, base: impl Into<String>) -> Self {
        self.config.image_api_base = base.into();
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn top_p(mut self, p: f32) -> Self {
        self.config.top_p = p.clamp(0.0, 1.0);
        self
    }

    pub fn presence_penalty(mut self, p: f32) -> Self {
        self.config.presence_penalty = p;
        self
    }

    pub fn frequency_penalty(mut self, p: f32) -> Self {
        self.config.frequency_penalty = p;
        self
    }

    pub fn top_k(mut self, k: u32) -> Self {
        self.config.top_k = k.max(1);
        self
    }

    pub fn repetition_penalty(mut self, p: f32) -> Self {
        self.config.repetition_penalty = p;
        self
    }

    pub fn min_p(mut self, p: f32) -> Self {
        self.config.min_p = p.clamp(0.0, 1.0);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn fetch_images(mut self, v: bool) -> Self {
        self.config.fetch_images = v;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn image_timeout_secs(mut self, secs: u64) -> Self {
        self.config.image_timeout_secs = secs.max(1);
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Trailing slashes on the endpoint bases are stripped so request URLs
    /// never contain `//`.
    pub fn build(mut self) -> Result<DeckConfig, DeckError> {
        let base = self.config.api_base.trim_end_matches('/');
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(DeckError::InvalidConfig(format!(
                "api_base must be an HTTP(S) URL, got '{}'",
                self.config.api_base
            )));
        }
        let image_base = self.config.image_api_base.trim_end_matches('/');
        if !image_base.starts_with("http://") && !image_base.starts_with("https://") {
            return Err(DeckError::InvalidConfig(format!(
                "image_api_base must be an HTTP(S) URL, got '{}'",
                self.config.image_api_base
            )));
        }
        if self.config.model.trim().is_empty() {
            return Err(DeckError::InvalidConfig("model must not be empty".into()));
        }
        self.config.api_base = base.to_string();
        self.config.image_api_base = image_base.to_string();
        Ok(self.config)
    }
}
