//! The pitch-deck data model.
//!
//! A [`PitchDeck`] is the in-memory result of a generation run: a mapping
//! from section name to [`SectionContent`]. The nine canonical section names
//! live in [`SECTION_ORDER`], which is the single source of truth for both
//! prompt construction ([`crate::prompts`]) and document layout
//! ([`crate::pipeline::layout`]). The rendered document always walks the
//! sections in this order, no matter how the model ordered its reply.
//!
//! ## Content shapes
//!
//! Models answer the same prompt with three different JSON shapes per
//! section: a plain string, an array of bullet points, or an object of
//! labelled sub-entries. Rather than threading `serde_json::Value` through
//! the renderer, the union is modelled as untagged enums so rendering is a
//! plain `match`. Scalar leaves the model writes as bare numbers or booleans
//! (`"Year 1 Revenue": 500000`) are coerced to their text form at parse
//! time; only genuinely unrenderable shapes (null, deeper nesting) are
//! rejected, which routes the whole reply to the placeholder deck, never a
//! panic.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The nine section names of a pitch deck, in document order.
pub const SECTION_ORDER: [&str; 9] = [
    "Problem",
    "Solution",
    "Market Analysis",
    "Competitors",
    "Unique Selling Proposition (USP)",
    "Business Model",
    "Financial Projections",
    "Team Overview",
    "Call to Action",
];

/// Placeholder shown in every section when the model reply cannot be parsed.
pub const FALLBACK_SECTION_TEXT: &str = "Failed to generate content. Please try again.";

/// A generated pitch deck: section name to content.
///
/// Produced by [`crate::generate`] and treated as immutable afterwards.
/// Sections the model omitted are simply absent (the renderer tolerates
/// that); sections the model invented beyond [`SECTION_ORDER`] are kept for
/// the JSON side-car but never rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchDeck {
    pub sections: BTreeMap<String, SectionContent>,
}

impl PitchDeck {
    /// Deck with every canonical section set to [`FALLBACK_SECTION_TEXT`].
    ///
    /// Used when the model reply is not valid JSON: the run still produces a
    /// complete document instead of failing.
    pub fn fallback() -> Self {
        let sections = SECTION_ORDER
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    SectionContent::Text(FALLBACK_SECTION_TEXT.to_string()),
                )
            })
            .collect();
        Self { sections }
    }

    /// Content for one section, if the model produced it.
    pub fn section(&self, name: &str) -> Option<&SectionContent> {
        self.sections.get(name)
    }
}

/// Content of a single deck section, mirroring the JSON shape the model used.
///
/// Untagged: `"text"`, `["a", "b"]` and `{"Label": ...}` each deserialize to
/// their own variant without a discriminator field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    /// Prose. Rendered sentence by sentence with the first one emphasised.
    /// Bare numbers and booleans land here as their text form.
    Text(#[serde(deserialize_with = "scalar")] String),
    /// Bullet list, order preserved. Scalar items are coerced to text.
    Items(#[serde(deserialize_with = "scalar_vec")] Vec<String>),
    /// Labelled sub-entries. A text-valued `Description` entry renders first.
    Fields(BTreeMap<String, FieldValue>),
}

/// Value of one labelled entry inside [`SectionContent::Fields`].
///
/// One level shallower than its parent: nested maps bottom out at plain
/// strings, which is as deep as model replies go in practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain text, rendered as `label: value`. Bare numbers and booleans
    /// land here as their text form.
    Text(#[serde(deserialize_with = "scalar")] String),
    /// Bulleted list under a `label:` line. Scalar items are coerced to text.
    Items(#[serde(deserialize_with = "scalar_vec")] Vec<String>),
    /// Sub-map rendered as bulleted `key: value` lines under a `label:` line.
    Fields(#[serde(deserialize_with = "scalar_map")] BTreeMap<String, String>),
}

// ── Scalar coercion ────────────────────────────────────────────────────────

/// Deserialize a JSON string, number, or boolean as text.
///
/// Models routinely emit bare scalars where the prompt implies prose
/// (`"Year 1 Revenue": 500000`); the renderer treats those exactly like
/// their string form, so one stray number must not fail the whole deck.
fn scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(&serde_json::Value::deserialize(deserializer)?)
        .ok_or_else(|| serde::de::Error::custom("expected a string, number, or boolean"))
}

fn scalar_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<serde_json::Value>::deserialize(deserializer)?
        .iter()
        .map(|item| {
            scalar_text(item).ok_or_else(|| {
                serde::de::Error::custom("expected list items to be strings, numbers, or booleans")
            })
        })
        .collect()
}

fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| {
            let text = scalar_text(&value).ok_or_else(|| {
                serde::de::Error::custom("expected map values to be strings, numbers, or booleans")
            })?;
            Ok((key, text))
        })
        .collect()
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
