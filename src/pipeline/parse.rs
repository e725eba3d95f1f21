//! Reply parsing: assistant content to [`PitchDeck`], with the fallback rule.
//!
//! The generation contract is strict-JSON-or-placeholder. A reply that does
//! not parse as a deck object produces a deck whose every canonical section
//! carries [`FALLBACK_SECTION_TEXT`], so the run still ends with a complete
//! document. The reply is never repaired — no fence stripping, no trailing
//! comma fixes; parsing is all-or-nothing.
//!
//! The raw reply is emitted at `debug` level on failure so a misbehaving
//! model can be diagnosed without changing what callers observe.

use crate::deck::PitchDeck;
use tracing::{debug, warn};

/// Parse assistant content into a deck.
///
/// Returns the deck and whether the placeholder fallback was used. Accepts
/// any JSON object whose values fit the content union; sections beyond the
/// canonical nine are kept (they end up in the JSON side-car), missing ones
/// are tolerated.
pub fn parse_reply(raw: &str) -> (PitchDeck, bool) {
    match serde_json::from_str::<PitchDeck>(raw) {
        Ok(deck) => {
            debug!("parsed {} sections from model reply", deck.sections.len());
            (deck, false)
        }
        Err(e) => {
            warn!("Model reply is not a valid pitch-deck object: {e}");
            debug!(raw_reply = %raw, "unparseable model reply");
            (PitchDeck::fallback(), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{SectionContent, FALLBACK_SECTION_TEXT, SECTION_ORDER};

    #[test]
    fn valid_reply_parses_without_fallback() {
        let raw = r#"{
            "Problem": "Plants die.",
            "Solution": ["Sensors", "Automatic watering"],
            "Market Analysis": {"Description": "Large market.", "TAM": "$2B"}
        }"#;
        let (deck, used_fallback) = parse_reply(raw);
        assert!(!used_fallback);
        assert_eq!(deck.sections.len(), 3);
        assert_eq!(
            deck.section("Problem"),
            Some(&SectionContent::Text("Plants die.".into()))
        );
    }

    #[test]
    fn non_json_reply_falls_back_to_placeholders() {
        let (deck, used_fallback) = parse_reply("Sure! Here's your pitch deck:\n{\"Problem\":");
        assert!(used_fallback);
        assert_eq!(deck.sections.len(), SECTION_ORDER.len());
        for name in SECTION_ORDER {
            assert_eq!(
                deck.section(name),
                Some(&SectionContent::Text(FALLBACK_SECTION_TEXT.into()))
            );
        }
    }

    #[test]
    fn fenced_json_is_not_repaired() {
        // Markdown fences around otherwise valid JSON still take the
        // fallback: parsing is all-or-nothing.
        let raw = "```json\n{\"Problem\": \"x\"}\n```";
        let (_, used_fallback) = parse_reply(raw);
        assert!(used_fallback);
    }

    #[test]
    fn valid_json_that_is_not_an_object_falls_back() {
        let (_, used_fallback) = parse_reply("\"just a string\"");
        assert!(used_fallback);
        let (_, used_fallback) = parse_reply("[1, 2, 3]");
        assert!(used_fallback);
    }

    #[test]
    fn missing_sections_are_tolerated() {
        let (deck, used_fallback) = parse_reply(r#"{"Problem": "Only one section."}"#);
        assert!(!used_fallback);
        assert_eq!(deck.sections.len(), 1);
        assert!(deck.section("Solution").is_none());
    }

    #[test]
    fn extra_sections_are_kept() {
        let (deck, used_fallback) =
            parse_reply(r#"{"Problem": "x", "Bonus Slide": "surprise"}"#);
        assert!(!used_fallback);
        assert!(deck.section("Bonus Slide").is_some());
    }

    #[test]
    fn numeric_sub_value_does_not_discard_good_sections() {
        // One scalar leaf among otherwise-good sections must not cost the
        // caller the whole deck: the number is coerced to text instead.
        let raw = r#"{
            "Problem": "Coffee goes stale.",
            "Solution": "Roast on demand.",
            "Market Analysis": "Growing market.",
            "Competitors": "Crowded space.",
            "Unique Selling Proposition (USP)": "Freshness.",
            "Business Model": "Subscriptions.",
            "Financial Projections": {"Year 1 Revenue": 500000},
            "Team Overview": "Two founders.",
            "Call to Action": "Join the round."
        }"#;
        let (deck, used_fallback) = parse_reply(raw);
        assert!(!used_fallback, "a scalar leaf must not trigger the fallback");
        assert_eq!(deck.sections.len(), SECTION_ORDER.len());
        assert_eq!(
            deck.section("Problem"),
            Some(&SectionContent::Text("Coffee goes stale.".into()))
        );
        match deck.section("Financial Projections") {
            Some(SectionContent::Fields(fields)) => {
                assert_eq!(
                    fields.get("Year 1 Revenue").and_then(|v| match v {
                        crate::deck::FieldValue::Text(t) => Some(t.as_str()),
                        _ => None,
                    }),
                    Some("500000")
                );
            }
            other => panic!("expected labelled entries, got {other:?}"),
        }
    }

    #[test]
    fn unrenderable_value_shape_falls_back() {
        let (deck, used_fallback) = parse_reply(r#"{"Problem": null}"#);
        assert!(used_fallback);
        assert_eq!(deck.sections.len(), SECTION_ORDER.len());
    }
}
