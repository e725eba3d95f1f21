//! Section layout: [`SectionContent`] to a flat list of styled blocks.
//!
//! This stage decides *what* lines appear and in which style; geometry
//! (wrapping, cursor movement, pagination) belongs to [`crate::pipeline::pdf`].
//! Keeping it pure makes every rendering rule unit-testable without writing a
//! single PDF byte.
//!
//! ## Rendering rules
//!
//! * Prose splits on `". "` and the first sentence is emphasised. The split
//!   is literal, so every sentence except the last drops its trailing period.
//! * A bullet list gets a "Key Points:" label line, items in order.
//! * Labelled entries render a text-valued `Description` first (emphasised),
//!   then every other entry in map order: text as `label: value`, lists and
//!   sub-maps as a `label:` line followed by bullets.

use crate::deck::{FieldValue, SectionContent};
use std::collections::BTreeMap;

/// Label line introducing a top-level bullet list.
const LIST_HEADING: &str = "Key Points";

/// Entry treated as a section lead-in when its value is plain text.
const DESCRIPTION_KEY: &str = "Description";

/// One styled line (or labelled pair) in the document body.
///
/// Labels never carry their trailing colon; the renderer adds it.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Lead-in line: first sentence of prose, or a `Description` entry.
    Emphasis(String),
    /// Ordinary prose line.
    Body(String),
    /// Line introducing a list or sub-map, rendered as `label:`.
    Label(String),
    /// `label: value` line with the label set in bold.
    KeyValue { label: String, value: String },
    /// Plain bullet item.
    Bullet(String),
    /// Bulleted `label: value` line with the label set in bold.
    BulletKeyValue { label: String, value: String },
}

/// Render one section's content into blocks.
///
/// `None` (the model omitted the section) renders as no blocks at all: the
/// section shows its heading and nothing else.
pub fn section_blocks(content: Option<&SectionContent>) -> Vec<Block> {
    let mut blocks = Vec::new();
    match content {
        None => {}
        Some(SectionContent::Text(text)) => push_prose(text, &mut blocks),
        Some(SectionContent::Items(items)) => {
            blocks.push(Block::Label(LIST_HEADING.to_string()));
            blocks.extend(items.iter().map(|item| Block::Bullet(item.clone())));
        }
        Some(SectionContent::Fields(fields)) => push_fields(fields, &mut blocks),
    }
    blocks
}

/// Split prose on `". "`; emphasise the first fragment, skip empty ones.
///
/// The emphasis goes to index 0 of the split specifically: text that *starts*
/// with a sentence boundary produces no emphasised line.
fn push_prose(text: &str, blocks: &mut Vec<Block>) {
    for (i, sentence) in text.split(". ").enumerate() {
        let line = sentence.trim();
        if line.is_empty() {
            continue;
        }
        if i == 0 {
            blocks.push(Block::Emphasis(line.to_string()));
        } else {
            blocks.push(Block::Body(line.to_string()));
        }
    }
}

fn push_fields(fields: &BTreeMap<String, FieldValue>, blocks: &mut Vec<Block>) {
    // A text-valued Description leads the section; any other shape under
    // that key is rendered like a normal entry below.
    let description_leads = matches!(fields.get(DESCRIPTION_KEY), Some(FieldValue::Text(_)));
    if let Some(FieldValue::Text(description)) = fields.get(DESCRIPTION_KEY) {
        blocks.push(Block::Emphasis(description.clone()));
    }

    for (label, value) in fields {
        if label == DESCRIPTION_KEY && description_leads {
            continue;
        }
        match value {
            FieldValue::Text(text) => blocks.push(Block::KeyValue {
                label: label.clone(),
                value: text.clone(),
            }),
            FieldValue::Items(items) => {
                blocks.push(Block::Label(label.clone()));
                blocks.extend(items.iter().map(|item| Block::Bullet(item.clone())));
            }
            FieldValue::Fields(entries) => {
                blocks.push(Block::Label(label.clone()));
                blocks.extend(entries.iter().map(|(key, value)| Block::BulletKeyValue {
                    label: key.clone(),
                    value: value.clone(),
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(entries: Vec<(&str, FieldValue)>) -> SectionContent {
        SectionContent::Fields(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn prose_emphasises_first_sentence_only() {
        let content = SectionContent::Text("Plants die. Owners forget. Watering is boring.".into());
        let blocks = section_blocks(Some(&content));
        assert_eq!(
            blocks,
            vec![
                Block::Emphasis("Plants die".into()),
                Block::Body("Owners forget".into()),
                Block::Body("Watering is boring.".into()),
            ]
        );
    }

    #[test]
    fn prose_single_sentence_is_one_emphasised_block() {
        let content = SectionContent::Text("One sentence only.".into());
        let blocks = section_blocks(Some(&content));
        assert_eq!(blocks, vec![Block::Emphasis("One sentence only.".into())]);
    }

    #[test]
    fn prose_leading_boundary_produces_no_emphasis() {
        // Index 0 of the split is empty and skipped; the remaining fragment
        // keeps its body style.
        let content = SectionContent::Text(". Late start".into());
        let blocks = section_blocks(Some(&content));
        assert_eq!(blocks, vec![Block::Body("Late start".into())]);
    }

    #[test]
    fn list_gets_heading_and_ordered_bullets() {
        let content = SectionContent::Items(vec!["First".into(), "Second".into()]);
        let blocks = section_blocks(Some(&content));
        assert_eq!(
            blocks,
            vec![
                Block::Label("Key Points".into()),
                Block::Bullet("First".into()),
                Block::Bullet("Second".into()),
            ]
        );
    }

    #[test]
    fn description_leads_labelled_entries() {
        let content = fields(vec![
            (
                "Main Competitors",
                FieldValue::Items(vec!["Acme".into(), "BrewBox".into()]),
            ),
            ("Description", FieldValue::Text("A crowded space.".into())),
        ]);
        let blocks = section_blocks(Some(&content));
        assert_eq!(blocks[0], Block::Emphasis("A crowded space.".into()));
        assert_eq!(blocks[1], Block::Label("Main Competitors".into()));
        assert_eq!(blocks[2], Block::Bullet("Acme".into()));
        assert_eq!(blocks[3], Block::Bullet("BrewBox".into()));
        assert_eq!(blocks.len(), 4);
    }

    #[test]
    fn non_text_description_renders_as_ordinary_entry() {
        let content = fields(vec![(
            "Description",
            FieldValue::Items(vec!["point".into()]),
        )]);
        let blocks = section_blocks(Some(&content));
        assert_eq!(
            blocks,
            vec![
                Block::Label("Description".into()),
                Block::Bullet("point".into()),
            ]
        );
    }

    #[test]
    fn text_entry_renders_as_key_value() {
        let content = fields(vec![("Pricing", FieldValue::Text("Tiered".into()))]);
        let blocks = section_blocks(Some(&content));
        assert_eq!(
            blocks,
            vec![Block::KeyValue {
                label: "Pricing".into(),
                value: "Tiered".into(),
            }]
        );
    }

    #[test]
    fn sub_map_renders_as_bulleted_key_values() {
        let content = fields(vec![(
            "Market Share",
            FieldValue::Fields(
                [("Acme".to_string(), "40%".to_string())].into_iter().collect(),
            ),
        )]);
        let blocks = section_blocks(Some(&content));
        assert_eq!(
            blocks,
            vec![
                Block::Label("Market Share".into()),
                Block::BulletKeyValue {
                    label: "Acme".into(),
                    value: "40%".into(),
                },
            ]
        );
    }

    #[test]
    fn absent_section_renders_nothing() {
        assert!(section_blocks(None).is_empty());
    }

    #[test]
    fn empty_prose_renders_nothing() {
        let content = SectionContent::Text("".into());
        assert!(section_blocks(Some(&content)).is_empty());
    }
}
