//! Label/value sections: analysis, objectives, guidance and free topics

use super::exercise::parse_exercise;
use crate::plan::items::{Item, KeyValue};
use crate::plan::line::split_key_value;
use crate::plan::section::{ContentKind, ContentLine, Section};

fn key_value(line: &ContentLine) -> Option<KeyValue> {
    match &line.kind {
        ContentKind::KeyValue { label, value } => Some(KeyValue::new(label, value)),
        ContentKind::ListItem => split_key_value(&line.text)
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| KeyValue::new(label, value)),
        _ => None,
    }
}

/// Guidance, education and supplement sections. Every bullet is a fact,
/// with an empty label when it has none.
pub(crate) fn format_guidance(section: &Section) -> Vec<Item> {
    section
        .content
        .iter()
        .map(|line| match key_value(line) {
            Some(fact) => Item::Fact(fact),
            None if line.is_list_item() => Item::Fact(KeyValue::new("", line.text.as_str())),
            None => Item::Text(line.text.clone()),
        })
        .collect()
}

/// Analysis, objectives, topic and untitled sections.
pub(crate) fn format_facts(section: &Section, recognize_exercises: bool) -> Vec<Item> {
    section
        .content
        .iter()
        .map(|line| {
            if recognize_exercises {
                if let Some(exercise) = parse_exercise(&line.text) {
                    return Item::Exercise(exercise);
                }
            }
            match key_value(line) {
                Some(fact) => Item::Fact(fact),
                None => Item::Text(line.text.clone()),
            }
        })
        .collect()
}
