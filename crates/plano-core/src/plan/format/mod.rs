//! Item formatting
//!
//! Turns a section's content lines into structured [`Item`]s. The plan
//! profile picks the formatter from the section type; every formatter is a
//! pure function of the section and keeps lines it cannot structure as
//! [`Item::Text`].

mod exercise;
mod facts;
mod meal;
mod shopping;

use tracing::trace;

use super::items::Item;
use super::profile::{Formatter, PlanProfile};
use super::section::Section;

/// Format one section's content.
pub fn format_items(section: &Section, profile: &PlanProfile) -> Vec<Item> {
    let formatter = profile.formatter_for(section.section_type);
    let items = match formatter {
        Formatter::Exercises => exercise::format_exercises(section),
        Formatter::Meals => meal::format_meals(section),
        Formatter::Shopping => shopping::format_shopping(section),
        Formatter::Guidance => facts::format_guidance(section),
        Formatter::Facts => facts::format_facts(section, profile.recognizes_exercises()),
    };
    trace!(
        title = %section.title,
        ?formatter,
        items = items.len(),
        "Formatted section"
    );
    items
}
