//! Plan text interpretation
//!
//! Turns LLM-written workout, nutrition and rehab plans into structured
//! sections and items:
//! - [`line`] classifies each raw line once
//! - [`section`] groups lines under headers
//! - [`tagger`] types each section from its title
//! - [`format`] turns section content into items
//! - [`schedule`] picks what applies to a given weekday
//!
//! Every stage is a pure function; one pipeline serves all plan kinds and a
//! [`PlanProfile`] supplies the per-kind vocabulary.

pub mod cache;
pub mod completion;
pub mod format;
pub mod gate;
pub mod items;
pub mod line;
pub mod profile;
pub mod schedule;
pub mod section;
pub mod tagger;
pub mod weekday;

use serde::Serialize;
use tracing::debug;

pub use cache::ParseCache;
pub use completion::{day_progress, CompletionStore, DayProgress, MemoryCompletionStore};
pub use format::format_items;
pub use gate::{detect_kind, looks_like_plan, validate_plan_text};
pub use items::{CategoryGroup, DayGroup, ExerciseBlock, ExerciseItem, Item, KeyValue, MealItem};
pub use line::{classify, HeaderMeta, Line, LineKind};
pub use profile::{Formatter, PlanKind, PlanProfile};
pub use schedule::{
    resolve_menu, resolve_rehab, resolve_workout, Activity, ExerciseId, FocusArea, RestDay,
    RotationSlot, ScheduleOptions, ScheduledExercise, TodayRehab, TodayWorkout, WorkoutLetter,
    WorkoutRotation,
};
pub use section::{build_sections, ContentKind, ContentLine, Section};
pub use tagger::{tag_type, KeywordRule, KeywordTable, SectionType};

/// Classify and group a whole plan text into sections.
pub fn parse(text: &str, profile: &PlanProfile) -> Vec<Section> {
    let sections = build_sections(text.lines().map(classify), &profile.keywords);
    debug!(kind = %profile.kind, sections = sections.len(), "Parsed plan text");
    sections
}

/// A section together with its formatted items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSection {
    #[serde(flatten)]
    pub section: Section,
    pub items: Vec<Item>,
}

/// Fully interpreted plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub kind: PlanKind,
    pub sections: Vec<PlanSection>,
}

impl Plan {
    pub fn parse(text: &str, profile: &PlanProfile) -> Self {
        let sections = parse(text, profile)
            .into_iter()
            .map(|section| PlanSection {
                items: format_items(&section, profile),
                section,
            })
            .collect();
        Self {
            kind: profile.kind,
            sections,
        }
    }

    /// The bare sections, for the schedule resolvers.
    pub fn sections(&self) -> Vec<Section> {
        self.sections.iter().map(|s| s.section.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const SCENARIO: &str = "### **1. ANÁLISE NUTRICIONAL**\n\
Peso: 70kg\n\
Altura: 175cm\n\
\n\
### **2. CARDÁPIO SEMANAL**\n\
#### **Segunda-feira**\n\
* Café da Manhã (07:00)\n\
- Ovos e pão integral\n";

    #[test]
    fn test_nutrition_scenario() {
        let profile = PlanProfile::builtin(PlanKind::Nutrition);
        let plan = Plan::parse(SCENARIO, &profile);
        assert_eq!(plan.sections.len(), 2);

        let analysis = &plan.sections[0];
        assert_eq!(analysis.section.section_type, SectionType::Analysis);
        assert_eq!(analysis.section.number, Some(1));
        assert_eq!(
            analysis.items,
            vec![
                Item::Fact(KeyValue::new("Peso", "70kg")),
                Item::Fact(KeyValue::new("Altura", "175cm")),
            ]
        );

        let menu = &plan.sections[1];
        assert_eq!(menu.section.section_type, SectionType::WeeklyMenu);
        assert_eq!(
            menu.items,
            vec![Item::Day(DayGroup {
                day: Weekday::Mon,
                label: "Segunda-feira".to_string(),
                meals: vec![MealItem {
                    name: "Café da Manhã".to_string(),
                    time: Some("07:00".to_string()),
                    foods: vec!["Ovos e pão integral".to_string()],
                    calories: None,
                }],
                notes: Vec::new(),
                calories: None,
            })]
        );
    }

    #[test]
    fn test_empty_text() {
        for kind in PlanKind::ALL {
            let profile = PlanProfile::builtin(kind);
            assert!(parse("", &profile).is_empty());
            assert!(Plan::parse("", &profile).sections.is_empty());
        }
    }

    #[test]
    fn test_no_headers_single_other_section() {
        let profile = PlanProfile::builtin(PlanKind::Nutrition);
        let sections = parse("linha um\nlinha dois\n\nlinha três", &profile);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_type, SectionType::Other);
        assert_eq!(sections[0].content.len(), 3);
    }

    #[test]
    fn test_section_count_matches_headers() {
        let profile = PlanProfile::builtin(PlanKind::Workout);
        let text = "# Plano\n## TREINO A\n- Supino: 3x10\n**2. ORIENTAÇÕES**\nTREINO B - Costas\n### Dicas\n#### Detalhe";
        let headers = text.lines().filter(|l| classify(l).is_header()).count();
        assert_eq!(headers, 5);
        assert_eq!(parse(text, &profile).len(), headers);
    }

    #[test]
    fn test_unmarked_vocabulary_headers_open_sections() {
        let profile = PlanProfile::builtin(PlanKind::Nutrition);
        let plan = Plan::parse(
            "ANÁLISE NUTRICIONAL\nPeso: 70kg\nLISTA DE COMPRAS\n- Frango",
            &profile,
        );
        let types: Vec<SectionType> = plan.sections.iter().map(|s| s.section.section_type).collect();
        assert_eq!(types, vec![SectionType::Analysis, SectionType::Shopping]);
        assert!(!plan.sections[0].section.preamble);
        assert_eq!(plan.sections[1].section.content_lines(), vec!["Frango"]);
    }

    #[test]
    fn test_bare_exercise_line_in_untitled_section() {
        let profile = PlanProfile::builtin(PlanKind::Workout);
        let plan = Plan::parse("- Supino reto: 3x8-12", &profile);
        assert_eq!(plan.sections.len(), 1);
        let exercises: Vec<_> = plan.sections[0]
            .items
            .iter()
            .filter_map(Item::as_exercise)
            .collect();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].sets, "3");
        assert_eq!(exercises[0].reps, "8-12");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let profile = PlanProfile::builtin(PlanKind::Nutrition);
        assert_eq!(Plan::parse(SCENARIO, &profile), Plan::parse(SCENARIO, &profile));
    }

    #[test]
    fn test_json_shape() {
        let profile = PlanProfile::builtin(PlanKind::Nutrition);
        let plan = Plan::parse(SCENARIO, &profile);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["kind"], "nutrition");
        assert_eq!(json["sections"][1]["type"], "weekly-menu");
        assert_eq!(json["sections"][0]["items"][0]["kind"], "fact");
        assert_eq!(json["sections"][0]["items"][0]["data"]["label"], "Peso");
    }
}
