//! Day/schedule resolution
//!
//! Answers "what do I do today?" from parsed sections. Workouts follow a
//! fixed weekly letter rotation with a static fallback so a workout day is
//! never empty. Rehab days come from sections (or day sub-groups) naming
//! the weekday. Completion state is not tracked here, see
//! [`super::completion`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::format::format_items;
use super::items::{DayGroup, ExerciseBlock, ExerciseItem, Item};
use super::profile::{Formatter, PlanProfile};
use super::section::Section;
use super::weekday::{from_index, portuguese_name};
use crate::constants::schedule::{
    MAX_TODAY_EXERCISES, REST_DAY_DESCRIPTION, REST_DAY_DURATION_MINUTES, REST_DAY_TITLE,
};
use crate::text::slugify;

// ============================================================================
// Rotation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutLetter {
    A,
    B,
    C,
    D,
    E,
}

impl WorkoutLetter {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutLetter::A => "A",
            WorkoutLetter::B => "B",
            WorkoutLetter::C => "C",
            WorkoutLetter::D => "D",
            WorkoutLetter::E => "E",
        }
    }
}

impl fmt::Display for WorkoutLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(WorkoutLetter::A),
            "B" => Ok(WorkoutLetter::B),
            "C" => Ok(WorkoutLetter::C),
            "D" => Ok(WorkoutLetter::D),
            "E" => Ok(WorkoutLetter::E),
            _ => Err(format!("Unknown workout letter: {}", s)),
        }
    }
}

/// One weekday of the rotation. Written as `"rest"` or a letter in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RotationSlot {
    Rest,
    Workout(WorkoutLetter),
}

impl fmt::Display for RotationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationSlot::Rest => f.write_str("rest"),
            RotationSlot::Workout(letter) => write!(f, "{}", letter),
        }
    }
}

impl FromStr for RotationSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rest" | "descanso" | "off" => Ok(RotationSlot::Rest),
            other => other.parse().map(RotationSlot::Workout),
        }
    }
}

impl TryFrom<String> for RotationSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RotationSlot> for String {
    fn from(slot: RotationSlot) -> Self {
        slot.to_string()
    }
}

/// Seven slots, index 0 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutRotation([RotationSlot; 7]);

impl WorkoutRotation {
    pub fn new(slots: [RotationSlot; 7]) -> Self {
        Self(slots)
    }

    pub fn slot(&self, weekday_index: u8) -> RotationSlot {
        self.0[(weekday_index % 7) as usize]
    }

    pub fn slots(&self) -> &[RotationSlot; 7] {
        &self.0
    }
}

impl Default for WorkoutRotation {
    fn default() -> Self {
        use RotationSlot::{Rest, Workout};
        use WorkoutLetter::*;
        Self([
            Rest,
            Workout(A),
            Workout(B),
            Workout(C),
            Workout(D),
            Workout(E),
            Rest,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOptions {
    pub rotation: WorkoutRotation,
    pub max_exercises: usize,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            rotation: WorkoutRotation::default(),
            max_exercises: MAX_TODAY_EXERCISES,
        }
    }
}

// ============================================================================
// Focus areas and fallback workouts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusArea {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    FullBody,
}

/// Normalized title keywords, checked in order
static FOCUS_KEYWORDS: LazyLock<Vec<(&'static str, FocusArea)>> = LazyLock::new(|| {
    vec![
        ("PEITO", FocusArea::Chest),
        ("PEITORAL", FocusArea::Chest),
        ("COSTAS", FocusArea::Back),
        ("DORSAL", FocusArea::Back),
        ("PERNA", FocusArea::Legs),
        ("INFERIOR", FocusArea::Legs),
        ("QUADRICEPS", FocusArea::Legs),
        ("GLUTEO", FocusArea::Legs),
        ("POSTERIOR", FocusArea::Legs),
        ("OMBRO", FocusArea::Shoulders),
        ("DELTOIDE", FocusArea::Shoulders),
        ("BRACO", FocusArea::Arms),
        ("BICEPS", FocusArea::Arms),
        ("TRICEPS", FocusArea::Arms),
        ("ABDOM", FocusArea::Core),
        ("CORE", FocusArea::Core),
        ("FULL BODY", FocusArea::FullBody),
        ("CORPO INTEIRO", FocusArea::FullBody),
    ]
});

impl FocusArea {
    pub fn label(&self) -> &'static str {
        match self {
            FocusArea::Chest => "Peito",
            FocusArea::Back => "Costas",
            FocusArea::Legs => "Pernas",
            FocusArea::Shoulders => "Ombros",
            FocusArea::Arms => "Braços",
            FocusArea::Core => "Core",
            FocusArea::FullBody => "Corpo inteiro",
        }
    }

    /// First focus keyword found in a normalized title.
    pub fn detect(normalized_title: &str) -> Option<FocusArea> {
        FOCUS_KEYWORDS
            .iter()
            .find(|(keyword, _)| normalized_title.contains(keyword))
            .map(|(_, focus)| *focus)
    }

    pub fn for_weekday(weekday_index: u8) -> FocusArea {
        match weekday_index % 7 {
            1 => FocusArea::Chest,
            2 => FocusArea::Back,
            3 => FocusArea::Legs,
            4 => FocusArea::Shoulders,
            5 => FocusArea::Arms,
            0 => FocusArea::Core,
            _ => FocusArea::FullBody,
        }
    }
}

/// `(name, sets, reps, rest)`
type FallbackExercise = (&'static str, &'static str, &'static str, &'static str);

static FALLBACK_WORKOUTS: LazyLock<Vec<(FocusArea, Vec<FallbackExercise>)>> =
    LazyLock::new(|| {
        vec![
            (
                FocusArea::Chest,
                vec![
                    ("Supino reto", "4", "8-12", "90s"),
                    ("Supino inclinado com halteres", "3", "10-12", "90s"),
                    ("Crucifixo com halteres", "3", "12", "60s"),
                    ("Crossover", "3", "12-15", "60s"),
                    ("Tríceps na polia", "3", "12", "60s"),
                    ("Tríceps francês", "3", "10-12", "60s"),
                ],
            ),
            (
                FocusArea::Back,
                vec![
                    ("Puxada frontal", "4", "8-12", "90s"),
                    ("Remada curvada", "4", "8-10", "90s"),
                    ("Remada unilateral", "3", "10-12", "60s"),
                    ("Pulldown com braço estendido", "3", "12", "60s"),
                    ("Rosca direta", "3", "10-12", "60s"),
                    ("Rosca martelo", "3", "12", "60s"),
                ],
            ),
            (
                FocusArea::Legs,
                vec![
                    ("Agachamento livre", "4", "8-10", "120s"),
                    ("Leg press", "4", "10-12", "90s"),
                    ("Cadeira extensora", "3", "12-15", "60s"),
                    ("Mesa flexora", "3", "12", "60s"),
                    ("Stiff", "3", "10-12", "90s"),
                    ("Panturrilha em pé", "4", "15", "45s"),
                ],
            ),
            (
                FocusArea::Shoulders,
                vec![
                    ("Desenvolvimento com halteres", "4", "8-12", "90s"),
                    ("Elevação lateral", "3", "12-15", "60s"),
                    ("Elevação frontal", "3", "12", "60s"),
                    ("Crucifixo invertido", "3", "12-15", "60s"),
                    ("Encolhimento", "3", "12", "60s"),
                ],
            ),
            (
                FocusArea::Arms,
                vec![
                    ("Rosca direta", "4", "10", "60s"),
                    ("Rosca alternada", "3", "12", "60s"),
                    ("Rosca concentrada", "3", "12", "45s"),
                    ("Tríceps testa", "4", "10", "60s"),
                    ("Tríceps corda", "3", "12", "45s"),
                    ("Mergulho no banco", "3", "12", "45s"),
                ],
            ),
            (
                FocusArea::Core,
                vec![
                    ("Prancha", "3", "30s", "45s"),
                    ("Abdominal supra", "3", "20", "45s"),
                    ("Elevação de pernas", "3", "15", "45s"),
                    ("Prancha lateral", "3", "30s", "45s"),
                    ("Abdominal bicicleta", "3", "20", "45s"),
                ],
            ),
            (
                FocusArea::FullBody,
                vec![
                    ("Agachamento", "3", "12", "60s"),
                    ("Flexão de braço", "3", "12", "60s"),
                    ("Remada com halteres", "3", "12", "60s"),
                    ("Desenvolvimento com halteres", "3", "12", "60s"),
                    ("Prancha", "3", "30s", "45s"),
                ],
            ),
        ]
    });

fn fallback_exercises(focus: FocusArea) -> Vec<ExerciseItem> {
    FALLBACK_WORKOUTS
        .iter()
        .find(|(area, _)| *area == focus)
        .map(|(_, exercises)| exercises.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|(name, sets, reps, rest)| ExerciseItem {
            name: name.to_string(),
            sets: sets.to_string(),
            reps: reps.to_string(),
            rest_time: Some(rest.to_string()),
            notes: Vec::new(),
            day: None,
        })
        .collect()
}

// ============================================================================
// Scheduled exercises
// ============================================================================

/// Stable identifier of an exercise within a day: `slug(name)-index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(String);

impl ExerciseId {
    pub fn new(name: &str, index: usize) -> Self {
        let slug = slugify(name);
        let slug = if slug.is_empty() { "exercicio".to_string() } else { slug };
        Self(format!("{}-{}", slug, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExerciseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activity {
    Exercise(ExerciseItem),
    Block(ExerciseBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledExercise {
    pub id: ExerciseId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub activity: Activity,
}

fn schedule<I>(activities: I) -> Vec<ScheduledExercise>
where
    I: IntoIterator<Item = (Activity, Option<String>)>,
{
    activities
        .into_iter()
        .enumerate()
        .map(|(index, (activity, phase))| {
            let name = match &activity {
                Activity::Exercise(exercise) => exercise.name.clone(),
                Activity::Block(block) => block.name.clone(),
            };
            ScheduledExercise {
                id: ExerciseId::new(&name, index),
                name,
                phase,
                activity,
            }
        })
        .collect()
}

// ============================================================================
// Workouts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestDay {
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
}

impl Default for RestDay {
    fn default() -> Self {
        Self {
            title: REST_DAY_TITLE.to_string(),
            description: REST_DAY_DESCRIPTION.to_string(),
            duration_minutes: REST_DAY_DURATION_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TodayWorkout {
    Rest {
        weekday: Weekday,
        rest: RestDay,
    },
    /// Exercises taken from the plan's `TREINO <letter>` section
    Planned {
        weekday: Weekday,
        letter: WorkoutLetter,
        title: String,
        exercises: Vec<ScheduledExercise>,
    },
    /// Static routine used when the plan has nothing usable for the letter
    Fallback {
        weekday: Weekday,
        letter: WorkoutLetter,
        focus: FocusArea,
        title: String,
        exercises: Vec<ScheduledExercise>,
    },
}

impl TodayWorkout {
    pub fn weekday(&self) -> Weekday {
        match self {
            TodayWorkout::Rest { weekday, .. }
            | TodayWorkout::Planned { weekday, .. }
            | TodayWorkout::Fallback { weekday, .. } => *weekday,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            TodayWorkout::Rest { rest, .. } => &rest.title,
            TodayWorkout::Planned { title, .. } | TodayWorkout::Fallback { title, .. } => title,
        }
    }

    /// Empty only on rest days.
    pub fn exercises(&self) -> &[ScheduledExercise] {
        match self {
            TodayWorkout::Rest { .. } => &[],
            TodayWorkout::Planned { exercises, .. } | TodayWorkout::Fallback { exercises, .. } => {
                exercises
            }
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, TodayWorkout::Rest { .. })
    }
}

/// True if the normalized title names `TREINO <letter>`.
fn names_workout(normalized_title: &str, letter: WorkoutLetter) -> bool {
    let words: Vec<&str> = normalized_title.split_whitespace().collect();
    words
        .windows(2)
        .any(|pair| pair[0] == "TREINO" && pair[1] == letter.as_str())
}

/// Resolve the workout for a weekday index (0 = Sunday; wraps modulo 7).
pub fn resolve_workout(
    weekday_index: u8,
    sections: &[Section],
    profile: &PlanProfile,
    options: &ScheduleOptions,
) -> TodayWorkout {
    let index = weekday_index % 7;
    let weekday = from_index(index);
    let cap = options.max_exercises.max(1);

    let letter = match options.rotation.slot(index) {
        RotationSlot::Rest => {
            debug!(weekday = %weekday, "Rest day in rotation");
            return TodayWorkout::Rest {
                weekday,
                rest: RestDay::default(),
            };
        }
        RotationSlot::Workout(letter) => letter,
    };

    let matched = sections
        .iter()
        .find(|s| names_workout(&s.normalized_title, letter));

    let focus = match matched {
        Some(section) => {
            let planned: Vec<ExerciseItem> = format_items(section, profile)
                .into_iter()
                .filter_map(|item| match item {
                    Item::Exercise(exercise) => Some(exercise),
                    _ => None,
                })
                .collect();
            if !planned.is_empty() {
                debug!(
                    weekday = %weekday,
                    letter = %letter,
                    found = planned.len(),
                    "Resolved planned workout"
                );
                return TodayWorkout::Planned {
                    weekday,
                    letter,
                    title: section.title.clone(),
                    exercises: schedule(
                        planned
                            .into_iter()
                            .take(cap)
                            .map(|e| (Activity::Exercise(e), section.phase.clone())),
                    ),
                };
            }
            FocusArea::detect(&section.normalized_title)
                .unwrap_or_else(|| FocusArea::for_weekday(index))
        }
        None => FocusArea::for_weekday(index),
    };

    debug!(weekday = %weekday, letter = %letter, ?focus, "Using fallback workout");
    TodayWorkout::Fallback {
        weekday,
        letter,
        focus,
        title: format!("Treino {} - {}", letter, focus.label()),
        exercises: schedule(
            fallback_exercises(focus)
                .into_iter()
                .take(cap)
                .map(|e| (Activity::Exercise(e), None)),
        ),
    }
}

// ============================================================================
// Rehab
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TodayRehab {
    Scheduled {
        day: Weekday,
        title: String,
        exercises: Vec<ScheduledExercise>,
    },
    NothingScheduled {
        day: Weekday,
    },
}

impl TodayRehab {
    pub fn day(&self) -> Weekday {
        match self {
            TodayRehab::Scheduled { day, .. } | TodayRehab::NothingScheduled { day } => *day,
        }
    }

    pub fn exercises(&self) -> &[ScheduledExercise] {
        match self {
            TodayRehab::Scheduled { exercises, .. } => exercises,
            TodayRehab::NothingScheduled { .. } => &[],
        }
    }
}

/// Phase of the section at `position`, or of the closest phase section
/// before it.
fn phase_context(sections: &[Section], position: usize) -> Option<String> {
    sections[..=position]
        .iter()
        .rev()
        .find_map(|section| section.phase.clone())
}

fn activities(items: Vec<Item>, phase: &Option<String>, only: Option<Weekday>) -> Vec<(Activity, Option<String>)> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Item::Exercise(exercise) if only.is_none() || exercise.day == only => {
                Some((Activity::Exercise(exercise), phase.clone()))
            }
            Item::Block(block) if only.is_none() || block.day == only => {
                let phase = block.phase.clone().or_else(|| phase.clone());
                Some((Activity::Block(block), phase))
            }
            _ => None,
        })
        .collect()
}

/// Resolve the rehab exercises for a weekday.
///
/// The first section titled with the weekday wins. Without one, the first
/// exercise or phase section containing a sub-group for that day is used.
pub fn resolve_rehab(weekday: Weekday, sections: &[Section], profile: &PlanProfile) -> TodayRehab {
    let by_title = sections.iter().position(|s| s.day == Some(weekday)).map(|position| {
        let section = &sections[position];
        let phase = phase_context(sections, position);
        (section.title.clone(), activities(format_items(section, profile), &phase, None))
    });

    let found = by_title.or_else(|| {
        sections.iter().enumerate().find_map(|(position, section)| {
            if section.day.is_some()
                || profile.formatter_for(section.section_type) != Formatter::Exercises
            {
                return None;
            }
            let phase = phase_context(sections, position);
            let found = activities(format_items(section, profile), &phase, Some(weekday));
            (!found.is_empty()).then(|| (section.title.clone(), found))
        })
    });

    match found {
        Some((title, found)) if !found.is_empty() => {
            debug!(day = %weekday, exercises = found.len(), "Resolved rehab day");
            TodayRehab::Scheduled {
                day: weekday,
                title,
                exercises: schedule(found),
            }
        }
        _ => {
            debug!(day = %weekday, "No rehab exercises scheduled");
            TodayRehab::NothingScheduled { day: weekday }
        }
    }
}

// ============================================================================
// Nutrition
// ============================================================================

/// The day's menu: a day group for the weekday inside a menu section, or a
/// section titled with the weekday.
pub fn resolve_menu(weekday: Weekday, sections: &[Section], profile: &PlanProfile) -> Option<DayGroup> {
    for section in sections {
        if profile.formatter_for(section.section_type) != Formatter::Meals {
            continue;
        }
        let items = format_items(section, profile);

        if section.day == Some(weekday) {
            let mut group = DayGroup {
                day: weekday,
                label: section.title.clone(),
                meals: Vec::new(),
                notes: Vec::new(),
                calories: None,
            };
            for item in items {
                match item {
                    Item::Meal(meal) => group.meals.push(meal),
                    Item::Day(day) => group.meals.extend(day.meals),
                    Item::Fact(fact) => group.notes.push(fact.to_string()),
                    Item::Text(text) => group.notes.push(text),
                    _ => {}
                }
            }
            return Some(group);
        }

        let day = items.into_iter().find_map(|item| match item {
            Item::Day(day) if day.day == weekday => Some(day),
            _ => None,
        });
        if day.is_some() {
            return day;
        }
    }
    debug!(day = %weekday, name = portuguese_name(weekday), "No menu for day");
    None
}
