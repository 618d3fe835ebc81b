//! Structured items produced by the formatters

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Empty for bare guidance bullets
    pub label: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{}: {}", self.label, self.value)
        }
    }
}

/// `Supino reto: 3x8-12, descanso 60s`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseItem {
    pub name: String,
    pub sets: String,
    pub reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Weekday of the enclosing day group, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Weekday>,
}

impl fmt::Display for ExerciseItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}x{}", self.name, self.sets, self.reps)?;
        if let Some(rest) = &self.rest_time {
            write!(f, " (descanso {})", rest)?;
        }
        Ok(())
    }
}

/// Named exercise with descriptive details, as rehab protocols write them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseBlock {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Weekday>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<KeyValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealItem {
    pub name: String,
    /// `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub foods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}

impl fmt::Display for MealItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(time) = &self.time {
            write!(f, " ({})", time)?;
        }
        if let Some(kcal) = self.calories {
            write!(f, " ~{} kcal", kcal)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    pub day: Weekday,
    /// The label as written in the plan ("Segunda-feira", "SEGUNDA")
    pub label: String,
    pub meals: Vec<MealItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Item {
    Exercise(ExerciseItem),
    Block(ExerciseBlock),
    Day(DayGroup),
    Meal(MealItem),
    Category(CategoryGroup),
    Fact(KeyValue),
    Text(String),
}

impl Item {
    pub fn as_exercise(&self) -> Option<&ExerciseItem> {
        match self {
            Item::Exercise(exercise) => Some(exercise),
            _ => None,
        }
    }
}
