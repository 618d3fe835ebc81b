//! Section type tagging
//!
//! A section's type comes from its title alone: weekday titles are `day`,
//! otherwise the first keyword rule whose keyword appears in the normalized
//! title wins. Rule order is significant and is owned by the plan profile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::weekday::detect_weekday;
use crate::text::normalize_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    Analysis,
    Objectives,
    Exercises,
    Phase,
    Meal,
    WeeklyMenu,
    Shopping,
    Guidance,
    Education,
    Supplement,
    Day,
    Topic,
    Other,
}

impl SectionType {
    pub const ALL: [SectionType; 13] = [
        SectionType::Analysis,
        SectionType::Objectives,
        SectionType::Exercises,
        SectionType::Phase,
        SectionType::Meal,
        SectionType::WeeklyMenu,
        SectionType::Shopping,
        SectionType::Guidance,
        SectionType::Education,
        SectionType::Supplement,
        SectionType::Day,
        SectionType::Topic,
        SectionType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Analysis => "analysis",
            SectionType::Objectives => "objectives",
            SectionType::Exercises => "exercises",
            SectionType::Phase => "phase",
            SectionType::Meal => "meal",
            SectionType::WeeklyMenu => "weekly-menu",
            SectionType::Shopping => "shopping",
            SectionType::Guidance => "guidance",
            SectionType::Education => "education",
            SectionType::Supplement => "supplement",
            SectionType::Day => "day",
            SectionType::Topic => "topic",
            SectionType::Other => "other",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("Unknown section type: {}", s))
    }
}

/// One `keyword -> type` rule. Keywords are matched as substrings of the
/// normalized title, so `ORIENTAC` covers "Orientação" and "Orientações".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
}

impl KeywordRule {
    pub fn new(keyword: impl Into<String>, section_type: SectionType) -> Self {
        Self {
            keyword: keyword.into(),
            section_type,
        }
    }
}

/// Ordered keyword rules with their keywords pre-normalized.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
    normalized: Vec<String>,
}

impl KeywordTable {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        let normalized = rules.iter().map(|r| normalize_key(&r.keyword)).collect();
        Self { rules, normalized }
    }

    /// Put `rules` ahead of the existing ones so they take precedence.
    pub fn prepend(&mut self, rules: Vec<KeywordRule>) {
        let mut merged = rules;
        merged.append(&mut self.rules);
        *self = Self::new(merged);
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// First rule whose keyword occurs in the normalized title.
    pub fn lookup(&self, normalized_title: &str) -> Option<SectionType> {
        self.normalized
            .iter()
            .zip(&self.rules)
            .find(|(keyword, _)| !keyword.is_empty() && normalized_title.contains(keyword.as_str()))
            .map(|(_, rule)| rule.section_type)
    }
}

/// Tag a section from its title.
pub fn tag_type(title: &str, numbered: bool, table: &KeywordTable) -> SectionType {
    if detect_weekday(title).is_some() {
        return SectionType::Day;
    }
    let normalized = normalize_key(title);
    if let Some(section_type) = table.lookup(&normalized) {
        return section_type;
    }
    if numbered {
        SectionType::Topic
    } else {
        SectionType::Other
    }
}
