//! Plan kinds and their parsing profiles
//!
//! Workout, nutrition and rehabilitation plans share one pipeline. A
//! [`PlanProfile`] is the only thing that differs: its keyword table decides
//! section types and its formatter mapping decides how each type is read.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::tagger::{KeywordRule, KeywordTable, SectionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Workout,
    Nutrition,
    Rehabilitation,
}

impl PlanKind {
    pub const ALL: [PlanKind; 3] = [
        PlanKind::Workout,
        PlanKind::Nutrition,
        PlanKind::Rehabilitation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::Workout => "workout",
            PlanKind::Nutrition => "nutrition",
            PlanKind::Rehabilitation => "rehabilitation",
        }
    }

    /// Portuguese label used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            PlanKind::Workout => "Treino",
            PlanKind::Nutrition => "Nutrição",
            PlanKind::Rehabilitation => "Reabilitação",
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workout" | "treino" => Ok(PlanKind::Workout),
            "nutrition" | "nutricao" | "nutrição" | "dieta" => Ok(PlanKind::Nutrition),
            "rehabilitation" | "rehab" | "reabilitacao" | "reabilitação" | "fisio" => {
                Ok(PlanKind::Rehabilitation)
            }
            _ => Err(format!("Unknown plan kind: {}", s)),
        }
    }
}

/// How a section's content lines are turned into items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formatter {
    Exercises,
    Meals,
    Shopping,
    Guidance,
    Facts,
}

// ============================================================================
// Built-in keyword tables (order matters: first match wins)
// ============================================================================

static WORKOUT_KEYWORDS: LazyLock<Vec<(&'static str, SectionType)>> = LazyLock::new(|| {
    vec![
        ("ANALISE", SectionType::Analysis),
        ("AVALIACAO", SectionType::Analysis),
        ("OBJETIVO", SectionType::Objectives),
        ("METAS", SectionType::Objectives),
        ("META DE", SectionType::Objectives),
        ("PERIODIZACAO", SectionType::Phase),
        ("FASE", SectionType::Phase),
        ("TREINO", SectionType::Exercises),
        ("EXERCICIO", SectionType::Exercises),
        ("CARDIO", SectionType::Exercises),
        ("AQUECIMENTO", SectionType::Exercises),
        ("ALONGAMENTO", SectionType::Exercises),
        ("SUPLEMENT", SectionType::Supplement),
        ("ORIENTAC", SectionType::Guidance),
        ("RECOMENDAC", SectionType::Guidance),
        ("DICAS", SectionType::Guidance),
        ("OBSERVAC", SectionType::Guidance),
        ("DESCANSO", SectionType::Guidance),
    ]
});

static NUTRITION_KEYWORDS: LazyLock<Vec<(&'static str, SectionType)>> = LazyLock::new(|| {
    vec![
        ("ANALISE", SectionType::Analysis),
        ("AVALIACAO", SectionType::Analysis),
        ("OBJETIVO", SectionType::Objectives),
        ("METAS", SectionType::Objectives),
        ("META DE", SectionType::Objectives),
        ("LISTA DE COMPRAS", SectionType::Shopping),
        ("COMPRAS", SectionType::Shopping),
        ("CARDAPIO SEMANAL", SectionType::WeeklyMenu),
        ("SEMANAL", SectionType::WeeklyMenu),
        ("CARDAPIO", SectionType::WeeklyMenu),
        ("PLANO ALIMENTAR", SectionType::WeeklyMenu),
        ("REFEIC", SectionType::Meal),
        ("SUPLEMENT", SectionType::Supplement),
        ("HIDRATAC", SectionType::Guidance),
        ("ORIENTAC", SectionType::Guidance),
        ("RECOMENDAC", SectionType::Guidance),
        ("DICAS", SectionType::Guidance),
        ("OBSERVAC", SectionType::Guidance),
    ]
});

static REHAB_KEYWORDS: LazyLock<Vec<(&'static str, SectionType)>> = LazyLock::new(|| {
    vec![
        ("AVALIACAO", SectionType::Analysis),
        ("ANALISE", SectionType::Analysis),
        ("DIAGNOSTICO", SectionType::Analysis),
        ("OBJETIVO", SectionType::Objectives),
        ("METAS", SectionType::Objectives),
        ("META DE", SectionType::Objectives),
        ("FASE", SectionType::Phase),
        ("EDUCAC", SectionType::Education),
        ("EXERCICIO", SectionType::Exercises),
        ("PROTOCOLO", SectionType::Exercises),
        ("TREINO", SectionType::Exercises),
        ("ALONGAMENTO", SectionType::Exercises),
        ("FORTALECIMENTO", SectionType::Exercises),
        ("SUPLEMENT", SectionType::Supplement),
        ("ORIENTAC", SectionType::Guidance),
        ("CUIDADOS", SectionType::Guidance),
        ("PRECAUC", SectionType::Guidance),
        ("SINAIS DE ALERTA", SectionType::Guidance),
        ("RECOMENDAC", SectionType::Guidance),
    ]
});

fn builtin_rules(kind: PlanKind) -> Vec<KeywordRule> {
    let table = match kind {
        PlanKind::Workout => &*WORKOUT_KEYWORDS,
        PlanKind::Nutrition => &*NUTRITION_KEYWORDS,
        PlanKind::Rehabilitation => &*REHAB_KEYWORDS,
    };
    table
        .iter()
        .map(|(keyword, section_type)| KeywordRule::new(*keyword, *section_type))
        .collect()
}

/// Configuration that adapts the shared pipeline to one plan kind.
#[derive(Debug, Clone)]
pub struct PlanProfile {
    pub kind: PlanKind,
    pub keywords: KeywordTable,
}

impl PlanProfile {
    pub fn builtin(kind: PlanKind) -> Self {
        Self {
            kind,
            keywords: KeywordTable::new(builtin_rules(kind)),
        }
    }

    /// Extra rules take precedence over the built-in table.
    pub fn with_extra_rules(mut self, rules: Vec<KeywordRule>) -> Self {
        if !rules.is_empty() {
            self.keywords.prepend(rules);
        }
        self
    }

    pub fn formatter_for(&self, section_type: SectionType) -> Formatter {
        match section_type {
            SectionType::Exercises | SectionType::Phase => Formatter::Exercises,
            SectionType::Meal | SectionType::WeeklyMenu => Formatter::Meals,
            SectionType::Shopping => Formatter::Shopping,
            SectionType::Guidance | SectionType::Education | SectionType::Supplement => {
                Formatter::Guidance
            }
            SectionType::Day => match self.kind {
                PlanKind::Nutrition => Formatter::Meals,
                PlanKind::Workout | PlanKind::Rehabilitation => Formatter::Exercises,
            },
            SectionType::Analysis
            | SectionType::Objectives
            | SectionType::Topic
            | SectionType::Other => Formatter::Facts,
        }
    }

    /// Whether `<name>: NxM` lines outside exercise sections still read as
    /// exercises. Off for nutrition, where "2x ao dia" style text is common.
    pub fn recognizes_exercises(&self) -> bool {
        self.kind != PlanKind::Nutrition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tagger::tag_type;

    #[test]
    fn test_plan_kind_parse() {
        assert_eq!("treino".parse::<PlanKind>().unwrap(), PlanKind::Workout);
        assert_eq!("Nutrição".parse::<PlanKind>().unwrap(), PlanKind::Nutrition);
        assert_eq!("rehab".parse::<PlanKind>().unwrap(), PlanKind::Rehabilitation);
        assert!("yoga".parse::<PlanKind>().is_err());
        for kind in PlanKind::ALL {
            assert_eq!(kind.to_string().parse::<PlanKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_analysis_in_every_profile() {
        for kind in PlanKind::ALL {
            let profile = PlanProfile::builtin(kind);
            for title in ["ANÁLISE", "análise do treino", "Análise:"] {
                assert_eq!(
                    tag_type(title, true, &profile.keywords),
                    SectionType::Analysis,
                    "{kind} / {title}"
                );
            }
        }
    }

    #[test]
    fn test_nutrition_tables() {
        let profile = PlanProfile::builtin(PlanKind::Nutrition);
        let tag = |t| tag_type(t, true, &profile.keywords);
        assert_eq!(tag("CARDÁPIO SEMANAL"), SectionType::WeeklyMenu);
        assert_eq!(tag("Lista de Compras"), SectionType::Shopping);
        assert_eq!(tag("Refeições"), SectionType::Meal);
        assert_eq!(tag("Suplementação"), SectionType::Supplement);
        assert_eq!(tag("Hidratação"), SectionType::Guidance);
    }

    #[test]
    fn test_rehab_tables() {
        let profile = PlanProfile::builtin(PlanKind::Rehabilitation);
        let tag = |t| tag_type(t, false, &profile.keywords);
        assert_eq!(tag("FASE 1 - Proteção"), SectionType::Phase);
        assert_eq!(tag("Educação em dor"), SectionType::Education);
        assert_eq!(tag("Exercícios domiciliares"), SectionType::Exercises);
        assert_eq!(tag("Cuidados"), SectionType::Guidance);
    }

    #[test]
    fn test_goal_keywords_skip_metabolism() {
        for kind in PlanKind::ALL {
            let profile = PlanProfile::builtin(kind);
            let tag = |t| tag_type(t, false, &profile.keywords);
            assert_eq!(tag("Metas da semana"), SectionType::Objectives, "{kind}");
            assert_eq!(tag("Meta de peso"), SectionType::Objectives, "{kind}");
            assert_eq!(tag("TAXA METABÓLICA BASAL"), SectionType::Other, "{kind}");
            assert_eq!(tag("Efeito no metabolismo"), SectionType::Other, "{kind}");
        }
    }

    #[test]
    fn test_formatter_mapping_depends_on_kind() {
        let nutrition = PlanProfile::builtin(PlanKind::Nutrition);
        let workout = PlanProfile::builtin(PlanKind::Workout);
        assert_eq!(nutrition.formatter_for(SectionType::Day), Formatter::Meals);
        assert_eq!(workout.formatter_for(SectionType::Day), Formatter::Exercises);
        assert_eq!(workout.formatter_for(SectionType::Other), Formatter::Facts);
        assert_eq!(workout.formatter_for(SectionType::Education), Formatter::Guidance);
    }

    #[test]
    fn test_extra_rules_precede_builtin() {
        let profile = PlanProfile::builtin(PlanKind::Workout)
            .with_extra_rules(vec![KeywordRule::new("mobilidade", SectionType::Exercises)]);
        assert_eq!(
            tag_type("Mobilidade", false, &profile.keywords),
            SectionType::Exercises
        );
    }
}
