//! Validation gate
//!
//! Decides whether a text is worth showing as a plan before it is parsed.
//! Kept apart from parsing: the parser accepts anything.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use super::profile::PlanKind;
use crate::error::{PlanError, Result};
use crate::text::fold_lower;

static SETS_REPS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}\s*[x×]\s*\d{1,3}").unwrap());

const WORKOUT_KEYWORDS: &[&str] = &[
    "treino",
    "series",
    "repeticoes",
    "exercicio",
    "musculacao",
    "academia",
    "supino",
    "agachamento",
    "hipertrofia",
    "descanso",
];

const NUTRITION_KEYWORDS: &[&str] = &[
    "cardapio",
    "refeicao",
    "refeicoes",
    "kcal",
    "calorias",
    "cafe da manha",
    "almoco",
    "jantar",
    "lanche",
    "dieta",
    "nutricional",
    "macronutrientes",
    "proteinas",
];

const REHAB_KEYWORDS: &[&str] = &[
    "reabilitacao",
    "fisioterapia",
    "fase",
    "exercicio",
    "lesao",
    "dor",
    "mobilidade",
    "alongamento",
    "fortalecimento",
    "amplitude",
];

fn keywords(kind: PlanKind) -> &'static [&'static str] {
    match kind {
        PlanKind::Workout => WORKOUT_KEYWORDS,
        PlanKind::Nutrition => NUTRITION_KEYWORDS,
        PlanKind::Rehabilitation => REHAB_KEYWORDS,
    }
}

/// Number of distinct vocabulary hits for `kind`.
pub fn keyword_hits(text: &str, kind: PlanKind) -> usize {
    let folded = fold_lower(text);
    let mut hits = keywords(kind)
        .iter()
        .filter(|k| folded.contains(*k))
        .count();
    if kind == PlanKind::Workout && SETS_REPS_RE.is_match(&folded) {
        hits += 1;
    }
    hits
}

/// Non-blank text containing at least one keyword of the kind's vocabulary.
pub fn looks_like_plan(text: &str, kind: PlanKind) -> bool {
    !text.trim().is_empty() && keyword_hits(text, kind) > 0
}

pub fn validate_plan_text(text: &str, kind: PlanKind) -> Result<()> {
    if looks_like_plan(text, kind) {
        Ok(())
    } else {
        info!(kind = %kind, chars = text.len(), "Rejected plan text");
        Err(PlanError::NoValidPlan { kind })
    }
}

/// Kind whose vocabulary the text matches best. Ties go to the earlier kind
/// in [`PlanKind::ALL`].
pub fn detect_kind(text: &str) -> Option<PlanKind> {
    let mut best: Option<(PlanKind, usize)> = None;
    for kind in PlanKind::ALL {
        let hits = keyword_hits(text, kind);
        if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
            best = Some((kind, hits));
        }
    }
    best.map(|(kind, _)| kind)
}
