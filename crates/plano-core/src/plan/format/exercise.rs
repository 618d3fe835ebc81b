//! Exercise sections: `name: NxM` lines and named exercise blocks

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::parsing::{MAX_BLOCK_NAME_CHARS, MAX_BLOCK_NAME_WORDS};
use crate::plan::items::{ExerciseBlock, ExerciseItem, Item, KeyValue};
use crate::plan::line::split_key_value;
use crate::plan::section::{ContentKind, ContentLine, Section};
use crate::plan::weekday::parse_day_heading;
use crate::text::{
    collapse_whitespace, fold_lower, has_alphanumeric, is_all_caps, is_title_case,
    strip_leading_number, trim_symbols,
};

/// `Supino reto: 3x8-12, descanso 60s`
static SETS_REPS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<name>[^:]+?)\s*:\s*(?P<sets>\d{1,2})\s*[x×]\s*(?P<reps>\d{1,3}(?:\s*(?:-|–|a)\s*\d{1,3})?(?:\s*(?:segundos|seg|s|minutos|min)\b)?)(?P<tail>.*)$",
    )
    .unwrap()
});

/// `Agachamento: 4 séries de 10 repetições`
static SERIES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<name>[^:]+?)\s*[:\-–]\s*(?P<sets>\d{1,2})\s*s[ée]ries?\s*(?:de\s*)?(?P<reps>\d{1,3}(?:\s*(?:-|–|a)\s*\d{1,3})?(?:\s*(?:segundos|seg|s|minutos|min)\b)?)(?P<tail>.*)$",
    )
    .unwrap()
});

static REST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:descanso|intervalo|pausa)(?:\s+de)?\s*:?\s*(?P<rest>\d{1,3}(?:\s*(?:-|–|a)\s*\d{1,3})?\s*(?:segundos|seg|s|minutos|min|'|")?)"#,
    )
    .unwrap()
});

static REPS_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:repetições|repeticoes|reps?)\b").unwrap());

static RANGE_SEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\s*(?:-|–|a)\s*(\d)").unwrap());

/// Labels that describe the open block rather than start a new one
const BLOCK_DETAIL_LABELS: &[&str] = &[
    "posicao",
    "posicionamento",
    "execucao",
    "como fazer",
    "repeticoes",
    "series",
    "sets",
    "frequencia",
    "duracao",
    "descanso",
    "carga",
    "progressao",
    "objetivo",
    "observac",
    "obs",
    "dica",
    "cuidado",
    "precauc",
    "atencao",
    "musculos",
    "equipamento",
    "tempo",
    "intensidade",
];

fn is_detail_label(label: &str) -> bool {
    let folded = fold_lower(label);
    BLOCK_DETAIL_LABELS.iter().any(|l| folded.starts_with(l))
}

/// Parse a single `name: sets x reps` line.
pub(crate) fn parse_exercise(text: &str) -> Option<ExerciseItem> {
    let caps = SETS_REPS_RE
        .captures(text)
        .or_else(|| SERIES_RE.captures(text))?;

    let name = trim_symbols(strip_leading_number(caps["name"].trim())).to_string();
    if name.is_empty() || !has_alphanumeric(&name) {
        return None;
    }

    let reps = RANGE_SEP_RE
        .replace_all(&collapse_whitespace(&caps["reps"]), "$1-$2")
        .into_owned();
    let (rest_time, note) = split_tail(&caps["tail"]);

    Some(ExerciseItem {
        name,
        sets: caps["sets"].to_string(),
        reps,
        rest_time,
        notes: note.into_iter().collect(),
        day: None,
    })
}

/// Pull the rest interval out of the text after the reps; what remains is
/// a note.
fn split_tail(tail: &str) -> (Option<String>, Option<String>) {
    let tail = REPS_WORD_RE.replace(tail, "");
    let (rest_time, remainder) = match REST_RE.captures(&tail) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let rest = collapse_whitespace(&caps["rest"]);
            let remainder = format!("{}{}", &tail[..whole.start], &tail[whole.end..]);
            (Some(rest), remainder)
        }
        None => (None, tail.to_string()),
    };

    let cleaned = collapse_whitespace(&remainder.replace("()", "").replace("[]", ""));
    let cleaned = cleaned.trim_matches(|c: char| c.is_whitespace() || ",;.-–|/".contains(c));
    let cleaned = cleaned
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(cleaned)
        .trim();
    let note = has_alphanumeric(cleaned).then(|| cleaned.to_string());
    (rest_time, note)
}

/// Name for a block opened by this line, if it reads like a heading.
fn block_name(line: &ContentLine) -> Option<String> {
    let text = line.text.trim();
    let name = trim_symbols(strip_leading_number(text.trim_end_matches(':'))).trim();
    if name.is_empty() || !name.chars().any(char::is_alphabetic) {
        return None;
    }

    match line.kind {
        ContentKind::Subheading => Some(name.to_string()),
        ContentKind::PlainText => {
            if name.chars().count() > MAX_BLOCK_NAME_CHARS
                || name.split_whitespace().count() > MAX_BLOCK_NAME_WORDS
                || text.ends_with('.')
            {
                return None;
            }
            let numbered = strip_leading_number(text) != text;
            let looks_like_heading =
                numbered || text.ends_with(':') || is_all_caps(name) || is_title_case(name);
            looks_like_heading.then(|| name.to_string())
        }
        _ => None,
    }
}

#[derive(Clone, Copy)]
enum Open {
    Nothing,
    Exercise(usize),
    Block(usize),
}

pub(crate) fn format_exercises(section: &Section) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::new();
    let mut open = Open::Nothing;
    let mut day = section.day;

    for line in &section.content {
        let text = line.text.as_str();

        // day sub-group inside the section
        if matches!(line.kind, ContentKind::Subheading | ContentKind::PlainText) {
            if let Some(weekday) = parse_day_heading(text) {
                day = Some(weekday);
                open = Open::Nothing;
                items.push(Item::Text(text.to_string()));
                continue;
            }
        }

        let key_value = match &line.kind {
            ContentKind::KeyValue { label, value } => Some((label.clone(), value.clone())),
            ContentKind::ListItem => split_key_value(text).filter(|(_, v)| !v.is_empty()),
            _ => None,
        };

        if let Open::Block(i) = open {
            if let Some((label, value)) = &key_value {
                if is_detail_label(label) {
                    if let Some(Item::Block(block)) = items.get_mut(i) {
                        block.details.push(KeyValue::new(label, value));
                    }
                    continue;
                }
            }
        }

        if let Some(mut exercise) = parse_exercise(text) {
            exercise.day = day;
            items.push(Item::Exercise(exercise));
            open = Open::Exercise(items.len() - 1);
            continue;
        }

        match (&line.kind, open) {
            (ContentKind::ListItem, Open::Exercise(i)) => {
                if let Some(Item::Exercise(exercise)) = items.get_mut(i) {
                    exercise.notes.push(text.to_string());
                }
            }
            (ContentKind::ListItem | ContentKind::KeyValue { .. }, Open::Block(i)) => {
                if let Some(Item::Block(block)) = items.get_mut(i) {
                    match key_value {
                        Some((label, value)) => block.details.push(KeyValue::new(label, value)),
                        None => block.notes.push(text.to_string()),
                    }
                }
            }
            (ContentKind::KeyValue { label, value }, _) => {
                items.push(Item::Fact(KeyValue::new(label, value)));
                open = Open::Nothing;
            }
            (ContentKind::ListItem, Open::Nothing) => {
                items.push(Item::Text(text.to_string()));
            }
            (ContentKind::Subheading | ContentKind::PlainText, _) => {
                // a detail heading ("Execução:") stays inside the open block
                let detail_heading = matches!(open, Open::Block(_))
                    && is_detail_label(text.trim_end_matches(':'));
                match block_name(line).filter(|_| !detail_heading) {
                    Some(name) => {
                        items.push(Item::Block(ExerciseBlock {
                            name,
                            phase: section.phase.clone(),
                            day,
                            details: Vec::new(),
                            notes: Vec::new(),
                        }));
                        open = Open::Block(items.len() - 1);
                    }
                    None => match open {
                        Open::Block(i) => {
                            if let Some(Item::Block(block)) = items.get_mut(i) {
                                block.notes.push(text.to_string());
                            }
                        }
                        _ => {
                            items.push(Item::Text(text.to_string()));
                            open = Open::Nothing;
                        }
                    },
                }
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::line::classify;
    use crate::plan::section::build_sections;
    use crate::plan::tagger::KeywordTable;
    use chrono::Weekday;

    fn section(body: &str) -> Section {
        let text = format!("## TREINO\n{body}");
        build_sections(text.lines().map(classify), &KeywordTable::default())
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_parse_exercise_basic() {
        let ex = parse_exercise("Supino reto: 3x8-12").unwrap();
        assert_eq!(ex.name, "Supino reto");
        assert_eq!(ex.sets, "3");
        assert_eq!(ex.reps, "8-12");
        assert_eq!(ex.rest_time, None);
        assert!(ex.notes.is_empty());
    }

    #[test]
    fn test_parse_exercise_variants() {
        let ex = parse_exercise("Rosca direta: 4 X 10 a 12 reps").unwrap();
        assert_eq!(ex.reps, "10-12");
        assert!(ex.notes.is_empty());

        let ex = parse_exercise("Prancha: 3×30s").unwrap();
        assert_eq!(ex.reps, "30s");

        let ex = parse_exercise("Agachamento livre - 4 séries de 10 repetições").unwrap();
        assert_eq!(ex.name, "Agachamento livre");
        assert_eq!(ex.sets, "4");
        assert_eq!(ex.reps, "10");

        let ex = parse_exercise("1. Leg press: 3x15").unwrap();
        assert_eq!(ex.name, "Leg press");
    }

    #[test]
    fn test_parse_exercise_rest_and_note() {
        let ex = parse_exercise("Remada curvada: 4x10 (descanso 90s)").unwrap();
        assert_eq!(ex.rest_time.as_deref(), Some("90s"));
        assert!(ex.notes.is_empty());

        let ex = parse_exercise("Stiff: 3x12, intervalo de 60 seg - foco na excêntrica").unwrap();
        assert_eq!(ex.rest_time.as_deref(), Some("60 seg"));
        assert_eq!(ex.notes, vec!["foco na excêntrica"]);
    }

    #[test]
    fn test_parse_exercise_rejects_prose() {
        assert!(parse_exercise("Frequência: 3 vezes por semana").is_none());
        assert!(parse_exercise("Supino reto").is_none());
        assert!(parse_exercise(": 3x10").is_none());
    }

    #[test]
    fn test_bullets_after_exercise_become_notes() {
        let items = format_exercises(&section(
            "- Supino reto: 3x8-12\n- mantenha as escápulas retraídas\n- controle a descida",
        ));
        assert_eq!(items.len(), 1);
        let Item::Exercise(ex) = &items[0] else {
            panic!("expected exercise, got {:?}", items[0]);
        };
        assert_eq!(ex.notes.len(), 2);
    }

    #[test]
    fn test_block_with_details() {
        let items = format_exercises(&section(
            "**Ponte de Glúteo**\n- Posição: deitado de barriga para cima\n- Repetições: 3x15\nExecução: eleve o quadril\n- Mantenha o abdômen contraído",
        ));
        assert_eq!(items.len(), 1);
        let Item::Block(block) = &items[0] else {
            panic!("expected block, got {:?}", items[0]);
        };
        assert_eq!(block.name, "Ponte de Glúteo");
        assert_eq!(block.details.len(), 3);
        assert_eq!(block.details[1], KeyValue::new("Repetições", "3x15"));
        assert_eq!(block.notes, vec!["Mantenha o abdômen contraído"]);
    }

    #[test]
    fn test_numbered_block_and_sentence_text() {
        let items = format_exercises(&section(
            "1. Elevação de quadril\nFaça devagar e sem dor.\nRealize todos os dias pela manhã.",
        ));
        assert_eq!(items.len(), 1);
        let Item::Block(block) = &items[0] else {
            panic!("expected block");
        };
        assert_eq!(block.name, "Elevação de quadril");
        assert_eq!(block.notes.len(), 2);
    }

    #[test]
    fn test_day_subgroup_tags_items() {
        let items = format_exercises(&section(
            "#### Segunda-feira\n- Ponte: 3x15\n#### Quarta-feira\n**Prancha Lateral**",
        ));
        assert_eq!(items.len(), 4);
        assert_eq!(items[1].as_exercise().unwrap().day, Some(Weekday::Mon));
        let Item::Block(block) = &items[3] else {
            panic!("expected block");
        };
        assert_eq!(block.day, Some(Weekday::Wed));
    }

    #[test]
    fn test_unmatched_lines_kept_as_text() {
        let items = format_exercises(&section("- beba água durante o treino\nObjetivo: hipertrofia"));
        assert_eq!(
            items,
            vec![
                Item::Text("beba água durante o treino".to_string()),
                Item::Fact(KeyValue::new("Objetivo", "hipertrofia")),
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let s = section("Supino: 3x10\n- nota\n**Bloco**\n- Carga: leve");
        assert_eq!(format_exercises(&s), format_exercises(&s));
    }
}
