//! Line classification
//!
//! Every raw line of a plan is classified exactly once into a [`LineKind`].
//! Rules are evaluated in priority order: blank, decorative, section header,
//! sub-heading, list item, key/value, plain text.

use chrono::Weekday;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::weekday::detect_weekday;
use crate::constants::parsing::{MAX_KEYWORD_HEADER_WORDS, MAX_LABEL_CHARS};
use crate::text::{fold, has_alphanumeric, is_all_caps, strip_leading_number, strip_markdown};

// ============================================================================
// Patterns
// ============================================================================

/// Markdown heading: hashes followed by whitespace, so `#foco` is not one
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());

/// Upper-case workout/day/phase header on the folded display text
static KEYWORD_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:TREINO\s+[A-E]\b|DIA\s+\d{1,2}\b|FASE\s+\d{1,2}\b)").unwrap());

/// Section vocabulary that opens an unmarked all-caps line
static VOCABULARY_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:ANALISE|AVALIACAO|OBJETIVOS?|METAS|CARDAPIO|LISTA DE COMPRAS|COMPRAS|ORIENTACOES|SUPLEMENTACAO)\b",
    )
    .unwrap()
});

/// Leading list number of a header title
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})\s*[.)\-–:]?\s+\S").unwrap());

/// `FASE 2` anywhere in a folded title
static PHASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfase\s*(\d{1,2})\b").unwrap());

/// Bullet marker followed by whitespace (`•` may touch the text)
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*+]\s+|•\s*)(.*)$").unwrap());

/// `Label: value`, colon followed by whitespace so "07:00" stays whole
static KEY_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:]*[^:\s])\s*:(?:\s+(.*))?$").unwrap());

// ============================================================================
// Types
// ============================================================================

/// Metadata extracted from a section header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMeta {
    /// Markdown heading depth; unmarked keyword headers count as 2.
    pub level: u8,
    /// Title without markdown markers or leading number
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Weekday>,
    /// `Fase N` label when the title names a phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    Blank,
    /// No letters or digits: separators, lone emoji
    Decorative,
    SectionHeader(HeaderMeta),
    /// `####` or deeper; stays inside the open section
    Subheading,
    ListItem,
    KeyValue { label: String, value: String },
    PlainText,
}

/// A classified line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub raw: String,
    /// Display text: markdown markers and bullet stripped
    pub text: String,
    pub kind: LineKind,
}

impl Line {
    pub fn is_header(&self) -> bool {
        matches!(self.kind, LineKind::SectionHeader(_))
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Classify one raw line.
pub fn classify(raw: &str) -> Line {
    let trimmed = raw.trim();
    let line = |text: String, kind: LineKind| Line {
        raw: raw.to_string(),
        text,
        kind,
    };

    if trimmed.is_empty() {
        return line(String::new(), LineKind::Blank);
    }

    let display = strip_markdown(trimmed);
    if !has_alphanumeric(&display) {
        return line(display, LineKind::Decorative);
    }

    // Markdown headings: shallow ones open sections, deep ones are content
    if let Some(caps) = HEADING_RE.captures(trimmed) {
        let level = caps[1].len() as u8;
        if level <= 3 {
            let meta = header_meta(&display, level);
            return line(display, LineKind::SectionHeader(meta));
        }
        return line(display, LineKind::Subheading);
    }

    let bullet = BULLET_RE.captures(trimmed);

    if bullet.is_none() && is_keyword_header(&display) {
        let meta = header_meta(&display, 2);
        return line(display, LineKind::SectionHeader(meta));
    }

    if let Some(caps) = bullet {
        let item = strip_markdown(caps.get(1).map_or("", |m| m.as_str()));
        if !has_alphanumeric(&item) {
            return line(item, LineKind::Decorative);
        }
        return line(item, LineKind::ListItem);
    }

    if let Some((label, value)) = split_key_value(&display) {
        if !value.is_empty() {
            return line(display, LineKind::KeyValue { label, value });
        }
    }

    line(display, LineKind::PlainText)
}

/// Unmarked header: `TREINO A`, `DIA 3`, `FASE 2`, or a short all-caps line
/// opening with the section vocabulary (`ANÁLISE NUTRICIONAL`,
/// `**1. LISTA DE COMPRAS**`).
fn is_keyword_header(display: &str) -> bool {
    let title = strip_leading_number(display);
    let folded = fold(title);
    if KEYWORD_HEADER_RE.is_match(&folded) {
        return true;
    }
    VOCABULARY_HEADER_RE.is_match(&folded)
        && is_all_caps(title)
        && title.split_whitespace().count() <= MAX_KEYWORD_HEADER_WORDS
}

/// Split `Label: value` display text. The value may be empty ("Proteínas:").
pub fn split_key_value(text: &str) -> Option<(String, String)> {
    let caps = KEY_VALUE_RE.captures(text)?;
    let label = caps[1].trim();
    if label.chars().count() > MAX_LABEL_CHARS || !has_alphanumeric(label) {
        return None;
    }
    let value = caps.get(2).map_or("", |m| m.as_str()).trim();
    Some((label.to_string(), value.to_string()))
}

fn header_meta(display: &str, level: u8) -> HeaderMeta {
    let number = NUMBER_RE
        .captures(display)
        .and_then(|caps| caps[1].parse::<u32>().ok());
    let title = if number.is_some() {
        strip_leading_number(display)
    } else {
        display
    };
    let title = title.trim_end_matches(':').trim().to_string();
    let day = detect_weekday(&title);
    let phase = PHASE_RE
        .captures(&fold(&title))
        .map(|caps| format!("Fase {}", &caps[1]));

    HeaderMeta {
        level,
        title,
        number,
        day,
        phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(raw: &str) -> HeaderMeta {
        match classify(raw).kind {
            LineKind::SectionHeader(meta) => meta,
            other => panic!("expected header for {raw:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_and_decorative() {
        assert_eq!(classify("").kind, LineKind::Blank);
        assert_eq!(classify("   \t").kind, LineKind::Blank);
        assert_eq!(classify("---").kind, LineKind::Decorative);
        assert_eq!(classify("***").kind, LineKind::Decorative);
        assert_eq!(classify("🔥🔥").kind, LineKind::Decorative);
        assert_eq!(classify("- ").kind, LineKind::Decorative);
    }

    #[test]
    fn test_markdown_headers() {
        let meta = header("### **1. ANÁLISE NUTRICIONAL**");
        assert_eq!(meta.level, 3);
        assert_eq!(meta.number, Some(1));
        assert_eq!(meta.title, "ANÁLISE NUTRICIONAL");

        let meta = header("# Plano de Treino");
        assert_eq!(meta.level, 1);
        assert_eq!(meta.number, None);
        assert_eq!(meta.title, "Plano de Treino");
    }

    #[test]
    fn test_deep_heading_is_subheading() {
        let line = classify("#### **Segunda-feira**");
        assert_eq!(line.kind, LineKind::Subheading);
        assert_eq!(line.text, "Segunda-feira");
    }

    #[test]
    fn test_bold_numbered_vocabulary_header() {
        let meta = header("**2. OBJETIVOS:**");
        assert_eq!(meta.number, Some(2));
        assert_eq!(meta.title, "OBJETIVOS");
    }

    #[test]
    fn test_bold_numbered_exercise_name_is_content() {
        let line = classify("**1. Ponte de Glúteo**");
        assert_eq!(line.kind, LineKind::PlainText);
        assert_eq!(line.text, "1. Ponte de Glúteo");
        assert!(!classify("**3. CARDIO LEVE**").is_header());
    }

    #[test]
    fn test_all_caps_vocabulary_headers() {
        assert_eq!(header("ANÁLISE NUTRICIONAL").title, "ANÁLISE NUTRICIONAL");
        assert!(classify("LISTA DE COMPRAS").is_header());
        assert!(classify("SUPLEMENTAÇÃO:").is_header());
        assert!(classify("ORIENTAÇÕES GERAIS").is_header());
        // decomposed accents fold the same way
        assert!(classify("ANA\u{301}LISE CORPORAL").is_header());
        // not all caps
        assert!(!classify("Análise do seu perfil").is_header());
        // too long for an unmarked header
        assert!(!classify("OBJETIVOS SÃO PERDER PESO E GANHAR MASSA MAGRA").is_header());
        // bullets stay items
        assert_eq!(classify("- COMPRAS DA SEMANA").kind, LineKind::ListItem);
    }

    #[test]
    fn test_hashtag_is_not_heading() {
        assert!(!classify("#foco no treino").is_header());
        assert_eq!(classify("#foco").kind, LineKind::PlainText);
        assert!(classify("## Dicas").is_header());
    }

    #[test]
    fn test_keyword_headers() {
        let meta = header("TREINO A - Peito e Tríceps");
        assert_eq!(meta.title, "TREINO A - Peito e Tríceps");

        let meta = header("FASE 2: Fortalecimento");
        assert_eq!(meta.phase.as_deref(), Some("Fase 2"));

        assert!(classify("DIA 3").is_header());
        // lowercase keyword is not a header
        assert!(!classify("treino a hoje").is_header());
        // bulleted keyword stays a list item
        assert_eq!(classify("- TREINO B").kind, LineKind::ListItem);
    }

    #[test]
    fn test_header_day_and_phase() {
        let meta = header("## Segunda-feira");
        assert_eq!(meta.day, Some(Weekday::Mon));

        let meta = header("## FASE 1 - Proteção (Semanas 1-2)");
        assert_eq!(meta.phase.as_deref(), Some("Fase 1"));
        assert_eq!(meta.day, None);
    }

    #[test]
    fn test_list_items() {
        let line = classify("- Ovos e pão integral");
        assert_eq!(line.kind, LineKind::ListItem);
        assert_eq!(line.text, "Ovos e pão integral");

        let line = classify("* **Café da Manhã** (07:00)");
        assert_eq!(line.kind, LineKind::ListItem);
        assert_eq!(line.text, "Café da Manhã (07:00)");

        assert_eq!(classify("•Frango").text, "Frango");
        // no whitespace after marker: not a bullet
        assert_ne!(classify("-5kg").kind, LineKind::ListItem);
    }

    #[test]
    fn test_key_value() {
        assert_eq!(
            classify("**Peso:** 70kg").kind,
            LineKind::KeyValue {
                label: "Peso".to_string(),
                value: "70kg".to_string()
            }
        );
        // clock times are not key/value separators
        assert_eq!(classify("Almoço às 12:30").kind, LineKind::PlainText);
        // label without value is plain text
        assert_eq!(classify("Proteínas:").kind, LineKind::PlainText);
    }

    #[test]
    fn test_split_key_value() {
        assert_eq!(
            split_key_value("Descanso: 60s"),
            Some(("Descanso".to_string(), "60s".to_string()))
        );
        assert_eq!(
            split_key_value("Proteínas:"),
            Some(("Proteínas".to_string(), String::new()))
        );
        assert_eq!(split_key_value("sem separador"), None);
        assert_eq!(split_key_value("07:00"), None);
    }
}
