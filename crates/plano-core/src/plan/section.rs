//! Section building
//!
//! Folds the classified line stream into sections. Each header closes the
//! open section and opens a new one; content before the first header goes
//! into an untitled preamble section that is only kept when it has content.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::line::{HeaderMeta, Line, LineKind};
use super::tagger::{tag_type, KeywordTable, SectionType};
use crate::text::normalize_key;

/// How a content line was classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentKind {
    Subheading,
    ListItem,
    KeyValue { label: String, value: String },
    PlainText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLine {
    pub raw: String,
    pub text: String,
    #[serde(flatten)]
    pub kind: ContentKind,
}

impl ContentLine {
    pub fn is_list_item(&self) -> bool {
        self.kind == ContentKind::ListItem
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub normalized_title: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub content: Vec<ContentLine>,
    /// Untitled section holding the lines before the first header
    #[serde(default)]
    pub preamble: bool,
}

impl Section {
    /// Display text of every content line, in order.
    pub fn content_lines(&self) -> Vec<&str> {
        self.content.iter().map(|c| c.text.as_str()).collect()
    }
}

struct OpenSection {
    header: Option<HeaderMeta>,
    content: Vec<ContentLine>,
}

impl OpenSection {
    fn close(self, table: &KeywordTable) -> Option<Section> {
        let Some(header) = self.header else {
            if self.content.is_empty() {
                return None;
            }
            return Some(Section {
                title: String::new(),
                normalized_title: String::new(),
                section_type: SectionType::Other,
                number: None,
                day: None,
                phase: None,
                content: self.content,
                preamble: true,
            });
        };

        let section_type = tag_type(&header.title, header.number.is_some(), table);
        debug!(
            title = %header.title,
            section_type = %section_type,
            lines = self.content.len(),
            "Closed plan section"
        );
        Some(Section {
            normalized_title: normalize_key(&header.title),
            title: header.title,
            section_type,
            number: header.number,
            day: header.day,
            phase: header.phase,
            content: self.content,
            preamble: false,
        })
    }
}

/// Accumulator for [`build_sections`]. Consumed line by line, never
/// reopens a section once a later header has closed it.
pub struct SectionBuilder<'a> {
    table: &'a KeywordTable,
    open: OpenSection,
    sections: Vec<Section>,
}

impl<'a> SectionBuilder<'a> {
    pub fn new(table: &'a KeywordTable) -> Self {
        Self {
            table,
            open: OpenSection {
                header: None,
                content: Vec::new(),
            },
            sections: Vec::new(),
        }
    }

    pub fn push(mut self, line: Line) -> Self {
        let kind = match line.kind {
            LineKind::Blank | LineKind::Decorative => return self,
            LineKind::SectionHeader(meta) => {
                let next = OpenSection {
                    header: Some(meta),
                    content: Vec::new(),
                };
                let closed = std::mem::replace(&mut self.open, next);
                self.sections.extend(closed.close(self.table));
                return self;
            }
            LineKind::Subheading => ContentKind::Subheading,
            LineKind::ListItem => ContentKind::ListItem,
            LineKind::KeyValue { label, value } => ContentKind::KeyValue { label, value },
            LineKind::PlainText => ContentKind::PlainText,
        };
        self.open.content.push(ContentLine {
            raw: line.raw,
            text: line.text,
            kind,
        });
        self
    }

    pub fn finish(mut self) -> Vec<Section> {
        self.sections.extend(self.open.close(self.table));
        self.sections
    }
}

/// Group classified lines into sections.
pub fn build_sections<I>(lines: I, table: &KeywordTable) -> Vec<Section>
where
    I: IntoIterator<Item = Line>,
{
    lines
        .into_iter()
        .fold(SectionBuilder::new(table), SectionBuilder::push)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::line::classify;
    use crate::plan::tagger::KeywordRule;

    fn sections(text: &str) -> Vec<Section> {
        let table = KeywordTable::new(vec![
            KeywordRule::new("ANALISE", SectionType::Analysis),
            KeywordRule::new("TREINO", SectionType::Exercises),
        ]);
        build_sections(text.lines().map(classify), &table)
    }

    #[test]
    fn test_empty_input() {
        assert!(sections("").is_empty());
        assert!(sections("\n\n   \n---\n").is_empty());
    }

    #[test]
    fn test_no_headers_single_other_section() {
        let result = sections("primeira linha\n\n- segunda\nTerceira: valor");
        assert_eq!(result.len(), 1);
        assert!(result[0].preamble);
        assert_eq!(result[0].section_type, SectionType::Other);
        assert_eq!(
            result[0].content_lines(),
            vec!["primeira linha", "segunda", "Terceira: valor"]
        );
    }

    #[test]
    fn test_one_section_per_header() {
        let text = "## ANÁLISE\nPeso: 70kg\n## TREINO A\n## Observações\n";
        let result = sections(text);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].section_type, SectionType::Analysis);
        assert_eq!(result[1].section_type, SectionType::Exercises);
        assert!(result[1].content.is_empty());
        assert_eq!(result[2].section_type, SectionType::Other);
    }

    #[test]
    fn test_preamble_kept_separate() {
        let text = "Olá! Aqui está seu plano.\n## ANÁLISE\nPeso: 70kg";
        let result = sections(text);
        assert_eq!(result.len(), 2);
        assert!(result[0].preamble);
        assert_eq!(result[0].title, "");
        assert!(!result[1].preamble);
        assert_eq!(result[1].content_lines(), vec!["Peso: 70kg"]);
    }

    #[test]
    fn test_decorative_lines_dropped() {
        let result = sections("## ANÁLISE\n---\n🔥\nPeso: 70kg\n***");
        assert_eq!(result[0].content.len(), 1);
    }

    #[test]
    fn test_header_metadata_carried() {
        let result = sections("### 3. FASE 2 - Fortalecimento\n## Quarta-feira");
        assert_eq!(result[0].number, Some(3));
        assert_eq!(result[0].phase.as_deref(), Some("Fase 2"));
        assert_eq!(result[1].day, Some(Weekday::Wed));
        assert_eq!(result[1].section_type, SectionType::Day);
        assert_eq!(result[1].normalized_title, "QUARTA FEIRA");
    }

    #[test]
    fn test_key_value_content_keeps_parts() {
        let result = sections("## ANÁLISE\nPeso: 70kg");
        assert_eq!(
            result[0].content[0].kind,
            ContentKind::KeyValue {
                label: "Peso".to_string(),
                value: "70kg".to_string()
            }
        );
    }
}
