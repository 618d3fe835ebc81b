//! Shopping lists grouped by category

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::shopping::{DEFAULT_CATEGORY, MIN_ITEM_CHARS};
use crate::plan::items::{CategoryGroup, Item, KeyValue};
use crate::plan::section::{ContentKind, ContentLine, Section};
use crate::text::{fold_lower, has_alphanumeric, is_all_caps, trim_symbols};

/// Folded category stems
const CATEGORY_KEYWORDS: &[&str] = &[
    "proteina",
    "carboidrato",
    "vegeta",
    "verdura",
    "legume",
    "fruta",
    "laticinio",
    "gordura",
    "tempero",
    "grao",
    "graos",
    "cereai",
    "bebida",
    "oleaginosa",
    "hortifruti",
    "mercearia",
    "congelado",
    "acougue",
    "padaria",
    "suplemento",
    "outros",
    "diversos",
];

/// Leftover markers that are not groceries
const DECORATIVE: &[&str] = &["✅", "✔", "✔️", "☑️", "🛒", "📝", "📋", "🔸", "🔹", "▪️", "➡️", "👉", "⭐"];

/// `[ ]` / `[x]` checkbox prefix
static CHECKBOX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[[ xX]?\]\s*").unwrap());

fn category_name(line: &ContentLine) -> Option<String> {
    let name = trim_symbols(line.text.trim().trim_end_matches(':'));
    if name.is_empty() {
        return None;
    }

    // `*PROTEÍNAS*`, `* LATICÍNIOS`, `**GRÃOS:**`
    if line.raw.trim().starts_with('*') && is_all_caps(name) {
        return Some(name.to_string());
    }

    let folded = fold_lower(name);
    let keyword = CATEGORY_KEYWORDS.iter().any(|k| folded.starts_with(k));
    let words = name.split_whitespace().count();

    let is_category = match line.kind {
        ContentKind::Subheading => true,
        ContentKind::PlainText => words <= 4 && (keyword || is_all_caps(name)),
        ContentKind::ListItem => {
            words <= 2 && keyword && (line.text.trim_end().ends_with(':') || is_all_caps(name))
        }
        ContentKind::KeyValue { .. } => false,
    };
    is_category.then(|| name.to_string())
}

fn clean_item(text: &str) -> Option<String> {
    let text = CHECKBOX_RE.replace(text.trim(), "");
    let text = DECORATIVE
        .iter()
        .fold(text.trim(), |t, d| t.trim_start_matches(d).trim_start())
        .trim();
    if text.chars().count() < MIN_ITEM_CHARS || !has_alphanumeric(text) {
        return None;
    }
    Some(text.to_string())
}

pub(crate) fn format_shopping(section: &Section) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::new();
    let mut open: Option<usize> = None;

    for line in &section.content {
        if let Some(category) = category_name(line) {
            items.push(Item::Category(CategoryGroup {
                category,
                items: Vec::new(),
            }));
            open = Some(items.len() - 1);
            continue;
        }

        let text = match &line.kind {
            ContentKind::KeyValue { label, value } => format!("{}: {}", label, value),
            _ => line.text.clone(),
        };

        if open.is_none() {
            match &line.kind {
                ContentKind::ListItem => {
                    items.push(Item::Category(CategoryGroup {
                        category: DEFAULT_CATEGORY.to_string(),
                        items: Vec::new(),
                    }));
                    open = Some(items.len() - 1);
                }
                ContentKind::KeyValue { label, value } => {
                    items.push(Item::Fact(KeyValue::new(label, value)));
                    continue;
                }
                _ => {
                    items.push(Item::Text(text));
                    continue;
                }
            }
        }

        let Some(entry) = clean_item(&text) else {
            continue;
        };
        if let Some(Item::Category(group)) = open.and_then(|i| items.get_mut(i)) {
            group.items.push(entry);
        }
    }

    items
}
