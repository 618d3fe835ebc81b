//! Text normalization helpers
//!
//! Everything that compares plan text against the fixed Portuguese vocabulary
//! goes through [`fold`] or [`normalize_key`], so "ANÁLISE", "analise" and
//! "**Análise:**" all look the same to the tagger and the formatters.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strip diacritics, leaving the base letters.
///
/// Case is preserved: `"Cardápio"` becomes `"Cardapio"`. Precomposed and
/// decomposed input fold the same way.
pub fn fold(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Fold diacritics and lowercase. Used for vocabulary lookups.
pub fn fold_lower(s: &str) -> String {
    fold(s).to_lowercase()
}

/// Canonical comparison key: folded, uppercased, punctuation collapsed to
/// single spaces.
///
/// `"### **1. Análise  Nutricional:**"` becomes `"1 ANALISE NUTRICIONAL"`.
pub fn normalize_key(s: &str) -> String {
    let folded = fold(s).to_uppercase();
    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;
    for c in folded.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Remove inline markdown noise from a line: bold/underline markers,
/// backticks, leading heading hashes and a wrapping pair of single `*`.
pub fn strip_markdown(s: &str) -> String {
    let without_hashes = s.trim().trim_start_matches('#').trim();
    let mut cleaned = without_hashes
        .replace("**", "")
        .replace("__", "")
        .replace('`', "");

    // `*italic*` wrapping the whole line
    let trimmed = cleaned.trim();
    if trimmed.len() > 2 && trimmed.starts_with('*') && trimmed.ends_with('*') {
        cleaned = trimmed[1..trimmed.len() - 1].to_string();
    }

    collapse_whitespace(cleaned.trim())
}

/// Collapse runs of whitespace into a single space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True if the string contains at least one letter or digit.
pub fn has_alphanumeric(s: &str) -> bool {
    s.chars().any(char::is_alphanumeric)
}

/// Strip leading and trailing symbols (emoji, bullets, separators, stray
/// colons) while keeping letters, digits and closing/opening brackets that
/// belong to the text.
pub fn trim_symbols(s: &str) -> &str {
    s.trim_matches(|c: char| {
        !(c.is_alphanumeric() || c == '(' || c == ')' || c == '~' || c == '%')
    })
}

/// True if the text has at least two letters and none of them are lowercase.
pub fn is_all_caps(s: &str) -> bool {
    let letters: Vec<char> = s.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| !c.is_lowercase())
}

/// Portuguese connectives that stay lowercase in a title-cased phrase.
const CONNECTIVES: &[&str] = &[
    "a", "o", "as", "os", "e", "de", "da", "do", "das", "dos", "em", "na", "no", "nas", "nos",
    "com", "sem", "para", "por", "ao", "aos", "à", "às", "ou",
];

/// True for short phrases where every non-connective word starts uppercase
/// ("Ponte de Glúteo", "Elevação Pélvica Unilateral").
pub fn is_title_case(s: &str) -> bool {
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }
    let mut significant = 0;
    for word in &words {
        let bare = trim_symbols(word);
        let Some(first) = bare.chars().next() else {
            continue;
        };
        if !first.is_alphabetic() {
            continue;
        }
        if CONNECTIVES.contains(&bare.to_lowercase().as_str()) {
            continue;
        }
        if !first.is_uppercase() {
            return false;
        }
        significant += 1;
    }
    significant > 0
}

/// Strip a leading list number such as `1.`, `2)` or `3 -`.
pub fn strip_leading_number(s: &str) -> &str {
    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || digits > 3 {
        return s;
    }
    let rest = &s[digits..];
    // "3x10" or "12kg": the digits belong to the text
    if !rest.starts_with(|c: char| c.is_whitespace() || matches!(c, '.' | ')' | '-' | '–' | ':')) {
        return s;
    }
    rest.trim_start()
        .trim_start_matches(['.', ')', '-', '–', ':'])
        .trim_start()
}

/// Lowercase ASCII slug: `"Supino Reto (barra)"` becomes `"supino-reto-barra"`.
pub fn slugify(s: &str) -> String {
    let folded = fold_lower(s);
    let mut slug = String::with_capacity(folded.len());
    let mut dash = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if dash && !slug.is_empty() {
                slug.push('-');
            }
            dash = false;
            slug.push(c);
        } else {
            dash = true;
        }
    }
    slug
}
