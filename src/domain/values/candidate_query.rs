//! Candidate query construction for the card search API.
//!
//! The search API only matches structured field queries, while watchlists are
//! written as free text ("Umbreon VMAX 215/203 Evolving Skies"). A free-text
//! query is turned into a short, ordered list of structured candidates, most
//! specific first, which the search provider tries in order.

use regex::Regex;
use std::sync::LazyLock;

/// Set names recognised in free text, matched case-insensitively and returned
/// with this spelling.
pub const SET_HINTS: &[&str] = &[
    "Evolving Skies",
    "Fusion Strike",
    "Lost Origin",
    "Silver Tempest",
    "Scarlet & Violet 151",
    "Scarlet Violet 151",
    "Team Up",
    "Base Set",
    "Neo Genesis",
    "EX Deoxys",
    "Champion's Path",
    "Champions Path",
];

/// Words that never name a card on their own.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "and", "card", "cards", "tcg", "holo", "holofoil", "reverse", "foil",
    "promo", "rare", "ultra", "secret", "full", "art", "alt", "alternate", "psa", "bgs", "cgc",
    "graded", "grade", "mint", "nm", "near", "english", "japanese", "en", "jp", "edition",
    "1st", "first", "set",
];

const FIELD_MARKERS: &[&str] = &["name:", "set.name:", "number:"];

pub const DEFAULT_MAX_VARIANTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    max_variants: usize,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VARIANTS)
    }
}

impl QueryBuilder {
    /// A cap of zero is treated as one so the result is never empty.
    pub fn new(max_variants: usize) -> Self {
        Self {
            max_variants: max_variants.max(1),
        }
    }

    /// Ordered, deduplicated candidates for one free-text query. Never empty.
    pub fn build(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        let number = extract_number(text);
        let set_name = extract_set_name(text);
        let main = extract_main_name(text);
        let main = (!main.is_empty()).then_some(main);

        let mut candidates = Vec::new();
        if is_structured(text) {
            candidates.push(text.to_string());
        }
        if let (Some(number), Some(set_name)) = (&number, set_name) {
            candidates.push(format!("number:\"{number}\" AND set.name:\"{set_name}\""));
        }
        if let (Some(main), Some(set_name)) = (&main, set_name) {
            candidates.push(format!("name:\"{main}\" AND set.name:\"{set_name}\""));
        }
        if let Some(main) = &main {
            candidates.push(format!("name:\"{main}\""));
        }

        let mut out: Vec<String> = Vec::with_capacity(candidates.len());
        for c in candidates {
            if !out.contains(&c) {
                out.push(c);
            }
        }
        out.truncate(self.max_variants);

        if out.is_empty() {
            out.push(text.to_string());
        }
        out
    }
}

/// True when the text already carries a structured field marker.
pub fn is_structured(text: &str) -> bool {
    FIELD_MARKERS.iter().any(|m| text.contains(m))
}

static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{1,3}/[0-9]{1,3})\b").expect("valid number pattern"));

static CAPITALISED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z]*").expect("valid name pattern"));

/// First standalone `NNN/NNN` token (collector number over set size).
pub fn extract_number(text: &str) -> Option<String> {
    NUMBER_TOKEN.captures(text).map(|caps| caps[1].to_string())
}

/// First known set hint contained in the text.
pub fn extract_set_name(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    SET_HINTS
        .iter()
        .copied()
        .find(|hint| lower.contains(&hint.to_lowercase()))
}

/// Best guess at the card's name: the first capitalised non-generic token.
pub fn extract_main_name(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '&' | '/' | '-' | '\'' | ' ') {
                c
            } else {
                ' '
            }
        })
        .collect();

    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| {
            let lower = t.to_lowercase();
            lower != "pokemon" && lower != "pokémon" && !STOPWORDS.contains(&lower.as_str())
        })
        .collect();

    if let Some(capitalised) = tokens.iter().find(|t| CAPITALISED.is_match(t)) {
        return capitalised.to_string();
    }
    if let Some(first) = tokens.first() {
        return first.to_string();
    }
    text.split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("Umbreon VMAX 215/203"), Some("215/203".into()));
        assert_eq!(extract_number("Charizard 4/102 Base Set"), Some("4/102".into()));
        assert_eq!(extract_number("1234/56 nope"), None);
        assert_eq!(extract_number("12/3456 nope"), None);
        assert_eq!(extract_number("a12/34"), None);
        assert_eq!(extract_number("(25/102)"), Some("25/102".into()));
        assert_eq!(extract_number("no number"), None);
    }

    #[test]
    fn test_extract_set_name_is_literal() {
        assert_eq!(extract_set_name("umbreon evolving skies"), Some("Evolving Skies"));
        assert_eq!(extract_set_name("Mew scarlet & violet 151"), Some("Scarlet & Violet 151"));
        assert_eq!(extract_set_name("Evolving Sky"), None);
    }

    #[test]
    fn test_extract_main_name() {
        assert_eq!(extract_main_name("pokemon card Umbreon VMAX"), "Umbreon");
        assert_eq!(extract_main_name("the Pokemon Charizard-GX"), "Charizard-GX");
        assert_eq!(extract_main_name("pikachu promo"), "pikachu");
        assert_eq!(extract_main_name("pokemon card"), "pokemon");
        assert_eq!(extract_main_name("   "), "");
    }

    #[test]
    fn test_disallowed_characters_split_tokens() {
        assert_eq!(extract_main_name("Mr.Mime"), "Mr");
        assert_eq!(extract_main_name("(Lugia) V!"), "Lugia");
        assert_eq!(extract_main_name("Farfetch'd & friends"), "Farfetch'd");
    }

    #[test]
    fn test_build_full_priority_order() {
        let qb = QueryBuilder::default();
        let out = qb.build("Umbreon VMAX 215/203 Evolving Skies");
        assert_eq!(
            out,
            vec![
                "number:\"215/203\" AND set.name:\"Evolving Skies\"".to_string(),
                "name:\"Umbreon\" AND set.name:\"Evolving Skies\"".into(),
                "name:\"Umbreon\"".into(),
            ]
        );
    }

    #[test]
    fn test_structured_input_goes_first() {
        let qb = QueryBuilder::default();
        let out = qb.build("  name:\"Pikachu\" ");
        // The parsed name collapses onto the same query and is deduplicated.
        assert_eq!(out, vec!["name:\"Pikachu\"".to_string()]);
    }

    #[test]
    fn test_cap_applies() {
        let qb = QueryBuilder::new(2);
        let out = qb.build("Umbreon VMAX 215/203 Evolving Skies");
        assert_eq!(out.len(), 2);
        assert!(out[0].starts_with("number:"));
    }

    #[test]
    fn test_zero_cap_still_returns_one() {
        assert_eq!(QueryBuilder::new(0).build("Mew").len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(QueryBuilder::default().build("   "), vec![String::new()]);
    }
}
