use serde::{Deserialize, Serialize};

/// A card being tracked, as declared in the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchItem {
    pub name: String,
    pub queries: Vec<String>,
    #[serde(default)]
    pub min_grade: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub include_terms: Vec<String>,
}

impl WatchItem {
    pub fn new(name: impl Into<String>, queries: Vec<String>) -> Self {
        Self {
            name: name.into(),
            queries,
            min_grade: None,
            language: None,
            include_terms: Vec::new(),
        }
    }

    /// Filesystem-safe key for this item's history series.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Extra terms shown alongside alerts: configured include terms, a language
    /// marker and the grade label. They never alter the structured queries.
    pub fn search_hints(&self) -> Vec<String> {
        let mut hints = self.include_terms.clone();
        if let Some(lang) = &self.language {
            if lang.to_lowercase().starts_with("en") {
                hints.push("English".to_string());
            }
        }
        if let Some(grade) = &self.min_grade {
            let grade = grade.to_uppercase();
            if grade.contains("PSA10") || grade.contains("PSA 10") {
                hints.push("\"PSA 10\"".to_string());
            } else if grade.contains("PSA9") || grade.contains("PSA 9") {
                hints.push("\"PSA 9\"".to_string());
            }
        }
        hints
    }
}

/// Lowercase, collapse every run of non-alphanumeric ASCII into `-`, trim dashes.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}
