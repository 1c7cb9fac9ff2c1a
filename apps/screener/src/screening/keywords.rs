/// Skill terms matched when `SCREENING_KEYWORDS` is not set.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "Python",
    "Flask",
    "Machine Learning",
    "SQL",
    "Data",
    "API",
    "Cloud",
    "Git",
];

/// Upper bound on keywords reported per resume.
pub const MAX_MATCHED_KEYWORDS: usize = 5;

pub fn default_vocabulary() -> Vec<String> {
    DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect()
}

/// Returns the vocabulary entries that occur in `text` as case-insensitive
/// substrings, in vocabulary order, capped at [`MAX_MATCHED_KEYWORDS`].
pub fn match_keywords(text: &str, vocabulary: &[String]) -> Vec<String> {
    let text_lower = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|kw| text_lower.contains(&kw.to_lowercase()))
        .take(MAX_MATCHED_KEYWORDS)
        .cloned()
        .collect()
}
