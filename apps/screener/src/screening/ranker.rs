//! Result Ranker — builds per-resume records and orders them by score.

use serde::Serialize;

/// One ranked resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub resume_name: String,
    /// Percentage in [0, 100], two decimals.
    pub similarity_score: f64,
    /// At most five, in vocabulary order.
    pub matched_keywords: Vec<String>,
}

/// Records sorted by `similarity_score` descending; equal scores keep upload order.
/// Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<ScoreRecord>,
}

impl ResultSet {
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ScoreRecord;
    type IntoIter = std::slice::Iter<'a, ScoreRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Converts a cosine similarity into a 0–100 percentage rounded to two decimals.
/// Negative similarities count as no similarity.
pub fn to_percentage(raw: f64) -> f64 {
    let pct = raw.clamp(0.0, 1.0) * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Zips names, raw cosine scores, and keyword lists position by position, then sorts.
///
/// # Panics
/// If the three sequences differ in length. The pipeline builds them together, so a
/// mismatch is a bug in the caller.
pub fn rank(
    names: Vec<String>,
    raw_scores: Vec<f64>,
    keyword_lists: Vec<Vec<String>>,
) -> ResultSet {
    assert_eq!(names.len(), raw_scores.len(), "one score per resume");
    assert_eq!(names.len(), keyword_lists.len(), "one keyword list per resume");

    let mut records: Vec<ScoreRecord> = names
        .into_iter()
        .zip(raw_scores)
        .zip(keyword_lists)
        .map(|((resume_name, raw), matched_keywords)| ScoreRecord {
            resume_name,
            similarity_score: to_percentage(raw),
            matched_keywords,
        })
        .collect();

    // sort_by is stable: ties stay in upload order.
    records.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));

    ResultSet { records }
}
