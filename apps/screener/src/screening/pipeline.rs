//! Screening pipeline — the one function both front ends call.
//!
//! Flow: extract each document → score the batch against the job description →
//!       match keywords per resume → rank.
//!
//! Unreadable documents are dropped from the batch and reported in
//! `Analysis::rejected`. An empty job description, or a batch in which nothing
//! could be read, fails the whole run with `ScreeningError::MissingInput`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::screening::document::{Document, ExtractedText};
use crate::screening::embedder::TextEmbedder;
use crate::screening::error::ScreeningError;
use crate::screening::extractor::extract;
use crate::screening::keywords::match_keywords;
use crate::screening::ranker::{rank, ResultSet};
use crate::screening::scorer::score;

/// A document excluded from the run, with the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedDocument {
    pub name: String,
    pub reason: String,
}

/// Output of one screening run.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub results: ResultSet,
    pub rejected: Vec<RejectedDocument>,
}

/// Ranks `documents` against `job_description`.
///
/// Blocking and CPU-bound; async callers should wrap it in `spawn_blocking`.
pub fn analyze(
    embedder: &dyn TextEmbedder,
    vocabulary: &[String],
    job_description: &str,
    documents: Vec<Document>,
) -> Result<Analysis, ScreeningError> {
    if job_description.trim().is_empty() {
        return Err(ScreeningError::no_job_description());
    }
    if documents.is_empty() {
        return Err(ScreeningError::no_resumes());
    }

    let run_id = Uuid::new_v4();
    let submitted = documents.len();

    let mut texts: Vec<ExtractedText> = Vec::with_capacity(submitted);
    let mut rejected = Vec::new();
    for document in &documents {
        match extract(document) {
            Ok(text) => texts.push(text),
            Err(e) => {
                warn!(%run_id, "Skipping unreadable resume '{}': {e}", document.name);
                rejected.push(RejectedDocument {
                    name: document.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if texts.is_empty() {
        return Err(ScreeningError::no_readable_resumes(rejected.len()));
    }

    let raw_scores = score(embedder, job_description, &texts)?;
    let keyword_lists: Vec<Vec<String>> = texts
        .iter()
        .map(|t| match_keywords(&t.content, vocabulary))
        .collect();
    let names: Vec<String> = texts.into_iter().map(|t| t.source_name).collect();

    let results = rank(names, raw_scores, keyword_lists);

    info!(
        %run_id,
        submitted,
        ranked = results.len(),
        rejected = rejected.len(),
        embedder = embedder.name(),
        "Screening run complete"
    );

    Ok(Analysis {
        run_id,
        generated_at: Utc::now(),
        results,
        rejected,
    })
}
