//! Embedding Scorer — cosine similarity between the job description and each resume.

use tracing::debug;

use crate::screening::document::ExtractedText;
use crate::screening::embedder::{EmbeddingError, TextEmbedder};
use crate::screening::error::ScreeningError;
use crate::screening::similarity::cosine_similarity;

/// Returns one similarity in [-1, 1] per resume, in input order.
///
/// The job description is encoded on its own and the resumes in one batch.
/// Rescaling to a percentage is left to the ranker.
pub fn score(
    embedder: &dyn TextEmbedder,
    job_description: &str,
    resumes: &[ExtractedText],
) -> Result<Vec<f64>, ScreeningError> {
    if job_description.trim().is_empty() {
        return Err(ScreeningError::no_job_description());
    }
    if resumes.is_empty() {
        return Err(ScreeningError::no_resumes());
    }

    let job_vector = embedder.embed_one(job_description)?;

    let texts: Vec<&str> = resumes.iter().map(|r| r.content.as_str()).collect();
    let resume_vectors = embedder.embed(&texts)?;
    if resume_vectors.len() != resumes.len() {
        return Err(EmbeddingError::OutputCount {
            expected: resumes.len(),
            got: resume_vectors.len(),
        }
        .into());
    }

    debug!(
        "Encoded job description and {} resumes with {} ({} dims)",
        resumes.len(),
        embedder.name(),
        embedder.dimension()
    );

    Ok(resume_vectors
        .iter()
        .map(|v| cosine_similarity(&job_vector, v))
        .collect())
}
