use thiserror::Error;

use crate::screening::embedder::EmbeddingError;

pub const NO_JOB_DESCRIPTION: &str = "Please provide a job description";
pub const NO_RESUMES: &str = "No resumes uploaded";

/// Failures that abort a whole screening run.
///
/// A single unreadable document is not one of these: it is reported alongside the
/// results as a [`RejectedDocument`](crate::screening::pipeline::RejectedDocument).
#[derive(Debug, Error)]
pub enum ScreeningError {
    /// Empty job description, or no resume survived extraction.
    #[error("{0}")]
    MissingInput(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

impl ScreeningError {
    pub fn no_job_description() -> Self {
        ScreeningError::MissingInput(NO_JOB_DESCRIPTION.to_string())
    }

    pub fn no_resumes() -> Self {
        ScreeningError::MissingInput(NO_RESUMES.to_string())
    }

    pub fn no_readable_resumes(rejected: usize) -> Self {
        ScreeningError::MissingInput(format!(
            "None of the {rejected} uploaded resume(s) could be read. Upload PDF or UTF-8 text files."
        ))
    }
}
