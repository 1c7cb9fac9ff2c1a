use std::sync::Arc;

use tera::Tera;

use crate::config::Config;
use crate::screening::embedder::TextEmbedder;
use crate::screening::pages::load_templates;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Loaded once at startup and shared read-only across requests.
    pub embedder: Arc<dyn TextEmbedder>,
    /// Keyword vocabulary, from `SCREENING_KEYWORDS` or the built-in default.
    pub vocabulary: Arc<[String]>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(config: Config, embedder: Arc<dyn TextEmbedder>) -> anyhow::Result<Self> {
        let vocabulary = Arc::from(config.vocabulary.clone());
        let templates = Arc::new(load_templates()?);
        Ok(Self {
            config,
            embedder,
            vocabulary,
            templates,
        })
    }
}
