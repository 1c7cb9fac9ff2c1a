//! Embedding backends — pluggable, trait-based text encoders.
//!
//! Default: `MiniLmEmbedder`, all-MiniLM-L6-v2 through `fastembed` (the default
//! cargo feature). The model is fetched into `MODEL_CACHE_DIR` on first start.
//! `HashEmbedder` is the offline fallback: deterministic feature hashing with no
//! model download, used by the tests. It only rewards shared words, never synonyms.
//!
//! The chosen backend is built once at startup and carried in `AppState` as
//! `Arc<dyn TextEmbedder>`. Encoding is CPU-bound; callers on the async runtime
//! go through `spawn_blocking`.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use siphasher::sip::SipHasher13;
use thiserror::Error;
use tracing::info;

use crate::config::{EmbeddingBackend, EmbeddingConfig};

/// A dense text embedding.
pub type Embedding = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding backend failed: {0}")]
    Backend(String),

    #[error("embedding backend returned {got} vectors for {expected} inputs")]
    OutputCount { expected: usize, got: usize },
}

/// A sentence encoder. Must be deterministic for a fixed input and return vectors
/// of `dimension()` length for every input.
pub trait TextEmbedder: Send + Sync {
    /// Backend label, reported by `/health`.
    fn name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    /// Encodes a batch of texts, one vector per input, in input order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError>;

    fn embed_one(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut vectors = self.embed(&[text])?;
        match vectors.len() {
            1 => Ok(vectors.remove(0)),
            got => Err(EmbeddingError::OutputCount { expected: 1, got }),
        }
    }
}

/// Builds the configured backend. Called once from `main`.
pub fn create_embedder(config: &EmbeddingConfig) -> anyhow::Result<Arc<dyn TextEmbedder>> {
    match config.backend {
        EmbeddingBackend::Hash => {
            info!("Using hash embedder ({} dims)", config.dimension);
            Ok(Arc::new(HashEmbedder::new(config.dimension)))
        }
        #[cfg(feature = "fastembed")]
        EmbeddingBackend::MiniLm => {
            info!("Loading all-MiniLM-L6-v2 from {}", config.cache_dir.display());
            Ok(Arc::new(MiniLmEmbedder::new(&config.cache_dir)?))
        }
        #[cfg(not(feature = "fastembed"))]
        EmbeddingBackend::MiniLm => anyhow::bail!(
            "EMBEDDING_BACKEND=minilm requires building with `--features fastembed`"
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HashEmbedder
// ────────────────────────────────────────────────────────────────────────────

// Changing these seeds changes every embedding.
const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

const BIGRAM_WEIGHT: f32 = 0.5;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "i", "in",
    "is", "it", "of", "on", "or", "our", "that", "the", "this", "to", "was", "we", "with",
    "you", "your",
];

/// Feature-hashing embedder.
///
/// Lower-cased word unigrams and bigrams (stopwords removed) are hashed with a
/// fixed-seed SipHash-1-3 into `dimension` buckets, weighted by `1 + ln(tf)`, and
/// L2-normalized. Components are non-negative, so cosine similarity lands in [0, 1].
/// Text with no tokens maps to the zero vector.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        (hasher.finish() % self.dimension as u64) as usize
    }

    fn encode(&self, text: &str) -> Embedding {
        let tokens = tokenize(text);

        // BTreeMap keeps the accumulation order fixed, so the output is bit-stable.
        let mut features: BTreeMap<String, (u32, f32)> = BTreeMap::new();
        for token in &tokens {
            features.entry(token.clone()).or_insert((0, 1.0)).0 += 1;
        }
        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            features.entry(bigram).or_insert((0, BIGRAM_WEIGHT)).0 += 1;
        }

        let mut vector = vec![0.0f32; self.dimension];
        for (feature, (count, weight)) in &features {
            let tf = 1.0 + (*count as f32).ln();
            vector[self.bucket(feature)] += tf * weight;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl TextEmbedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.encode(t)).collect())
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// MiniLmEmbedder
// ────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "fastembed")]
pub use minilm::MiniLmEmbedder;

#[cfg(feature = "fastembed")]
mod minilm {
    use std::path::Path;
    use std::sync::Mutex;

    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

    use super::{Embedding, EmbeddingError, TextEmbedder};

    const DIMENSION: usize = 384;

    /// all-MiniLM-L6-v2 sentence embeddings via ONNX Runtime.
    pub struct MiniLmEmbedder {
        // Inference needs exclusive access to the session.
        model: Mutex<TextEmbedding>,
    }

    impl MiniLmEmbedder {
        pub fn new(cache_dir: &Path) -> anyhow::Result<Self> {
            let model = TextEmbedding::try_new(
                InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                    .with_cache_dir(cache_dir.to_path_buf())
                    .with_show_download_progress(false),
            )
            .map_err(|e| anyhow::anyhow!("failed to load all-MiniLM-L6-v2: {e}"))?;
            Ok(Self {
                model: Mutex::new(model),
            })
        }
    }

    impl TextEmbedder for MiniLmEmbedder {
        fn name(&self) -> &'static str {
            "minilm"
        }

        fn dimension(&self) -> usize {
            DIMENSION
        }

        fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
            let mut model = self
                .model
                .lock()
                .map_err(|_| EmbeddingError::Backend("model lock poisoned".to_string()))?;
            model
                .embed(texts.to_vec(), None)
                .map_err(|e| EmbeddingError::Backend(e.to_string()))
        }
    }
}
