use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::screening::keywords::default_vocabulary;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Which sentence encoder backs the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Feature hashing. No model files needed; matches shared words only.
    Hash,
    /// all-MiniLM-L6-v2 via fastembed (cargo feature `fastembed`, on by default).
    MiniLm,
}

impl Default for EmbeddingBackend {
    /// MiniLM when the model runtime is compiled in, otherwise the hash fallback.
    fn default() -> Self {
        if cfg!(feature = "fastembed") {
            EmbeddingBackend::MiniLm
        } else {
            EmbeddingBackend::Hash
        }
    }
}

impl FromStr for EmbeddingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hash" => Ok(EmbeddingBackend::Hash),
            "minilm" | "all-minilm-l6-v2" => Ok(EmbeddingBackend::MiniLm),
            other => anyhow::bail!("unknown embedding backend '{other}' (expected 'hash' or 'minilm')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// Vector size for the hash backend. MiniLM is fixed at 384.
    pub dimension: usize,
    pub cache_dir: PathBuf,
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding: EmbeddingConfig,
    pub vocabulary: Vec<String>,
    pub export_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            embedding: EmbeddingConfig {
                backend: parse_env("EMBEDDING_BACKEND", EmbeddingBackend::default())?,
                dimension: parse_env("EMBEDDING_DIMENSION", 384)
                    .context("EMBEDDING_DIMENSION must be a positive integer")?,
                cache_dir: std::env::var("MODEL_CACHE_DIR")
                    .unwrap_or_else(|_| ".fastembed_cache".to_string())
                    .into(),
            },
            vocabulary: std::env::var("SCREENING_KEYWORDS")
                .ok()
                .map(|raw| parse_vocabulary(&raw))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_vocabulary),
            export_dir: std::env::var("EXPORT_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value '{raw}' for {key}: {e}")),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated keyword list, dropping blanks.
fn parse_vocabulary(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
