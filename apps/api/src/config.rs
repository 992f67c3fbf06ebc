use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::pipeline::lda::LdaParams;

/// Application configuration loaded from environment variables.
/// Every field has a default; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory of uploaded PDFs; scanned at startup to seed the corpus.
    pub upload_dir: PathBuf,
    pub num_topics: usize,
    pub lda_passes: usize,
    pub lda_seed: u64,
    pub max_upload_bytes: usize,
    /// Optional newline-separated list of extra stopwords.
    pub stopwords_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let num_topics: usize = parse_or(&lookup, "NUM_TOPICS", 3)?;
        if num_topics == 0 {
            anyhow::bail!("NUM_TOPICS must be at least 1");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 5000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            num_topics,
            lda_passes: parse_or(&lookup, "LDA_PASSES", 10)?,
            lda_seed: parse_or(&lookup, "LDA_SEED", 42)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
            stopwords_path: lookup("STOPWORDS_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn lda_params(&self) -> LdaParams {
        LdaParams {
            num_topics: self.num_topics,
            passes: self.lda_passes,
            seed: self.lda_seed,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
