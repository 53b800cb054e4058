use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::fonts::FontConfig;
use crate::layout::FontStyle;
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Which layout provider the service uses for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Deterministic mock layout, no model spend.
    Stub,
    /// Vision-language model over the Chat Completions API.
    Remote,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stub" | "mock" => Ok(ProviderKind::Stub),
            "remote" | "openai" => Ok(ProviderKind::Remote),
            other => Err(anyhow!(
                "LAYOUT_PROVIDER must be 'stub' or 'remote', got '{other}'"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub provider: ProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub fonts_dir: PathBuf,
    /// Per-style overrides of `<fonts_dir>/<style>.ttf`.
    pub font_overrides: Vec<(FontStyle, PathBuf)>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            provider: ProviderKind::Stub,
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            openai_model: DEFAULT_MODEL.to_string(),
            fonts_dir: PathBuf::from("fonts"),
            font_overrides: Vec::new(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let provider = match lookup("LAYOUT_PROVIDER") {
            Some(v) => v.parse()?,
            None => defaults.provider,
        };
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        if provider == ProviderKind::Remote && openai_api_key.is_none() {
            bail!("OPENAI_API_KEY is required when LAYOUT_PROVIDER=remote");
        }

        let font_overrides = [
            ("FONT_MODERN", FontStyle::Modern),
            ("FONT_ELEGANT", FontStyle::Elegant),
            ("FONT_IMPACT", FontStyle::Impact),
        ]
        .into_iter()
        .filter_map(|(key, style)| lookup(key).map(|path| (style, PathBuf::from(path))))
        .collect();

        Ok(Config {
            port: match lookup("PORT") {
                Some(v) => v.parse::<u16>().context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            provider,
            openai_api_key,
            openai_base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            openai_model: lookup("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            fonts_dir: lookup("FONTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.fonts_dir),
            font_overrides,
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a positive integer")?,
                None => defaults.max_upload_bytes,
            },
        })
    }

    pub fn font_config(&self) -> FontConfig {
        self.font_overrides
            .iter()
            .fold(FontConfig::from_dir(&self.fonts_dir), |config, (style, path)| {
                config.with_path(*style, path.clone())
            })
    }
}
