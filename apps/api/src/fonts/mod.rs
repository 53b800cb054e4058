//! Font Resolver — maps a style tag to a concrete face.
//!
//! Resolution order:
//! 1. the style's configured file;
//! 2. if the style has no configured file, the `modern` file;
//! 3. if the chosen file is missing or unparseable, the built-in bitmap font.
//!
//! Step 3 is a degraded path, never an error. Parsed faces are cached per path,
//! failed loads included, so a missing file is only read once per process.

pub mod builtin;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusttype::Font;
use tracing::{debug, warn};

use crate::layout::FontStyle;

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Fixed style → font file mapping.
#[derive(Debug, Clone, Default)]
pub struct FontConfig {
    paths: HashMap<FontStyle, PathBuf>,
}

impl FontConfig {
    /// `<dir>/modern.ttf`, `<dir>/elegant.ttf`, `<dir>/impact.ttf`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let paths = FontStyle::ALL
            .iter()
            .map(|style| (*style, dir.join(format!("{}.ttf", style.as_str()))))
            .collect();
        Self { paths }
    }

    pub fn with_path(mut self, style: FontStyle, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(style, path.into());
        self
    }

    pub fn path(&self, style: FontStyle) -> Option<&Path> {
        self.paths.get(&style).map(PathBuf::as_path)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handles
// ────────────────────────────────────────────────────────────────────────────

/// A face ready to rasterise at a given pixel size.
#[derive(Clone)]
pub enum FontHandle {
    Outline { font: Arc<Font<'static>>, px: u32 },
    /// Built-in bitmap face at an integer scale; the exact pixel size is approximated.
    Builtin { scale: u32 },
}

impl FontHandle {
    pub fn builtin(px: u32) -> Self {
        FontHandle::Builtin {
            scale: builtin::scale_for(px),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontHandle::Builtin { .. })
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontHandle::Outline { px, .. } => write!(f, "Outline({px}px)"),
            FontHandle::Builtin { scale } => write!(f, "Builtin(x{scale})"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver
// ────────────────────────────────────────────────────────────────────────────

pub struct FontResolver {
    config: FontConfig,
    cache: Mutex<HashMap<PathBuf, Option<Arc<Font<'static>>>>>,
}

impl FontResolver {
    pub fn new(config: FontConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    /// Resolves `style` at `px` pixels. Always returns a usable face.
    pub fn resolve(&self, style: FontStyle, px: u32) -> FontHandle {
        let px = px.max(1);
        let path = self
            .config
            .path(style)
            .or_else(|| self.config.path(FontStyle::default()));

        let Some(path) = path else {
            debug!("no font configured for style '{style}', using built-in face");
            return FontHandle::builtin(px);
        };

        match self.load(path) {
            Some(font) => FontHandle::Outline { font, px },
            None => {
                debug!("font for style '{style}' unavailable, using built-in face at {px}px");
                FontHandle::builtin(px)
            }
        }
    }

    fn load(&self, path: &Path) -> Option<Arc<Font<'static>>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(path) {
            return cached.clone();
        }

        let loaded = match std::fs::read(path) {
            Ok(bytes) => match Font::try_from_vec(bytes) {
                Some(font) => {
                    debug!("loaded font {}", path.display());
                    Some(Arc::new(font))
                }
                None => {
                    warn!("font file {} is not a valid font; falling back", path.display());
                    None
                }
            },
            Err(e) => {
                warn!("font file {} could not be read ({e}); falling back", path.display());
                None
            }
        };

        cache.insert(path.to_path_buf(), loaded.clone());
        loaded
    }
}

/// The `modern` face shipped in the repository's `fonts/` directory.
#[cfg(test)]
pub(crate) const BUNDLED_FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fonts/modern.ttf");

#[cfg(test)]
pub(crate) fn bundled_font() -> Arc<Font<'static>> {
    let bytes: &'static [u8] = include_bytes!("../../../../fonts/modern.ttf");
    Arc::new(Font::try_from_bytes(bytes).expect("bundled font parses"))
}
