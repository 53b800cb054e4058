use std::sync::Arc;

use crate::config::Config;
use crate::fonts::FontResolver;
use crate::provider::LayoutProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Chosen once at startup: `StubProvider` or `RemoteModelProvider`.
    pub provider: Arc<dyn LayoutProvider>,
    /// Process-wide font cache; read-mostly after the first request per style.
    pub fonts: Arc<FontResolver>,
}

#[cfg(test)]
impl AppState {
    /// Stub provider and a font directory that never exists, so rendering uses the built-in face.
    pub fn for_tests() -> Self {
        use crate::fonts::FontConfig;
        use crate::provider::StubProvider;

        AppState {
            config: Config::default(),
            provider: Arc::new(StubProvider),
            fonts: Arc::new(FontResolver::new(FontConfig::from_dir(
                "/nonexistent/overlay-fonts",
            ))),
        }
    }
}
