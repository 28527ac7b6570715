use tracing::{info, warn};

use blacknote_core::{set_app_identity, LegacyFallback, ShellRecentDocuments};
use blacknote_settings::AppConfig;

/// Process-wide state created once in `main` and owned by the app.
#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub recent: ShellRecentDocuments,
    pub fallback: LegacyFallback,
}

impl AppContext {
    pub fn init(config: AppConfig) -> Self {
        set_app_identity();
        let fallback = LegacyFallback::from_label(&config.legacy_encoding).unwrap_or_else(|| {
            warn!(label = %config.legacy_encoding, "unknown legacy encoding, using default");
            LegacyFallback::default()
        });
        info!(?fallback, theme = ?config.theme, "application context ready");
        Self {
            config,
            recent: ShellRecentDocuments,
            fallback,
        }
    }

    pub fn shutdown(&self) {
        info!("application shutting down");
    }
}
