//! Backend selection from configuration.

use crate::http::HttpGenerator;
use crate::scripted::ScriptedGenerator;
use pitwall_core::GeneratorBackendConfig;
use pitwall_proto::RoleGenerator;
use thiserror::Error;
use tracing::info;

/// Failure to construct the configured backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unknown generator backend '{0}' (expected 'scripted' or 'http')")]
    UnknownBackend(String),
    #[error("api key environment variable {env} is not set")]
    MissingApiKey { env: String },
    #[error("http client construction failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Resolves the configured backend name to a boxed generator.
pub fn build_generator(
    config: &GeneratorBackendConfig,
) -> Result<Box<dyn RoleGenerator>, BackendError> {
    match config.backend.as_str() {
        "scripted" => {
            info!("using scripted generator backend");
            Ok(Box::new(ScriptedGenerator::new()))
        }
        "http" => {
            info!(model = %config.model, base_url = %config.base_url, "using http generator backend");
            Ok(Box::new(HttpGenerator::from_config(config)?))
        }
        other => Err(BackendError::UnknownBackend(other.to_string())),
    }
}
