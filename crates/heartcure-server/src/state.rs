use crate::config::ServerConfig;
use heartcure_classifiers::{ModelRegistry, PredictionDispatcher};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::Arc;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher over the startup-loaded registry
    pub dispatcher: PredictionDispatcher,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(dispatcher: PredictionDispatcher, metrics_handle: PrometheusHandle) -> Self {
        Self {
            dispatcher,
            metrics_handle,
        }
    }
}

/// Load every model named by the configuration
///
/// Any failure here is fatal: the caller must not serve predictions.
pub fn load_dispatcher(
    config: &ServerConfig,
    base_dir: &Path,
) -> heartcure_core::Result<PredictionDispatcher> {
    let registry = ModelRegistry::load(&config.models, base_dir)?;
    Ok(PredictionDispatcher::new(Arc::new(registry)))
}
