//! Model artifact loading

use crate::linear::{LinearClassifier, LinearModelSpec};
use crate::Classifier;
use candle_core::Device;
use heartcure_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Artifact file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// SafeTensors format (recommended)
    #[default]
    SafeTensors,
    /// JSON-encoded [`LinearModelSpec`]
    Json,
}

impl ModelFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::SafeTensors,
        }
    }
}

/// Where and how to load one model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub format: ModelFormat,
}

impl ModelConfig {
    /// Create a config, inferring the format from the extension
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ModelFormat::from_path(&path);
        Self { path, format }
    }

    /// Set model format
    pub fn with_format(mut self, format: ModelFormat) -> Self {
        self.format = format;
        self
    }
}

/// Read the model parameters described by a config
pub fn load_spec(config: &ModelConfig) -> Result<LinearModelSpec> {
    if !config.path.exists() {
        return Err(Error::config(format!(
            "Model file not found: {}",
            config.path.display()
        )));
    }

    debug!(path = %config.path.display(), format = ?config.format, "reading model artifact");

    match config.format {
        ModelFormat::Json => {
            let content = std::fs::read_to_string(&config.path)?;
            Ok(serde_json::from_str(&content)?)
        }
        ModelFormat::SafeTensors => {
            let tensors = candle_core::safetensors::load(&config.path, &Device::Cpu)
                .map_err(|e| Error::config(format!("Failed to load SafeTensors: {}", e)))?;
            LinearModelSpec::from_tensors(&tensors)
        }
    }
}

/// Load a classifier from its artifact
pub fn load_classifier(name: &str, config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
    let spec = load_spec(config)?;
    Ok(Arc::new(LinearClassifier::new(name, spec)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ModelConfig::from_local("saved_models/diabetes_model.json").format,
            ModelFormat::Json
        );
        assert_eq!(
            ModelConfig::from_local("saved_models/diabetes_model.safetensors").format,
            ModelFormat::SafeTensors
        );
        assert_eq!(
            ModelConfig::from_local("model.bin")
                .with_format(ModelFormat::Json)
                .format,
            ModelFormat::Json
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_spec(&ModelConfig::from_local("/nonexistent/model.json")).unwrap_err();
        assert!(err.to_string().contains("Model file not found"));
    }

    #[test]
    fn test_load_json_and_safetensors() {
        let dir = tempfile::tempdir().unwrap();
        let spec = LinearModelSpec::new(vec![0.5, -1.0, 2.0], 0.25);

        let json_path = dir.path().join("model.json");
        std::fs::write(&json_path, serde_json::to_string(&spec).unwrap()).unwrap();
        assert_eq!(load_spec(&ModelConfig::from_local(&json_path)).unwrap(), spec);

        let st_path = dir.path().join("model.safetensors");
        spec.save_safetensors(&st_path).unwrap();
        assert_eq!(load_spec(&ModelConfig::from_local(&st_path)).unwrap(), spec);

        let classifier = load_classifier("test", &ModelConfig::from_local(&st_path)).unwrap();
        assert_eq!(classifier.name(), "test");
        assert_eq!(classifier.n_features(), 3);
    }

    #[test]
    fn test_corrupt_artifacts() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("model.json");
        std::fs::write(&json_path, "{ not json").unwrap();
        assert!(load_spec(&ModelConfig::from_local(&json_path)).is_err());

        let st_path = dir.path().join("model.safetensors");
        std::fs::write(&st_path, b"garbage").unwrap();
        assert!(load_spec(&ModelConfig::from_local(&st_path)).is_err());
    }
}
