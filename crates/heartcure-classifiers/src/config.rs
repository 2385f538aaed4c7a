//! Configuration for model artifacts

use crate::{ModelConfig, ModelFormat};
use heartcure_core::{Error, Result, Workflow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Artifact locations for every workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Directory holding the artifacts; relative paths resolve against the base dir
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    #[serde(default)]
    pub diabetes: Option<ModelConfigSpec>,

    #[serde(default)]
    pub heart_disease: Option<ModelConfigSpec>,

    #[serde(default)]
    pub parkinsons: Option<ModelConfigSpec>,
}

/// Model configuration specification (for YAML/config files)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfigSpec {
    /// Artifact path; relative paths resolve against `models_dir`
    pub path: PathBuf,

    /// Format override; inferred from the extension when absent
    #[serde(default)]
    pub format: Option<ModelFormat>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            diabetes: None,
            heart_disease: None,
            parkinsons: None,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse models config: {}", e)))
    }

    /// Explicit spec for a workflow, if any
    pub fn spec(&self, workflow: Workflow) -> Option<&ModelConfigSpec> {
        match workflow {
            Workflow::Diabetes => self.diabetes.as_ref(),
            Workflow::HeartDisease => self.heart_disease.as_ref(),
            Workflow::Parkinsons => self.parkinsons.as_ref(),
        }
    }

    /// Resolved models directory
    pub fn models_dir(&self, base_dir: &Path) -> PathBuf {
        if self.models_dir.is_absolute() {
            self.models_dir.clone()
        } else {
            base_dir.join(&self.models_dir)
        }
    }

    /// Resolve the model config for a workflow
    ///
    /// Workflows without an explicit entry use `<name>_model.safetensors`
    /// inside the models directory.
    pub fn model_config(&self, workflow: Workflow, base_dir: &Path) -> ModelConfig {
        let models_dir = self.models_dir(base_dir);

        match self.spec(workflow) {
            Some(spec) => {
                let path = if spec.path.is_absolute() {
                    spec.path.clone()
                } else {
                    models_dir.join(&spec.path)
                };
                let config = ModelConfig::from_local(path);
                match spec.format {
                    Some(format) => config.with_format(format),
                    None => config,
                }
            }
            None => ModelConfig::from_local(models_dir.join(default_file_name(workflow))),
        }
    }
}

/// Default artifact file name for a workflow
pub fn default_file_name(workflow: Workflow) -> String {
    format!("{}_model.safetensors", workflow.name())
}

/// Directory containing the running executable
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::config(format!("executable has no parent directory: {}", exe.display())))
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("saved_models")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        let resolved = config.model_config(Workflow::HeartDisease, Path::new("/opt/heartcure"));

        assert_eq!(
            resolved.path,
            PathBuf::from("/opt/heartcure/saved_models/heart_disease_model.safetensors")
        );
        assert_eq!(resolved.format, ModelFormat::SafeTensors);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
models_dir: /var/lib/models
diabetes:
  path: diabetes.json
parkinsons:
  path: /elsewhere/parkinsons.bin
  format: safetensors
"#;
        let config = RegistryConfig::from_yaml(yaml).unwrap();
        let base = Path::new("/ignored");

        let diabetes = config.model_config(Workflow::Diabetes, base);
        assert_eq!(diabetes.path, PathBuf::from("/var/lib/models/diabetes.json"));
        assert_eq!(diabetes.format, ModelFormat::Json);

        let parkinsons = config.model_config(Workflow::Parkinsons, base);
        assert_eq!(parkinsons.path, PathBuf::from("/elsewhere/parkinsons.bin"));
        assert_eq!(parkinsons.format, ModelFormat::SafeTensors);

        let heart = config.model_config(Workflow::HeartDisease, base);
        assert_eq!(
            heart.path,
            PathBuf::from("/var/lib/models/heart_disease_model.safetensors")
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = RegistryConfig::from_yaml("diabetis:\n  path: x.json\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
