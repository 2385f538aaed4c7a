//! Model registry initialization and management

use crate::model_loader::load_classifier;
use crate::{Classifier, RegistryConfig};
use heartcure_core::{describe, Error, Result, Workflow};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// One classifier per workflow, fixed for the life of the process
///
/// A registry is only ever constructed complete: every workflow has a
/// classifier whose feature count matches its descriptor.
pub struct ModelRegistry {
    classifiers: [Arc<dyn Classifier>; 3],
}

impl ModelRegistry {
    /// Load every workflow's artifact
    ///
    /// Fails if any artifact is missing, unreadable, or has the wrong
    /// feature count; no workflow is served from a partial registry.
    pub fn load(config: &RegistryConfig, base_dir: &Path) -> Result<Self> {
        info!(
            "Loading models from {}",
            config.models_dir(base_dir).display()
        );

        let mut loaded = Vec::with_capacity(Workflow::ALL.len());
        let mut first_failure = None;

        for workflow in Workflow::ALL {
            let model_config = config.model_config(workflow, base_dir);
            match load_classifier(workflow.name(), &model_config)
                .map_err(|e| Error::startup(workflow, e.to_string()))
            {
                Ok(classifier) => {
                    info!("✓ Loaded {} model from {}", workflow, model_config.path.display());
                    loaded.push((workflow, classifier));
                }
                Err(e) => {
                    error!("✗ {}", e);
                    first_failure.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_failure {
            return Err(e);
        }

        Self::from_classifiers(loaded)
    }

    /// Build a registry from already constructed classifiers
    pub fn from_classifiers(
        classifiers: impl IntoIterator<Item = (Workflow, Arc<dyn Classifier>)>,
    ) -> Result<Self> {
        let mut slots: [Option<Arc<dyn Classifier>>; 3] = [None, None, None];

        for (workflow, classifier) in classifiers {
            let expected = describe(workflow).arity();
            if classifier.n_features() != expected {
                return Err(Error::startup(
                    workflow,
                    format!(
                        "model '{}' expects {} features, workflow has {} fields",
                        classifier.name(),
                        classifier.n_features(),
                        expected
                    ),
                ));
            }
            slots[workflow.index()] = Some(classifier);
        }

        let [diabetes, heart_disease, parkinsons] = slots;
        let missing = |workflow: Workflow| Error::startup(workflow, "no classifier registered");

        let registry = Self {
            classifiers: [
                diabetes.ok_or_else(|| missing(Workflow::Diabetes))?,
                heart_disease.ok_or_else(|| missing(Workflow::HeartDisease))?,
                parkinsons.ok_or_else(|| missing(Workflow::Parkinsons))?,
            ],
        };

        info!("Model registry initialized with {} models", registry.classifiers.len());
        Ok(registry)
    }

    /// Get the classifier bound to a workflow
    pub fn get(&self, workflow: Workflow) -> &Arc<dyn Classifier> {
        &self.classifiers[workflow.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::{LinearClassifier, LinearModelSpec};

    fn classifier(name: &str, n_features: usize) -> Arc<dyn Classifier> {
        Arc::new(
            LinearClassifier::new(name, LinearModelSpec::new(vec![0.0; n_features], 0.0)).unwrap(),
        )
    }

    #[test]
    fn test_from_classifiers() {
        let registry = ModelRegistry::from_classifiers([
            (Workflow::Parkinsons, classifier("p", 22)),
            (Workflow::Diabetes, classifier("d", 8)),
            (Workflow::HeartDisease, classifier("h", 13)),
        ])
        .unwrap();

        assert_eq!(registry.get(Workflow::Diabetes).name(), "d");
        assert_eq!(registry.get(Workflow::HeartDisease).name(), "h");
        assert_eq!(registry.get(Workflow::Parkinsons).name(), "p");
    }

    #[test]
    fn test_missing_workflow() {
        let result = ModelRegistry::from_classifiers([
            (Workflow::Diabetes, classifier("d", 8)),
            (Workflow::HeartDisease, classifier("h", 13)),
        ]);

        assert!(matches!(
            result,
            Err(Error::StartupLoad {
                workflow: Workflow::Parkinsons,
                ..
            })
        ));
    }

    #[test]
    fn test_feature_count_mismatch() {
        let result = ModelRegistry::from_classifiers([
            (Workflow::Diabetes, classifier("d", 13)),
            (Workflow::HeartDisease, classifier("h", 13)),
            (Workflow::Parkinsons, classifier("p", 22)),
        ]);

        assert!(matches!(
            result,
            Err(Error::StartupLoad {
                workflow: Workflow::Diabetes,
                ..
            })
        ));
    }
}
