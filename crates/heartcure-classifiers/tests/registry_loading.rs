//! Startup loading of model artifacts from disk

use heartcure_classifiers::config::default_file_name;
use heartcure_classifiers::{LinearModelSpec, ModelRegistry, PredictionDispatcher, RegistryConfig};
use heartcure_core::{describe, Error, InputVector, Outcome, Workflow};
use std::path::Path;
use std::sync::Arc;

fn write_artifacts(dir: &Path) {
    std::fs::create_dir_all(dir.join("saved_models")).unwrap();
    for workflow in Workflow::ALL {
        let spec = LinearModelSpec::new(vec![0.01; describe(workflow).arity()], -1.0);
        spec.save_safetensors(dir.join("saved_models").join(default_file_name(workflow)))
            .unwrap();
    }
}

#[test]
fn test_load_default_layout() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let registry = ModelRegistry::load(&RegistryConfig::default(), dir.path()).unwrap();
    for workflow in Workflow::ALL {
        assert_eq!(
            registry.get(workflow).n_features(),
            describe(workflow).arity()
        );
    }

    let dispatcher = PredictionDispatcher::new(Arc::new(registry));
    let diagnosis = dispatcher
        .predict(Workflow::Parkinsons, &InputVector::new(vec![0.0; 22]))
        .unwrap();
    assert_eq!(diagnosis.outcome, Outcome::Negative);
}

#[test]
fn test_any_missing_artifact_fails_whole_registry() {
    for missing in Workflow::ALL {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        std::fs::remove_file(dir.path().join("saved_models").join(default_file_name(missing)))
            .unwrap();

        match ModelRegistry::load(&RegistryConfig::default(), dir.path()) {
            Err(Error::StartupLoad { workflow, reason }) => {
                assert_eq!(workflow, missing);
                assert!(reason.contains("not found"), "{}", reason);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("registry loaded without {}", missing),
        }
    }
}

#[test]
fn test_corrupt_artifact_fails_registry() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    std::fs::write(
        dir.path()
            .join("saved_models")
            .join(default_file_name(Workflow::HeartDisease)),
        b"not a model",
    )
    .unwrap();

    let result = ModelRegistry::load(&RegistryConfig::default(), dir.path());
    assert!(matches!(
        result,
        Err(Error::StartupLoad {
            workflow: Workflow::HeartDisease,
            ..
        })
    ));
}

#[test]
fn test_wrong_feature_count_fails_registry() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    LinearModelSpec::new(vec![0.5; 10], 0.0)
        .save_safetensors(
            dir.path()
                .join("saved_models")
                .join(default_file_name(Workflow::Diabetes)),
        )
        .unwrap();

    let result = ModelRegistry::load(&RegistryConfig::default(), dir.path());
    assert!(matches!(
        result,
        Err(Error::StartupLoad {
            workflow: Workflow::Diabetes,
            ..
        })
    ));
}

#[test]
fn test_yaml_config_with_json_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let mut coef = vec![0.0; 13];
    coef[1] = 2.0;
    let json = serde_json::to_string(&LinearModelSpec::new(coef, -1.0)).unwrap();
    std::fs::write(dir.path().join("heart.json"), json).unwrap();

    let yaml = format!(
        "models_dir: saved_models\nheart_disease:\n  path: {}\n",
        dir.path().join("heart.json").display()
    );
    let config = RegistryConfig::from_yaml(&yaml).unwrap();
    let dispatcher = PredictionDispatcher::new(Arc::new(
        ModelRegistry::load(&config, dir.path()).unwrap(),
    ));

    let mut values = vec![0.0; 13];
    values[1] = 1.0;
    let diagnosis = dispatcher
        .predict(Workflow::HeartDisease, &InputVector::new(values))
        .unwrap();
    assert_eq!(diagnosis.outcome, Outcome::Positive);
}
