//! HeartCure Classifiers
//!
//! Trained-model handling for the three disease prediction workflows.
//!
//! - [`ModelRegistry`] loads one immutable classifier per workflow at startup
//! - [`LinearClassifier`] runs linear decision functions on Candle tensors
//! - [`PredictionDispatcher`] validates inputs and maps classifier output to a
//!   [`Diagnosis`](heartcure_core::Diagnosis)

pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod linear;
pub mod model_loader;
pub mod registry;

pub use classifier::Classifier;
pub use config::{ModelConfigSpec, RegistryConfig};
pub use dispatcher::PredictionDispatcher;
pub use linear::{LinearClassifier, LinearModelSpec};
pub use model_loader::{load_classifier, ModelConfig, ModelFormat};
pub use registry::ModelRegistry;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::dispatcher::PredictionDispatcher;
    pub use crate::linear::{LinearClassifier, LinearModelSpec};
    pub use crate::registry::ModelRegistry;
}
