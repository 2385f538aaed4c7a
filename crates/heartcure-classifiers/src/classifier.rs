//! Classifier trait

use heartcure_core::Result;

/// Trait for all trained classifiers
///
/// Implementations are immutable once built and are shared across request
/// handlers, so `infer` takes `&self` and must not rely on interior state.
pub trait Classifier: Send + Sync {
    /// Predict one class label per sample
    fn infer(&self, batch: &[&[f64]]) -> Result<Vec<i64>>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Number of features each sample must have
    fn n_features(&self) -> usize;
}
