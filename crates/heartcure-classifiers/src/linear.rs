//! Linear decision-function classifier backed by Candle tensors
//!
//! Covers the linear SVM and logistic regression models produced by the
//! training pipeline. Both reduce to `d = coef · ((x - mean) / scale) +
//! intercept` with the positive class chosen when `d > 0`.

use crate::Classifier;
use candle_core::{DType, Device, Tensor};
use heartcure_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Tensor names used in SafeTensors artifacts
pub const COEF: &str = "coef";
pub const INTERCEPT: &str = "intercept";
pub const SCALER_MEAN: &str = "scaler_mean";
pub const SCALER_SCALE: &str = "scaler_scale";
pub const CLASSES: &str = "classes";

/// Serializable parameters of a linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelSpec {
    /// One weight per feature, in feature order
    pub coef: Vec<f64>,

    pub intercept: f64,

    /// Standardization applied before the decision function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler_mean: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler_scale: Option<Vec<f64>>,

    /// `[negative, positive]` class labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<[i64; 2]>,
}

impl LinearModelSpec {
    /// Create a spec without scaling and with `[0, 1]` classes
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self {
            coef,
            intercept,
            scaler_mean: None,
            scaler_scale: None,
            classes: None,
        }
    }

    /// Read a spec from named tensors
    pub fn from_tensors(tensors: &HashMap<String, Tensor>) -> Result<Self> {
        let coef = tensor_vec(tensors, COEF)?
            .ok_or_else(|| Error::config(format!("missing '{}' tensor", COEF)))?;
        let intercept = tensor_vec(tensors, INTERCEPT)?
            .ok_or_else(|| Error::config(format!("missing '{}' tensor", INTERCEPT)))?;
        let intercept = match intercept.as_slice() {
            [value] => *value,
            other => {
                return Err(Error::config(format!(
                    "'{}' must hold exactly one value, found {}",
                    INTERCEPT,
                    other.len()
                )))
            }
        };

        let classes = match tensor_vec(tensors, CLASSES)? {
            None => None,
            Some(values) => match values.as_slice() {
                [negative, positive] => Some([*negative as i64, *positive as i64]),
                other => {
                    return Err(Error::config(format!(
                        "'{}' must hold exactly two values, found {}",
                        CLASSES,
                        other.len()
                    )))
                }
            },
        };

        Ok(Self {
            coef,
            intercept,
            scaler_mean: tensor_vec(tensors, SCALER_MEAN)?,
            scaler_scale: tensor_vec(tensors, SCALER_SCALE)?,
            classes,
        })
    }

    /// Convert to named tensors
    pub fn to_tensors(&self, device: &Device) -> Result<HashMap<String, Tensor>> {
        let mut tensors = HashMap::new();
        tensors.insert(COEF.to_string(), vec_tensor(&self.coef, device)?);
        tensors.insert(INTERCEPT.to_string(), vec_tensor(&[self.intercept], device)?);
        if let Some(mean) = &self.scaler_mean {
            tensors.insert(SCALER_MEAN.to_string(), vec_tensor(mean, device)?);
        }
        if let Some(scale) = &self.scaler_scale {
            tensors.insert(SCALER_SCALE.to_string(), vec_tensor(scale, device)?);
        }
        if let Some([negative, positive]) = self.classes {
            tensors.insert(
                CLASSES.to_string(),
                vec_tensor(&[negative as f64, positive as f64], device)?,
            );
        }
        Ok(tensors)
    }

    /// Write the spec as a SafeTensors artifact
    pub fn save_safetensors(&self, path: impl AsRef<Path>) -> Result<()> {
        let tensors = self.to_tensors(&Device::Cpu)?;
        candle_core::safetensors::save(&tensors, path.as_ref())
            .map_err(|e| Error::config(format!("Failed to write SafeTensors: {}", e)))
    }
}

/// Linear classifier ready for inference
pub struct LinearClassifier {
    name: String,

    /// Weights shaped `(n_features, 1)`
    coef: Tensor,

    /// Bias shaped `(1,)`
    intercept: Tensor,

    scaler: Option<Scaler>,

    classes: [i64; 2],

    n_features: usize,

    device: Device,
}

struct Scaler {
    mean: Tensor,
    scale: Tensor,
}

impl LinearClassifier {
    /// Build a classifier on the CPU
    pub fn new(name: impl Into<String>, spec: LinearModelSpec) -> Result<Self> {
        Self::with_device(name, spec, Device::Cpu)
    }

    /// Build a classifier on the given device
    pub fn with_device(name: impl Into<String>, spec: LinearModelSpec, device: Device) -> Result<Self> {
        let n_features = spec.coef.len();
        if n_features == 0 {
            return Err(Error::config("model has no coefficients"));
        }
        if !spec.intercept.is_finite() || spec.coef.iter().any(|c| !c.is_finite()) {
            return Err(Error::config("model parameters must be finite"));
        }

        let scaler = match (spec.scaler_mean, spec.scaler_scale) {
            (None, None) => None,
            (Some(mean), Some(scale)) => {
                if mean.len() != n_features || scale.len() != n_features {
                    return Err(Error::config(format!(
                        "scaler has {}/{} values, model has {} features",
                        mean.len(),
                        scale.len(),
                        n_features
                    )));
                }
                if scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                    return Err(Error::config("scaler scale must be finite and non-zero"));
                }
                Some(Scaler {
                    mean: vec_tensor(&mean, &device)?,
                    scale: vec_tensor(&scale, &device)?,
                })
            }
            _ => {
                return Err(Error::config(
                    "scaler_mean and scaler_scale must be given together",
                ))
            }
        };

        let coef = Tensor::from_vec(spec.coef, (n_features, 1), &device)
            .map_err(|e| Error::config(format!("invalid coefficients: {}", e)))?;
        let intercept = vec_tensor(&[spec.intercept], &device)?;

        Ok(Self {
            name: name.into(),
            coef,
            intercept,
            scaler,
            classes: spec.classes.unwrap_or([0, 1]),
            n_features,
            device,
        })
    }

    /// Raw decision values, one per sample
    pub fn decision_function(&self, batch: &[&[f64]]) -> Result<Vec<f64>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        for (i, sample) in batch.iter().enumerate() {
            if sample.len() != self.n_features {
                return Err(Error::inference(format!(
                    "sample {} has {} features, {} expects {}",
                    i,
                    sample.len(),
                    self.name,
                    self.n_features
                )));
            }
        }

        let flat: Vec<f64> = batch.iter().flat_map(|s| s.iter().copied()).collect();
        let x = Tensor::from_vec(flat, (batch.len(), self.n_features), &self.device)
            .map_err(inference_error)?;

        let x = match &self.scaler {
            Some(scaler) => x
                .broadcast_sub(&scaler.mean)
                .and_then(|x| x.broadcast_div(&scaler.scale))
                .map_err(inference_error)?,
            None => x,
        };

        let scores = x
            .matmul(&self.coef)
            .and_then(|d| d.broadcast_add(&self.intercept))
            .and_then(|d| d.flatten_all())
            .and_then(|d| d.to_vec1::<f64>())
            .map_err(inference_error)?;

        if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
            return Err(Error::inference(format!("non-finite decision value {}", bad)));
        }

        Ok(scores)
    }
}

impl Classifier for LinearClassifier {
    fn infer(&self, batch: &[&[f64]]) -> Result<Vec<i64>> {
        let [negative, positive] = self.classes;
        Ok(self
            .decision_function(batch)?
            .into_iter()
            .map(|d| if d > 0.0 { positive } else { negative })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

fn inference_error(e: candle_core::Error) -> Error {
    Error::inference(e.to_string())
}

fn vec_tensor(values: &[f64], device: &Device) -> Result<Tensor> {
    Tensor::from_slice(values, values.len(), device)
        .map_err(|e| Error::config(format!("failed to build tensor: {}", e)))
}

fn tensor_vec(tensors: &HashMap<String, Tensor>, key: &str) -> Result<Option<Vec<f64>>> {
    let Some(tensor) = tensors.get(key) else {
        return Ok(None);
    };

    tensor
        .to_dtype(DType::F64)
        .and_then(|t| t.flatten_all())
        .and_then(|t| t.to_vec1::<f64>())
        .map(Some)
        .map_err(|e| Error::config(format!("invalid '{}' tensor: {}", key, e)))
}
