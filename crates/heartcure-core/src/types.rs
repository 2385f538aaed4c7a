//! Core types for HeartCure

use crate::error::{Error, Result};
use crate::workflow::Workflow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered feature values for one prediction
///
/// Position `i` holds the value of field `i` of the workflow descriptor the
/// vector was collected for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputVector(Vec<f64>);

impl InputVector {
    /// Wrap already-ordered values
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for InputVector {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// A value as received from the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Text with nothing but whitespace, treated the same as an unset value
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    /// Parse to a finite number
    pub fn to_number(&self, field: &str) -> Result<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::domain(field, format!("{s:?}"), "not a number"))?,
        };

        if !value.is_finite() {
            return Err(Error::domain(field, value, "value must be finite"));
        }
        Ok(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Binary outcome of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Positive,
    Negative,
}

impl Outcome {
    /// Map a raw class label; only `1` is positive
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn is_positive(self) -> bool {
        self == Self::Positive
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// Result of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub workflow: Workflow,

    /// Class label returned by the classifier
    pub prediction: i64,

    pub outcome: Outcome,

    /// Display label chosen from the workflow descriptor
    pub label: &'static str,
}

impl Diagnosis {
    /// Build a diagnosis from a raw classifier output
    pub fn from_prediction(workflow: Workflow, prediction: i64) -> Self {
        let outcome = Outcome::from_class(prediction);
        Self {
            workflow,
            prediction,
            outcome,
            label: workflow.descriptor().label_for(outcome.is_positive()),
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}
