//! Error types for HeartCure

use crate::workflow::Workflow;

/// Result type alias using HeartCure's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for HeartCure operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A model artifact could not be loaded at startup
    #[error("failed to load {workflow} model: {reason}")]
    StartupLoad { workflow: Workflow, reason: String },

    /// Input length disagrees with the workflow's field count
    #[error("{workflow} expects {expected} values, got {actual}")]
    ArityMismatch {
        workflow: Workflow,
        expected: usize,
        actual: usize,
    },

    /// A field value falls outside its declared domain
    #[error("invalid value {value} for field '{field}': {reason}")]
    DomainViolation {
        field: String,
        value: String,
        reason: String,
    },

    /// A named input does not belong to the workflow
    #[error("unknown field '{field}' for {workflow}")]
    UnknownField { workflow: Workflow, field: String },

    /// Workflow selector did not name a supported workflow
    #[error("unknown workflow: {0}")]
    UnknownWorkflow(String),

    /// Classifier failed during inference
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new startup load error
    pub fn startup(workflow: Workflow, reason: impl Into<String>) -> Self {
        Self::StartupLoad {
            workflow,
            reason: reason.into(),
        }
    }

    /// Create a new domain violation error
    pub fn domain(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::DomainViolation {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error is reported back to the user rather than aborting startup
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ArityMismatch { .. }
                | Self::DomainViolation { .. }
                | Self::UnknownField { .. }
                | Self::UnknownWorkflow(_)
                | Self::Inference(_)
        )
    }

    /// Short machine-readable name, used for metrics labels and API error types
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StartupLoad { .. } => "startup_load_failure",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::DomainViolation { .. } => "domain_violation",
            Self::UnknownField { .. } => "unknown_field",
            Self::UnknownWorkflow(_) => "unknown_workflow",
            Self::Inference(_) => "inference_failure",
            Self::Config(_) => "configuration_error",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
        }
    }
}
