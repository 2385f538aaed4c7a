//! HeartCure Core
//!
//! Types shared across the HeartCure prediction workspace.
//!
//! This crate provides:
//! - The workflow descriptor table (field order, domains, outcome labels)
//! - Input collection and coercion into ordered feature vectors
//! - Diagnosis and outcome types
//! - Error types and result handling

pub mod collector;
pub mod error;
pub mod types;
pub mod workflow;

pub use collector::InputCollector;
pub use error::{Error, Result};
pub use types::{Diagnosis, InputVector, Outcome, RawValue};
pub use workflow::{
    describe, descriptors, Domain, FieldDescriptor, ValueType, Workflow, WorkflowDescriptor,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collector::InputCollector;
    pub use crate::error::{Error, Result};
    pub use crate::types::{Diagnosis, InputVector, Outcome, RawValue};
    pub use crate::workflow::{describe, Workflow, WorkflowDescriptor};
}
