//! Input collection
//!
//! Turns raw presentation-layer values into an [`InputVector`] laid out in
//! the descriptor's field order. Each value is coerced to its field's
//! [`ValueType`] and checked against its [`Domain`]; nothing else is
//! validated.

use crate::error::{Error, Result};
use crate::types::{InputVector, RawValue};
use crate::workflow::{Domain, FieldDescriptor, ValueType, WorkflowDescriptor};
use std::collections::HashMap;
use tracing::debug;

/// Collects input vectors for a single workflow
#[derive(Debug, Clone, Copy)]
pub struct InputCollector {
    descriptor: &'static WorkflowDescriptor,
}

impl InputCollector {
    pub fn new(descriptor: &'static WorkflowDescriptor) -> Self {
        Self { descriptor }
    }

    /// Collect from values given in field order; `None` leaves a field unset
    pub fn collect_ordered(&self, values: &[Option<RawValue>]) -> Result<InputVector> {
        if values.len() != self.descriptor.arity() {
            return Err(Error::ArityMismatch {
                workflow: self.descriptor.workflow,
                expected: self.descriptor.arity(),
                actual: values.len(),
            });
        }

        let vector = self
            .descriptor
            .fields
            .iter()
            .zip(values)
            .map(|(field, raw)| coerce(field, raw.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            workflow = %self.descriptor.workflow,
            unset = values.iter().filter(|v| v.as_ref().map_or(true, RawValue::is_blank)).count(),
            "collected ordered input"
        );
        Ok(InputVector::new(vector))
    }

    /// Collect from values keyed by field key; missing fields take their default
    pub fn collect_named(&self, values: &HashMap<String, RawValue>) -> Result<InputVector> {
        if let Some(unknown) = values
            .keys()
            .find(|key| self.descriptor.position(key).is_none())
        {
            return Err(Error::UnknownField {
                workflow: self.descriptor.workflow,
                field: unknown.clone(),
            });
        }

        let vector = self
            .descriptor
            .fields
            .iter()
            .map(|field| coerce(field, values.get(field.key)))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            workflow = %self.descriptor.workflow,
            provided = values.len(),
            "collected named input"
        );
        Ok(InputVector::new(vector))
    }
}

/// Coerce one raw value to its field's type and check its domain
///
/// A missing or blank value leaves the field unset and yields its default.
pub fn coerce(field: &FieldDescriptor, raw: Option<&RawValue>) -> Result<f64> {
    let Some(raw) = raw.filter(|raw| !raw.is_blank()) else {
        return Ok(field.default_value());
    };

    let value = raw.to_number(field.key)?;

    if field.value_type == ValueType::Integer && value.fract() != 0.0 {
        return Err(Error::domain(field.key, value, "expected an integer"));
    }

    match field.domain {
        Domain::Enumerated { values } => {
            if !values.iter().any(|v| *v as f64 == value) {
                return Err(Error::domain(
                    field.key,
                    value,
                    format!("expected one of {values:?}"),
                ));
            }
        }
        Domain::Range { min, max } => {
            if let Some(min) = min.filter(|min| value < *min) {
                return Err(Error::domain(field.key, value, format!("must be at least {min}")));
            }
            if let Some(max) = max.filter(|max| value > *max) {
                return Err(Error::domain(field.key, value, format!("must be at most {max}")));
            }
        }
        Domain::Unbounded => {}
    }

    Ok(value)
}
