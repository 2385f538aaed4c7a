//! Prediction dispatch
//!
//! The dispatcher is the only place classifier failures are recovered:
//! errors and panics raised during inference come back as
//! [`Error::Inference`] and leave the registry untouched.

use crate::ModelRegistry;
use heartcure_core::{
    describe, Diagnosis, Error, InputCollector, InputVector, RawValue, Result, Workflow,
};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Routes prediction requests to the classifier bound to each workflow
#[derive(Clone)]
pub struct PredictionDispatcher {
    registry: Arc<ModelRegistry>,
}

impl PredictionDispatcher {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Predict from an already collected input vector
    pub fn predict(&self, workflow: Workflow, input: &InputVector) -> Result<Diagnosis> {
        let result = self.run(workflow, input);
        record(workflow, &result);
        result
    }

    /// Collect values given in field order, then predict
    pub fn predict_ordered(
        &self,
        workflow: Workflow,
        values: &[Option<RawValue>],
    ) -> Result<Diagnosis> {
        let result = InputCollector::new(describe(workflow))
            .collect_ordered(values)
            .and_then(|input| self.run(workflow, &input));
        record(workflow, &result);
        result
    }

    /// Collect values keyed by field, then predict
    pub fn predict_named(
        &self,
        workflow: Workflow,
        values: &HashMap<String, RawValue>,
    ) -> Result<Diagnosis> {
        let result = InputCollector::new(describe(workflow))
            .collect_named(values)
            .and_then(|input| self.run(workflow, &input));
        record(workflow, &result);
        result
    }

    fn run(&self, workflow: Workflow, input: &InputVector) -> Result<Diagnosis> {
        let expected = describe(workflow).arity();
        if input.len() != expected {
            return Err(Error::ArityMismatch {
                workflow,
                expected,
                actual: input.len(),
            });
        }

        let classifier = self.registry.get(workflow);
        let start = Instant::now();

        let output = panic::catch_unwind(AssertUnwindSafe(|| classifier.infer(&[input.values()])));

        let latency_us = start.elapsed().as_micros() as u64;
        metrics::histogram!("heartcure_inference_latency_us", "workflow" => workflow.name())
            .record(latency_us as f64);

        let labels = match output {
            Ok(Ok(labels)) => labels,
            Ok(Err(Error::Inference(msg))) => return Err(Error::Inference(msg)),
            Ok(Err(e)) => return Err(Error::inference(e.to_string())),
            Err(payload) => {
                return Err(Error::inference(format!(
                    "classifier '{}' panicked: {}",
                    classifier.name(),
                    panic_message(payload.as_ref())
                )))
            }
        };

        let prediction = labels
            .first()
            .copied()
            .ok_or_else(|| Error::inference("classifier returned no prediction"))?;

        let diagnosis = Diagnosis::from_prediction(workflow, prediction);
        debug!(
            workflow = %workflow,
            prediction,
            outcome = diagnosis.outcome.as_str(),
            latency_us,
            "prediction complete"
        );

        Ok(diagnosis)
    }
}

fn record(workflow: Workflow, result: &Result<Diagnosis>) {
    match result {
        Ok(diagnosis) => {
            metrics::counter!(
                "heartcure_predictions_total",
                "workflow" => workflow.name(),
                "outcome" => diagnosis.outcome.as_str()
            )
            .increment(1);
        }
        Err(e) => {
            if matches!(e, Error::Inference(_)) {
                error!(workflow = %workflow, "Prediction failed: {}", e);
            } else {
                warn!(workflow = %workflow, "Prediction rejected: {}", e);
            }
            metrics::counter!(
                "heartcure_prediction_errors_total",
                "workflow" => workflow.name(),
                "kind" => e.kind()
            )
            .increment(1);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
