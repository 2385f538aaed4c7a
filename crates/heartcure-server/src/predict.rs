//! One-shot prediction for the `predict` subcommand

use crate::presenter;
use heartcure_classifiers::PredictionDispatcher;
use heartcure_core::{describe, RawValue, Workflow};
use std::collections::HashMap;
use std::io::{self, Write};

/// Run a single prediction and print the outcome
///
/// The page title and diagnosis go to `out`, a rendered error to `err`.
/// Returns `false` when the prediction was rejected or failed.
pub fn run_predict(
    dispatcher: &PredictionDispatcher,
    workflow: Workflow,
    values: &[(String, String)],
    ordered: Option<&[String]>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    writeln!(out, "{}", describe(workflow).title)?;

    let result = match ordered {
        Some(ordered) => {
            let raw: Vec<Option<RawValue>> = ordered
                .iter()
                .map(|v| Some(RawValue::from(v.as_str())))
                .collect();
            dispatcher.predict_ordered(workflow, &raw)
        }
        None => {
            let named: HashMap<String, RawValue> = values
                .iter()
                .map(|(k, v)| (k.clone(), RawValue::from(v.as_str())))
                .collect();
            dispatcher.predict_named(workflow, &named)
        }
    };

    match result {
        Ok(diagnosis) => {
            writeln!(out, "{}", presenter::render_diagnosis(&diagnosis))?;
            Ok(true)
        }
        Err(e) => {
            writeln!(err, "{}", presenter::render_error(&e))?;
            Ok(false)
        }
    }
}
