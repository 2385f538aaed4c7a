//! Display strings for diagnoses and errors

use heartcure_core::{Diagnosis, Domain, Outcome, WorkflowDescriptor};
use std::fmt::{Display, Write};

/// Render a diagnosis for display
pub fn render_diagnosis(diagnosis: &Diagnosis) -> String {
    match diagnosis.outcome {
        Outcome::Positive => format!("📢 {}", diagnosis.label),
        Outcome::Negative => format!("🎉 {}", diagnosis.label),
    }
}

/// Render an error for display
pub fn render_error(error: &impl Display) -> String {
    format!("⚠️ An error occurred: {}", error)
}

/// Render a workflow's fields as a plain-text table
pub fn render_workflow(descriptor: &WorkflowDescriptor) -> String {
    let mut out = format!("{} ({})\n", descriptor.title, descriptor.workflow);

    for (i, field) in descriptor.fields.iter().enumerate() {
        let domain = match field.domain {
            Domain::Enumerated { values } => format!("one of {:?}", values),
            Domain::Range { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("{} to {}", min, max),
                (Some(min), None) => format!(">= {}", min),
                (None, Some(max)) => format!("<= {}", max),
                (None, None) => "any".to_string(),
            },
            Domain::Unbounded => "any".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:>2}. {:<26} {:<8} {}",
            i + 1,
            field.key,
            format!("{:?}", field.value_type).to_lowercase(),
            domain
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartcure_core::{describe, Error, Workflow};

    #[test]
    fn test_render_diagnosis() {
        let positive = Diagnosis::from_prediction(Workflow::Diabetes, 1);
        assert_eq!(render_diagnosis(&positive), "📢 The person is diabetic");

        let negative = Diagnosis::from_prediction(Workflow::HeartDisease, 0);
        assert_eq!(
            render_diagnosis(&negative),
            "🎉 The person does not have heart disease"
        );
    }

    #[test]
    fn test_render_error() {
        let err = Error::inference("model exploded");
        assert_eq!(
            render_error(&err),
            "⚠️ An error occurred: inference error: model exploded"
        );
    }

    #[test]
    fn test_render_workflow() {
        let table = render_workflow(describe(Workflow::HeartDisease));
        assert!(table.starts_with("Heart Disease Prediction (heart_disease)"));
        assert!(table.contains("sex"));
        assert!(table.contains("one of [0, 1]"));
        assert!(table.contains("0 to 4"));
        assert_eq!(table.lines().count(), 14);
    }
}
