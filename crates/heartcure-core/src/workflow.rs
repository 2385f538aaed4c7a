//! Workflow descriptor table
//!
//! One entry per supported disease workflow. The field order of each
//! descriptor is the feature order the workflow's classifier was trained on;
//! both the input collector and the dispatcher read it from here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported disease prediction workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    Diabetes,
    HeartDisease,
    Parkinsons,
}

impl Workflow {
    /// Every workflow, in menu order
    pub const ALL: [Workflow; 3] = [Self::Diabetes, Self::HeartDisease, Self::Parkinsons];

    /// Unique identifier, also used for artifact file names
    pub fn name(self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes",
            Self::HeartDisease => "heart_disease",
            Self::Parkinsons => "parkinsons",
        }
    }

    /// Stable position of this workflow in [`Workflow::ALL`]
    pub fn index(self) -> usize {
        match self {
            Self::Diabetes => 0,
            Self::HeartDisease => 1,
            Self::Parkinsons => 2,
        }
    }

    /// Descriptor for this workflow
    pub fn descriptor(self) -> &'static WorkflowDescriptor {
        describe(self)
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Workflow {
    type Err = Error;

    /// Accepts identifiers (`heart_disease`), kebab case, and the menu
    /// titles ("Parkinson's Prediction").
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != '\'')
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        let normalized = normalized
            .strip_suffix("_prediction")
            .unwrap_or(&normalized);

        match normalized {
            "diabetes" => Ok(Self::Diabetes),
            "heart_disease" | "heartdisease" | "heart" => Ok(Self::HeartDisease),
            "parkinsons" | "parkinson" => Ok(Self::Parkinsons),
            _ => Err(Error::UnknownWorkflow(s.to_string())),
        }
    }
}

/// Numeric type a field is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Integer,
    Real,
}

/// Legal values for a field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Domain {
    /// Selector-style field; only the listed values are accepted
    Enumerated { values: &'static [i64] },

    /// Numeric field with optional inclusive bounds
    Range { min: Option<f64>, max: Option<f64> },

    /// Any finite value
    Unbounded,
}

/// One input field of a workflow
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Feature name as used by the training data
    pub key: &'static str,

    /// Prompt shown to the user
    pub label: &'static str,

    pub value_type: ValueType,

    pub domain: Domain,
}

impl FieldDescriptor {
    const fn integer(key: &'static str, label: &'static str, min: f64) -> Self {
        Self {
            key,
            label,
            value_type: ValueType::Integer,
            domain: Domain::Range {
                min: Some(min),
                max: None,
            },
        }
    }

    const fn bounded_integer(key: &'static str, label: &'static str, min: f64, max: f64) -> Self {
        Self {
            key,
            label,
            value_type: ValueType::Integer,
            domain: Domain::Range {
                min: Some(min),
                max: Some(max),
            },
        }
    }

    const fn real(key: &'static str, label: &'static str, min: f64) -> Self {
        Self {
            key,
            label,
            value_type: ValueType::Real,
            domain: Domain::Range {
                min: Some(min),
                max: None,
            },
        }
    }

    const fn unbounded(key: &'static str) -> Self {
        Self {
            key,
            label: key,
            value_type: ValueType::Real,
            domain: Domain::Unbounded,
        }
    }

    const fn select(key: &'static str, label: &'static str, values: &'static [i64]) -> Self {
        Self {
            key,
            label,
            value_type: ValueType::Integer,
            domain: Domain::Enumerated { values },
        }
    }

    /// Value used when the field is left unset
    pub fn default_value(&self) -> f64 {
        match self.domain {
            Domain::Enumerated { values } => values.first().copied().unwrap_or(0) as f64,
            Domain::Range { min: Some(min), .. } => min,
            Domain::Range { min: None, .. } | Domain::Unbounded => 0.0,
        }
    }
}

/// Static metadata for a workflow
#[derive(Debug, Serialize)]
pub struct WorkflowDescriptor {
    pub workflow: Workflow,

    /// Page title
    pub title: &'static str,

    /// Fields in classifier feature order
    pub fields: &'static [FieldDescriptor],

    pub positive_label: &'static str,
    pub negative_label: &'static str,
}

impl WorkflowDescriptor {
    /// Number of features the classifier expects
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Position of the field with the given key
    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    /// Field with the given key
    pub fn field(&self, key: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Display label for a classifier output
    pub fn label_for(&self, positive: bool) -> &'static str {
        if positive {
            self.positive_label
        } else {
            self.negative_label
        }
    }
}

const BINARY: &[i64] = &[0, 1];
const ZERO_TO_TWO: &[i64] = &[0, 1, 2];
const ZERO_TO_THREE: &[i64] = &[0, 1, 2, 3];

const DIABETES_FIELDS: [FieldDescriptor; 8] = [
    FieldDescriptor::integer("Pregnancies", "Number of Pregnancies", 0.0),
    FieldDescriptor::real("Glucose", "Glucose Level", 0.0),
    FieldDescriptor::real("BloodPressure", "Blood Pressure Value", 0.0),
    FieldDescriptor::real("SkinThickness", "Skin Thickness Value", 0.0),
    FieldDescriptor::real("Insulin", "Insulin Level", 0.0),
    FieldDescriptor::real("BMI", "BMI Value", 0.0),
    FieldDescriptor::real(
        "DiabetesPedigreeFunction",
        "Diabetes Pedigree Function Value",
        0.0,
    ),
    FieldDescriptor::integer("Age", "Age of the Person", 0.0),
];

const HEART_DISEASE_FIELDS: [FieldDescriptor; 13] = [
    FieldDescriptor::integer("age", "Age", 0.0),
    FieldDescriptor::select("sex", "Sex (1 = Male, 0 = Female)", BINARY),
    FieldDescriptor::select("cp", "Chest Pain Type (0-3)", ZERO_TO_THREE),
    FieldDescriptor::real("trestbps", "Resting Blood Pressure", 0.0),
    FieldDescriptor::real("chol", "Serum Cholesterol in mg/dl", 0.0),
    FieldDescriptor::select(
        "fbs",
        "Fasting Blood Sugar > 120 mg/dl (1 = True, 0 = False)",
        BINARY,
    ),
    FieldDescriptor::select("restecg", "Resting Electrocardiographic Results (0-2)", ZERO_TO_TWO),
    FieldDescriptor::real("thalach", "Maximum Heart Rate Achieved", 0.0),
    FieldDescriptor::select("exang", "Exercise-Induced Angina (1 = Yes, 0 = No)", BINARY),
    FieldDescriptor::real("oldpeak", "ST Depression Induced by Exercise", 0.0),
    FieldDescriptor::select("slope", "Slope of the Peak Exercise ST Segment (0-2)", ZERO_TO_TWO),
    FieldDescriptor::bounded_integer("ca", "Number of Major Vessels (0-4)", 0.0, 4.0),
    FieldDescriptor::select(
        "thal",
        "Thal (0 = Normal, 1 = Fixed Defect, 2 = Reversible Defect)",
        ZERO_TO_TWO,
    ),
];

const PARKINSONS_FIELDS: [FieldDescriptor; 22] = [
    FieldDescriptor::unbounded("MDVP:Fo(Hz)"),
    FieldDescriptor::unbounded("MDVP:Fhi(Hz)"),
    FieldDescriptor::unbounded("MDVP:Flo(Hz)"),
    FieldDescriptor::unbounded("MDVP:Jitter(%)"),
    FieldDescriptor::unbounded("MDVP:Jitter(Abs)"),
    FieldDescriptor::unbounded("MDVP:RAP"),
    FieldDescriptor::unbounded("MDVP:PPQ"),
    FieldDescriptor::unbounded("Jitter:DDP"),
    FieldDescriptor::unbounded("MDVP:Shimmer"),
    FieldDescriptor::unbounded("MDVP:Shimmer(dB)"),
    FieldDescriptor::unbounded("Shimmer:APQ3"),
    FieldDescriptor::unbounded("Shimmer:APQ5"),
    FieldDescriptor::unbounded("MDVP:APQ"),
    FieldDescriptor::unbounded("Shimmer:DDA"),
    FieldDescriptor::unbounded("NHR"),
    FieldDescriptor::unbounded("HNR"),
    FieldDescriptor::unbounded("RPDE"),
    FieldDescriptor::unbounded("DFA"),
    FieldDescriptor::unbounded("spread1"),
    FieldDescriptor::unbounded("spread2"),
    FieldDescriptor::unbounded("D2"),
    FieldDescriptor::unbounded("PPE"),
];

static DIABETES: WorkflowDescriptor = WorkflowDescriptor {
    workflow: Workflow::Diabetes,
    title: "Diabetes Prediction",
    fields: &DIABETES_FIELDS,
    positive_label: "The person is diabetic",
    negative_label: "The person is not diabetic",
};

static HEART_DISEASE: WorkflowDescriptor = WorkflowDescriptor {
    workflow: Workflow::HeartDisease,
    title: "Heart Disease Prediction",
    fields: &HEART_DISEASE_FIELDS,
    positive_label: "The person has heart disease",
    negative_label: "The person does not have heart disease",
};

static PARKINSONS: WorkflowDescriptor = WorkflowDescriptor {
    workflow: Workflow::Parkinsons,
    title: "Parkinson's Prediction",
    fields: &PARKINSONS_FIELDS,
    positive_label: "The person has Parkinson's disease",
    negative_label: "The person does not have Parkinson's disease",
};

/// Look up the descriptor for a workflow
pub fn describe(workflow: Workflow) -> &'static WorkflowDescriptor {
    match workflow {
        Workflow::Diabetes => &DIABETES,
        Workflow::HeartDisease => &HEART_DISEASE,
        Workflow::Parkinsons => &PARKINSONS,
    }
}

/// Descriptors for every workflow, in menu order
pub fn descriptors() -> impl Iterator<Item = &'static WorkflowDescriptor> {
    Workflow::ALL.into_iter().map(describe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_counts() {
        assert_eq!(describe(Workflow::Diabetes).arity(), 8);
        assert_eq!(describe(Workflow::HeartDisease).arity(), 13);
        assert_eq!(describe(Workflow::Parkinsons).arity(), 22);
    }

    #[test]
    fn test_field_keys_unique() {
        for descriptor in descriptors() {
            let keys: HashSet<_> = descriptor.fields.iter().map(|f| f.key).collect();
            assert_eq!(keys.len(), descriptor.arity(), "{}", descriptor.workflow);
        }
    }

    #[test]
    fn test_descriptor_matches_workflow() {
        for workflow in Workflow::ALL {
            assert_eq!(describe(workflow).workflow, workflow);
            assert_eq!(Workflow::ALL[workflow.index()], workflow);
        }
    }

    #[test]
    fn test_heart_disease_field_order() {
        let keys: Vec<_> = describe(Workflow::HeartDisease)
            .fields
            .iter()
            .map(|f| f.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
                "oldpeak", "slope", "ca", "thal"
            ]
        );
    }

    #[test]
    fn test_position_lookup() {
        let descriptor = describe(Workflow::Diabetes);
        assert_eq!(descriptor.position("Pregnancies"), Some(0));
        assert_eq!(descriptor.position("Age"), Some(7));
        assert_eq!(descriptor.position("age"), None);

        let parkinsons = describe(Workflow::Parkinsons);
        assert_eq!(parkinsons.position("PPE"), Some(21));
    }

    #[test]
    fn test_default_values() {
        let heart = describe(Workflow::HeartDisease);
        assert_eq!(heart.field("sex").unwrap().default_value(), 0.0);
        assert_eq!(heart.field("ca").unwrap().default_value(), 0.0);

        for field in describe(Workflow::Parkinsons).fields {
            assert_eq!(field.default_value(), 0.0);
            assert_eq!(field.domain, Domain::Unbounded);
        }
    }

    #[test]
    fn test_parse_workflow() {
        assert_eq!("diabetes".parse::<Workflow>().unwrap(), Workflow::Diabetes);
        assert_eq!("heart-disease".parse::<Workflow>().unwrap(), Workflow::HeartDisease);
        assert_eq!("HEART_DISEASE".parse::<Workflow>().unwrap(), Workflow::HeartDisease);
        assert_eq!(
            "Parkinson's Prediction".parse::<Workflow>().unwrap(),
            Workflow::Parkinsons
        );
        assert_eq!(
            "Heart Disease Prediction".parse::<Workflow>().unwrap(),
            Workflow::HeartDisease
        );

        let err = "cancer".parse::<Workflow>().unwrap_err();
        assert!(matches!(err, Error::UnknownWorkflow(ref s) if s == "cancer"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for workflow in Workflow::ALL {
            assert_eq!(workflow.to_string().parse::<Workflow>().unwrap(), workflow);
        }
    }

    #[test]
    fn test_labels() {
        let descriptor = describe(Workflow::Diabetes);
        assert_eq!(descriptor.label_for(true), "The person is diabetic");
        assert_eq!(descriptor.label_for(false), "The person is not diabetic");
    }
}
