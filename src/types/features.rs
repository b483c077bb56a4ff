//! Patient feature data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature names in the column order the classifier was trained with.
pub const FEATURE_NAMES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// A single user-supplied value before numeric coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Flag(bool),
    Text(String),
    /// Arrays, objects and anything else a JSON client might send
    Other(serde_json::Value),
}

impl RawValue {
    /// Coerce to a number. Anything that is not numeric-like becomes 0.
    pub fn coerce(&self) -> f64 {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Flag(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            RawValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            RawValue::Other(_) => 0.0,
        };

        if value.is_nan() {
            0.0
        } else {
            value
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Unnormalized patient inputs as received from the form or the JSON API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeatures {
    #[serde(rename = "Pregnancies", default)]
    pub pregnancies: Option<RawValue>,

    #[serde(rename = "Glucose", default)]
    pub glucose: Option<RawValue>,

    #[serde(rename = "BloodPressure", default)]
    pub blood_pressure: Option<RawValue>,

    #[serde(rename = "SkinThickness", default)]
    pub skin_thickness: Option<RawValue>,

    #[serde(rename = "Insulin", default)]
    pub insulin: Option<RawValue>,

    #[serde(rename = "BMI", default)]
    pub bmi: Option<RawValue>,

    #[serde(rename = "DiabetesPedigreeFunction", default)]
    pub diabetes_pedigree_function: Option<RawValue>,

    #[serde(rename = "Age", default)]
    pub age: Option<RawValue>,
}

impl RawFeatures {
    /// Build from plain numbers given in feature order
    pub fn from_numbers(values: [f64; 8]) -> Self {
        let mut raw = Self::default();
        for (name, value) in FEATURE_NAMES.iter().zip(values) {
            raw.set(name, RawValue::Number(value));
        }
        raw
    }

    /// Build from `name => value` pairs in any order. Unknown names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        let mut raw = Self::default();
        for (name, value) in pairs {
            raw.set(name.as_ref(), value.into());
        }
        raw
    }

    /// Set a field by feature name. Returns false for an unknown name.
    pub fn set(&mut self, name: &str, value: RawValue) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Get a field by feature name
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        match name {
            "Pregnancies" => self.pregnancies.as_ref(),
            "Glucose" => self.glucose.as_ref(),
            "BloodPressure" => self.blood_pressure.as_ref(),
            "SkinThickness" => self.skin_thickness.as_ref(),
            "Insulin" => self.insulin.as_ref(),
            "BMI" => self.bmi.as_ref(),
            "DiabetesPedigreeFunction" => self.diabetes_pedigree_function.as_ref(),
            "Age" => self.age.as_ref(),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<RawValue>> {
        match name {
            "Pregnancies" => Some(&mut self.pregnancies),
            "Glucose" => Some(&mut self.glucose),
            "BloodPressure" => Some(&mut self.blood_pressure),
            "SkinThickness" => Some(&mut self.skin_thickness),
            "Insulin" => Some(&mut self.insulin),
            "BMI" => Some(&mut self.bmi),
            "DiabetesPedigreeFunction" => Some(&mut self.diabetes_pedigree_function),
            "Age" => Some(&mut self.age),
            _ => None,
        }
    }
}

/// Normalized single-row model input.
///
/// Field order matches [`FEATURE_NAMES`]; serialization keeps that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "Pregnancies")]
    pub pregnancies: f64,

    #[serde(rename = "Glucose")]
    pub glucose: f64,

    #[serde(rename = "BloodPressure")]
    pub blood_pressure: f64,

    #[serde(rename = "SkinThickness")]
    pub skin_thickness: f64,

    #[serde(rename = "Insulin")]
    pub insulin: f64,

    #[serde(rename = "BMI")]
    pub bmi: f64,

    #[serde(rename = "DiabetesPedigreeFunction")]
    pub diabetes_pedigree_function: f64,

    #[serde(rename = "Age")]
    pub age: f64,
}

impl FeatureVector {
    /// Values in training column order
    pub fn values(&self) -> [f64; 8] {
        [
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ]
    }

    /// Row as fed to the ONNX graph (`float_input` is f32)
    pub fn to_row(&self) -> Vec<f32> {
        self.values().iter().map(|&v| v as f32).collect()
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in FEATURE_NAMES.iter().zip(self.values()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", name, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_text() {
        assert_eq!(RawValue::from(" 120 ").coerce(), 120.0);
        assert_eq!(RawValue::from("30.5").coerce(), 30.5);
        assert_eq!(RawValue::from("abc").coerce(), 0.0);
        assert_eq!(RawValue::from("").coerce(), 0.0);
        assert_eq!(RawValue::from("NaN").coerce(), 0.0);
        assert!(RawValue::from("inf").coerce().is_infinite());
    }

    #[test]
    fn test_coerce_is_idempotent() {
        for v in [0.0, 2.0, -1.5, 0.627, 1e6] {
            let once = RawValue::Number(v).coerce();
            let twice = RawValue::Number(once).coerce();
            assert_eq!(once, v);
            assert_eq!(twice, once);
        }
        assert_eq!(RawValue::Number(f64::NAN).coerce(), 0.0);
    }

    #[test]
    fn test_coerce_other_shapes() {
        assert_eq!(RawValue::Flag(true).coerce(), 1.0);
        assert_eq!(RawValue::Flag(false).coerce(), 0.0);
        assert_eq!(RawValue::Other(serde_json::json!([1, 2])).coerce(), 0.0);
    }

    #[test]
    fn test_raw_features_json() {
        let raw: RawFeatures = serde_json::from_str(
            r#"{"Age": 33, "Glucose": "120", "BMI": null, "Insulin": true, "Bogus": 1}"#,
        )
        .unwrap();

        assert_eq!(raw.age, Some(RawValue::Number(33.0)));
        assert_eq!(raw.glucose, Some(RawValue::Text("120".to_string())));
        assert_eq!(raw.bmi, None);
        assert_eq!(raw.insulin, Some(RawValue::Flag(true)));
        assert_eq!(raw.pregnancies, None);
    }

    #[test]
    fn test_from_pairs_ignores_unknown_names() {
        let raw = RawFeatures::from_pairs([("Age", "40"), ("Height", "180")]);
        assert_eq!(raw.get("Age"), Some(&RawValue::Text("40".to_string())));
        assert_eq!(raw.get("Height"), None);
    }

    #[test]
    fn test_display_echo() {
        let fv = FeatureVector {
            pregnancies: 2.0,
            glucose: 120.0,
            blood_pressure: 70.0,
            skin_thickness: 20.0,
            insulin: 79.0,
            bmi: 30.0,
            diabetes_pedigree_function: 0.5,
            age: 33.0,
        };

        assert_eq!(
            fv.to_string(),
            "{Pregnancies: 2.0, Glucose: 120.0, BloodPressure: 70.0, SkinThickness: 20.0, \
             Insulin: 79.0, BMI: 30.0, DiabetesPedigreeFunction: 0.5, Age: 33.0}"
        );
    }

    #[test]
    fn test_serialization_keeps_column_order() {
        let json = serde_json::to_string(&FeatureVector::default()).unwrap();
        let positions: Vec<usize> = FEATURE_NAMES
            .iter()
            .map(|name| json.find(&format!("\"{}\"", name)).unwrap())
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
