use serde::{Deserialize, Serialize};

/// A selectable symptom from the reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
    pub symptom: String,
    /// Intensity label such as "mild" or "high".
    pub intensity: String,
    /// Numeric severity score used as a predictor feature.
    pub severity: f64,
}

impl Symptom {
    pub fn new(symptom: impl Into<String>, intensity: impl Into<String>, severity: f64) -> Self {
        Self {
            symptom: symptom.into(),
            intensity: intensity.into(),
            severity,
        }
    }
}
