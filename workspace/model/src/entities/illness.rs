use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Illness severity label, 1 (least severe) to 5 (most severe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct IllnessLevel(u8);

impl IllnessLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates a level, returning `None` outside `1..=5`.
    pub fn new(level: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&level) {
            Some(Self(level as u8))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for IllnessLevel {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("illness level {} is outside 1..=5", value))
    }
}

impl From<IllnessLevel> for i64 {
    fn from(level: IllnessLevel) -> Self {
        i64::from(level.0)
    }
}

impl fmt::Display for IllnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One historical observation as seen by the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IllnessSample {
    pub age: i64,
    pub symptom_severity: f64,
    pub illness_level: IllnessLevel,
}

impl IllnessSample {
    pub fn new(age: i64, symptom_severity: f64, illness_level: IllnessLevel) -> Self {
        Self {
            age,
            symptom_severity,
            illness_level,
        }
    }
}

/// One historical observation as seen by the chart reporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllnessRecord {
    pub date: NaiveDate,
    pub symptom_name: String,
    pub symptom_intensity: String,
    pub age: i64,
    pub illness_level: IllnessLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illness_level_bounds() {
        assert!(IllnessLevel::new(0).is_none());
        assert!(IllnessLevel::new(6).is_none());
        assert_eq!(IllnessLevel::new(1).map(IllnessLevel::value), Some(1));
        assert_eq!(IllnessLevel::new(5).map(IllnessLevel::value), Some(5));
    }

    #[test]
    fn test_illness_level_deserialization_rejects_out_of_range() {
        let level: IllnessLevel = serde_json::from_str("3").unwrap();
        assert_eq!(level.value(), 3);
        assert!(serde_json::from_str::<IllnessLevel>("9").is_err());
    }
}
