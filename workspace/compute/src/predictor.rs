//! Illness level prediction from age and symptom severity.
//!
//! Fitting partitions the training set into a training split and a held-out
//! split, grows a decision tree on the former and scores it on the latter.
//! The held-out accuracy is only reported; it never changes the prediction.

pub mod split;
pub mod tree;

use std::collections::BTreeSet;

use model::entities::{IllnessLevel, IllnessSample};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{ComputeError, Result};
use split::train_test_split;
use tree::{DecisionTree, FEATURE_COUNT, LabeledSample};

/// Predictor inputs for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub age: f64,
    pub symptom_severity: f64,
}

impl Features {
    pub fn new(age: i64, symptom_severity: f64) -> Self {
        Self {
            age: age as f64,
            symptom_severity,
        }
    }

    /// Rejects NaN and infinite values, which have no place in a threshold order.
    pub fn validate(&self) -> Result<()> {
        if self.age.is_finite() && self.symptom_severity.is_finite() {
            Ok(())
        } else {
            Err(ComputeError::InvalidFeature(format!(
                "age {} and symptom severity {} must be finite",
                self.age, self.symptom_severity
            )))
        }
    }

    fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [self.age, self.symptom_severity]
    }
}

impl From<&IllnessSample> for Features {
    fn from(sample: &IllnessSample) -> Self {
        Self::new(sample.age, sample.symptom_severity)
    }
}

/// Settings controlling how the training set is partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Seed of the shuffle that selects the held-out rows.
    pub seed: u64,
    /// Fraction of rows held out for validation, in `[0, 1)`.
    pub test_size: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_size: 0.2,
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(ComputeError::InvalidConfig(format!(
                "test_size must be in [0, 1), got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

/// Anything that maps features to an illness level.
pub trait IllnessClassifier {
    fn predict(&self, features: &Features) -> IllnessLevel;
}

/// Outcome of scoring a fitted model on the held-out split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub training_samples: usize,
    pub holdout_samples: usize,
    /// Fraction of held-out rows predicted correctly; `None` without held-out rows.
    pub holdout_accuracy: Option<f64>,
}

/// A decision tree trained on one training set.
#[derive(Debug, Clone)]
pub struct FittedModel {
    tree: DecisionTree,
    validation: ValidationReport,
}

impl FittedModel {
    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }
}

impl IllnessClassifier for FittedModel {
    fn predict(&self, features: &Features) -> IllnessLevel {
        self.tree.predict(&features.as_array())
    }
}

/// Trains a model on `training_set`.
///
/// Fails with `InsufficientTrainingData` when fewer than two distinct illness
/// levels are present, and with `InvalidFeature` when any sample holds a
/// non-finite feature.
#[instrument(skip(training_set), fields(samples = training_set.len()))]
pub fn fit(training_set: &[IllnessSample], config: &PredictorConfig) -> Result<FittedModel> {
    config.validate()?;
    for sample in training_set {
        Features::from(sample).validate()?;
    }

    let distinct_levels = training_set
        .iter()
        .map(|sample| sample.illness_level)
        .collect::<BTreeSet<_>>()
        .len();
    if distinct_levels < 2 {
        return Err(ComputeError::InsufficientTrainingData { distinct_levels });
    }

    let split = train_test_split(training_set.len(), config.test_size, config.seed);
    debug!(
        "Split {} samples into {} training and {} held-out rows",
        training_set.len(),
        split.train.len(),
        split.test.len()
    );

    let labeled: Vec<LabeledSample> = split
        .train
        .iter()
        .map(|&i| labeled_sample(&training_set[i]))
        .collect();
    let tree = DecisionTree::fit(&labeled)?;

    let holdout_accuracy = if split.test.is_empty() {
        None
    } else {
        let correct = split
            .test
            .iter()
            .map(|&i| &training_set[i])
            .filter(|sample| tree.predict(&Features::from(*sample).as_array()) == sample.illness_level)
            .count();
        Some(correct as f64 / split.test.len() as f64)
    };

    let validation = ValidationReport {
        training_samples: split.train.len(),
        holdout_samples: split.test.len(),
        holdout_accuracy,
    };
    info!(
        depth = tree.depth(),
        leaves = tree.leaf_count(),
        accuracy = ?validation.holdout_accuracy,
        "Fitted illness level model"
    );

    Ok(FittedModel { tree, validation })
}

/// Fits a fresh model on `training_set` and predicts one query.
///
/// Nothing is cached between calls.
pub fn predict(
    age: i64,
    symptom_severity: f64,
    training_set: &[IllnessSample],
    config: &PredictorConfig,
) -> Result<IllnessLevel> {
    let features = Features::new(age, symptom_severity);
    features.validate()?;
    let model = fit(training_set, config)?;
    let level = model.predict(&features);
    debug!(age, symptom_severity, level = %level, "Predicted illness level");
    Ok(level)
}

fn labeled_sample(sample: &IllnessSample) -> LabeledSample {
    (Features::from(sample).as_array(), sample.illness_level)
}
