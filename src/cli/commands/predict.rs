use anyhow::Result;
use compute::predictor::{Features, IllnessClassifier, ValidationReport, fit};
use model::IllnessTable;
use serde::Serialize;
use tracing::{debug, error, info, trace};

use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct PredictionOutput<'a> {
    age: i64,
    symptom_severity: f64,
    illness_level: u8,
    validation: &'a ValidationReport,
}

/// One-shot prediction against the configured illness table.
pub fn predict(config: &AppConfig, age: i64, severity: f64, json: bool) -> Result<()> {
    trace!("Entering predict function");
    info!("Predicting illness level for age {} and severity {}", age, severity);
    debug!("Illness file: {}", config.illness_file.display());

    let features = Features::new(age, severity);
    if let Err(e) = features.validate() {
        error!("Rejected prediction query: {}", e);
        return Err(e.into());
    }

    let training_set = match IllnessTable::load(&config.illness_file).and_then(|t| t.training_set()) {
        Ok(samples) => samples,
        Err(e) => {
            error!(
                "Failed to load training data from '{}': {}",
                config.illness_file.display(),
                e
            );
            return Err(e.into());
        }
    };

    let fitted = match fit(&training_set, &config.model) {
        Ok(fitted) => fitted,
        Err(e) => {
            error!("Failed to train the illness level model: {}", e);
            return Err(e.into());
        }
    };
    let level = fitted.predict(&features);
    debug!(level = %level, "Prediction complete");

    if json {
        let output = PredictionOutput {
            age,
            symptom_severity: severity,
            illness_level: level.value(),
            validation: fitted.validation(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Predicted illness level: {}/5", level);
        println!("(1 = least severe, 5 = most severe)");
        if let Some(accuracy) = fitted.validation().holdout_accuracy {
            println!(
                "Held-out accuracy: {:.1}% on {} rows",
                accuracy * 100.0,
                fitted.validation().holdout_samples
            );
        }
    }

    trace!("predict function completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use compute::error::ComputeError;

    #[test]
    fn test_non_finite_severity_is_rejected_before_loading() {
        // A missing file would fail later; validation comes first.
        let config = AppConfig {
            illness_file: "does/not/exist.csv".into(),
            ..AppConfig::default()
        };
        for severity in [f64::NAN, f64::INFINITY] {
            let error = predict(&config, 40, severity, false).unwrap_err();
            assert!(matches!(
                error.downcast_ref::<ComputeError>(),
                Some(ComputeError::InvalidFeature(_))
            ));
        }
    }
}
