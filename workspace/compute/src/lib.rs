pub mod age;
pub mod error;
pub mod illness_stats;
pub mod predictor;

use model::entities::{IllnessLevel, IllnessSample};

use predictor::PredictorConfig;

/// Predicts the illness level for a symptom severity at the age implied by
/// `date_of_birth` on `today`.
///
/// This is the path the symptom checker takes for every query: the model is
/// retrained from `training_set` on each call.
pub fn predict_for_date_of_birth(
    date_of_birth: &str,
    today: chrono::NaiveDate,
    symptom_severity: f64,
    training_set: &[IllnessSample],
    config: &PredictorConfig,
) -> error::Result<(i64, IllnessLevel)> {
    let dob = age::parse_date_of_birth(date_of_birth)?;
    let age = age::calculate_age(dob, today);
    let level = predictor::predict(age, symptom_severity, training_set, config)?;
    Ok((age, level))
}
