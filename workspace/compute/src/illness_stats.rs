//! Descriptive statistics over the illness table for the chart reporter.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use common::{AgeLevelCrosstab, CategoryCount, DailyCount, HistogramBin, IllnessReport};
use model::entities::IllnessRecord;
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// Number of equal-width bins of the age histogram.
pub const AGE_HISTOGRAM_BINS: usize = 10;

/// Aggregates the illness records into the five chart datasets.
#[instrument(skip(records), fields(records = records.len()))]
pub fn summarize(records: &[IllnessRecord]) -> Result<IllnessReport> {
    if records.is_empty() {
        return Err(ComputeError::EmptyDataset(
            "the illness table has no rows to chart".to_string(),
        ));
    }

    let ages: Vec<i64> = records.iter().map(|r| r.age).collect();
    let report = IllnessReport {
        sample_count: records.len(),
        age_histogram: age_histogram(&ages, AGE_HISTOGRAM_BINS),
        level_counts: level_counts(records),
        intensity_counts: intensity_counts(records),
        daily_counts: daily_counts(records),
        age_by_level: age_by_level(records),
    };

    debug!(
        "Summarized {} records: {} intensities, {} days, {} distinct ages",
        report.sample_count,
        report.intensity_counts.len(),
        report.daily_counts.len(),
        report.age_by_level.ages.len()
    );
    Ok(report)
}

/// Equal-width histogram between the smallest and largest age.
///
/// A constant age is spread over a unit-wide range around it.
pub fn age_histogram(ages: &[i64], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (ages.iter().min(), ages.iter().max()) else {
        return Vec::new();
    };
    let (lower, upper) = if min == max {
        (min as f64 - 0.5, max as f64 + 0.5)
    } else {
        (min as f64, max as f64)
    };
    let width = (upper - lower) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &age in ages {
        let index = (((age as f64) - lower) / width).floor() as usize;
        counts[index.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lower + width * i as f64,
            upper: lower + width * (i + 1) as f64,
            count,
        })
        .collect()
}

fn level_counts(records: &[IllnessRecord]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.illness_level.value()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(level, count)| CategoryCount {
            label: level.to_string(),
            count,
        })
        .collect()
}

fn intensity_counts(records: &[IllnessRecord]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.symptom_intensity.as_str()).or_insert(0) += 1;
    }

    let mut sorted: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    sorted
}

fn daily_counts(records: &[IllnessRecord]) -> Vec<DailyCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.date).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

fn age_by_level(records: &[IllnessRecord]) -> AgeLevelCrosstab {
    let ages: Vec<i64> = records
        .iter()
        .map(|r| r.age)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let levels: Vec<u8> = records
        .iter()
        .map(|r| r.illness_level.value())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut counts = vec![vec![0usize; levels.len()]; ages.len()];
    for record in records {
        // Both lookups succeed: the axes were built from these records.
        if let (Ok(row), Ok(column)) = (
            ages.binary_search(&record.age),
            levels.binary_search(&record.illness_level.value()),
        ) {
            counts[row][column] += 1;
        }
    }

    AgeLevelCrosstab {
        ages,
        levels,
        counts,
    }
}
