use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One bar of a histogram over `[lower, upper)` (the last bin is closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Number of rows carrying a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Number of symptoms reported on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Contingency table of ages (rows) against illness levels (columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeLevelCrosstab {
    pub ages: Vec<i64>,
    pub levels: Vec<u8>,
    /// `counts[row][column]` for `ages[row]` and `levels[column]`.
    pub counts: Vec<Vec<usize>>,
}

impl AgeLevelCrosstab {
    pub fn max_count(&self) -> usize {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Everything the five descriptive charts need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllnessReport {
    pub sample_count: usize,
    pub age_histogram: Vec<HistogramBin>,
    /// Sorted by illness level.
    pub level_counts: Vec<CategoryCount>,
    /// Sorted by descending count.
    pub intensity_counts: Vec<CategoryCount>,
    /// Sorted by date.
    pub daily_counts: Vec<DailyCount>,
    pub age_by_level: AgeLevelCrosstab,
}

impl IllnessReport {
    /// Share of each intensity label, in percent.
    pub fn intensity_percentages(&self) -> Vec<(String, f64)> {
        let total: usize = self.intensity_counts.iter().map(|c| c.count).sum();
        if total == 0 {
            return Vec::new();
        }
        self.intensity_counts
            .iter()
            .map(|c| (c.label.clone(), c.count as f64 * 100.0 / total as f64))
            .collect()
    }
}
