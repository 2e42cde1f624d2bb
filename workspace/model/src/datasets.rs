//! Loaders for the static reference tables.
//!
//! Both tables are read from disk at the point of use and never cached, so
//! edits to the CSV files are picked up by the next operation. Each consumer
//! declares the columns it needs and the schema is validated once, when the
//! consumer asks for its view of the table.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, instrument};

use crate::entities::{IllnessLevel, IllnessRecord, IllnessSample, Symptom};
use crate::error::Result;
use crate::table::CsvTable;

/// Columns of the symptom catalog.
pub const SYMPTOM_COLUMNS: [&str; 3] = ["symptom", "intensity", "severity"];

/// Illness table columns the predictor trains on.
pub const TRAINING_COLUMNS: [&str; 3] = ["age", "symptom_severity", "illness_level"];

/// Illness table columns the chart reporter needs, in the order they are checked.
pub const REPORT_COLUMNS: [&str; 5] = [
    "age",
    "illness_level",
    "symptom_intensity",
    "date",
    "symptom_name",
];

/// The catalog of symptoms a user can pick from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymptomCatalog {
    symptoms: Vec<Symptom>,
}

impl SymptomCatalog {
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let table = CsvTable::read("symptoms", path)?;
        table.require_columns(&SYMPTOM_COLUMNS)?;

        let names = table.text_column("symptom")?;
        let intensities = table.text_column("intensity")?;
        let severities = table.float_column("severity")?;

        let symptoms: Vec<Symptom> = names
            .into_iter()
            .zip(intensities)
            .zip(severities)
            .map(|((symptom, intensity), severity)| Symptom::new(symptom, intensity, severity))
            .collect();

        debug!("Loaded {} symptoms", symptoms.len());
        Ok(Self { symptoms })
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Looks up a symptom by its 1-based menu position.
    pub fn choose(&self, position: usize) -> Option<&Symptom> {
        position
            .checked_sub(1)
            .and_then(|index| self.symptoms.get(index))
    }
}

/// The historical illness table.
pub struct IllnessTable {
    table: CsvTable,
}

impl IllnessTable {
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let table = CsvTable::read("illness", path)?;
        Ok(Self { table })
    }

    /// Returns every row as a training sample.
    pub fn training_set(&self) -> Result<Vec<IllnessSample>> {
        self.table.require_columns(&TRAINING_COLUMNS)?;

        let ages = self.table.int_column("age")?;
        let severities = self.table.float_column("symptom_severity")?;
        let levels = self.illness_levels()?;

        Ok(ages
            .into_iter()
            .zip(severities)
            .zip(levels)
            .map(|((age, severity), level)| IllnessSample::new(age, severity, level))
            .collect())
    }

    /// Returns every row with the descriptive fields used for charts.
    pub fn report_records(&self) -> Result<Vec<IllnessRecord>> {
        self.table.require_columns(&REPORT_COLUMNS)?;

        let ages = self.table.int_column("age")?;
        let levels = self.illness_levels()?;
        let intensities = self.table.text_column("symptom_intensity")?;
        let names = self.table.text_column("symptom_name")?;
        let dates = self
            .table
            .text_column("date")?
            .iter()
            .enumerate()
            .map(|(row, raw)| {
                parse_date(raw).ok_or_else(|| {
                    self.table
                        .invalid(format!("row {}: cannot parse date '{}'", row + 1, raw))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut records = Vec::with_capacity(ages.len());
        for (row, date) in dates.into_iter().enumerate() {
            records.push(IllnessRecord {
                date,
                symptom_name: names[row].clone(),
                symptom_intensity: intensities[row].clone(),
                age: ages[row],
                illness_level: levels[row],
            });
        }
        Ok(records)
    }

    fn illness_levels(&self) -> Result<Vec<IllnessLevel>> {
        self.table
            .int_column("illness_level")?
            .into_iter()
            .enumerate()
            .map(|(row, level)| {
                IllnessLevel::new(level).ok_or_else(|| {
                    self.table.invalid(format!(
                        "row {}: illness level {} is outside 1..=5",
                        row + 1,
                        level
                    ))
                })
            })
            .collect()
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|timestamp| timestamp.date())
        })
}
