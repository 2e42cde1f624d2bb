//! Report types shared between the aggregation code and the chart renderer.
//! They carry plain numbers and labels only, so a renderer (or a JSON dump)
//! needs no knowledge of how the illness table was loaded.

mod report;

pub use report::{AgeLevelCrosstab, CategoryCount, DailyCount, HistogramBin, IllnessReport};
