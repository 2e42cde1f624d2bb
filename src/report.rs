//! Chart dashboard of the illness table.
//!
//! Five views are drawn into one SVG image laid out as a 2x3 grid: the age
//! histogram, the illness level bar chart, the symptom intensity pie chart,
//! the symptoms reported per day and the age vs illness level heatmap.

use std::error::Error;
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use common::IllnessReport;
use compute::illness_stats;
use model::IllnessTable;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::AppError;

/// Pixel size of the whole dashboard.
pub const CHART_SIZE: (u32, u32) = (1800, 1000);

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
const CORAL: RGBColor = RGBColor(255, 127, 80);
const PASTEL: [RGBColor; 9] = [
    RGBColor(251, 180, 174),
    RGBColor(179, 205, 227),
    RGBColor(204, 235, 197),
    RGBColor(222, 203, 228),
    RGBColor(254, 217, 166),
    RGBColor(255, 255, 204),
    RGBColor(229, 216, 189),
    RGBColor(253, 218, 236),
    RGBColor(242, 242, 242),
];

type Panel<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type DrawResult = Result<(), Box<dyn Error>>;

/// Loads the illness table and aggregates it for the charts.
///
/// Every required column is checked before anything is drawn.
pub fn build_report(illness_file: &Path) -> Result<IllnessReport, AppError> {
    let table = IllnessTable::load(illness_file)?;
    let records = table.report_records()?;
    Ok(illness_stats::summarize(&records)?)
}

/// Builds the report and writes the dashboard to `output`.
#[instrument(skip_all, fields(illness_file = %illness_file.display(), output = %output.display()))]
pub fn generate(illness_file: &Path, output: &Path) -> Result<IllnessReport, AppError> {
    let report = build_report(illness_file)?;
    render(&report, output)?;
    info!("Wrote chart dashboard for {} records", report.sample_count);
    Ok(report)
}

/// Draws the five views of `report` into an SVG file.
pub fn render(report: &IllnessReport, output: &Path) -> Result<(), AppError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    draw_dashboard(report, output).map_err(|e| AppError::Render(e.to_string()))
}

/// Hands the chart file to the platform's default viewer.
///
/// Returns whether a viewer was started; failing to start one is not an error.
pub fn try_display(path: &Path) -> bool {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };
    command.arg(path);

    match spawn_detached(command) {
        Ok(_) => {
            debug!("Opened {} in the default viewer", path.display());
            true
        }
        Err(e) => {
            warn!("Could not display {}: {}", path.display(), e);
            false
        }
    }
}

/// Starts `command` without a console and reaps it on a background thread.
fn spawn_detached(mut command: Command) -> io::Result<JoinHandle<()>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(thread::spawn(move || match child.wait() {
        Ok(status) => trace!("Viewer exited with {}", status),
        Err(e) => warn!("Failed to wait for viewer: {}", e),
    }))
}

fn draw_dashboard(report: &IllnessReport, output: &Path) -> DrawResult {
    trace!("Drawing dashboard to {}", output.display());
    let root = SVGBackend::new(output, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((2, 3));
    draw_age_histogram(&panels[0], report)?;
    draw_level_bars(&panels[1], report)?;
    draw_intensity_pie(&panels[2], report)?;
    draw_daily_counts(&panels[3], report)?;
    draw_age_level_heatmap(&panels[4], report)?;

    root.present()?;
    Ok(())
}

fn draw_age_histogram(area: &Panel<'_>, report: &IllnessReport) -> DrawResult {
    let bins = &report.age_histogram;
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Ok(());
    };

    let mut chart = ChartBuilder::on(area)
        .caption("Age Distribution", title_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(first.lower..last.upper, 0f64..axis_max(bins.iter().map(|b| b.count)))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Age")
        .y_desc("Count")
        .draw()?;

    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new([(bin.lower, 0.0), (bin.upper, bin.count as f64)], SKY_BLUE.filled())
    }))?;
    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.lower, 0.0), (bin.upper, bin.count as f64)],
            BLACK.stroke_width(1),
        )
    }))?;
    Ok(())
}

fn draw_level_bars(area: &Panel<'_>, report: &IllnessReport) -> DrawResult {
    let levels = &report.level_counts;
    let mut chart = ChartBuilder::on(area)
        .caption("Illness Level Distribution", title_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            index_axis(levels.len()),
            0f64..axis_max(levels.iter().map(|c| c.count)),
        )?;

    let label = |x: &f64| index_label(levels, *x, |c| c.label.clone());
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(levels.len())
        .x_label_formatter(&label)
        .x_desc("Illness Level (1-5)")
        .y_desc("Count")
        .draw()?;

    chart.draw_series(levels.iter().enumerate().map(|(i, level)| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, level.count as f64)], LIGHT_GREEN.filled())
    }))?;
    Ok(())
}

fn draw_intensity_pie(area: &Panel<'_>, report: &IllnessReport) -> DrawResult {
    let area = area.titled("Symptom Intensity Distribution", title_font())?;
    let (labels, sizes): (Vec<String>, Vec<f64>) =
        report.intensity_percentages().into_iter().unzip();
    if sizes.is_empty() {
        return Ok(());
    }
    let colors: Vec<RGBColor> = PASTEL.iter().copied().cycle().take(sizes.len()).collect();

    // The pie is positioned in backend pixels, not relative to the panel.
    let (left, top) = area.get_base_pixel();
    let (width, height) = area.dim_in_pixel();
    let center = (left + width as i32 / 2, top + height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(label_font());
    pie.percentages(label_font());
    area.draw(&pie)?;
    Ok(())
}

fn draw_daily_counts(area: &Panel<'_>, report: &IllnessReport) -> DrawResult {
    let days = &report.daily_counts;
    let mut chart = ChartBuilder::on(area)
        .caption("Symptoms Reported Over Time", title_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            index_axis(days.len()),
            0f64..axis_max(days.iter().map(|d| d.count)),
        )?;

    let label = |x: &f64| index_label(days, *x, |d| d.date.format("%Y-%m-%d").to_string());
    chart
        .configure_mesh()
        .x_labels(days.len().min(6))
        .x_label_formatter(&label)
        .x_desc("Date")
        .y_desc("Number of Symptoms")
        .draw()?;

    let points: Vec<(f64, f64)> = days
        .iter()
        .enumerate()
        .map(|(i, day)| (i as f64, day.count as f64))
        .collect();
    chart.draw_series(LineSeries::new(points.clone(), CORAL.stroke_width(2)))?;
    chart.draw_series(points.into_iter().map(|point| Circle::new(point, 4, CORAL.filled())))?;
    Ok(())
}

fn draw_age_level_heatmap(area: &Panel<'_>, report: &IllnessReport) -> DrawResult {
    let table = &report.age_by_level;
    let max = table.max_count().max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Age vs Illness Level", title_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(index_axis(table.levels.len()), index_axis(table.ages.len()))?;

    let level_label = |x: &f64| index_label(&table.levels, *x, |level| level.to_string());
    let age_label = |y: &f64| index_label(&table.ages, *y, |age| age.to_string());
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(table.levels.len())
        .y_labels(table.ages.len().min(20))
        .x_label_formatter(&level_label)
        .y_label_formatter(&age_label)
        .x_desc("Illness Level")
        .y_desc("Age")
        .draw()?;

    let cells: Vec<(f64, f64, usize)> = table
        .counts
        .iter()
        .enumerate()
        .flat_map(|(row, counts)| {
            counts
                .iter()
                .enumerate()
                .map(move |(column, &count)| (column as f64, row as f64, count))
        })
        .collect();

    chart.draw_series(cells.iter().map(|&(x, y, count)| {
        Rectangle::new(
            [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
            heat_color(count as f64 / max).filled(),
        )
    }))?;
    chart.draw_series(cells.iter().map(|&(x, y, count)| {
        Text::new(count.to_string(), (x - 0.05, y + 0.1), label_font())
    }))?;
    Ok(())
}

fn title_font() -> FontDesc<'static> {
    ("sans-serif", 22).into_font()
}

fn label_font() -> FontDesc<'static> {
    ("sans-serif", 13).into_font()
}

/// Upper bound of a count axis with some headroom above the tallest value.
fn axis_max(counts: impl Iterator<Item = usize>) -> f64 {
    counts.max().unwrap_or(0) as f64 * 1.15 + 1.0
}

/// Axis on which category `i` is centered at `i`.
fn index_axis(categories: usize) -> std::ops::Range<f64> {
    -0.5..(categories.max(1) as f64 - 0.5)
}

/// Tick label of an index axis; ticks between categories stay blank.
fn index_label<T>(items: &[T], x: f64, label: impl Fn(&T) -> String) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    items.get(index as usize).map(label).unwrap_or_default()
}

/// Yellow-green-blue color scale for `t` in `[0, 1]`.
fn heat_color(t: f64) -> RGBColor {
    const LOW: (f64, f64, f64) = (255.0, 255.0, 217.0);
    const MID: (f64, f64, f64) = (65.0, 182.0, 196.0);
    const HIGH: (f64, f64, f64) = (8.0, 29.0, 88.0);

    let t = t.clamp(0.0, 1.0);
    let (from, to, local) = if t < 0.5 {
        (LOW, MID, t * 2.0)
    } else {
        (MID, HIGH, (t - 0.5) * 2.0)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * local).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::{ILLNESS_CSV, write_file};

    #[test]
    fn test_generate_writes_svg_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let illness = write_file(dir.path(), "illness.csv", ILLNESS_CSV);
        let output = dir.path().join("charts").join("dashboard.svg");

        let report = generate(&illness, &output).unwrap();
        assert!(report.sample_count > 0);

        let svg = fs::read_to_string(&output).unwrap();
        assert!(svg.contains("<svg"));
        for title in [
            "Age Distribution",
            "Illness Level Distribution",
            "Symptom Intensity Distribution",
            "Symptoms Reported Over Time",
            "Age vs Illness Level",
        ] {
            assert!(svg.contains(title), "missing chart title {title}");
        }
    }

    #[test]
    fn test_missing_column_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let illness = write_file(
            dir.path(),
            "illness.csv",
            "date,symptom_name,symptom_intensity,age\n2024-01-01,fever,high,40\n",
        );
        let output = dir.path().join("dashboard.svg");

        let error = generate(&illness, &output).unwrap_err();
        assert_eq!(error.user_message(), "Missing column: illness_level");
        assert!(!output.exists());
    }

    #[test]
    fn test_index_label_only_on_category_centers() {
        let labels = ["mild", "high"];
        assert_eq!(index_label(&labels, 0.0, |s| s.to_string()), "mild");
        assert_eq!(index_label(&labels, 1.0, |s| s.to_string()), "high");
        assert_eq!(index_label(&labels, 0.5, |s| s.to_string()), "");
        assert_eq!(index_label(&labels, 2.0, |s| s.to_string()), "");
        assert_eq!(index_label(&labels, -1.0, |s| s.to_string()), "");
    }

    #[test]
    fn test_heat_color_scale_ends() {
        assert_eq!(heat_color(0.0).rgb(), (255, 255, 217));
        assert_eq!(heat_color(1.0).rgb(), (8, 29, 88));
        assert_eq!(heat_color(0.5).rgb(), (65, 182, 196));
    }

    #[test]
    fn test_intensity_pie_labels_every_slice() {
        let dir = tempfile::tempdir().unwrap();
        let illness = write_file(dir.path(), "illness.csv", ILLNESS_CSV);
        let output = dir.path().join("dashboard.svg");

        generate(&illness, &output).unwrap();

        let svg = fs::read_to_string(&output).unwrap();
        for intensity in ["mild", "moderate", "high", "severe"] {
            assert!(svg.contains(intensity), "missing slice label {intensity}");
        }
        // 11 of the 22 rows are high intensity.
        assert!(svg.contains("50.0%"));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawned_viewer_is_reaped() {
        let reaper = spawn_detached(Command::new("true")).unwrap();
        // The reaper only finishes once the child has been waited on.
        reaper.join().unwrap();
    }

    #[test]
    fn test_missing_viewer_is_not_spawned() {
        let result = spawn_detached(Command::new("symptom-checker-no-such-viewer"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
