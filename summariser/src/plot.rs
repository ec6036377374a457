use std::ops::Range;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use perf_summary_model::AggregateRecord;

/// File name of the elapsed time chart, written next to the aggregate output.
pub const PLOT_FILE_NAME: &str = "elapsed_vs_actors.png";

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("charting support is not available, rebuild with the `plot` feature")]
    Unavailable,
    #[error("there are no aggregates to plot")]
    NoData,
    #[error("output directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),
    #[error("elapsed time {elapsed} for actors={actors} messages={messages} cannot be plotted")]
    NonFinite {
        actors: u64,
        messages: u64,
        elapsed: f64,
    },
    #[error("axis range {0:?} is unbounded")]
    UnboundedAxis(ChartRanges),
    #[error("failed to render chart: {0}")]
    Render(String),
}

/// One curve of the chart: the message count it is drawn for and its `(actors, avg elapsed)`
/// points.
#[derive(Debug, Clone, PartialEq)]
pub struct ElapsedSeries {
    pub message_count: u64,
    pub points: Vec<(u64, f64)>,
}

/// Split the aggregates into one [`ElapsedSeries`] per message count.
///
/// Series are ordered by message count and their points by actor count.
pub fn elapsed_series(aggregates: &[AggregateRecord]) -> Vec<ElapsedSeries> {
    aggregates
        .iter()
        .into_group_map_by(|a| a.message_count)
        .into_iter()
        .sorted_by_key(|(message_count, _)| *message_count)
        .map(|(message_count, group)| ElapsedSeries {
            message_count,
            points: group
                .into_iter()
                .map(|a| (a.actor_count, a.avg_elapsed_seconds))
                .sorted_by_key(|(actors, _)| *actors)
                .collect(),
        })
        .collect()
}

/// Axis ranges of the chart: actors on `x`, average elapsed seconds on `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRanges {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

/// Compute the axis ranges for the series.
///
/// Every point must be finite and the padded ranges must stay finite, the charting backend
/// cannot lay out an unbounded axis.
pub fn chart_ranges(series: &[ElapsedSeries]) -> Result<ChartRanges, PlotError> {
    for s in series {
        if let Some(&(actors, elapsed)) = s.points.iter().find(|(_, y)| !y.is_finite()) {
            return Err(PlotError::NonFinite {
                actors,
                messages: s.message_count,
                elapsed,
            });
        }
    }

    let points = || series.iter().flat_map(|s| s.points.iter().copied());
    let x_min = points().map(|(x, _)| x).min().unwrap_or(0) as f64;
    let x_max = points().map(|(x, _)| x).max().unwrap_or(0) as f64;
    let y_min = points().map(|(_, y)| y).fold(0.0f64, f64::min);
    let y_max = points().map(|(_, y)| y).fold(0.0f64, f64::max);

    // Keep the ranges non-degenerate when there is a single point
    let x_pad = ((x_max - x_min) * 0.05).max(1.0);
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    let y_bottom = y_min * 1.1;

    let ranges = ChartRanges {
        x: (x_min - x_pad)..(x_max + x_pad),
        y: y_bottom..y_top,
    };
    let bounds = [ranges.x.start, ranges.x.end, ranges.y.start, ranges.y.end];
    if bounds.iter().any(|bound| !bound.is_finite()) {
        return Err(PlotError::UnboundedAxis(ranges));
    }

    Ok(ranges)
}

/// Try to render the elapsed vs actors chart.
///
/// Plotting never fails the run. Returns the path of the chart if it was written, otherwise
/// logs why it was skipped and returns [`None`].
pub fn try_plot_elapsed_vs_actors(
    aggregates: &[AggregateRecord],
    path: &Path,
) -> Option<PathBuf> {
    match plot_elapsed_vs_actors(aggregates, path) {
        Ok(()) => {
            log::info!("Saved plot {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            log::info!("Skipping plots: {e}");
            None
        }
    }
}

/// Render the elapsed vs actors chart to a PNG file at `path`.
pub fn plot_elapsed_vs_actors(
    aggregates: &[AggregateRecord],
    path: &Path,
) -> Result<(), PlotError> {
    let series = elapsed_series(aggregates);
    if series.is_empty() {
        return Err(PlotError::NoData);
    }
    let ranges = chart_ranges(&series)?;
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !dir.is_dir() {
            return Err(PlotError::MissingDirectory(dir.to_path_buf()));
        }
    }

    render(&series, ranges, path)
}

#[cfg(not(feature = "plot"))]
fn render(_series: &[ElapsedSeries], _ranges: ChartRanges, _path: &Path) -> Result<(), PlotError> {
    Err(PlotError::Unavailable)
}

#[cfg(feature = "plot")]
fn render(series: &[ElapsedSeries], ranges: ChartRanges, path: &Path) -> Result<(), PlotError> {
    draw_chart(series, ranges, path).map_err(|e| PlotError::Render(e.to_string()))
}

#[cfg(feature = "plot")]
fn draw_chart(
    series: &[ElapsedSeries],
    ranges: ChartRanges,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    use plotters::prelude::*;

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Elapsed vs actors", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(46)
        .y_label_area_size(68)
        .build_cartesian_2d(ranges.x, ranges.y)?;

    chart
        .configure_mesh()
        .x_desc("actors")
        .y_desc("avg elapsed (s)")
        .draw()?;

    for (i, s) in series.iter().enumerate() {
        let color = Palette99::pick(i).mix(0.9);
        let line = s
            .points
            .iter()
            .map(|&(actors, elapsed)| (actors as f64, elapsed));

        chart
            .draw_series(LineSeries::new(line.clone(), color.stroke_width(2)))?
            .label(format!("m={}", s.message_count))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        chart.draw_series(line.map(|point| Circle::new(point, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(actors: u64, messages: u64, elapsed: f64) -> AggregateRecord {
        AggregateRecord {
            actor_count: actors,
            message_count: messages,
            run_count: 1,
            ok_run_count: 1,
            avg_elapsed_seconds: elapsed,
            avg_received: 0.0,
            avg_max_cpu_percent: 0.0,
            avg_max_rss_kilobytes: 0.0,
        }
    }

    #[test]
    fn test_series_per_message_count() {
        let aggregates = vec![
            aggregate(2, 100, 1.5),
            aggregate(8, 10, 2.0),
            aggregate(2, 10, 0.5),
            aggregate(4, 100, 3.0),
        ];

        let series = elapsed_series(&aggregates);

        assert_eq!(
            series,
            vec![
                ElapsedSeries {
                    message_count: 10,
                    points: vec![(2, 0.5), (8, 2.0)],
                },
                ElapsedSeries {
                    message_count: 100,
                    points: vec![(2, 1.5), (4, 3.0)],
                },
            ]
        );
    }

    #[test]
    fn test_should_skip_plot_without_aggregates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PLOT_FILE_NAME);

        let result = plot_elapsed_vs_actors(&[], &path);

        assert!(matches!(result, Err(PlotError::NoData)));
        assert!(try_plot_elapsed_vs_actors(&[], &path).is_none());
        assert!(!path.exists());
    }

    #[cfg(not(feature = "plot"))]
    #[test]
    fn test_should_report_unavailable_charting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PLOT_FILE_NAME);

        let result = plot_elapsed_vs_actors(&[aggregate(2, 10, 1.0)], &path);

        assert!(matches!(result, Err(PlotError::Unavailable)));
        assert!(!path.exists());
    }

    #[test]
    fn test_should_skip_plot_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(PLOT_FILE_NAME);

        let result = plot_elapsed_vs_actors(&[aggregate(2, 10, 1.0)], &path);

        assert!(matches!(result, Err(PlotError::MissingDirectory(_))));
        assert!(try_plot_elapsed_vs_actors(&[aggregate(2, 10, 1.0)], &path).is_none());
    }

    #[cfg(feature = "plot")]
    #[test]
    fn test_should_render_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PLOT_FILE_NAME);

        let written = try_plot_elapsed_vs_actors(
            &[
                aggregate(2, 10, 0.5),
                aggregate(4, 10, 1.0),
                aggregate(2, 100, 1.5),
            ],
            &path,
        );

        assert_eq!(written, Some(path.clone()));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_ranges_are_padded_around_points() {
        let series = elapsed_series(&[aggregate(2, 10, 1.0), aggregate(42, 10, 2.0)]);

        let ranges = chart_ranges(&series).unwrap();

        assert_eq!(ranges.x, 0.0..44.0);
        assert!((ranges.y.end - 2.2).abs() < 1e-9);
        assert_eq!(ranges.y.start, 0.0);
    }

    #[test]
    fn test_ranges_reject_infinite_elapsed() {
        let series = elapsed_series(&[aggregate(2, 10, 1.0), aggregate(4, 10, f64::INFINITY)]);

        let result = chart_ranges(&series);

        assert!(matches!(
            result,
            Err(PlotError::NonFinite {
                actors: 4,
                messages: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_ranges_reject_overflowing_axis() {
        let series = elapsed_series(&[aggregate(2, 10, 1.0), aggregate(4, 10, 1.7e308)]);

        let result = chart_ranges(&series);

        assert!(matches!(result, Err(PlotError::UnboundedAxis(_))));
    }

    #[test]
    fn test_should_skip_plot_with_unbounded_elapsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PLOT_FILE_NAME);

        for elapsed in [f64::INFINITY, f64::MAX, f64::NAN] {
            let aggregates = [aggregate(2, 10, 1.0), aggregate(4, 10, elapsed)];
            assert!(try_plot_elapsed_vs_actors(&aggregates, &path).is_none());
        }
        assert!(!path.exists());
    }
}
