use crate::plot::{PlottedChart, PlottedPoint};
use crate::registry::DatasetRegistry;
use crate::selection::{Axes, Selection};
use anyhow::Result;
use log::{debug, info};
use serde::{Serialize, Serializer};
use std::fmt::{self, Display};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const PALETTE: [Color; 7] = [
    Color(0xFF, 0x57, 0x33),
    Color(0x33, 0xFF, 0x57),
    Color(0x33, 0x57, 0xFF),
    Color(0xFF, 0x33, 0xA1),
    Color(0xA1, 0x33, 0xFF),
    Color(0x33, 0xFF, 0xA1),
    Color(0xFF, 0xA1, 0x33),
];

pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Points of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub color: Color,
    pub points: Vec<Point>,
}

/// Everything the chart needs to draw one scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub title: String,
    pub body: String,
}

impl ScatterPlot {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.series.iter().flat_map(|s| s.points.iter())
    }

    /// Axis ranges covering every point, padded by 5% on each side.
    pub fn ranges(&self) -> (Range<f64>, Range<f64>) {
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in self.points() {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
        if x_min > x_max {
            return (0.0..1.0, 0.0..1.0);
        }
        (pad_range(x_min, x_max), pad_range(y_min, y_max))
    }

    pub fn tooltip(&self, point: &Point) -> Tooltip {
        Tooltip {
            title: format!("ID: {}", point.label),
            body: format!(
                "{}: {}, {}: {}",
                self.x_title, point.x, self.y_title, point.y
            ),
        }
    }
}

fn pad_range(min: f64, max: f64) -> Range<f64> {
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    Rendered(ScatterPlot),
    NoValidData,
}

/// Builds one series per dataset, in registry order. Records whose X or Y
/// value is not a finite number are left out of the series.
pub fn build_scatter(registry: &DatasetRegistry, axes: Axes<'_>) -> RenderResult {
    let series: Vec<Series> = registry
        .datasets()
        .iter()
        .enumerate()
        .map(|(index, dataset)| {
            let header = dataset.header();
            let (x_col, y_col, id_col) = (
                header.position(axes.x),
                header.position(axes.y),
                header.position(axes.id),
            );
            let points = dataset
                .records()
                .iter()
                .filter_map(|record| {
                    let cells = record.cells();
                    let x = cells[x_col?].number()?;
                    let y = cells[y_col?].number()?;
                    let label = id_col
                        .and_then(|i| cells[i].as_str())
                        .unwrap_or_default()
                        .to_owned();
                    Some(Point { x, y, label })
                })
                .collect();
            Series {
                label: format!("Dataset {}", index + 1),
                color: palette_color(index),
                points,
            }
        })
        .collect();

    let plot = ScatterPlot {
        x_title: axes.x.into(),
        y_title: axes.y.into(),
        series,
    };
    if plot.point_count() == 0 {
        RenderResult::NoValidData
    } else {
        RenderResult::Rendered(plot)
    }
}

/// The drawing side of the chart: whatever can paint a [`ScatterPlot`] and
/// wipe it again.
pub trait ChartSurface {
    fn draw(&mut self, plot: &ScatterPlot) -> Result<PlottedChart>;
    /// Draws the shown chart again with `point` enlarged, or plain when
    /// `point` is `None`.
    fn highlight(&mut self, plot: &ScatterPlot, point: Option<&PlottedPoint>) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Some role has no attribute yet, nothing was touched.
    Skipped,
    Drawn { series: usize, points: usize },
    NoValidData,
}

struct LiveChart {
    plot: ScatterPlot,
    plotted: PlottedChart,
    highlighted: Option<(usize, usize)>,
}

/// Owns the surface and the chart currently shown on it, if any.
pub struct Renderer<S> {
    surface: S,
    chart: Option<LiveChart>,
}

impl<S: ChartSurface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            chart: None,
        }
    }

    /// Redraws from scratch. The previous chart is always disposed of before
    /// a new one is drawn, including when nothing is left to plot.
    pub fn render(
        &mut self,
        registry: &DatasetRegistry,
        selection: &Selection,
    ) -> Result<RenderOutcome> {
        let Some(axes) = selection.axes() else {
            debug!("Incomplete selection, not rendering");
            return Ok(RenderOutcome::Skipped);
        };

        let result = build_scatter(registry, axes);
        self.dispose()?;

        match result {
            RenderResult::NoValidData => {
                info!("No valid data for x={}, y={}", axes.x, axes.y);
                Ok(RenderOutcome::NoValidData)
            }
            RenderResult::Rendered(plot) => {
                let outcome = RenderOutcome::Drawn {
                    series: plot.series.len(),
                    points: plot.point_count(),
                };
                let plotted = self.surface.draw(&plot)?;
                info!("Rendered {outcome:?} for x={}, y={}", axes.x, axes.y);
                self.chart = Some(LiveChart {
                    plot,
                    plotted,
                    highlighted: None,
                });
                Ok(outcome)
            }
        }
    }

    pub fn dispose(&mut self) -> Result<()> {
        if self.chart.take().is_some() {
            self.surface.clear()?;
        }
        Ok(())
    }

    pub fn plot(&self) -> Option<&ScatterPlot> {
        self.chart.as_ref().map(|chart| &chart.plot)
    }

    /// Nearest plotted point around a pixel of the surface.
    pub fn point_at(&self, x: i32, y: i32) -> Option<&Point> {
        let chart = self.chart.as_ref()?;
        let hit = chart.plotted.nearest(x, y)?;
        chart.plot.series.get(hit.series)?.points.get(hit.point)
    }

    /// Tooltip of the point under a pixel. The surface is redrawn only when
    /// the highlighted point changes.
    pub fn hover(&mut self, x: i32, y: i32) -> Result<Option<Tooltip>> {
        let Some(chart) = self.chart.as_mut() else {
            return Ok(None);
        };
        let hit = chart.plotted.nearest(x, y).copied();
        let key = hit.map(|p| (p.series, p.point));
        if key != chart.highlighted {
            self.surface.highlight(&chart.plot, hit.as_ref())?;
            chart.highlighted = key;
        }

        let plot = &chart.plot;
        Ok(key.and_then(|(series, point)| {
            let point = plot.series.get(series)?.points.get(point)?;
            Some(plot.tooltip(point))
        }))
    }

    pub fn click(&self, x: i32, y: i32) -> Option<&Point> {
        let point = self.point_at(x, y)?;
        info!("Clicked point data: {point:?}");
        Some(point)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
