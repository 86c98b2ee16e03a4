use crate::config::ExplorerConfig;
use crate::render::{ChartSurface, ScatterPlot};
use anyhow::{Result, anyhow};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Where a point ended up on the surface, in backend pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlottedPoint {
    pub series: usize,
    pub point: usize,
    pub pixel: (i32, i32),
}

/// Geometry of a drawn chart, kept for hit-testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlottedChart {
    points: Vec<PlottedPoint>,
    hit_radius: u32,
}

impl PlottedChart {
    pub fn new(points: Vec<PlottedPoint>, hit_radius: u32) -> Self {
        Self { points, hit_radius }
    }

    /// Closest point to a pixel, if within the hit radius. Ties go to the
    /// point drawn last, which is the one on top.
    pub fn nearest(&self, x: i32, y: i32) -> Option<&PlottedPoint> {
        let max = i64::from(self.hit_radius).pow(2);
        self.points
            .iter()
            .rev()
            .map(|p| {
                let dx = i64::from(p.pixel.0) - i64::from(x);
                let dy = i64::from(p.pixel.1) - i64::from(y);
                (dx * dx + dy * dy, p)
            })
            .filter(|(d, _)| *d <= max)
            .min_by_key(|(d, _)| *d)
            .map(|(_, p)| p)
    }
}

fn font(size: u32) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size as f64, FontStyle::Normal)
}

/// Draws the scatter plot on the whole of `root`. A `highlight`ed point is
/// drawn again on top, with the hover radius.
pub fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plot: &ScatterPlot,
    config: &ExplorerConfig,
    highlight: Option<&PlottedPoint>,
) -> Result<PlottedChart> {
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to clear background: {e:?}"))?;

    let (x_range, y_range) = plot.ranges();
    debug!("Chart ranges: x={x_range:?}, y={y_range:?}");

    let mut chart = ChartBuilder::on(root)
        .margin(config.chart_margin)
        .x_label_area_size(config.label_area_size)
        .y_label_area_size(config.label_area_size + 10)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| anyhow!("Failed to create chart: {e:?}"))?;

    chart
        .configure_mesh()
        .label_style(font(config.font_size))
        .x_desc(plot.x_title.as_str())
        .y_desc(plot.y_title.as_str())
        .axis_desc_style(font(config.font_size + 2))
        .draw()
        .map_err(|e| anyhow!("Failed to draw mesh: {e:?}"))?;

    let radius = config.point_radius as i32;
    let mut plotted = Vec::with_capacity(plot.point_count());
    for (index, series) in plot.series.iter().enumerate() {
        let color = RGBColor(series.color.0, series.color.1, series.color.2);
        chart
            .draw_series(
                series
                    .points
                    .iter()
                    .map(|p| Circle::new((p.x, p.y), radius, color.filled())),
            )
            .map_err(|e| anyhow!("Failed to draw {}: {e:?}", series.label))?
            .label(series.label.as_str())
            .legend(move |(x, y)| Circle::new((x, y), radius, color.filled()));

        plotted.extend(series.points.iter().enumerate().map(|(i, p)| PlottedPoint {
            series: index,
            point: i,
            pixel: chart.backend_coord(&(p.x, p.y)),
        }));
    }

    let hovered = highlight.and_then(|hit| {
        let series = plot.series.get(hit.series)?;
        Some((series, series.points.get(hit.point)?))
    });
    if let Some((series, p)) = hovered {
        let color = RGBColor(series.color.0, series.color.1, series.color.2);
        chart
            .draw_series(std::iter::once(Circle::new(
                (p.x, p.y),
                config.hover_radius as i32,
                color.filled(),
            )))
            .map_err(|e| anyhow!("Failed to highlight {}: {e:?}", p.label))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font(font(config.font_size))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(|e| anyhow!("Failed to draw legend: {e:?}"))?;

    root.present()
        .map_err(|e| anyhow!("Failed to present chart: {e:?}"))?;

    Ok(PlottedChart::new(plotted, config.hover_radius))
}

/// Renders charts to an in-memory SVG document.
pub struct SvgSurface {
    config: ExplorerConfig,
    svg: String,
}

impl SvgSurface {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            config,
            svg: String::new(),
        }
    }

    /// The current document, empty when no chart is shown.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    fn render(
        &mut self,
        plot: &ScatterPlot,
        highlight: Option<&PlottedPoint>,
    ) -> Result<PlottedChart> {
        let mut svg = String::new();
        let plotted = {
            let root = SVGBackend::with_string(&mut svg, (self.config.width, self.config.height))
                .into_drawing_area();
            draw_scatter(&root, plot, &self.config, highlight)?
        };
        self.svg = svg;
        Ok(plotted)
    }
}

impl ChartSurface for SvgSurface {
    fn draw(&mut self, plot: &ScatterPlot) -> Result<PlottedChart> {
        self.render(plot, None)
    }

    fn highlight(&mut self, plot: &ScatterPlot, point: Option<&PlottedPoint>) -> Result<()> {
        self.render(plot, point)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.svg.clear();
        Ok(())
    }
}
