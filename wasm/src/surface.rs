use anyhow::{Result, anyhow};
use gwas_explorer::plot::PlottedPoint;
use gwas_explorer::{ChartSurface, ExplorerConfig, PlottedChart, ScatterPlot, draw_scatter};
use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use web_sys::HtmlCanvasElement;

/// Draws charts on an HTML canvas.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    config: ExplorerConfig,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, config: ExplorerConfig) -> Self {
        canvas.set_width(config.width);
        canvas.set_height(config.height);
        Self { canvas, config }
    }

    fn backend(&self) -> Result<CanvasBackend> {
        CanvasBackend::with_canvas_object(self.canvas.clone())
            .ok_or_else(|| anyhow!("Failed to create backend"))
    }
}

impl ChartSurface for CanvasSurface {
    fn draw(&mut self, plot: &ScatterPlot) -> Result<PlottedChart> {
        let root = self.backend()?.into_drawing_area();
        draw_scatter(&root, plot, &self.config, None)
    }

    fn highlight(&mut self, plot: &ScatterPlot, point: Option<&PlottedPoint>) -> Result<()> {
        let root = self.backend()?.into_drawing_area();
        draw_scatter(&root, plot, &self.config, point)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let root = self.backend()?.into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow!("Failed to clear background: {e:?}"))?;
        root.present()
            .map_err(|e| anyhow!("Failed to present chart: {e:?}"))?;
        Ok(())
    }
}
