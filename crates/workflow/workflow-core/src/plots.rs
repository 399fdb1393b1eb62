//! Forecast-vs-actual chart.

use std::path::Path;

use data_spi::{format_timestamp, Timestamp};
use plotters::prelude::*;
use tracking_spi::{Figure, Result, TrackingError};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 500;

fn render_error<E: std::fmt::Display>(err: E) -> TrackingError {
    TrackingError::Render(err.to_string())
}

/// Actual and predicted values over the same timestamps.
#[derive(Debug, Clone)]
pub struct ForecastPlot {
    title: String,
    labels: Vec<String>,
    actual: Vec<f64>,
    predicted: Vec<f64>,
    /// Lower and upper bounds of the prediction interval
    band: Option<(Vec<f64>, Vec<f64>)>,
}

impl ForecastPlot {
    pub fn new(title: &str, ds: &[Timestamp], actual: &[f64], predicted: &[f64]) -> Self {
        Self {
            title: title.to_string(),
            labels: ds.iter().map(format_timestamp).collect(),
            actual: actual.to_vec(),
            predicted: predicted.to_vec(),
            band: None,
        }
    }

    /// Shade the prediction interval between `lower` and `upper`.
    pub fn with_band(mut self, lower: &[f64], upper: &[f64]) -> Self {
        self.band = Some((lower.to_vec(), upper.to_vec()));
        self
    }

    pub fn has_band(&self) -> bool {
        self.band.is_some()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Y range covering both series, widened when flat.
    fn y_range(&self) -> (f64, f64) {
        let finite = self
            .actual
            .iter()
            .chain(&self.predicted)
            .chain(self.band.iter().flat_map(|(lo, hi)| lo.iter().chain(hi)))
            .copied()
            .filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() {
            return (0.0, 1.0);
        }
        let pad = ((hi - lo) * 0.05).max(0.5);
        (lo - pad, hi + pad)
    }
}

impl Figure for ForecastPlot {
    fn render(&self, path: &Path) -> Result<()> {
        let n = self.actual.len().max(self.predicted.len()).max(2);
        let (y_lo, y_hi) = self.y_range();

        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0usize..n - 1, y_lo..y_hi)
            .map_err(render_error)?;

        let labels = &self.labels;
        chart
            .configure_mesh()
            .x_desc("ds")
            .y_desc("y")
            .x_labels(8)
            .x_label_formatter(&|i| labels.get(*i).cloned().unwrap_or_default())
            .draw()
            .map_err(render_error)?;

        if let Some((lower, upper)) = &self.band {
            let outline: Vec<(usize, f64)> = upper
                .iter()
                .copied()
                .enumerate()
                .chain(lower.iter().copied().enumerate().rev())
                .filter(|(_, v)| v.is_finite())
                .collect();
            chart
                .draw_series(std::iter::once(Polygon::new(outline, RED.mix(0.2).filled())))
                .map_err(render_error)?
                .label("Interval")
                .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], RED.mix(0.2).filled()));
        }

        chart
            .draw_series(LineSeries::new(
                self.actual.iter().copied().enumerate(),
                &BLUE,
            ))
            .map_err(render_error)?
            .label("Actual")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .draw_series(LineSeries::new(
                self.predicted.iter().copied().enumerate(),
                &RED,
            ))
            .map_err(render_error)?
            .label("Predicted")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}
