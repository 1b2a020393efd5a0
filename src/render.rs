//! render.rs — log-log comparison chart written as PNG.
//!
//! The chart is drawn with `plotters` into an RGB buffer and encoded with
//! `image`. One line per series, decade-aligned log axes, legend in the
//! upper left corner. Failed cells and non-positive values are left out.
//! Text uses the bundled DejaVu Sans face, so no system fonts are needed.

use std::path::Path;
use std::sync::OnceLock;

use image::RgbImage;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::{register_font, FontStyle};
use tracing::info;

use crate::{
    driver::{Series, SweepReport},
    errors::{BenchError, Result},
    params::BenchConfig,
};

pub type Rgb = [u8; 3];

const FONT_FAMILY: &str = "sans-serif";
const DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Line pattern of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl Dash {
    /// `(dash, gap)` lengths in pixels at unit scale; `None` is solid.
    fn segments(self) -> Option<(u32, u32)> {
        match self {
            Dash::Solid => None,
            Dash::Dashed => Some((10, 6)),
            Dash::Dotted => Some((2, 4)),
            Dash::DashDot => Some((14, 4)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurveStyle {
    pub color: Rgb,
    pub dash: Dash,
}

impl CurveStyle {
    pub const fn new(color: Rgb, dash: Dash) -> Self {
        Self { color, dash }
    }

    fn rgb(&self) -> RGBColor {
        let [r, g, b] = self.color;
        RGBColor(r, g, b)
    }
}

/// Canvas size and axis titles.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: crate::params::DEF_CHART_WIDTH,
            height: crate::params::DEF_CHART_HEIGHT,
            x_label: "total point size (num neighbors * num point cloud)".into(),
            y_label: "runtime [s]".into(),
        }
    }
}

impl ChartOptions {
    pub fn from_config(cfg: &BenchConfig) -> Self {
        Self { width: cfg.chart_width, height: cfg.chart_height, ..Self::default() }
    }
}

/// Render the report's series and write the PNG to `destination`,
/// creating parent directories as needed.
pub fn render(report: &SweepReport, destination: &Path, options: &ChartOptions) -> Result<()> {
    render_series(&report.series, destination, options)
}

pub fn render_series(series: &[Series], destination: &Path, options: &ChartOptions) -> Result<()> {
    let img = draw_chart(series, options)?;
    if let Some(dir) = destination.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    img.save_with_format(destination, image::ImageFormat::Png)?;
    info!(path = %destination.display(), curves = series.len(), "chart written");
    Ok(())
}

/// Decade-aligned `log10` range covering `values`.
fn decades(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        let l = v.log10();
        (lo.min(l), hi.max(l))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let (lo, mut hi) = (lo.floor(), hi.ceil());
    if hi <= lo {
        hi = lo + 1.0;
    }
    Some((lo, hi))
}

fn plottable(s: &Series) -> impl Iterator<Item = (f64, f64)> + '_ {
    s.means()
        .map(|(x, y)| (x as f64, y))
        .filter(|&(x, y)| x > 0.0 && y > 0.0 && y.is_finite())
}

fn plot_err(e: impl std::fmt::Display) -> BenchError {
    BenchError::Plot(e.to_string())
}

/// Register the bundled face under the default family, once per process.
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, DEJAVU_SANS)
                .map_err(|_| "bundled font could not be parsed".to_string())
        })
        .clone()
        .map_err(BenchError::Plot)
}

/// Draw the chart in memory.
pub fn draw_chart(series: &[Series], options: &ChartOptions) -> Result<RgbImage> {
    if options.width < 200 || options.height < 150 {
        return Err(BenchError::InvalidConfig(format!(
            "chart {}x{} is too small (min 200x150)",
            options.width, options.height
        )));
    }
    let x_range = decades(series.iter().flat_map(|s| plottable(s).map(|p| p.0)));
    let y_range = decades(series.iter().flat_map(|s| plottable(s).map(|p| p.1)));
    let (Some(x_range), Some(y_range)) = (x_range, y_range) else {
        return Err(BenchError::NothingToRender);
    };
    ensure_font()?;

    let (width, height) = (options.width, options.height);
    let scale = (height / 600).max(1);
    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let x_axis = (10f64.powf(x_range.0)..10f64.powf(x_range.1)).log_scale();
        let y_axis = (10f64.powf(y_range.0)..10f64.powf(y_range.1)).log_scale();
        let mut chart = ChartBuilder::on(&root)
            .margin(15 * scale)
            .x_label_area_size(50 * scale)
            .y_label_area_size(70 * scale)
            .build_cartesian_2d(x_axis, y_axis)
            .map_err(plot_err)?;

        let text = (FONT_FAMILY, 14.0 * scale as f64).into_font();
        chart
            .configure_mesh()
            .x_desc(options.x_label.as_str())
            .y_desc(options.y_label.as_str())
            .x_label_formatter(&|v| format!("{v:.0e}"))
            .y_label_formatter(&|v| format!("{v:.0e}"))
            .label_style(text.clone())
            .axis_desc_style(text)
            .draw()
            .map_err(plot_err)?;

        let stroke = 2 * scale;
        for se in series {
            let color = se.style.rgb();
            let line = color.stroke_width(stroke);
            let pts: Vec<(f64, f64)> = plottable(se).collect();

            let anno = match se.style.dash.segments() {
                None => chart.draw_series(LineSeries::new(pts.clone(), line)),
                Some((dash, gap)) => chart.draw_series(DashedLineSeries::new(
                    pts.clone(),
                    dash * scale,
                    gap * scale,
                    line,
                )),
            }
            .map_err(plot_err)?;
            anno.label(se.name.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 24 * scale as i32, y)], line)
            });

            chart
                .draw_series(pts.iter().map(|&p| Circle::new(p, 3 * scale, color.filled())))
                .map_err(plot_err)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.9))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
    }

    RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| BenchError::Plot("canvas buffer has the wrong size".into()))
}
