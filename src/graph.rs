use crate::ir::{Chart, ChartKind, PointSeries, Series, Tone};
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// Canvas that turns one chart card into image bytes
pub struct Canvas {
    width: u32,
    height: u32,
    format: OutputFormat,
}

impl Canvas {
    pub fn new(options: &RenderOptions) -> Self {
        Canvas {
            width: options.width,
            height: options.height,
            format: options.format,
        }
    }

    /// Draw a chart and encode it in the configured format
    pub fn render(&self, chart: &Chart) -> Result<Vec<u8>> {
        match self.format {
            OutputFormat::Png => self.render_png(chart),
            OutputFormat::Svg => self.render_svg(chart),
        }
    }

    fn render_png(&self, chart: &Chart) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            draw_chart(&root, chart)?;
            root.present().context("Failed to present drawing")?;
        }

        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }

    fn render_svg(&self, chart: &Chart) -> Result<Vec<u8>> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            draw_chart(&root, chart)?;
            root.present().context("Failed to present drawing")?;
        }
        Ok(svg.into_bytes())
    }
}

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, chart: &Chart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let caption = match &chart.subtitle {
        Some(sub) => format!("{} ({})", chart.title, sub),
        None => chart.title.clone(),
    };

    match &chart.kind {
        ChartKind::Bars { categories, series } => {
            add_bar_group(root, &caption, chart, categories, series)
        }
        ChartKind::Scatter { series } => add_scatter(root, &caption, chart, series),
    }
}

/// Grouped bars, one dodged bar per series in each category
fn add_bar_group<DB>(
    root: &DrawingArea<DB, Shift>,
    caption: &str,
    chart: &Chart,
    categories: &[String],
    series: &[Series],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if categories.is_empty() {
        anyhow::bail!("Cannot create bar chart with no categories");
    }
    if series.is_empty() {
        anyhow::bail!("Cannot create bar chart with no series");
    }

    let num_categories = categories.len();
    let num_series = series.len();

    // bar centers sit on integer x positions
    let x_range = -0.5..(num_categories as f64 - 0.5);
    let y_max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0, f64::max);
    let y_range = 0.0..if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut ctx = ChartBuilder::on(root)
        .margin(10)
        .caption(caption, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    let label_for = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < num_categories {
            categories[idx as usize].clone()
        } else {
            String::new()
        }
    };

    let mut mesh = ctx.configure_mesh();
    mesh.x_labels(num_categories)
        .x_label_formatter(&label_for)
        .disable_x_mesh();
    if let Some(x) = &chart.x_label {
        mesh.x_desc(x.as_str());
    }
    if let Some(y) = &chart.y_label {
        mesh.y_desc(y.as_str());
    }
    mesh.draw().context("Failed to draw mesh")?;

    let bar_width = 0.8 / num_series as f64;

    for (series_idx, s) in series.iter().enumerate() {
        let color = tone_color(s.tone);
        let x_offset = (series_idx as f64 - (num_series as f64 - 1.0) / 2.0) * bar_width;

        ctx.draw_series(s.values.iter().enumerate().map(|(cat_idx, &y_val)| {
            let x_center = cat_idx as f64 + x_offset;
            Rectangle::new(
                [
                    (x_center - bar_width / 2.0, 0.0),
                    (x_center + bar_width / 2.0, y_val),
                ],
                color.filled(),
            )
        }))
        .context("Failed to draw bar")?
        .label(s.name.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if num_series > 1 {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .context("Failed to draw legend")?;
    }

    Ok(())
}

/// Point clouds, one per series, semi-transparent
fn add_scatter<DB>(
    root: &DrawingArea<DB, Shift>,
    caption: &str,
    chart: &Chart,
    series: &[PointSeries],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (xs, ys): (Vec<f64>, Vec<f64>) = series.iter().flat_map(|s| s.points.iter().copied()).unzip();

    let mut ctx = ChartBuilder::on(root)
        .margin(10)
        .caption(caption, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(padded_range(&xs), padded_range(&ys))
        .context("Failed to build chart")?;

    let mut mesh = ctx.configure_mesh();
    if let Some(x) = &chart.x_label {
        mesh.x_desc(x.as_str());
    }
    if let Some(y) = &chart.y_label {
        mesh.y_desc(y.as_str());
    }
    mesh.draw().context("Failed to draw mesh")?;

    for s in series {
        let color = tone_color(s.tone).mix(0.6);
        ctx.draw_series(s.points.iter().map(|&(x, y)| Circle::new((x, y), 4, color.filled())))
            .context("Failed to draw point series")?
            .label(s.name.as_str())
            .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .context("Failed to draw legend")?;

    Ok(())
}

/// Data range with 5% padding, widened by one unit when degenerate
fn padded_range(values: &[f64]) -> Range<f64> {
    if values.is_empty() {
        return 0.0..1.0;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Fixed palette for semantic tones
pub fn tone_color(tone: Tone) -> RGBColor {
    match tone {
        Tone::Disease => RGBColor(220, 38, 38),
        Tone::Healthy => RGBColor(22, 163, 74),
        Tone::Primary => RGBColor(37, 99, 235),
        Tone::Teal => RGBColor(13, 148, 136),
        Tone::Warning => RGBColor(217, 119, 6),
        Tone::Muted => RGBColor(148, 163, 184),
        Tone::Neutral => RGBColor(71, 85, 105),
    }
}
