// Runtime: writes the chart cards of a page to image files

use crate::graph::Canvas;
use crate::ir::{Chart, Page};
use crate::RenderOptions;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Render one chart to image bytes
pub fn render_chart(chart: &Chart, options: &RenderOptions) -> Result<Vec<u8>> {
    Canvas::new(options)
        .render(chart)
        .with_context(|| format!("Failed to render chart '{}'", chart.title))
}

/// Write every non-empty chart of a page into `dir`, one file per chart.
///
/// Returns the written paths in page order.
pub fn render_page(page: &Page, dir: &Path, options: &RenderOptions) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create chart directory {}", dir.display()))?;

    let mut written = Vec::new();
    for chart in &page.charts {
        if chart.is_empty() {
            debug!(chart = %chart.title, "skipping empty chart");
            continue;
        }

        let bytes = render_chart(chart, options)?;
        let path = dir.join(format!("{}.{}", slugify(&chart.title), options.format.extension()));
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        written.push(path);
    }

    info!("Wrote {} charts to {}", written.len(), dir.display());
    Ok(written)
}

/// File stem for a chart title: lowercase ASCII words joined by '-'
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("chart");
    }
    slug
}
