use serde::Serialize;

// =============================================================================
// Page: what a dashboard view hands to the renderers
// =============================================================================

/// One dashboard view, ready for the text report or the chart backend
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: String,
    pub subtitle: String,
    pub cards: Vec<StatCard>,
    pub charts: Vec<Chart>,
    pub sections: Vec<Section>,
}

impl Page {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            cards: Vec::new(),
            charts: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Placeholder shown by every view while the session holds no dataset
    pub fn no_data() -> Self {
        let mut page = Page::new(
            "No Data Loaded",
            "Upload a heart disease CSV file to start exploring the dashboard and visualizations.",
        );
        page.sections.push(Section {
            title: "Expected columns (Cleveland Heart Disease format)".to_string(),
            items: crate::roles::EXPECTED_COLUMNS
                .iter()
                .map(|(col, desc)| SectionItem::new(*col, *desc, Tone::Neutral))
                .collect(),
        });
        page
    }
}

/// Headline number of a view
#[derive(Debug, Clone, Serialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub sub: Option<String>,
    pub tone: Tone,
}

impl StatCard {
    pub fn new(label: &str, value: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            sub: None,
            tone,
        }
    }

    pub fn with_sub(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }
}

/// List of labeled lines (patient data, risk flags, recommendations)
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionItem {
    pub label: String,
    pub detail: String,
    pub tone: Tone,
}

impl SectionItem {
    pub fn new(label: impl Into<String>, detail: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
            tone,
        }
    }
}

/// Semantic color of a card, series or item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Disease,
    Healthy,
    Primary,
    Teal,
    Warning,
    Muted,
    Neutral,
}

// =============================================================================
// Charts
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub title: String,
    pub subtitle: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub kind: ChartKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// Categorical x-axis, one bar per series per category (dodged)
    Bars {
        categories: Vec<String>,
        series: Vec<Series>,
    },
    /// Continuous axes, one point cloud per series
    Scatter { series: Vec<PointSeries> },
}

impl Chart {
    pub fn bars(title: &str, categories: Vec<String>, series: Vec<Series>) -> Self {
        Self {
            title: title.to_string(),
            subtitle: None,
            x_label: None,
            y_label: None,
            kind: ChartKind::Bars { categories, series },
        }
    }

    pub fn scatter(title: &str, x_label: &str, y_label: &str, series: Vec<PointSeries>) -> Self {
        Self {
            title: title.to_string(),
            subtitle: Some("Colored by disease status".to_string()),
            x_label: Some(x_label.to_string()),
            y_label: Some(y_label.to_string()),
            kind: ChartKind::Scatter { series },
        }
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            ChartKind::Bars { categories, .. } => categories.is_empty(),
            ChartKind::Scatter { series } => series.iter().all(|s| s.points.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub name: String,
    pub tone: Tone,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: &str, tone: Tone, values: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            tone,
            values,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PointSeries {
    pub name: String,
    pub tone: Tone,
    pub points: Vec<(f64, f64)>,
}

/// Two bar series (disease, healthy) from status counts
pub fn status_bars(
    title: &str,
    counts: &[crate::aggregate::StatusCounts],
    disease_name: &str,
    healthy_name: &str,
) -> Chart {
    let categories = counts.iter().map(|c| c.name.clone()).collect();
    let disease = counts.iter().map(|c| c.disease as f64).collect();
    let healthy = counts.iter().map(|c| c.healthy as f64).collect();
    Chart::bars(
        title,
        categories,
        vec![
            Series::new(disease_name, Tone::Disease, disease),
            Series::new(healthy_name, Tone::Healthy, healthy),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::StatusCounts;

    #[test]
    fn test_status_bars_layout() {
        let counts = vec![
            StatusCounts { name: "Male".into(), disease: 3, healthy: 1 },
            StatusCounts { name: "Female".into(), disease: 0, healthy: 2 },
        ];
        let chart = status_bars("Gender", &counts, "Heart Disease", "No Disease");
        match chart.kind {
            ChartKind::Bars { categories, series } => {
                assert_eq!(categories, vec!["Male", "Female"]);
                assert_eq!(series[0].values, vec![3.0, 0.0]);
                assert_eq!(series[1].values, vec![1.0, 2.0]);
                assert_eq!(series[0].tone, Tone::Disease);
            }
            _ => panic!("expected bars"),
        }
    }

    #[test]
    fn test_empty_scatter() {
        let chart = Chart::scatter("s", "x", "y", vec![PointSeries { name: "a".into(), tone: Tone::Disease, points: vec![] }]);
        assert!(chart.is_empty());
    }

    #[test]
    fn test_no_data_page_lists_expected_columns() {
        let page = Page::no_data();
        assert_eq!(page.title, "No Data Loaded");
        assert_eq!(page.sections[0].items.len(), 10);
        assert_eq!(page.sections[0].items[0].label, "age");
    }
}
