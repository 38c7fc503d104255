// Overview: high-level summary of the loaded dataset

use super::{or_na, View};
use crate::aggregate::{
    binary_by_status, bucket_counts, column_mean, count_diseased, format_percent, CategoryCount,
    StatusCounts, AGE_BUCKETS,
};
use crate::data::{Dataset, Row};
use crate::error::ViewError;
use crate::ir::{status_bars, Chart, Page, Series, StatCard, Tone};
use crate::roles::RoleMapping;
use serde::Serialize;

pub struct OverviewView;

#[derive(Debug, Clone, Serialize)]
pub struct OverviewStats {
    pub total: usize,
    pub with_disease: Option<usize>,
    pub prevalence: Option<String>,
    pub avg_age: Option<i64>,
    pub avg_cholesterol: Option<i64>,
    pub donut: Option<Vec<CategoryCount>>,
    pub age_distribution: Option<Vec<CategoryCount>>,
    pub gender_breakdown: Option<Vec<StatusCounts>>,
}

impl View for OverviewView {
    type State = ();
    type Output = OverviewStats;

    const NAME: &'static str = "overview";

    fn compute(dataset: &Dataset, roles: &RoleMapping, _state: &()) -> Result<OverviewStats, ViewError> {
        let rows: Vec<&Row> = dataset.rows.iter().collect();
        let total = rows.len();

        let with_disease = roles.target().map(|t| count_diseased(&rows, t));
        let prevalence = with_disease.and_then(|n| format_percent(n, total));

        let avg_age = roles
            .age()
            .and_then(|c| column_mean(&rows, c))
            .map(|m| m.round() as i64);
        let avg_cholesterol = roles
            .get(crate::roles::Role::Cholesterol)
            .and_then(|c| column_mean(&rows, c))
            .map(|m| m.round() as i64);

        let donut = with_disease.map(|n| {
            vec![
                CategoryCount {
                    name: "Heart Disease".to_string(),
                    count: n,
                },
                CategoryCount {
                    name: "No Disease".to_string(),
                    count: total - n,
                },
            ]
        });

        let age_distribution = roles.age().map(|c| bucket_counts(&rows, c, &AGE_BUCKETS));

        let gender_breakdown = match (roles.gender(), roles.target()) {
            (Some(g), Some(t)) => Some(binary_by_status(&rows, g, t, "Male", "Female")),
            _ => None,
        };

        Ok(OverviewStats {
            total,
            with_disease,
            prevalence,
            avg_age,
            avg_cholesterol,
            donut,
            age_distribution,
            gender_breakdown,
        })
    }

    fn page(stats: &OverviewStats) -> Page {
        let mut page = Page::new("Overview", "High-level summary of the uploaded dataset");

        page.cards.push(StatCard::new("Total Patients", stats.total.to_string(), Tone::Primary));

        let mut disease_card = StatCard::new("With Heart Disease", or_na(stats.prevalence.clone()), Tone::Disease);
        if let Some(n) = stats.with_disease {
            disease_card = disease_card.with_sub(format!("{} patients", n));
        }
        page.cards.push(disease_card);

        page.cards.push(StatCard::new(
            "Average Age",
            or_na(stats.avg_age.map(|a| format!("{} yrs", a))),
            Tone::Teal,
        ));
        page.cards.push(StatCard::new(
            "Avg Cholesterol",
            or_na(stats.avg_cholesterol.map(|c| format!("{} mg/dl", c))),
            Tone::Warning,
        ));

        if let Some(donut) = &stats.donut {
            page.charts.push(Chart::bars(
                "Heart Disease Prevalence",
                donut.iter().map(|c| c.name.clone()).collect(),
                vec![Series::new(
                    "Patients",
                    Tone::Disease,
                    donut.iter().map(|c| c.count as f64).collect(),
                )],
            ));
        }

        if let Some(genders) = &stats.gender_breakdown {
            page.charts.push(status_bars(
                "Gender Breakdown by Disease Status",
                genders,
                "Heart Disease",
                "No Disease",
            ));
        }

        if let Some(ages) = &stats.age_distribution {
            page.charts.push(Chart::bars(
                "Age Distribution",
                ages.iter().map(|c| c.name.clone()).collect(),
                vec![Series::new(
                    "Patients",
                    Tone::Primary,
                    ages.iter().map(|c| c.count as f64).collect(),
                )],
            ));
        }

        page
    }
}
