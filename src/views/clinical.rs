// Clinical view: risk factor analysis over a filtered cohort

use super::View;
use crate::aggregate::{breakdown_by_category, code_label, is_diseased, is_healthy, mean, round1, StatusCounts};
use crate::data::{Dataset, Row};
use crate::error::ViewError;
use crate::filter::{age_domain, ClinicalFilter};
use crate::ir::{status_bars, Chart, Page, PointSeries, Section, SectionItem, Series, Tone};
use crate::roles::{Role, RoleMapping};
use serde::Serialize;

pub const CHEST_PAIN_LABELS: &[(f64, &str)] = &[
    (0.0, "Typical Angina"),
    (1.0, "Atypical Angina"),
    (2.0, "Non-Anginal"),
    (3.0, "Asymptomatic"),
];

/// Factors compared between diseased and healthy patients
const RISK_FACTORS: &[(Role, &str)] = &[
    (Role::Cholesterol, "Cholesterol"),
    (Role::RestingBp, "Resting BP"),
    (Role::Age, "Age"),
    (Role::Oldpeak, "ST Depression"),
];

pub struct ClinicalView;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Some(true) for target 1, Some(false) for target 0 or no target
    /// column, None for any other label
    pub disease: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorAverages {
    pub name: String,
    pub disease: f64,
    pub healthy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClinicalStats {
    /// Slider bounds derived from the data
    pub age_domain: (f64, f64),
    /// Effective filter (age range resolved against the domain)
    pub filter: ClinicalFilter,
    pub shown: usize,
    pub age_vs_cholesterol: Option<Vec<ScatterPoint>>,
    pub age_vs_max_hr: Option<Vec<ScatterPoint>>,
    pub chest_pain: Option<Vec<StatusCounts>>,
    pub risk_factors: Option<Vec<FactorAverages>>,
}

impl View for ClinicalView {
    type State = ClinicalFilter;
    type Output = ClinicalStats;

    const NAME: &'static str = "clinical";

    fn compute(
        dataset: &Dataset,
        roles: &RoleMapping,
        state: &ClinicalFilter,
    ) -> Result<ClinicalStats, ViewError> {
        let domain = age_domain(dataset, roles);
        let filter = ClinicalFilter {
            age: Some(state.age.unwrap_or(domain)),
            ..state.clone()
        };
        let rows = filter.apply(dataset, roles);

        let age_vs_cholesterol = scatter(&rows, roles, Role::Cholesterol);
        let age_vs_max_hr = scatter(&rows, roles, Role::MaxHr);

        let chest_pain = roles.get(Role::ChestPain).map(|cp| {
            breakdown_by_category(&rows, cp, roles.target(), |code| {
                code_label(code, CHEST_PAIN_LABELS, "Type")
            })
        });

        let risk_factors = roles.target().map(|t| risk_factor_averages(&rows, roles, t));

        Ok(ClinicalStats {
            age_domain: domain,
            shown: rows.len(),
            filter,
            age_vs_cholesterol,
            age_vs_max_hr,
            chest_pain,
            risk_factors,
        })
    }

    fn page(stats: &ClinicalStats) -> Page {
        let mut page = Page::new("Clinical View", "Risk factor analysis");

        let (lo, hi) = stats.filter.age.unwrap_or(stats.age_domain);
        let mut filters = vec![
            SectionItem::new(
                "Age Range",
                format!(
                    "{} – {} yrs",
                    crate::data::format_number(lo),
                    crate::data::format_number(hi)
                ),
                Tone::Neutral,
            ),
            SectionItem::new("Male", on_off(stats.filter.show_male), Tone::Neutral),
            SectionItem::new("Female", on_off(stats.filter.show_female), Tone::Neutral),
        ];
        filters.push(SectionItem::new(
            "Exercise Angina",
            match stats.filter.angina {
                Some(true) => "with angina only",
                Some(false) => "without angina only",
                None => "any",
            },
            Tone::Neutral,
        ));
        filters.push(SectionItem::new(
            "Shown",
            format!("{} patients shown", stats.shown),
            Tone::Primary,
        ));
        page.sections.push(Section {
            title: "Filters".to_string(),
            items: filters,
        });

        if let Some(points) = &stats.age_vs_cholesterol {
            page.charts.push(scatter_chart("Age vs. Cholesterol", "Cholesterol (mg/dl)", points));
        }
        if let Some(points) = &stats.age_vs_max_hr {
            page.charts.push(scatter_chart("Age vs. Max Heart Rate", "Max HR (bpm)", points));
        }
        if let Some(cp) = &stats.chest_pain {
            page.charts.push(status_bars("Chest Pain Type Breakdown", cp, "Disease", "Healthy"));
        }
        if let Some(factors) = &stats.risk_factors {
            page.charts.push(
                Chart::bars(
                    "Risk Factor Comparison",
                    factors.iter().map(|f| f.name.clone()).collect(),
                    vec![
                        Series::new("With Disease", Tone::Disease, factors.iter().map(|f| f.disease).collect()),
                        Series::new("No Disease", Tone::Healthy, factors.iter().map(|f| f.healthy).collect()),
                    ],
                )
                .with_subtitle("Average values: disease vs healthy"),
            );
        }

        page
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "shown"
    } else {
        "hidden"
    }
}

/// Age on x, the given role on y; both coordinates must be positive numbers
fn scatter(rows: &[&Row], roles: &RoleMapping, y_role: Role) -> Option<Vec<ScatterPoint>> {
    let age = roles.age()?;
    let y_col = roles.get(y_role)?;
    let target = roles.target();

    let points = rows
        .iter()
        .filter_map(|row| {
            let x = row.number(age)?;
            let y = row.number(y_col)?;
            (x > 0.0 && y > 0.0).then(|| ScatterPoint {
                x,
                y,
                disease: match target {
                    Some(t) if is_diseased(row, t) => Some(true),
                    Some(t) if is_healthy(row, t) => Some(false),
                    Some(_) => None,
                    None => Some(false),
                },
            })
        })
        .collect();
    Some(points)
}

fn scatter_chart(title: &str, y_label: &str, points: &[ScatterPoint]) -> Chart {
    let split = |disease: bool| {
        points
            .iter()
            .filter(|p| p.disease == Some(disease))
            .map(|p| (p.x, p.y))
            .collect::<Vec<_>>()
    };
    Chart::scatter(
        title,
        "Age",
        y_label,
        vec![
            PointSeries {
                name: "Disease".to_string(),
                tone: Tone::Disease,
                points: split(true),
            },
            PointSeries {
                name: "Healthy".to_string(),
                tone: Tone::Healthy,
                points: split(false),
            },
        ],
    )
}

/// Mean of each risk factor for target = 1 and target = 0, one decimal
fn risk_factor_averages(rows: &[&Row], roles: &RoleMapping, target: &str) -> Vec<FactorAverages> {
    let diseased: Vec<&Row> = rows.iter().copied().filter(|r| is_diseased(r, target)).collect();
    let healthy: Vec<&Row> = rows.iter().copied().filter(|r| is_healthy(r, target)).collect();

    RISK_FACTORS
        .iter()
        .filter_map(|(role, label)| {
            let col = roles.get(*role)?;
            let avg = |group: &[&Row]| round1(mean(group.iter().filter_map(|r| r.number(col))).unwrap_or(0.0));
            Some(FactorAverages {
                name: label.to_string(),
                disease: avg(&diseased[..]),
                healthy: avg(&healthy[..]),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv;
    use crate::ir::ChartKind;
    use crate::roles::detect_columns;

    const CSV: &str = "age,sex,cp,trestbps,chol,thalach,exang,oldpeak,target\n\
                       63,1,3,145,233,150,0,2.3,1\n\
                       37,1,2,130,250,187,0,3.5,1\n\
                       41,0,1,130,204,172,0,1.4,0\n\
                       56,1,1,120,236,178,0,0.8,0\n\
                       57,0,0,120,354,163,1,0.6,1\n\
                       57,1,0,140,0,148,1,0.4,0\n\
                       44,1,7,,263,173,0,0,1";

    fn compute(filter: ClinicalFilter) -> ClinicalStats {
        let ds = parse_csv(CSV, "c.csv").unwrap();
        let roles = detect_columns(&ds.columns);
        ClinicalView::compute(&ds, &roles, &filter).unwrap()
    }

    #[test]
    fn test_default_filter_resolves_full_domain() {
        let stats = compute(ClinicalFilter::default());
        assert_eq!(stats.age_domain, (37.0, 63.0));
        assert_eq!(stats.filter.age, Some((37.0, 63.0)));
        assert_eq!(stats.shown, 7);
    }

    #[test]
    fn test_scatter_drops_non_positive() {
        let stats = compute(ClinicalFilter::default());
        // the zero cholesterol row is excluded
        let points = stats.age_vs_cholesterol.unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points.iter().filter(|p| p.disease == Some(true)).count(), 4);
        assert_eq!(stats.age_vs_max_hr.unwrap().len(), 7);
    }

    #[test]
    fn test_chest_pain_breakdown() {
        let stats = compute(ClinicalFilter::default());
        let cp = stats.chest_pain.unwrap();
        let names: Vec<&str> = cp.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Asymptomatic", "Non-Anginal", "Atypical Angina", "Typical Angina", "Type 7"]
        );
        let atypical = &cp[2];
        assert_eq!((atypical.disease, atypical.healthy), (0, 2));
        let typical = &cp[3];
        assert_eq!((typical.disease, typical.healthy), (1, 1));
    }

    #[test]
    fn test_risk_factor_averages() {
        let stats = compute(ClinicalFilter::default());
        let factors = stats.risk_factors.unwrap();
        let names: Vec<&str> = factors.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Cholesterol", "Resting BP", "Age", "ST Depression"]);

        // diseased cholesterol: 233, 250, 354, 263
        assert_eq!(factors[0].disease, 275.0);
        // healthy cholesterol: 204, 236, 0
        assert_eq!(factors[0].healthy, 146.7);
        // diseased resting BP skips the blank cell: 145, 130, 120
        assert_eq!(factors[1].disease, 131.7);
        // diseased ages: 63, 37, 57, 44
        assert_eq!(factors[2].disease, 50.3);
    }

    #[test]
    fn test_filter_narrows_cohort() {
        let stats = compute(ClinicalFilter {
            show_female: false,
            angina: Some(false),
            ..Default::default()
        });
        // males without exercise angina: 63, 37, 56, 44
        assert_eq!(stats.shown, 4);
    }

    #[test]
    fn test_age_range_filter() {
        let stats = compute(ClinicalFilter {
            age: Some((50.0, 60.0)),
            ..Default::default()
        });
        assert_eq!(stats.shown, 3);
    }

    #[test]
    fn test_missing_target_hides_risk_factors() {
        let ds = parse_csv("age,chol\n50,200", "c.csv").unwrap();
        let roles = detect_columns(&ds.columns);
        let stats = ClinicalView::compute(&ds, &roles, &ClinicalFilter::default()).unwrap();
        assert!(stats.risk_factors.is_none());
        assert!(stats.chest_pain.is_none());
        let points = stats.age_vs_cholesterol.as_ref().unwrap();
        assert_eq!(points[0].disease, Some(false));

        let page = ClinicalView::page(&stats);
        let ChartKind::Scatter { series } = &page.charts[0].kind else {
            panic!("expected scatter");
        };
        assert_eq!(series[1].points, vec![(50.0, 200.0)]);
    }

    #[test]
    fn test_scatter_skips_labels_outside_zero_one() {
        let ds = parse_csv("age,chol,num\n50,200,0\n60,250,2\n55,230,1", "n.csv").unwrap();
        let roles = detect_columns(&ds.columns);
        let stats = ClinicalView::compute(&ds, &roles, &ClinicalFilter::default()).unwrap();
        let points = stats.age_vs_cholesterol.as_ref().unwrap();
        assert_eq!(points[1].disease, None);

        let page = ClinicalView::page(&stats);
        let ChartKind::Scatter { series } = &page.charts[0].kind else {
            panic!("expected scatter");
        };
        assert_eq!(series[0].name, "Disease");
        assert_eq!(series[0].points, vec![(55.0, 230.0)]);
        assert_eq!(series[1].name, "Healthy");
        assert_eq!(series[1].points, vec![(50.0, 200.0)]);
    }

    #[test]
    fn test_page_shows_patient_count() {
        let stats = compute(ClinicalFilter::default());
        let page = ClinicalView::page(&stats);
        let shown = page.sections[0].items.iter().find(|i| i.label == "Shown").unwrap();
        assert_eq!(shown.detail, "7 patients shown");
        assert_eq!(page.charts.len(), 4);
    }
}
