// Patient profile: one record against healthy ranges and dataset averages

use super::View;
use crate::aggregate::{is_diseased, mean, round1};
use crate::data::{format_number, Dataset, Row};
use crate::error::ViewError;
use crate::ir::{Chart, Page, Section, SectionItem, Series, StatCard, Tone};
use crate::roles::{Role, RoleMapping};
use serde::{Deserialize, Serialize};
use std::fmt;

pub struct PatientView;

/// Clinical indicator with its healthy range
#[derive(Debug, Clone, Copy)]
pub struct Benchmark {
    pub label: &'static str,
    pub role: Role,
    pub unit: &'static str,
    pub healthy: (f64, f64),
}

pub const BENCHMARKS: &[Benchmark] = &[
    Benchmark { label: "Cholesterol", role: Role::Cholesterol, unit: "mg/dl", healthy: (100.0, 200.0) },
    Benchmark { label: "Resting BP", role: Role::RestingBp, unit: "mmHg", healthy: (90.0, 120.0) },
    Benchmark { label: "Max Heart Rate", role: Role::MaxHr, unit: "bpm", healthy: (100.0, 170.0) },
    Benchmark { label: "Age", role: Role::Age, unit: "yrs", healthy: (20.0, 55.0) },
    Benchmark { label: "ST Depression", role: Role::Oldpeak, unit: "", healthy: (0.0, 1.5) },
];

const RECOMMENDATIONS: &[(&str, &str)] = &[
    ("Cholesterol", "Consider dietary changes: reduce saturated fats, increase fiber intake."),
    (
        "Resting BP",
        "Monitor blood pressure regularly. Reduce sodium intake and increase physical activity.",
    ),
    ("Max Heart Rate", "Consult a cardiologist regarding cardiovascular fitness levels."),
    ("ST Depression", "Schedule an ECG and stress test. This may indicate myocardial ischemia."),
    ("Age", "Age is a non-modifiable risk factor. Increase monitoring frequency."),
];

const DEFAULT_RECOMMENDATION: &str = "Consult your healthcare provider for personalized advice.";

/// Which patient to profile, 1-based as shown to the user ("Patient #1")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSelection {
    pub index: usize,
}

impl Default for PatientSelection {
    fn default() -> Self {
        Self { index: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= 70 {
            RiskLevel::High
        } else if score >= 40 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    fn tone(self) -> Tone {
        match self {
            RiskLevel::High => Tone::Disease,
            RiskLevel::Moderate => Tone::Warning,
            RiskLevel::Low => Tone::Healthy,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::Low => "Low Risk",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFlag {
    pub label: String,
    pub value: f64,
    pub unit: String,
    /// Signed deviation from the dataset average, in percent
    pub pct_diff: f64,
    pub severity: Severity,
    pub out_of_range: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub name: String,
    pub patient: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientProfile {
    pub index: usize,
    pub total: usize,
    /// "Heart Disease" / "No Disease" from the target column, if any
    pub dataset_label: Option<String>,
    pub score: u32,
    pub level: RiskLevel,
    /// (label, displayed value) per available benchmark
    pub data: Vec<(String, String)>,
    pub flags: Vec<RiskFlag>,
    pub comparison: Vec<Comparison>,
    pub recommendations: Vec<Recommendation>,
}

impl View for PatientView {
    type State = PatientSelection;
    type Output = PatientProfile;

    const NAME: &'static str = "patient";

    fn compute(
        dataset: &Dataset,
        roles: &RoleMapping,
        selection: &PatientSelection,
    ) -> Result<PatientProfile, ViewError> {
        let total = dataset.len();
        let patient = selection
            .index
            .checked_sub(1)
            .and_then(|i| dataset.rows.get(i))
            .ok_or(ViewError::PatientOutOfRange {
                index: selection.index,
                total,
            })?;

        let benchmarks: Vec<(&Benchmark, &str, f64)> = BENCHMARKS
            .iter()
            .filter_map(|b| {
                let col = roles.get(b.role)?;
                Some((b, col, dataset_average(dataset, col)))
            })
            .collect();

        let dataset_label = roles.target().map(|t| {
            if is_diseased(patient, t) {
                "Heart Disease".to_string()
            } else {
                "No Disease".to_string()
            }
        });

        let data = benchmarks
            .iter()
            .map(|(b, col, _)| (b.label.to_string(), display_value(patient, col, b.unit)))
            .collect();

        let comparison = benchmarks
            .iter()
            .filter_map(|(b, col, avg)| {
                let value = round1(patient.number(col)?);
                (value > 0.0).then(|| Comparison {
                    name: b.label.to_string(),
                    patient: value,
                    average: round1(*avg),
                })
            })
            .collect();

        let flags: Vec<RiskFlag> = benchmarks
            .iter()
            .filter_map(|(b, col, avg)| flag(b, patient.number(col)?, *avg))
            .collect();

        let score = risk_score(&flags, dataset_label.as_deref() == Some("Heart Disease"));

        let recommendations = flags
            .iter()
            .map(|f| Recommendation {
                label: f.label.clone(),
                text: recommendation_for(&f.label).to_string(),
            })
            .collect();

        Ok(PatientProfile {
            index: selection.index,
            total,
            dataset_label,
            score,
            level: RiskLevel::from_score(score),
            data,
            flags,
            comparison,
            recommendations,
        })
    }

    fn page(profile: &PatientProfile) -> Page {
        let mut page = Page::new(
            format!("Patient Profile: Patient #{} of {}", profile.index, profile.total),
            "Individual risk explorer",
        );

        let sub = match &profile.dataset_label {
            Some(label) => format!("{} (dataset label: {})", profile.level, label),
            None => profile.level.to_string(),
        };
        page.cards.push(
            StatCard::new("Risk Score", format!("{} / 100", profile.score), profile.level.tone()).with_sub(sub),
        );

        page.sections.push(Section {
            title: "Patient Data".to_string(),
            items: profile
                .data
                .iter()
                .map(|(label, value)| SectionItem::new(label.as_str(), value.as_str(), Tone::Neutral))
                .collect(),
        });

        let flags = if profile.flags.is_empty() {
            vec![SectionItem::new(
                "OK",
                "All indicators within normal range",
                Tone::Healthy,
            )]
        } else {
            profile
                .flags
                .iter()
                .map(|f| {
                    let tone = match f.severity {
                        Severity::High => Tone::Disease,
                        Severity::Medium => Tone::Warning,
                    };
                    let sign = if f.pct_diff > 0.0 { "+" } else { "" };
                    let value = format!("{} {}", format_number(f.value), f.unit);
                    SectionItem::new(
                        f.label.as_str(),
                        format!("{} · {}{:.0}% vs average", value.trim(), sign, f.pct_diff),
                        tone,
                    )
                })
                .collect()
        };
        page.sections.push(Section {
            title: "Risk Flags".to_string(),
            items: flags,
        });

        if !profile.comparison.is_empty() {
            page.charts.push(
                Chart::bars(
                    "Patient vs. Dataset Average",
                    profile.comparison.iter().map(|c| c.name.clone()).collect(),
                    vec![
                        Series::new("This Patient", Tone::Primary, profile.comparison.iter().map(|c| c.patient).collect()),
                        Series::new("Dataset Average", Tone::Muted, profile.comparison.iter().map(|c| c.average).collect()),
                    ],
                )
                .with_subtitle("Comparison across key clinical indicators"),
            );
        }

        if !profile.recommendations.is_empty() {
            page.sections.push(Section {
                title: "Actionable Recommendations".to_string(),
                items: profile
                    .recommendations
                    .iter()
                    .map(|r| SectionItem::new(r.label.as_str(), r.text.as_str(), Tone::Primary))
                    .collect(),
            });
        }

        page
    }
}

/// Mean of the positive numeric values of a column, 0 when there are none
fn dataset_average(dataset: &Dataset, column: &str) -> f64 {
    mean(dataset.rows.iter().filter_map(|r| r.number(column)).filter(|v| *v > 0.0)).unwrap_or(0.0)
}

fn display_value(patient: &Row, column: &str, unit: &str) -> String {
    match patient.get(column) {
        Some(value) if !value.is_empty() => format!("{} {}", value, unit).trim().to_string(),
        _ => "N/A".to_string(),
    }
}

/// Flag a benchmark that is out of its healthy range or more than 20%
/// away from the dataset average. Zero values and zero averages are skipped.
fn flag(benchmark: &Benchmark, value: f64, avg: f64) -> Option<RiskFlag> {
    if value == 0.0 || avg == 0.0 {
        return None;
    }

    let pct_diff = (value - avg) / avg * 100.0;
    let (min, max) = benchmark.healthy;
    let out_of_range = value < min || value > max;

    if !out_of_range && pct_diff.abs() <= 20.0 {
        return None;
    }

    let severity = if pct_diff.abs() > 30.0 || out_of_range {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(RiskFlag {
        label: benchmark.label.to_string(),
        value,
        unit: benchmark.unit.to_string(),
        pct_diff,
        severity,
        out_of_range,
    })
}

/// 25 per high flag, 15 per medium flag, 20 for a diseased label; capped at 100
pub fn risk_score(flags: &[RiskFlag], diseased: bool) -> u32 {
    let points: u32 = flags
        .iter()
        .map(|f| match f.severity {
            Severity::High => 25,
            Severity::Medium => 15,
        })
        .sum();
    let label = if diseased { 20 } else { 0 };
    (points + label).min(100)
}

fn recommendation_for(label: &str) -> &'static str {
    RECOMMENDATIONS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, text)| *text)
        .unwrap_or(DEFAULT_RECOMMENDATION)
}
