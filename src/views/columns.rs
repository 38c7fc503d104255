// Column report: which clinical role each header was matched to

use super::View;
use crate::data::Dataset;
use crate::error::ViewError;
use crate::ir::{Page, Section, SectionItem, StatCard, Tone};
use crate::roles::{RoleMapping, CANDIDATE_TABLE_VERSION, EXPECTED_COLUMNS};
use serde::Serialize;

pub struct ColumnsView;

#[derive(Debug, Clone, Serialize)]
pub struct ExpectedColumn {
    pub name: String,
    pub description: String,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub filename: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub candidate_table_version: u32,
    pub roles: RoleMapping,
    pub expected: Vec<ExpectedColumn>,
}

impl View for ColumnsView {
    type State = ();
    type Output = ColumnReport;

    const NAME: &'static str = "columns";

    fn compute(dataset: &Dataset, roles: &RoleMapping, _state: &()) -> Result<ColumnReport, ViewError> {
        let lower: Vec<String> = dataset.columns.iter().map(|c| c.to_lowercase()).collect();
        let expected = EXPECTED_COLUMNS
            .iter()
            .map(|(name, description)| ExpectedColumn {
                name: name.to_string(),
                description: description.to_string(),
                present: lower.iter().any(|c| c == name),
            })
            .collect();

        Ok(ColumnReport {
            filename: dataset.filename.clone(),
            rows: dataset.len(),
            columns: dataset.columns.clone(),
            candidate_table_version: CANDIDATE_TABLE_VERSION,
            roles: roles.clone(),
            expected,
        })
    }

    fn page(report: &ColumnReport) -> Page {
        let mut page = Page::new("Detected Columns", report.filename.as_str());

        page.cards.push(StatCard::new("Patients", report.rows.to_string(), Tone::Primary));
        page.cards.push(StatCard::new("Columns", report.columns.len().to_string(), Tone::Teal));
        page.cards.push(StatCard::new(
            "Roles Detected",
            format!(
                "{} / {}",
                report.roles.iter().filter(|(_, c)| c.is_some()).count(),
                report.roles.iter().count()
            ),
            Tone::Warning,
        ));

        page.sections.push(Section {
            title: format!("Detected roles (candidate table v{})", report.candidate_table_version),
            items: report
                .roles
                .iter()
                .map(|(role, column)| match column {
                    Some(col) => SectionItem::new(role.key(), col, Tone::Healthy),
                    None => SectionItem::new(role.key(), "not found", Tone::Muted),
                })
                .collect(),
        });

        page.sections.push(Section {
            title: "Expected columns (Cleveland Heart Disease format)".to_string(),
            items: report
                .expected
                .iter()
                .map(|e| {
                    let tone = if e.present { Tone::Healthy } else { Tone::Muted };
                    SectionItem::new(e.name.as_str(), e.description.as_str(), tone)
                })
                .collect(),
        });

        page
    }
}
