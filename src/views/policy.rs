// Policy view: population-level trends over the whole dataset

use super::View;
use crate::aggregate::{
    binary_by_status, breakdown_by_category, bucket_by_status, code_label, StatusCounts,
    CHOLESTEROL_BUCKETS, RESTING_BP_BUCKETS,
};
use crate::data::{Dataset, Row};
use crate::error::ViewError;
use crate::ir::{status_bars, Page};
use crate::roles::{Role, RoleMapping};
use serde::Serialize;

pub const SLOPE_LABELS: &[(f64, &str)] = &[(0.0, "Upsloping"), (1.0, "Flat"), (2.0, "Downsloping")];

pub struct PolicyView;

#[derive(Debug, Clone, Serialize)]
pub struct PolicyStats {
    pub exercise_angina: Option<Vec<StatusCounts>>,
    pub fasting_blood_sugar: Option<Vec<StatusCounts>>,
    pub resting_bp: Option<Vec<StatusCounts>>,
    pub cholesterol: Option<Vec<StatusCounts>>,
    pub st_slope: Option<Vec<StatusCounts>>,
}

impl View for PolicyView {
    type State = ();
    type Output = PolicyStats;

    const NAME: &'static str = "policy";

    fn compute(dataset: &Dataset, roles: &RoleMapping, _state: &()) -> Result<PolicyStats, ViewError> {
        let rows: Vec<&Row> = dataset.rows.iter().collect();

        // every chart here needs the disease label
        let Some(target) = roles.target() else {
            return Ok(PolicyStats {
                exercise_angina: None,
                fasting_blood_sugar: None,
                resting_bp: None,
                cholesterol: None,
                st_slope: None,
            });
        };

        Ok(PolicyStats {
            exercise_angina: roles
                .get(Role::ExerciseAngina)
                .map(|c| binary_by_status(&rows, c, target, "With Angina", "No Angina")),
            fasting_blood_sugar: roles
                .get(Role::FastingBs)
                .map(|c| binary_by_status(&rows, c, target, "FBS > 120 mg/dl", "FBS ≤ 120 mg/dl")),
            resting_bp: roles
                .get(Role::RestingBp)
                .map(|c| bucket_by_status(&rows, c, target, &RESTING_BP_BUCKETS)),
            cholesterol: roles
                .get(Role::Cholesterol)
                .map(|c| bucket_by_status(&rows, c, target, &CHOLESTEROL_BUCKETS)),
            st_slope: roles.get(Role::StSlope).map(|c| {
                breakdown_by_category(&rows, c, Some(target), |code| code_label(code, SLOPE_LABELS, "Slope"))
            }),
        })
    }

    fn page(stats: &PolicyStats) -> Page {
        let mut page = Page::new("Policy View", "Population-level trends");

        let charts = [
            (&stats.exercise_angina, "Exercise Angina vs. Disease Prevalence", "Heart Disease", "No Disease"),
            (&stats.fasting_blood_sugar, "Fasting Blood Sugar Impact", "Heart Disease", "No Disease"),
            (
                &stats.resting_bp,
                "Resting Blood Pressure Distribution by Disease Status",
                "Heart Disease",
                "No Disease",
            ),
            (&stats.cholesterol, "Cholesterol Levels vs. Disease Rate", "Disease", "Healthy"),
            (&stats.st_slope, "ST Slope (Activity Proxy) vs. Disease", "Disease", "Healthy"),
        ];

        for (counts, title, disease, healthy) in charts {
            if let Some(counts) = counts {
                page.charts.push(status_bars(title, counts, disease, healthy));
            }
        }

        page
    }
}
