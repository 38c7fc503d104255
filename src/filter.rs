use crate::data::{Dataset, Row};
use crate::roles::RoleMapping;
use serde::{Deserialize, Serialize};

/// Slider domain used when the dataset has no usable age column
pub const DEFAULT_AGE_DOMAIN: (f64, f64) = (20.0, 80.0);

/// Interactive filter of the clinical view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalFilter {
    /// Inclusive age range; None means the full domain
    pub age: Option<(f64, f64)>,
    pub show_male: bool,
    pub show_female: bool,
    /// Some(true): with exercise angina only, Some(false): without only
    pub angina: Option<bool>,
}

impl Default for ClinicalFilter {
    fn default() -> Self {
        Self {
            age: None,
            show_male: true,
            show_female: true,
            angina: None,
        }
    }
}

impl ClinicalFilter {
    /// Does a row pass every engaged criterion?
    ///
    /// A criterion whose role is absent is skipped. Once a criterion is
    /// engaged, a row without a numeric cell for it fails, except that a
    /// sex outside {0, 1} passes while both sexes are shown.
    pub fn matches(&self, row: &Row, roles: &RoleMapping) -> bool {
        if let (Some((lo, hi)), Some(col)) = (self.age, roles.age()) {
            match row.number(col) {
                Some(age) if (lo..=hi).contains(&age) => {}
                _ => return false,
            }
        }

        if let Some(col) = roles.gender() {
            let shown = match row.number(col) {
                Some(sex) if sex == 1.0 => self.show_male,
                Some(sex) if sex == 0.0 => self.show_female,
                _ => self.show_male && self.show_female,
            };
            if !shown {
                return false;
            }
        }

        if let (Some(wanted), Some(col)) = (self.angina, roles.get(crate::roles::Role::ExerciseAngina)) {
            let expected = if wanted { 1.0 } else { 0.0 };
            if row.number(col) != Some(expected) {
                return false;
            }
        }

        true
    }

    /// Rows passing the filter, in dataset order
    pub fn apply<'a>(&self, dataset: &'a Dataset, roles: &RoleMapping) -> Vec<&'a Row> {
        dataset
            .rows
            .iter()
            .filter(|row| self.matches(row, roles))
            .collect()
    }
}

/// Min and max of the numeric ages, or the default domain
pub fn age_domain(dataset: &Dataset, roles: &RoleMapping) -> (f64, f64) {
    let Some(col) = roles.age() else {
        return DEFAULT_AGE_DOMAIN;
    };

    let mut ages = dataset.rows.iter().filter_map(|r| r.number(col)).peekable();
    if ages.peek().is_none() {
        return DEFAULT_AGE_DOMAIN;
    }
    ages.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), a| {
        (lo.min(a), hi.max(a))
    })
}
