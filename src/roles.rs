//! Heuristic mapping of clinical roles onto dataset columns.
//!
//! Each role has a list of candidate substrings. A column plays a role
//! when its lowercased name contains any of the role's candidates; the
//! first such column in header order wins.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Bumped whenever [`CANDIDATES`] changes, since chart output depends on it
pub const CANDIDATE_TABLE_VERSION: u32 = 1;

/// Canonical clinical meaning of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Age,
    Gender,
    Cholesterol,
    RestingBp,
    MaxHr,
    Target,
    ChestPain,
    FastingBs,
    ExerciseAngina,
    StSlope,
    Oldpeak,
    Bmi,
}

impl Role {
    pub const ALL: [Role; 12] = [
        Role::Age,
        Role::Gender,
        Role::Cholesterol,
        Role::RestingBp,
        Role::MaxHr,
        Role::Target,
        Role::ChestPain,
        Role::FastingBs,
        Role::ExerciseAngina,
        Role::StSlope,
        Role::Oldpeak,
        Role::Bmi,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Role::Age => "age",
            Role::Gender => "gender",
            Role::Cholesterol => "cholesterol",
            Role::RestingBp => "resting_bp",
            Role::MaxHr => "max_hr",
            Role::Target => "target",
            Role::ChestPain => "chest_pain",
            Role::FastingBs => "fasting_bs",
            Role::ExerciseAngina => "exercise_angina",
            Role::StSlope => "st_slope",
            Role::Oldpeak => "oldpeak",
            Role::Bmi => "bmi",
        }
    }

    pub fn candidates(self) -> &'static [&'static str] {
        CANDIDATES
            .iter()
            .find(|(role, _)| *role == self)
            .map(|(_, c)| *c)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Role -> candidate substrings, in canonical role order
pub const CANDIDATES: &[(Role, &[&str])] = &[
    (Role::Age, &["age"]),
    (Role::Gender, &["sex", "gender"]),
    (Role::Cholesterol, &["chol", "cholesterol"]),
    (
        Role::RestingBp,
        &["trestbps", "restingbp", "resting_bp", "blood_pressure", "bp"],
    ),
    (
        Role::MaxHr,
        &["thalach", "maxhr", "max_hr", "max heart rate", "thalach"],
    ),
    (
        Role::Target,
        &["target", "heart_disease", "heartdisease", "disease", "num", "condition"],
    ),
    (
        Role::ChestPain,
        &["cp", "chest_pain", "chestpain", "chest pain"],
    ),
    (
        Role::FastingBs,
        &["fbs", "fasting_bs", "fasting_blood_sugar"],
    ),
    (
        Role::ExerciseAngina,
        &["exang", "exercise_angina", "exerciseangina"],
    ),
    (Role::StSlope, &["slope", "st_slope", "stslope"]),
    (Role::Oldpeak, &["oldpeak", "st_depression"]),
    (Role::Bmi, &["bmi", "body_mass"]),
];

/// Cleveland Heart Disease columns the dashboard is built around
pub const EXPECTED_COLUMNS: &[(&str, &str)] = &[
    ("age", "Patient age (years)"),
    ("sex", "Gender (0=Female, 1=Male)"),
    ("cp", "Chest pain type (0–3)"),
    ("trestbps", "Resting blood pressure"),
    ("chol", "Serum cholesterol (mg/dl)"),
    ("fbs", "Fasting blood sugar >120"),
    ("thalach", "Max heart rate achieved"),
    ("exang", "Exercise-induced angina"),
    ("oldpeak", "ST depression"),
    ("target", "Heart disease (0=No, 1=Yes)"),
];

/// Resolved column for every role (None = absent)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMapping {
    entries: Vec<(Role, Option<String>)>,
}

impl RoleMapping {
    pub fn get(&self, role: Role) -> Option<&str> {
        self.entries
            .iter()
            .find(|(r, _)| *r == role)
            .and_then(|(_, col)| col.as_deref())
    }

    pub fn has(&self, role: Role) -> bool {
        self.get(role).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, Option<&str>)> {
        self.entries.iter().map(|(r, c)| (*r, c.as_deref()))
    }

    pub fn age(&self) -> Option<&str> {
        self.get(Role::Age)
    }

    pub fn gender(&self) -> Option<&str> {
        self.get(Role::Gender)
    }

    pub fn target(&self) -> Option<&str> {
        self.get(Role::Target)
    }
}

impl Serialize for RoleMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (role, col) in &self.entries {
            map.serialize_entry(role.key(), col)?;
        }
        map.end()
    }
}

/// Detect the clinical role of each column by substring matching
pub fn detect_columns(columns: &[String]) -> RoleMapping {
    let lower: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();

    let entries = CANDIDATES
        .iter()
        .map(|(role, candidates)| {
            let found = lower
                .iter()
                .position(|c| candidates.iter().any(|cand| c.contains(cand)))
                .map(|idx| columns[idx].clone());
            (*role, found)
        })
        .collect();

    RoleMapping { entries }
}
