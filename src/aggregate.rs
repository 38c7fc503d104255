//! Counting, bucketing and averaging primitives shared by the views.
//!
//! Every function here is a pure pass over the rows. Cells that are empty
//! or non-numeric are treated as absent: they never count as zero.

use crate::data::Row;
use serde::Serialize;

/// Disease / healthy counts for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCounts {
    pub name: String,
    pub disease: usize,
    pub healthy: usize,
}

impl StatusCounts {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            disease: 0,
            healthy: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.disease + self.healthy
    }
}

/// Plain count for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Fixed numeric breakpoints: a value lands in the first bucket whose
/// bound it is below, or in the open-ended last bucket.
#[derive(Debug, Clone, Copy)]
pub struct BucketScheme {
    pub bounds: &'static [(f64, &'static str)],
    pub last: &'static str,
}

impl BucketScheme {
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bounds.iter().map(|(_, l)| *l).chain(std::iter::once(self.last))
    }

    pub fn index_of(&self, value: f64) -> usize {
        self.bounds
            .iter()
            .position(|(bound, _)| value < *bound)
            .unwrap_or(self.bounds.len())
    }
}

pub const AGE_BUCKETS: BucketScheme = BucketScheme {
    bounds: &[(40.0, "<40"), (50.0, "40–49"), (60.0, "50–59"), (70.0, "60–69")],
    last: "70+",
};

pub const RESTING_BP_BUCKETS: BucketScheme = BucketScheme {
    bounds: &[
        (110.0, "<110"),
        (130.0, "110–129"),
        (140.0, "130–139"),
        (160.0, "140–159"),
    ],
    last: "160+",
};

pub const CHOLESTEROL_BUCKETS: BucketScheme = BucketScheme {
    bounds: &[(200.0, "Normal (<200)"), (240.0, "Borderline (200–239)")],
    last: "High (240+)",
};

/// Target value is exactly 1
pub fn is_diseased(row: &Row, target: &str) -> bool {
    row.number(target) == Some(1.0)
}

/// Target value is exactly 0
pub fn is_healthy(row: &Row, target: &str) -> bool {
    row.number(target) == Some(0.0)
}

/// Number of rows labeled diseased
pub fn count_diseased(rows: &[&Row], target: &str) -> usize {
    rows.iter().filter(|r| is_diseased(r, target)).count()
}

/// Plain bucket counts; every bucket appears, non-numeric values skipped
pub fn bucket_counts(rows: &[&Row], column: &str, scheme: &BucketScheme) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = scheme
        .labels()
        .map(|name| CategoryCount {
            name: name.to_string(),
            count: 0,
        })
        .collect();

    for value in rows.iter().filter_map(|r| r.number(column)) {
        counts[scheme.index_of(value)].count += 1;
    }
    counts
}

/// Bucket counts split by disease status
pub fn bucket_by_status(
    rows: &[&Row],
    column: &str,
    target: &str,
    scheme: &BucketScheme,
) -> Vec<StatusCounts> {
    let mut counts: Vec<StatusCounts> = scheme.labels().map(StatusCounts::new).collect();

    for row in rows {
        let Some(value) = row.number(column) else {
            continue;
        };
        let slot = &mut counts[scheme.index_of(value)];
        if is_diseased(row, target) {
            slot.disease += 1;
        } else {
            slot.healthy += 1;
        }
    }
    counts
}

/// Two fixed groups: rows whose flag column equals 1, then all others
pub fn binary_by_status(
    rows: &[&Row],
    column: &str,
    target: &str,
    positive: &str,
    negative: &str,
) -> Vec<StatusCounts> {
    let mut yes = StatusCounts::new(positive);
    let mut no = StatusCounts::new(negative);

    for row in rows {
        let group = if row.number(column) == Some(1.0) {
            &mut yes
        } else {
            &mut no
        };
        if is_diseased(row, target) {
            group.disease += 1;
        } else {
            group.healthy += 1;
        }
    }
    vec![yes, no]
}

/// Group rows by a label derived from a column, in order of first
/// appearance. Without a target every row counts as healthy.
pub fn breakdown_by_category<F>(
    rows: &[&Row],
    column: &str,
    target: Option<&str>,
    labeler: F,
) -> Vec<StatusCounts>
where
    F: Fn(Option<f64>) -> String,
{
    let mut groups: Vec<StatusCounts> = Vec::new();

    for row in rows {
        let label = labeler(row.number(column));
        let idx = match groups.iter().position(|g| g.name == label) {
            Some(idx) => idx,
            None => {
                groups.push(StatusCounts::new(label));
                groups.len() - 1
            }
        };
        if target.is_some_and(|t| is_diseased(row, t)) {
            groups[idx].disease += 1;
        } else {
            groups[idx].healthy += 1;
        }
    }
    groups
}

/// Label a numeric code through a lookup table, falling back to
/// `"{prefix} {n}"` for unmapped numbers and "Unknown" for text
pub fn code_label(code: Option<f64>, table: &[(f64, &str)], prefix: &str) -> String {
    match code {
        Some(n) => table
            .iter()
            .find(|(k, _)| *k == n)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| format!("{} {}", prefix, crate::data::format_number(n))),
        None => "Unknown".to_string(),
    }
}

/// Arithmetic mean, None when empty
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

/// Mean of the numeric values of a column
pub fn column_mean(rows: &[&Row], column: &str) -> Option<f64> {
    mean(rows.iter().filter_map(|r| r.number(column)))
}

/// Round to one decimal place
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// `part / total` as a percentage with one decimal, e.g. `30.0%`
pub fn format_percent(part: usize, total: usize) -> Option<String> {
    if total == 0 {
        return None;
    }
    let pct = part as f64 / total as f64 * 100.0;
    Some(format!("{:.1}%", round1(pct)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn rows(cols: &[&str], data: &[&[f64]]) -> Vec<Row> {
        data.iter()
            .map(|vals| {
                let mut row = Row::new();
                for (c, v) in cols.iter().zip(vals.iter()) {
                    row.insert(c, Value::Number(*v));
                }
                row
            })
            .collect()
    }

    #[test]
    fn test_age_buckets() {
        let data = rows(&["age"], &[&[35.0], &[45.0], &[65.0], &[71.0]]);
        let refs: Vec<&Row> = data.iter().collect();
        let counts = bucket_counts(&refs, "age", &AGE_BUCKETS);
        let got: Vec<(&str, usize)> = counts.iter().map(|c| (c.name.as_str(), c.count)).collect();
        assert_eq!(
            got,
            vec![("<40", 1), ("40–49", 1), ("50–59", 0), ("60–69", 1), ("70+", 1)]
        );
    }

    #[test]
    fn test_bucket_boundaries_are_exclusive_upper() {
        assert_eq!(AGE_BUCKETS.index_of(39.9), 0);
        assert_eq!(AGE_BUCKETS.index_of(40.0), 1);
        assert_eq!(AGE_BUCKETS.index_of(70.0), 4);
        assert_eq!(RESTING_BP_BUCKETS.index_of(160.0), 4);
        assert_eq!(CHOLESTEROL_BUCKETS.index_of(239.0), 1);
    }

    #[test]
    fn test_bucket_skips_non_numeric() {
        let mut blank = Row::new();
        blank.insert("age", Value::Text(String::new()));
        let data = [blank];
        let refs: Vec<&Row> = data.iter().collect();
        let counts = bucket_counts(&refs, "age", &AGE_BUCKETS);
        assert!(counts.iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_bucket_by_status() {
        let data = rows(
            &["chol", "target"],
            &[&[180.0, 1.0], &[210.0, 0.0], &[250.0, 1.0], &[300.0, 1.0]],
        );
        let refs: Vec<&Row> = data.iter().collect();
        let counts = bucket_by_status(&refs, "chol", "target", &CHOLESTEROL_BUCKETS);
        assert_eq!(counts[0], StatusCounts { name: "Normal (<200)".into(), disease: 1, healthy: 0 });
        assert_eq!(counts[1], StatusCounts { name: "Borderline (200–239)".into(), disease: 0, healthy: 1 });
        assert_eq!(counts[2], StatusCounts { name: "High (240+)".into(), disease: 2, healthy: 0 });
    }

    #[test]
    fn test_binary_by_status() {
        let data = rows(
            &["exang", "target"],
            &[&[1.0, 1.0], &[1.0, 0.0], &[0.0, 0.0], &[0.0, 0.0]],
        );
        let refs: Vec<&Row> = data.iter().collect();
        let groups = binary_by_status(&refs, "exang", "target", "With", "Without");
        assert_eq!(groups[0].disease, 1);
        assert_eq!(groups[0].healthy, 1);
        assert_eq!(groups[1].total(), 2);
    }

    #[test]
    fn test_breakdown_first_appearance_order() {
        let data = rows(&["cp", "target"], &[&[2.0, 1.0], &[0.0, 0.0], &[2.0, 0.0], &[7.0, 1.0]]);
        let refs: Vec<&Row> = data.iter().collect();
        let table = [(0.0, "Zero"), (2.0, "Two")];
        let groups = breakdown_by_category(&refs, "cp", Some("target"), |c| code_label(c, &table, "Type"));
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Two", "Zero", "Type 7"]);
        assert_eq!(groups[0].disease, 1);
        assert_eq!(groups[0].healthy, 1);
    }

    #[test]
    fn test_breakdown_without_target_counts_healthy() {
        let data = rows(&["cp"], &[&[1.0], &[1.0]]);
        let refs: Vec<&Row> = data.iter().collect();
        let groups = breakdown_by_category(&refs, "cp", None, |c| code_label(c, &[], "Type"));
        assert_eq!(groups, vec![StatusCounts { name: "Type 1".into(), disease: 0, healthy: 2 }]);
    }

    #[test]
    fn test_code_label_fallbacks() {
        assert_eq!(code_label(Some(1.5), &[], "Slope"), "Slope 1.5");
        assert_eq!(code_label(None, &[], "Slope"), "Unknown");
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(vec![1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mean(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(245.04), 245.0);
        assert_eq!(round1(1.25), 1.3);
        assert_eq!(round1(-0.04), -0.0);
    }

    #[test]
    fn test_prevalence_format() {
        assert_eq!(format_percent(3, 10).as_deref(), Some("30.0%"));
        assert_eq!(format_percent(1, 3).as_deref(), Some("33.3%"));
        assert_eq!(format_percent(2, 3).as_deref(), Some("66.7%"));
        assert_eq!(format_percent(0, 0), None);
    }
}
