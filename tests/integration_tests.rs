use std::fs;
use std::process::Command;

/// Run the cardioinsight binary and capture its output
fn run_cardioinsight(args: &[&str]) -> Result<String, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_cardioinsight"))
        .args(args)
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--format", "json"];
    full.extend_from_slice(args);
    let stdout = run_cardioinsight(&full).expect("command failed");
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

#[test]
fn test_end_to_end_overview_json() {
    let stats = run_json(&["overview", "test/heart.csv"]);
    assert_eq!(stats["total"], 12);
    assert_eq!(stats["with_disease"], 8);
    assert_eq!(stats["prevalence"], "66.7%");
    assert_eq!(stats["age_distribution"].as_array().unwrap().len(), 5);
}

#[test]
fn test_end_to_end_overview_text() {
    let out = run_cardioinsight(&["overview", "test/heart.csv"]).unwrap();
    assert!(out.contains("Overview"));
    assert!(out.contains("Total Patients"));
    assert!(out.contains("66.7%"));
    assert!(out.contains("Gender Breakdown by Disease Status"));
}

#[test]
fn test_end_to_end_columns() {
    let report = run_json(&["columns", "test/heart.csv"]);
    assert_eq!(report["rows"], 12);
    assert_eq!(report["roles"]["resting_bp"], "trestbps");
    assert_eq!(report["roles"]["max_hr"], "thalach");
    assert!(report["roles"]["bmi"].is_null());
}

#[test]
fn test_end_to_end_clinical_filter() {
    let stats = run_json(&[
        "clinical",
        "test/heart.csv",
        "--no-female",
        "--angina",
        "without",
    ]);
    assert_eq!(stats["shown"], 6);
    assert_eq!(stats["age_domain"][0], 37.0);
    assert_eq!(stats["age_domain"][1], 67.0);
}

#[test]
fn test_end_to_end_clinical_age_range() {
    let stats = run_json(&["clinical", "test/heart.csv", "--age-min", "60"]);
    // 63, 67, 67, 62, 63
    assert_eq!(stats["shown"], 5);
}

#[test]
fn test_end_to_end_policy() {
    let stats = run_json(&["policy", "test/heart.csv"]);
    let angina = stats["exercise_angina"].as_array().unwrap();
    assert_eq!(angina[0]["name"], "With Angina");
    assert_eq!(angina[0]["disease"], 1);
    assert_eq!(angina[0]["healthy"], 2);
}

#[test]
fn test_end_to_end_patient() {
    let profile = run_json(&["patient", "test/heart.csv", "--patient", "2"]);
    assert_eq!(profile["index"], 2);
    assert_eq!(profile["total"], 12);
    assert_eq!(profile["dataset_label"], "Heart Disease");
}

#[test]
fn test_end_to_end_patient_out_of_range() {
    let result = run_cardioinsight(&["patient", "test/heart.csv", "--patient", "99"]);
    let stderr = result.unwrap_err();
    assert!(stderr.contains("does not exist"), "stderr: {}", stderr);
}

#[test]
fn test_end_to_end_non_csv_rejected() {
    let stderr = run_cardioinsight(&["overview", "test/heart.txt"]).unwrap_err();
    assert!(stderr.contains("Please upload a CSV file"), "stderr: {}", stderr);
}

#[test]
fn test_end_to_end_header_only_rejected() {
    let stderr = run_cardioinsight(&["overview", "test/header_only.csv"]).unwrap_err();
    assert!(
        stderr.contains("CSV must have a header and at least one data row."),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_end_to_end_missing_file() {
    assert!(run_cardioinsight(&["overview", "test/does_not_exist.csv"]).is_err());
}

#[test]
fn test_end_to_end_chart_files() {
    let dir = std::env::temp_dir().join(format!("cardioinsight-e2e-{}", std::process::id()));
    let dir_str = dir.to_string_lossy().to_string();

    run_cardioinsight(&["--charts", &dir_str, "overview", "test/heart.csv"]).unwrap();

    let png = fs::read(dir.join("age-distribution.png")).expect("chart not written");
    assert!(is_valid_png(&png), "Output is not a valid PNG");
    assert!(dir.join("heart-disease-prevalence.png").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_end_to_end_svg_charts() {
    let dir = std::env::temp_dir().join(format!("cardioinsight-e2e-svg-{}", std::process::id()));
    let dir_str = dir.to_string_lossy().to_string();

    run_cardioinsight(&[
        "--charts",
        &dir_str,
        "--image-format",
        "svg",
        "--width",
        "640",
        "policy",
        "test/heart.csv",
    ])
    .unwrap();

    let svg = fs::read_to_string(dir.join("fasting-blood-sugar-impact.svg")).unwrap();
    assert!(svg.contains("<svg"));

    fs::remove_dir_all(&dir).unwrap();
}
