//! End-to-end checks of the validate → analyze flow through the public API.

use weatherstat::analysis::stats::mode_or_median;
use weatherstat::{
    analyze, analyze_bytes, analyze_file, analyze_text, validate_bytes, validate_text,
    AnovaResult, PipelineError, ValidationError, ValidationErrorKind,
};

const TWO_SEASONS: &str = "\
Date,Temperature,Rainfall,Station
2024-01-01,1.0,3.2,north
2024-01-02,2.0,0.0,north
2024-01-03,3.0,1.1,north
2024-06-01,25.0,0.0,north
2024-06-02,26.0,0.4,north
2024-06-03,27.0,0.0,north
";

#[test]
fn missing_columns_are_named_exactly() {
    let err = validate_text("Date,Temp\n2024-01-01,3\n").unwrap_err();

    assert_eq!(
        err,
        ValidationError::MissingColumns(vec!["Temperature".into(), "Rainfall".into()])
    );
    assert_eq!(err.kind(), ValidationErrorKind::MissingColumnsError);
    assert_eq!(err.columns(), vec!["Temperature", "Rainfall"]);
}

#[test]
fn header_only_is_empty_data() {
    let err = validate_text("Date,Temperature,Rainfall\n").unwrap_err();
    assert_eq!(err, ValidationError::EmptyData);
}

#[test]
fn blank_input_is_parse_error() {
    let err = validate_bytes(b"").unwrap_err();
    assert_eq!(err.kind(), ValidationErrorKind::ParseError);
}

#[test]
fn bad_date_is_reported_on_date_column() {
    let err = validate_text("Date,Temperature,Rainfall\nnot-a-date,3,0\n").unwrap_err();

    assert_eq!(err.kind(), ValidationErrorKind::InvalidDateError);
    assert_eq!(err.columns(), vec!["Date"]);
}

#[test]
fn bad_temperature_is_reported_on_temperature_column() {
    let err = validate_text("Date,Temperature,Rainfall\n2024-01-01,abc,0\n").unwrap_err();

    assert_eq!(err.kind(), ValidationErrorKind::InvalidNumericError);
    assert_eq!(err.columns(), vec!["Temperature"]);
}

#[test]
fn date_errors_win_over_later_numeric_errors() {
    let csv = "Date,Temperature,Rainfall\n2024-01-01,abc,0\nyesterday,3,0\n";
    let err = validate_text(csv).unwrap_err();
    assert_eq!(err.kind(), ValidationErrorKind::InvalidDateError);
}

#[test]
fn monthly_summary_months_are_distinct_and_ascending() {
    let csv = "Date,Temperature,Rainfall\n\
               2024-03-05,10,0\n\
               2024-01-05,2,0\n\
               2024-03-06,12,1\n\
               2023-01-09,4,0\n";
    let result = analyze(&validate_text(csv).unwrap()).unwrap();

    let months: Vec<u32> = result.monthly_summary.iter().map(|m| m.month).collect();
    assert_eq!(months, vec![1, 3]);
    // January pools both years
    assert_eq!(result.monthly_summary[0].mean, 3.0);
}

#[test]
fn analysis_is_deterministic() {
    let dataset = validate_text(TWO_SEASONS).unwrap();

    let first = serde_json::to_string(&analyze(&dataset).unwrap()).unwrap();
    let second = serde_json::to_string(&analyze(&dataset).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn mode_falls_back_to_median_when_all_unique() {
    assert_eq!(mode_or_median(&[1.0, 2.0, 3.0]), 2.0);

    let csv = "Date,Temperature,Rainfall\n2024-01-01,1,0\n2024-01-02,2,0\n2024-01-03,3,0\n";
    let result = analyze(&validate_text(csv).unwrap()).unwrap();
    assert_eq!(result.temperature_summary.mode, 2.0);
}

#[test]
fn single_month_gives_neutral_anova() {
    let csv = "Date,Temperature,Rainfall\n\
               2024-05-01,11,0\n\
               2024-05-02,14,2\n\
               2024-05-03,9,0\n";
    let result = analyze(&validate_text(csv).unwrap()).unwrap();

    assert_eq!(result.anova, AnovaResult::neutral());
    assert_eq!(result.anova.f_statistic, 0.0);
    assert_eq!(result.anova.p_value, 1.0);
    assert!(!result.anova.significant);
}

#[test]
fn separated_months_are_significant() {
    let result = analyze(&validate_text(TWO_SEASONS).unwrap()).unwrap();

    assert!(result.anova.significant);
    assert!(result.anova.p_value < 0.05);
    // SSB = 864, SSW = 4, F = 864 / (4 / 4)
    assert_eq!(result.anova.f_statistic, 864.0);
}

#[test]
fn means_round_half_away_from_zero() {
    let csv = "Date,Temperature,Rainfall\n2024-01-01,10.123,0\n2024-01-02,10.127,0\n";
    let result = analyze(&validate_text(csv).unwrap()).unwrap();
    assert_eq!(result.temperature_summary.mean, 10.13);
}

#[test]
fn single_record_std_serializes_as_null() {
    let csv = "Date,Temperature,Rainfall\n2024-01-01,7.5,0\n";
    let result = analyze(&validate_text(csv).unwrap()).unwrap();

    assert!(result.temperature_summary.standard_deviation.is_nan());
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["temperature_summary"]["standard_deviation"].is_null());
    assert_eq!(json["temperature_summary"]["mean"], 7.5);
}

#[test]
fn semicolon_latin1_upload() {
    // "Température" column is extra and ignored; ISO-8859-1 é = 0xE9
    let mut bytes = b"Date;Temperature;Rainfall;Temp\xE9rature\n".to_vec();
    bytes.extend_from_slice(b"01/15/2024;-2.0;0;x\n");
    bytes.extend_from_slice(b"02/15/2024;4.5;1.5;y\n");

    let report = analyze_bytes(&bytes).unwrap();
    assert_eq!(report.source.delimiter, ';');
    assert_eq!(report.analysis.record_count, 2);
    assert_eq!(report.analysis.temperature_summary.mean, 1.25);
}

#[test]
fn pipeline_surfaces_validation_errors() {
    let err = analyze_text("Date,Temperature,Rainfall\n2024-01-01,1,wet\n").unwrap_err();
    match err {
        PipelineError::Validation(v) => assert_eq!(v.columns(), vec!["Rainfall"]),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn analyze_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weather.csv");
    std::fs::write(&path, TWO_SEASONS).unwrap();

    let report = analyze_file(&path).unwrap();
    assert_eq!(report.source.headers.len(), 4);
    assert_eq!(report.analysis.charts.temperature_trend.series.y.len(), 6);
    assert_eq!(report.analysis.charts.monthly_average.series.y, vec![2.0, 26.0]);
}
