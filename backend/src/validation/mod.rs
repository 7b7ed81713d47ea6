//! Validation of raw weather CSV into a typed [`WeatherDataset`].
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the content parses as delimited text with a header row
//! 2. `Date`, `Temperature` and `Rainfall` columns exist (exact names)
//! 3. at least one data row follows the header
//! 4. every `Date` cell is a recognisable calendar date
//! 5. every `Temperature` cell is a finite number
//! 6. every `Rainfall` cell is a finite number
//!
//! Nothing downstream of [`validate_table`] re-checks these properties.
//!
//! # Example
//!
//! ```rust,ignore
//! use weatherstat::validate_text;
//!
//! let dataset = validate_text("Date,Temperature,Rainfall\n2024-01-01,3.5,0.2\n")?;
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.records()[0].month(), 1);
//! ```

pub mod dates;

use chrono::NaiveDate;

use crate::error::{
    ValidationError, ValidationResult, DATE_COLUMN, RAINFALL_COLUMN, TEMPERATURE_COLUMN,
};
use crate::models::{WeatherDataset, WeatherRecord};
use crate::parser::{parse_bytes_auto, parse_text_auto, RawRow, RawTable};

pub use dates::parse_date;

/// Columns every input must provide, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 3] = [DATE_COLUMN, TEMPERATURE_COLUMN, RAINFALL_COLUMN];

/// Validate raw CSV bytes (encoding and delimiter are auto-detected).
pub fn validate_bytes(bytes: &[u8]) -> ValidationResult<WeatherDataset> {
    let table = parse_bytes_auto(bytes)?;
    validate_table(&table)
}

/// Validate CSV text (delimiter is auto-detected).
pub fn validate_text(text: &str) -> ValidationResult<WeatherDataset> {
    let table = parse_text_auto(text)?;
    validate_table(&table)
}

/// Validate an already-parsed table.
pub fn validate_table(table: &RawTable) -> ValidationResult<WeatherDataset> {
    let missing = missing_columns(table);
    if !missing.is_empty() {
        return Err(ValidationError::MissingColumns(missing));
    }

    if table.rows.is_empty() {
        return Err(ValidationError::EmptyData);
    }

    // Each column is checked over every row before the next column, so a bad
    // date is reported even when a later row also has a bad temperature.
    let dates = table
        .rows
        .iter()
        .map(|row| date_cell(table, row))
        .collect::<ValidationResult<Vec<NaiveDate>>>()?;
    let temperatures = numeric_column(table, TEMPERATURE_COLUMN)?;
    let rainfall = numeric_column(table, RAINFALL_COLUMN)?;

    let records: Vec<WeatherRecord> = dates
        .into_iter()
        .zip(temperatures)
        .zip(rainfall)
        .map(|((date, temperature), rainfall)| WeatherRecord::new(date, temperature, rainfall))
        .collect();

    WeatherDataset::new(records).ok_or(ValidationError::EmptyData)
}

/// Required columns absent from the header, in [`REQUIRED_COLUMNS`] order.
pub fn missing_columns(table: &RawTable) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|col| !table.has_column(col))
        .map(|col| col.to_string())
        .collect()
}

/// Parse a numeric cell.
///
/// Accepts plain or signed decimals and exponent notation. Empty cells,
/// `NaN` and infinities are rejected.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn date_cell(table: &RawTable, row: &RawRow) -> ValidationResult<NaiveDate> {
    let value = table.cell(row, DATE_COLUMN).unwrap_or("");
    parse_date(value).ok_or_else(|| ValidationError::InvalidDate {
        column: DATE_COLUMN.to_string(),
        line: row.line,
        value: value.to_string(),
    })
}

fn numeric_column(table: &RawTable, column: &str) -> ValidationResult<Vec<f64>> {
    table
        .rows
        .iter()
        .map(|row| {
            let value = table.cell(row, column).unwrap_or("");
            parse_number(value).ok_or_else(|| ValidationError::InvalidNumeric {
                column: column.to_string(),
                line: row.line,
                value: value.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;

    #[test]
    fn test_valid_dataset() {
        let csv = "Date,Temperature,Rainfall,Station\n2024-01-15,3.5,0.2,A\n2024-02-01,-1.25,+4\n";
        let dataset = validate_text(csv).unwrap();

        assert_eq!(dataset.len(), 2);
        let first = &dataset.records()[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(first.temperature(), 3.5);
        assert_eq!(first.rainfall(), 0.2);
        assert_eq!(first.month(), 1);
        assert_eq!(dataset.records()[1].month(), 2);
        assert_eq!(dataset.records()[1].temperature(), -1.25);
        assert_eq!(dataset.records()[1].rainfall(), 4.0);
    }

    #[test]
    fn test_month_column_in_input_is_ignored() {
        let csv = "Date,Temperature,Rainfall,Month\n2024-07-04,25,0,1\n";
        let dataset = validate_text(csv).unwrap();
        assert_eq!(dataset.records()[0].month(), 7);
    }

    #[test]
    fn test_parse_error() {
        let err = validate_text("").unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::ParseError);

        let err = validate_text("Date,Temperature,Rainfall\n2024-01-01,1,2,3\n").unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::ParseError);
    }

    #[test]
    fn test_missing_all_columns_reported() {
        let err = validate_text("date,temp\n2024-01-01,3\n").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingColumns(vec![
                "Date".into(),
                "Temperature".into(),
                "Rainfall".into()
            ])
        );
    }

    #[test]
    fn test_missing_columns_checked_before_empty() {
        let err = validate_text("Date,Rainfall\n").unwrap_err();
        assert_eq!(err, ValidationError::MissingColumns(vec!["Temperature".into()]));
    }

    #[test]
    fn test_empty_data() {
        let err = validate_text("Date,Temperature,Rainfall\n").unwrap_err();
        assert_eq!(err, ValidationError::EmptyData);
    }

    #[test]
    fn test_invalid_date() {
        let csv = "Date,Temperature,Rainfall\n2024-01-01,1,0\nnot-a-date,abc,0\n";
        let err = validate_text(csv).unwrap_err();

        assert_eq!(err.kind(), ValidationErrorKind::InvalidDateError);
        assert_eq!(err.columns(), vec!["Date"]);
        assert!(matches!(err, ValidationError::InvalidDate { line: 3, .. }));
    }

    #[test]
    fn test_error_line_after_blank_line() {
        let csv = "Date,Temperature,Rainfall\n2024-01-01,1,0\n\nbad,2,0\n";
        let err = validate_text(csv).unwrap_err();

        assert!(matches!(err, ValidationError::InvalidDate { line: 4, .. }));
        assert!(err.to_string().contains("at line 4"));
    }

    #[test]
    fn test_error_line_with_crlf() {
        let csv = "Date,Temperature,Rainfall\r\n2024-01-01,1,0\r\n2024-01-02,x,0\r\n";
        let err = validate_bytes(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, ValidationError::InvalidNumeric { line: 3, .. }));
    }

    #[test]
    fn test_invalid_temperature() {
        let csv = "Date,Temperature,Rainfall\n2024-01-01,abc,x\n";
        let err = validate_text(csv).unwrap_err();

        assert_eq!(err.kind(), ValidationErrorKind::InvalidNumericError);
        assert_eq!(err.columns(), vec!["Temperature"]);
    }

    #[test]
    fn test_invalid_rainfall() {
        let csv = "Date,Temperature,Rainfall\n2024-01-01,1.5,\n";
        let err = validate_text(csv).unwrap_err();

        assert_eq!(err.columns(), vec!["Rainfall"]);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("+3"), Some(3.0));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1,000"), None);
        assert_eq!(parse_number("$5"), None);
    }

    #[test]
    fn test_validate_bytes_semicolon() {
        let dataset = validate_bytes(b"Date;Temperature;Rainfall\n15/03/2024;10,5;0\n");
        // "10,5" is not a decimal number
        assert!(matches!(
            dataset,
            Err(ValidationError::InvalidNumeric { .. })
        ));

        let dataset = validate_bytes(b"Date;Temperature;Rainfall\n15/03/2024;10.5;0\n").unwrap();
        assert_eq!(dataset.records()[0].month(), 3);
    }
}
