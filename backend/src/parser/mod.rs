//! CSV reader with encoding and delimiter auto-detection.
//!
//! Turns raw upload bytes into a [`RawTable`]: untyped string cells keyed by
//! header. No weather-specific logic here; type checks live in
//! [`crate::validation`].

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::ValidationError;

/// CSV parsing error with context
#[derive(Debug, Clone, PartialEq)]
pub struct CsvError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl From<CsvError> for ValidationError {
    fn from(err: CsvError) -> Self {
        ValidationError::Parse(err.to_string())
    }
}

/// One data row of a [`RawTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Line number in the source text (the header is line 1).
    pub line: usize,
    /// Cells in header order; short rows are padded with empty strings.
    pub cells: Vec<String>,
}

/// Parsed but untyped CSV content.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column headers, in file order.
    pub headers: Vec<String>,
    /// Data rows, in file order.
    pub rows: Vec<RawRow>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

impl RawTable {
    /// Position of a column by exact (case-sensitive) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value of `row` in column `name`.
    pub fn cell<'a>(&self, row: &'a RawRow, name: &str) -> Option<&'a str> {
        self.column_index(name)
            .and_then(|i| row.cells.get(i))
            .map(String::as_str)
    }

    /// Rows as JSON objects keyed by header, for debugging output.
    pub fn to_json_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .headers
                    .iter()
                    .zip(row.cells.iter())
                    .map(|(h, v)| (h.clone(), Value::String(v.clone())))
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 (with or without BOM) is taken as is; anything else is
/// handed to chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// The label is resolved with the WHATWG rules, so `iso-8859-1` decodes as
/// windows-1252. UTF-8 input has its byte order mark removed; unknown labels
/// fall back to windows-1252, which never fails on single bytes.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let codec = encoding_rs::Encoding::for_label(encoding.trim().as_bytes())
        .unwrap_or(encoding_rs::WINDOWS_1252);
    codec.decode(bytes).0.into_owned()
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Falls back to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let header = content
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for sep in [',', ';', '\t', '|'] {
        let count = header.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter.
///
/// Cells and headers are trimmed. Lines whose cells are all empty are
/// skipped. A row with more cells than the header is a parse error.
pub fn parse_table(
    content: &str,
    delimiter: char,
    encoding: impl Into<String>,
) -> Result<RawTable, CsvError> {
    if content.trim().is_empty() {
        return Err(CsvError::new(1, "Empty CSV file"));
    }

    let delimiter_byte = u8::try_from(delimiter)
        .map_err(|_| CsvError::new(1, format!("Unsupported delimiter '{}'", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvError::new(1, format!("Cannot read header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(CsvError::new(1, "No headers found"));
    }

    let mut rows = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let fallback_line = idx + 2; // +1 for 0-index, +1 for header

        let record = result.map_err(|e| {
            let line = e
                .position()
                .map(|p| source_line(content, p.byte()))
                .unwrap_or(fallback_line);
            CsvError::new(line, format!("Cannot read line: {}", e))
        })?;

        let line = record
            .position()
            .map(|p| source_line(content, p.byte()))
            .unwrap_or(fallback_line);

        if record.iter().all(str::is_empty) {
            continue;
        }

        if record.len() > headers.len() {
            return Err(CsvError::new(
                line,
                format!("Expected {} fields, saw {}", headers.len(), record.len()),
            ));
        }

        let cells = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();

        rows.push(RawRow { line, cells });
    }

    Ok(RawTable {
        headers,
        rows,
        encoding: encoding.into(),
        delimiter,
    })
}

/// 1-based line of the record starting at byte offset `byte`.
///
/// The reader reports the offset where it started looking for the record,
/// which sits before any blank lines it skipped. Those are stepped over
/// first. `\r\n`, `\n` and lone `\r` each count as one line break.
fn source_line(content: &str, byte: u64) -> usize {
    let bytes = content.as_bytes();
    let mut offset = usize::try_from(byte).unwrap_or(bytes.len()).min(bytes.len());
    while offset < bytes.len() && matches!(bytes[offset], b'\r' | b'\n') {
        offset += 1;
    }

    let head = &bytes[..offset];
    let breaks = head
        .iter()
        .enumerate()
        .filter(|&(i, &b)| b == b'\n' || (b == b'\r' && head.get(i + 1) != Some(&b'\n')))
        .count();
    breaks + 1
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> Result<RawTable, CsvError> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    parse_table(&content, delimiter, encoding)
}

/// Parse already-decoded CSV text, detecting the delimiter.
pub fn parse_text_auto(content: &str) -> Result<RawTable, CsvError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    parse_table(content, detect_delimiter(content), "utf-8")
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> Result<RawTable, CsvError> {
    let bytes = std::fs::read(path.as_ref())
        .map_err(|e| CsvError::new(0, format!("Cannot read file: {}", e)))?;
    parse_bytes_auto(&bytes)
}
