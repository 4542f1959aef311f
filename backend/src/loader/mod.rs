//! Dataset loader with encoding and delimiter auto-detection.
//!
//! Reads the delimited sales-activity file into a typed [`Dataset`]
//! once at process start. Rows with a missing identifier or an
//! unparseable date are dropped and counted; a missing required column
//! fails the whole load.

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::path::Path;

use crate::error::{DataError, DataResult};
use crate::models::{ActivityRecord, Dataset, WEEKDAY_KEYS};

/// Result of loading with parse metadata.
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// The loaded dataset.
    pub dataset: Dataset,
    /// Detected encoding.
    pub encoding: String,
    /// Detected delimiter.
    pub delimiter: char,
    /// Column headers, in file order.
    pub headers: Vec<String>,
    /// Rows dropped for a missing identifier or date.
    pub skipped: usize,
}

/// Load the activity file at `path` with auto-detection of encoding
/// and delimiter.
///
/// # Example
/// ```ignore
/// let result = load_file("sales_performance_data.csv")?;
/// println!("{} records ({} dropped)", result.dataset.len(), result.skipped);
/// ```
pub fn load_file<P: AsRef<Path>>(path: P) -> DataResult<LoadResult> {
    let bytes = std::fs::read(path.as_ref())?;
    load_bytes(&bytes)
}

/// Load activity data from raw bytes.
pub fn load_bytes(bytes: &[u8]) -> DataResult<LoadResult> {
    if bytes.is_empty() {
        return Err(DataError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    parse_content(&content, delimiter, encoding)
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the detected encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> DataResult<String> {
    match encoding {
        "iso-8859-1" => Ok(encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()),
        "windows-1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()),
        // UTF-8 and anything unrecognized: lossy fallback
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Detect the delimiter by counting occurrences in the header line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

fn parse_content(content: &str, delimiter: char, encoding: String) -> DataResult<LoadResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.trim_matches('"').to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataError::EmptyFile);
    }

    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let row = row.map_err(|e| DataError::Parse(e.to_string()))?;
        match columns.record_from_row(&row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    Ok(LoadResult {
        dataset: Dataset::new(records),
        encoding,
        delimiter,
        headers,
        skipped,
    })
}

/// Header positions for every column the loader reads.
struct ColumnIndex {
    employee_id: usize,
    employee_name: usize,
    dated: usize,
    lead_taken: usize,
    tours_booked: usize,
    applications: usize,
    revenue_confirmed: usize,
    tours_per_lead: usize,
    apps_per_tour: usize,
    texts: [usize; 7],
    calls: [usize; 7],
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> DataResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };

        let employee_id = find("employee_id")?;
        let employee_name = find("employee_name")?;
        let dated = find("dated")?;
        let lead_taken = find("lead_taken")?;
        let tours_booked = find("tours_booked")?;
        let applications = find("applications")?;
        let revenue_confirmed = find("revenue_confirmed")?;
        let tours_per_lead = find("tours_per_lead")?;
        let apps_per_tour = find("apps_per_tour")?;

        let mut texts = [0usize; 7];
        let mut calls = [0usize; 7];
        for (i, day) in WEEKDAY_KEYS.iter().enumerate() {
            texts[i] = find(&format!("{day}_text"))?;
            calls[i] = find(&format!("{day}_call"))?;
        }

        Ok(Self {
            employee_id,
            employee_name,
            dated,
            lead_taken,
            tours_booked,
            applications,
            revenue_confirmed,
            tours_per_lead,
            apps_per_tour,
            texts,
            calls,
        })
    }

    /// Build a typed record from one row. Returns `None` when the row
    /// must be dropped (null identifier or unparseable date).
    fn record_from_row(&self, row: &StringRecord) -> Option<ActivityRecord> {
        let field = |idx: usize| row.get(idx).unwrap_or("");

        let employee_id = parse_id(field(self.employee_id))?;
        let dated = parse_date(field(self.dated))?;

        let mut texts_by_day = [0i64; 7];
        let mut calls_by_day = [0i64; 7];
        for i in 0..7 {
            texts_by_day[i] = parse_count(field(self.texts[i]));
            calls_by_day[i] = parse_count(field(self.calls[i]));
        }

        Some(ActivityRecord {
            employee_id,
            employee_name: field(self.employee_name).to_string(),
            dated,
            lead_taken: parse_count(field(self.lead_taken)),
            tours_booked: parse_count(field(self.tours_booked)),
            applications: parse_count(field(self.applications)),
            revenue_confirmed: parse_count(field(self.revenue_confirmed)),
            tours_per_lead: parse_ratio(field(self.tours_per_lead)),
            apps_per_tour: parse_ratio(field(self.apps_per_tour)),
            texts_by_day,
            calls_by_day,
        })
    }
}

/// Coerce an identifier to integer. Accepts float renderings like
/// "101.0" that spreadsheet exports produce.
fn parse_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v as i64)
    })
}

/// Parse a date; unparseable values become `None` rather than an error.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    // Datetime values keep only their date part.
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// Parse a counter column; blank or unparseable counts as zero.
fn parse_count(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    raw.parse::<i64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.round() as i64)
        })
        .unwrap_or(0)
}

/// Parse a ratio column; blank or unparseable is absent, not zero,
/// so it stays out of downstream means.
fn parse_ratio(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
