//! Domain models for the salespulse service.
//!
//! This module contains the core data structures shared across the crate:
//!
//! - [`ActivityRecord`] - One row of sales activity for one rep on one date
//! - [`Dataset`] - The immutable in-memory collection of records
//! - [`Period`] - Trend bucketing period (monthly or quarterly)
//! - [`WeekdayTotals`] - Per-weekday activity counts (text or call)

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Weekday keys in calendar order, matching the data file's column
/// prefixes (`mon_text`, `thur_call`, ...). Thursday is spelled `thur`.
pub const WEEKDAY_KEYS: [&str; 7] = ["mon", "tue", "wed", "thur", "fri", "sat", "sun"];

// =============================================================================
// Activity Record
// =============================================================================

/// One row of activity data for one sales representative on one date.
///
/// Records only exist in a loaded [`Dataset`], so `employee_id` and
/// `dated` are always present; rows where either was missing were
/// dropped at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    /// Unique rep identifier.
    pub employee_id: i64,
    /// Display name of the rep.
    pub employee_name: String,
    /// Calendar date of the activity.
    pub dated: NaiveDate,
    /// Leads taken that day.
    pub lead_taken: i64,
    /// Tours booked that day.
    pub tours_booked: i64,
    /// Applications submitted that day.
    pub applications: i64,
    /// Confirmed revenue for that day.
    pub revenue_confirmed: i64,
    /// Tours per lead ratio; absent when not recorded.
    pub tours_per_lead: Option<f64>,
    /// Applications per tour ratio; absent when not recorded.
    pub apps_per_tour: Option<f64>,
    /// Text messages sent, indexed by weekday ([`WEEKDAY_KEYS`] order).
    pub texts_by_day: [i64; 7],
    /// Calls made, indexed by weekday ([`WEEKDAY_KEYS`] order).
    pub calls_by_day: [i64; 7],
}

// =============================================================================
// Dataset
// =============================================================================

/// The in-memory activity table.
///
/// Loaded once at process start and never mutated afterwards, so it can
/// be shared behind an `Arc` by any number of concurrent readers.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<ActivityRecord>,
}

impl Dataset {
    /// Wrap a set of already-validated records.
    pub fn new(records: Vec<ActivityRecord>) -> Self {
        Self { records }
    }

    /// All records, in file order.
    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Trend Period
// =============================================================================

/// Time bucketing period for trend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Calendar-month buckets.
    Monthly,
    /// Calendar-quarter buckets.
    Quarterly,
}

impl Period {
    /// Parse a period from its query-string form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            _ => None,
        }
    }

    /// Query-string form of the period.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }

    /// The label of the bucket containing `date`: the last calendar day
    /// of that month or quarter, per financial reporting convention.
    pub fn bucket_end(&self, date: NaiveDate) -> NaiveDate {
        let month = match self {
            Self::Monthly => date.month(),
            Self::Quarterly => ((date.month() - 1) / 3) * 3 + 3,
        };
        month_end(date.year(), month)
    }
}

/// Last calendar day of the given month.
fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .expect("first of month always has a predecessor")
}

// =============================================================================
// Weekday Totals
// =============================================================================

/// Summed activity counts per weekday.
///
/// Serializes with keys in calendar order (`mon` through `sun`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayTotals {
    pub mon: i64,
    pub tue: i64,
    pub wed: i64,
    pub thur: i64,
    pub fri: i64,
    pub sat: i64,
    pub sun: i64,
}

impl From<[i64; 7]> for WeekdayTotals {
    fn from(days: [i64; 7]) -> Self {
        Self {
            mon: days[0],
            tue: days[1],
            wed: days[2],
            thur: days[3],
            fri: days[4],
            sat: days[5],
            sun: days[6],
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_str() {
        assert_eq!(Period::from_str("monthly"), Some(Period::Monthly));
        assert_eq!(Period::from_str("QUARTERLY"), Some(Period::Quarterly));
        assert_eq!(Period::from_str(" monthly "), Some(Period::Monthly));
        assert_eq!(Period::from_str("weekly"), None);
        assert_eq!(Period::from_str(""), None);
    }

    #[test]
    fn test_monthly_bucket_end() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            Period::Monthly.bucket_end(date),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );

        // Leap year February
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(
            Period::Monthly.bucket_end(date),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        // December rolls into the next year
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(
            Period::Monthly.bucket_end(date),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_quarterly_bucket_end() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(
            Period::Quarterly.bucket_end(date),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );

        let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert_eq!(
            Period::Quarterly.bucket_end(date),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_weekday_totals_order() {
        let totals = WeekdayTotals::from([1, 2, 3, 4, 5, 6, 7]);
        let json = serde_json::to_string(&totals).unwrap();
        // Keys serialize in calendar order, with the file's 'thur' spelling.
        assert_eq!(
            json,
            r#"{"mon":1,"tue":2,"wed":3,"thur":4,"fri":5,"sat":6,"sun":7}"#
        );
    }

    #[test]
    fn test_dataset_accessors() {
        let ds = Dataset::default();
        assert!(ds.is_empty());
        assert_eq!(ds.len(), 0);
    }
}
