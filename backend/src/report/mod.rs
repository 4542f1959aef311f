//! Reporting engine: pure read-only aggregations over the [`Dataset`].
//!
//! Three summary shapes, all derived on demand and never persisted:
//!
//! - [`RepSummary`] - one rep's totals, averages, and weekday breakdown
//! - [`TeamSummary`] - population totals plus the top-3 earners
//! - [`TrendBucket`] - per-month or per-quarter totals, in order
//!
//! The engine is constructed over an injected `Arc<Dataset>` so tests
//! can supply a synthetic dataset without touching a real file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{ReportError, ReportResult};
use crate::models::{ActivityRecord, Dataset, Period, WeekdayTotals};

// =============================================================================
// Summary Shapes
// =============================================================================

/// Aggregated performance for a single rep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepSummary {
    /// Rep name, taken from the first matching record.
    pub name: String,
    /// Summed leads across all of the rep's records.
    pub total_leads: i64,
    /// Summed tours booked.
    pub total_tours: i64,
    /// Summed applications.
    pub total_applications: i64,
    /// Summed confirmed revenue.
    pub total_revenue_confirmed: i64,
    /// Mean tours-per-lead ratio; null when no records carry the ratio.
    pub avg_tours_per_lead: Option<f64>,
    /// Mean apps-per-tour ratio; null when no records carry the ratio.
    pub avg_apps_per_tour: Option<f64>,
    /// Text messages summed per weekday.
    pub text_activity: WeekdayTotals,
    /// Calls summed per weekday.
    pub call_activity: WeekdayTotals,
}

/// One entry in the team's top-performer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    pub employee_id: i64,
    pub employee_name: String,
    /// Total confirmed revenue across all of the rep's records.
    pub revenue_confirmed: i64,
}

/// Aggregated performance across the whole team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    /// Count of distinct reps in the dataset.
    pub total_reps: usize,
    pub total_leads: i64,
    pub total_tours: i64,
    pub total_applications: i64,
    pub total_revenue_confirmed: i64,
    /// Mean tours-per-lead across all records; null on empty input.
    pub avg_tours_per_lead: Option<f64>,
    /// Mean apps-per-tour across all records; null on empty input.
    pub avg_apps_per_tour: Option<f64>,
    /// Top 3 reps by total confirmed revenue, descending. Equal sums
    /// keep the order they were first encountered in.
    pub top_performers: Vec<TopPerformer>,
}

/// Summed totals for one calendar period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// Last calendar day of the period (end-of-period label).
    pub period_end: NaiveDate,
    pub lead_taken: i64,
    pub tours_booked: i64,
    pub applications: i64,
    pub revenue_confirmed: i64,
}

// =============================================================================
// Reporter
// =============================================================================

/// Read-only reporting engine over a shared dataset.
#[derive(Debug, Clone)]
pub struct Reporter {
    dataset: Arc<Dataset>,
}

impl Reporter {
    /// Create a reporter over an already-loaded dataset.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    /// The underlying dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Summarize a single rep's performance.
    ///
    /// Fails with [`ReportError::RepNotFound`] when no records match.
    pub fn rep_summary(&self, rep_id: i64) -> ReportResult<RepSummary> {
        let records: Vec<&ActivityRecord> = self
            .dataset
            .records()
            .iter()
            .filter(|r| r.employee_id == rep_id)
            .collect();

        let first = records.first().ok_or(ReportError::RepNotFound(rep_id))?;

        let mut texts = [0i64; 7];
        let mut calls = [0i64; 7];
        for record in &records {
            for i in 0..7 {
                texts[i] += record.texts_by_day[i];
                calls[i] += record.calls_by_day[i];
            }
        }

        Ok(RepSummary {
            name: first.employee_name.clone(),
            total_leads: records.iter().map(|r| r.lead_taken).sum(),
            total_tours: records.iter().map(|r| r.tours_booked).sum(),
            total_applications: records.iter().map(|r| r.applications).sum(),
            total_revenue_confirmed: records.iter().map(|r| r.revenue_confirmed).sum(),
            avg_tours_per_lead: mean(records.iter().filter_map(|r| r.tours_per_lead)),
            avg_apps_per_tour: mean(records.iter().filter_map(|r| r.apps_per_tour)),
            text_activity: texts.into(),
            call_activity: calls.into(),
        })
    }

    /// Summarize the whole team. Always succeeds; an empty dataset
    /// yields zero totals, null averages, and no top performers.
    pub fn team_summary(&self) -> TeamSummary {
        let records = self.dataset.records();

        // Revenue per rep, in first-encountered order so that a stable
        // sort preserves it for equal sums.
        let mut by_rep: Vec<TopPerformer> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();
        for record in records {
            match index.entry(record.employee_id) {
                Entry::Occupied(slot) => {
                    by_rep[*slot.get()].revenue_confirmed += record.revenue_confirmed;
                }
                Entry::Vacant(slot) => {
                    slot.insert(by_rep.len());
                    by_rep.push(TopPerformer {
                        employee_id: record.employee_id,
                        employee_name: record.employee_name.clone(),
                        revenue_confirmed: record.revenue_confirmed,
                    });
                }
            }
        }

        let total_reps = by_rep.len();
        let mut top_performers = by_rep;
        top_performers.sort_by(|a, b| b.revenue_confirmed.cmp(&a.revenue_confirmed));
        top_performers.truncate(3);

        TeamSummary {
            total_reps,
            total_leads: records.iter().map(|r| r.lead_taken).sum(),
            total_tours: records.iter().map(|r| r.tours_booked).sum(),
            total_applications: records.iter().map(|r| r.applications).sum(),
            total_revenue_confirmed: records.iter().map(|r| r.revenue_confirmed).sum(),
            avg_tours_per_lead: mean(records.iter().filter_map(|r| r.tours_per_lead)),
            avg_apps_per_tour: mean(records.iter().filter_map(|r| r.apps_per_tour)),
            top_performers,
        }
    }

    /// Bucket the dataset by calendar month or quarter and sum the four
    /// core counters per bucket.
    ///
    /// Fails with [`ReportError::InvalidPeriod`] for any period other
    /// than `monthly` or `quarterly`. An empty dataset yields an empty
    /// bucket list.
    pub fn trend_summary(&self, period: &str) -> ReportResult<Vec<TrendBucket>> {
        let period =
            Period::from_str(period).ok_or_else(|| ReportError::InvalidPeriod(period.into()))?;

        let mut buckets: BTreeMap<NaiveDate, TrendBucket> = BTreeMap::new();
        for record in self.dataset.records() {
            let period_end = period.bucket_end(record.dated);
            let bucket = buckets.entry(period_end).or_insert_with(|| TrendBucket {
                period_end,
                lead_taken: 0,
                tours_booked: 0,
                applications: 0,
                revenue_confirmed: 0,
            });
            bucket.lead_taken += record.lead_taken;
            bucket.tours_booked += record.tours_booked;
            bucket.applications += record.applications;
            bucket.revenue_confirmed += record.revenue_confirmed;
        }

        // BTreeMap iteration is chronological by period end.
        Ok(buckets.into_values().collect())
    }
}

/// Mean over present values; `None` on an empty input rather than NaN.
fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

// =============================================================================
// Tests
// =============================================================================
