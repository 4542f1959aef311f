//! Prompt rendering for the insight generator.
//!
//! Owns the exact phrasing sent to the language model. Each summary is
//! embedded as JSON so the rendering stays deterministic and the model
//! sees every number the reporting engine produced.

use crate::report::{RepSummary, TeamSummary, TrendBucket};

/// System instruction sent with every insight request.
pub fn system_prompt() -> &'static str {
    "You are a sales performance analyst. Provide qualitative feedback, strengths, weaknesses, and actionable insights."
}

/// Prompt for a single rep's summary.
pub fn rep_prompt(summary: &RepSummary) -> String {
    let data = serde_json::to_string(summary).unwrap_or_default();
    format!(
        "Analyze this sales rep's performance data: {data}. \
         Provide detailed feedback, strengths, areas for improvement, and 3 actionable suggestions."
    )
}

/// Prompt for the whole-team summary.
pub fn team_prompt(summary: &TeamSummary) -> String {
    let data = serde_json::to_string(summary).unwrap_or_default();
    format!(
        "Analyze this overall sales team performance data: {data}. \
         Provide a summary, key strengths, challenges, and team-wide recommendations."
    )
}

/// Prompt for a sequence of trend buckets.
pub fn trends_prompt(time_period: &str, buckets: &[TrendBucket]) -> String {
    let data = serde_json::to_string(buckets).unwrap_or_default();
    format!(
        "Analyze these sales trends over {time_period} periods: {data}. \
         Identify key trends, growth/decline patterns, and forecast future performance \
         for the next period with reasons and 2 suggestions to improve."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekdayTotals;
    use chrono::NaiveDate;

    fn sample_rep_summary() -> RepSummary {
        RepSummary {
            name: "Alice Park".into(),
            total_leads: 15,
            total_tours: 4,
            total_applications: 2,
            total_revenue_confirmed: 350,
            avg_tours_per_lead: Some(0.5),
            avg_apps_per_tour: None,
            text_activity: WeekdayTotals::from([2, 0, 0, 0, 0, 0, 0]),
            call_activity: WeekdayTotals::default(),
        }
    }

    #[test]
    fn test_rep_prompt_embeds_summary() {
        let prompt = rep_prompt(&sample_rep_summary());

        assert!(prompt.contains("Alice Park"));
        assert!(prompt.contains("350"));
        // Absent ratio renders as null, never NaN
        assert!(prompt.contains("\"avg_apps_per_tour\":null"));
        assert!(prompt.contains("3 actionable suggestions"));
    }

    #[test]
    fn test_team_prompt_embeds_summary() {
        let summary = TeamSummary {
            total_reps: 3,
            total_leads: 40,
            total_tours: 12,
            total_applications: 6,
            total_revenue_confirmed: 2000,
            avg_tours_per_lead: Some(0.3),
            avg_apps_per_tour: Some(0.5),
            top_performers: vec![],
        };

        let prompt = team_prompt(&summary);
        assert!(prompt.contains("\"total_reps\":3"));
        assert!(prompt.contains("2000"));
        assert!(prompt.contains("team-wide recommendations"));
    }

    #[test]
    fn test_trends_prompt_names_period() {
        let buckets = vec![TrendBucket {
            period_end: NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
            lead_taken: 17,
            tours_booked: 6,
            applications: 3,
            revenue_confirmed: 170,
        }];

        let prompt = trends_prompt("monthly", &buckets);
        assert!(prompt.contains("over monthly periods"));
        assert!(prompt.contains("2023-01-31"));
        assert!(prompt.contains("forecast"));
    }

    #[test]
    fn test_system_prompt_register() {
        assert!(system_prompt().contains("sales performance analyst"));
    }
}
