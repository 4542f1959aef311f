//! REST API response types.
//!
//! Success bodies echo the request's query parameters, the structured
//! summary, and the generated insights verbatim. Field names follow
//! the reporting engine's snake_case wire format.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::report::{RepSummary, TeamSummary, TrendBucket};

/// Response for `GET /api/rep_performance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepPerformanceResponse {
    /// The requested rep id, echoed back.
    pub rep_id: i64,
    /// The structured summary the insights were generated from.
    pub summary: RepSummary,
    /// The insight generator's commentary, verbatim.
    pub insights: String,
}

/// Response for `GET /api/team_performance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPerformanceResponse {
    pub summary: TeamSummary,
    pub insights: String,
}

/// Response for `GET /api/performance_trends`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsResponse {
    /// The requested period, echoed back.
    pub time_period: String,
    pub trends: Vec<TrendBucket>,
    pub insights: String,
}

/// Create an error response body, with the underlying cause attached
/// when one exists (insight failures include it for diagnostics).
pub fn error_response(error: &str, detail: Option<&str>) -> Value {
    match detail {
        Some(detail) => json!({ "error": error, "detail": detail }),
        None => json!({ "error": error }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekdayTotals;

    #[test]
    fn test_rep_response_wire_format() {
        let response = RepPerformanceResponse {
            rep_id: 183,
            summary: RepSummary {
                name: "Alice Park".into(),
                total_leads: 15,
                total_tours: 4,
                total_applications: 2,
                total_revenue_confirmed: 350,
                avg_tours_per_lead: Some(0.5),
                avg_apps_per_tour: None,
                text_activity: WeekdayTotals::default(),
                call_activity: WeekdayTotals::default(),
            },
            insights: "Solid pipeline.".into(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["rep_id"], 183);
        assert_eq!(json["summary"]["total_revenue_confirmed"], 350);
        assert_eq!(json["summary"]["avg_apps_per_tour"], Value::Null);
        assert_eq!(json["insights"], "Solid pipeline.");
    }

    #[test]
    fn test_error_response_with_detail() {
        let body = error_response("Insight generation failed", Some("LLM request failed: timeout"));
        assert_eq!(body["error"], "Insight generation failed");
        assert_eq!(body["detail"], "LLM request failed: timeout");

        let bare = error_response("Rep not found: 99", None);
        assert_eq!(bare["error"], "Rep not found: 99");
        assert!(bare.get("detail").is_none());
    }
}
