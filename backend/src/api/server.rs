//! HTTP server for the salespulse API.
//!
//! Read-only reporting endpoints; each handler runs the full
//! filter -> aggregate -> render -> external-call sequence to
//! completion before returning.
//!
//! # API Endpoints
//!
//! | Method | Path                      | Description                          |
//! |--------|---------------------------|--------------------------------------|
//! | GET    | `/health`                 | Health check                         |
//! | GET    | `/api/rep_performance`    | One rep's summary + insights         |
//! | GET    | `/api/team_performance`   | Team summary + insights              |
//! | GET    | `/api/performance_trends` | Monthly/quarterly trends + insights  |

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;

use super::types::{
    error_response, RepPerformanceResponse, TeamPerformanceResponse, TrendsResponse,
};
use crate::error::{InsightError, ReportError};
use crate::insight::{self, InsightGenerator};
use crate::report::Reporter;

/// Shared request state: the reporting engine over the loaded dataset
/// and the insight collaborator. Both are read-only, so cloning per
/// request is cheap and needs no locking.
#[derive(Clone)]
pub struct AppState {
    pub reporter: Reporter,
    pub insights: Arc<dyn InsightGenerator>,
}

impl AppState {
    pub fn new(reporter: Reporter, insights: Arc<dyn InsightGenerator>) -> Self {
        Self { reporter, insights }
    }
}

/// Build the API router over the given state.
pub fn router(state: AppState) -> Router {
    // Permissive CORS for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/rep_performance", get(rep_performance))
        .route("/api/team_performance", get(team_performance))
        .route("/api/performance_trends", get(performance_trends))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server. The dataset must already be loaded.
pub async fn start_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 salespulse server running on http://localhost:{}", port);
    println!("   GET /api/rep_performance?rep_id=<id>");
    println!("   GET /api/team_performance");
    println!("   GET /api/performance_trends?time_period=<monthly|quarterly>");
    println!("   GET /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

type ErrorReply = (StatusCode, Json<Value>);

fn report_error_reply(err: ReportError) -> ErrorReply {
    let status = match err {
        ReportError::RepNotFound(_) => StatusCode::NOT_FOUND,
        ReportError::InvalidPeriod(_) => StatusCode::BAD_REQUEST,
    };
    (status, Json(error_response(&err.to_string(), None)))
}

fn insight_error_reply(err: InsightError) -> ErrorReply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(error_response(
            "Insight generation failed",
            Some(&err.to_string()),
        )),
    )
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "salespulse",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "rep_performance": "GET /api/rep_performance?rep_id=<id>",
            "team_performance": "GET /api/team_performance",
            "performance_trends": "GET /api/performance_trends?time_period=<monthly|quarterly>"
        }
    }))
}

#[derive(Debug, Deserialize)]
pub struct RepQuery {
    /// Unique id of the sales rep.
    pub rep_id: i64,
}

/// Performance feedback for a specific rep.
async fn rep_performance(
    State(state): State<AppState>,
    Query(query): Query<RepQuery>,
) -> Result<Json<RepPerformanceResponse>, ErrorReply> {
    let summary = state
        .reporter
        .rep_summary(query.rep_id)
        .map_err(report_error_reply)?;

    let prompt = insight::rep_prompt(&summary);
    let insights = state
        .insights
        .generate(&prompt, insight::system_prompt())
        .await
        .map_err(insight_error_reply)?;

    Ok(Json(RepPerformanceResponse {
        rep_id: query.rep_id,
        summary,
        insights,
    }))
}

/// Overall team performance summary.
async fn team_performance(
    State(state): State<AppState>,
) -> Result<Json<TeamPerformanceResponse>, ErrorReply> {
    let summary = state.reporter.team_summary();

    let prompt = insight::team_prompt(&summary);
    let insights = state
        .insights
        .generate(&prompt, insight::system_prompt())
        .await
        .map_err(insight_error_reply)?;

    Ok(Json(TeamPerformanceResponse { summary, insights }))
}

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    /// Time period: monthly or quarterly.
    pub time_period: String,
}

/// Sales trends over monthly or quarterly buckets.
async fn performance_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<TrendsResponse>, ErrorReply> {
    let trends = state
        .reporter
        .trend_summary(&query.time_period)
        .map_err(report_error_reply)?;

    let prompt = insight::trends_prompt(&query.time_period, &trends);
    let insights = state
        .insights
        .generate(&prompt, insight::system_prompt())
        .await
        .map_err(insight_error_reply)?;

    Ok(Json(TrendsResponse {
        time_period: query.time_period,
        trends,
        insights,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsightResult;
    use crate::models::{ActivityRecord, Dataset};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Records every (prompt, system) pair and returns a fixed reply.
    struct StubInsights {
        calls: Mutex<Vec<(String, String)>>,
        reply: String,
    }

    impl StubInsights {
        fn new(reply: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl InsightGenerator for StubInsights {
        async fn generate(&self, prompt: &str, system: &str) -> InsightResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), system.to_string()));
            Ok(self.reply.clone())
        }
    }

    /// Always fails, as an unreachable or misconfigured provider would.
    struct FailingInsights;

    #[async_trait]
    impl InsightGenerator for FailingInsights {
        async fn generate(&self, _prompt: &str, _system: &str) -> InsightResult<String> {
            Err(InsightError::RequestFailed("connection refused".into()))
        }
    }

    fn rec(id: i64, name: &str, date: (i32, u32, u32), leads: i64, revenue: i64) -> ActivityRecord {
        ActivityRecord {
            employee_id: id,
            employee_name: name.to_string(),
            dated: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            lead_taken: leads,
            tours_booked: 2,
            applications: 1,
            revenue_confirmed: revenue,
            tours_per_lead: Some(0.5),
            apps_per_tour: Some(0.25),
            texts_by_day: [0; 7],
            calls_by_day: [0; 7],
        }
    }

    fn state_with(insights: Arc<dyn InsightGenerator>) -> AppState {
        let dataset = Dataset::new(vec![
            rec(183, "Alice Park", (2023, 1, 10), 10, 100),
            rec(183, "Alice Park", (2023, 1, 11), 5, 250),
            rec(184, "Ben Ortiz", (2023, 2, 1), 7, 500),
        ]);
        AppState::new(Reporter::new(Arc::new(dataset)), insights)
    }

    #[tokio::test]
    async fn test_rep_performance_ok() {
        let stub = Arc::new(StubInsights::new("Keep booking tours."));
        let state = state_with(stub.clone());

        let Json(response) = rep_performance(State(state), Query(RepQuery { rep_id: 183 }))
            .await
            .unwrap();

        assert_eq!(response.rep_id, 183);
        assert_eq!(response.summary.total_revenue_confirmed, 350);
        assert_eq!(response.insights, "Keep booking tours.");

        // The rendered summary and the analyst instruction reach the collaborator
        let calls = stub.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("350"));
        assert!(calls[0].1.contains("sales performance analyst"));
    }

    #[tokio::test]
    async fn test_rep_performance_not_found() {
        let state = state_with(Arc::new(StubInsights::new("unused")));

        let (status, Json(body)) = rep_performance(State(state), Query(RepQuery { rep_id: 999 }))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("999"));
    }

    #[tokio::test]
    async fn test_team_performance_ok() {
        let state = state_with(Arc::new(StubInsights::new("Great team.")));

        let Json(response) = team_performance(State(state)).await.unwrap();

        assert_eq!(response.summary.total_reps, 2);
        assert_eq!(response.insights, "Great team.");
    }

    #[tokio::test]
    async fn test_performance_trends_ok() {
        let state = state_with(Arc::new(StubInsights::new("Growing.")));

        let Json(response) = performance_trends(
            State(state),
            Query(TrendsQuery {
                time_period: "monthly".into(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.time_period, "monthly");
        assert_eq!(response.trends.len(), 2);
        assert_eq!(
            response.trends[0].period_end,
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap()
        );
    }

    #[tokio::test]
    async fn test_performance_trends_invalid_period() {
        let state = state_with(Arc::new(StubInsights::new("unused")));

        let (status, Json(body)) = performance_trends(
            State(state),
            Query(TrendsQuery {
                time_period: "weekly".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("weekly"));
    }

    #[tokio::test]
    async fn test_insight_failure_is_500_never_partial() {
        let state = state_with(Arc::new(FailingInsights));

        let (status, Json(body)) =
            rep_performance(State(state.clone()), Query(RepQuery { rep_id: 183 }))
                .await
                .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Insight generation failed");
        assert!(body["detail"].as_str().unwrap().contains("connection refused"));

        let (status, _) = team_performance(State(state.clone())).await.unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = performance_trends(
            State(state),
            Query(TrendsQuery {
                time_period: "quarterly".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
