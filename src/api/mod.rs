mod cli;

use axum::{
    Router,
    extract::{Json, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{
    CatchUpOutcome, ExpenseCategory, FinancialProfile, GoalDetails, LifeExpense,
    LifeExpenseAdjustment, MAX_CATCH_UP_YEARS, MAX_MISSED_MONTHS, MarketAssumptions,
    PlannerError, ProjectionResult,
    adjust_for_life_expenses_with, calculate_catch_up_strategy_with, calculate_variable_returns,
    explainer::ExplainerProfile,
};
use crate::narrative::{
    CatchUpInsights, ComprehensiveExplanation, ExplanationFocus, LifeExpenseInsights, Narrator,
    PlainNarrator, ProjectionInsights, StrategyCard, comprehensive_explanation,
};

pub use cli::{Cli, run};

const DEFAULT_HISTORICAL_YEARS: u32 = 30;
/// Upper bound on any year count accepted from a request.
const MAX_YEARS: u32 = 100;
const MAX_AGE: u32 = 120;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionPayload {
    principal: Option<f64>,
    monthly_contribution: Option<f64>,
    annual_returns: Option<Vec<f64>>,
    historical_years: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TimelinePayload {
    current_age: Option<u32>,
    target_age: Option<u32>,
    current_savings: Option<f64>,
    monthly_contribution: Option<f64>,
    target_amount: Option<f64>,
    dream_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExpensePayload {
    #[serde(rename = "type")]
    category: Option<String>,
    start_age: Option<u32>,
    duration: Option<u32>,
    monthly_cost: Option<f64>,
    one_time_cost: Option<f64>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LifeExpensesPayload {
    timeline: TimelinePayload,
    expenses: Vec<ExpensePayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalDetailsPayload {
    target_amount: Option<f64>,
    current_savings: Option<f64>,
    planned_monthly_contribution: Option<f64>,
    dream_title: Option<String>,
    current_age: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CatchUpPayload {
    missed_months: Option<i64>,
    remaining_years: Option<i64>,
    goal_details: GoalDetailsPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExplainPayload {
    monthly_foundation: Option<f64>,
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    dream_name: Option<String>,
    dream_amount: Option<f64>,
    dream_timeline: Option<u32>,
    monthly_dream: Option<f64>,
    focus: Option<String>,
}

struct ProjectionRequest {
    principal: f64,
    monthly_contribution: f64,
    annual_returns: Vec<f64>,
}

struct CatchUpRequest {
    missed_months: u32,
    remaining_years: u32,
    goal: GoalDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    projection: ProjectionResult,
    insights: ProjectionInsights,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LifeExpensesResponse {
    adjustment: LifeExpenseAdjustment,
    insights: LifeExpenseInsights,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatchUpResponse {
    catch_up_needed: bool,
    outcome: CatchUpOutcome,
    insights: CatchUpInsights,
    strategy_cards: Vec<StrategyCard>,
    reasoning: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoricalReturnsResponse<'a> {
    historical_returns: &'a [f64],
    catch_up_return: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn require_finite(value: f64, name: &str) -> Result<f64, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{name} must be a finite number"))
    }
}

fn build_projection_request(
    payload: ProjectionPayload,
    assumptions: &MarketAssumptions,
) -> Result<ProjectionRequest, String> {
    let principal = require_finite(payload.principal.unwrap_or(0.0), "principal")?;
    let monthly_contribution = require_finite(
        payload.monthly_contribution.unwrap_or(0.0),
        "monthlyContribution",
    )?;

    let annual_returns = match (payload.annual_returns, payload.historical_years) {
        (Some(_), Some(_)) => {
            return Err("provide either annualReturns or historicalYears, not both".to_string());
        }
        (Some(returns), None) => returns,
        (None, years) => {
            let years = years.unwrap_or(DEFAULT_HISTORICAL_YEARS);
            if years == 0 || years > MAX_YEARS {
                return Err(format!("historicalYears must be between 1 and {MAX_YEARS}"));
            }
            assumptions.historical_slice(years).to_vec()
        }
    };
    if annual_returns.len() > MAX_YEARS as usize {
        return Err(format!("annualReturns must have at most {MAX_YEARS} entries"));
    }

    Ok(ProjectionRequest {
        principal,
        monthly_contribution,
        annual_returns,
    })
}

fn build_profile(payload: TimelinePayload) -> Result<FinancialProfile, String> {
    let mut profile = FinancialProfile::default();
    if let Some(v) = payload.current_age {
        profile.current_age = v;
    }
    if let Some(v) = payload.target_age {
        profile.target_age = v;
    }
    if let Some(v) = payload.current_savings {
        profile.current_savings = v;
    }
    if let Some(v) = payload.monthly_contribution {
        profile.monthly_contribution = v;
    }
    if let Some(v) = payload.target_amount {
        profile.target_amount = v;
    }
    if let Some(v) = payload.dream_title {
        profile.dream_title = v;
    }

    if profile.horizon_years() > MAX_YEARS {
        return Err(format!("targetAge must be within {MAX_YEARS} years of currentAge"));
    }
    Ok(profile)
}

fn build_expense(payload: ExpensePayload) -> Result<LifeExpense, String> {
    let mut expense = LifeExpense::default();
    if let Some(label) = payload.category {
        expense.category = ExpenseCategory::from_label(&label);
    }
    expense.start_age = payload.start_age;
    if let Some(v) = payload.duration {
        expense.duration = v;
    }
    if let Some(v) = payload.monthly_cost {
        expense.monthly_cost = require_finite(v, "monthlyCost")?;
    }
    if let Some(v) = payload.one_time_cost {
        expense.one_time_cost = require_finite(v, "oneTimeCost")?;
    }
    if let Some(v) = payload.description {
        expense.description = v;
    }
    Ok(expense)
}

fn build_life_expenses_request(
    payload: LifeExpensesPayload,
) -> Result<(FinancialProfile, Vec<LifeExpense>), String> {
    let profile = build_profile(payload.timeline)?;
    let expenses = payload
        .expenses
        .into_iter()
        .map(build_expense)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((profile, expenses))
}

fn build_goal_details(payload: GoalDetailsPayload) -> GoalDetails {
    let mut goal = GoalDetails::default();
    if let Some(v) = payload.target_amount {
        goal.target_amount = v;
    }
    if let Some(v) = payload.current_savings {
        goal.current_savings = v;
    }
    if let Some(v) = payload.planned_monthly_contribution {
        goal.planned_monthly_contribution = v;
    }
    if let Some(v) = payload.dream_title {
        goal.dream_title = v;
    }
    if let Some(v) = payload.current_age {
        goal.current_age = v;
    }
    goal
}

/// Negative counts mean nothing was missed or no time remains.
fn non_negative_count(value: Option<i64>) -> u32 {
    u32::try_from(value.unwrap_or(0).max(0)).unwrap_or(u32::MAX)
}

fn build_catch_up_request(payload: CatchUpPayload) -> Result<CatchUpRequest, String> {
    let missed_months = non_negative_count(payload.missed_months);
    let remaining_years = non_negative_count(payload.remaining_years);
    if remaining_years > MAX_CATCH_UP_YEARS {
        return Err(format!("remainingYears must be at most {MAX_CATCH_UP_YEARS}"));
    }
    if missed_months > MAX_MISSED_MONTHS {
        return Err(format!("missedMonths must be at most {MAX_MISSED_MONTHS}"));
    }
    Ok(CatchUpRequest {
        missed_months,
        remaining_years,
        goal: build_goal_details(payload.goal_details),
    })
}

fn build_explainer_request(
    payload: ExplainPayload,
) -> Result<(ExplainerProfile, ExplanationFocus), String> {
    let mut profile = ExplainerProfile::default();
    if let Some(v) = payload.monthly_foundation {
        profile.monthly_foundation = v;
    }
    if let Some(v) = payload.current_age {
        profile.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        profile.retirement_age = v;
    }
    if let Some(v) = payload.dream_name {
        profile.dream_name = v;
    }
    if let Some(v) = payload.dream_amount {
        profile.dream_amount = v;
    }
    if let Some(v) = payload.dream_timeline {
        profile.dream_timeline = v;
    }
    if let Some(v) = payload.monthly_dream {
        profile.monthly_dream = v;
    }

    if !profile.monthly_foundation.is_finite() || profile.monthly_foundation < 0.0 {
        return Err("monthlyFoundation must be >= 0".to_string());
    }
    if !profile.dream_amount.is_finite() || profile.dream_amount < 0.0 {
        return Err("dreamAmount must be >= 0".to_string());
    }
    if !profile.monthly_dream.is_finite() || profile.monthly_dream < 0.0 {
        return Err("monthlyDream must be >= 0".to_string());
    }
    if profile.retirement_age > MAX_AGE {
        return Err(format!("retirementAge must be at most {MAX_AGE}"));
    }
    if profile.retirement_age <= profile.current_age {
        return Err("retirementAge must be > currentAge".to_string());
    }
    if profile.years_to_retirement() > MAX_YEARS || profile.dream_timeline > MAX_YEARS {
        return Err(format!("timelines must be at most {MAX_YEARS} years"));
    }
    let focus = match payload.focus {
        Some(label) => ExplanationFocus::from_label(&label).ok_or_else(|| {
            format!("focus must be one of compound, dca, inflation, timing (got {label:?})")
        })?,
        None => ExplanationFocus::default(),
    };
    Ok((profile, focus))
}

fn project(request: ProjectionRequest) -> Result<ProjectionResponse, PlannerError> {
    let projection = calculate_variable_returns(
        request.principal,
        request.monthly_contribution,
        &request.annual_returns,
    )?;
    let insights = PlainNarrator.projection(&projection);
    Ok(ProjectionResponse {
        projection,
        insights,
    })
}

fn adjust_life_expenses(
    profile: &FinancialProfile,
    expenses: &[LifeExpense],
    assumptions: &MarketAssumptions,
) -> Result<LifeExpensesResponse, PlannerError> {
    let adjustment = adjust_for_life_expenses_with(profile, expenses, assumptions)?;
    let insights = PlainNarrator.life_expenses(&adjustment);
    Ok(LifeExpensesResponse {
        adjustment,
        insights,
    })
}

fn plan_catch_up(
    request: &CatchUpRequest,
    assumptions: &MarketAssumptions,
) -> Result<CatchUpResponse, PlannerError> {
    let outcome = calculate_catch_up_strategy_with(
        request.missed_months,
        request.remaining_years,
        &request.goal,
        assumptions,
    )?;
    let dream = &request.goal.dream_title;
    let insights = PlainNarrator.catch_up(&outcome, dream);
    let (strategy_cards, reasoning) = match outcome.plan() {
        Some(plan) => (
            PlainNarrator.strategy_cards(plan, dream),
            Some(PlainNarrator.recommendation_reasoning(&plan.recommendation)),
        ),
        None => (Vec::new(), None),
    };
    Ok(CatchUpResponse {
        catch_up_needed: outcome.catch_up_needed(),
        outcome,
        insights,
        strategy_cards,
        reasoning,
    })
}

fn explain(profile: &ExplainerProfile, focus: ExplanationFocus) -> ComprehensiveExplanation {
    comprehensive_explanation(&PlainNarrator, profile, focus)
}

pub fn router(assumptions: Arc<MarketAssumptions>) -> Router {
    Router::new()
        .route("/api/projection", post(projection_handler))
        .route("/api/life-expenses", post(life_expenses_handler))
        .route("/api/catch-up", post(catch_up_handler))
        .route("/api/explain", post(explain_handler))
        .route("/api/market/historical-returns", get(historical_returns_handler))
        .fallback(not_found_handler)
        .with_state(assumptions)
}

pub async fn run_http_server(port: u16, assumptions: MarketAssumptions) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(Arc::new(assumptions));

    let listener = TcpListener::bind(addr).await?;
    log::info!("dream planner API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projection_handler(
    State(assumptions): State<Arc<MarketAssumptions>>,
    Json(payload): Json<ProjectionPayload>,
) -> Response {
    let request = match build_projection_request(payload, &assumptions) {
        Ok(request) => request,
        Err(msg) => return bad_request("projection", &msg),
    };
    match project(request) {
        Ok(response) => {
            log::info!("projection over {} years", response.projection.years());
            json_response(StatusCode::OK, response)
        }
        Err(err) => planner_error_response("projection", &err),
    }
}

async fn life_expenses_handler(
    State(assumptions): State<Arc<MarketAssumptions>>,
    Json(payload): Json<LifeExpensesPayload>,
) -> Response {
    let (profile, expenses) = match build_life_expenses_request(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request("life-expenses", &msg),
    };
    log::info!(
        "life-expense adjustment with {} expenses over {} years",
        expenses.len(),
        profile.horizon_years()
    );
    match adjust_life_expenses(&profile, &expenses, &assumptions) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => planner_error_response("life-expenses", &err),
    }
}

async fn catch_up_handler(
    State(assumptions): State<Arc<MarketAssumptions>>,
    Json(payload): Json<CatchUpPayload>,
) -> Response {
    let request = match build_catch_up_request(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request("catch-up", &msg),
    };
    log::info!(
        "catch-up for {} missed months with {} years remaining",
        request.missed_months,
        request.remaining_years
    );
    match plan_catch_up(&request, &assumptions) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => planner_error_response("catch-up", &err),
    }
}

async fn explain_handler(Json(payload): Json<ExplainPayload>) -> Response {
    match build_explainer_request(payload) {
        Ok((profile, focus)) => json_response(StatusCode::OK, explain(&profile, focus)),
        Err(msg) => bad_request("explain", &msg),
    }
}

async fn historical_returns_handler(
    State(assumptions): State<Arc<MarketAssumptions>>,
) -> Response {
    json_response(
        StatusCode::OK,
        HistoricalReturnsResponse {
            historical_returns: &assumptions.historical_returns,
            catch_up_return: assumptions.catch_up_return,
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn bad_request(route: &str, msg: &str) -> Response {
    log::warn!("rejected {route} request: {msg}");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn planner_error_response(route: &str, err: &PlannerError) -> Response {
    bad_request(route, &err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assumptions() -> Arc<MarketAssumptions> {
        Arc::new(MarketAssumptions::default())
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[test]
    fn projection_payload_parses_camel_case_keys() {
        let payload: ProjectionPayload = serde_json::from_str(
            r#"{"principal": 1000, "monthlyContribution": 100, "annualReturns": [0.1]}"#,
        )
        .expect("valid payload");
        let request =
            build_projection_request(payload, &MarketAssumptions::default()).expect("valid");
        assert_approx(request.principal, 1_000.0);
        assert_approx(request.monthly_contribution, 100.0);
        assert_eq!(request.annual_returns, vec![0.1]);
    }

    #[test]
    fn projection_defaults_to_thirty_historical_years() {
        let request =
            build_projection_request(ProjectionPayload::default(), &MarketAssumptions::default())
                .expect("valid");
        assert_eq!(request.annual_returns.len(), 30);
        assert_approx(request.annual_returns[0], 0.31);
    }

    #[test]
    fn projection_rejects_both_return_sources() {
        let payload = ProjectionPayload {
            annual_returns: Some(vec![0.05]),
            historical_years: Some(5),
            ..ProjectionPayload::default()
        };
        let err = build_projection_request(payload, &MarketAssumptions::default())
            .err()
            .expect("should reject");
        assert!(err.contains("not both"));
    }

    #[test]
    fn life_expense_payload_merges_over_default_profile() {
        let payload: LifeExpensesPayload = serde_json::from_str(
            r#"{
                "timeline": {"currentAge": 40, "dreamTitle": "lake house"},
                "expenses": [{"type": "childcare", "monthlyCost": 800, "duration": 5}]
            }"#,
        )
        .expect("valid payload");
        let (profile, expenses) = build_life_expenses_request(payload).expect("valid");
        assert_eq!(profile.current_age, 40);
        assert_eq!(profile.target_age, 65);
        assert_eq!(profile.dream_title, "lake house");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, ExpenseCategory::Childcare);
        assert_eq!(expenses[0].duration, 5);
        assert_eq!(expenses[0].start_age, None);
    }

    #[test]
    fn catch_up_payload_clamps_negative_counts() {
        let payload: CatchUpPayload =
            serde_json::from_str(r#"{"missedMonths": -3, "remainingYears": 10}"#)
                .expect("valid payload");
        let request = build_catch_up_request(payload).expect("valid");
        assert_eq!(request.missed_months, 0);
        assert_eq!(request.remaining_years, 10);
        assert_eq!(request.goal, GoalDetails::default());
    }

    #[test]
    fn catch_up_rejects_unbounded_horizon() {
        let payload = CatchUpPayload {
            missed_months: Some(6),
            remaining_years: Some(500),
            ..CatchUpPayload::default()
        };
        assert!(build_catch_up_request(payload).is_err());
    }

    #[test]
    fn explain_payload_parses_focus() {
        let payload: ExplainPayload =
            serde_json::from_str(r#"{"focus": "Timing", "monthlyFoundation": 500}"#)
                .expect("valid payload");
        let (profile, focus) = build_explainer_request(payload).expect("valid");
        assert_eq!(focus, ExplanationFocus::Timing);
        assert_approx(profile.monthly_foundation, 500.0);
        assert_eq!(profile.dream_name, "cottage");
    }

    #[test]
    fn explain_rejects_unknown_focus() {
        let payload = ExplainPayload {
            focus: Some("astrology".to_string()),
            ..ExplainPayload::default()
        };
        let err = build_explainer_request(payload)
            .err()
            .expect("should reject");
        assert!(err.contains("astrology"));
    }

    #[test]
    fn explain_rejects_retirement_before_current_age() {
        let payload = ExplainPayload {
            current_age: Some(70),
            ..ExplainPayload::default()
        };
        assert!(build_explainer_request(payload).is_err());
    }

    #[test]
    fn catch_up_response_serialization_contains_expected_fields() {
        let request = build_catch_up_request(CatchUpPayload {
            missed_months: Some(6),
            remaining_years: Some(10),
            ..CatchUpPayload::default()
        })
        .expect("valid");
        let response = plan_catch_up(&request, &MarketAssumptions::default()).expect("plan");
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"catchUpNeeded\":true"));
        assert!(json.contains("\"missedImpact\""));
        assert!(json.contains("\"recommendation\""));
        assert!(json.contains("\"strategyCards\""));
        assert!(json.contains("\"successProbability\""));
        assert_eq!(response.strategy_cards.len(), 3);
        assert!(response.reasoning.is_some());
    }

    #[tokio::test]
    async fn projection_handler_returns_base_case() {
        let payload = ProjectionPayload {
            principal: Some(1_000.0),
            monthly_contribution: Some(100.0),
            annual_returns: Some(vec![0.10]),
            historical_years: None,
        };
        let response = projection_handler(State(assumptions()), Json(payload)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
        let body = body_json(response).await;
        assert_eq!(body["projection"]["finalValue"], 2360.0);
        assert_eq!(body["projection"]["yearlyBreakdown"][0]["return"], 0.1);
        assert!(body["insights"]["keyInsights"].is_array());
    }

    #[tokio::test]
    async fn projection_handler_rejects_empty_series() {
        let payload = ProjectionPayload {
            annual_returns: Some(Vec::new()),
            ..ProjectionPayload::default()
        };
        let response = projection_handler(State(assumptions()), Json(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn catch_up_handler_reports_not_needed() {
        let payload = CatchUpPayload {
            missed_months: Some(0),
            remaining_years: Some(10),
            ..CatchUpPayload::default()
        };
        let response = catch_up_handler(State(assumptions()), Json(payload)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["catchUpNeeded"], false);
        assert_eq!(body["outcome"]["status"], "notNeeded");
        assert_eq!(body["insights"]["primaryMessage"], "No catch-up strategy needed");
    }

    #[tokio::test]
    async fn life_expenses_handler_rejects_inverted_ages() {
        let payload = LifeExpensesPayload {
            timeline: TimelinePayload {
                current_age: Some(70),
                target_age: Some(60),
                ..TimelinePayload::default()
            },
            expenses: Vec::new(),
        };
        let response = life_expenses_handler(State(assumptions()), Json(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn explain_handler_puts_focus_first() {
        let payload = ExplainPayload {
            focus: Some("dca".to_string()),
            ..ExplainPayload::default()
        };
        let response = explain_handler(Json(payload)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["primary"]["concept"], "dca");
        assert_eq!(body["supporting"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn explain_handler_rejects_implausible_ages() {
        let payload = ExplainPayload {
            current_age: Some(u32::MAX - 6),
            retirement_age: Some(u32::MAX),
            focus: Some("timing".to_string()),
            ..ExplainPayload::default()
        };
        let response = explain_handler(Json(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "retirementAge must be at most 120");
    }

    #[tokio::test]
    async fn catch_up_handler_rejects_long_horizon() {
        let payload = CatchUpPayload {
            missed_months: Some(1),
            remaining_years: Some(2_000),
            ..CatchUpPayload::default()
        };
        let response = catch_up_handler(State(assumptions()), Json(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn historical_returns_handler_serves_table() {
        let response = historical_returns_handler(State(assumptions())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["historicalReturns"].as_array().map(Vec::len), Some(72));
        assert_eq!(body["catchUpReturn"], 0.07);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Not found");
    }
}
