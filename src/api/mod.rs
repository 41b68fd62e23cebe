use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::advisor::AdvisorService;
use crate::config::AppConfig;
use crate::core::{AnalysisResult, FinancialInput, SimulationRequest};
use crate::error::InputError;

const STATUS_MESSAGE: &str = "Financial Stability Advisor API is running";

#[derive(Debug, Serialize)]
struct StatusResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(service: Arc<AdvisorService>) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .route("/analyze", post(analyze_handler))
        .route("/simulate", post(simulate_handler))
        .fallback(not_found_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub async fn run_http_server(host: &str, port: u16, config: AppConfig) -> std::io::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address {host}:{port}: {e}"),
        )
    })?;
    let service = Arc::new(AdvisorService::from_config(&config));
    let app = router(service);

    let listener = TcpListener::bind(addr).await?;
    info!("Financial stability API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn status_handler() -> Response {
    json_response(
        StatusCode::OK,
        StatusResponse {
            message: STATUS_MESSAGE,
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn analyze_handler(
    State(service): State<Arc<AdvisorService>>,
    payload: Result<Json<FinancialInput>, JsonRejection>,
) -> Response {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    analysis_response(service.analyze(&input).await)
}

/// With a narrator configured, `ai_advice` here can differ from `/analyze`:
/// simulations use the rule narrative unless `NARRATE_SIMULATIONS` is set.
async fn simulate_handler(
    State(service): State<Arc<AdvisorService>>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    analysis_response(service.simulate(&request).await)
}

fn analysis_response(result: Result<AnalysisResult, InputError>) -> Response {
    match result {
        Ok(analysis) => json_response(StatusCode::OK, analysis),
        Err(e) => {
            debug!(error = %e, "rejected input");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

/// Malformed bodies keep axum's status (400 syntax, 415 content type,
/// 422 missing or mistyped fields) but answer in the JSON error shape.
fn rejection_response(rejection: JsonRejection) -> Response {
    error_response(rejection.status(), &rejection.body_text())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{self, RiskZone};
    use crate::error::NarrativeError;
    use crate::narrator::{AdvisoryContext, Narrator};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::ServiceExt;

    fn sample_body() -> Value {
        json!({
            "monthly_income": 75000,
            "fixed_expenses": 35000,
            "total_emi": 15000,
            "existing_savings": 200000,
            "dependents": 2,
            "age": 32,
            "insurance_premium": 5000,
            "investments": 100000,
            "goals": "Buy a house"
        })
    }

    fn offline_app() -> Router {
        router(Arc::new(AdvisorService::offline()))
    }

    fn app_with(narrator: impl Narrator + 'static, timeout: Duration) -> Router {
        let narrator: Arc<dyn Narrator> = Arc::new(narrator);
        router(Arc::new(AdvisorService::new(Some(narrator), timeout, false)))
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn get_body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    struct CannedNarrator;

    #[async_trait]
    impl Narrator for CannedNarrator {
        async fn narrate(&self, _context: &AdvisoryContext) -> Result<String, NarrativeError> {
            Ok("Sab theek hai, bas EMI pe nazar rakhiye.".to_string())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    struct BrokenNarrator;

    #[async_trait]
    impl Narrator for BrokenNarrator {
        async fn narrate(&self, _context: &AdvisoryContext) -> Result<String, NarrativeError> {
            Err(NarrativeError::EmptyReply)
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    struct SlowNarrator;

    #[async_trait]
    impl Narrator for SlowNarrator {
        async fn narrate(&self, _context: &AdvisoryContext) -> Result<String, NarrativeError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("late".to_string())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn root_reports_service_status() {
        let response = offline_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert_eq!(json["message"], STATUS_MESSAGE);
    }

    #[tokio::test]
    async fn analyze_returns_full_result_shape() {
        let response = offline_app()
            .oneshot(post_json("/analyze", &sample_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        let json = get_body_json(response).await;

        let score = json["score"].as_u64().unwrap();
        assert!(score <= 100);
        assert!(json["risk_zone"].is_string());
        assert!((json["ratios"]["emi_to_income"].as_f64().unwrap() - 0.2).abs() < 1e-9);
        assert!((json["ratios"]["runway_months"].as_f64().unwrap() - 4.0).abs() < 1e-9);
        assert!(json["ratios"]["savings_rate"].is_number());
        assert!(json["ratios"]["expense_to_income"].is_number());
        assert_eq!(json["projection"]["risk_3_month"], "Low");
        assert_eq!(json["projection"]["risk_6_month"], "Low");
        assert!(json["ai_advice"].as_str().unwrap().starts_with("Overall: "));
    }

    #[tokio::test]
    async fn analyze_rejects_zero_income_with_400() {
        let mut body = sample_body();
        body["monthly_income"] = json!(0);

        let response = offline_app()
            .oneshot(post_json("/analyze", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_body_json(response).await;
        assert_eq!(json["error"], InputError::ZeroIncome.to_string());
    }

    #[tokio::test]
    async fn analyze_rejects_negative_fields_with_400() {
        let mut body = sample_body();
        body["total_emi"] = json!(-1);

        let response = offline_app()
            .oneshot(post_json("/analyze", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("total_emi"));
    }

    #[tokio::test]
    async fn overflowing_inputs_are_400_not_null_ratios() {
        let mut body = sample_body();
        body["monthly_income"] = json!(1e-300);
        body["total_emi"] = json!(1e15);

        let response = offline_app()
            .oneshot(post_json("/analyze", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("emi_to_income"));

        let mut body = sample_body();
        body["fixed_expenses"] = json!(1.7e308);
        body["total_emi"] = json!(1.7e308);
        let request = json!({ "current_data": body });
        let response = offline_app()
            .oneshot(post_json("/simulate", &request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable_with_json_error() {
        let mut body = sample_body();
        body.as_object_mut().unwrap().remove("age");

        let response = offline_app()
            .oneshot(post_json("/analyze", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = get_body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("age"));
    }

    #[tokio::test]
    async fn simulate_with_zero_emi_improves_the_score() {
        let baseline = get_body_json(
            offline_app()
                .oneshot(post_json("/analyze", &sample_body()))
                .await
                .unwrap(),
        )
        .await;

        let request = json!({
            "current_data": sample_body(),
            "changes": { "new_emi": 0 }
        });
        let response = offline_app()
            .oneshot(post_json("/simulate", &request))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert_eq!(json["ratios"]["emi_to_income"].as_f64().unwrap(), 0.0);
        assert!(json["score"].as_u64().unwrap() > baseline["score"].as_u64().unwrap());
    }

    #[tokio::test]
    async fn simulate_without_changes_matches_analyze() {
        let analyzed = get_body_json(
            offline_app()
                .oneshot(post_json("/analyze", &sample_body()))
                .await
                .unwrap(),
        )
        .await;

        let request = json!({ "current_data": sample_body() });
        let simulated = get_body_json(
            offline_app()
                .oneshot(post_json("/simulate", &request))
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(simulated, analyzed);
    }

    #[tokio::test]
    async fn simulate_rejects_negative_new_emi() {
        let request = json!({
            "current_data": sample_body(),
            "changes": { "new_emi": -100 }
        });
        let response = offline_app()
            .oneshot(post_json("/simulate", &request))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let response = offline_app()
            .oneshot(
                Request::builder()
                    .uri("/api/nothing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = get_body_json(response).await;
        assert_eq!(json["error"], "Not found");
    }

    #[tokio::test]
    async fn strong_household_serializes_wealth_building_label() {
        let body = json!({
            "monthly_income": 200000,
            "fixed_expenses": 40000,
            "total_emi": 0,
            "existing_savings": 3000000,
            "dependents": 0,
            "age": 28,
            "insurance_premium": 100000,
            "investments": 2000000,
            "goals": ""
        });
        let response = offline_app()
            .oneshot(post_json("/analyze", &body))
            .await
            .unwrap();

        let json = get_body_json(response).await;
        assert_eq!(json["risk_zone"], "Wealth Building");
        assert_eq!(RiskZone::WealthBuilding.label(), "Wealth Building");
    }

    #[tokio::test]
    async fn narrator_text_is_returned_as_ai_advice() {
        let response = app_with(CannedNarrator, Duration::from_secs(1))
            .oneshot(post_json("/analyze", &sample_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert_eq!(json["ai_advice"], "Sab theek hai, bas EMI pe nazar rakhiye.");
    }

    #[tokio::test]
    async fn failing_narrator_still_answers_200_with_rule_advice() {
        let expected = core::analyze(&serde_json::from_value(sample_body()).unwrap()).unwrap();

        let response = app_with(BrokenNarrator, Duration::from_secs(1))
            .oneshot(post_json("/analyze", &sample_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert_eq!(json["ai_advice"], expected.ai_advice);
    }

    #[tokio::test]
    async fn slow_narrator_is_cut_off_by_timeout() {
        let started = std::time::Instant::now();
        let response = app_with(SlowNarrator, Duration::from_millis(50))
            .oneshot(post_json("/analyze", &sample_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(started.elapsed() < Duration::from_secs(5));
        let json = get_body_json(response).await;
        assert!(json["ai_advice"].as_str().unwrap().starts_with("Overall: "));
    }

    #[tokio::test]
    async fn simulate_uses_rule_advice_even_with_narrator() {
        let request = json!({
            "current_data": sample_body(),
            "changes": { "expense_change": -5000 }
        });
        let response = app_with(CannedNarrator, Duration::from_secs(1))
            .oneshot(post_json("/simulate", &request))
            .await
            .unwrap();

        let json = get_body_json(response).await;
        assert!(json["ai_advice"].as_str().unwrap().starts_with("Overall: "));
    }
}
