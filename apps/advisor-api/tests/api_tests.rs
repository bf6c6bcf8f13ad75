// API Integration Tests
//
// Drives the router with tower's oneshot. Redis is never used: the cache is
// either disabled or process-local, and the text generator is a scripted
// fake, so no external service is needed.
// Run with: cargo test -p krishi-advisor-api --test api_tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use advisor_api::{create_router, AdvisorConfig, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use krishi_cache::CacheService;
use krishi_core::prompt::Prompt;
use krishi_core::ReferenceData;
use krishi_llm::{LlmError, LlmResult, TextGenerator};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

// =========================================================================
// Helpers
// =========================================================================

/// Replies with a fixed text, or fails every call.
struct ScriptedGenerator {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(ScriptedGenerator {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(ScriptedGenerator {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &Prompt) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(LlmError::Status {
                status: 503,
                body: "overloaded".to_string(),
            }),
        }
    }
}

/// Tracks how many generations are in flight at once.
struct SlowGenerator {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl SlowGenerator {
    fn new() -> Arc<Self> {
        Arc::new(SlowGenerator {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, _prompt: &Prompt) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(OPERATIONAL_REPLY.to_string())
    }
}

fn state_with(
    config: AdvisorConfig,
    cache: CacheService,
    generator: Option<Arc<dyn TextGenerator>>,
) -> Arc<AppState> {
    Arc::new(AppState::new(config, ReferenceData::builtin(), cache, generator))
}

fn app_with(generator: Option<Arc<dyn TextGenerator>>) -> axum::Router {
    create_router(state_with(
        AdvisorConfig::default(),
        CacheService::disabled(),
        generator,
    ))
}

/// Router over a process-local cache, so repeated requests can hit it.
fn cached_app_with(generator: Option<Arc<dyn TextGenerator>>) -> axum::Router {
    create_router(state_with(
        AdvisorConfig::default(),
        CacheService::in_memory(),
        generator,
    ))
}

fn app() -> axum::Router {
    app_with(None)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_response(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Failed to parse JSON")
}

fn rice_farmer() -> Value {
    json!({
        "cropName": "Rice",
        "status": "COMPLETED",
        "yield": 4000,
        "stages": [
            { "stageName": "Land Preparation", "categories": [
                { "category": "ploughing", "data": { "totalCost": 20000 } }
            ]},
            { "stageName": "Sowing", "categories": [
                { "category": "seed_cost", "data": { "totalCost": 15000 } }
            ]},
            { "stageName": "Harvesting", "categories": [
                { "category": "labour_cost", "data": { "totalCost": 38000 } }
            ]}
        ]
    })
}

const OPERATIONAL_REPLY: &str = r#"Here you go:
```json
{
  "equipmentNeeded": ["Power Tiller", "Sprayer"],
  "effortHours": { "setup": 15, "maintenance": 50, "harvesting": 25 },
  "resourceRequirements": { "water": "1200 mm", "fertilizers": ["Urea"], "pesticides": ["Neem oil"] },
  "maturityTime": 120,
  "riskLevel": "Catastrophic",
  "soilSuitability": { "rating": "Excellent", "reason": "Clay loam holds water" }
}
```"#;

// =========================================================================
// Section 1: Health Check
// =========================================================================

#[tokio::test]
async fn test_health_check() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_response(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["redis"], "not_configured");
    assert_eq!(body["llmConfigured"], false);
    assert!(body["timestamp"].is_string());
}

// =========================================================================
// Section 2: Recommendations
// =========================================================================

#[tokio::test]
async fn test_top_n_recommendations() {
    let response = app()
        .oneshot(post(
            "/api/recommendations",
            json!({ "crops": ["Cabbage", "Tur", "Rice", "Tomato", "Cotton"], "topN": 3 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_response(response).await;
    assert_eq!(body["success"], true);

    let recs = body["data"]["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["cropName"], "Tur");
    assert_eq!(recs[0]["rank"], 1);
    assert_eq!(recs[1]["cropName"], "Cotton");
    let incomes: Vec<i64> = recs.iter().map(|r| r["expectedIncome"].as_i64().unwrap()).collect();
    assert!(incomes.windows(2).all(|w| w[0] >= w[1]));
    assert!(recs[0].get("operationalDetails").is_none());
    assert_eq!(body["data"]["candidates"], 5);
}

#[tokio::test]
async fn test_recommendations_default_to_market_crops() {
    let response = app()
        .oneshot(post("/api/recommendations", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_response(response).await;
    assert_eq!(body["data"]["topN"], 5);
    assert_eq!(body["data"]["recommendations"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["landAreaHectares"], 0.6);
}

#[tokio::test]
async fn test_recommendations_with_operational_details_fallback() {
    let generator = ScriptedGenerator::failing();
    let response = app_with(Some(generator.clone()))
        .oneshot(post(
            "/api/recommendations",
            json!({ "crops": ["Rice", "Tomato", "Tur"], "topN": 3, "includeOperationalDetails": true }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_response(response).await;
    let recs = body["data"]["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    for rec in recs {
        let details = &rec["operationalDetails"];
        assert_eq!(details["source"], "template");
        assert!(details["maturityTime"].as_u64().unwrap() > 0);
    }
    assert_eq!(generator.calls(), 3);
}

#[tokio::test]
async fn test_invalid_top_n_is_rejected() {
    let response = app()
        .oneshot(post("/api/recommendations", json!({ "topN": 0 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_response(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_single_crop_recommendation() {
    let response = app()
        .oneshot(post(
            "/api/recommendations/crop",
            json!({ "cropName": "Rice", "farmerData": rice_farmer() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_response(response).await;
    assert_eq!(body["success"], true);
    let rec = &body["recommendation"];
    assert_eq!(rec["expectedIncome"], 100000);
    assert_eq!(rec["successRate"], 75);
    assert_eq!(rec["mode"], "farmer_data");
    assert_eq!(rec["successBreakdown"]["roi"], 25);
}

#[tokio::test]
async fn test_missing_crop_name_is_named() {
    let response = app()
        .oneshot(post("/api/recommendations/crop", json!({ "farmerData": rice_farmer() })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_response(response).await;
    assert_eq!(body["error"], "Missing required field(s): cropName");
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/recommendations/crop")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_response(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_JSON");
}

// =========================================================================
// Section 3: Profitability
// =========================================================================

#[tokio::test]
async fn test_profitability_end_to_end() {
    let response = app()
        .oneshot(post(
            "/api/profitability",
            json!({ "cropName": "Rice", "farmerData": rice_farmer() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let data = json_response(response).await["data"].clone();
    assert_eq!(data["totalCost"], 73000.0);
    assert_eq!(data["profit"], 27000.0);
    assert_eq!(data["roi"], 36.99);
    assert_eq!(data["successRate"], 75);
    assert_eq!(data["demand"], "HIGH");
    assert_eq!(data["formatted"]["expectedIncome"], "₹1,00,000");
    assert_eq!(data["formatted"]["profit"], "₹27,000");
    assert_eq!(data["formatted"]["roi"], "36.99%");
    assert_eq!(data["costBreakdown"]["Harvesting"], 38000.0);
}

#[tokio::test]
async fn test_profitability_requires_both_fields() {
    let response = app()
        .oneshot(post("/api/profitability", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_response(response).await;
    assert_eq!(body["error"], "Missing required field(s): cropName, farmerData");
}

#[tokio::test]
async fn test_profitability_zero_cost_guard() {
    let response = app()
        .oneshot(post(
            "/api/profitability",
            json!({ "cropName": "Rice", "farmerData": { "yield": 4000 } }),
        ))
        .await
        .unwrap();

    let data = json_response(response).await["data"].clone();
    assert_eq!(data["totalCost"], 0.0);
    assert_eq!(data["roi"], 0.0);
}

// =========================================================================
// Section 4: Generated Content
// =========================================================================

#[tokio::test]
async fn test_insights_unavailable_without_generator() {
    let response = app()
        .oneshot(post("/api/insights", json!({ "cropName": "Rice" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_response(response).await;
    assert_eq!(body["data"]["insights"]["available"], false);
    assert!(body["data"]["insights"]["message"].is_string());
}

#[tokio::test]
async fn test_insights_keeps_unparseable_text() {
    let generator = ScriptedGenerator::replying("Rice looks promising this season.");
    let response = app_with(Some(generator.clone()))
        .oneshot(post("/api/insights", json!({ "cropName": "Rice" })))
        .await
        .unwrap();

    let body = json_response(response).await;
    assert_eq!(
        body["data"]["insights"]["rawInsights"],
        "Rice looks promising this season."
    );
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_operational_details_template_for_brinjal() {
    let response = app()
        .oneshot(post("/api/operational-details", json!({ "cropName": "BRINJAL" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let data = json_response(response).await["data"].clone();
    assert_eq!(
        data["equipmentNeeded"],
        json!(["Tractor", "Drip Irrigation", "Sprayer", "Harvester"])
    );
    assert_eq!(data["maturityTime"], 90);
    assert_eq!(data["riskLevel"], "Medium");
    assert_eq!(data["source"], "template");
}

#[tokio::test]
async fn test_operational_details_generated_and_coerced() {
    let generator = ScriptedGenerator::replying(OPERATIONAL_REPLY);
    let response = app_with(Some(generator))
        .oneshot(post("/api/operational-details", json!({ "cropName": "Rice" })))
        .await
        .unwrap();

    let data = json_response(response).await["data"].clone();
    assert_eq!(data["source"], "generated");
    assert_eq!(data["equipmentNeeded"], json!(["Power Tiller", "Sprayer"]));
    assert_eq!(data["maturityTime"], 120);
    // Out-of-enum value replaced by the default.
    assert_eq!(data["riskLevel"], "Medium");
    assert_eq!(data["soilSuitability"]["rating"], "Excellent");
    assert!(data["marketAnalysis"]["profitMargin"].is_string());
}

#[tokio::test]
async fn test_natural_farming_parsed_and_unavailable() {
    let generator = ScriptedGenerator::replying(r#"{"jeevamrutha": "Apply every 15 days"}"#);
    let response = app_with(Some(generator))
        .oneshot(post("/api/natural-farming", json!({ "cropName": "Ragi" })))
        .await
        .unwrap();
    let body = json_response(response).await;
    assert_eq!(body["data"]["guidance"]["jeevamrutha"], "Apply every 15 days");

    let response = app_with(Some(ScriptedGenerator::failing()))
        .oneshot(post("/api/natural-farming", json!({ "cropName": "Ragi" })))
        .await
        .unwrap();
    let body = json_response(response).await;
    assert_eq!(body["data"]["guidance"]["available"], false);
}

#[tokio::test]
async fn test_operational_details_prose_reply_uses_template() {
    let generator = ScriptedGenerator::replying("Rice needs a tractor and plenty of standing water.");
    let app = cached_app_with(Some(generator.clone()));

    for expected_calls in 1..=2 {
        let response = app
            .clone()
            .oneshot(post("/api/operational-details", json!({ "cropName": "Rice" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let data = json_response(response).await["data"].clone();
        assert_eq!(data["source"], "template");
        assert_eq!(data["maturityTime"], 120);
        assert_eq!(
            data["equipmentNeeded"],
            json!(["Tractor", "Seed Drill", "Combine Harvester", "Sprayer"])
        );
        // Template fallbacks are not cached, so each request asks again.
        assert_eq!(generator.calls(), expected_calls);
    }
}

#[tokio::test]
async fn test_generation_permits_bound_fan_out() {
    let generator = SlowGenerator::new();
    let config = AdvisorConfig {
        llm_max_concurrency: 2,
        ..AdvisorConfig::default()
    };
    let app = create_router(state_with(config, CacheService::disabled(), Some(generator.clone())));

    let crops = ["Rice", "Tomato", "Onion", "Potato", "Brinjal", "Ragi"];
    let response = app
        .oneshot(post(
            "/api/recommendations",
            json!({ "crops": crops, "topN": 6, "includeOperationalDetails": true }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_response(response).await;
    let recs = body["data"]["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 6);
    for rec in recs {
        assert_eq!(rec["operationalDetails"]["source"], "generated");
    }

    assert_eq!(generator.calls.load(Ordering::SeqCst), 6);
    assert_eq!(generator.peak.load(Ordering::SeqCst), 2);
    assert_eq!(generator.in_flight.load(Ordering::SeqCst), 0);
}

// =========================================================================
// Section 5: Prices and Cache
// =========================================================================

#[tokio::test]
async fn test_price_lookup() {
    let response = app()
        .oneshot(Request::builder().uri("/api/prices/Rice").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let data = json_response(response).await["data"].clone();
    assert_eq!(data["msp"]["crop"], "Paddy");
    assert_eq!(data["selected"]["sourceTable"], "MARKET");
    assert_eq!(data["market"]["history"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_price_lookup_unknown_crop() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/prices/Dragon%20Fruit")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_response(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_cache_invalidation_without_redis() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/cache/insights")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "cropName": "Rice" }).to_string()))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let data = json_response(response).await["data"].clone();
    assert_eq!(data["deleted"], false);
    assert!(data["key"].as_str().unwrap().starts_with("insights:"));
}

#[tokio::test]
async fn test_cache_invalidation_unknown_prefix() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/cache/everything")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "cropName": "Rice" }).to_string()))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cache_hit_skips_generation() {
    let generator = ScriptedGenerator::replying(OPERATIONAL_REPLY);
    let app = cached_app_with(Some(generator.clone()));
    let body = json!({ "cropName": "Rice", "farmerData": rice_farmer() });

    let first = json_response(
        app.clone()
            .oneshot(post("/api/operational-details", body.clone()))
            .await
            .unwrap(),
    )
    .await;
    let second = json_response(
        app.clone()
            .oneshot(post("/api/operational-details", body.clone()))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(generator.calls(), 1);
    assert_eq!(first["data"], second["data"]);
    assert_eq!(second["data"]["source"], "generated");

    // Different stage costs are a different key.
    let mut other_farmer = rice_farmer();
    other_farmer["stages"][2]["categories"][0]["data"]["totalCost"] = json!(60000);
    app.clone()
        .oneshot(post(
            "/api/operational-details",
            json!({ "cropName": "Rice", "farmerData": other_farmer }),
        ))
        .await
        .unwrap();
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_cache_invalidation_forces_regeneration() {
    let generator = ScriptedGenerator::replying(r#"{"summary": "Good season for Rice"}"#);
    let app = cached_app_with(Some(generator.clone()));
    let body = json!({ "cropName": "Rice" });

    for _ in 0..2 {
        app.clone().oneshot(post("/api/insights", body.clone())).await.unwrap();
    }
    assert_eq!(generator.calls(), 1);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/cache/insights")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let data = json_response(app.clone().oneshot(request).await.unwrap()).await["data"].clone();
    assert_eq!(data["deleted"], true);

    app.clone().oneshot(post("/api/insights", body)).await.unwrap();
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_health_reports_in_memory_cache() {
    let response = cached_app_with(None)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = json_response(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["redis"], "in_memory");
}
