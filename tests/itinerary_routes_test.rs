mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use std::sync::Arc;

use common::{config_with_keys, FixedGeocoder, FixedLlm, HotelSearch, TestApp};
use sikkim_itinerary_api::services::fallback_service::generate_fallback;

fn llm_itinerary() -> String {
    format!(
        "Here is your plan:\n{}",
        json!([
            {"day": 1, "title": "Arrival", "activities": ["MG Marg"], "location": "Gangtok", "description": "Capital"},
            {"day": 2, "title": "Lakes", "activities": ["Pemayangtse Monastery"], "location": "Pelling", "description": "West"}
        ])
    )
}

#[actix_rt::test]
async fn test_generate_itinerary_falls_back_when_upstreams_fail() {
    let test_app = TestApp::failing_upstreams();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/generate-itinerary")
        .set_json(json!({"preference": "culture", "days": 3}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["degraded"], true);
    assert_eq!(body["days"], 3);
    assert_eq!(body["preference"], "culture");
    assert!(body["note"].as_str().unwrap().contains("fallback"));
    assert_eq!(
        body["itinerary"],
        serde_json::to_value(generate_fallback("culture", 3)).unwrap()
    );
}

#[actix_rt::test]
async fn test_generate_itinerary_uses_agent_answer() {
    let test_app = TestApp::new(
        config_with_keys(true, true),
        Some(Arc::new(FixedLlm(llm_itinerary()))),
        Some(Arc::new(HotelSearch)),
        None,
    );
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/generate-itinerary")
        .set_json(json!({"preference": "  nature  ", "days": 2}))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["degraded"], false);
    assert_eq!(body["preference"], "nature");
    assert!(body.get("note").is_none());
    assert_eq!(body["itinerary"][1]["location"], "Pelling");
    assert_eq!(body["total_activities"], 2);
    assert_eq!(body["locations"], json!(["Gangtok", "Pelling"]));
}

#[actix_rt::test]
async fn test_generate_itinerary_rejects_empty_preference() {
    let test_app = TestApp::failing_upstreams();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/generate-itinerary")
        .set_json(json!({"preference": "", "days": 5}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "validation_error");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Preference cannot be empty"));
}

#[actix_rt::test]
async fn test_generate_itinerary_rejects_out_of_range_days() {
    let test_app = TestApp::failing_upstreams();
    let app = test::init_service(test_app.create_app()).await;

    for days in [0, 35, -2] {
        let req = test::TestRequest::post()
            .uri("/generate-itinerary")
            .set_json(json!({"preference": "adventure", "days": days}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "days = {}", days);
    }
}

#[actix_rt::test]
async fn test_generate_itinerary_rejects_malformed_body() {
    let test_app = TestApp::failing_upstreams();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/generate-itinerary")
        .set_json(json!({"preference": "culture"}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[actix_rt::test]
async fn test_generate_itinerary_requires_api_keys() {
    let test_app = TestApp::unconfigured();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/generate-itinerary")
        .set_json(json!({"preference": "culture", "days": 3}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "configuration_missing");
}

#[actix_rt::test]
async fn test_validation_runs_before_key_check() {
    let test_app = TestApp::unconfigured();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/generate-itinerary")
        .set_json(json!({"preference": "   ", "days": 3}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_graph_generate_degraded_envelope() {
    let test_app = TestApp::failing_upstreams();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/graph/generate")
        .set_json(json!({"preference": "adventure", "days": 3}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["degraded"], true);
    assert_eq!(body["days"], 3);
    assert_eq!(body["framework"], "Staged pipeline");

    let combined = body["combined"].as_array().unwrap();
    assert_eq!(combined.len(), 3);
    for day in combined {
        assert_eq!(day["accommodations"], json!([]));
    }
    for (_, candidates) in body["accommodations"].as_object().unwrap() {
        assert_eq!(candidates, &json!([]));
    }
}

#[actix_rt::test]
async fn test_graph_generate_attaches_accommodations() {
    let test_app = TestApp::new(
        config_with_keys(true, true),
        Some(Arc::new(FixedLlm(llm_itinerary()))),
        Some(Arc::new(HotelSearch)),
        Some(Arc::new(FixedGeocoder)),
    );
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/graph/generate")
        .set_json(json!({"preference": "nature", "days": 2}))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["degraded"], false);

    let gangtok = body["accommodations"]["Gangtok"].as_array().unwrap();
    assert_eq!(gangtok.len(), 2);
    assert_eq!(gangtok[0]["name"], "Hotel Norbu Ghang");
    assert_eq!(gangtok[0]["lat"], 27.3);
    assert_eq!(gangtok[1]["name"], "Elgin Mount Pandim");
    assert_eq!(body["locations"], json!(["Gangtok", "Pelling"]));
    assert_eq!(body["total_activities"], 2);
    assert_eq!(body["combined"][1]["accommodations"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_graph_generate_without_llm_key_falls_back() {
    let test_app = TestApp::new(
        config_with_keys(false, true),
        None,
        Some(Arc::new(HotelSearch)),
        None,
    );
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/graph/generate")
        .set_json(json!({"preference": "spiritual", "days": 2}))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["degraded"], true);
    assert_eq!(
        body["itinerary"],
        serde_json::to_value(generate_fallback("spiritual", 2)).unwrap()
    );
}

#[actix_rt::test]
async fn test_graph_generate_requires_search_key() {
    let test_app = TestApp::new(config_with_keys(true, false), None, None, None);
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/graph/generate")
        .set_json(json!({"preference": "culture", "days": 2}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn test_agent_smoke_endpoint() {
    let test_app = TestApp::failing_upstreams();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post().uri("/test-agent").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["agent_test"]["preference"], "culture");
    assert_eq!(body["agent_test"]["itinerary"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_agent_smoke_endpoint_requires_keys() {
    let test_app = TestApp::unconfigured();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post().uri("/test-agent").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn test_ai_endpoint_returns_model_text() {
    let test_app = TestApp::new(
        config_with_keys(true, false),
        Some(Arc::new(FixedLlm("[{\"day\": 1}]".to_string()))),
        None,
        None,
    );
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post().uri("/test-ai").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["ai_response"], "[{\"day\": 1}]");
    assert_eq!(body["model"], "llama3-70b-8192");
}

#[actix_rt::test]
async fn test_ai_endpoint_reports_upstream_failure() {
    let test_app = TestApp::failing_upstreams();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post().uri("/test-ai").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "upstream_unavailable");
}

#[actix_rt::test]
async fn test_ai_endpoint_requires_llm_key() {
    let test_app = TestApp::unconfigured();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post().uri("/test-ai").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "configuration_missing");
}
