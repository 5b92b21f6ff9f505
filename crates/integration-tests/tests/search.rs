//! Integration tests for `/api/search` against a mocked SerpAPI.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricetator_integration_tests::{TestApp, TestOptions, json_request, request};

async fn mock_provider(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("tbm", "shop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

async fn search(app: &TestApp, token: &str, product: &str) -> (StatusCode, Value) {
    app.send_json(json_request(
        Method::POST,
        "/api/search",
        Some(token),
        &json!({ "product_name": product }),
    ))
    .await
}

#[tokio::test]
async fn test_single_offer() {
    let server = mock_provider(json!({
        "shopping_results": [{ "price": "₹1,999", "source": "X" }]
    }))
    .await;
    let app = TestApp::new(&TestOptions::with_provider(server.uri()));
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;

    let (status, body) = search(&app, &token, "headphones").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"], "headphones");
    assert_eq!(body["best_price"], 1999);
    assert_eq!(body["total_results"], 1);
    assert_eq!(
        body["results"],
        json!([{
            "platform": "X",
            "price": "₹1,999",
            "link": "#",
            "original": 1999,
            "image": "",
            "savings": 0,
        }])
    );
}

#[tokio::test]
async fn test_no_usable_prices() {
    let server = mock_provider(json!({ "shopping_results": [{ "price": "N/A" }] })).await;
    let app = TestApp::new(&TestOptions::with_provider(server.uri()));
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;

    let (status, body) = search(&app, &token, "unobtainium").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "product": "unobtainium",
            "message": "No prices found for this product",
            "results": [],
        })
    );
}

#[tokio::test]
async fn test_requires_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = TestApp::new(&TestOptions::with_provider(server.uri()));

    let (status, body) = app
        .send_json(json_request(
            Method::POST,
            "/api/search",
            None,
            &json!({ "product_name": "phone" }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_ranking_and_savings() {
    let server = mock_provider(json!({
        "shopping_results": [
            { "price": "₹52,999", "source": "Amazon", "link": "https://a.example" },
            { "price": "₹49,999.00", "source": "Flipkart" },
            { "price": "N/A", "source": "Broken" },
            { "price": 51999, "source": "Croma" },
            { "price": "₹49,999", "source": "Reliance" },
        ]
    }))
    .await;
    let app = TestApp::new(&TestOptions::with_provider(server.uri()));
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;

    let (status, body) = search(&app, &token, "pixel 8").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["best_price"], 49_999);
    assert_eq!(body["total_results"], 4);

    let results = body["results"].as_array().unwrap();
    let platforms: Vec<&str> = results
        .iter()
        .map(|r| r["platform"].as_str().unwrap())
        .collect();
    // Ties keep upstream order.
    assert_eq!(platforms, ["Flipkart", "Reliance", "Croma", "Amazon"]);

    let savings: Vec<u64> = results
        .iter()
        .map(|r| r["savings"].as_u64().unwrap())
        .collect();
    assert_eq!(savings, [0, 0, 2000, 3000]);
}

#[tokio::test]
async fn test_only_first_six_records_considered() {
    let records: Vec<Value> = (1..=8)
        .map(|i| json!({ "price": format!("₹{}", 1000 - i), "source": format!("S{i}") }))
        .collect();
    let server = mock_provider(json!({ "shopping_results": records })).await;
    let app = TestApp::new(&TestOptions::with_provider(server.uri()));
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;

    let (_, body) = search(&app, &token, "cable").await;
    assert_eq!(body["total_results"], 6);
    assert_eq!(body["best_price"], 994);
}

#[tokio::test]
async fn test_blank_product_name() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;

    for body in [json!({ "product_name": "   " }), json!({})] {
        let (status, response) = app
            .send_json(json_request(Method::POST, "/api/search", Some(&token), &body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "Product name is required" }));
    }
}

#[tokio::test]
async fn test_provider_not_configured() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;

    let (status, body) = search(&app, &token, "phone").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "error": "SerpAPI key not configured",
            "message": "Please set SERPAPI_KEY in .env file",
        })
    );

    let (_, history) = app
        .send_json(request(Method::GET, "/api/user/search-history", Some(&token)))
        .await;
    assert_eq!(history["total"], 0);
}

#[tokio::test]
async fn test_provider_failure_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;
    let app = TestApp::new(&TestOptions::with_provider(server.uri()));
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;

    let (status, body) = search(&app, &token, "tv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No prices found for this product");

    let (_, history) = app
        .send_json(request(Method::GET, "/api/user/search-history", Some(&token)))
        .await;
    assert_eq!(history["total"], 1);
    assert_eq!(history["history"][0]["results_count"], 0);
}

#[tokio::test]
async fn test_search_records_history() {
    let server = mock_provider(json!({
        "shopping_results": [
            { "price": "₹300", "source": "A" },
            { "price": "₹200", "source": "B" },
        ]
    }))
    .await;
    let app = TestApp::new(&TestOptions::with_provider(server.uri()));
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;

    search(&app, &token, "  mouse  ").await;
    search(&app, &token, "keyboard").await;

    let (status, body) = app
        .send_json(request(Method::GET, "/api/user/search-history", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["history"][0]["product"], "keyboard");
    assert_eq!(body["history"][1]["product"], "mouse");
    assert_eq!(body["history"][1]["results_count"], 2);
    assert!(
        body["history"][0]["id"]
            .as_str()
            .unwrap()
            .starts_with("u1_")
    );
}
