//! Integration tests for profile and search history endpoints.

use axum::http::{Method, StatusCode};
use serde_json::json;

use pricetator_core::UserId;
use pricetator_integration_tests::{TestApp, TestOptions, json_request, request};

/// Record searches directly through the store, bypassing the provider.
async fn seed_history(app: &TestApp, user: &str, products: &[&str]) {
    let user_id = UserId::new(user);
    for product in products {
        app.state
            .store()
            .append_history(&user_id, product, 3)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_profile_includes_search_count() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token, _) = app
        .sign_in(&json!({ "sub": "u1", "email": "u1@example.test", "name": "One" }))
        .await;
    seed_history(&app, "u1", &["a", "b", "c"]).await;

    let (status, body) = app
        .send_json(request(Method::GET, "/api/user/profile", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["user_id"], "u1");
    assert_eq!(body["user"]["email"], "u1@example.test");
    assert_eq!(body["user"]["total_searches"], 3);
}

#[tokio::test]
async fn test_update_profile_name() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token, _) = app.sign_in(&json!({ "sub": "u1", "name": "Old" })).await;

    let (status, body) = app
        .send_json(json_request(
            Method::PUT,
            "/api/user/profile",
            Some(&token),
            &json!({ "name": "New Name" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["name"], "New Name");

    let (_, body) = app
        .send_json(request(Method::GET, "/api/user/profile", Some(&token)))
        .await;
    assert_eq!(body["user"]["name"], "New Name");
}

#[tokio::test]
async fn test_update_profile_without_name_is_noop() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token, _) = app.sign_in(&json!({ "sub": "u1", "name": "Kept" })).await;

    let (status, body) = app
        .send_json(json_request(
            Method::PUT,
            "/api/user/profile",
            Some(&token),
            &json!({ "picture": "ignored" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Kept");
}

#[tokio::test]
async fn test_update_profile_unknown_user() {
    let app = TestApp::new(&TestOptions::without_provider());
    let token = app.state.tokens().issue(&UserId::new("ghost")).unwrap();

    let (status, body) = app
        .send_json(json_request(
            Method::PUT,
            "/api/user/profile",
            Some(&token),
            &json!({ "name": "x" }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_delete_history_entry() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;
    seed_history(&app, "u1", &["keep", "drop"]).await;

    let (_, body) = app
        .send_json(request(Method::GET, "/api/user/search-history", Some(&token)))
        .await;
    let drop_id = body["history"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(body["history"][0]["product"], "drop");

    let (status, body) = app
        .send_json(request(
            Method::DELETE,
            &format!("/api/user/search-history/{drop_id}"),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, body) = app
        .send_json(request(Method::GET, "/api/user/search-history", Some(&token)))
        .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["history"][0]["product"], "keep");
}

#[tokio::test]
async fn test_delete_unknown_entry_succeeds() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;

    let (status, body) = app
        .send_json(request(
            Method::DELETE,
            "/api/user/search-history/u1_0.000000",
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_clear_history_twice() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;
    seed_history(&app, "u1", &["a", "b"]).await;

    for _ in 0..2 {
        let (status, body) = app
            .send_json(request(
                Method::DELETE,
                "/api/user/search-history/clear",
                Some(&token),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "message": "Search history cleared" })
        );
    }

    let (_, body) = app
        .send_json(request(Method::GET, "/api/user/search-history", Some(&token)))
        .await;
    assert_eq!(body, json!({ "history": [], "total": 0 }));
}

#[tokio::test]
async fn test_history_capped_at_fifty() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token, _) = app.sign_in(&json!({ "sub": "u1" })).await;
    let products: Vec<String> = (0..=50).map(|i| format!("q{i}")).collect();
    let products: Vec<&str> = products.iter().map(String::as_str).collect();
    seed_history(&app, "u1", &products).await;

    let (_, body) = app
        .send_json(request(Method::GET, "/api/user/search-history", Some(&token)))
        .await;
    assert_eq!(body["total"], 50);
    assert_eq!(body["history"][0]["product"], "q50");
    assert_eq!(body["history"][49]["product"], "q1");
}

#[tokio::test]
async fn test_histories_are_per_user() {
    let app = TestApp::new(&TestOptions::without_provider());
    let (token_a, _) = app.sign_in(&json!({ "sub": "a" })).await;
    let (token_b, _) = app.sign_in(&json!({ "sub": "b" })).await;
    seed_history(&app, "a", &["only-a"]).await;

    let (_, body) = app
        .send_json(request(Method::GET, "/api/user/search-history", Some(&token_b)))
        .await;
    assert_eq!(body["total"], 0);

    let (_, body) = app
        .send_json(request(Method::GET, "/api/user/search-history", Some(&token_a)))
        .await;
    assert_eq!(body["total"], 1);
}
