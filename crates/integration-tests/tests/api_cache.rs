//! Query cache, invalidation, metrics and per-screen cancellation.
//!
//! Run with: cargo test -p seller-panel-integration-tests --test api_cache

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use secrecy::SecretString;
use seller_panel_core::{PriceInCents, ProductStatus};
use seller_panel_dashboard::{
    ApiError,
    api::{ProductDraft, ProductListQuery, RegisterSeller},
    cache::CacheKey,
    forms::session::SignInForm,
    navigation::{Navigator, Route},
    scope::ViewScope,
};
use seller_panel_integration_tests::{SELLER_EMAIL, SELLER_PASSWORD, TestApp};

fn sold_only() -> ProductListQuery {
    ProductListQuery {
        search: None,
        status: Some(ProductStatus::Sold),
    }
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_repeated_reads_hit_the_cache() {
    let app = TestApp::signed_in().await;

    app.api.categories().await.unwrap();
    app.api.categories().await.unwrap();
    app.api.seller_profile().await.unwrap();
    app.api.seller_profile().await.unwrap();

    assert_eq!(
        app.backend.request_lines(),
        vec!["GET /categories", "GET /sellers/me"]
    );
}

#[tokio::test]
async fn test_product_lists_are_cached_per_query() {
    let app = TestApp::signed_in().await;

    let all = app.api.seller_products(&ProductListQuery::default()).await.unwrap();
    let sold = app.api.seller_products(&sold_only()).await.unwrap();
    app.api.seller_products(&sold_only()).await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(sold.len(), 1);
    assert_eq!(app.backend.requests().len(), 2);
}

#[tokio::test]
async fn test_creating_a_product_refreshes_every_list() {
    let app = TestApp::signed_in().await;
    let category = app.backend.categories()[0].clone();
    let attachment = app.backend.products()[0].attachments[0].clone();

    app.api.seller_products(&ProductListQuery::default()).await.unwrap();
    app.api.seller_products(&sold_only()).await.unwrap();
    app.api.categories().await.unwrap();

    let created = app
        .api
        .create_product(&ProductDraft {
            title: "Bookshelf".into(),
            category_id: category.id,
            description: String::new(),
            price_in_cents: PriceInCents::new(8000),
            attachments_ids: vec![attachment.id],
        })
        .await
        .unwrap();

    assert!(
        !app.api
            .cache()
            .contains(&CacheKey::SellerProducts(ProductListQuery::default()))
            .await
    );
    assert!(!app.api.cache().contains(&CacheKey::SellerProducts(sold_only())).await);
    assert!(app.api.cache().contains(&CacheKey::Categories).await);

    let all = app.api.seller_products(&ProductListQuery::default()).await.unwrap();
    assert!(all.iter().any(|p| p.id == created.id));
}

#[tokio::test]
async fn test_sign_out_forgets_everything() {
    let app = TestApp::signed_in().await;
    app.api.seller_profile().await.unwrap();
    app.api.dashboard_summary().await.unwrap();

    app.api.sign_out().await.unwrap();

    assert!(!app.api.cache().contains(&CacheKey::SellerProfile).await);
    assert!(!app.api.cache().contains(&CacheKey::ViewsPerDay).await);

    // Nothing is served from memory for the next session.
    let result = app.api.seller_profile().await;
    assert!(matches!(result, Err(ApiError::Http { status: 401, .. })));
}

#[tokio::test]
async fn test_signing_in_again_does_not_reuse_the_previous_seller() {
    let app = TestApp::signed_in().await;
    app.api.seller_profile().await.unwrap();

    let registered = app
        .api
        .register_seller(&RegisterSeller {
            name: "Carla".into(),
            phone: "11977776666".into(),
            email: "carla@example.com".into(),
            avatar_id: None,
            password: SecretString::from("carla-pw".to_string()),
            password_confirmation: SecretString::from("carla-pw".to_string()),
        })
        .await
        .unwrap();

    let form = SignInForm {
        email: registered.email.clone(),
        password: SecretString::from("carla-pw".to_string()),
    };
    form.submit(&app.ctx).await.unwrap();

    let profile = app.api.seller_profile().await.unwrap();
    assert_eq!(profile.id, registered.id);
    assert_ne!(profile.email, SELLER_EMAIL);
}

// =============================================================================
// Error payloads
// =============================================================================

#[tokio::test]
async fn test_list_messages_are_joined() {
    let app = TestApp::start().await;

    let result = app
        .api
        .register_seller(&RegisterSeller {
            name: "Dora".into(),
            phone: "11955554444".into(),
            email: "dora@example.com".into(),
            avatar_id: None,
            password: SecretString::from("abcdef".to_string()),
            password_confirmation: SecretString::from("abcdeg".to_string()),
        })
        .await;

    assert!(
        matches!(&result, Err(ApiError::Http { status: 400, message }) if message == "passwordConfirmation must match password"),
        "got {result:?}"
    );
}

// =============================================================================
// Metrics
// =============================================================================

#[tokio::test]
async fn test_dashboard_summary() {
    let app = TestApp::signed_in().await;

    let summary = app.api.dashboard_summary().await.unwrap();

    assert_eq!(summary.sold, 1);
    assert_eq!(summary.available, 1);
    assert_eq!(summary.views, 13);

    let days: Vec<(String, u64)> = summary
        .views_per_day
        .iter()
        .map(|day| (day.date.format("%Y-%m-%d").to_string(), day.amount))
        .collect();
    assert_eq!(days, TestApp::expected_views_per_day());
    assert_eq!(summary.views_per_day[0].label(), "01/03");

    let mut lines = app.backend.request_lines();
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "GET /sellers/metrics/products/available",
            "GET /sellers/metrics/products/sold",
            "GET /sellers/metrics/views",
            "GET /sellers/metrics/views/days",
        ]
    );
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_leaving_the_screen_cancels_its_requests() {
    let app = TestApp::signed_in().await;
    app.backend.set_latency(Some(Duration::from_millis(300)));
    let scope = ViewScope::new();

    let (result, ()) = tokio::join!(scope.run(app.api.seller_profile()), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        scope.cancel();
    });

    assert!(matches!(result, Err(ApiError::Cancelled)));
    assert!(!app.api.cache().contains(&CacheKey::SellerProfile).await);

    // A cancelled scope refuses new work outright.
    let before = app.backend.requests().len();
    let result = scope.run(app.api.categories()).await;
    assert!(matches!(result, Err(ApiError::Cancelled)));
    assert_eq!(app.backend.requests().len(), before);
}

#[tokio::test]
async fn test_cancelled_form_leaves_no_trace() {
    let app = TestApp::start().await;
    app.backend.set_latency(Some(Duration::from_millis(300)));
    let scope = ViewScope::new();
    let form = SignInForm {
        email: SELLER_EMAIL.to_string(),
        password: SecretString::from(SELLER_PASSWORD.to_string()),
    };

    let (result, ()) = tokio::join!(scope.run(form.submit(&app.ctx)), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        scope.cancel();
    });

    assert!(matches!(result, Err(ApiError::Cancelled)));
    assert!(app.notifications.is_empty());
    assert_eq!(app.navigator.current(), Route::sign_in());
}

#[tokio::test]
async fn test_dropping_the_scope_cancels_its_token() {
    let scope = ViewScope::new();
    let token = scope.token();
    assert!(!token.is_cancelled());

    drop(scope);

    assert!(token.is_cancelled());
}
