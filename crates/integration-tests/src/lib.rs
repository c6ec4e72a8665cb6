//! Integration test support for the Seller Panel.
//!
//! [`FakeMarketplace`] is an in-process marketplace API served by axum on
//! an ephemeral port. It speaks the same JSON envelopes and cookie session
//! as the real backend, records every request it receives, and can be told
//! to expire sessions or fail the next call.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p seller-panel-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_guard` - 401 redirect, detach, concurrent expiry
//! - `forms` - sign-in, sign-up, product editor and filters end to end
//! - `api_cache` - query caching, invalidation and cancellation

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, Query, Request, State},
    http::{
        HeaderMap, StatusCode,
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use seller_panel_core::{AttachmentId, CategoryId, PriceInCents, ProductId, ProductStatus, SellerId};
use seller_panel_dashboard::{
    api::{Attachment, Category, MarketplaceApi, Product, Seller},
    config::DashboardConfig,
    forms::FormContext,
    http::HttpClient,
    navigation::{History, NavigationMode, Navigator, Route},
    notify::NotificationLog,
};

/// Seeded seller account.
pub const SELLER_EMAIL: &str = "ana@example.com";
pub const SELLER_PASSWORD: &str = "secret123";

/// Name of the session cookie set on sign-in.
pub const SESSION_COOKIE: &str = "access_token";

/// Visits reported by the metrics endpoints.
const VIEWS_PER_DAY: [(&str, u64); 3] = [
    ("2024-03-01T00:00:00.000Z", 4),
    ("2024-03-02T00:00:00.000Z", 7),
    ("2024-03-03T00:00:00.000Z", 2),
];

// =============================================================================
// Recorded traffic
// =============================================================================

/// One request as the fake backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    /// JSON body, when the request had one.
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// `"METHOD /path"`, handy for asserting call order.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Whether the body was sent as `multipart/form-data`.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|value| value.starts_with("multipart/form-data"))
    }
}

// =============================================================================
// Backend state
// =============================================================================

struct Account {
    seller: Seller,
    password: String,
}

#[derive(Default)]
struct Db {
    accounts: Vec<Account>,
    sessions: HashMap<String, SellerId>,
    categories: Vec<Category>,
    products: Vec<Product>,
    attachments: Vec<Attachment>,
    requests: Vec<RecordedRequest>,
    fail_next: Option<(StatusCode, Value)>,
    latency: Option<Duration>,
}

type Shared = Arc<Mutex<Db>>;

fn lock(db: &Shared) -> MutexGuard<'_, Db> {
    db.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Db {
    fn seeded() -> Self {
        let seller = Seller {
            id: SellerId::random(),
            name: "Ana Costa".to_string(),
            phone: "11999990000".to_string(),
            email: SELLER_EMAIL.to_string(),
            avatar: None,
        };
        let furniture = Category {
            id: CategoryId::random(),
            title: "Furniture".to_string(),
            slug: "furniture".to_string(),
        };
        let toys = Category {
            id: CategoryId::random(),
            title: "Toys".to_string(),
            slug: "toys".to_string(),
        };
        let cover = Attachment {
            id: AttachmentId::random(),
            url: "http://cdn.test/lamp.png".to_string(),
        };

        let products = vec![
            Product {
                id: ProductId::random(),
                title: "Desk lamp".to_string(),
                description: "Warm light, barely used".to_string(),
                price_in_cents: PriceInCents::new(4990),
                status: ProductStatus::Available,
                owner: Some(seller.clone()),
                category: furniture.clone(),
                attachments: vec![cover.clone()],
            },
            Product {
                id: ProductId::random(),
                title: "Wooden train".to_string(),
                description: String::new(),
                price_in_cents: PriceInCents::new(2500),
                status: ProductStatus::Sold,
                owner: Some(seller.clone()),
                category: toys.clone(),
                attachments: vec![],
            },
        ];

        Self {
            accounts: vec![Account {
                seller,
                password: SELLER_PASSWORD.to_string(),
            }],
            categories: vec![furniture, toys],
            products,
            attachments: vec![cover],
            ..Self::default()
        }
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<SellerId, Failure> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().strip_prefix("access_token="))
            .find_map(|token| self.sessions.get(token).copied())
            .ok_or_else(unauthorized)
    }

    fn seller(&self, id: SellerId) -> Option<&Seller> {
        self.accounts
            .iter()
            .map(|account| &account.seller)
            .find(|seller| seller.id == id)
    }

    fn owned_product(&mut self, seller: SellerId, id: ProductId) -> Result<&mut Product, Failure> {
        let product = self
            .products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Product not found."))?;
        if product.owner.as_ref().map(|owner| owner.id) != Some(seller) {
            return Err(failure(
                StatusCode::FORBIDDEN,
                "You are not the owner of this product.",
            ));
        }
        Ok(product)
    }

    fn count_with_status(&self, seller: SellerId, status: ProductStatus) -> usize {
        self.products
            .iter()
            .filter(|product| product.status == status)
            .filter(|product| product.owner.as_ref().map(|owner| owner.id) == Some(seller))
            .count()
    }
}

// =============================================================================
// Error payloads
// =============================================================================

type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, message: impl Into<Value>) -> Failure {
    (
        status,
        Json(json!({ "statusCode": status.as_u16(), "message": message.into() })),
    )
}

fn unauthorized() -> Failure {
    failure(StatusCode::UNAUTHORIZED, "Unauthorized")
}

// =============================================================================
// Server
// =============================================================================

/// In-process marketplace API.
pub struct FakeMarketplace {
    addr: SocketAddr,
    db: Shared,
    server: JoinHandle<()>,
}

impl std::fmt::Debug for FakeMarketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeMarketplace")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

impl FakeMarketplace {
    /// Bind an ephemeral port on loopback and start serving seeded data.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let db: Shared = Arc::new(Mutex::new(Db::seeded()));

        let app = Router::new()
            .route("/sellers/sessions", post(sign_in))
            .route("/sign-out", post(sign_out))
            .route("/sellers", post(register_seller))
            .route("/sellers/me", get(seller_profile))
            .route("/sellers/metrics/products/sold", get(sold_metric))
            .route("/sellers/metrics/products/available", get(available_metric))
            .route("/sellers/metrics/views", get(views_metric))
            .route("/sellers/metrics/views/days", get(views_per_day))
            .route("/products/me", get(seller_products))
            .route("/products", post(create_product))
            .route("/products/{id}", get(product).put(edit_product))
            .route("/products/{id}/{status}", patch(change_status))
            .route("/categories", get(categories))
            .route("/attachments", post(upload_attachments))
            .layer(middleware::from_fn_with_state(db.clone(), record))
            .with_state(db.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake marketplace");
        let addr = listener
            .local_addr()
            .expect("Fake marketplace has no local address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, db, server }
    }

    /// Base URL of the running backend.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Dashboard configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the loopback URL is rejected.
    #[must_use]
    pub fn config(&self) -> DashboardConfig {
        DashboardConfig::new(&self.base_url()).expect("Loopback URL must be valid")
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.db).requests.clone()
    }

    /// `"METHOD /path"` for every request received so far.
    #[must_use]
    pub fn request_lines(&self) -> Vec<String> {
        self.requests().iter().map(RecordedRequest::line).collect()
    }

    pub fn clear_requests(&self) {
        lock(&self.db).requests.clear();
    }

    /// Forget every session; the next protected call answers 401.
    pub fn expire_sessions(&self) {
        lock(&self.db).sessions.clear();
    }

    /// Answer the next request with this status and message instead of
    /// handling it.
    pub fn fail_next(&self, status: u16, message: &str) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        lock(&self.db).fail_next = Some((status, json!(message)));
    }

    /// Delay every response by this long (`None` to stop).
    pub fn set_latency(&self, latency: Option<Duration>) {
        lock(&self.db).latency = latency;
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        lock(&self.db).categories.clone()
    }

    /// Current state of every product, seeded ones first.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        lock(&self.db).products.clone()
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        lock(&self.db).products.iter().find(|p| p.id == id).cloned()
    }

    /// Registered sellers, including the seeded one.
    #[must_use]
    pub fn sellers(&self) -> Vec<Seller> {
        lock(&self.db)
            .accounts
            .iter()
            .map(|account| account.seller.clone())
            .collect()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        lock(&self.db).sessions.len()
    }
}

impl Drop for FakeMarketplace {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Middleware
// =============================================================================

/// Record the request, then apply the configured latency and failure.
async fn record(State(db): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, usize::MAX).await else {
        return failure(StatusCode::BAD_REQUEST, "Unreadable body").into_response();
    };

    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let (fail, latency) = {
        let mut db = lock(&db);
        db.requests.push(RecordedRequest {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            body: serde_json::from_slice(&bytes).ok(),
            content_type,
        });
        (db.fail_next.take(), db.latency)
    };

    if let Some(latency) = latency {
        tokio::time::sleep(latency).await;
    }
    if let Some((status, message)) = fail {
        return failure(status, message).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// =============================================================================
// Sessions and sellers
// =============================================================================

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn sign_in(State(db): State<Shared>, Json(body): Json<Credentials>) -> Result<Response, Failure> {
    let mut db = lock(&db);
    let seller_id = db
        .accounts
        .iter()
        .find(|account| account.seller.email == body.email && account.password == body.password)
        .map(|account| account.seller.id)
        .ok_or_else(|| failure(StatusCode::FORBIDDEN, "Invalid credentials."))?;

    let token = uuid::Uuid::new_v4().to_string();
    db.sessions.insert(token.clone(), seller_id);

    Ok((
        [(SET_COOKIE, format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly"))],
        Json(json!({ "accessToken": token })),
    )
        .into_response())
}

async fn sign_out(State(db): State<Shared>, headers: HeaderMap) -> Result<Response, Failure> {
    let mut db = lock(&db);
    let seller_id = db.authenticate(&headers)?;
    db.sessions.retain(|_, id| *id != seller_id);

    Ok((
        [(SET_COOKIE, format!("{SESSION_COOKIE}=; Path=/; Max-Age=0"))],
        StatusCode::OK,
    )
        .into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Registration {
    name: String,
    phone: String,
    email: String,
    avatar_id: Option<AttachmentId>,
    password: String,
    password_confirmation: String,
}

async fn register_seller(
    State(db): State<Shared>,
    Json(body): Json<Registration>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut db = lock(&db);
    if body.password != body.password_confirmation {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            json!(["passwordConfirmation must match password"]),
        ));
    }
    if db.accounts.iter().any(|account| account.seller.email == body.email) {
        return Err(failure(
            StatusCode::CONFLICT,
            "Seller with same e-mail already exists.",
        ));
    }
    let avatar = match body.avatar_id {
        Some(id) => Some(
            db.attachments
                .iter()
                .find(|attachment| attachment.id == id)
                .cloned()
                .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Avatar file not found."))?,
        ),
        None => None,
    };

    let seller = Seller {
        id: SellerId::random(),
        name: body.name,
        phone: body.phone,
        email: body.email,
        avatar,
    };
    db.accounts.push(Account {
        seller: seller.clone(),
        password: body.password,
    });

    Ok((StatusCode::CREATED, Json(json!({ "seller": seller }))))
}

async fn seller_profile(State(db): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    let db = lock(&db);
    let seller_id = db.authenticate(&headers)?;
    let seller = db
        .seller(seller_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Seller not found."))?;
    Ok(Json(json!({ "seller": seller })))
}

// =============================================================================
// Products
// =============================================================================

#[derive(Deserialize)]
struct ListQuery {
    search: Option<String>,
    status: Option<ProductStatus>,
}

async fn seller_products(
    State(db): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, Failure> {
    let db = lock(&db);
    let seller_id = db.authenticate(&headers)?;
    let search = query.search.map(|s| s.to_lowercase());

    let products: Vec<&Product> = db
        .products
        .iter()
        .filter(|product| product.owner.as_ref().map(|owner| owner.id) == Some(seller_id))
        .filter(|product| {
            search
                .as_deref()
                .is_none_or(|search| product.title.to_lowercase().contains(search))
        })
        .filter(|product| query.status.is_none_or(|status| product.status == status))
        .collect();

    Ok(Json(json!({ "products": products })))
}

async fn product(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>, Failure> {
    let mut db = lock(&db);
    let seller_id = db.authenticate(&headers)?;
    let product = db.owned_product(seller_id, id)?;
    Ok(Json(json!({ "product": product })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Draft {
    title: String,
    category_id: CategoryId,
    description: String,
    price_in_cents: PriceInCents,
    attachments_ids: Vec<AttachmentId>,
}

/// Resolve a draft's category and attachments.
fn resolve_draft(db: &Db, draft: &Draft) -> Result<(Category, Vec<Attachment>), Failure> {
    if draft.title.trim().is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            json!(["title should not be empty"]),
        ));
    }
    let category = db
        .categories
        .iter()
        .find(|category| category.id == draft.category_id)
        .cloned()
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Category not found."))?;
    let attachments = draft
        .attachments_ids
        .iter()
        .map(|id| {
            db.attachments
                .iter()
                .find(|attachment| attachment.id == *id)
                .cloned()
                .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "Invalid attachment."))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((category, attachments))
}

async fn create_product(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(draft): Json<Draft>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut db = lock(&db);
    let seller_id = db.authenticate(&headers)?;
    let (category, attachments) = resolve_draft(&db, &draft)?;

    let product = Product {
        id: ProductId::random(),
        title: draft.title,
        description: draft.description,
        price_in_cents: draft.price_in_cents,
        status: ProductStatus::Available,
        owner: db.seller(seller_id).cloned(),
        category,
        attachments,
    };
    db.products.push(product.clone());

    Ok((StatusCode::CREATED, Json(json!({ "product": product }))))
}

async fn edit_product(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<ProductId>,
    Json(draft): Json<Draft>,
) -> Result<Json<Value>, Failure> {
    let mut db = lock(&db);
    let seller_id = db.authenticate(&headers)?;
    let (category, attachments) = resolve_draft(&db, &draft)?;

    let product = db.owned_product(seller_id, id)?;
    if product.status == ProductStatus::Sold {
        return Err(failure(
            StatusCode::FORBIDDEN,
            "Sold products cannot be edited.",
        ));
    }
    product.title = draft.title;
    product.description = draft.description;
    product.price_in_cents = draft.price_in_cents;
    product.category = category;
    product.attachments = attachments;

    Ok(Json(json!({ "product": product })))
}

async fn change_status(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path((id, status)): Path<(ProductId, String)>,
) -> Result<StatusCode, Failure> {
    let status: ProductStatus = status
        .parse()
        .map_err(|_| failure(StatusCode::BAD_REQUEST, "Invalid status."))?;

    let mut db = lock(&db);
    let seller_id = db.authenticate(&headers)?;
    let product = db.owned_product(seller_id, id)?;
    if product.status == ProductStatus::Cancelled && status == ProductStatus::Sold {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Cancelled products cannot be sold.",
        ));
    }
    product.status = status;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Categories and attachments
// =============================================================================

async fn categories(State(db): State<Shared>) -> Json<Value> {
    let db = lock(&db);
    Json(json!({ "categories": db.categories }))
}

async fn upload_attachments(
    State(db): State<Shared>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut uploaded = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| failure(StatusCode::BAD_REQUEST, e.body_text()))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| failure(StatusCode::BAD_REQUEST, e.body_text()))?;
        if bytes.is_empty() {
            continue;
        }
        let id = AttachmentId::random();
        uploaded.push(Attachment {
            id,
            url: format!("http://cdn.test/{id}-{file_name}"),
        });
    }

    if uploaded.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "No files uploaded."));
    }

    lock(&db).attachments.extend(uploaded.iter().cloned());
    Ok((StatusCode::CREATED, Json(json!({ "attachments": uploaded }))))
}

// =============================================================================
// Metrics
// =============================================================================

async fn sold_metric(State(db): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    let db = lock(&db);
    let seller_id = db.authenticate(&headers)?;
    Ok(Json(json!({ "amount": db.count_with_status(seller_id, ProductStatus::Sold) })))
}

async fn available_metric(
    State(db): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, Failure> {
    let db = lock(&db);
    let seller_id = db.authenticate(&headers)?;
    Ok(Json(json!({ "amount": db.count_with_status(seller_id, ProductStatus::Available) })))
}

async fn views_metric(State(db): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    lock(&db).authenticate(&headers)?;
    let total: u64 = VIEWS_PER_DAY.iter().map(|(_, amount)| amount).sum();
    Ok(Json(json!({ "amount": total })))
}

async fn views_per_day(State(db): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    lock(&db).authenticate(&headers)?;
    // Served newest first; the client sorts.
    let days: Vec<Value> = VIEWS_PER_DAY
        .iter()
        .rev()
        .map(|(date, amount)| json!({ "date": date, "amount": amount }))
        .collect();
    Ok(Json(json!({ "viewsPerDay": days })))
}

// =============================================================================
// Front-end doubles
// =============================================================================

/// Navigator that records every call, including ones that land on the
/// current route.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: History,
    calls: Mutex<Vec<(Route, NavigationMode)>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn starting_at(route: Route) -> Self {
        Self {
            history: History::starting_at(route),
            calls: Mutex::default(),
        }
    }

    /// Every `navigate` call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<(Route, NavigationMode)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls that replaced the current entry (guard redirects).
    #[must_use]
    pub fn replacements(&self) -> Vec<Route> {
        self.calls()
            .into_iter()
            .filter(|(_, mode)| *mode == NavigationMode::Replace)
            .map(|(route, _)| route)
            .collect()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<Route> {
        self.history.entries()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route, mode: NavigationMode) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((route.clone(), mode));
        self.history.navigate(route, mode);
    }

    fn current(&self) -> Route {
        self.history.current()
    }
}

/// A dashboard wired to a fresh fake backend.
pub struct TestApp {
    pub backend: FakeMarketplace,
    pub client: HttpClient,
    pub api: MarketplaceApi,
    pub navigator: Arc<RecordingNavigator>,
    pub notifications: Arc<NotificationLog>,
    pub ctx: FormContext,
}

impl TestApp {
    /// Start a backend and build a signed-out dashboard sitting on the
    /// sign-in screen.
    ///
    /// # Panics
    ///
    /// Panics if the backend or HTTP client cannot be created.
    pub async fn start() -> Self {
        Self::start_at(Route::sign_in()).await
    }

    /// Same as [`TestApp::start`], with the navigator on `route`.
    ///
    /// # Panics
    ///
    /// Panics if the backend or HTTP client cannot be created.
    pub async fn start_at(route: Route) -> Self {
        let backend = FakeMarketplace::start().await;
        let config = backend.config();
        let client = HttpClient::new(&config).expect("Failed to create HTTP client");
        let api = MarketplaceApi::new(client.clone(), config.cache_ttl);
        let navigator = Arc::new(RecordingNavigator::starting_at(route));
        let notifications = Arc::new(NotificationLog::new());
        let ctx = FormContext::new(api.clone(), navigator.clone(), notifications.clone());

        Self {
            backend,
            client,
            api,
            navigator,
            notifications,
            ctx,
        }
    }

    /// Started and signed in as the seeded seller, with the request log
    /// cleared.
    ///
    /// # Panics
    ///
    /// Panics if signing in fails.
    pub async fn signed_in() -> Self {
        let app = Self::start().await;
        app.api
            .sign_in(&seller_panel_dashboard::api::SignInRequest {
                email: SELLER_EMAIL.to_string(),
                password: secrecy::SecretString::from(SELLER_PASSWORD.to_string()),
            })
            .await
            .expect("Seeded seller must be able to sign in");
        app.backend.clear_requests();
        app
    }

    /// Daily views the backend serves, oldest first.
    #[must_use]
    pub fn expected_views_per_day() -> Vec<(String, u64)> {
        VIEWS_PER_DAY
            .iter()
            .map(|(date, amount)| ((*date).chars().take(10).collect(), *amount))
            .collect()
    }
}

impl std::fmt::Debug for TestApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
