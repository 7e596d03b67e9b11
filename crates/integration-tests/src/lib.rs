//! Integration tests for Fake Store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fake-store-integration-tests
//! ```
//!
//! No external services are needed: each test spawns a mock catalog API on
//! an ephemeral port and drives the storefront router in-process.
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Catalog loading states, health checks
//! - `storefront_cart` - Cart add/remove flows through the session

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    routing::get,
};
use fake_store_storefront::{config::StorefrontConfig, state::AppState};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Three products in the shape served by the real catalog API.
#[must_use]
pub fn sample_catalog() -> Value {
    json!([
        {
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style, contrast raglan long sleeve.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        },
        {
            "id": 3,
            "title": "Mens Cotton Jacket",
            "price": 55.99,
            "description": "Great outerwear jackets for Spring/Autumn/Winter.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71li-ujtlUL._AC_UX679_.jpg",
            "rating": { "rate": 4.7, "count": 500 }
        }
    ])
}

/// Serve a mock catalog answering `GET /products` with `status` and `body`.
pub async fn spawn_catalog(status: StatusCode, body: String) -> SocketAddr {
    let router = Router::new().route(
        "/products",
        get(move || {
            let body = body.clone();
            async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Storefront configuration pointed at a catalog on `addr`.
#[must_use]
pub fn test_config(addr: SocketAddr) -> StorefrontConfig {
    let catalog_url = format!("http://{addr}/products");
    StorefrontConfig::from_lookup(|key| match key {
        "CATALOG_URL" => Some(catalog_url.clone()),
        "CATALOG_TIMEOUT_SECS" => Some("5".to_string()),
        _ => None,
    })
    .unwrap()
}

/// A form POST request builder for `path`.
fn form_request(path: &str) -> axum::http::request::Builder {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
}

/// A captured response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A storefront instance plus a single visitor's cookie jar.
pub struct TestStore {
    pub state: AppState,
    app: Router,
    session_cookie: Option<String>,
}

impl TestStore {
    /// Storefront whose catalog fetch has not run yet (`Loading`).
    pub async fn unloaded() -> Self {
        let addr = spawn_catalog(StatusCode::OK, sample_catalog().to_string()).await;
        Self::from_config(test_config(addr))
    }

    /// Storefront with the sample catalog loaded.
    pub async fn loaded() -> Self {
        Self::with_catalog_response(StatusCode::OK, sample_catalog().to_string()).await
    }

    /// Storefront after one catalog fetch against a mock returning `status`/`body`.
    pub async fn with_catalog_response(status: StatusCode, body: String) -> Self {
        let addr = spawn_catalog(status, body).await;
        let store = Self::from_config(test_config(addr));
        store.state.load_catalog().await;
        store
    }

    fn from_config(config: StorefrontConfig) -> Self {
        let state = AppState::new(config).unwrap();
        let app = fake_store_storefront::app(state.clone());
        Self {
            state,
            app,
            session_cookie: None,
        }
    }

    /// A second visitor sharing this storefront (and its session store).
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            state: self.state.clone(),
            app: self.app.clone(),
            session_cookie: None,
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::builder().uri(path);
        self.send(request, Body::empty()).await
    }

    /// POST an `application/x-www-form-urlencoded` body the way HTMX does.
    pub async fn post_form(&mut self, path: &str, form: &str) -> TestResponse {
        let request = form_request(path).header("HX-Request", "true");
        self.send(request, Body::from(form.to_string())).await
    }

    /// POST a form the way a browser without JavaScript does.
    pub async fn post_plain_form(&mut self, path: &str, form: &str) -> TestResponse {
        self.send(form_request(path), Body::from(form.to_string()))
            .await
    }

    /// Add one unit of product `id` and return the drawer response.
    pub async fn add(&mut self, id: i32) -> TestResponse {
        self.post_form("/cart/add", &format!("id={id}")).await
    }

    /// Remove one unit of product `id` and return the drawer response.
    pub async fn remove(&mut self, id: i32) -> TestResponse {
        self.post_form("/cart/remove", &format!("id={id}")).await
    }

    /// Fire `times` HTMX adds of product `id` at once, all with the current
    /// session cookie, and return their statuses.
    ///
    /// # Panics
    ///
    /// Panics if this visitor has no session yet.
    pub async fn add_concurrently(&self, id: i32, times: usize) -> Vec<StatusCode> {
        let cookie = self
            .session_cookie
            .clone()
            .expect("visitor needs a session before concurrent adds");

        let handles: Vec<_> = (0..times)
            .map(|_| {
                let app = self.app.clone();
                let request = form_request("/cart/add")
                    .header("HX-Request", "true")
                    .header(header::COOKIE, cookie.clone())
                    .body(Body::from(format!("id={id}")))
                    .unwrap();
                tokio::spawn(async move { app.oneshot(request).await.unwrap().status() })
            })
            .collect();

        let mut statuses = Vec::with_capacity(times);
        for handle in handles {
            statuses.push(handle.await.unwrap());
        }
        statuses
    }

    /// Current cart as JSON (`/api/cart`).
    pub async fn cart_json(&mut self) -> Value {
        self.get("/api/cart").await.json()
    }

    /// `(id, amount)` pairs of the current cart, in order.
    pub async fn cart_lines(&mut self) -> Vec<(i64, u64)> {
        self.cart_json().await["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|line| {
                (
                    line["id"].as_i64().unwrap(),
                    line["amount"].as_u64().unwrap(),
                )
            })
            .collect()
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(pair) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.session_cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
