#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use catalog_api::{
    auth::generate_jwt,
    build_app,
    db::{CatalogStore, MemoryCatalogStore},
    models::{NewProduct, Product},
    state::AppState,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCatalogStore>,
    pub admin: String,
}

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryCatalogStore::new());
        let state = AppState::new(store.clone(), SECRET);
        TestApp {
            router: build_app(state),
            store,
            admin: generate_jwt(Uuid::new_v4(), true, SECRET).unwrap(),
        }
    }

    pub fn user(&self) -> TestUser {
        let id = Uuid::new_v4();
        TestUser {
            id,
            token: generate_jwt(id, false, SECRET).unwrap(),
        }
    }

    pub async fn product(&self, title: &str, description: &str, price: &str) -> Product {
        self.store
            .create_product(&NewProduct {
                title: title.into(),
                description: description.into(),
                price: price.parse().unwrap(),
                image: None,
            })
            .await
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send_raw(method, uri, token, body.map(|json| json.to_string()))
            .await
    }

    /// Like `send`, but with the request body as literal JSON text.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(text) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(text)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }
}

/// Prices serialize as strings; accept numbers too.
pub fn price_of(value: &Value) -> Decimal {
    match &value["price"] {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("no price in {other}"),
    }
}

pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}
