//! HTTP client the storefront and the admin dashboard talk through.
//!
//! Reads pass through [`OfflineCache`]; writes go straight to the server.
//! Client-side guards (validation, review throttle, visit cooldown) run before
//! any request is issued.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Method, Url, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::{
    cache::{CachedResponse, OfflineCache},
    error::ClientError,
    local_store::LocalStore,
    session::{ReviewThrottle, VisitTracker},
    store::FlagChange,
};
use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        metrics::{DashboardCounts, TopClient},
        products::ProductDetail,
        recommend::{ShakerRequest, ShakerResponse},
        reviews::CreateReviewRequest,
        visits::{DeviceTraits, RecordVisitRequest, VisitRecorded},
    },
    models::{Product, Review},
    response::ApiResponse,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MenuApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    cache: OfflineCache,
}

impl MenuApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Self::with_http(base_url, http)
    }

    pub fn with_http(base_url: &str, http: reqwest::Client) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            token: None,
            cache: OfflineCache::new(),
        })
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn cache(&self) -> &OfflineCache {
        &self.cache
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Issue one request. Transport failures and 5xx answers are errors so the
    /// cache can step in; other statuses come back as a response.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<CachedResponse, ClientError> {
        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        let response = CachedResponse {
            status: status.as_u16(),
            content_type,
            body,
            from_cache: false,
        };
        if status.is_server_error() {
            return Err(api_error(&response));
        }
        Ok(response)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let url = self.url(path)?;
        let key = url.to_string();
        let response = self
            .cache
            .fetch(&method, &key, || self.send(method.clone(), url, body))
            .await?;
        decode(&response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::GET, path, None).await
    }

    async fn write<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.request(method, path, Some(body)).await
    }

    pub async fn menu(&self, query: Option<&str>, category: Option<&str>) -> Result<Vec<Product>, ClientError> {
        let mut url = self.url("/api/menu")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("per_page", "100");
            if let Some(q) = query.filter(|q| !q.is_empty()) {
                pairs.append_pair("q", q);
            }
            if let Some(category) = category.filter(|c| !c.is_empty()) {
                pairs.append_pair("category", category);
            }
        }
        let path = format!("{}?{}", url.path(), url.query().unwrap_or_default());
        self.get(&path).await
    }

    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        self.get("/api/menu/categories").await
    }

    pub async fn product(&self, id: Uuid) -> Result<ProductDetail, ClientError> {
        self.get(&format!("/api/menu/{id}")).await
    }

    pub async fn reviews(&self, product_id: Uuid) -> Result<Vec<Review>, ClientError> {
        self.get(&format!("/api/menu/{product_id}/reviews")).await
    }

    /// Validate and rate-limit locally, then post the review. The throttle
    /// timestamp is only written once the server accepted it.
    #[instrument(skip(self, store, throttle, review))]
    pub async fn submit_review(
        &self,
        store: &mut LocalStore,
        throttle: &ReviewThrottle,
        product_id: Uuid,
        review: &CreateReviewRequest,
        now: DateTime<Utc>,
    ) -> Result<Review, ClientError> {
        review.validate()?;
        throttle.check(store, product_id, now)?;

        let created: Review = self
            .write(Method::POST, &format!("/api/menu/{product_id}/reviews"), review)
            .await?;
        throttle.record(store, product_id, now)?;
        Ok(created)
    }

    /// Record a visit unless one was sent within the cooldown. Returns `None`
    /// when skipped.
    #[instrument(skip(self, store, tracker, device))]
    pub async fn record_visit(
        &self,
        store: &mut LocalStore,
        tracker: &VisitTracker,
        device: DeviceTraits,
        now: DateTime<Utc>,
    ) -> Result<Option<VisitRecorded>, ClientError> {
        if !tracker.is_due(store, now) {
            tracing::debug!("visit cooldown active");
            return Ok(None);
        }
        let payload = RecordVisitRequest {
            client_id: tracker.client_id(store),
            device,
        };
        let recorded: VisitRecorded = self.write(Method::POST, "/api/visits", &payload).await?;
        tracker.remember(store, recorded.client_id, now)?;
        Ok(Some(recorded))
    }

    pub async fn shake(&self, cravings: Vec<String>) -> Result<ShakerResponse, ClientError> {
        let payload = ShakerRequest { cravings };
        payload.validate()?;
        self.write(Method::POST, "/api/shaker", &payload).await
    }

    /// Log in and keep the bearer token for the admin calls that follow.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        payload.validate()?;
        let session: LoginResponse = self.write(Method::POST, "/api/auth/login", &payload).await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    pub async fn inventory(&self) -> Result<Vec<Product>, ClientError> {
        self.get("/api/admin/products?per_page=100").await
    }

    /// Remote half of an optimistic inventory toggle. Returns the server's
    /// copy of the product.
    #[instrument(skip(self))]
    pub async fn apply_flag(&self, id: Uuid, change: FlagChange) -> Result<Option<Product>, ClientError> {
        let (field, body) = match change {
            FlagChange::Featured(value) => ("featured", json!({ "value": value })),
            FlagChange::Active(value) => ("active", json!({ "value": value })),
            FlagChange::Availability(availability) => {
                ("availability", json!({ "availability": availability }))
            }
        };
        let product: Product = self
            .write(Method::PATCH, &format!("/api/admin/products/{id}/{field}"), &body)
            .await?;
        Ok(Some(product))
    }

    pub async fn dashboard(&self) -> Result<DashboardCounts, ClientError> {
        self.get("/api/admin/metrics/summary").await
    }

    pub async fn top_clients(&self, limit: u32) -> Result<Vec<TopClient>, ClientError> {
        self.get(&format!("/api/admin/metrics/top-clients?limit={limit}"))
            .await
    }

    /// Fetch an image asset, cache-first.
    pub async fn image(&self, url: &str) -> Result<CachedResponse, ClientError> {
        let url = self.url(url)?;
        let key = url.to_string();
        let response = self
            .cache
            .fetch(&Method::GET, &key, || self.send(Method::GET, url, None))
            .await?;
        if !response.is_success() {
            return Err(api_error(&response));
        }
        Ok(response)
    }
}

fn api_error(response: &CachedResponse) -> ClientError {
    let message = serde_json::from_slice::<ApiResponse<Value>>(&response.body)
        .map(|envelope| envelope.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).into_owned());
    ClientError::Api {
        status: response.status,
        message,
    }
}

fn decode<T: DeserializeOwned>(response: &CachedResponse) -> Result<T, ClientError> {
    if !response.is_success() {
        return Err(api_error(response));
    }
    let envelope: ApiResponse<T> =
        serde_json::from_slice(&response.body).map_err(|e| ClientError::Decode(e.to_string()))?;
    envelope
        .data
        .ok_or_else(|| ClientError::Decode("response without data".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> CachedResponse {
        CachedResponse {
            status,
            content_type: Some("application/json".into()),
            body: body.as_bytes().to_vec(),
            from_cache: false,
        }
    }

    #[test]
    fn decode_unwraps_envelope() {
        let value: Vec<String> = decode(&response(
            200,
            r#"{"message":"ok","data":["Drinks"],"meta":null}"#,
        ))
        .unwrap();
        assert_eq!(value, vec!["Drinks".to_string()]);
    }

    #[test]
    fn error_status_carries_server_message() {
        let err = decode::<Value>(&response(
            404,
            r#"{"message":"Not Found","data":{"error":"Not Found"},"meta":null}"#,
        ))
        .unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn plain_text_errors_are_kept() {
        let err = api_error(&response(413, "payload too large"));
        assert!(matches!(err, ClientError::Api { message, .. } if message == "payload too large"));
    }

    #[tokio::test]
    async fn invalid_review_never_reaches_the_network() {
        // nothing listens on this port
        let client = MenuApiClient::new("http://127.0.0.1:9").unwrap();
        let mut store = LocalStore::in_memory();
        let review = CreateReviewRequest {
            author_name: String::new(),
            comment: "great".into(),
            rating: 9,
        };
        let result = client
            .submit_review(
                &mut store,
                &ReviewThrottle::default(),
                Uuid::new_v4(),
                &review,
                Utc::now(),
            )
            .await;
        match result {
            Err(ClientError::Validation(errors)) => {
                let fields = errors.field_errors();
                assert!(fields.contains_key("author_name"));
                assert!(fields.contains_key("rating"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
