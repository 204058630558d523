//! Dashboard API Client
//!
//! Thin JSON client over `reqwest`. No retry, no timeout, no caching.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::dto::{
    ApiResponse, HolderSummary, HolderTickers, Ticker, TickerDetail, TickerQuery, UpdateInfo,
    UpdateOutcome,
};
use super::error::{ClientError, ClientResult};

/// Configuration for [`ApiClient`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Prefix for every endpoint (e.g., "http://localhost:5000"). Empty by default.
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Method, extra headers and body of a request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    /// Add a header. Caller headers win over the JSON default.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the request body
    pub fn json<T: Serialize>(self, value: &T) -> ClientResult<Self> {
        let body = serde_json::to_string(value)?;
        Ok(self.body(body))
    }
}

/// Dashboard API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(ClientConfig::new(base_url))
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Call `base_url + endpoint` and decode the JSON body.
    ///
    /// Non-2xx responses and malformed bodies are errors. Every failure is
    /// logged once and handed back to the caller.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let method = options.method.clone();
        let result = self.send(endpoint, options).await;

        if let Err(e) = &result {
            tracing::error!(
                method = %method,
                endpoint = %endpoint,
                error = %e,
                "API request failed"
            );
        }

        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.config.base_url, endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ClientError::InvalidHeader(name.as_str().to_string()))?;
            headers.insert(name, value);
        }

        let mut builder = self.client.request(options.method, &url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(url = %url, status = status.as_u16(), bytes = bytes.len(), "API response");

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `GET /api/tickers`
    pub async fn get_tickers(&self) -> ClientResult<ApiResponse<Vec<Ticker>>> {
        self.request("/api/tickers", RequestOptions::get()).await
    }

    /// `GET /api/tickers` with paging and holder filters
    pub async fn get_tickers_page(
        &self,
        query: &TickerQuery,
    ) -> ClientResult<ApiResponse<Vec<Ticker>>> {
        let endpoint = format!("/api/tickers{}", query.to_query_string());
        self.request(&endpoint, RequestOptions::get()).await
    }

    /// `GET /api/tickers/{ts_code}/holders`
    pub async fn get_ticker_holders(
        &self,
        ts_code: &str,
    ) -> ClientResult<ApiResponse<TickerDetail>> {
        let endpoint = format!("/api/tickers/{}/holders", urlencoding::encode(ts_code));
        self.request(&endpoint, RequestOptions::get()).await
    }

    /// `POST /api/update-data`
    pub async fn update_data(&self) -> ClientResult<UpdateOutcome> {
        self.request("/api/update-data", RequestOptions::post()).await
    }

    /// `GET /api/update-info`
    pub async fn get_update_info(&self) -> ClientResult<ApiResponse<UpdateInfo>> {
        self.request("/api/update-info", RequestOptions::get()).await
    }

    /// `GET /api/holders`
    pub async fn get_holders(
        &self,
        page: u32,
        per_page: u32,
    ) -> ClientResult<ApiResponse<Vec<HolderSummary>>> {
        let endpoint = format!("/api/holders?page={}&per_page={}", page, per_page);
        self.request(&endpoint, RequestOptions::get()).await
    }

    /// `GET /api/holders/{name}/tickers`
    pub async fn get_holder_tickers(
        &self,
        holder_name: &str,
    ) -> ClientResult<ApiResponse<HolderTickers>> {
        let endpoint = format!("/api/holders/{}/tickers", urlencoding::encode(holder_name));
        self.request(&endpoint, RequestOptions::get()).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::{HeaderMap as AxumHeaders, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::{layer::Context, prelude::*, Layer};

    /// Serve `router` on an ephemeral port and return its base URL
    pub(crate) async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Counts ERROR events
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn dashboard_router() -> Router {
        Router::new()
            .route(
                "/api/tickers",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "data": [
                            {"ts_code": "000001.SZ", "symbol": "000001", "name": "平安银行",
                             "area": "深圳", "industry": "银行", "list_date": "19910403",
                             "holder_count": 3}
                        ],
                        "pagination": {"page": 1, "per_page": 50, "total": 1, "total_pages": 1}
                    }))
                }),
            )
            .route(
                "/api/tickers/:ts_code/holders",
                get(|Path(ts_code): Path<String>| async move {
                    Json(json!({
                        "success": true,
                        "data": {"ts_code": ts_code, "holders": [], "latest_holder_date": "20231231"}
                    }))
                }),
            )
            .route(
                "/api/update-data",
                post(|| async { Json(json!({"success": true, "message": "ok"})) }),
            )
            .route(
                "/api/holders",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    Json(json!({
                        "success": true,
                        "data": [{"holder_name": "张三", "ticker_count": 4}],
                        "pagination": {
                            "page": params.get("page").and_then(|p| p.parse::<u32>().ok()),
                            "per_page": params.get("per_page").and_then(|p| p.parse::<u32>().ok()),
                            "total": 1,
                            "total_pages": 1
                        }
                    }))
                }),
            )
            .route(
                "/api/holders/:name/tickers",
                get(|Path(name): Path<String>| async move {
                    Json(json!({
                        "success": true,
                        "data": {
                            "holder_name": name,
                            "tickers": [
                                {"ts_code": "000001.SZ", "symbol": "000001", "name": "平安银行",
                                 "hold_amount": 1250000.0, "hold_ratio": 0.42,
                                 "hold_change": null, "end_date": "20231231"}
                            ]
                        }
                    }))
                }),
            )
            .route(
                "/echo-headers",
                get(|headers: AxumHeaders| async move {
                    let value = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("")
                            .to_string()
                    };
                    Json(json!({
                        "content_type": value("content-type"),
                        "trace": value("x-trace-id"),
                    }))
                }),
            )
            .route(
                "/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }),
            )
            .route("/garbage", get(|| async { "definitely not json" }))
    }

    #[tokio::test]
    async fn test_get_tickers() {
        let base = spawn_server(dashboard_router()).await;
        let client = ApiClient::with_base_url(base);

        let response = client.get_tickers().await.unwrap();
        assert!(response.success);
        assert_eq!(response.pagination.unwrap().total, 1);

        let tickers = response.into_data().unwrap();
        assert_eq!(tickers[0].ts_code, "000001.SZ");
        assert_eq!(tickers[0].holder_count, 3);
    }

    #[tokio::test]
    async fn test_get_ticker_holders() {
        let base = spawn_server(dashboard_router()).await;
        let client = ApiClient::with_base_url(base);

        let detail = client
            .get_ticker_holders("600519.SH")
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(detail.ts_code, "600519.SH");
        assert_eq!(detail.latest_holder_date.as_deref(), Some("20231231"));
    }

    #[tokio::test]
    async fn test_update_data_posts() {
        let base = spawn_server(dashboard_router()).await;
        let client = ApiClient::with_base_url(base);

        let outcome = client.update_data().await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_get_holders_sends_paging() {
        let base = spawn_server(dashboard_router()).await;
        let client = ApiClient::with_base_url(base);

        let response = client.get_holders(3, 25).await.unwrap();
        let pagination = response.pagination.unwrap();
        assert_eq!(pagination.page, 3);
        assert_eq!(pagination.per_page, 25);

        let holders = response.into_data().unwrap();
        assert_eq!(holders[0].holder_name, "张三");
        assert_eq!(holders[0].ticker_count, 4);
    }

    #[tokio::test]
    async fn test_get_holder_tickers_encodes_name() {
        let base = spawn_server(dashboard_router()).await;
        let client = ApiClient::with_base_url(base);

        let holdings = client
            .get_holder_tickers("张三/基金 A")
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(holdings.holder_name, "张三/基金 A");
        assert_eq!(holdings.tickers[0].ts_code, "000001.SZ");
        assert_eq!(holdings.tickers[0].hold_ratio, Some(0.42));
        assert!(holdings.tickers[0].hold_change.is_none());
    }

    #[tokio::test]
    async fn test_headers_merged() {
        let base = spawn_server(dashboard_router()).await;
        let client = ApiClient::with_base_url(base);

        let echoed: Value = client
            .request(
                "/echo-headers",
                RequestOptions::get().header("X-Trace-Id", "abc123"),
            )
            .await
            .unwrap();
        assert_eq!(echoed["content_type"], "application/json");
        assert_eq!(echoed["trace"], "abc123");

        let overridden: Value = client
            .request(
                "/echo-headers",
                RequestOptions::get().header("Content-Type", "text/plain"),
            )
            .await
            .unwrap();
        assert_eq!(overridden["content_type"], "text/plain");
    }

    #[tokio::test]
    async fn test_non_success_status_logs_once() {
        let base = spawn_server(dashboard_router()).await;
        let client = ApiClient::with_base_url(base);

        let errors = Arc::new(AtomicUsize::new(0));
        let _guard = tracing_subscriber::registry()
            .with(ErrorCounter(Arc::clone(&errors)))
            .set_default();

        let err = client
            .request::<Value>("/broken", RequestOptions::get())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Status { status: 500 }));
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(err.status(), Some(500));
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let base = spawn_server(dashboard_router()).await;
        let client = ApiClient::with_base_url(base);

        let err = client
            .request::<Value>("/garbage", RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_missing_route_is_status_error() {
        let base = spawn_server(dashboard_router()).await;
        let client = ApiClient::with_base_url(base);

        let err = client.get_update_info().await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_default_config_has_empty_base() {
        assert_eq!(ClientConfig::default().base_url, "");
        assert_eq!(
            ClientConfig::new("http://localhost:5000/").base_url,
            "http://localhost:5000"
        );
    }

    #[tokio::test]
    async fn test_invalid_header_rejected() {
        let client = ApiClient::with_base_url("http://127.0.0.1:9");

        let err = client
            .request::<Value>("/api/tickers", RequestOptions::get().header("bad header", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader(ref name) if name == "bad header"));
    }
}
