//! HTTP client for the provider gateway
//!
//! Talks JSON to an AWS-compatible endpoint (real gateway or a LocalStack
//! style emulator, per the configured endpoint URL). Listings page through
//! `nextToken` markers the way the upstream APIs do. All calls honor the
//! fetch context's deadline and cancellation token and are smoothed
//! through a single rate limiter so a burst of refreshes cannot trip
//! provider-side throttling.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::fetch::FetchContext;
use crate::provider::mask::mask_environment;
use crate::provider::models::{
    BucketSummary, FunctionSummary, InvocationOutcome, ResourceRecords, ServiceSummary,
};
use crate::provider::{FetchRequest, ResourceFetcher};

/// Requests per second against the provider gateway
const REQUESTS_PER_SECOND: u32 = 10;

/// Thin JSON client over the provider gateway endpoint.
pub struct HttpProviderClient {
    http: reqwest::Client,
    base_url: String,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpProviderClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("lazycloud/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let quota = Quota::per_second(NonZeroU32::new(REQUESTS_PER_SECOND).expect("non-zero"));
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter: RateLimiter::direct(quota),
        })
    }

    /// List every compute function, following pagination markers.
    pub async fn list_functions(
        &self,
        ctx: &FetchContext,
        req: &FetchRequest,
    ) -> Result<Vec<FunctionSummary>, FetchError> {
        let path = format!(
            "/accounts/{}/regions/{}/functions",
            req.account, req.region
        );

        let mut functions = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(token) = marker.take() {
                query.push(("nextToken", token));
            }

            let page: FunctionListDto = self.get_json(ctx, &path, &query).await?;
            functions.extend(page.functions.into_iter().map(FunctionDto::into_summary));

            match page.next_token {
                Some(token) if !token.is_empty() => marker = Some(token),
                _ => break,
            }
        }

        Ok(functions)
    }

    /// Fetch one function's configuration.
    pub async fn get_function(
        &self,
        ctx: &FetchContext,
        req: &FetchRequest,
        name: &str,
    ) -> Result<FunctionSummary, FetchError> {
        let path = format!(
            "/accounts/{}/regions/{}/functions/{}",
            req.account, req.region, name
        );
        let dto: FunctionDto = self.get_json(ctx, &path, &[]).await?;
        Ok(dto.into_summary())
    }

    /// Invoke a function synchronously.
    ///
    /// The response body is the function's raw payload; function-level
    /// errors and the base64 log tail travel in headers, as upstream does.
    pub async fn invoke_function(
        &self,
        ctx: &FetchContext,
        req: &FetchRequest,
        name: &str,
        payload: &[u8],
    ) -> Result<InvocationOutcome, FetchError> {
        self.limiter.until_ready().await;

        let url = format!(
            "{}/accounts/{}/regions/{}/functions/{}/invocations",
            self.base_url, req.account, req.region, name
        );
        let send = self
            .http
            .post(&url)
            .timeout(ctx.deadline)
            .body(payload.to_vec())
            .send();

        let resp = tokio::select! {
            _ = ctx.cancel.cancelled() => {
                return Err(FetchError::Provider("request cancelled".to_string()));
            }
            resp = send => resp?,
        };

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(name.to_string()));
        }
        if resp.status().is_server_error() {
            return Err(FetchError::Provider(format!(
                "invoke returned {}",
                resp.status()
            )));
        }

        let status_code = resp.status().as_u16() as i32;
        let function_error = header_string(&resp, "x-amz-function-error");
        let log_tail = header_string(&resp, "x-amz-log-result")
            .and_then(|raw| BASE64.decode(raw).ok())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
        let payload = resp.bytes().await?.to_vec();

        Ok(InvocationOutcome {
            status_code,
            payload,
            function_error,
            log_tail,
        })
    }

    /// List object-store buckets visible to the account.
    pub async fn list_buckets(
        &self,
        ctx: &FetchContext,
        req: &FetchRequest,
    ) -> Result<Vec<BucketSummary>, FetchError> {
        let path = format!("/accounts/{}/regions/{}/buckets", req.account, req.region);
        let page: BucketListDto = self.get_json(ctx, &path, &[]).await?;
        Ok(page
            .buckets
            .into_iter()
            .map(|b| BucketSummary {
                name: b.name,
                created_at: b.creation_date.and_then(parse_timestamp),
                region: b.region,
            })
            .collect())
    }

    /// List container services across the account's clusters.
    pub async fn list_services(
        &self,
        ctx: &FetchContext,
        req: &FetchRequest,
    ) -> Result<Vec<ServiceSummary>, FetchError> {
        let path = format!("/accounts/{}/regions/{}/services", req.account, req.region);
        let page: ServiceListDto = self.get_json(ctx, &path, &[]).await?;
        Ok(page
            .services
            .into_iter()
            .map(|s| ServiceSummary {
                name: s.service_name,
                cluster: s.cluster_name.unwrap_or_else(|| "default".to_string()),
                status: s.status,
                desired_count: s.desired_count,
                running_count: s.running_count,
            })
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &FetchContext,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        self.limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", url);
        let send = self
            .http
            .get(&url)
            .query(query)
            .timeout(ctx.deadline)
            .send();

        let resp = tokio::select! {
            _ = ctx.cancel.cancelled() => {
                return Err(FetchError::Provider("request cancelled".to_string()));
            }
            resp = send => resp?,
        };

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::Provider("rate limit exceeded".to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Provider(format!("{status}: {body}")));
        }

        Ok(resp.json::<T>().await?)
    }
}

fn header_string(resp: &reqwest::Response, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn parse_timestamp(raw: String) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// Wire shapes, mirroring the upstream APIs

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionListDto {
    #[serde(default)]
    functions: Vec<FunctionDto>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionDto {
    function_name: String,
    #[serde(default)]
    runtime: String,
    #[serde(default)]
    handler: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    memory_size: i32,
    #[serde(default)]
    timeout: i32,
    #[serde(default)]
    last_modified: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    environment: Option<EnvironmentDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentDto {
    #[serde(default)]
    variables: HashMap<String, String>,
}

impl FunctionDto {
    fn into_summary(self) -> FunctionSummary {
        FunctionSummary {
            name: self.function_name,
            runtime: self.runtime,
            handler: self.handler,
            description: self.description.unwrap_or_default(),
            memory_mb: self.memory_size,
            timeout_secs: self.timeout,
            last_modified: self.last_modified.and_then(parse_timestamp),
            status: self.state.unwrap_or_else(|| "Unknown".to_string()),
            environment: mask_environment(
                self.environment.map(|e| e.variables).unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketListDto {
    #[serde(default)]
    buckets: Vec<BucketDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketDto {
    name: String,
    #[serde(default)]
    creation_date: Option<String>,
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceListDto {
    #[serde(default)]
    services: Vec<ServiceDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceDto {
    service_name: String,
    #[serde(default)]
    cluster_name: Option<String>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    desired_count: i32,
    #[serde(default)]
    running_count: i32,
}

// Per-kind fetchers the broker registry dispatches to

/// Fetcher for compute functions: list, detail, or invoke depending on the
/// request scope.
pub struct FunctionsFetcher {
    client: Arc<HttpProviderClient>,
}

impl FunctionsFetcher {
    pub fn new(client: Arc<HttpProviderClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceFetcher for FunctionsFetcher {
    async fn fetch(
        &self,
        ctx: &FetchContext,
        request: &FetchRequest,
    ) -> Result<ResourceRecords, FetchError> {
        match (&request.scope.name, &request.scope.payload) {
            (Some(name), Some(payload)) => Ok(ResourceRecords::Invocation(
                self.client.invoke_function(ctx, request, name, payload).await?,
            )),
            (Some(name), None) => Ok(ResourceRecords::Function(
                self.client.get_function(ctx, request, name).await?,
            )),
            (None, _) => Ok(ResourceRecords::FunctionList(
                self.client.list_functions(ctx, request).await?,
            )),
        }
    }
}

/// Fetcher for object-store buckets.
pub struct BucketsFetcher {
    client: Arc<HttpProviderClient>,
}

impl BucketsFetcher {
    pub fn new(client: Arc<HttpProviderClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceFetcher for BucketsFetcher {
    async fn fetch(
        &self,
        ctx: &FetchContext,
        request: &FetchRequest,
    ) -> Result<ResourceRecords, FetchError> {
        Ok(ResourceRecords::BucketList(
            self.client.list_buckets(ctx, request).await?,
        ))
    }
}

/// Fetcher for container services.
pub struct ServicesFetcher {
    client: Arc<HttpProviderClient>,
}

impl ServicesFetcher {
    pub fn new(client: Arc<HttpProviderClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceFetcher for ServicesFetcher {
    async fn fetch(
        &self,
        ctx: &FetchContext,
        request: &FetchRequest,
    ) -> Result<ResourceRecords, FetchError> {
        Ok(ResourceRecords::ServiceList(
            self.client.list_services(ctx, request).await?,
        ))
    }
}
