use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::ClientError,
    models::{
        Address, ApiMessage, CategoryPage, OrderPage, ProductPage, SignInRequest, SignUpRequest,
        SummaryRequest, SummaryResponse, UserInfo, UserProfile,
    },
};

/// OrderScope
///
/// Which order listing the managed-orders screen reads: every order (admin) or
/// only orders containing the seller's products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    Seller,
}

/// PageRequest
///
/// Zero-based paging and sorting parameters as the backend expects them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub keyword: Option<String>,
    pub category: Option<String>,
}

impl PageRequest {
    /// Converts a 1-based page from the screen into a 0-based backend page.
    pub fn from_screen_page(page: Option<u32>, page_size: u32) -> Self {
        Self {
            page_number: page.unwrap_or(1).saturating_sub(1),
            page_size,
            ..Self::default()
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("pageNumber", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        let optional = [
            ("sortBy", &self.sort_by),
            ("sortOrder", &self.sort_order),
            ("keyword", &self.keyword),
            ("category", &self.category),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_ref().filter(|v| !v.trim().is_empty()) {
                query.push((name, value.clone()));
            }
        }
        query
    }
}

// 1. Remote API contract
/// StorefrontApi
///
/// The backend calls the screens depend on. Implementations carry the session's
/// credentials implicitly.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn sign_in(&self, request: &SignInRequest) -> Result<UserInfo, ClientError>;
    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ClientError>;
    /// Current user for the session's credentials, if any.
    async fn current_user(&self) -> Result<UserInfo, ClientError>;
    async fn sign_out(&self) -> Result<(), ClientError>;

    async fn get_products(&self, page: &PageRequest) -> Result<ProductPage, ClientError>;
    async fn get_categories(&self) -> Result<CategoryPage, ClientError>;

    async fn get_user_orders(&self, page: &PageRequest) -> Result<OrderPage, ClientError>;
    async fn get_managed_orders(
        &self,
        scope: OrderScope,
        page: &PageRequest,
    ) -> Result<OrderPage, ClientError>;

    async fn get_user_profile(&self) -> Result<UserProfile, ClientError>;
    async fn get_user_addresses(&self) -> Result<Vec<Address>, ClientError>;

    async fn add_to_cart(&self, product_id: i64, quantity: i64) -> Result<(), ClientError>;

    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResponse, ClientError>;
}

/// ApiState
///
/// The API handle stored in each session.
pub type ApiState = Arc<dyn StorefrontApi>;

/// ApiConnector
///
/// Produces the API handle for a new session. The HTTP connector gives every
/// session its own cookie jar.
pub trait ApiConnector: Send + Sync {
    fn connect(&self) -> ApiState;
}

pub type ConnectorState = Arc<dyn ApiConnector>;

// 2. The Real Implementation (reqwest)
/// HttpApi
///
/// Talks to `{BACK_END_URL}/api`. The client keeps a cookie store so the session
/// cookie issued at sign-in rides along on every later call. Every call is bounded
/// by `timeout`; a timed-out call fails like any other transport error.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // The backend usually explains rejections in a `{ "message": ... }` body.
        let message = response
            .json::<ApiMessage>()
            .await
            .ok()
            .and_then(|body| body.message);
        tracing::warn!(status = status.as_u16(), ?message, "backend rejected request");
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(ClientError::EmptyResult("empty body".to_string()));
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::EmptyResult(e.to_string()))
    }
}

#[async_trait]
impl StorefrontApi for HttpApi {
    async fn sign_in(&self, request: &SignInRequest) -> Result<UserInfo, ClientError> {
        self.fetch(self.client.post(self.url("/auth/signin")).json(request))
            .await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ClientError> {
        self.send(self.client.post(self.url("/auth/signup")).json(request))
            .await
            .map(|_| ())
    }

    async fn current_user(&self) -> Result<UserInfo, ClientError> {
        self.fetch(self.client.get(self.url("/auth/user"))).await
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        self.send(self.client.post(self.url("/auth/signout")))
            .await
            .map(|_| ())
    }

    async fn get_products(&self, page: &PageRequest) -> Result<ProductPage, ClientError> {
        self.fetch(
            self.client
                .get(self.url("/public/products"))
                .query(&page.query()),
        )
        .await
    }

    async fn get_categories(&self) -> Result<CategoryPage, ClientError> {
        self.fetch(self.client.get(self.url("/public/categories")))
            .await
    }

    async fn get_user_orders(&self, page: &PageRequest) -> Result<OrderPage, ClientError> {
        self.fetch(self.client.get(self.url("/orders")).query(&page.query()))
            .await
    }

    async fn get_managed_orders(
        &self,
        scope: OrderScope,
        page: &PageRequest,
    ) -> Result<OrderPage, ClientError> {
        let path = match scope {
            OrderScope::All => "/admin/orders",
            OrderScope::Seller => "/seller/orders",
        };
        self.fetch(self.client.get(self.url(path)).query(&page.query()))
            .await
    }

    async fn get_user_profile(&self) -> Result<UserProfile, ClientError> {
        self.fetch(self.client.get(self.url("/user/profile"))).await
    }

    async fn get_user_addresses(&self) -> Result<Vec<Address>, ClientError> {
        self.fetch(self.client.get(self.url("/user/addresses")))
            .await
    }

    async fn add_to_cart(&self, product_id: i64, quantity: i64) -> Result<(), ClientError> {
        let path = format!("/carts/products/{}/quantity/{}", product_id, quantity);
        self.send(self.client.post(self.url(&path))).await.map(|_| ())
    }

    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResponse, ClientError> {
        self.fetch(self.client.post(self.url("/ai/summarize")).json(request))
            .await
    }
}

/// HttpConnector
///
/// Builds a fresh [`HttpApi`] (and therefore a fresh cookie jar) per session.
pub struct HttpConnector {
    base_url: String,
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl ApiConnector for HttpConnector {
    fn connect(&self) -> ApiState {
        match HttpApi::new(&self.base_url, self.timeout) {
            Ok(api) => Arc::new(api),
            Err(e) => {
                // Only fails when the TLS backend cannot initialise; fall back to a
                // client without a cookie store so the shell still serves screens.
                tracing::error!("failed to build session HTTP client: {}", e);
                Arc::new(HttpApi {
                    client: Client::new(),
                    base_url: self.base_url.trim_end_matches('/').to_string(),
                })
            }
        }
    }
}

// 3. The Mock Implementation (For Tests)
/// MockApi
///
/// In-memory backend used by the test suite. Every call is recorded in `calls`
/// so tests can assert which remote paths a screen hit.
#[derive(Default)]
pub struct MockApi {
    /// When true, every call fails with a 500 carrying `failure_message`.
    pub should_fail: bool,
    pub failure_message: Option<String>,
    /// User returned by a successful sign-in; `None` rejects sign-in with 401.
    pub user: Option<UserInfo>,
    pub products: ProductPage,
    pub categories: CategoryPage,
    pub orders: OrderPage,
    pub managed_orders: OrderPage,
    pub profile: UserProfile,
    pub addresses: Vec<Address>,
    /// Summary text; `None` answers with an empty `{}` body.
    pub summary: Option<String>,
    signed_in: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing(message: Option<&str>) -> Self {
        Self {
            should_fail: true,
            failure_message: message.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: impl Into<String>) -> Result<(), ClientError> {
        self.calls.lock().push(call.into());
        if self.should_fail {
            return Err(ClientError::Status {
                status: 500,
                message: self.failure_message.clone(),
            });
        }
        Ok(())
    }

    fn require_session(&self) -> Result<(), ClientError> {
        if *self.signed_in.lock() {
            Ok(())
        } else {
            Err(ClientError::Status {
                status: 401,
                message: Some("Unauthorized".to_string()),
            })
        }
    }
}

#[async_trait]
impl StorefrontApi for MockApi {
    async fn sign_in(&self, request: &SignInRequest) -> Result<UserInfo, ClientError> {
        self.record(format!("POST /auth/signin {}", request.username))?;
        match &self.user {
            Some(user) => {
                *self.signed_in.lock() = true;
                Ok(user.clone())
            }
            None => Err(ClientError::Status {
                status: 401,
                message: Some("Bad credentials".to_string()),
            }),
        }
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ClientError> {
        self.record(format!("POST /auth/signup {}", request.username))
    }

    async fn current_user(&self) -> Result<UserInfo, ClientError> {
        self.record("GET /auth/user")?;
        self.require_session()?;
        self.user
            .clone()
            .ok_or_else(|| ClientError::EmptyResult("no user".to_string()))
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        self.record("POST /auth/signout")?;
        *self.signed_in.lock() = false;
        Ok(())
    }

    async fn get_products(&self, page: &PageRequest) -> Result<ProductPage, ClientError> {
        self.record(format!("GET /public/products?pageNumber={}", page.page_number))?;
        Ok(self.products.clone())
    }

    async fn get_categories(&self) -> Result<CategoryPage, ClientError> {
        self.record("GET /public/categories")?;
        Ok(self.categories.clone())
    }

    async fn get_user_orders(&self, page: &PageRequest) -> Result<OrderPage, ClientError> {
        self.record(format!(
            "GET /orders?pageNumber={}&pageSize={}",
            page.page_number, page.page_size
        ))?;
        self.require_session()?;
        Ok(self.orders.clone())
    }

    async fn get_managed_orders(
        &self,
        scope: OrderScope,
        _page: &PageRequest,
    ) -> Result<OrderPage, ClientError> {
        let path = match scope {
            OrderScope::All => "GET /admin/orders",
            OrderScope::Seller => "GET /seller/orders",
        };
        self.record(path)?;
        self.require_session()?;
        Ok(self.managed_orders.clone())
    }

    async fn get_user_profile(&self) -> Result<UserProfile, ClientError> {
        self.record("GET /user/profile")?;
        self.require_session()?;
        Ok(self.profile.clone())
    }

    async fn get_user_addresses(&self) -> Result<Vec<Address>, ClientError> {
        self.record("GET /user/addresses")?;
        self.require_session()?;
        Ok(self.addresses.clone())
    }

    async fn add_to_cart(&self, product_id: i64, quantity: i64) -> Result<(), ClientError> {
        self.record(format!(
            "POST /carts/products/{}/quantity/{}",
            product_id, quantity
        ))?;
        self.require_session()
    }

    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResponse, ClientError> {
        self.record(format!("POST /ai/summarize {}", request.name))?;
        Ok(SummaryResponse {
            summary: self.summary.clone(),
        })
    }
}

/// A mock shared by every session, so tests can inspect the calls afterwards.
impl ApiConnector for Arc<MockApi> {
    fn connect(&self) -> ApiState {
        self.clone()
    }
}
