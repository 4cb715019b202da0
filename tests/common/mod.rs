use std::future;

use async_trait::async_trait;
use storefront_web::{
    MockApi,
    api::{OrderScope, PageRequest, StorefrontApi},
    error::ClientError,
    models::{
        Address, CategoryPage, OrderPage, ProductPage, SignInRequest, SignUpRequest,
        SummaryRequest, SummaryResponse, UserInfo, UserProfile,
    },
};

/// StalledApi
///
/// A backend that accepts sign-in but never answers orders, cart additions or
/// summaries, standing in for a hung server or a client that went away.
pub struct StalledApi {
    pub inner: MockApi,
}

impl StalledApi {
    pub fn new() -> Self {
        let mut inner = MockApi::new();
        inner.user = Some(UserInfo {
            id: 1,
            username: "tester".to_string(),
            roles: vec!["ROLE_USER".to_string()],
            ..UserInfo::default()
        });
        Self { inner }
    }
}

#[async_trait]
impl StorefrontApi for StalledApi {
    async fn sign_in(&self, request: &SignInRequest) -> Result<UserInfo, ClientError> {
        self.inner.sign_in(request).await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ClientError> {
        self.inner.sign_up(request).await
    }

    async fn current_user(&self) -> Result<UserInfo, ClientError> {
        self.inner.current_user().await
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        self.inner.sign_out().await
    }

    async fn get_products(&self, page: &PageRequest) -> Result<ProductPage, ClientError> {
        self.inner.get_products(page).await
    }

    async fn get_categories(&self) -> Result<CategoryPage, ClientError> {
        self.inner.get_categories().await
    }

    async fn get_user_orders(&self, _page: &PageRequest) -> Result<OrderPage, ClientError> {
        future::pending().await
    }

    async fn get_managed_orders(
        &self,
        scope: OrderScope,
        page: &PageRequest,
    ) -> Result<OrderPage, ClientError> {
        self.inner.get_managed_orders(scope, page).await
    }

    async fn get_user_profile(&self) -> Result<UserProfile, ClientError> {
        self.inner.get_user_profile().await
    }

    async fn get_user_addresses(&self) -> Result<Vec<Address>, ClientError> {
        self.inner.get_user_addresses().await
    }

    async fn add_to_cart(&self, _product_id: i64, _quantity: i64) -> Result<(), ClientError> {
        future::pending().await
    }

    async fn summarize(&self, _request: &SummaryRequest) -> Result<SummaryResponse, ClientError> {
        future::pending().await
    }
}
