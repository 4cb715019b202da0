use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    guard::Viewer,
    models::{Address, CartItem, Category, Order, Pagination, Product, UserInfo, UserProfile},
};

/// RequestKind
///
/// Names each kind of remote call a screen can issue. Used for in-flight and
/// failure markers in the errors slice and for request generations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum RequestKind {
    SignIn,
    SignUp,
    Session,
    Products,
    Categories,
    UserOrders,
    ManagedOrders,
    UserProfile,
    UserAddresses,
    Cart,
}

impl RequestKind {
    pub const ALL: [RequestKind; 10] = [
        RequestKind::SignIn,
        RequestKind::SignUp,
        RequestKind::Session,
        RequestKind::Products,
        RequestKind::Categories,
        RequestKind::UserOrders,
        RequestKind::ManagedOrders,
        RequestKind::UserProfile,
        RequestKind::UserAddresses,
        RequestKind::Cart,
    ];
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    pub profile: Option<UserProfile>,
    pub addresses: Option<Vec<Address>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductState {
    pub products: Option<Vec<Product>>,
    pub pagination: Option<Pagination>,
    pub categories: Option<Vec<Category>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderState {
    pub user_orders: Option<Vec<Order>>,
    pub user_pagination: Option<Pagination>,
    pub managed_orders: Option<Vec<Order>>,
    pub managed_pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub total_price: f64,
}

/// ErrorState
///
/// Slice-local request markers: how many requests of each kind are outstanding
/// and the last failure message per kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ErrorState {
    pub in_flight: BTreeMap<RequestKind, u32>,
    pub failures: BTreeMap<RequestKind, String>,
}

impl ErrorState {
    pub fn is_loading(&self, kind: RequestKind) -> bool {
        self.in_flight.get(&kind).is_some_and(|count| *count > 0)
    }

    pub fn failure(&self, kind: RequestKind) -> Option<&str> {
        self.failures.get(&kind).map(String::as_str)
    }
}

/// State
///
/// One immutable snapshot of the whole container. Slices sit behind `Arc` so a
/// dispatch that touches one slice shares the others with the previous snapshot.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub auth: Arc<AuthState>,
    pub products: Arc<ProductState>,
    pub orders: Arc<OrderState>,
    pub cart: Arc<CartState>,
    pub errors: Arc<ErrorState>,
}

impl State {
    pub fn viewer(&self) -> Viewer {
        Viewer::from_user(self.auth.user.as_ref())
    }
}
