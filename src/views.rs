use serde::Serialize;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    guard::{AccessDecision, PageClass, Viewer, decide},
    models::{Address, CartItem, Category, Order, Pagination, Product, UserInfo, image_src},
    store::{RequestKind, State},
};

/// SessionView
///
/// Who is driving the session, as the browser renderer needs it for its chrome.
#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionView {
    pub viewer: Viewer,
    pub user: Option<UserInfo>,
}

impl SessionView {
    pub fn from_state(state: &State) -> Self {
        Self {
            viewer: state.viewer(),
            user: state.auth.user.clone(),
        }
    }
}

/// ScreenView
///
/// Screens without data of their own (login, register).
#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScreenView {
    pub screen: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCardView {
    pub product: Product,
    pub image_url: String,
    pub available: bool,
}

impl ProductCardView {
    pub fn new(product: &Product, backend_url: &str) -> Self {
        Self {
            product: product.clone(),
            image_url: image_src(backend_url, product.image.as_deref().unwrap_or_default()),
            available: product.is_available(),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogView {
    /// `None` until the first page arrived.
    pub products: Option<Vec<ProductCardView>>,
    pub pagination: Option<Pagination>,
    pub categories: Option<Vec<Category>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogView {
    pub fn from_state(state: &State, backend_url: &str) -> Self {
        Self {
            products: state.products.products.as_ref().map(|products| {
                products
                    .iter()
                    .map(|p| ProductCardView::new(p, backend_url))
                    .collect()
            }),
            pagination: state.products.pagination,
            categories: state.products.categories.clone(),
            loading: state.errors.is_loading(RequestKind::Products),
            error: state.errors.failure(RequestKind::Products).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoriesView {
    pub categories: Option<Vec<Category>>,
    pub error: Option<String>,
}

impl CategoriesView {
    pub fn from_state(state: &State) -> Self {
        Self {
            categories: state.products.categories.clone(),
            error: state
                .errors
                .failure(RequestKind::Categories)
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_price: f64,
    pub error: Option<String>,
}

impl CartView {
    pub fn from_state(state: &State) -> Self {
        Self {
            items: state.cart.items.clone(),
            total_price: state.cart.total_price,
            error: state.errors.failure(RequestKind::Cart).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutView {
    pub cart: CartView,
    pub addresses: Vec<Address>,
    pub error: Option<String>,
}

impl CheckoutView {
    pub fn from_state(state: &State) -> Self {
        Self {
            cart: CartView::from_state(state),
            addresses: state.auth.addresses.clone().unwrap_or_default(),
            error: state
                .errors
                .failure(RequestKind::UserAddresses)
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfileView {
    /// `None` while the profile is still loading.
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// One line per address; empty when the viewer has none.
    pub addresses: Vec<String>,
    pub error: Option<String>,
}

impl ProfileView {
    pub fn from_state(state: &State) -> Self {
        let profile = state.auth.profile.as_ref();
        let error = state
            .errors
            .failure(RequestKind::UserProfile)
            .or_else(|| state.errors.failure(RequestKind::UserAddresses))
            .map(str::to_string);

        Self {
            display_name: profile.and_then(|p| p.display_name()).map(str::to_string),
            email: profile.and_then(|p| p.email.clone()),
            addresses: state
                .auth
                .addresses
                .iter()
                .flatten()
                .map(Address::one_line)
                .collect(),
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrdersView {
    /// `None` while loading ("Loading orders..."); empty means "You have no orders yet."
    pub orders: Option<Vec<Order>>,
    pub pagination: Option<Pagination>,
    pub error: Option<String>,
}

impl OrdersView {
    pub fn user_orders(state: &State) -> Self {
        Self {
            orders: state.orders.user_orders.clone(),
            pagination: state.orders.user_pagination,
            error: state
                .errors
                .failure(RequestKind::UserOrders)
                .map(str::to_string),
        }
    }

    pub fn managed_orders(state: &State) -> Self {
        Self {
            orders: state.orders.managed_orders.clone(),
            pagination: state.orders.managed_pagination,
            error: state
                .errors
                .failure(RequestKind::ManagedOrders)
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct NavItem {
    pub label: String,
    pub path: String,
}

const ADMIN_NAV: [(&str, &str); 5] = [
    ("Dashboard", "/admin"),
    ("Orders", "/admin/orders"),
    ("Products", "/admin/products"),
    ("Categories", "/admin/categories"),
    ("Sellers", "/admin/sellers"),
];

/// Dashboard entries the viewer is allowed to open.
pub fn admin_navigation<S: AsRef<str>>(viewer: &Viewer, seller_allowed_prefixes: &[S]) -> Vec<NavItem> {
    ADMIN_NAV
        .iter()
        .filter(|(_, path)| {
            decide(viewer, PageClass::Restricted, path, seller_allowed_prefixes)
                == AccessDecision::Allow
        })
        .map(|(label, path)| NavItem {
            label: label.to_string(),
            path: path.to_string(),
        })
        .collect()
}

/// DashboardView
///
/// One admin/seller dashboard screen. `orders` and `catalog` are only filled on
/// the sections that show them.
#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardView {
    pub section: String,
    pub navigation: Vec<NavItem>,
    pub orders: Option<OrdersView>,
    pub catalog: Option<CatalogView>,
}
