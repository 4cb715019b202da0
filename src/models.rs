use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Identity ---

/// UserInfo
///
/// The signed-in user as the backend reports it after sign-in or session restore.
/// `roles` carries the raw backend tags (`ROLE_ADMIN`, ...); the closed role set is
/// derived from it by [`crate::guard::Viewer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserInfo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// UserProfile
///
/// Response of `GET /user/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl UserProfile {
    /// Name shown on the profile screen: name, else username, else email.
    pub fn display_name(&self) -> Option<&str> {
        [&self.name, &self.username, &self.email]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    #[serde(default)]
    pub address_id: i64,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
}

impl Address {
    /// One-line rendering of the non-empty address parts.
    pub fn one_line(&self) -> String {
        [
            &self.building_name,
            &self.street,
            &self.city,
            &self.state,
            &self.pincode,
            &self.country,
        ]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .filter(|v| !v.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

// --- Catalog ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub product_id: i64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    // Units in stock.
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub special_price: Option<f64>,
}

impl Product {
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub category_id: i64,
    #[serde(default)]
    pub category_name: String,
}

/// Pagination
///
/// The paging envelope shared by every paginated backend response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Pagination {
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub last_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductPage {
    pub content: Vec<Product>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryPage {
    pub content: Vec<Category>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// ProductQuery
///
/// Catalog filters forwarded to `GET /public/products`. `page` is 1-based as the
/// screen receives it.
#[derive(Debug, Clone, PartialEq, Deserialize, Default, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

// --- Orders ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    #[serde(default)]
    pub order_item_id: Option<i64>,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub ordered_product_price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.ordered_product_price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub order_id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub address_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderPage {
    pub content: Vec<Order>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

// --- Cart ---

/// CartItem
///
/// A product line in the session cart. `quantity` is the quantity in the cart,
/// not the stock level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub product_id: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub special_price: Option<f64>,
    #[serde(default)]
    pub price: f64,
    pub quantity: i64,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        Self {
            product_id: product.product_id,
            image: product.image.clone(),
            product_name: product.product_name.clone(),
            description: product.description.clone(),
            special_price: product.special_price,
            price: product.price,
            quantity,
        }
    }

    /// Special price when the product is discounted, list price otherwise.
    pub fn effective_price(&self) -> f64 {
        self.special_price.unwrap_or(self.price)
    }
}

/// AddToCartRequest
///
/// Body of `POST /cart`: the product as shown on its card plus the requested quantity.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddToCartRequest {
    pub product: Product,
    #[serde(default = "one")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}

// --- Auth payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Vec<String>,
}

// --- AI summary ---

/// SummaryRequest
///
/// Body sent to `POST /ai/summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SummaryRequest {
    pub name: String,
    pub description: String,
}

impl SummaryRequest {
    pub fn for_product(product: &Product) -> Self {
        Self {
            name: product.product_name.clone(),
            description: product.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<String>,
}

/// Error body the backend attaches to failed calls.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// image_src
///
/// Resolves a product image reference against the backend base URL. Absolute URLs
/// and data URIs pass through; a relative path loses one leading slash and is
/// joined to the base with a slash.
pub fn image_src(backend_base: &str, image: &str) -> String {
    if image.is_empty() {
        return String::new();
    }
    if image.starts_with("http") || image.starts_with("data:") {
        return image.to_string();
    }
    let base = backend_base.trim_end_matches('/');
    let path = image.strip_prefix('/').unwrap_or(image);
    if base.is_empty() {
        format!("/{}", path)
    } else {
        format!("{}/{}", base, path)
    }
}
