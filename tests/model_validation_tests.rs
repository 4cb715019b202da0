use chrono::NaiveDate;
use storefront_web::models::{
    Address, AddToCartRequest, CartItem, Order, OrderItem, OrderPage, Product, ProductPage,
    UserInfo, UserProfile, image_src,
};

// --- Backend payloads ---

#[test]
fn test_product_page_reads_flattened_pagination() {
    let json = r#"{
        "content": [
            {"productId": 1, "productName": "Kettle", "quantity": 4, "price": 30.0, "specialPrice": 25.5}
        ],
        "pageNumber": 2,
        "pageSize": 12,
        "totalElements": 30,
        "totalPages": 3,
        "lastPage": true
    }"#;

    let page: ProductPage = serde_json::from_str(json).unwrap();

    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].product_name, "Kettle");
    assert_eq!(page.content[0].special_price, Some(25.5));
    assert_eq!(page.pagination.page_number, 2);
    assert_eq!(page.pagination.total_elements, 30);
    assert!(page.pagination.last_page);
}

#[test]
fn test_order_tolerates_missing_fields() {
    let json = r#"{
        "content": [{"orderId": 9, "orderDate": "2024-03-18", "orderStatus": "Accepted"}]
    }"#;

    let page: OrderPage = serde_json::from_str(json).unwrap();
    let order = &page.content[0];

    assert_eq!(order.order_id, 9);
    assert_eq!(order.order_date, NaiveDate::from_ymd_opt(2024, 3, 18));
    assert!(order.order_items.is_empty());
    assert_eq!(page.pagination.total_pages, 0);
}

#[test]
fn test_user_info_keeps_raw_role_tags() {
    let json = r#"{"id": 5, "username": "ada", "roles": ["ROLE_USER", "ROLE_SELLER"]}"#;

    let user: UserInfo = serde_json::from_str(json).unwrap();

    assert_eq!(user.roles, vec!["ROLE_USER", "ROLE_SELLER"]);
    assert_eq!(user.email, None);
}

#[test]
fn test_add_to_cart_quantity_defaults_to_one() {
    let json = r#"{"product": {"productId": 3, "productName": "Mug", "quantity": 2}}"#;

    let request: AddToCartRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.quantity, 1);
    assert_eq!(request.product.product_id, 3);
}

#[test]
fn test_cart_item_serializes_camel_case() {
    let item = CartItem::from_product(
        &Product {
            product_id: 3,
            product_name: "Mug".to_string(),
            quantity: 10,
            price: 8.0,
            ..Product::default()
        },
        2,
    );

    let json = serde_json::to_value(&item).unwrap();

    assert_eq!(json["productId"], 3);
    assert_eq!(json["productName"], "Mug");
    // Cart quantity, not the stock level.
    assert_eq!(json["quantity"], 2);
    assert!(json.get("product_id").is_none());
}

// --- Derived values ---

#[test]
fn test_effective_price_prefers_special_price() {
    let mut item = CartItem {
        price: 50.0,
        special_price: Some(40.0),
        quantity: 1,
        ..CartItem::default()
    };
    assert_eq!(item.effective_price(), 40.0);

    item.special_price = None;
    assert_eq!(item.effective_price(), 50.0);
}

#[test]
fn test_order_item_line_total() {
    let item = OrderItem {
        quantity: 3,
        ordered_product_price: 12.5,
        ..OrderItem::default()
    };
    assert_eq!(item.line_total(), 37.5);
    assert_eq!(Order::default().order_items.len(), 0);
}

#[test]
fn test_profile_display_name_fallbacks() {
    let mut profile = UserProfile {
        username: Some("ada".to_string()),
        email: Some("ada@shop.test".to_string()),
        name: Some("Ada Lovelace".to_string()),
    };
    assert_eq!(profile.display_name(), Some("Ada Lovelace"));

    profile.name = Some("  ".to_string());
    assert_eq!(profile.display_name(), Some("ada"));

    profile.username = None;
    assert_eq!(profile.display_name(), Some("ada@shop.test"));

    assert_eq!(UserProfile::default().display_name(), None);
}

#[test]
fn test_address_one_line_skips_blank_parts() {
    let address = Address {
        address_id: 1,
        building_name: Some("Unit 4".to_string()),
        street: Some("".to_string()),
        city: Some("Cork".to_string()),
        country: Some("Ireland".to_string()),
        ..Address::default()
    };

    assert_eq!(address.one_line(), "Unit 4, Cork, Ireland");
}

#[test]
fn test_product_availability() {
    let mut product = Product::default();
    assert!(!product.is_available());
    product.quantity = 1;
    assert!(product.is_available());
}

// --- Image URLs ---

#[test]
fn test_image_src_joins_relative_paths() {
    assert_eq!(
        image_src("http://localhost:8080/", "/images/a.png"),
        "http://localhost:8080/images/a.png"
    );
    assert_eq!(
        image_src("http://localhost:8080", "images/a.png"),
        "http://localhost:8080/images/a.png"
    );
    assert_eq!(image_src("", "images/a.png"), "/images/a.png");
}

#[test]
fn test_image_src_strips_only_one_leading_slash() {
    assert_eq!(
        image_src("http://localhost:8080", "//images/a.png"),
        "http://localhost:8080//images/a.png"
    );
}

#[test]
fn test_image_src_passes_absolute_references_through() {
    assert_eq!(
        image_src("http://localhost:8080", "https://cdn.shop.test/a.png"),
        "https://cdn.shop.test/a.png"
    );
    assert_eq!(
        image_src("http://localhost:8080", "data:image/png;base64,AAAA"),
        "data:image/png;base64,AAAA"
    );
    assert_eq!(image_src("http://localhost:8080", ""), "");
}
