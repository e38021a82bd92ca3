use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;
pub mod serde_helper;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

pub type ProductId = i64;
pub type OrderId = i64;
pub type UserId = i64;

// =========================================================
// 商品 (Catalog)
// =========================================================

/// 商品视图模型
///
/// `price` 与 `stock` 在反序列化时做数值强制转换并保证非负。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub description: String,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "serde_helper::non_negative_decimal"
    )]
    pub price: Decimal,
    #[serde(default, deserialize_with = "serde_helper::non_negative_i64")]
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helper::lenient_string"
    )]
    pub created_at: Option<String>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// 新建 / 编辑商品时提交的载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// =========================================================
// 购物车 (Cart)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default)]
    pub id: i64,
    pub product: Product,
    #[serde(default = "default_quantity", deserialize_with = "serde_helper::quantity")]
    pub quantity: i64,
}

impl CartItem {
    /// 行小计 = 单价 × 数量
    pub fn line_total(&self) -> Decimal {
        line_total(self.product.price, self.quantity)
    }
}

/// 单价 × 数量，溢出时取 `Decimal::MAX`
pub fn line_total(price: Decimal, quantity: i64) -> Decimal {
    price.saturating_mul(Decimal::from(quantity))
}

/// 金额求和，溢出时取 `Decimal::MAX`
pub fn sum_money<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

fn default_quantity() -> i64 {
    1
}

// =========================================================
// 订单 (Orders)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Placed,
    Paid,
    Shipped,
    Delivered,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// 管理端可选的状态（不含 Unknown）
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Paid => "Paid",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Canceled => "Canceled",
            OrderStatus::Unknown => "Unknown",
        }
    }

    /// 从线上的大写字符串解析，未知值返回 `None`
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// 货到付款
    #[default]
    #[serde(rename = "COD")]
    Cod,
    /// 第三方托管收银台
    #[serde(rename = "RAZORPAY")]
    Razorpay,
    #[serde(other)]
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "COD",
            PaymentMethod::Razorpay => "RAZORPAY",
            PaymentMethod::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub id: i64,
    pub product: Product,
    #[serde(default = "default_quantity", deserialize_with = "serde_helper::quantity")]
    pub quantity: i64,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "serde_helper::non_negative_decimal"
    )]
    pub price_at_purchase: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        line_total(self.price_at_purchase, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub payment_status: String,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "serde_helper::non_negative_decimal"
    )]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub items: Vec<OrderItem>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helper::lenient_string"
    )]
    pub created_at: Option<String>,
    /// 仅在管理端列表中返回
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Order {
    pub fn item_count(&self) -> i64 {
        self.items.iter().fold(0, |n, i| n.saturating_add(i.quantity))
    }

    /// 下单人显示名，缺省为 "Guest"
    pub fn customer_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Guest")
    }
}

// =========================================================
// 用户 (Users)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
            Role::Unknown => "ROLE_UNKNOWN",
        }
    }

    /// 从 claim 字符串解析；空串与缺失交由调用方决定默认值
    pub fn from_claim(raw: &str) -> Self {
        match raw {
            "ROLE_USER" => Role::User,
            "ROLE_ADMIN" => Role::Admin,
            _ => Role::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
            Role::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub role: Role,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helper::lenient_string"
    )]
    pub created_at: Option<String>,
}

// =========================================================
// 管理端统计 (Analytics)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    #[serde(default, deserialize_with = "serde_helper::lenient_string")]
    pub date: Option<String>,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "serde_helper::non_negative_decimal"
    )]
    pub sales: Decimal,
    #[serde(default, deserialize_with = "serde_helper::non_negative_u64")]
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub product_name: String,
    #[serde(default, deserialize_with = "serde_helper::non_negative_u64")]
    pub quantity_sold: u64,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "serde_helper::non_negative_decimal"
    )]
    pub revenue: Decimal,
}

/// 管理端统计摘要，所有字段缺省时回退为 0 / 空
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(default, deserialize_with = "serde_helper::non_negative_u64")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "serde_helper::non_negative_u64")]
    pub total_products: u64,
    #[serde(default, deserialize_with = "serde_helper::non_negative_u64")]
    pub total_orders: u64,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "serde_helper::non_negative_decimal"
    )]
    pub total_revenue: Decimal,
    #[serde(default, deserialize_with = "serde_helper::non_negative_u64")]
    pub pending_orders: u64,
    #[serde(default, deserialize_with = "serde_helper::non_negative_u64")]
    pub completed_orders: u64,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub daily_sales: Vec<DailySales>,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub order_status_distribution: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub payment_method_distribution: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub top_selling_products: Vec<ProductSales>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_from_string_heavy_payload() {
        let p: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Noise Cancelling Headphones",
            "description": null,
            "price": "2499.00",
            "stock": "12",
            "imageUrl": "https://cdn.example.com/h.png",
            "createdAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(p.price, Decimal::new(249900, 2));
        assert_eq!(p.stock, 12);
        assert_eq!(p.description, "");
        assert!(p.in_stock());
    }

    #[test]
    fn line_total_saturates_at_decimal_max() {
        let item: CartItem = serde_json::from_value(json!({
            "id": 1,
            "product": { "id": 9, "name": "Ledger", "price": "79228162514264337593543950335", "stock": 1 },
            "quantity": 2
        }))
        .unwrap();
        assert_eq!(item.product.price, Decimal::MAX);
        assert_eq!(item.line_total(), Decimal::MAX);
        assert_eq!(sum_money([Decimal::MAX, Decimal::ONE]), Decimal::MAX);
        assert_eq!(sum_money([Decimal::new(150, 2), Decimal::ONE]), Decimal::new(250, 2));
    }

    #[test]
    fn product_serializes_price_as_number() {
        let p = Product {
            id: 1,
            name: "Cable".into(),
            description: String::new(),
            price: Decimal::new(1999, 2),
            stock: 0,
            image_url: None,
            created_at: None,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["price"], json!(19.99));
        assert!(v.get("imageUrl").is_none());
    }

    #[test]
    fn order_defaults_missing_status_to_placed() {
        let o: Order = serde_json::from_value(json!({
            "id": 42,
            "totalAmount": 118,
            "items": [{ "product": { "id": 1, "name": "Mouse", "price": 100 }, "quantity": 1, "priceAtPurchase": "100" }]
        }))
        .unwrap();
        assert_eq!(o.status, OrderStatus::Placed);
        assert_eq!(o.payment_method, PaymentMethod::Cod);
        assert_eq!(o.item_count(), 1);
        assert_eq!(o.customer_name(), "Guest");
    }

    #[test]
    fn unknown_enum_values_do_not_fail_the_payload() {
        let o: Order = serde_json::from_value(json!({
            "id": 1, "status": "RETURNED", "paymentMethod": "UPI"
        }))
        .unwrap();
        assert_eq!(o.status, OrderStatus::Unknown);
        assert_eq!(o.payment_method, PaymentMethod::Other);

        let u: User = serde_json::from_value(json!({ "id": 9, "role": "ROLE_SUPPORT" })).unwrap();
        assert_eq!(u.role, Role::Unknown);
    }

    #[test]
    fn order_status_parse_is_case_insensitive() {
        assert_eq!(OrderStatus::parse("shipped"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("lost"), None);
    }

    #[test]
    fn analytics_tolerates_sparse_payload() {
        let a: Analytics = serde_json::from_value(json!({
            "totalOrders": 10,
            "totalRevenue": "15000.50",
            "orderStatusDistribution": null
        }))
        .unwrap();
        assert_eq!(a.total_orders, 10);
        assert_eq!(a.total_revenue, Decimal::new(1500050, 2));
        assert!(a.order_status_distribution.is_empty());
        assert!(a.top_selling_products.is_empty());
    }
}
