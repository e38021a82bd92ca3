use crate::{
    Analytics, CartItem, Order, OrderId, OrderStatus, PaymentMethod, Product, ProductId,
    ProductPayload, Role, User, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// 只有 POST / PUT 携带 JSON 请求体
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Path parameters live on the request struct as `#[serde(skip)]` fields so that
/// the serialized body only carries what the backend expects.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the API base.
    fn path(&self) -> String;
}

macro_rules! fixed_path {
    ($ty:ty, $resp:ty, $method:ident, $path:literal) => {
        impl ApiRequest for $ty {
            type Response = $resp;
            const METHOD: HttpMethod = HttpMethod::$method;
            fn path(&self) -> String {
                $path.to_string()
            }
        }
    };
}

// =========================================================
// 通用响应 (Shared Responses)
// =========================================================

/// `{"status": "...", "message": "..."}` 形式的应答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatusMessage {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 后端错误体 `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// =========================================================
// Catalog
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListProducts;
fixed_path!(ListProducts, Vec<Product>, Get, "/api/products");

#[derive(Debug, Serialize)]
pub struct GetProduct {
    #[serde(skip)]
    pub id: ProductId,
}

impl ApiRequest for GetProduct {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/products/{}", self.id)
    }
}

// =========================================================
// Cart
// =========================================================

#[derive(Debug, Serialize)]
pub struct GetCart;
fixed_path!(GetCart, Vec<CartItem>, Get, "/api/cart");

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: i64,
}
fixed_path!(AddToCart, CartItem, Post, "/api/cart/add");

#[derive(Debug, Serialize)]
pub struct RemoveFromCart {
    #[serde(skip)]
    pub product_id: ProductId,
}

impl ApiRequest for RemoveFromCart {
    type Response = StatusMessage;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/api/cart/remove/{}", self.product_id)
    }
}

#[derive(Debug, Serialize)]
pub struct ClearCart {}
fixed_path!(ClearCart, StatusMessage, Post, "/api/cart/clear");

// =========================================================
// Orders
// =========================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub payment_method: PaymentMethod,
}
fixed_path!(PlaceOrder, Order, Post, "/api/orders/place");

#[derive(Debug, Serialize)]
pub struct ListOrders;
fixed_path!(ListOrders, Vec<Order>, Get, "/api/orders");

#[derive(Debug, Serialize)]
pub struct GetOrder {
    #[serde(skip)]
    pub id: OrderId,
}

impl ApiRequest for GetOrder {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/orders/{}", self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct TrackOrder {
    #[serde(skip)]
    pub id: OrderId,
}

impl ApiRequest for TrackOrder {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/orders/track/{}", self.id)
    }
}

// =========================================================
// Auth & Profile
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
fixed_path!(LoginRequest, TokenResponse, Post, "/api/auth/login");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}
fixed_path!(SignupRequest, TokenResponse, Post, "/api/auth/signup");

/// 读取当前用户，同时充当会话的服务端校验调用
#[derive(Debug, Serialize)]
pub struct GetProfile;
fixed_path!(GetProfile, User, Get, "/api/profile/me");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        "/api/profile/me".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
fixed_path!(
    ChangePasswordRequest,
    StatusMessage,
    Post,
    "/api/profile/change-password"
);

// =========================================================
// Payment bridge
// =========================================================

/// 以卢比为单位的金额，保留两位小数
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentOrder {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}
fixed_path!(
    CreatePaymentOrder,
    ProviderOrder,
    Post,
    "/api/payment/create-order"
);

/// 支付服务商侧订单，`amount` 为最小货币单位（派士）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOrder {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub key_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub order_id: String,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}
fixed_path!(
    PaymentVerification,
    VerificationResult,
    Post,
    "/api/payment/verify"
);

/// 支付校验结果，`status == "success"` 表示签名校验通过
pub type VerificationResult = StatusMessage;

impl StatusMessage {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

// =========================================================
// Admin
// =========================================================

#[derive(Debug, Serialize)]
pub struct AdminAnalytics;
fixed_path!(AdminAnalytics, Analytics, Get, "/api/admin/analytics");

#[derive(Debug, Serialize)]
pub struct AdminListUsers;
fixed_path!(AdminListUsers, Vec<User>, Get, "/api/admin/users");

#[derive(Debug, Serialize)]
pub struct AdminListOrders;
fixed_path!(AdminListOrders, Vec<Order>, Get, "/api/admin/orders");

#[derive(Debug, Serialize)]
pub struct AdminListProducts;
fixed_path!(AdminListProducts, Vec<Product>, Get, "/api/admin/products");

#[derive(Debug, Serialize)]
pub struct ChangeUserRole {
    #[serde(skip)]
    pub user_id: UserId,
    pub role: Role,
}

impl ApiRequest for ChangeUserRole {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/api/admin/users/{}/role", self.user_id)
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateOrderStatus {
    #[serde(skip)]
    pub order_id: OrderId,
    pub status: OrderStatus,
}

impl ApiRequest for UpdateOrderStatus {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/api/admin/orders/{}/status", self.order_id)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateProduct {
    #[serde(flatten)]
    pub payload: ProductPayload,
}
fixed_path!(CreateProduct, Product, Post, "/api/admin/products");

#[derive(Debug, Serialize)]
pub struct UpdateProduct {
    #[serde(skip)]
    pub id: ProductId,
    #[serde(flatten)]
    pub payload: ProductPayload,
}

impl ApiRequest for UpdateProduct {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/api/admin/products/{}", self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteProduct {
    #[serde(skip)]
    pub id: ProductId,
}

impl ApiRequest for DeleteProduct {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/api/admin/products/{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_parameters_stay_out_of_the_body() {
        let req = ChangeUserRole {
            user_id: 7,
            role: Role::Admin,
        };
        assert_eq!(req.path(), "/api/admin/users/7/role");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "role": "ROLE_ADMIN" })
        );

        let req = UpdateOrderStatus {
            order_id: 12,
            status: OrderStatus::Shipped,
        };
        assert_eq!(req.path(), "/api/admin/orders/12/status");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "status": "SHIPPED" })
        );
    }

    #[test]
    fn request_bodies_use_backend_field_names() {
        let body = serde_json::to_value(AddToCart {
            product_id: 3,
            quantity: 2,
        })
        .unwrap();
        assert_eq!(body, json!({ "productId": 3, "quantity": 2 }));

        let body = serde_json::to_value(PlaceOrder {
            payment_method: PaymentMethod::Razorpay,
        })
        .unwrap();
        assert_eq!(body, json!({ "paymentMethod": "RAZORPAY" }));

        let body = serde_json::to_value(UpdateProduct {
            id: 5,
            payload: ProductPayload {
                name: "Speaker".into(),
                description: "Loud".into(),
                price: Decimal::new(150050, 2),
                stock: 4,
                image_url: None,
            },
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "name": "Speaker", "description": "Loud", "price": 1500.5, "stock": 4 })
        );
    }

    #[test]
    fn provider_order_tolerates_missing_fields() {
        let p: ProviderOrder = serde_json::from_value(json!({ "amount": 11800 })).unwrap();
        assert_eq!(p.order_id, None);
        assert_eq!(p.amount, 11800);
        assert_eq!(p.key_id, None);
    }

    #[test]
    fn only_post_and_put_carry_bodies() {
        assert!(!GetCart::METHOD.carries_body());
        assert!(!DeleteProduct::METHOD.carries_body());
        assert!(ClearCart::METHOD.carries_body());
        assert!(UpdateProduct::METHOD.carries_body());
    }
}
