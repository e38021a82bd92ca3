use rust_decimal::{Decimal, RoundingStrategy};

use crate::api::ApiClient;
use crate::error::{StoreError, StoreResult};
use crate::request::HttpClient;
use crate::shared::protocol::{AddToCart, ClearCart, GetCart, RemoveFromCart};
use crate::shared::{CartItem, ProductId, sum_money};

/// 金额保留两位小数，中点远离零舍入
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 购物车金额汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Σ(单价 × 数量)
    pub subtotal: Decimal,
    pub tax: Decimal,
    /// subtotal × (1 + 税率)，两位小数
    pub total: Decimal,
}

impl CartTotals {
    pub fn compute(items: &[CartItem], tax_rate: Decimal) -> Self {
        // 金额溢出时饱和到 Decimal::MAX
        let subtotal = sum_money(items.iter().map(CartItem::line_total));
        Self {
            subtotal,
            tax: round_money(subtotal.saturating_mul(tax_rate)),
            total: round_money(subtotal.saturating_mul(Decimal::ONE.saturating_add(tax_rate))),
        }
    }

    pub fn is_payable(&self) -> bool {
        self.total > Decimal::ZERO
    }
}

/// 购物车内商品件数
pub fn item_count(items: &[CartItem]) -> i64 {
    items.iter().fold(0, |n, i| n.saturating_add(i.quantity))
}

// =========================================================
// 服务层
// =========================================================

pub struct CartService<'a, C> {
    api: &'a ApiClient<C>,
}

impl<'a, C: HttpClient> CartService<'a, C> {
    pub fn new(api: &'a ApiClient<C>) -> Self {
        Self { api }
    }

    pub async fn items(&self) -> StoreResult<Vec<CartItem>> {
        self.api.send(&GetCart).await.map_err(|e| e.in_op("cart.items"))
    }

    pub async fn add(&self, product_id: ProductId, quantity: i64) -> StoreResult<CartItem> {
        if quantity < 1 {
            return Err(StoreError::invalid_input("Quantity must be at least 1").in_op("cart.add"));
        }
        let item = self
            .api
            .send(&AddToCart {
                product_id,
                quantity,
            })
            .await
            .map_err(|e| e.in_op_with("cart.add", product_id.to_string()))?;
        tracing::info!(product_id, quantity, "added to cart");
        Ok(item)
    }

    /// 移除商品后重新拉取购物车
    pub async fn remove(&self, product_id: ProductId) -> StoreResult<Vec<CartItem>> {
        self.api
            .send(&RemoveFromCart { product_id })
            .await
            .map_err(|e| e.in_op_with("cart.remove", product_id.to_string()))?;
        self.items().await
    }

    pub async fn clear(&self) -> StoreResult<()> {
        self.api
            .send(&ClearCart {})
            .await
            .map_err(|e| e.in_op("cart.clear"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::shared::Product;
    use serde_json::json;

    fn item(price: &str, qty: i64) -> CartItem {
        CartItem {
            id: 0,
            product: Product {
                id: 1,
                name: "Item".into(),
                description: String::new(),
                price: price.parse().unwrap(),
                stock: 10,
                image_url: None,
                created_at: None,
            },
            quantity: qty,
        }
    }

    #[test]
    fn totals_apply_eighteen_percent_tax() {
        let items = vec![item("100", 2), item("50", 1)];
        let t = CartTotals::compute(&items, Decimal::new(18, 2));
        assert_eq!(t.subtotal, Decimal::from(250));
        assert_eq!(t.tax, Decimal::new(4500, 2));
        assert_eq!(t.total, Decimal::new(29500, 2));
        assert_eq!(item_count(&items), 3);
    }

    #[test]
    fn total_is_rounded_to_two_places() {
        let t = CartTotals::compute(&[item("19.99", 3)], Decimal::new(18, 2));
        // 59.97 × 1.18 = 70.7646
        assert_eq!(t.subtotal, Decimal::new(5997, 2));
        assert_eq!(t.total, Decimal::new(7076, 2));
        assert_eq!(round_money(Decimal::new(1005, 3)), Decimal::new(101, 2));
    }

    #[test]
    fn oversized_prices_saturate_instead_of_overflowing() {
        let items = vec![item("79228162514264337593543950335", 2), item("10", 1)];
        let t = CartTotals::compute(&items, Decimal::new(18, 2));
        assert_eq!(t.subtotal, Decimal::MAX);
        assert_eq!(t.total, Decimal::MAX);
        assert!(t.is_payable());
        assert_eq!(item_count(&[item("1", i64::MAX), item("1", 1)]), i64::MAX);
    }

    #[test]
    fn empty_cart_is_not_payable() {
        let t = CartTotals::compute(&[], Decimal::new(18, 2));
        assert_eq!(t.total, Decimal::ZERO);
        assert!(!t.is_payable());
    }

    #[tokio::test]
    async fn remove_refetches_cart() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Delete,
            "http://api.test/api/cart/remove/7",
            200,
            json!({ "status": "removed" }),
        );
        mock.mock_response(HttpMethod::Get, "http://api.test/api/cart", 200, json!([]));

        let api = ApiClient::new(&mock, "http://api.test");
        let items = CartService::new(&api).remove(7).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn add_rejects_zero_quantity_locally() {
        let mock = MockHttpClient::new();
        let api = ApiClient::new(&mock, "http://api.test");
        let err = CartService::new(&api).add(1, 0).await.unwrap_err();
        assert_eq!(err.kind, crate::error::StoreErrorKind::InvalidInput);
        assert_eq!(mock.request_count(), 0);
    }
}
