//! 结账流程
//!
//! - 货到付款：一次下单请求
//! - 托管收银台：下单 → 创建收银台订单 → 打开收银台组件 → 回调后校验签名
//!
//! 收银台组件由 `PaymentWidget` 抽象，浏览器端实现位于 frontend。

use rust_decimal::Decimal;

use crate::api::ApiClient;
use crate::cart::{CartTotals, round_money};
use crate::error::{StoreError, StoreResult};
use crate::request::HttpClient;
use crate::shared::protocol::{CreatePaymentOrder, GetCart, PaymentVerification, PlaceOrder};
use crate::shared::{CartItem, OrderId, PaymentMethod};

// =========================================================
// 收银台组件抽象
// =========================================================

/// 打开收银台所需参数
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOptions {
    pub key: String,
    /// 最小货币单位
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub provider_order_id: String,
}

/// 收银台成功回调携带的数据
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetOutcome {
    Paid(PaymentReceipt),
    /// 用户关闭了收银台
    Dismissed,
}

#[async_trait::async_trait(?Send)]
pub trait PaymentWidget {
    /// 收银台脚本是否已加载
    fn is_loaded(&self) -> bool;
    async fn open(&self, options: CheckoutOptions) -> StoreResult<WidgetOutcome>;
}

// =========================================================
// 结账状态
// =========================================================

/// 结账结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// 跳转到 `/order-confirmation/:id`
    Confirmed(OrderId),
    /// 收银台被关闭，清除 loading 即可
    Dismissed,
}

/// 进入结账页时的购物车状态
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEntry {
    /// 空购物车，跳回 `/cart`
    EmptyCart,
    Ready(Vec<CartItem>),
}

/// 提交按钮是否可用
pub fn can_submit(method: PaymentMethod, totals: &CartTotals, widget_loaded: bool, loading: bool) -> bool {
    if loading || !totals.is_payable() {
        return false;
    }
    match method {
        PaymentMethod::Razorpay => widget_loaded,
        _ => true,
    }
}

pub fn confirmation_path(order_id: OrderId) -> String {
    format!("/order-confirmation/{}", order_id)
}

// =========================================================
// 服务层
// =========================================================

pub struct CheckoutService<'a, C, W> {
    api: &'a ApiClient<C>,
    widget: &'a W,
    brand: String,
    fallback_key: Option<String>,
}

impl<'a, C: HttpClient, W: PaymentWidget> CheckoutService<'a, C, W> {
    pub fn new(api: &'a ApiClient<C>, widget: &'a W, brand: &str, fallback_key: Option<String>) -> Self {
        Self {
            api,
            widget,
            brand: brand.to_string(),
            fallback_key,
        }
    }

    pub async fn enter(&self) -> StoreResult<CheckoutEntry> {
        let items = self
            .api
            .send(&GetCart)
            .await
            .map_err(|e| e.in_op("checkout.enter"))?;
        if items.is_empty() {
            return Ok(CheckoutEntry::EmptyCart);
        }
        Ok(CheckoutEntry::Ready(items))
    }

    pub async fn pay(&self, method: PaymentMethod, total: Decimal) -> StoreResult<CheckoutOutcome> {
        match method {
            PaymentMethod::Razorpay => self.pay_online(total).await,
            _ => self.place_cod().await.map(CheckoutOutcome::Confirmed),
        }
    }

    /// 货到付款
    pub async fn place_cod(&self) -> StoreResult<OrderId> {
        let order = self
            .api
            .send(&PlaceOrder {
                payment_method: PaymentMethod::Cod,
            })
            .await
            .map_err(|e| e.in_op("checkout.place_cod"))?;
        tracing::info!(order_id = order.id, "cash on delivery order placed");
        Ok(order.id)
    }

    /// 托管收银台支付
    pub async fn pay_online(&self, total: Decimal) -> StoreResult<CheckoutOutcome> {
        let order = self
            .api
            .send(&PlaceOrder {
                payment_method: PaymentMethod::Razorpay,
            })
            .await
            .map_err(|e| e.in_op("checkout.place_online"))?;
        let order_id = order.id;

        // 金额以卢比为单位，两位小数
        let provider = self
            .api
            .send(&CreatePaymentOrder {
                amount: round_money(total),
            })
            .await
            .map_err(|e| e.in_op_with("checkout.create_payment_order", order_id.to_string()))?;

        let provider_order_id = provider
            .order_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StoreError::payment("Invalid payment order response: missing orderId"))?;

        let key = provider
            .key_id
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| self.fallback_key.clone())
            .ok_or_else(|| {
                StoreError::config("Missing payment key: provide keyId from backend or configure a fallback key")
            })?;

        if !self.widget.is_loaded() {
            return Err(StoreError::payment("Payment script not loaded"));
        }

        let outcome = self
            .widget
            .open(CheckoutOptions {
                key,
                amount: provider.amount,
                currency: provider.currency.clone(),
                name: self.brand.clone(),
                description: "Order Payment".to_string(),
                provider_order_id,
            })
            .await
            .map_err(|e| e.in_op_with("checkout.widget", order_id.to_string()))?;

        let receipt = match outcome {
            WidgetOutcome::Paid(receipt) => receipt,
            WidgetOutcome::Dismissed => {
                tracing::info!(order_id, "payment widget dismissed");
                return Ok(CheckoutOutcome::Dismissed);
            }
        };

        let verification = self
            .api
            .send(&PaymentVerification {
                order_id: order_id.to_string(),
                razorpay_order_id: receipt.razorpay_order_id,
                razorpay_payment_id: receipt.razorpay_payment_id,
                razorpay_signature: receipt.razorpay_signature,
            })
            .await
            .map_err(|e| e.in_op_with("checkout.verify", order_id.to_string()))?;

        if !verification.is_success() {
            tracing::warn!(order_id, status = ?verification.status, "payment verification failed");
            return Err(StoreError::payment("Payment verification failed"));
        }

        tracing::info!(order_id, "online payment verified");
        Ok(CheckoutOutcome::Confirmed(order_id))
    }
}

#[cfg(test)]
mod tests;
