//! 管理端数据
//!
//! 四类集合并行加载。每次变更只发一次请求，返回的实体按 id 就地替换，
//! 并通过 `Invalidation` 标明哪些集合需要重新拉取。

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::ApiClient;
use crate::error::{StoreError, StoreResult};
use crate::orders::sort_newest_first;
use crate::request::HttpClient;
use crate::shared::protocol::{
    AdminAnalytics, AdminListOrders, AdminListProducts, AdminListUsers, ChangeUserRole, CreateProduct,
    DeleteProduct, UpdateOrderStatus, UpdateProduct,
};
use crate::shared::serde_helper::parse_decimal;
use crate::shared::{Analytics, Order, OrderId, OrderStatus, Product, ProductId, ProductPayload, Role, User, UserId};

/// 日均营收按 30 天折算
pub const REVENUE_DAYS: u32 = 30;
pub const RECENT_ORDERS: usize = 5;

// =========================================================
// 数据集合
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminData {
    pub analytics: Analytics,
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
}

/// 单个实体的变更结果
#[derive(Debug, Clone, PartialEq)]
pub enum AdminPatch {
    ProductSaved(Product),
    ProductDeleted(ProductId),
    UserUpdated(User),
    OrderUpdated(Order),
}

/// 需要重新拉取的集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invalidation {
    pub analytics: bool,
    pub users: bool,
    pub products: bool,
    pub orders: bool,
}

impl Invalidation {
    pub const NONE: Invalidation = Invalidation {
        analytics: false,
        users: false,
        products: false,
        orders: false,
    };

    pub const ALL: Invalidation = Invalidation {
        analytics: true,
        users: true,
        products: true,
        orders: true,
    };

    pub fn analytics_only() -> Self {
        Self {
            analytics: true,
            ..Self::NONE
        }
    }

    pub fn merge(self, other: Invalidation) -> Self {
        Self {
            analytics: self.analytics || other.analytics,
            users: self.users || other.users,
            products: self.products || other.products,
            orders: self.orders || other.orders,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// 重新拉取到的集合，`None` 表示未失效
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Refreshed {
    pub analytics: Option<Analytics>,
    pub users: Option<Vec<User>>,
    pub products: Option<Vec<Product>>,
    pub orders: Option<Vec<Order>>,
}

fn replace_by_id<T>(items: &mut Vec<T>, item: T, id_of: impl Fn(&T) -> i64) -> bool {
    let id = id_of(&item);
    match items.iter().position(|existing| id_of(existing) == id) {
        Some(index) => {
            items[index] = item;
            true
        }
        None => false,
    }
}

impl AdminData {
    /// 把一次变更写入本地集合
    ///
    /// 统计摘要由服务端汇总，任何变更之后都视为过期。
    /// 被替换的用户或订单若本地不存在，则整个集合标记为过期。
    pub fn apply(&mut self, patch: AdminPatch) -> Invalidation {
        let mut stale = Invalidation::analytics_only();
        match patch {
            AdminPatch::ProductSaved(product) => {
                if !replace_by_id(&mut self.products, product.clone(), |p| p.id) {
                    self.products.push(product);
                }
            }
            AdminPatch::ProductDeleted(id) => {
                self.products.retain(|p| p.id != id);
            }
            AdminPatch::UserUpdated(user) => {
                stale.users = !replace_by_id(&mut self.users, user, |u| u.id);
            }
            AdminPatch::OrderUpdated(order) => {
                stale.orders = !replace_by_id(&mut self.orders, order, |o| o.id);
            }
        }
        stale
    }

    pub fn merge(&mut self, refreshed: Refreshed) {
        if let Some(analytics) = refreshed.analytics {
            self.analytics = analytics;
        }
        if let Some(users) = refreshed.users {
            self.users = users;
        }
        if let Some(products) = refreshed.products {
            self.products = products;
        }
        if let Some(orders) = refreshed.orders {
            self.orders = orders;
        }
    }

    pub fn summary(&self) -> AdminSummary {
        AdminSummary::compute(self)
    }
}

// =========================================================
// 仪表盘汇总
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminSummary {
    pub total_revenue: Decimal,
    pub total_orders: u64,
    pub total_products: u64,
    pub total_users: u64,
    pub completed_orders: u64,
    pub pending_orders: u64,
    /// total − completed − pending，不小于 0
    pub processing_orders: u64,
    pub avg_daily_revenue: Decimal,
    pub top_seller_count: usize,
    pub recent_orders: Vec<Order>,
    pub status_distribution: BTreeMap<String, u64>,
}

impl AdminSummary {
    pub fn compute(data: &AdminData) -> Self {
        let a = &data.analytics;

        let mut recent = data.orders.clone();
        sort_newest_first(&mut recent);
        recent.truncate(RECENT_ORDERS);

        let status_distribution = if a.order_status_distribution.is_empty() {
            count_statuses(&data.orders)
        } else {
            a.order_status_distribution.clone()
        };

        Self {
            total_revenue: a.total_revenue,
            total_orders: a.total_orders,
            total_products: a.total_products,
            total_users: a.total_users,
            completed_orders: a.completed_orders,
            pending_orders: a.pending_orders,
            processing_orders: a
                .total_orders
                .saturating_sub(a.completed_orders)
                .saturating_sub(a.pending_orders),
            avg_daily_revenue: a.total_revenue / Decimal::from(REVENUE_DAYS),
            top_seller_count: a.top_selling_products.len(),
            recent_orders: recent,
            status_distribution,
        }
    }
}

fn count_statuses(orders: &[Order]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for order in orders {
        *counts.entry(order.status.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

// =========================================================
// 商品表单
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Product name is required")]
    MissingName,
    #[error("Price must be a non-negative number")]
    InvalidPrice,
    #[error("Stock must be a non-negative whole number")]
    InvalidStock,
}

impl From<DraftError> for StoreError {
    fn from(e: DraftError) -> Self {
        StoreError::invalid_input(e.to_string())
    }
}

/// 商品编辑表单，字段保持输入框原文
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductDraft {
    /// 编辑已有商品时为其 id
    pub editing: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub image_url: String,
}

impl ProductDraft {
    pub fn edit(product: &Product) -> Self {
        Self {
            editing: Some(product.id),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.normalize().to_string(),
            stock: product.stock.to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ProductPayload, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingName);
        }

        let price = parse_decimal(&self.price)
            .filter(|p| *p >= Decimal::ZERO)
            .ok_or(DraftError::InvalidPrice)?;

        let stock = self
            .stock
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|s| *s >= 0)
            .ok_or(DraftError::InvalidStock)?;

        let image_url = self.image_url.trim();
        Ok(ProductPayload {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            price,
            stock,
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        })
    }
}

// =========================================================
// 服务层
// =========================================================

pub struct AdminService<'a, C> {
    api: &'a ApiClient<C>,
}

impl<'a, C: HttpClient> AdminService<'a, C> {
    pub fn new(api: &'a ApiClient<C>) -> Self {
        Self { api }
    }

    /// 并行加载四类集合，任一失败则整体失败
    pub async fn load(&self) -> StoreResult<AdminData> {
        let (analytics, users, products, orders) = futures::try_join!(
            self.api.send(&AdminAnalytics),
            self.api.send(&AdminListUsers),
            self.api.send(&AdminListProducts),
            self.api.send(&AdminListOrders),
        )
        .map_err(|e| e.in_op("admin.load"))?;

        tracing::debug!(
            users = users.len(),
            products = products.len(),
            orders = orders.len(),
            "admin data loaded"
        );

        Ok(AdminData {
            analytics,
            users,
            products,
            orders,
        })
    }

    /// 只拉取失效的集合
    pub async fn refresh(&self, stale: Invalidation) -> StoreResult<Refreshed> {
        let analytics = async {
            if stale.analytics {
                self.api.send(&AdminAnalytics).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let users = async {
            if stale.users {
                self.api.send(&AdminListUsers).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let products = async {
            if stale.products {
                self.api.send(&AdminListProducts).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let orders = async {
            if stale.orders {
                self.api.send(&AdminListOrders).await.map(Some)
            } else {
                Ok(None)
            }
        };

        let (analytics, users, products, orders) = futures::try_join!(analytics, users, products, orders)
            .map_err(|e| e.in_op("admin.refresh"))?;

        Ok(Refreshed {
            analytics,
            users,
            products,
            orders,
        })
    }

    /// 新建或更新商品
    pub async fn save_product(&self, draft: &ProductDraft) -> StoreResult<AdminPatch> {
        let payload = draft
            .validate()
            .map_err(|e| StoreError::from(e).in_op("admin.save_product"))?;

        let product = match draft.editing {
            Some(id) => self
                .api
                .send(&UpdateProduct { id, payload })
                .await
                .map_err(|e| e.in_op_with("admin.update_product", id.to_string()))?,
            None => self
                .api
                .send(&CreateProduct { payload })
                .await
                .map_err(|e| e.in_op("admin.create_product"))?,
        };

        tracing::info!(product_id = product.id, "product saved");
        Ok(AdminPatch::ProductSaved(product))
    }

    pub async fn delete_product(&self, id: ProductId) -> StoreResult<AdminPatch> {
        self.api
            .send(&DeleteProduct { id })
            .await
            .map_err(|e| e.in_op_with("admin.delete_product", id.to_string()))?;
        tracing::info!(product_id = id, "product deleted");
        Ok(AdminPatch::ProductDeleted(id))
    }

    pub async fn change_role(&self, user_id: UserId, role: Role) -> StoreResult<AdminPatch> {
        let user = self
            .api
            .send(&ChangeUserRole { user_id, role })
            .await
            .map_err(|e| e.in_op_with("admin.change_role", user_id.to_string()))?;
        Ok(AdminPatch::UserUpdated(user))
    }

    pub async fn change_order_status(&self, order_id: OrderId, status: OrderStatus) -> StoreResult<AdminPatch> {
        let order = self
            .api
            .send(&UpdateOrderStatus { order_id, status })
            .await
            .map_err(|e| e.in_op_with("admin.change_order_status", order_id.to_string()))?;
        Ok(AdminPatch::OrderUpdated(order))
    }
}
