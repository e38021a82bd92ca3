use crate::api::ApiClient;
use crate::error::StoreResult;
use crate::request::HttpClient;
use crate::shared::date::newest_first;
use crate::shared::protocol::{GetOrder, ListOrders, TrackOrder};
use crate::shared::{Order, OrderId, OrderStatus};

// =========================================================
// 追踪进度
// =========================================================

/// 追踪时间线上的一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingStep {
    pub status: OrderStatus,
    pub label: &'static str,
    pub completed: bool,
    pub current: bool,
}

const TIMELINE: [(OrderStatus, &str); 4] = [
    (OrderStatus::Placed, "Order Placed"),
    (OrderStatus::Paid, "Payment Confirmed"),
    (OrderStatus::Shipped, "Shipped"),
    (OrderStatus::Delivered, "Delivered"),
];

/// PLACED → PAID → SHIPPED → DELIVERED
///
/// 当前状态及之前的步骤标记为完成；CANCELED 与未知状态不标记任何一步。
pub fn tracking_steps(status: OrderStatus) -> Vec<TrackingStep> {
    let position = TIMELINE.iter().position(|(s, _)| *s == status);
    TIMELINE
        .iter()
        .enumerate()
        .map(|(i, (s, label))| TrackingStep {
            status: *s,
            label: *label,
            completed: position.is_some_and(|p| i <= p),
            current: position == Some(i),
        })
        .collect()
}

// =========================================================
// 服务层
// =========================================================

pub struct OrderService<'a, C> {
    api: &'a ApiClient<C>,
}

impl<'a, C: HttpClient> OrderService<'a, C> {
    pub fn new(api: &'a ApiClient<C>) -> Self {
        Self { api }
    }

    /// 当前用户的订单，按时间倒序
    pub async fn list(&self) -> StoreResult<Vec<Order>> {
        let mut orders = self
            .api
            .send(&ListOrders)
            .await
            .map_err(|e| e.in_op("orders.list"))?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    pub async fn get(&self, id: OrderId) -> StoreResult<Order> {
        self.api
            .send(&GetOrder { id })
            .await
            .map_err(|e| e.in_op_with("orders.get", id.to_string()))
    }

    pub async fn track(&self, id: OrderId) -> StoreResult<Order> {
        self.api
            .send(&TrackOrder { id })
            .await
            .map_err(|e| e.in_op_with("orders.track", id.to_string()))
    }
}

/// 按下单时间倒序，时间相同或缺失时按 id 倒序
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        newest_first(a.created_at.as_deref(), b.created_at.as_deref()).then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockHttpClient};
    use serde_json::json;

    fn flags(status: OrderStatus) -> Vec<(bool, bool)> {
        tracking_steps(status)
            .into_iter()
            .map(|s| (s.completed, s.current))
            .collect()
    }

    #[test]
    fn steps_complete_up_to_current_status() {
        assert_eq!(
            flags(OrderStatus::Shipped),
            vec![(true, false), (true, false), (true, true), (false, false)]
        );
        assert_eq!(
            flags(OrderStatus::Placed),
            vec![(true, true), (false, false), (false, false), (false, false)]
        );
    }

    #[test]
    fn canceled_marks_no_step() {
        assert!(flags(OrderStatus::Canceled).iter().all(|f| *f == (false, false)));
        assert!(flags(OrderStatus::Unknown).iter().all(|f| *f == (false, false)));
    }

    #[tokio::test]
    async fn list_is_sorted_newest_first() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/api/orders",
            200,
            json!([
                { "id": 1, "createdAt": "2024-01-01T10:00:00" },
                { "id": 2 },
                { "id": 3, "createdAt": "2024-03-01T10:00:00" }
            ]),
        );

        let api = ApiClient::new(&mock, "http://api.test");
        let ids: Vec<_> = OrderService::new(&api)
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn track_uses_tracking_endpoint() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/api/orders/track/12",
            200,
            json!({ "id": 12, "status": "PAID" }),
        );
        let api = ApiClient::new(&mock, "http://api.test");
        let order = OrderService::new(&api).track(12).await.unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
    }
}
