use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::ApiClient;
use crate::error::{StoreError, StoreResult};
use crate::request::HttpClient;
use crate::shared::protocol::{
    ChangePasswordRequest, GetCart, GetProfile, ListOrders, StatusMessage, UpdateProfileRequest,
};
use crate::shared::{CartItem, Order, User, sum_money};

pub const MIN_PASSWORD_LEN: usize = 6;

/// 个人中心统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileStats {
    pub total_orders: usize,
    pub total_spent: Decimal,
    /// 购物车行数
    pub cart_items: usize,
}

impl ProfileStats {
    pub fn compute(orders: &[Order], cart: &[CartItem]) -> Self {
        Self {
            total_orders: orders.len(),
            total_spent: sum_money(orders.iter().map(|o| o.total_amount)),
            cart_items: cart.len(),
        }
    }
}

/// 头像缩写：取前两个单词的首字母，空名字为 "U"
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if letters.is_empty() {
        "U".to_string()
    } else {
        letters
    }
}

// =========================================================
// 密码修改校验
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("New passwords do not match")]
    Mismatch,
    #[error("Password must be at least 6 characters")]
    TooShort,
}

impl From<PasswordError> for StoreError {
    fn from(e: PasswordError) -> Self {
        StoreError::invalid_input(e.to_string())
    }
}

/// 密码修改表单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<ChangePasswordRequest, PasswordError> {
        if self.new_password != self.confirm_password {
            return Err(PasswordError::Mismatch);
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PasswordError::TooShort);
        }
        Ok(ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

// =========================================================
// 服务层
// =========================================================

pub struct ProfileService<'a, C> {
    api: &'a ApiClient<C>,
}

impl<'a, C: HttpClient> ProfileService<'a, C> {
    pub fn new(api: &'a ApiClient<C>) -> Self {
        Self { api }
    }

    pub async fn me(&self) -> StoreResult<User> {
        self.api.send(&GetProfile).await.map_err(|e| e.in_op("profile.me"))
    }

    pub async fn stats(&self) -> StoreResult<(Vec<Order>, ProfileStats)> {
        let (orders, cart) = futures::try_join!(self.api.send(&ListOrders), self.api.send(&GetCart))
            .map_err(|e| e.in_op("profile.stats"))?;
        let stats = ProfileStats::compute(&orders, &cart);
        Ok((orders, stats))
    }

    /// 更新资料，返回的用户用于就地替换会话中的用户
    pub async fn update(&self, name: &str, email: &str) -> StoreResult<User> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(StoreError::invalid_input("Name and email are required").in_op("profile.update"));
        }
        self.api
            .send(&UpdateProfileRequest {
                name: name.to_string(),
                email: email.to_string(),
            })
            .await
            .map_err(|e| e.in_op("profile.update"))
    }

    pub async fn change_password(&self, form: &PasswordChange) -> StoreResult<StatusMessage> {
        let req = form.validate().map_err(|e| StoreError::from(e).in_op("profile.change_password"))?;
        self.api
            .send(&req)
            .await
            .map_err(|e| e.in_op("profile.change_password"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorKind;
    use crate::request::{HttpMethod, MockHttpClient};
    use serde_json::json;

    fn form(new: &str, confirm: &str) -> PasswordChange {
        PasswordChange {
            current_password: "old-secret".into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn password_rules() {
        assert_eq!(form("abcdef", "abcdeg").validate(), Err(PasswordError::Mismatch));
        assert_eq!(form("abc", "abc").validate(), Err(PasswordError::TooShort));
        assert_eq!(
            PasswordError::TooShort.to_string(),
            "Password must be at least 6 characters"
        );
        let req = form("abcdef", "abcdef").validate().unwrap();
        assert_eq!(req.new_password, "abcdef");
    }

    #[test]
    fn initials_take_two_words() {
        assert_eq!(initials("asha rao kumar"), "AR");
        assert_eq!(initials("  "), "U");
        assert_eq!(initials("Zed"), "Z");
    }

    #[tokio::test]
    async fn stats_sum_order_totals() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/api/orders",
            200,
            json!([{ "id": 1, "totalAmount": "118.00" }, { "id": 2, "totalAmount": 59 }]),
        );
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/api/cart",
            200,
            json!([{ "id": 1, "product": { "id": 1 }, "quantity": 3 }]),
        );
        let api = ApiClient::new(&mock, "http://api.test");
        let (orders, stats) = ProfileService::new(&api).stats().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(stats.total_spent, Decimal::from(177));
        assert_eq!(stats.cart_items, 1);
    }

    #[tokio::test]
    async fn invalid_password_change_never_hits_backend() {
        let mock = MockHttpClient::new();
        let api = ApiClient::new(&mock, "http://api.test");
        let err = ProfileService::new(&api)
            .change_password(&form("abc", "abd"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::InvalidInput);
        assert_eq!(err.user_message(), "New passwords do not match");
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn update_sends_trimmed_fields() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Put,
            "http://api.test/api/profile/me",
            200,
            json!({ "id": 5, "name": "Asha R", "email": "a@r.in", "role": "ROLE_USER" }),
        );
        let api = ApiClient::new(&mock, "http://api.test");
        let user = ProfileService::new(&api).update(" Asha R ", "a@r.in").await.unwrap();
        assert_eq!(user.name, "Asha R");
        let req = &mock.requests_to(HttpMethod::Put, "http://api.test/api/profile/me")[0];
        assert_eq!(req.json_body(), json!({ "name": "Asha R", "email": "a@r.in" }));
    }
}
