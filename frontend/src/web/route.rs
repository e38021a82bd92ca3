//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM 或 web_sys。
//! 每个路由的访问要求由 `access()` 给出，判定交给核心库的 `guard`。

use std::fmt::Display;

use electroshop::guard::{ADMIN_ONLY, Access};
use electroshop::shared::{OrderId, ProductId};

/// 应用路由
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Landing,
    /// 商品列表，可带 `?q=` 搜索词
    Shop { q: Option<String> },
    Product(ProductId),
    Login,
    Signup,
    Wishlist,
    Cart,
    Checkout,
    Orders,
    OrderTracking(OrderId),
    OrderConfirmation(OrderId),
    Profile,
    Admin,
    NotFound,
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// 从查询串中取出某个参数并解码，`+` 视为空格
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == name)
        .and_then(|(_, v)| urlencoding::decode(&v.replace('+', " ")).ok().map(|s| s.into_owned()))
}

impl AppRoute {
    /// 解析 `pathname` 与可选的 `search`（带或不带前导 `?`）
    pub fn from_location(path: &str, search: &str) -> Self {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Landing,
            ["shop"] => {
                let q = query_param(search.trim_start_matches('?'), "q").filter(|q| !q.trim().is_empty());
                Self::Shop { q }
            }
            ["product", id] => parse_id(id).map_or(Self::NotFound, Self::Product),
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["wishlist"] => Self::Wishlist,
            ["cart"] => Self::Cart,
            ["checkout"] => Self::Checkout,
            ["orders"] => Self::Orders,
            ["orders", id] => parse_id(id).map_or(Self::NotFound, Self::OrderTracking),
            ["order-confirmation", id] => parse_id(id).map_or(Self::NotFound, Self::OrderConfirmation),
            ["profile"] => Self::Profile,
            ["admin"] => Self::Admin,
            _ => Self::NotFound,
        }
    }

    /// 解析完整的站内链接，例如 `/shop?q=usb%20hub`
    pub fn from_href(href: &str) -> Self {
        match href.split_once('?') {
            Some((path, search)) => Self::from_location(path, search),
            None => Self::from_location(href, ""),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Shop { q: None } => "/shop".to_string(),
            Self::Shop { q: Some(q) } => format!("/shop?q={}", urlencoding::encode(q)),
            Self::Product(id) => format!("/product/{}", id),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Wishlist => "/wishlist".to_string(),
            Self::Cart => "/cart".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::OrderTracking(id) => format!("/orders/{}", id),
            Self::OrderConfirmation(id) => format!("/order-confirmation/{}", id),
            Self::Profile => "/profile".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫输入：该路由的访问要求**
    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Signup => Access::GuestOnly,
            Self::Cart
            | Self::Checkout
            | Self::Orders
            | Self::OrderTracking(_)
            | Self::OrderConfirmation(_)
            | Self::Profile => Access::Authenticated,
            Self::Admin => ADMIN_ONLY,
            Self::Landing
            | Self::Shop { .. }
            | Self::Product(_)
            | Self::Wishlist
            | Self::NotFound => Access::Public,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_route_table() {
        assert_eq!(AppRoute::from_location("/", ""), AppRoute::Landing);
        assert_eq!(AppRoute::from_location("", ""), AppRoute::Landing);
        assert_eq!(AppRoute::from_location("/shop", ""), AppRoute::Shop { q: None });
        assert_eq!(AppRoute::from_location("/product/42", ""), AppRoute::Product(42));
        assert_eq!(AppRoute::from_location("/orders/", ""), AppRoute::Orders);
        assert_eq!(AppRoute::from_location("/orders/7", ""), AppRoute::OrderTracking(7));
        assert_eq!(
            AppRoute::from_location("/order-confirmation/9", ""),
            AppRoute::OrderConfirmation(9)
        );
        assert_eq!(AppRoute::from_location("/admin", ""), AppRoute::Admin);
    }

    #[test]
    fn bad_ids_and_unknown_paths_are_not_found() {
        assert_eq!(AppRoute::from_location("/product/abc", ""), AppRoute::NotFound);
        assert_eq!(AppRoute::from_location("/orders/-1", ""), AppRoute::NotFound);
        assert_eq!(AppRoute::from_location("/nowhere", ""), AppRoute::NotFound);
        assert_eq!(AppRoute::from_location("/cart/extra", ""), AppRoute::NotFound);
    }

    #[test]
    fn shop_query_is_decoded() {
        assert_eq!(
            AppRoute::from_location("/shop", "?q=usb%20hub"),
            AppRoute::Shop {
                q: Some("usb hub".into())
            }
        );
        assert_eq!(
            AppRoute::from_href("/shop?sort=name-asc&q=4k+tv"),
            AppRoute::Shop {
                q: Some("4k tv".into())
            }
        );
        // 空搜索词等同于无搜索
        assert_eq!(AppRoute::from_href("/shop?q="), AppRoute::Shop { q: None });
    }

    #[test]
    fn paths_round_trip_through_href() {
        let routes = [
            AppRoute::Shop {
                q: Some("a&b c".into()),
            },
            AppRoute::Product(3),
            AppRoute::OrderConfirmation(12),
            AppRoute::Profile,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_href(&route.to_path()), route);
        }
    }

    #[test]
    fn access_levels() {
        assert_eq!(AppRoute::Landing.access(), Access::Public);
        assert_eq!(AppRoute::Wishlist.access(), Access::Public);
        assert_eq!(AppRoute::Login.access(), Access::GuestOnly);
        assert_eq!(AppRoute::Checkout.access(), Access::Authenticated);
        assert_eq!(AppRoute::OrderTracking(1).access(), Access::Authenticated);
        assert_eq!(AppRoute::Admin.access(), ADMIN_ONLY);
    }
}
