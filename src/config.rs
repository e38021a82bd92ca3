use chrono::Duration;
use rust_decimal::Decimal;

use crate::shared::serde_helper::parse_decimal;

// =========================================================
// 动态运行时配置 (Client Configuration)
// =========================================================

/// 这些是默认值，查找函数中没有对应 key 时使用
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;
/// 会话最长一年，更大的值按非法处理
pub const MAX_SESSION_TTL_SECS: i64 = 365 * 86_400;
pub const DEFAULT_BRAND: &str = "ElectroShop";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const KEY_API_BASE: &str = "STOREFRONT_API_BASE";
pub const KEY_PAGE_SIZE: &str = "STOREFRONT_PAGE_SIZE";
pub const KEY_TAX_RATE: &str = "STOREFRONT_TAX_RATE";
pub const KEY_SESSION_TTL: &str = "STOREFRONT_SESSION_TTL_SECS";
pub const KEY_PAYMENT_KEY_ID: &str = "STOREFRONT_PAYMENT_KEY_ID";
pub const KEY_BRAND: &str = "STOREFRONT_BRAND";
pub const KEY_LOG_LEVEL: &str = "STOREFRONT_LOG_LEVEL";

/// 18% GST
pub fn default_tax_rate() -> Decimal {
    Decimal::new(18, 2)
}

/// 客户端配置
///
/// 通过查找函数读取，浏览器端没有进程环境变量，
/// 由调用方决定数据来源（编译期常量、测试用 HashMap 等）。
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub page_size: usize,
    pub tax_rate: Decimal,
    pub session_ttl: Duration,
    /// 后端未返回 keyId 时的备用收银台 key
    pub payment_key_id: Option<String>,
    pub brand: String,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ClientConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            api_base: read(KEY_API_BASE)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),

            // 0 或非法值回退到默认页大小
            page_size: read(KEY_PAGE_SIZE)
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),

            // 税率限定在 [0, 1]
            tax_rate: read(KEY_TAX_RATE)
                .and_then(|v| parse_decimal(&v))
                .filter(|r| !r.is_sign_negative() && *r <= Decimal::ONE)
                .unwrap_or_else(default_tax_rate),

            session_ttl: read(KEY_SESSION_TTL)
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|n| (1..=MAX_SESSION_TTL_SECS).contains(n))
                .and_then(Duration::try_seconds)
                .unwrap_or_else(|| Duration::seconds(DEFAULT_SESSION_TTL_SECS)),

            payment_key_id: read(KEY_PAYMENT_KEY_ID),

            brand: read(KEY_BRAND).unwrap_or_else(|| DEFAULT_BRAND.to_string()),

            log_level: read(KEY_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.api_base, "http://localhost:8080");
        assert_eq!(cfg.page_size, 12);
        assert_eq!(cfg.tax_rate, Decimal::new(18, 2));
        assert_eq!(cfg.session_ttl, Duration::hours(24));
        assert_eq!(cfg.payment_key_id, None);
        assert_eq!(cfg.brand, "ElectroShop");
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn overrides_are_read_and_normalized() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[
            (KEY_API_BASE, "https://shop.example.com/"),
            (KEY_PAGE_SIZE, "24"),
            (KEY_TAX_RATE, "0.05"),
            (KEY_SESSION_TTL, "3600"),
            (KEY_PAYMENT_KEY_ID, "rzp_test_123"),
            (KEY_LOG_LEVEL, "debug"),
        ]));
        assert_eq!(cfg.api_base, "https://shop.example.com");
        assert_eq!(cfg.page_size, 24);
        assert_eq!(cfg.tax_rate, Decimal::new(5, 2));
        assert_eq!(cfg.session_ttl, Duration::hours(1));
        assert_eq!(cfg.payment_key_id.as_deref(), Some("rzp_test_123"));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[
            (KEY_PAGE_SIZE, "0"),
            (KEY_TAX_RATE, "lots"),
            (KEY_SESSION_TTL, "-5"),
            (KEY_PAYMENT_KEY_ID, "   "),
        ]));
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.tax_rate, default_tax_rate());
        assert_eq!(cfg.session_ttl, Duration::seconds(DEFAULT_SESSION_TTL_SECS));
        assert_eq!(cfg.payment_key_id, None);
    }

    #[test]
    fn out_of_range_values_fall_back() {
        // 超出 chrono 可表示范围
        let cfg = ClientConfig::from_lookup(lookup_from(&[
            (KEY_SESSION_TTL, "9223372036854775807"),
            (KEY_TAX_RATE, "79228162514264337593543950335"),
        ]));
        assert_eq!(cfg.session_ttl, Duration::seconds(DEFAULT_SESSION_TTL_SECS));
        assert_eq!(cfg.tax_rate, default_tax_rate());

        // 可表示但加到当前时间上会溢出
        let cfg = ClientConfig::from_lookup(lookup_from(&[(KEY_SESSION_TTL, "9000000000000")]));
        assert_eq!(cfg.session_ttl, Duration::seconds(DEFAULT_SESSION_TTL_SECS));

        let cfg = ClientConfig::from_lookup(lookup_from(&[
            (KEY_SESSION_TTL, &MAX_SESSION_TTL_SECS.to_string()),
            (KEY_TAX_RATE, "1"),
        ]));
        assert_eq!(cfg.session_ttl, Duration::days(365));
        assert_eq!(cfg.tax_rate, Decimal::ONE);
    }
}
