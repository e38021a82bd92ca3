//! 宽松反序列化工具
//!
//! 后端的数值字段可能以 JSON number 或字符串形式返回，
//! 这里统一做数值强制转换，保证视图模型上的不变量：
//! - 价格、库存等字段非负
//! - 数量字段至少为 1
//! - `null` 与缺省字段回退为默认值

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

// =========================================================
// 数值解析
// =========================================================

/// 将字符串解析为 Decimal，空串或非数字返回 `None`
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// 将任意 JSON 值转换为 Decimal
///
/// 支持整数、浮点数与数字字符串，其余类型返回 `None`。
pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            parse_decimal(&n.to_string()).or_else(|| n.as_f64().and_then(Decimal::from_f64))
        }
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_to_decimal)
        .unwrap_or(Decimal::ZERO))
}

// =========================================================
// serde `deserialize_with` 入口
// =========================================================

/// 非负 Decimal：无法解析记为 0，负数截断为 0
pub fn non_negative_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(decimal_or_zero(deserializer)?.max(Decimal::ZERO))
}

/// 非负整数（如库存），小数部分向零截断
pub fn non_negative_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = decimal_or_zero(deserializer)?.trunc();
    Ok(value.to_i64().unwrap_or(0).max(0))
}

/// 非负计数，用于统计类字段
pub fn non_negative_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = decimal_or_zero(deserializer)?.trunc();
    Ok(value.to_u64().unwrap_or(0))
}

/// 购物车 / 订单行数量，至少为 1
pub fn quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = decimal_or_zero(deserializer)?.trunc();
    Ok(value.to_i64().unwrap_or(1).max(1))
}

/// `null` 视为默认值
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 宽松字符串：数字会被转换为字符串，其余非字符串值视为缺失
///
/// 主要用于 `createdAt` 这类后端可能按不同序列化策略输出的字段。
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "non_negative_decimal")]
        price: Decimal,
        #[serde(default, deserialize_with = "non_negative_i64")]
        stock: i64,
        #[serde(default = "one", deserialize_with = "quantity")]
        qty: i64,
        #[serde(default, deserialize_with = "lenient_string")]
        created_at: Option<String>,
    }

    fn one() -> i64 {
        1
    }

    fn probe(value: serde_json::Value) -> Probe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn coerces_numeric_strings() {
        let p = probe(json!({ "price": "129.50", "stock": "7", "qty": "3" }));
        assert_eq!(p.price, Decimal::new(12950, 2));
        assert_eq!(p.stock, 7);
        assert_eq!(p.qty, 3);
    }

    #[test]
    fn garbage_and_negative_values_clamp() {
        let p = probe(json!({ "price": "abc", "stock": -4, "qty": 0 }));
        assert_eq!(p.price, Decimal::ZERO);
        assert_eq!(p.stock, 0);
        assert_eq!(p.qty, 1);

        let p = probe(json!({ "price": -10.5, "stock": null, "qty": null }));
        assert_eq!(p.price, Decimal::ZERO);
        assert_eq!(p.stock, 0);
        assert_eq!(p.qty, 1);
    }

    #[test]
    fn float_prices_keep_their_digits() {
        let p = probe(json!({ "price": 19.99 }));
        assert_eq!(p.price, Decimal::new(1999, 2));
    }

    #[test]
    fn missing_fields_default() {
        let p = probe(json!({}));
        assert_eq!(p.price, Decimal::ZERO);
        assert_eq!(p.qty, 1);
        assert!(p.created_at.is_none());
    }

    #[test]
    fn created_at_accepts_numbers() {
        let p = probe(json!({ "created_at": 1704103200 }));
        assert_eq!(p.created_at.as_deref(), Some("1704103200"));
        let p = probe(json!({ "created_at": "  " }));
        assert!(p.created_at.is_none());
    }

    #[test]
    fn parse_decimal_rejects_blank_and_words() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("sixty"), None);
        assert_eq!(parse_decimal(" 60 "), Some(Decimal::from(60)));
    }
}
