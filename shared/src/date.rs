//! 时间工具模块
//!
//! 后端的 `createdAt` 可能是 RFC 3339 字符串、无时区的本地时间、
//! 纯日期，或者 Unix 时间戳（秒或毫秒）。这里统一宽松解析为 UTC 时间。

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// 无法解析或缺失时的显示文本
pub const MISSING_DATE: &str = "N/A";

/// 超过该值的数字时间戳按毫秒处理
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

// =========================================================
// 解析
// =========================================================

/// 宽松解析时间字符串，失败返回 `None`
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
    }

    raw.parse::<i64>().ok().and_then(from_epoch)
}

/// Unix 时间戳（秒或毫秒）转换为 UTC 时间
pub fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() >= MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}

// =========================================================
// 格式化
// =========================================================

/// 订单日期显示，例如 `12 Mar 2024`
pub fn format_order_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%-d %b %Y").to_string())
        .unwrap_or_else(|| MISSING_DATE.to_string())
}

/// 带时间的日期显示，例如 `12 Mar 2024, 14:05`
pub fn format_order_datetime(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%-d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|| MISSING_DATE.to_string())
}

/// 按时间倒序比较，无法解析的时间排在最后
pub fn newest_first(a: Option<&str>, b: Option<&str>) -> std::cmp::Ordering {
    let a = a.and_then(parse_timestamp);
    let b = b.and_then(parse_timestamp);
    b.cmp(&a)
}
