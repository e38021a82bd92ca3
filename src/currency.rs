use rust_decimal::Decimal;

use crate::cart::round_money;

pub const RUPEE: &str = "₹";

/// 按印度数字分组格式化卢比金额，例如 `₹1,23,456.78`
///
/// 末三位一组，其余两位一组，固定两位小数。
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = group_indian(int_part);
    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        RUPEE,
        grouped,
        frac_part
    )
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
