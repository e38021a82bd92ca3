use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::protocol::ErrorBody;

// =========================================================
// 错误类别枚举
// =========================================================

/// 错误类别
/// 包含错误对应的语义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreErrorKind {
    /// 请求未到达后端（连接失败、CORS 等）
    Network,
    /// 401: 未登录或令牌失效
    Unauthorized,
    /// 403: 无权限
    Forbidden,
    /// 404: 资源不存在
    NotFound,
    /// 400: 输入校验失败
    InvalidInput,
    /// 响应体或令牌解析失败
    Serialization,
    /// 5xx 及其他未识别的状态码
    Server,
    /// 收银台相关失败
    Payment,
    /// 缺少必要配置
    Config,
    /// 本地存储读写失败
    Storage,
}

impl StoreErrorKind {
    /// 按 HTTP 状态码映射错误类别
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => StoreErrorKind::InvalidInput,
            401 => StoreErrorKind::Unauthorized,
            403 => StoreErrorKind::Forbidden,
            404 => StoreErrorKind::NotFound,
            _ => StoreErrorKind::Server,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StoreErrorKind::Network => "NETWORK_ERROR",
            StoreErrorKind::Unauthorized => "UNAUTHORIZED",
            StoreErrorKind::Forbidden => "FORBIDDEN",
            StoreErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            StoreErrorKind::InvalidInput => "INVALID_INPUT",
            StoreErrorKind::Serialization => "JSON_PARSE_ERROR",
            StoreErrorKind::Server => "SERVER_ERROR",
            StoreErrorKind::Payment => "PAYMENT_ERROR",
            StoreErrorKind::Config => "CONFIG_ERROR",
            StoreErrorKind::Storage => "STORAGE_ERROR",
        }
    }

    /// 是否代表会话已失效
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, StoreErrorKind::Unauthorized | StoreErrorKind::Forbidden)
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// 操作名称，如 "api.send", "checkout.place_order"
    pub operation: String,
    /// 额外细节，如请求路径、订单号
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            operation: operation.into(),
            detail,
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端核心错误
///
/// - kind: 错误类别
/// - message: 面向用户的消息（优先取后端 `error` 字段）
/// - source: 原始错误（可选，用于错误链）
/// - spans: 操作追踪栈
#[derive(Debug)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::InvalidInput, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Serialization, message)
    }

    pub fn payment(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Payment, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Config, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Storage, message)
    }

    /// 由非 2xx 响应构造错误
    ///
    /// 响应体形如 `{"error": "..."}` 时使用其中的消息。
    pub fn from_response(status: u16, body: &str) -> Self {
        let kind = StoreErrorKind::from_status(status);
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        Self::new(kind, message)
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation, None));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans
            .push(ErrorSpan::new(operation, Some(detail.into())));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// 展示给用户的文本，不含追踪信息
    pub fn user_message(&self) -> String {
        if !self.message.trim().is_empty() {
            return self.message.clone();
        }
        match self.kind {
            StoreErrorKind::Network => "Unable to reach the server".to_string(),
            StoreErrorKind::Unauthorized => "Please log in to continue".to_string(),
            StoreErrorKind::Forbidden => "You do not have access to this resource".to_string(),
            StoreErrorKind::NotFound => "Not found".to_string(),
            _ => "Unknown error occurred".to_string(),
        }
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::serialization(e.to_string()).with_source(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(StoreErrorKind::from_status(400), StoreErrorKind::InvalidInput);
        assert_eq!(StoreErrorKind::from_status(401), StoreErrorKind::Unauthorized);
        assert_eq!(StoreErrorKind::from_status(403), StoreErrorKind::Forbidden);
        assert_eq!(StoreErrorKind::from_status(404), StoreErrorKind::NotFound);
        assert_eq!(StoreErrorKind::from_status(500), StoreErrorKind::Server);
        assert_eq!(StoreErrorKind::from_status(503), StoreErrorKind::Server);
        assert_eq!(StoreErrorKind::from_status(418), StoreErrorKind::Server);
    }

    #[test]
    fn backend_error_field_becomes_message() {
        let e = StoreError::from_response(400, r#"{"error":"Insufficient stock"}"#);
        assert_eq!(e.kind, StoreErrorKind::InvalidInput);
        assert_eq!(e.user_message(), "Insufficient stock");

        let e = StoreError::from_response(502, "<html>bad gateway</html>");
        assert_eq!(e.message(), "Request failed with status 502");
    }

    #[test]
    fn display_includes_trace() {
        let e = StoreError::not_found("Order missing")
            .in_op_with("api.send", "/api/orders/9")
            .in_op("orders.get");
        assert_eq!(
            e.to_string(),
            "[RESOURCE_NOT_FOUND] Order missing | trace: api.send(/api/orders/9) -> orders.get"
        );
        assert_eq!(e.spans().len(), 2);
    }

    #[test]
    fn user_message_falls_back_by_kind() {
        assert_eq!(
            StoreError::network("").user_message(),
            "Unable to reach the server"
        );
        assert!(StoreErrorKind::Forbidden.is_auth_failure());
        assert!(!StoreErrorKind::NotFound.is_auth_failure());
    }
}
