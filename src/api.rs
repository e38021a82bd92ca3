use crate::error::{StoreError, StoreResult};
use crate::request::{HttpClient, HttpRequest};
use crate::shared::protocol::ApiRequest;
use crate::shared::{BEARER_PREFIX, HEADER_AUTHORIZATION};

// =========================================================
// 业务逻辑: ApiClient
// =========================================================

/// 类型化 API 客户端
///
/// 所有页面共用。每个端点对应一个实现了 `ApiRequest` 的类型，
/// 路径、方法与响应类型都由该类型决定。
/// 令牌存在时，每个请求都会带上 `Authorization: Bearer <token>`。
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient<C> {
    client: C,
    base_url: String,
    token: Option<String>,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// 返回携带指定令牌的新客户端
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送请求并解析响应
    ///
    /// 非 2xx 响应会被映射为对应类别的 `StoreError`。
    pub async fn send<R: ApiRequest>(&self, req: &R) -> StoreResult<R::Response> {
        let path = req.path();
        let mut http = HttpRequest::new(&self.url(&path), R::METHOD)
            .with_header("Accept", "application/json");

        if R::METHOD.carries_body() {
            let body = serde_json::to_string(req)?;
            http = http
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        if let Some(token) = &self.token {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("{}{}", BEARER_PREFIX, token));
        }

        tracing::debug!(method = R::METHOD.as_str(), path = %path, "api request");

        let resp = self
            .client
            .send(http)
            .await
            .map_err(|e| e.in_op_with("api.send", path.clone()))?;

        if !resp.is_success() {
            let err = StoreError::from_response(resp.status, &resp.body)
                .in_op_with("api.send", path.clone());
            tracing::warn!(
                method = R::METHOD.as_str(),
                path = %path,
                status = resp.status,
                error = %err.message,
                "api request failed"
            );
            return Err(err);
        }

        resp.json::<R::Response>()
            .map_err(|e| e.in_op_with("api.decode", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorKind;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::shared::protocol::{AddToCart, DeleteProduct, GetProduct, ListProducts};
    use serde_json::json;

    const BASE: &str = "http://api.test";

    #[tokio::test]
    async fn attaches_bearer_token_and_json_body() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Post,
            "http://api.test/api/cart/add",
            200,
            json!({ "id": 1, "product": { "id": 4, "price": "10" }, "quantity": 2 }),
        );

        let api = ApiClient::new(&mock, "http://api.test/").with_token(Some("tok".into()));
        let item = api
            .send(&AddToCart {
                product_id: 4,
                quantity: 2,
            })
            .await
            .unwrap();
        assert_eq!(item.quantity, 2);

        let reqs = mock.requests_to(HttpMethod::Post, "http://api.test/api/cart/add");
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].headers.get("Authorization").unwrap(), "Bearer tok");
        assert_eq!(reqs[0].headers.get("Content-Type").unwrap(), "application/json");
        assert_eq!(reqs[0].json_body(), json!({ "productId": 4, "quantity": 2 }));
    }

    #[tokio::test]
    async fn anonymous_get_has_no_auth_header_or_body() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Get, "http://api.test/api/products", 200, json!([]));

        let api = ApiClient::new(&mock, BASE).with_token(Some(String::new()));
        let list = api.send(&ListProducts).await.unwrap();
        assert!(list.is_empty());

        let req = &mock.requests.borrow()[0];
        assert!(!req.headers.contains_key("Authorization"));
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn error_body_is_surfaced() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/api/products/99",
            404,
            json!({ "error": "Product not found" }),
        );

        let api = ApiClient::new(&mock, BASE);
        let err = api.send(&GetProduct { id: 99 }).await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.user_message(), "Product not found");
        assert_eq!(err.spans()[0].detail.as_deref(), Some("/api/products/99"));
    }

    #[tokio::test]
    async fn empty_delete_response_is_ok() {
        let mock = MockHttpClient::new();
        mock.mock_empty(HttpMethod::Delete, "http://api.test/api/admin/products/3", 204);

        let api = ApiClient::new(&mock, BASE);
        api.send(&DeleteProduct { id: 3 }).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_serialization_error() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/api/products",
            200,
            json!({ "unexpected": true }),
        );

        let api = ApiClient::new(&mock, BASE);
        let err = api.send(&ListProducts).await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Serialization);
    }
}
