//! 浏览器端 HTTP 适配器
//!
//! 基于 `gloo-net` 的 fetch 封装，实现核心库的 `HttpClient` 特性。

use electroshop::error::{StoreError, StoreResult};
use electroshop::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use gloo_net::http::{Request, RequestBuilder};
use thiserror::Error;

/// HTTP 错误类型
#[derive(Debug, Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("request build failed: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败
    #[error("network error: {0}")]
    NetworkError(String),
    /// 响应体读取失败
    #[error("response read failed: {0}")]
    ResponseReadFailed(String),
}

impl From<HttpError> for StoreError {
    fn from(e: HttpError) -> Self {
        StoreError::network(e.to_string()).with_source(e)
    }
}

/// fetch 客户端，无状态，可随意复制
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrowserHttpClient;

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

impl BrowserHttpClient {
    async fn fetch(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = builder(req.method, &req.url);
        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;

        let resp = request
            .send()
            .await
            .map_err(|e| HttpError::NetworkError(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| HttpError::ResponseReadFailed(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserHttpClient {
    async fn send(&self, req: HttpRequest) -> StoreResult<HttpResponse> {
        let url = req.url.clone();
        self.fetch(req)
            .await
            .map_err(|e| StoreError::from(e).in_op_with("http.fetch", url))
    }
}
