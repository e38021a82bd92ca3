//! 客户端配置与 API 客户端构建
//!
//! 浏览器没有进程环境变量，配置在编译期通过 `option_env!` 注入。

use std::sync::OnceLock;

use electroshop::config::{
    KEY_API_BASE, KEY_BRAND, KEY_LOG_LEVEL, KEY_PAGE_SIZE, KEY_PAYMENT_KEY_ID, KEY_SESSION_TTL, KEY_TAX_RATE,
};
use electroshop::{ApiClient, ClientConfig};

use crate::web::BrowserHttpClient;

pub type Api = ApiClient<BrowserHttpClient>;

fn compile_time_lookup(key: &str) -> Option<String> {
    let value = match key {
        KEY_API_BASE => option_env!("STOREFRONT_API_BASE"),
        KEY_PAGE_SIZE => option_env!("STOREFRONT_PAGE_SIZE"),
        KEY_TAX_RATE => option_env!("STOREFRONT_TAX_RATE"),
        KEY_SESSION_TTL => option_env!("STOREFRONT_SESSION_TTL_SECS"),
        KEY_PAYMENT_KEY_ID => option_env!("STOREFRONT_PAYMENT_KEY_ID"),
        KEY_BRAND => option_env!("STOREFRONT_BRAND"),
        KEY_LOG_LEVEL => option_env!("STOREFRONT_LOG_LEVEL"),
        _ => None,
    };
    value.map(str::to_string)
}

pub fn config() -> &'static ClientConfig {
    static CONFIG: OnceLock<ClientConfig> = OnceLock::new();
    CONFIG.get_or_init(|| ClientConfig::from_lookup(compile_time_lookup))
}

/// 构建 API 客户端，令牌存在时附带 bearer 头
pub fn client(token: Option<String>) -> Api {
    ApiClient::new(BrowserHttpClient, &config().api_base).with_token(token)
}
