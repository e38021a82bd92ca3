//! LocalStorage 适配器
//!
//! 只做字符串读写，版本信封与迁移由核心库的 `PersistedStore` 负责。
//! 旧版令牌以裸字符串保存，因此这里绕过 gloo-storage 的 JSON 编解码，直接使用 `raw()`。

use electroshop::error::StoreResult;
use electroshop::storage::{KeyValueStorage, storage_error};
use gloo_storage::{LocalStorage, Storage};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| storage_error(key, format!("{:?}", e)))
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}
