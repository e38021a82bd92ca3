use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreResult;
use crate::shared::{Product, ProductId};
use crate::storage::{KeyValueStorage, Persisted, PersistedStore};

/// 心愿单条目，仅保存在客户端的商品快照
pub type WishlistEntry = Product;

/// 心愿单
///
/// 按商品 id 去重，保持加入顺序。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.iter().any(|p| p.id == id)
    }

    /// 加入商品，已存在时返回 `false`
    pub fn add(&mut self, product: &Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.entries.push(product.clone());
        true
    }

    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|p| p.id != id);
        self.entries.len() != before
    }

    fn dedup(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.entries.retain(|p| seen.insert(p.id));
        self
    }
}

impl Persisted for Wishlist {
    const KEY: &'static str = "wishlist";
    const VERSION: u32 = 1;

    /// 旧版直接保存商品数组，单个条目无法解析时跳过
    fn migrate(from_version: u32, raw: Value) -> Option<Self> {
        if from_version != 0 {
            return None;
        }
        let items = match raw {
            Value::Array(items) => items,
            // 旧版偶尔会把数组再序列化一次
            Value::String(s) => match serde_json::from_str::<Value>(&s).ok()? {
                Value::Array(items) => items,
                _ => return None,
            },
            _ => return None,
        };
        let entries = items
            .into_iter()
            .filter_map(|v| serde_json::from_value::<Product>(v).ok())
            .collect();
        Some(Wishlist { entries }.dedup())
    }
}

// =========================================================
// 服务层
// =========================================================

/// 心愿单服务，每次操作都读写持久层
pub struct WishlistService<S> {
    store: PersistedStore<S, Wishlist>,
}

impl<S: KeyValueStorage> WishlistService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            store: PersistedStore::new(storage),
        }
    }

    pub fn load(&self) -> Wishlist {
        self.store.load_or_default()
    }

    /// 加入心愿单，返回是否为新条目
    pub fn add(&self, product: &Product) -> StoreResult<bool> {
        let mut list = self.load();
        let added = list.add(product);
        if added {
            self.store.save(&list)?;
            tracing::debug!(product_id = product.id, "added to wishlist");
        }
        Ok(added)
    }

    pub fn remove(&self, id: ProductId) -> StoreResult<Wishlist> {
        let mut list = self.load();
        if list.remove(id) {
            self.store.save(&list)?;
        }
        Ok(list)
    }
}
