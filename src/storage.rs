//! 持久化状态服务
//!
//! 浏览器 LocalStorage 只提供字符串键值接口，这里在其上增加：
//! - `{"version": N, "data": ...}` 版本信封
//! - 旧版无信封数据（版本 0）的迁移与回写
//! - 无法读取的数据按缺省处理

use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

// =========================================================
// 键值存储抽象
// =========================================================

/// 原始键值存储接口
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str);
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// 内存实现，用于测试与无 LocalStorage 的环境
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.data.borrow_mut().remove(key);
    }
}

// =========================================================
// 版本化持久数据
// =========================================================

/// 可持久化的数据类型
pub trait Persisted: Serialize + DeserializeOwned {
    /// 存储键
    const KEY: &'static str;
    /// 当前数据版本
    const VERSION: u32;

    /// 将旧版本数据迁移到当前版本
    ///
    /// `from_version == 0` 表示无信封的旧数据，`raw` 可能是字符串或任意 JSON。
    fn migrate(from_version: u32, raw: Value) -> Option<Self>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    data: Value,
}

/// 持久化存储
pub struct PersistedStore<S, T> {
    storage: S,
    _marker: PhantomData<T>,
}

impl<S: KeyValueStorage, T: Persisted> PersistedStore<S, T> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            _marker: PhantomData,
        }
    }

    /// 读取数据
    ///
    /// 返回 `None` 表示不存在或无法读取。旧数据迁移成功后会以当前版本回写。
    pub fn load(&self) -> Option<T> {
        let raw = self.storage.get(T::KEY)?;

        // 旧版令牌直接以裸字符串保存，不是合法 JSON
        let value = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));

        let is_envelope = value
            .as_object()
            .is_some_and(|o| o.contains_key("version") && o.contains_key("data"));

        let (loaded, migrated) = if is_envelope {
            match serde_json::from_value::<Envelope>(value) {
                Ok(env) if env.version == T::VERSION => {
                    (serde_json::from_value::<T>(env.data).ok(), false)
                }
                Ok(env) if env.version < T::VERSION => (T::migrate(env.version, env.data), true),
                Ok(env) => {
                    tracing::warn!(key = T::KEY, version = env.version, "stored data is from a newer schema");
                    (None, false)
                }
                Err(_) => (None, false),
            }
        } else {
            (T::migrate(0, value), true)
        };

        match loaded {
            Some(data) => {
                if migrated {
                    tracing::info!(key = T::KEY, to = T::VERSION, "migrated persisted data");
                    if let Err(e) = self.save(&data) {
                        tracing::warn!(key = T::KEY, error = %e, "failed to rewrite migrated data");
                    }
                }
                Some(data)
            }
            None => {
                tracing::debug!(key = T::KEY, "unreadable persisted data ignored");
                None
            }
        }
    }

    pub fn save(&self, data: &T) -> StoreResult<()> {
        let body = serde_json::to_string(&EnvelopeRef {
            version: T::VERSION,
            data,
        })?;
        self.storage
            .set(T::KEY, &body)
            .map_err(|e| e.in_op_with("storage.save", T::KEY))
    }

    pub fn clear(&self) {
        self.storage.remove(T::KEY);
    }
}

impl<S: KeyValueStorage, T: Persisted + Default> PersistedStore<S, T> {
    pub fn load_or_default(&self) -> T {
        self.load().unwrap_or_default()
    }
}

/// 把存储层写入失败转换为统一错误
pub fn storage_error(key: &str, detail: impl Into<String>) -> StoreError {
    StoreError::storage(detail).in_op_with("storage.set", key)
}

// =========================================================
// 令牌
// =========================================================

/// 持久化的 bearer 令牌
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredToken(pub String);

impl Persisted for StoredToken {
    const KEY: &'static str = "token";
    const VERSION: u32 = 1;

    fn migrate(from_version: u32, raw: Value) -> Option<Self> {
        match (from_version, raw) {
            (0, Value::String(s)) if !s.trim().is_empty() => Some(StoredToken(s.trim().to_string())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        hits: u32,
    }

    impl Persisted for Counter {
        const KEY: &'static str = "counter";
        const VERSION: u32 = 2;

        fn migrate(from_version: u32, raw: Value) -> Option<Self> {
            match from_version {
                0 => raw.as_u64().map(|n| Counter { hits: n as u32 }),
                1 => raw
                    .get("count")
                    .and_then(Value::as_u64)
                    .map(|n| Counter { hits: n as u32 }),
                _ => None,
            }
        }
    }

    #[test]
    fn save_writes_versioned_envelope() {
        let mem = MemoryStorage::new();
        let store = PersistedStore::<_, Counter>::new(&mem);
        store.save(&Counter { hits: 3 }).unwrap();

        let raw: Value = serde_json::from_str(&mem.raw("counter").unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "version": 2, "data": { "hits": 3 } }));
        assert_eq!(store.load(), Some(Counter { hits: 3 }));
    }

    #[test]
    fn older_envelope_is_migrated_and_rewritten() {
        let mem = MemoryStorage::new();
        mem.set("counter", r#"{"version":1,"data":{"count":7}}"#).unwrap();

        let store = PersistedStore::<_, Counter>::new(&mem);
        assert_eq!(store.load(), Some(Counter { hits: 7 }));
        assert!(mem.raw("counter").unwrap().contains(r#""version":2"#));
    }

    #[test]
    fn unversioned_value_is_version_zero() {
        let mem = MemoryStorage::new();
        mem.set("counter", "5").unwrap();

        let store = PersistedStore::<_, Counter>::new(&mem);
        assert_eq!(store.load(), Some(Counter { hits: 5 }));
    }

    #[test]
    fn unreadable_value_loads_default() {
        let mem = MemoryStorage::new();
        mem.set("counter", "{not json").unwrap();
        let store = PersistedStore::<_, Counter>::new(&mem);
        assert_eq!(store.load(), None);
        assert_eq!(store.load_or_default(), Counter::default());

        mem.set("counter", r#"{"version":9,"data":{"hits":1}}"#).unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn raw_legacy_token_migrates() {
        let mem = MemoryStorage::new();
        mem.set("token", "aaa.bbb.ccc").unwrap();

        let store = PersistedStore::<_, StoredToken>::new(&mem);
        assert_eq!(store.load(), Some(StoredToken("aaa.bbb.ccc".into())));
        assert_eq!(
            mem.raw("token").unwrap(),
            r#"{"version":1,"data":"aaa.bbb.ccc"}"#
        );

        store.clear();
        assert_eq!(store.load(), None);
    }
}
