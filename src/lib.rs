//! 电子商城前端的核心逻辑
//!
//! 与渲染无关的部分都在这里：类型化 API 客户端、会话、路由守卫、
//! 目录筛选与分页、购物车金额、结账、订单、个人中心与管理端数据。
//! 浏览器相关的适配器（fetch、localStorage、收银台脚本）位于 frontend。

pub use electroshop_shared as shared;

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod currency;
pub mod error;
pub mod guard;
pub mod orders;
pub mod profile;
pub mod request;
pub mod storage;
pub mod wishlist;

pub use api::ApiClient;
pub use auth::{AuthSnapshot, Authenticator, Session};
pub use config::ClientConfig;
pub use error::{StoreError, StoreErrorKind, StoreResult};
pub use guard::{Access, GuardDecision, guard};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use storage::{KeyValueStorage, MemoryStorage, PersistedStore};
