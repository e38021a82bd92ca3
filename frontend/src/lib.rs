//! ElectroShop 前端应用
//!
//! 采用 Context-Driven 的架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `components`: 页面与展示组件
//!
//! 业务规则全部在 `electroshop` 核心库中，这里只负责渲染与浏览器适配。

mod api;
mod auth;
mod components {
    pub mod admin;
    pub mod cart;
    pub mod checkout;
    pub mod filters;
    mod icons;
    pub mod landing;
    pub mod login;
    pub mod navbar;
    pub mod notice;
    pub mod orders;
    pub mod product_card;
    pub mod product_details;
    pub mod product_list;
    pub mod profile;
    pub mod sections;
    pub mod wishlist;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::admin::AdminPage;
use crate::components::cart::CartPage;
use crate::components::checkout::CheckoutPage;
use crate::components::landing::LandingPage;
use crate::components::login::{LoginPage, SignupPage};
use crate::components::navbar::Navbar;
use crate::components::orders::{OrderConfirmationPage, OrderTrackingPage, OrdersPage};
use crate::components::product_details::ProductDetailsPage;
use crate::components::product_list::ProductListPage;
use crate::components::profile::ProfilePage;
use crate::components::wishlist::WishlistPage;

use leptos::prelude::*;

// 浏览器适配层
// 核心库只定义 trait，这里给出基于 gloo-* 与 web_sys 的实现。
pub(crate) mod web {
    mod console;
    mod http;
    pub mod payment;
    pub mod route;
    pub mod router;
    mod storage;

    pub use console::MakeConsoleWriter;
    pub use http::BrowserHttpClient;
    pub use storage::BrowserStorage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 安装 tracing 订阅者，日志输出到浏览器控制台
///
/// 过滤级别来自编译期配置，解析失败时回退到 `info`。
pub fn init_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_new(&api::config().log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    // wasm 中没有系统时钟，不输出时间戳
    let layer = fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(web::MakeConsoleWriter);

    if tracing_subscriber::registry().with(filter).with(layer).try_init().is_err() {
        web_sys::console::warn_1(&"tracing subscriber already installed".into());
    }
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的页面组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Shop { q } => view! { <ProductListPage q=q /> }.into_any(),
        AppRoute::Product(id) => view! { <ProductDetailsPage id=id /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::Wishlist => view! { <WishlistPage /> }.into_any(),
        AppRoute::Cart => view! { <CartPage /> }.into_any(),
        AppRoute::Checkout => view! { <CheckoutPage /> }.into_any(),
        AppRoute::Orders => view! { <OrdersPage /> }.into_any(),
        AppRoute::OrderTracking(id) => view! { <OrderTrackingPage id=id /> }.into_any(),
        AppRoute::OrderConfirmation(id) => view! { <OrderConfirmationPage id=id /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[60vh] bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to="/" class="btn btn-primary">"Back to Home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 恢复会话并启动过期巡检
    init_auth(&auth_ctx);

    // 3. 角色与恢复状态注入路由服务
    let viewer = auth_ctx.viewer_signal();
    let restoring = auth_ctx.restoring_signal();

    view! {
        <Router viewer=viewer restoring=restoring>
            <div class="min-h-screen flex flex-col bg-base-200 font-sans">
                <Navbar />
                <main class="flex-1">
                    <RouterOutlet matcher=route_matcher />
                </main>
            </div>
        </Router>
    }
}
