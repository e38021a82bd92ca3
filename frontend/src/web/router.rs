//! 路由服务模块 - 核心引擎
//!
//! 所有对 window.history 的操作都集中在此模块。
//! 导航流程：请求 -> 守卫判定 -> 写入 History -> 更新路由信号。
//! 守卫只依赖注入的两个信号：当前角色与会话是否仍在恢复。

use electroshop::guard::{Access, GuardDecision, guard};
use electroshop::shared::Role;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 当前浏览器地址 (pathname, search)
fn current_location() -> (String, String) {
    let location = web_sys::window().map(|w| w.location());
    let path = location
        .as_ref()
        .and_then(|l| l.pathname().ok())
        .unwrap_or_else(|| "/".to_string());
    let search = location.and_then(|l| l.search().ok()).unwrap_or_default();
    (path, search)
}

fn write_history(path: &str, use_push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if use_push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if let Err(e) = result {
        tracing::warn!(path, error = ?e, "history update failed");
    }
}

fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

/// 对目标路由执行守卫，返回实际应展示的路由
///
/// 会话恢复期间不重定向，由出口渲染加载状态。
fn resolve(target: AppRoute, viewer: Option<Role>, restoring: bool) -> AppRoute {
    if restoring {
        return target;
    }
    match guard(target.access(), viewer) {
        GuardDecision::Allow => target,
        GuardDecision::RedirectToLogin => AppRoute::Login,
        GuardDecision::RedirectToHome => AppRoute::Landing,
        GuardDecision::RedirectToLanding(landing) => AppRoute::from_href(landing.path()),
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新，认证状态由外部注入。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 当前用户角色，`None` 表示未登录
    viewer: Signal<Option<Role>>,
    restoring: Signal<bool>,
}

impl RouterService {
    fn new(viewer: Signal<Option<Role>>, restoring: Signal<bool>) -> Self {
        let (path, search) = current_location();
        let (current_route, set_route) = signal(AppRoute::from_location(&path, &search));

        Self {
            current_route,
            set_route,
            viewer,
            restoring,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring.get()
    }

    /// 导航到站内链接，例如 `/shop?q=tv`
    pub fn navigate(&self, href: &str) {
        self.navigate_to(AppRoute::from_href(href));
    }

    pub fn navigate_to(&self, route: AppRoute) {
        self.go(route, true);
    }

    /// 以 replaceState 导航，不产生历史记录
    pub fn replace(&self, route: AppRoute) {
        self.go(route, false);
    }

    fn go(&self, target: AppRoute, use_push: bool) {
        let resolved = resolve(
            target.clone(),
            self.viewer.get_untracked(),
            self.restoring.get_untracked(),
        );
        if resolved != target {
            tracing::info!(from = %target, to = %resolved, "route guard redirect");
        }
        write_history(&resolved.to_path(), use_push);
        self.set_route.set(resolved);
        scroll_to_top();
    }

    /// 浏览器后退/前进同样经过守卫
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let (path, search) = current_location();
            let target = AppRoute::from_location(&path, &search);
            let resolved = resolve(
                target.clone(),
                router.viewer.get_untracked(),
                router.restoring.get_untracked(),
            );
            if resolved != target {
                write_history(&resolved.to_path(), false);
            }
            router.set_route.set(resolved);
        });

        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与应用同寿命
        closure.forget();
    }

    /// 认证状态变化（恢复完成、登录、注销、过期）时重新判定当前路由
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let viewer = router.viewer.get();
            let restoring = router.restoring.get();
            let route = router.current_route.get_untracked();

            let resolved = resolve(route.clone(), viewer, restoring);
            if resolved != route {
                tracing::info!(from = %route, to = %resolved, "auth state changed, redirecting");
                write_history(&resolved.to_path(), false);
                router.set_route.set(resolved);
            }
        });
    }
}

fn provide_router(viewer: Signal<Option<Role>>, restoring: Signal<bool>) -> RouterService {
    let router = RouterService::new(viewer, restoring);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>().expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，应在 App 根部使用
#[component]
pub fn Router(viewer: Signal<Option<Role>>, restoring: Signal<bool>, children: Children) -> impl IntoView {
    provide_router(viewer, restoring);
    children()
}

/// 路由出口
///
/// 会话恢复期间，受保护的路由先渲染加载指示。
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        if router.is_restoring() && current.access() != Access::Public {
            view! {
                <div class="flex items-center justify-center min-h-[50vh]">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any()
        } else {
            matcher(current)
        }
    }
}

/// 站内链接，拦截点击走 History API
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        // 保留新标签页打开等浏览器默认行为
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
