//! 认证状态管理
//!
//! 会话只在后端校验后安装到上下文，路由服务通过注入的角色信号做守卫。
//! 启动时恢复会话，之后由周期任务清理过期会话。

use chrono::Utc;
use electroshop::auth::is_session_error;
use electroshop::error::{StoreError, StoreResult};
use electroshop::shared::{Role, User};
use electroshop::{Authenticator, Session};
use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, Api, config};
use crate::web::{BrowserHttpClient, BrowserStorage};

/// 过期巡检间隔
const EXPIRY_SWEEP_MS: u32 = 30_000;

#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// 启动时的会话恢复尚未完成
    pub restoring: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            restoring: true,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(Session::role)
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }
}

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 注入路由服务的角色信号
    pub fn viewer_signal(&self) -> Signal<Option<Role>> {
        let state = self.state;
        Signal::derive(move || state.with(AuthState::role))
    }

    pub fn restoring_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.restoring))
    }

    /// 携带当前会话令牌的 API 客户端
    pub fn api(&self) -> Api {
        let token = self
            .state
            .with_untracked(|s| s.session.as_ref().map(|s| s.token.clone()));
        api::client(token)
    }

    fn install(&self, session: Session) {
        self.set_state.set(AuthState {
            session: Some(session),
            restoring: false,
        });
    }

    /// 资料修改后就地替换会话中的用户
    pub fn update_user(&self, user: User) {
        self.set_state.update(|s| {
            if let Some(session) = s.session.as_mut() {
                session.user = user;
            }
        });
    }

    fn clear(&self) {
        self.set_state.update(|s| {
            s.session = None;
            s.restoring = false;
        });
    }

    /// 会话失效类错误直接注销，路由服务随后重定向到登录页
    pub fn handle_error(&self, err: &StoreError) {
        if is_session_error(err) && self.state.with_untracked(AuthState::is_authenticated) {
            tracing::info!(error = %err, "session rejected by backend, logging out");
            logout(self);
        }
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

fn authenticator() -> Authenticator<BrowserHttpClient, BrowserStorage> {
    Authenticator::new(api::client(None), BrowserStorage, config().session_ttl)
}

/// 恢复会话并启动过期巡检
pub fn init_auth(ctx: &AuthContext) {
    let ctx = *ctx;
    spawn_local(async move {
        let session = authenticator().restore(Utc::now()).await;
        if let Some(s) = &session {
            tracing::info!(user_id = s.user.id, expires_at = %s.expires_at, "session restored");
        }
        ctx.set_state.set(AuthState {
            session,
            restoring: false,
        });
    });

    Interval::new(EXPIRY_SWEEP_MS, move || {
        let Some(session) = ctx.state.try_with_untracked(|s| s.session.clone()).flatten() else {
            return;
        };
        if authenticator().expire_if_due(&session, Utc::now()) {
            ctx.clear();
        }
    })
    .forget();
}

/// 登录成功后同步安装会话，调用方随即按角色跳转
pub async fn login(ctx: &AuthContext, email: &str, password: &str) -> StoreResult<Session> {
    let session = authenticator().login(email, password, Utc::now()).await?;
    ctx.install(session.clone());
    Ok(session)
}

pub async fn signup(ctx: &AuthContext, name: &str, email: &str, password: &str) -> StoreResult<Session> {
    let session = authenticator().signup(name, email, password, Utc::now()).await?;
    ctx.install(session.clone());
    Ok(session)
}

pub fn logout(ctx: &AuthContext) {
    authenticator().logout();
    ctx.clear();
}
