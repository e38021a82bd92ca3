//! 认证模块
//!
//! 两层状态：
//! - `AuthSnapshot`: 从本地令牌载荷直接解码的 UI 提示，不做签名校验
//! - `Session`: 经后端 `GET /api/profile/me` 校验后的会话，带明确过期时间
//!
//! 路由守卫与页面只信任 `Session`。

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::{StoreError, StoreErrorKind, StoreResult};
use crate::request::HttpClient;
use crate::shared::protocol::{GetProfile, LoginRequest, SignupRequest};
use crate::shared::{Role, User};
use crate::storage::{KeyValueStorage, PersistedStore, StoredToken};

// =========================================================
// 令牌载荷解码
// =========================================================

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    exp: Option<Value>,
}

/// 令牌载荷中的声明
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    /// `sub`，即邮箱
    pub email: String,
    pub role: Role,
    pub name: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenClaims {
    /// 解码令牌的第二段，失败返回 `None`
    ///
    /// 同时接受 url-safe 与标准 base64 字母表，填充可有可无。
    pub fn decode(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?.trim_end_matches('=');
        if payload.is_empty() {
            return None;
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .ok()?;
        let raw: RawClaims = serde_json::from_slice(&bytes).ok()?;

        let role = match raw.role.as_deref().map(str::trim) {
            None | Some("") => Role::User,
            Some(r) => Role::from_claim(r),
        };
        let expires_at = raw.exp.and_then(|v| match v {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        });

        Some(Self {
            email: raw.sub.unwrap_or_default(),
            role,
            name: raw.name.unwrap_or_default(),
            // exp 以秒为单位
            expires_at: expires_at.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }
}

/// 从载荷推导出的用户信息
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimedUser {
    pub email: String,
    pub role: Role,
    pub name: String,
}

/// 未经校验的认证状态快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub user: Option<ClaimedUser>,
}

impl AuthSnapshot {
    /// 由令牌推导认证状态：缺失或解码失败均视为未登录
    pub fn derive(token: Option<&str>) -> Self {
        match token.and_then(TokenClaims::decode) {
            Some(claims) => Self {
                is_authenticated: true,
                user: Some(ClaimedUser {
                    email: claims.email,
                    role: claims.role,
                    name: claims.name,
                }),
            },
            None => Self::default(),
        }
    }
}

// =========================================================
// 已校验会话
// =========================================================

/// 经后端校验的会话
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    /// 来自服务端响应，而非令牌声明
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }

    pub fn time_left(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

/// 会话过期时间 = min(exp, 校验时间 + ttl)
///
/// 相加溢出时上限取可表示的最大时间。
pub fn session_expiry(
    claims_exp: Option<DateTime<Utc>>,
    verified_at: DateTime<Utc>,
    ttl: Duration,
) -> DateTime<Utc> {
    let cap = verified_at
        .checked_add_signed(ttl)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    match claims_exp {
        Some(exp) => exp.min(cap),
        None => cap,
    }
}

// =========================================================
// 认证服务
// =========================================================

pub struct Authenticator<C, S> {
    api: ApiClient<C>,
    tokens: PersistedStore<S, StoredToken>,
    session_ttl: Duration,
}

impl<C, S> Authenticator<C, S>
where
    C: HttpClient + Clone,
    S: KeyValueStorage,
{
    pub fn new(api: ApiClient<C>, storage: S, session_ttl: Duration) -> Self {
        Self {
            api,
            tokens: PersistedStore::new(storage),
            session_ttl,
        }
    }

    pub fn stored_token(&self) -> Option<String> {
        self.tokens
            .load()
            .map(|t| t.0)
            .filter(|t| !t.trim().is_empty())
    }

    /// 当前持久化令牌对应的未校验快照
    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot::derive(self.stored_token().as_deref())
    }

    /// 保存令牌并同步返回新的快照
    pub fn store_token(&self, token: &str) -> StoreResult<AuthSnapshot> {
        self.tokens.save(&StoredToken(token.to_string()))?;
        Ok(AuthSnapshot::derive(Some(token)))
    }

    pub fn logout(&self) {
        self.tokens.clear();
        tracing::info!("logged out");
    }

    /// 向后端校验令牌并建立会话
    pub async fn verify(&self, token: &str, now: DateTime<Utc>) -> StoreResult<Session> {
        let claims_exp = TokenClaims::decode(token).and_then(|c| c.expires_at);
        if claims_exp.is_some_and(|exp| exp <= now) {
            return Err(StoreError::unauthorized("Session expired").in_op("auth.verify"));
        }

        let user = self
            .api
            .clone()
            .with_token(Some(token.to_string()))
            .send(&GetProfile)
            .await
            .map_err(|e| e.in_op("auth.verify"))?;

        Ok(Session {
            token: token.to_string(),
            user,
            expires_at: session_expiry(claims_exp, now, self.session_ttl),
        })
    }

    async fn establish(&self, token: String, now: DateTime<Utc>) -> StoreResult<Session> {
        let session = self.verify(&token, now).await?;
        self.tokens.save(&StoredToken(token))?;
        tracing::info!(
            user_id = session.user.id,
            role = session.role().as_str(),
            "session established"
        );
        Ok(session)
    }

    pub async fn login(&self, email: &str, password: &str, now: DateTime<Utc>) -> StoreResult<Session> {
        let resp = self
            .api
            .send(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(|e| e.in_op("auth.login"))?;
        self.establish(resp.token, now).await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Session> {
        let resp = self
            .api
            .send(&SignupRequest {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(|e| e.in_op("auth.signup"))?;
        self.establish(resp.token, now).await
    }

    /// 应用启动时恢复会话
    ///
    /// 格式错误、已过期或被后端拒绝（401/403）的令牌会被清除；
    /// 网络等其他失败保留令牌，本次按匿名处理。
    pub async fn restore(&self, now: DateTime<Utc>) -> Option<Session> {
        let token = self.stored_token()?;

        let Some(claims) = TokenClaims::decode(&token) else {
            tracing::warn!("stored token is malformed, clearing");
            self.tokens.clear();
            return None;
        };

        if claims.expires_at.is_some_and(|exp| exp <= now) {
            tracing::info!("stored token has expired, clearing");
            self.tokens.clear();
            return None;
        }

        match self.verify(&token, now).await {
            Ok(session) => Some(session),
            Err(e) if e.kind.is_auth_failure() => {
                tracing::info!(error = %e, "stored token rejected, clearing");
                self.tokens.clear();
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "session verification unavailable, keeping token");
                None
            }
        }
    }

    /// 会话已过期时清除令牌，返回是否过期
    pub fn expire_if_due(&self, session: &Session, now: DateTime<Utc>) -> bool {
        if session.is_expired(now) {
            tracing::info!(user_id = session.user.id, "session expired");
            self.tokens.clear();
            return true;
        }
        false
    }
}

/// 会话失效类错误（用于页面在 401 时引导重新登录）
pub fn is_session_error(err: &StoreError) -> bool {
    err.kind == StoreErrorKind::Unauthorized
}

/// 操作失败后是否应引导去登录
///
/// 未登录用户任何失败都去登录；已登录用户只有会话失效才去，其余错误原地提示。
pub fn needs_sign_in(signed_in: bool, err: &StoreError) -> bool {
    !signed_in || is_session_error(err)
}

#[cfg(test)]
mod tests;
