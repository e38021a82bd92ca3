use crate::shared::Role;

/// 路由访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 任何人可访问
    Public,
    /// 需要登录
    Authenticated,
    /// 需要登录且角色在集合中
    Roles(&'static [Role]),
    /// 仅未登录用户（登录 / 注册页）
    GuestOnly,
}

pub const ADMIN_ONLY: Access = Access::Roles(&[Role::Admin]);

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToHome,
    /// 已登录用户访问登录 / 注册页，跳到角色对应的落地页
    RedirectToLanding(Landing),
}

/// 根据访问要求与当前用户角色判定
///
/// `viewer` 为 `None` 表示未登录。
pub fn guard(access: Access, viewer: Option<Role>) -> GuardDecision {
    match (access, viewer) {
        (Access::Public, _) => GuardDecision::Allow,
        (Access::GuestOnly, None) => GuardDecision::Allow,
        (Access::GuestOnly, Some(role)) => GuardDecision::RedirectToLanding(Landing::for_role(role)),
        (Access::Authenticated | Access::Roles(_), None) => GuardDecision::RedirectToLogin,
        (Access::Authenticated, Some(_)) => GuardDecision::Allow,
        (Access::Roles(required), Some(role)) => {
            if required.contains(&role) {
                GuardDecision::Allow
            } else {
                GuardDecision::RedirectToHome
            }
        }
    }
}

/// 登录后的落地页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Home,
    Admin,
}

impl Landing {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Landing::Admin,
            Role::User | Role::Unknown => Landing::Home,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Landing::Home => "/",
            Landing::Admin => "/admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes_always_allow() {
        assert_eq!(guard(Access::Public, None), GuardDecision::Allow);
        assert_eq!(guard(Access::Public, Some(Role::Admin)), GuardDecision::Allow);
    }

    #[test]
    fn anonymous_viewers_go_to_login() {
        assert_eq!(guard(Access::Authenticated, None), GuardDecision::RedirectToLogin);
        assert_eq!(guard(ADMIN_ONLY, None), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn wrong_role_goes_home() {
        assert_eq!(guard(ADMIN_ONLY, Some(Role::User)), GuardDecision::RedirectToHome);
        assert_eq!(guard(ADMIN_ONLY, Some(Role::Unknown)), GuardDecision::RedirectToHome);
        assert_eq!(guard(ADMIN_ONLY, Some(Role::Admin)), GuardDecision::Allow);
        assert_eq!(guard(Access::Authenticated, Some(Role::User)), GuardDecision::Allow);
    }

    #[test]
    fn signed_in_viewers_skip_login_page() {
        assert_eq!(guard(Access::GuestOnly, None), GuardDecision::Allow);
        assert_eq!(
            guard(Access::GuestOnly, Some(Role::Admin)),
            GuardDecision::RedirectToLanding(Landing::Admin)
        );
        assert_eq!(
            guard(Access::GuestOnly, Some(Role::User)),
            GuardDecision::RedirectToLanding(Landing::Home)
        );
    }

    #[test]
    fn landing_paths() {
        assert_eq!(Landing::for_role(Role::Admin).path(), "/admin");
        assert_eq!(Landing::for_role(Role::User).path(), "/");
    }
}
