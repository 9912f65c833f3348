//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、访问级别以及路径规范化规则。

use std::fmt::Display;

/// 路由的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessClass {
    /// 任何人都可以访问
    Public,
    /// 需要已认证的会话
    RequiresAuth,
    /// 仅限未认证的访客（已认证用户会被送往面板）
    #[allow(dead_code)]
    RequiresGuest,
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 引导流程：收入
    OnboardingIncome,
    /// 引导流程：固定支出
    OnboardingExpenses,
    /// 控制面板
    Dashboard,
    /// 页面未找到（没有对应的路由记录）
    NotFound,
}

/// 路由表中的一条记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRecord {
    pub route: AppRoute,
    pub path: &'static str,
    pub name: &'static str,
    pub access: AccessClass,
}

/// 路由表，启动后不可变
pub const ROUTES: &[RouteRecord] = &[
    RouteRecord {
        route: AppRoute::Login,
        path: "/",
        name: "Login",
        access: AccessClass::Public,
    },
    RouteRecord {
        route: AppRoute::OnboardingIncome,
        path: "/onboarding/income",
        name: "OnboardingIncome",
        access: AccessClass::RequiresAuth,
    },
    RouteRecord {
        route: AppRoute::OnboardingExpenses,
        path: "/onboarding/expenses",
        name: "OnboardingExpenses",
        access: AccessClass::RequiresAuth,
    },
    RouteRecord {
        route: AppRoute::Dashboard,
        path: "/dashboard",
        name: "Dashboard",
        access: AccessClass::RequiresAuth,
    },
];

const NOT_FOUND_PATH: &str = "/404";
const NOT_FOUND_NAME: &str = "NotFound";

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 忽略查询串、片段和末尾斜杠，大小写不敏感。
    pub fn from_path(path: &str) -> Self {
        let path = normalize_path(path);
        ROUTES
            .iter()
            .find(|record| record.path.eq_ignore_ascii_case(path))
            .map(|record| record.route)
            .unwrap_or(Self::NotFound)
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        self.record().map_or(NOT_FOUND_PATH, |record| record.path)
    }

    /// 路由名称（唯一标识）
    pub fn name(&self) -> &'static str {
        self.record().map_or(NOT_FOUND_NAME, |record| record.name)
    }

    /// 命中该路由的全部记录
    ///
    /// `NotFound` 没有记录，返回空集合。
    pub fn matched(&self) -> impl Iterator<Item = &'static RouteRecord> + '_ {
        ROUTES.iter().filter(move |record| record.route == *self)
    }

    /// 命中记录的访问级别
    pub fn access(&self) -> impl Iterator<Item = AccessClass> + '_ {
        self.matched().map(|record| record.access)
    }

    fn record(&self) -> Option<&'static RouteRecord> {
        self.matched().next()
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 去掉查询串、片段以及根路径之外的末尾斜杠
fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// 从浏览器路径中剥离 History 基础路径
///
/// 路径不在基础路径之下时原样返回。
pub fn strip_base<'a>(base: &str, pathname: &'a str) -> &'a str {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return pathname;
    }
    match pathname.strip_prefix(base) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => pathname,
    }
}

/// 为应用内路径加上 History 基础路径
pub fn with_base(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_paths_resolve_to_their_routes() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(
            AppRoute::from_path("/onboarding/income"),
            AppRoute::OnboardingIncome
        );
        assert_eq!(
            AppRoute::from_path("/onboarding/expenses"),
            AppRoute::OnboardingExpenses
        );
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::Dashboard);
    }

    #[test]
    fn every_record_round_trips_through_its_path() {
        for record in ROUTES {
            assert_eq!(AppRoute::from_path(record.path), record.route);
            assert_eq!(record.route.to_path(), record.path);
            assert_eq!(record.route.name(), record.name);
        }
    }

    #[test]
    fn route_names_are_unique() {
        for (i, a) in ROUTES.iter().enumerate() {
            for b in &ROUTES[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.path, b.path);
            }
        }
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(AppRoute::from_path("/settings"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/onboarding"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path(""), AppRoute::Login);
        assert_eq!(AppRoute::NotFound.matched().count(), 0);
        assert_eq!(AppRoute::NotFound.name(), "NotFound");
    }

    #[test]
    fn matching_ignores_query_fragment_trailing_slash_and_case() {
        assert_eq!(AppRoute::from_path("/dashboard/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/Dashboard"), AppRoute::Dashboard);
        assert_eq!(
            AppRoute::from_path("/onboarding/income?step=2"),
            AppRoute::OnboardingIncome
        );
        assert_eq!(AppRoute::from_path("/#top"), AppRoute::Login);
    }

    #[test]
    fn protected_routes_require_auth() {
        let protected: Vec<_> = ROUTES
            .iter()
            .filter(|r| r.access == AccessClass::RequiresAuth)
            .map(|r| r.route)
            .collect();
        assert_eq!(
            protected,
            vec![
                AppRoute::OnboardingIncome,
                AppRoute::OnboardingExpenses,
                AppRoute::Dashboard
            ]
        );
        assert!(AppRoute::Login.access().all(|a| a == AccessClass::Public));
    }

    #[test]
    fn base_path_is_stripped_and_prefixed() {
        assert_eq!(strip_base("/", "/dashboard"), "/dashboard");
        assert_eq!(strip_base("/app/", "/app/dashboard"), "/dashboard");
        assert_eq!(strip_base("/app", "/app"), "/");
        assert_eq!(strip_base("/app", "/application"), "/application");
        assert_eq!(strip_base("/app", "/other"), "/other");

        assert_eq!(with_base("/", "/dashboard"), "/dashboard");
        assert_eq!(with_base("/app/", "/dashboard"), "/app/dashboard");
        assert_eq!(with_base("/app", "/"), "/app/");
    }
}
