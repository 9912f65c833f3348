//! 导航守卫模块
//!
//! 每次导航在加载目标页面之前都会经过这里。守卫只依据目标路由的访问级别
//! 和调用方注入的认证状态作出决定，不持有任何状态，也不修改会话。

use thiserror::Error;

use super::route::{AccessClass, AppRoute};
use crate::config::AppConfig;

/// 守卫的决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 放行，加载目标路由
    Proceed,
    /// 改为导航到另一个路由
    Redirect(AppRoute),
}

/// 导航错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation to {target} exceeded {hops} redirects")]
    RedirectLoop { target: AppRoute, hops: usize },
}

/// **核心守卫逻辑**
///
/// 按固定顺序判断，先命中者生效：
/// 1. 任一命中记录需要认证且未认证 -> `Login`
/// 2. 任一命中记录仅限访客且已认证 -> `Dashboard`
/// 3. 否则放行
pub fn decide<I>(matched: I, is_authenticated: bool) -> GuardDecision
where
    I: IntoIterator<Item = AccessClass>,
{
    let (mut requires_auth, mut requires_guest) = (false, false);
    for access in matched {
        match access {
            AccessClass::RequiresAuth => requires_auth = true,
            AccessClass::RequiresGuest => requires_guest = true,
            AccessClass::Public => {}
        }
    }

    if requires_auth && !is_authenticated {
        GuardDecision::Redirect(AppRoute::Login)
    } else if requires_guest && is_authenticated {
        GuardDecision::Redirect(AppRoute::Dashboard)
    } else {
        GuardDecision::Proceed
    }
}

/// 对一次导航意图 `(to, from)` 执行守卫
pub fn before_each(to: AppRoute, from: Option<AppRoute>, is_authenticated: bool) -> GuardDecision {
    let decision = decide(to.access(), is_authenticated);
    match decision {
        GuardDecision::Proceed => {
            tracing::debug!(%to, ?from, is_authenticated, "navigation allowed");
        }
        GuardDecision::Redirect(redirect) => {
            tracing::info!(%to, ?from, %redirect, is_authenticated, "navigation redirected");
        }
    }
    decision
}

/// 解析一次导航最终落地的路由
///
/// 重定向目标同样要经过守卫；超过 [`AppConfig::MAX_REDIRECTS`] 次视为循环。
pub fn resolve(
    to: AppRoute,
    from: Option<AppRoute>,
    is_authenticated: bool,
) -> Result<AppRoute, NavigationError> {
    resolve_with(to, from, |to, from| before_each(to, from, is_authenticated))
}

fn resolve_with<G>(to: AppRoute, from: Option<AppRoute>, guard: G) -> Result<AppRoute, NavigationError>
where
    G: Fn(AppRoute, Option<AppRoute>) -> GuardDecision,
{
    let mut target = to;
    for _ in 0..=AppConfig::MAX_REDIRECTS {
        match guard(target, from) {
            GuardDecision::Proceed => return Ok(target),
            GuardDecision::Redirect(next) => target = next,
        }
    }
    Err(NavigationError::RedirectLoop {
        target: to,
        hops: AppConfig::MAX_REDIRECTS,
    })
}

// ============================================================================
// 导航计划
// ============================================================================

/// 导航的触发来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTrigger {
    /// 页面首次加载
    Initial,
    /// 站内链接或编程式导航
    Link,
    /// 浏览器后退/前进，地址栏已经改变
    PopState,
    /// 会话变化后重新检查当前路由
    SessionChange,
}

/// 写入 History 的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

/// 一次 History 写入（应用内路径，不含基础路径）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryWrite {
    pub path: String,
    pub mode: HistoryMode,
}

/// 导航计划：要渲染的路由以及需要的 History 写入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPlan {
    pub route: AppRoute,
    pub history: Option<HistoryWrite>,
}

/// 规划一次导航
///
/// `requested` 是去掉基础路径后的地址，`from` 是当前渲染的路由。
/// 返回 `None` 表示界面和地址栏都保持不变。
pub fn plan(
    trigger: NavigationTrigger,
    requested: &str,
    from: Option<AppRoute>,
    is_authenticated: bool,
) -> Option<NavigationPlan> {
    plan_with(trigger, requested, from, |to, from| {
        resolve(to, from, is_authenticated)
    })
}

fn plan_with<R>(
    trigger: NavigationTrigger,
    requested: &str,
    from: Option<AppRoute>,
    resolver: R,
) -> Option<NavigationPlan>
where
    R: FnOnce(AppRoute, Option<AppRoute>) -> Result<AppRoute, NavigationError>,
{
    let target = AppRoute::from_path(requested);
    let resolved = match resolver(target, from) {
        Ok(route) => route,
        Err(err) => {
            tracing::error!(%err, ?trigger, ?from, requested, "navigation aborted");
            return aborted(trigger, from);
        }
    };

    let write = |mode: HistoryMode| {
        Some(HistoryWrite {
            path: history_path(resolved, requested),
            mode,
        })
    };
    let history = match trigger {
        NavigationTrigger::Link if Some(resolved) == from && resolved != AppRoute::NotFound => {
            return None;
        }
        NavigationTrigger::SessionChange if resolved == target => return None,
        NavigationTrigger::Link | NavigationTrigger::SessionChange => write(HistoryMode::Push),
        // 地址栏已经显示请求的路径
        NavigationTrigger::Initial | NavigationTrigger::PopState if resolved == target => None,
        NavigationTrigger::Initial | NavigationTrigger::PopState => write(HistoryMode::Replace),
    };

    Some(NavigationPlan {
        route: resolved,
        history,
    })
}

/// 中止后的去向：首次加载显示 404，后退/前进退回原路由，其余保持不动
fn aborted(trigger: NavigationTrigger, from: Option<AppRoute>) -> Option<NavigationPlan> {
    match trigger {
        NavigationTrigger::Initial => Some(NavigationPlan {
            route: AppRoute::NotFound,
            history: None,
        }),
        NavigationTrigger::PopState => from.map(|from| NavigationPlan {
            route: from,
            history: (from != AppRoute::NotFound).then(|| HistoryWrite {
                path: from.to_path().to_string(),
                mode: HistoryMode::Replace,
            }),
        }),
        NavigationTrigger::Link | NavigationTrigger::SessionChange => None,
    }
}

/// `NotFound` 保留用户请求的地址，其它路由使用规范路径
fn history_path(route: AppRoute, requested: &str) -> String {
    if route == AppRoute::NotFound {
        requested.to_string()
    } else {
        route.to_path().to_string()
    }
}
