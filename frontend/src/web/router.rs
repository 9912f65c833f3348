//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，验证交给 [`guard`]。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::guard::{self, HistoryMode, HistoryWrite, NavigationPlan, NavigationTrigger};
use super::route::{self, AppRoute};
use crate::auth::AuthContext;
use crate::config::AppConfig;

/// 获取当前浏览器路径（已去掉基础路径）
fn current_path() -> String {
    let pathname = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string());
    route::strip_base(AppConfig::base_path(), &pathname).to_string()
}

/// 更新 History 状态（内部工具函数）
fn write_history(write: &HistoryWrite) {
    let url = route::with_base(AppConfig::base_path(), &write.path);
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = match write.mode {
        HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(&url)),
        HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(&url)),
    };
    if let Err(err) = result {
        tracing::warn!(?err, %url, mode = ?write.mode, "history update failed");
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证状态来自注入的 [`AuthContext`]，每次导航都重新读取；
/// 落地路由和 History 写入由 [`guard::plan`] 决定。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    auth: AuthContext,
}

impl RouterService {
    /// 创建新的路由服务，初始路由同样经过守卫
    fn new(auth: AuthContext) -> Self {
        let path = current_path();
        let plan = guard::plan(
            NavigationTrigger::Initial,
            &path,
            None,
            auth.is_authenticated_untracked(),
        );
        let initial = match plan {
            Some(plan) => {
                if let Some(write) = &plan.history {
                    write_history(write);
                }
                plan.route
            }
            None => AppRoute::NotFound,
        };

        let (current_route, set_route) = signal(initial);
        Self {
            current_route,
            set_route,
            auth,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.run(NavigationTrigger::Link, path, self.auth.is_authenticated_untracked());
    }

    /// 浏览器后退/前进：地址已经改变，只在重定向或中止时改写
    fn on_popstate(&self) {
        let path = current_path();
        self.run(NavigationTrigger::PopState, &path, self.auth.is_authenticated_untracked());
    }

    fn run(&self, trigger: NavigationTrigger, path: &str, is_authenticated: bool) {
        let from = self.current_route.get_untracked();
        if let Some(plan) = guard::plan(trigger, path, Some(from), is_authenticated) {
            self.apply(plan);
        }
    }

    /// 写入 History 并更新 UI
    fn apply(&self, plan: NavigationPlan) {
        if let Some(write) = &plan.history {
            write_history(write);
        }
        if plan.route != self.current_route.get_untracked() {
            self.set_route.set(plan.route);
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || router.on_popstate());

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化（如注销）时对当前路由重新执行守卫
    fn watch_session(&self) {
        let router = *self;

        Effect::new(move |_| {
            let is_auth = router.auth.is_authenticated();
            let route = router.current_route.get_untracked();
            tracing::debug!(%route, is_auth, "re-checking route against session");
            router.run(NavigationTrigger::SessionChange, route.to_path(), is_auth);
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(auth: AuthContext) -> RouterService {
    let router = RouterService::new(auth);

    router.init_popstate_listener();
    router.watch_session();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证上下文，守卫从这里读取会话状态
    auth: AuthContext,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(auth);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接
///
/// 普通点击交给路由服务；带修饰键或非左键的点击保留浏览器默认行为。
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = route::with_base(AppConfig::base_path(), to.to_path());

    let on_click = move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 || ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.alt_key() {
            return;
        }
        ev.prevent_default();
        router.navigate(to.to_path());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
