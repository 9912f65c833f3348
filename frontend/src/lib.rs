//! 个人财务应用前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::guard`: 导航守卫（纯函数）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态
//! - `components`: UI 组件层

mod auth;
pub mod bootstrap;
mod config;
mod components {
    pub mod dashboard;
    pub mod login;
    pub mod not_found;
    pub mod onboarding;
}

use crate::auth::{AuthContext, BrowserSession};
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::not_found::NotFoundPage;
use crate::components::onboarding::{OnboardingExpensesPage, OnboardingIncomePage};

use std::sync::Arc;

use leptos::prelude::*;

// 原生 Web API 封装模块
pub(crate) mod web {
    pub mod guard;
    pub mod route;
    pub mod router;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::OnboardingIncome => view! { <OnboardingIncomePage /> }.into_any(),
        AppRoute::OnboardingExpenses => view! { <OnboardingExpensesPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文，注入浏览器会话
    let auth = AuthContext::new(Arc::new(BrowserSession));
    provide_context(auth);

    view! {
        // 2. 路由器组件：注入认证上下文实现守卫
        <Router auth=auth>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
