//! 认证模块
//!
//! 会话令牌由外部登录流程写入 LocalStorage，这里只负责读取和注销。
//! 路由服务通过注入的 [`AuthContext`] 检查认证状态，不直接访问存储。

use std::sync::Arc;

use leptos::prelude::*;

use crate::config::AppConfig;

/// 会话令牌来源
pub trait SessionStore: Send + Sync {
    /// 当前令牌（可能为空字符串）
    fn token(&self) -> Option<String>;

    /// 清除令牌，成功时返回 `true`
    fn clear(&self) -> bool;
}

/// 令牌存在且非空即视为已认证
pub fn has_session(store: &dyn SessionStore) -> bool {
    store.token().is_some_and(|token| !token.is_empty())
}

/// 浏览器 LocalStorage 中的会话
///
/// 隐私模式或禁用存储时没有 `localStorage`，此时视为未登录，注销返回失败。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSession;

impl BrowserSession {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl SessionStore for BrowserSession {
    fn token(&self) -> Option<String> {
        Self::storage()?.get_item(AppConfig::AUTH_TOKEN_KEY).ok()?
    }

    fn clear(&self) -> bool {
        Self::storage().is_some_and(|s| s.remove_item(AppConfig::AUTH_TOKEN_KEY).is_ok())
    }
}

/// 认证上下文
///
/// 每次查询都重新读取会话来源；会话变化时通过 trigger 通知订阅者。
#[derive(Clone, Copy)]
pub struct AuthContext {
    store: StoredValue<Arc<dyn SessionStore>>,
    changed: Trigger,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store: StoredValue::new(store),
            changed: Trigger::new(),
        }
    }

    /// 当前是否已认证（响应式，会话变化时重新运行调用方）
    pub fn is_authenticated(&self) -> bool {
        self.changed.track();
        self.is_authenticated_untracked()
    }

    /// 当前是否已认证（非响应式）
    pub fn is_authenticated_untracked(&self) -> bool {
        self.store.with_value(|store| has_session(store.as_ref()))
    }

    /// 注销：清除令牌并通知路由重新执行守卫
    pub fn sign_out(&self) {
        let cleared = self.store.with_value(|store| store.clear());
        if !cleared {
            tracing::warn!("failed to clear session token");
        }
        self.changed.notify();
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
