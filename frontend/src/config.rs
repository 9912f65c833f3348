//! 前端配置
//!
//! 运行期不可变的常量，以及构建时通过环境变量注入的可选项。

use tracing::Level;

/// 应用配置
pub struct AppConfig;

impl AppConfig {
    /// 宿主页面中挂载应用的元素 id
    pub const MOUNT_ELEMENT_ID: &'static str = "app";

    /// LocalStorage 中会话令牌的键
    pub const AUTH_TOKEN_KEY: &'static str = "authToken";

    /// 单次导航允许的最大重定向次数
    pub const MAX_REDIRECTS: usize = 8;

    /// History 基础路径，构建时由 `APP_BASE_URL` 指定，需与 Trunk 的 `public_url` 一致
    pub fn base_path() -> &'static str {
        option_env!("APP_BASE_URL").unwrap_or("/")
    }

    /// 日志级别，构建时由 `APP_LOG_LEVEL` 指定
    pub fn log_level() -> Level {
        option_env!("APP_LOG_LEVEL")
            .and_then(|level| level.parse().ok())
            .unwrap_or(Level::INFO)
    }
}
