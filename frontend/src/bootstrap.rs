//! 启动模块
//!
//! 安装 panic hook 和日志，然后把应用挂载到宿主页面的 `#app` 元素上。

use leptos::mount::mount_to;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::JsCast;

use crate::App;
use crate::config::AppConfig;

/// 启动错误
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("mount target #{id} not found in host page")]
    MountTargetMissing { id: &'static str },
}

/// 将 tracing 输出到浏览器控制台
fn init_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    let _ = tracing_subscriber::registry()
        .with(LevelFilter::from_level(AppConfig::log_level()))
        .with(fmt_layer)
        .try_init();
}

/// 查找宿主元素
fn mount_target() -> Result<web_sys::HtmlElement, BootstrapError> {
    let id = AppConfig::MOUNT_ELEMENT_ID;
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or(BootstrapError::MountTargetMissing { id })
}

/// 启动应用，整个页面生命周期只调用一次
pub fn start() -> Result<(), BootstrapError> {
    console_error_panic_hook::set_once();
    init_logging();

    let target = mount_target()?;
    mount_to(target, App).forget();

    tracing::info!(base = AppConfig::base_path(), "application mounted");
    Ok(())
}
