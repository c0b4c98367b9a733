pub mod connection;
pub mod headless;

use anyhow::Result;
use chromiumoxide::{Browser, Page};
use tracing::info;

use crate::config::Config;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;

/// 一次运行共用的浏览器会话
///
/// `page` 用于下单，`print_page` 是打印收据用的独立标签页
pub struct BrowserSession {
    pub browser: Browser,
    pub page: Page,
    pub print_page: Page,
}

/// 按配置连接或启动浏览器，并打开两个空白标签页
pub async fn open_session(config: &Config) -> Result<BrowserSession> {
    let browser = match config.browser_debug_port {
        Some(port) => connect_to_browser(port).await?,
        None => launch_headless_browser(config.chrome_executable.as_deref()).await?,
    };

    let page = browser.new_page("about:blank").await?;
    let print_page = browser.new_page("about:blank").await?;
    info!("✓ 浏览器会话已就绪");

    Ok(BrowserSession {
        browser,
        page,
        print_page,
    })
}
