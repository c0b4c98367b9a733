//! 页面导航服务 - 业务能力层
//!
//! 打开下单页、关闭弹窗、回到下单表单

use std::time::Duration;

use tracing::{debug, info};

use crate::error::PageError;
use crate::infrastructure::{PageDriver, Selector};

/// 弹窗上的确认按钮
pub fn overlay_ok_selector() -> Selector {
    Selector::text("OK")
}

/// 收据页上的 "Order another robot" 按钮
pub fn order_another_selector() -> Selector {
    Selector::css("button[id='order-another']")
}

/// 打开下单页并关闭弹窗
pub async fn open_order_website<P: PageDriver + ?Sized>(
    page: &P,
    url: &str,
    overlay_timeout: Duration,
) -> Result<(), PageError> {
    page.goto(url).await?;
    info!("🌐 已打开下单页: {}", url);
    close_annoying_modal(page, overlay_timeout).await;
    Ok(())
}

/// 等待弹窗的 OK 按钮并点击
///
/// 弹窗没有出现不算错误
///
/// # 返回
/// 返回是否关闭了弹窗
pub async fn close_annoying_modal<P: PageDriver + ?Sized>(page: &P, timeout: Duration) -> bool {
    let ok = overlay_ok_selector();
    let result = match page.wait_for(&ok, timeout).await {
        Ok(()) => page.click(&ok).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            debug!("弹窗已关闭");
            true
        }
        Err(e) => {
            info!("未关闭弹窗: {}", e);
            false
        }
    }
}

/// 点击 "Order another robot" 回到下单表单
pub async fn return_to_order_form<P: PageDriver + ?Sized>(
    page: &P,
    timeout: Duration,
) -> Result<(), PageError> {
    let button = order_another_selector();
    page.wait_for(&button, timeout).await?;
    page.click(&button).await
}
