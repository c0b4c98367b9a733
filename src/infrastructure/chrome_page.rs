//! Chrome 页面 - 基础设施层
//!
//! 基于 chromiumoxide 实现 [`PageDriver`] 与 [`HtmlRenderer`]。
//! 所有元素操作都通过页面内执行 JS 完成。

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::PageError;
use crate::infrastructure::page_driver::{HtmlRenderer, PageDriver, Selector};

/// 轮询元素的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Chrome 页面
///
/// 职责：
/// - 持有下单页面的 Page
/// - 每次交互前按 slowmo 停顿
pub struct ChromePage {
    page: Page,
    slowmo: Duration,
}

impl ChromePage {
    pub fn new(page: Page, slowmo: Duration) -> Self {
        Self { page, slowmo }
    }

    /// 执行 JS 代码并反序列化为指定类型
    async fn eval_as<T: DeserializeOwned>(&self, js_code: String) -> Result<T, PageError> {
        let result = self.page.evaluate(js_code).await?;
        result
            .into_value::<T>()
            .map_err(|e| PageError::Script(e.to_string()))
    }

    async fn pace(&self) {
        if !self.slowmo.is_zero() {
            sleep(self.slowmo).await;
        }
    }
}

/// 生成定位元素的 JS 表达式
fn locate_js(selector: &Selector) -> String {
    match selector {
        Selector::Css(css) => format!("document.querySelector({})", js_str(css)),
        Selector::Text(text) => format!(
            r#"Array.from(document.querySelectorAll('button, a, [role="button"], input[type="button"], input[type="submit"]'))
                .find(el => (el.innerText || el.value || '').trim() === {})"#,
            js_str(text)
        ),
    }
}

/// 在截止时间前反复探测元素是否可见
///
/// 页面重新渲染时脚本可能短暂失败，探测出错按"尚不可见"继续轮询
async fn poll_until_visible<F, Fut>(
    selector: &Selector,
    timeout: Duration,
    mut probe: F,
) -> Result<(), PageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, PageError>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        match probe().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => debug!("等待 {} 时脚本出错，继续轮询: {}", selector, e),
        }
        if Instant::now() >= deadline {
            return Err(PageError::Timeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis(),
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// 把 Rust 字符串转成 JS 字符串字面量
fn js_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn goto(&self, url: &str) -> Result<(), PageError> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| PageError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<(), PageError> {
        let js_code = format!(
            r#"(() => {{
                const el = {};
                return !!el && (el.offsetParent !== null || el.getClientRects().length > 0);
            }})()"#,
            locate_js(selector)
        );

        poll_until_visible(selector, timeout, || self.eval_as::<bool>(js_code.clone())).await
    }

    async fn click(&self, selector: &Selector) -> Result<(), PageError> {
        self.pace().await;
        let js_code = format!(
            r#"(() => {{
                const el = {};
                if (!el) return false;
                el.scrollIntoView({{ block: 'center' }});
                el.click();
                return true;
            }})()"#,
            locate_js(selector)
        );

        if self.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(PageError::NotFound {
                selector: selector.to_string(),
            })
        }
    }

    async fn select_option(&self, selector: &Selector, value: &str) -> Result<(), PageError> {
        self.pace().await;
        // React 受控组件需要通过原型上的 setter 赋值并派发事件
        let js_code = format!(
            r#"(() => {{
                const el = {};
                if (!el) return 'missing';
                const wanted = {};
                const opt = Array.from(el.options || []).find(o => o.value === wanted || o.label === wanted);
                if (!opt) return 'nomatch';
                const setter = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set;
                setter.call(el, opt.value);
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return 'ok';
            }})()"#,
            locate_js(selector),
            js_str(value)
        );

        match self.eval_as::<String>(js_code).await?.as_str() {
            "ok" => Ok(()),
            "nomatch" => Err(PageError::NoMatchingOption {
                selector: selector.to_string(),
                value: value.to_string(),
            }),
            _ => Err(PageError::NotFound {
                selector: selector.to_string(),
            }),
        }
    }

    async fn fill(&self, selector: &Selector, value: &str) -> Result<(), PageError> {
        self.pace().await;
        let js_code = format!(
            r#"(() => {{
                const el = {};
                if (!el) return false;
                const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
                Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, {});
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            locate_js(selector),
            js_str(value)
        );

        if self.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(PageError::NotFound {
                selector: selector.to_string(),
            })
        }
    }

    async fn inner_html(&self, selector: &Selector) -> Result<String, PageError> {
        let js_code = format!(
            r#"(() => {{
                const el = {};
                return el ? el.innerHTML : null;
            }})()"#,
            locate_js(selector)
        );

        self.eval_as::<Option<String>>(js_code)
            .await?
            .ok_or_else(|| PageError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn screenshot(&self, path: &Path) -> Result<(), PageError> {
        self.pace().await;
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page
            .save_screenshot(params, path)
            .await
            .map_err(|e| PageError::Screenshot {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// 使用独立标签页把 HTML 片段打印为 PDF
///
/// 打印需要无头模式，通过调试端口连接的有界面浏览器可能不支持
pub struct ChromePdfRenderer {
    page: Page,
}

impl ChromePdfRenderer {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl HtmlRenderer for ChromePdfRenderer {
    async fn render_pdf(&self, html: &str, path: &Path) -> Result<(), PageError> {
        let document = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
            html
        );
        let render_err = |e: chromiumoxide::error::CdpError| PageError::Render {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        self.page.set_content(document).await.map_err(render_err)?;

        let params = PrintToPdfParams {
            print_background: Some(true),
            ..Default::default()
        };
        self.page.save_pdf(params, path).await.map_err(render_err)?;
        Ok(())
    }
}
