//! 页面驱动 - 基础设施层
//!
//! 下单流程只依赖这里定义的页面能力，不直接接触 chromiumoxide

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::PageError;

/// 页面元素选择器
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS 选择器
    Css(String),
    /// 按可见文本精确匹配（按钮、链接）
    Text(String),
}

impl Selector {
    pub fn css(selector: impl Into<String>) -> Self {
        Selector::Css(selector.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Selector::Text(text.into())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => write!(f, "{}", css),
            Selector::Text(text) => write!(f, "text='{}'", text),
        }
    }
}

/// 浏览器页面能力
///
/// 职责：
/// - 持有唯一的页面会话
/// - 只暴露导航、等待、点击、填写、截图能力
/// - 不认识订单，不处理业务流程
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 导航到指定 URL
    async fn goto(&self, url: &str) -> Result<(), PageError>;

    /// 等待元素出现，超时返回 [`PageError::Timeout`]
    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<(), PageError>;

    async fn click(&self, selector: &Selector) -> Result<(), PageError>;

    /// 按 value 选择下拉框选项，没有匹配项时返回 [`PageError::NoMatchingOption`]
    async fn select_option(&self, selector: &Selector, value: &str) -> Result<(), PageError>;

    async fn fill(&self, selector: &Selector, value: &str) -> Result<(), PageError>;

    /// 读取元素的 innerHTML
    async fn inner_html(&self, selector: &Selector) -> Result<String, PageError>;

    /// 整页截图并保存为 PNG
    async fn screenshot(&self, path: &Path) -> Result<(), PageError>;
}

/// HTML 渲染为 PDF 的能力
#[async_trait]
pub trait HtmlRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str, path: &Path) -> Result<(), PageError>;
}
