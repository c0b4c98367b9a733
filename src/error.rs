use std::path::PathBuf;

use thiserror::Error;

use crate::services::form_driver::{FormState, FormStep};

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 页面操作错误
    #[error("页面错误: {0}")]
    Page(#[from] PageError),
    /// 下载订单文件错误
    #[error("下载错误: {0}")]
    Fetch(#[from] FetchError),
    /// 读取订单表错误
    #[error("订单表错误: {0}")]
    Table(#[from] TableError),
    /// 表单填写错误
    #[error("表单错误: {0}")]
    Form(#[from] FormError),
    /// 收据截取错误
    #[error("收据错误: {0}")]
    Capture(#[from] CaptureError),
    /// PDF 合并错误
    #[error("合并错误: {0}")]
    Merge(#[from] MergeError),
    /// 打包错误
    #[error("打包错误: {0}")]
    Archive(#[from] ArchiveError),
}

/// 浏览器页面操作错误
#[derive(Debug, Error)]
pub enum PageError {
    /// 等待元素超时
    #[error("等待元素 {selector} 超时 ({timeout_ms}ms)")]
    Timeout { selector: String, timeout_ms: u128 },
    /// 元素不存在
    #[error("未找到元素: {selector}")]
    NotFound { selector: String },
    /// 下拉框没有匹配的选项
    #[error("下拉框 {selector} 中没有值为 '{value}' 的选项")]
    NoMatchingOption { selector: String, value: String },
    /// 导航失败
    #[error("导航到 {url} 失败: {reason}")]
    Navigation { url: String, reason: String },
    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    Script(String),
    /// 截图失败
    #[error("截图失败 ({}): {reason}", .path.display())]
    Screenshot { path: PathBuf, reason: String },
    /// 渲染 PDF 失败
    #[error("渲染 PDF 失败 ({}): {reason}", .path.display())]
    Render { path: PathBuf, reason: String },
}

impl From<chromiumoxide::error::CdpError> for PageError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        PageError::Script(err.to_string())
    }
}

/// 下载订单文件错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("请求 {url} 失败: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("写入文件失败 ({}): {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 订单表解析错误
#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV 解析失败 ({}): {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// 表单填写错误，记录失败时所处的状态
#[derive(Debug, Error)]
#[error("[{state}] {step} 失败: {source}")]
pub struct FormError {
    pub state: FormState,
    pub step: FormStep,
    #[source]
    pub source: PageError,
}

/// 收据截取错误
#[derive(Debug, Error)]
pub enum CaptureError {
    /// 收据区域没有出现
    #[error("收据未出现: {0}")]
    ReceiptMissing(#[source] PageError),
    /// 收据渲染失败
    #[error("收据渲染失败: {0}")]
    Render(#[source] PageError),
    /// 截图失败
    #[error("截图失败: {0}")]
    Screenshot(#[source] PageError),
    #[error("创建目录失败 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// PDF 合并错误
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("PDF 读写失败: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("截图解码失败: {0}")]
    Image(#[from] image::ImageError),
    #[error("文件操作失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 打包错误
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("ZIP 写入失败: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("遍历目录失败: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("文件操作失败: {0}")]
    Io(#[from] std::io::Error),
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
