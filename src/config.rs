use std::path::PathBuf;
use std::time::Duration;

/// 各步骤的等待超时
#[derive(Clone, Debug)]
pub struct Timeouts {
    /// 下载订单文件
    pub download: Duration,
    /// 等待弹窗的 OK 按钮
    pub overlay: Duration,
    /// 等待 body 单选框出现
    pub body: Duration,
    /// 预览后等待下单按钮
    pub order_button: Duration,
    /// 等待收据区域渲染
    pub receipt: Duration,
    /// 等待 "Order another robot" 按钮
    pub order_another: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            download: Duration::from_secs(6),
            overlay: Duration::from_secs(6),
            body: Duration::from_secs(6),
            order_button: Duration::from_secs(6),
            receipt: Duration::from_secs(10),
            order_another: Duration::from_secs(60),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 下单页面 URL
    pub order_site_url: String,
    /// 订单 CSV 的下载地址
    pub orders_csv_url: String,
    /// 订单文件的存放目录（ROBOT_WORKSPACE）
    pub workspace_dir: PathBuf,
    /// 截图和收据的输出根目录
    pub output_dir: PathBuf,
    /// 最终压缩包路径
    pub archive_path: PathBuf,
    /// 浏览器调试端口，未设置时启动无头浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径，未设置时自动查找
    pub chrome_executable: Option<PathBuf>,
    /// 每次页面操作前的停顿
    pub slowmo: Duration,
    /// 两个订单之间等待页面稳定的时间
    pub settle_delay: Duration,
    /// 运行日志文件
    pub output_log_file: PathBuf,
    pub timeouts: Timeouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_site_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            workspace_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            archive_path: PathBuf::from("receipts.zip"),
            browser_debug_port: None,
            chrome_executable: None,
            slowmo: Duration::from_millis(700),
            settle_delay: Duration::from_secs(2),
            output_log_file: PathBuf::from("output/run_log.txt"),
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            order_site_url: std::env::var("ORDER_SITE_URL").unwrap_or(default.order_site_url),
            orders_csv_url: std::env::var("ORDERS_CSV_URL").unwrap_or(default.orders_csv_url),
            workspace_dir: std::env::var("ROBOT_WORKSPACE").map(PathBuf::from).unwrap_or(default.workspace_dir),
            output_dir: std::env::var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(default.output_dir),
            archive_path: std::env::var("ARCHIVE_PATH").map(PathBuf::from).unwrap_or(default.archive_path),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).or(default.browser_debug_port),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from).or(default.chrome_executable),
            slowmo: std::env::var("SLOWMO_MS").ok().and_then(|v| v.parse().ok()).map(Duration::from_millis).unwrap_or(default.slowmo),
            settle_delay: std::env::var("SETTLE_DELAY_MS").ok().and_then(|v| v.parse().ok()).map(Duration::from_millis).unwrap_or(default.settle_delay),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").map(PathBuf::from).unwrap_or(default.output_log_file),
            timeouts: default.timeouts,
        }
    }

    /// 下载的订单文件位置
    pub fn orders_csv_path(&self) -> PathBuf {
        self.workspace_dir.join("orders.csv")
    }

    pub fn receipts_dir(&self) -> PathBuf {
        self.output_dir.join("receipts")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }
}
