//! 测试用的模拟站点：按脚本响应页面操作，不需要真实浏览器

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use lopdf::{dictionary, Document, Object, Stream};
use robot_order_bot::error::PageError;
use robot_order_bot::{Config, HtmlRenderer, OrderRecord, PageDriver, Selector, Timeouts};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 站点行为脚本
#[derive(Debug, Clone)]
pub struct FakeSite {
    pub head_options: Vec<String>,
    pub body_options: Vec<String>,
    /// 提交次数达到该值后，收据页不再出现 "Order another robot" 按钮
    pub order_another_missing_from: Option<usize>,
    /// 第一次打开之后的导航全部失败
    pub reload_fails: bool,
    pub screenshot_fails: bool,
    /// OK 弹窗从不出现
    pub overlay_never_shows: bool,
    /// 下单后导航栏的 "Order your robot!" 链接不存在
    pub order_link_missing: bool,
}

impl Default for FakeSite {
    fn default() -> Self {
        let options = ["1", "2", "3", "4", "5", "6"].map(String::from).to_vec();
        Self {
            head_options: options.clone(),
            body_options: options,
            order_another_missing_from: None,
            reload_fails: false,
            screenshot_fails: false,
            overlay_never_shows: false,
            order_link_missing: false,
        }
    }
}

/// 页面状态和调用记录
#[derive(Debug, Default)]
pub struct FakeState {
    pub visits: usize,
    pub overlay_visible: bool,
    pub previewed: bool,
    pub receipt_visible: bool,
    pub address: String,
    pub head_selects: usize,
    pub submissions: usize,
    pub order_another_clicks: usize,
    pub overlay_dismissals: usize,
    pub order_link_clicks: usize,
}

pub struct FakePage {
    site: FakeSite,
    state: Mutex<FakeState>,
}

impl FakePage {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site,
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn visible(&self, state: &FakeState, selector: &Selector) -> bool {
        match selector {
            Selector::Text(text) => text == "OK" && state.overlay_visible,
            Selector::Css(css) => {
                if let Some(value) = body_value(css) {
                    return self.site.body_options.iter().any(|v| v == value);
                }
                match css.as_str() {
                    "button[id='order']" => state.previewed,
                    "#receipt" => state.receipt_visible,
                    "a.nav-link.active[href='#/robot-order']" => !self.site.order_link_missing,
                    "button[id='order-another']" => {
                        let missing = self
                            .site
                            .order_another_missing_from
                            .is_some_and(|n| state.submissions >= n);
                        state.receipt_visible && !missing
                    }
                    _ => true,
                }
            }
        }
    }
}

fn body_value(css: &str) -> Option<&str> {
    css.strip_prefix("input[name='body'][value='")?
        .strip_suffix("']")
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> Result<(), PageError> {
        let mut state = self.state();
        if self.site.reload_fails && state.visits > 0 {
            return Err(PageError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_CLOSED".to_string(),
            });
        }
        state.visits += 1;
        state.overlay_visible = !self.site.overlay_never_shows;
        state.previewed = false;
        state.receipt_visible = false;
        Ok(())
    }

    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<(), PageError> {
        let state = self.state();
        if self.visible(&state, selector) {
            Ok(())
        } else {
            Err(PageError::Timeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis(),
            })
        }
    }

    async fn click(&self, selector: &Selector) -> Result<(), PageError> {
        let mut state = self.state();
        if !self.visible(&state, selector) {
            return Err(PageError::NotFound {
                selector: selector.to_string(),
            });
        }
        match selector.to_string().as_str() {
            "text='OK'" => {
                state.overlay_visible = false;
                state.overlay_dismissals += 1;
            }
            "button[id='preview']" => state.previewed = true,
            "button[id='order']" => {
                state.submissions += 1;
                state.receipt_visible = true;
            }
            "a.nav-link.active[href='#/robot-order']" => state.order_link_clicks += 1,
            "button[id='order-another']" => {
                state.order_another_clicks += 1;
                state.receipt_visible = false;
                state.previewed = false;
                state.overlay_visible = !self.site.overlay_never_shows;
            }
            _ => {}
        }
        Ok(())
    }

    async fn select_option(&self, selector: &Selector, value: &str) -> Result<(), PageError> {
        let mut state = self.state();
        state.head_selects += 1;
        if self.site.head_options.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(PageError::NoMatchingOption {
                selector: selector.to_string(),
                value: value.to_string(),
            })
        }
    }

    async fn fill(&self, selector: &Selector, value: &str) -> Result<(), PageError> {
        if selector.to_string() == "input[id='address']" {
            self.state().address = value.to_string();
        }
        Ok(())
    }

    async fn inner_html(&self, selector: &Selector) -> Result<String, PageError> {
        let state = self.state();
        if self.visible(&state, selector) {
            Ok(format!("<h3>Receipt</h3><p>{}</p>", state.address))
        } else {
            Err(PageError::NotFound {
                selector: selector.to_string(),
            })
        }
    }

    async fn screenshot(&self, path: &Path) -> Result<(), PageError> {
        let fail = |reason: String| PageError::Screenshot {
            path: path.to_path_buf(),
            reason,
        };
        if self.site.screenshot_fails {
            return Err(fail("Target closed".to_string()));
        }
        image::RgbImage::from_pixel(64, 48, image::Rgb([40, 90, 160]))
            .save(path)
            .map_err(|e| fail(e.to_string()))
    }
}

/// 把 HTML 渲染为单页空白 PDF
#[derive(Default)]
pub struct FakeRenderer {
    pub fail: bool,
    pub renders: Mutex<usize>,
}

#[async_trait]
impl HtmlRenderer for FakeRenderer {
    async fn render_pdf(&self, _html: &str, path: &Path) -> Result<(), PageError> {
        if self.fail {
            return Err(PageError::Render {
                path: path.to_path_buf(),
                reason: "Printing is not available".to_string(),
            });
        }
        write_blank_pdf(path);
        *self.renders.lock().unwrap() += 1;
        Ok(())
    }
}

pub fn write_blank_pdf(path: &Path) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

pub fn page_count(path: &Path) -> usize {
    Document::load(path).unwrap().get_pages().len()
}

pub fn zip_entries(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

/// 所有路径都指向临时目录、不等待的配置
pub fn test_config(root: &Path) -> Config {
    Config {
        order_site_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
        orders_csv_url: "http://127.0.0.1:9/orders.csv".to_string(),
        workspace_dir: root.to_path_buf(),
        output_dir: root.join("output"),
        archive_path: root.join("receipts.zip"),
        browser_debug_port: None,
        chrome_executable: None,
        slowmo: Duration::ZERO,
        settle_delay: Duration::ZERO,
        output_log_file: root.join("output").join("run_log.txt"),
        timeouts: Timeouts::default(),
    }
}

pub fn order(number: &str, head: &str, body: &str) -> OrderRecord {
    OrderRecord {
        order_number: number.to_string(),
        head: head.to_string(),
        body: body.to_string(),
        legs: "3".to_string(),
        address: format!("Address {}", number),
    }
}

/// 在本地端口上提供一次 HTTP 响应，返回订单文件 URL
pub async fn serve_csv_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{}/orders.csv", addr)
}
