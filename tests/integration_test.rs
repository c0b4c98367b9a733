use robot_order_bot::browser::open_session;
use robot_order_bot::config::Config;
use robot_order_bot::infrastructure::{ChromePage, PageDriver};
use robot_order_bot::services::navigation::open_order_website;
use robot_order_bot::services::{read_orders, OrderFetcher};
use robot_order_bot::App;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_full_order_run() {
    let _ = tracing_subscriber::fmt::try_init();

    // 加载配置
    let config = Config::from_env();
    let archive_path = config.archive_path.clone();

    let app = App::initialize(config).await.expect("初始化失败");
    let summary = app.run().await;

    assert!(!summary.fetch_failed, "订单文件应该能下载");
    assert!(summary.total > 0);
    assert!(archive_path.exists(), "应该生成压缩包");
}

#[tokio::test]
#[ignore]
async fn test_open_order_website() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::from_env();
    let session = open_session(&config).await.expect("打开浏览器失败");
    let page = ChromePage::new(session.page, config.slowmo);

    open_order_website(&page, &config.order_site_url, config.timeouts.overlay)
        .await
        .expect("打开下单页失败");

    let head = robot_order_bot::Selector::css("select[name='head']");
    assert!(page.wait_for(&head, config.timeouts.body).await.is_ok());
}

#[tokio::test]
#[ignore]
async fn test_download_orders() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::from_env();
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("orders.csv");

    let fetcher = OrderFetcher::new(config.timeouts.download);
    let path = fetcher
        .download(&config.orders_csv_url, &destination)
        .await
        .expect("下载订单文件失败");

    let orders = read_orders(&path);
    println!("找到 {} 个订单", orders.len());
    assert!(!orders.is_empty());
}
