//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整次运行的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 连接或启动浏览器
//! - 组装 Chrome 页面和 PDF 渲染器
//! - 输出全局统计信息
//!
//! ### `run_loop` - 订单循环
//! - 打开站点、下载并读取订单
//! - 顺序处理每个订单，失败不影响后续订单
//! - 每个订单后执行恢复动作
//! - 打包收据
//!
//! ## 层次关系
//!
//! ```text
//! app (持有 Browser)
//!     ↓
//! run_loop (处理 Vec<OrderRecord>)
//!     ↓
//! workflow::OrderFlow (处理单个订单)
//!     ↓
//! services (能力层：表单 / 收据 / 合并 / 打包)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```

pub mod app;
pub mod run_loop;

// 重新导出主要类型
pub use app::App;
pub use run_loop::{OrderRobot, Recovery, RunSummary};
