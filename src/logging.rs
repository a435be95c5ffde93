// ==========================================
// 日志系统初始化
// ==========================================
// tracing-subscriber + EnvFilter（RUST_LOG）
// CLI 的 stdout 输出 JSON 结果,日志一律写 stderr
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// 测试时只放开本 crate 的 debug 日志
const TEST_FILTER: &str = "trade_report_import=debug";

/// 初始化 CLI 日志
///
/// # 环境变量
/// - RUST_LOG: 过滤器,未设置时为 info（例如 RUST_LOG=trade_report_import=trace）
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 集成测试用: 日志进入测试输出捕获,可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(TEST_FILTER))
        .with_test_writer()
        .try_init();
}
