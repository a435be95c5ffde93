// ==========================================
// 交易报表导入引擎 - 核心库
// ==========================================
// 职责: 券商导出的交易报表 → 按列名取值的原始交易行
// 支持: xlsx 工作簿 / CSV / HTML 报表 / NinjaTrader CSV
// 边界: 不做盈亏计算、不落库,字段解析由下游按需调用
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 数据结构与枚举
pub mod domain;

// 导入层 - 报表解析管道
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 导入接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BrokerProfile, ReportFormat, TradeDirection};

// 领域实体
pub use domain::{CellValue, RawByteInput, RawTradeRow, TradeImportResult};

// 导入器
pub use importer::{
    DataCleaner, ImportError, ImportResult, TradeReportImporter, TradeReportImporterImpl,
};

// 配置
pub use config::ImportConfig;

// API
pub use api::{ApiError, ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "交易报表导入引擎";
