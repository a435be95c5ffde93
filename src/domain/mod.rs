// ==========================================
// 交易报表导入引擎 - 领域模型层
// ==========================================
// 职责: 定义导入流程中的数据结构与枚举
// 红线: 不含解析逻辑,不含财务计算（PnL 由下游负责）
// ==========================================

pub mod trade;
pub mod types;

// 重导出核心类型
pub use trade::{
    CellValue, DecodedText, GridRow, HeaderMap, RawByteInput, RawGrid, RawTradeData, RawTradeRow,
    TradeImportResult,
};
pub use types::{BrokerProfile, ReportFormat, TradeDirection};
