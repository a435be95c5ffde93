// ==========================================
// 交易报表导入引擎 - 配置层
// ==========================================
// 职责: 导入参数管理（JSON 文件 + 默认值）
// ==========================================

pub mod import_config;

// 重导出核心配置
pub use import_config::{config_keys, ImportConfig};
