// ==========================================
// 交易报表导入引擎 - API 层
// ==========================================
// 职责: 提供导入 API 接口,供 CLI / 前端调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse};
