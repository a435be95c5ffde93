// ==========================================
// 交易报表导入引擎 - API层错误类型
// ==========================================
// 职责: 将导入层错误转换为带错误码的用户可读错误
// 约定: 每个错误都携带稳定错误码,前端据此分支处理
// ==========================================

use crate::importer::error::ImportError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 导入错误
    // ==========================================
    /// 报表导入失败（code 为 ImportError::kind()）
    #[error("{message}")]
    ImportFailed {
        code: String,
        message: String,
        user_error: bool,
    },

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 错误码
    pub fn code(&self) -> &str {
        match self {
            ApiError::ImportFailed { code, .. } => code,
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否可由用户自行处理（重新导出/另存等）
    pub fn is_user_error(&self) -> bool {
        match self {
            ApiError::ImportFailed { user_error, .. } => *user_error,
            ApiError::InvalidInput(_) => true,
            ApiError::InternalError(_) => false,
        }
    }

    /// 转换为可序列化的错误体
    pub fn to_response(&self) -> ApiErrorResponse {
        ApiErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            user_error: self.is_user_error(),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// 目的: 保留错误码,消息按当前语言本地化
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            other => ApiError::ImportFailed {
                code: other.kind().to_string(),
                message: other.user_message(),
                user_error: other.is_user_error(),
            },
        }
    }
}

/// 错误响应体（CLI / 前端输出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub user_error: bool,
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{set_locale, tests::LOCALE_TEST_LOCK};

    #[test]
    fn test_from_import_error_keeps_code() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");

        let err: ApiError = ImportError::MissingSection {
            expected: "Positions / Позиции".to_string(),
        }
        .into();

        assert_eq!(err.code(), "MISSING_SECTION");
        assert!(err.is_user_error());
        assert!(err.to_string().contains("Positions / Позиции"));

        set_locale("zh-CN");
    }

    #[test]
    fn test_internal_error_mapping() {
        let err: ApiError = ImportError::InternalError("boom".to_string()).into();
        assert!(matches!(err, ApiError::InternalError(_)));
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(!err.is_user_error());

        let response = err.to_response();
        assert_eq!(response.code, "INTERNAL_ERROR");
        assert!(response.message.contains("boom"));
    }

    #[test]
    fn test_file_read_error_is_not_user_error() {
        let err: ApiError = ImportError::FileReadError("missing.csv".to_string()).into();
        assert_eq!(err.code(), "FILE_READ_ERROR");
        assert!(!err.is_user_error());
    }
}
