// ==========================================
// 交易报表导入引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 策略: 结构/容器级错误立即中止整个导入；字段级问题由解析器返回哨兵值
// ==========================================

use crate::domain::types::ReportFormat;
use crate::i18n::t_with_args;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 容器/格式错误 =====
    #[error("无法识别的交易报表文件: {file_name}（不是 xlsx 工作簿、分隔符文本或 HTML 报表）。请在来源软件中重新导出或另存后再导入")]
    UnrecognizedContainer { file_name: String },

    #[error("表格文件已损坏（包含非法字符）: {0}。请使用原始表格软件打开并重新保存后再导入")]
    CorruptedContainer(String),

    #[error("Excel 解析失败: {0}")]
    WorkbookParseError(String),

    #[error("文本解码失败: {0}")]
    DecodeError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 结构错误 =====
    #[error("未找到持仓区段: 报表中不存在 \"{expected}\" 标签,请确认导出的是包含持仓记录的历史报表")]
    MissingSection { expected: String },

    #[error("持仓区段缺少表头行 (标签位于第 {label_row} 行之后无数据),导出文件可能被截断")]
    MissingHeaderRow { label_row: usize },

    #[error("未从 {format} 文件中提取到任何行")]
    EmptyExtraction { format: ReportFormat },

    #[error("缺少必需列: {0}")]
    MissingRequiredColumn(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 稳定的错误码（供前端区分处理）
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::UnrecognizedContainer { .. } => "UNRECOGNIZED_CONTAINER",
            ImportError::CorruptedContainer(_) => "CORRUPTED_CONTAINER",
            ImportError::WorkbookParseError(_) => "WORKBOOK_PARSE_ERROR",
            ImportError::DecodeError(_) => "DECODE_ERROR",
            ImportError::CsvParseError(_) => "CSV_PARSE_ERROR",
            ImportError::FileReadError(_) => "FILE_READ_ERROR",
            ImportError::MissingSection { .. } => "MISSING_SECTION",
            ImportError::MissingHeaderRow { .. } => "MISSING_HEADER_ROW",
            ImportError::EmptyExtraction { .. } => "EMPTY_EXTRACTION",
            ImportError::MissingRequiredColumn(_) => "MISSING_REQUIRED_COLUMN",
            ImportError::ConfigReadError { .. } => "CONFIG_READ_ERROR",
            ImportError::ConfigValueError { .. } => "CONFIG_VALUE_ERROR",
            ImportError::InternalError(_) => "INTERNAL_ERROR",
            ImportError::Other(_) => "OTHER",
        }
    }

    /// 是否为用户可处理的报表问题（而非程序/环境故障）
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ImportError::UnrecognizedContainer { .. }
                | ImportError::CorruptedContainer(_)
                | ImportError::MissingSection { .. }
                | ImportError::MissingHeaderRow { .. }
                | ImportError::EmptyExtraction { .. }
                | ImportError::MissingRequiredColumn(_)
        )
    }

    /// 按当前语言生成面向用户的提示
    pub fn user_message(&self) -> String {
        match self {
            ImportError::UnrecognizedContainer { file_name } => {
                t_with_args("import.unrecognized_container", &[("file", file_name)])
            }
            ImportError::CorruptedContainer(detail) => {
                t_with_args("import.corrupted_container", &[("detail", detail)])
            }
            ImportError::MissingSection { expected } => {
                t_with_args("import.missing_section", &[("expected", expected)])
            }
            ImportError::MissingHeaderRow { label_row } => t_with_args(
                "import.missing_header_row",
                &[("row", &label_row.to_string())],
            ),
            ImportError::EmptyExtraction { format } => {
                t_with_args("import.empty_extraction", &[("format", &format.to_string())])
            }
            ImportError::MissingRequiredColumn(column) => {
                t_with_args("import.missing_required_column", &[("column", column)])
            }
            other => t_with_args("import.failed", &[("detail", &other.to_string())]),
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        classify_workbook_error(err)
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::InternalError(err.to_string())
    }
}

/// 工作簿必备部件: 缺失说明压缩包不是工作簿
const WORKBOOK_PARTS: [&str; 2] = ["xl/workbook.xml", "xl/_rels/workbook.xml.rels"];

/// 区分“容器损坏（需重新保存）”“不是工作簿”与一般解析失败
///
/// XML 解码/转义失败（含非法 UTF-8 字节、未知实体）即非法字符特征。
/// 缺少工作簿部件时返回 UnrecognizedContainer,file_name 暂记缺失部件,由调用方替换为文件名。
pub fn classify_workbook_error(err: calamine::XlsxError) -> ImportError {
    use calamine::XlsxError;

    match err {
        XlsxError::Xml(_) | XlsxError::XmlAttr(_) | XlsxError::XmlEof(_) => {
            ImportError::CorruptedContainer(err.to_string())
        }
        XlsxError::FileNotFound(ref part)
            if WORKBOOK_PARTS.iter().any(|p| p.eq_ignore_ascii_case(part)) =>
        {
            ImportError::UnrecognizedContainer {
                file_name: part.clone(),
            }
        }
        XlsxError::RelationshipNotFound => ImportError::UnrecognizedContainer {
            file_name: err.to_string(),
        },
        other => ImportError::WorkbookParseError(other.to_string()),
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
