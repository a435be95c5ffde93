// ==========================================
// 交易报表导入引擎 - 导入配置
// ==========================================
// 职责: 区段标签 / 分隔符 / 金额分隔符约定 等可调参数
// 来源: JSON 文件（可选）+ 内置默认值
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// 配置键（与 JSON 字段名一致）
// ==========================================
pub mod config_keys {
    // 区段识别
    pub const POSITIONS_LABELS: &str = "positions_labels";
    pub const BOUNDARY_LABELS: &str = "boundary_labels";
    pub const SUMMARY_LABELS: &str = "summary_labels";

    // 行过滤
    pub const MIN_TRADE_COLUMNS: &str = "min_trade_columns";

    // 文本解析
    pub const DELIMITER: &str = "delimiter";
    pub const SNIFF_PREFIX_BYTES: &str = "sniff_prefix_bytes";
    pub const LONE_COMMA_IS_DECIMAL: &str = "lone_comma_is_decimal";

    // 券商适配
    pub const TRADE_NUMBER_FIELD: &str = "trade_number_field";
}

// ==========================================
// 默认值
// ==========================================
pub const DEFAULT_POSITIONS_LABELS: [&str; 2] = ["Positions", "Позиции"];
pub const DEFAULT_BOUNDARY_LABELS: [&str; 8] = [
    "Orders",
    "Working Orders",
    "Deals",
    "Results",
    "Ордера",
    "Рабочие ордера",
    "Сделки",
    "Итоги",
];
pub const DEFAULT_SUMMARY_LABELS: [&str; 3] =
    ["Total Net Profit", "Общая чистая прибыль", "Чистая прибыль"];
pub const DEFAULT_MIN_TRADE_COLUMNS: usize = 10;
pub const DEFAULT_SNIFF_PREFIX_BYTES: usize = 512;
pub const DEFAULT_TRADE_NUMBER_FIELD: &str = "Trade number";

// ==========================================
// ImportConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub positions_labels: Vec<String>,
    pub boundary_labels: Vec<String>,
    pub summary_labels: Vec<String>,
    pub min_trade_columns: usize,
    pub delimiter: char,
    pub sniff_prefix_bytes: usize,
    pub lone_comma_is_decimal: bool,
    pub trade_number_field: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            positions_labels: to_strings(&DEFAULT_POSITIONS_LABELS),
            boundary_labels: to_strings(&DEFAULT_BOUNDARY_LABELS),
            summary_labels: to_strings(&DEFAULT_SUMMARY_LABELS),
            min_trade_columns: DEFAULT_MIN_TRADE_COLUMNS,
            delimiter: ',',
            sniff_prefix_bytes: DEFAULT_SNIFF_PREFIX_BYTES,
            lone_comma_is_decimal: true,
            trade_number_field: DEFAULT_TRADE_NUMBER_FIELD.to_string(),
        }
    }
}

impl ImportConfig {
    /// 从 JSON 字符串解析（缺省字段取默认值）
    pub fn from_json_str(raw: &str) -> ImportResult<Self> {
        let config: ImportConfig =
            serde_json::from_str(raw).map_err(|e| ImportError::ConfigReadError {
                key: "<root>".to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置文件；未指定路径时返回默认配置
    pub fn load(path: Option<&Path>) -> ImportResult<Self> {
        match path {
            None => {
                debug!("未指定配置文件,使用默认导入配置");
                Ok(Self::default())
            }
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    ImportError::ConfigReadError {
                        key: path.display().to_string(),
                        message: e.to_string(),
                    }
                })?;
                let config = Self::from_json_str(&raw)?;
                info!(path = %path.display(), "导入配置已加载");
                Ok(config)
            }
        }
    }

    /// 校验配置值
    pub fn validate(&self) -> ImportResult<()> {
        if self.positions_labels.iter().all(|l| l.trim().is_empty()) {
            return Err(ImportError::ConfigValueError {
                key: config_keys::POSITIONS_LABELS.to_string(),
                value: format!("{:?}", self.positions_labels),
                message: "至少需要一个非空的区段标签".to_string(),
            });
        }
        if self.min_trade_columns == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::MIN_TRADE_COLUMNS.to_string(),
                value: self.min_trade_columns.to_string(),
                message: "最小列数必须大于 0".to_string(),
            });
        }
        if !self.delimiter.is_ascii() || self.delimiter.is_ascii_alphanumeric() {
            return Err(ImportError::ConfigValueError {
                key: config_keys::DELIMITER.to_string(),
                value: self.delimiter.to_string(),
                message: "分隔符必须是 ASCII 标点或空白字符".to_string(),
            });
        }
        if self.sniff_prefix_bytes < 4 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::SNIFF_PREFIX_BYTES.to_string(),
                value: self.sniff_prefix_bytes.to_string(),
                message: "嗅探前缀长度不能小于 4 字节".to_string(),
            });
        }
        if self.trade_number_field.trim().is_empty() {
            return Err(ImportError::ConfigValueError {
                key: config_keys::TRADE_NUMBER_FIELD.to_string(),
                value: self.trade_number_field.clone(),
                message: "交易编号字段名不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 分隔符字节（validate 保证为 ASCII）
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }

    pub fn is_positions_label(&self, text: &str) -> bool {
        matches_label(&self.positions_labels, text)
    }

    pub fn is_boundary_label(&self, text: &str) -> bool {
        matches_label(&self.boundary_labels, text)
    }

    pub fn is_summary_label(&self, text: &str) -> bool {
        matches_label(&self.summary_labels, text)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// 标签比较: 去空白、去尾部冒号、大小写不敏感
fn matches_label(labels: &[String], text: &str) -> bool {
    let text = text.trim().trim_end_matches(':').trim();
    if text.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    labels.iter().any(|l| l.trim().to_lowercase() == text)
}
