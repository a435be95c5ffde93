// ==========================================
// 交易报表导入引擎 - 领域类型定义
// ==========================================
// 职责: 报表格式 / 交易方向 / 券商模板 等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 报表格式 (Report Format)
// ==========================================
// 由 FormatSniffer 判定,决定使用哪种表格提取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportFormat {
    SpreadsheetWorkbook, // xlsx 工作簿（ZIP 容器）
    DelimitedText,       // 分隔符文本（csv/txt）
    MarkupReport,        // HTML 导出报表
}

impl ReportFormat {
    /// 是否为文本类格式（需要先经过 EncodingDecoder）
    pub fn is_text(&self) -> bool {
        !matches!(self, ReportFormat::SpreadsheetWorkbook)
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::SpreadsheetWorkbook => write!(f, "SPREADSHEET_WORKBOOK"),
            ReportFormat::DelimitedText => write!(f, "DELIMITED_TEXT"),
            ReportFormat::MarkupReport => write!(f, "MARKUP_REPORT"),
        }
    }
}

// ==========================================
// 交易方向 (Trade Direction)
// ==========================================
// 由 TypeNormalizer 从券商词汇归一化得到
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeDirection {
    Long,
    Short,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "Long"),
            TradeDirection::Short => write!(f, "Short"),
        }
    }
}

// ==========================================
// 券商模板 (Broker Profile)
// ==========================================
// Standard: 带 "Positions" 区段的通用券商报表
// NinjaTrader: 无前导区段的分隔符报表,按表头直接取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokerProfile {
    #[default]
    Standard,
    NinjaTrader,
}

impl BrokerProfile {
    /// 从命令行/前端传入的字符串解析
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" | "mt5" | "metatrader" => Some(BrokerProfile::Standard),
            "ninjatrader" | "ninja" | "nt8" => Some(BrokerProfile::NinjaTrader),
            _ => None,
        }
    }
}

impl fmt::Display for BrokerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerProfile::Standard => write!(f, "standard"),
            BrokerProfile::NinjaTrader => write!(f, "ninjatrader"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_is_text() {
        assert!(!ReportFormat::SpreadsheetWorkbook.is_text());
        assert!(ReportFormat::DelimitedText.is_text());
        assert!(ReportFormat::MarkupReport.is_text());
    }

    #[test]
    fn test_broker_profile_parse() {
        assert_eq!(BrokerProfile::parse("NinjaTrader"), Some(BrokerProfile::NinjaTrader));
        assert_eq!(BrokerProfile::parse(" standard "), Some(BrokerProfile::Standard));
        assert_eq!(BrokerProfile::parse("unknown"), None);
        assert_eq!(BrokerProfile::default(), BrokerProfile::Standard);
    }

    #[test]
    fn test_report_format_serde() {
        let json = serde_json::to_string(&ReportFormat::MarkupReport).unwrap();
        assert_eq!(json, "\"MARKUP_REPORT\"");
    }
}
