// ==========================================
// 交易报表导入引擎 - 字段解析器
// ==========================================
// 职责: 日期 / 金额 / 交易方向 / 品种代码 的值级转换
// 特点: 纯函数、无状态；由调用方在行提取之后按券商字段自行调用
// 红线: 无法解析时返回哨兵值（None / 0.0）,不中止整批导入
// ==========================================

use crate::config::ImportConfig;
use crate::domain::trade::CellValue;
use crate::domain::types::TradeDirection;
use crate::importer::trade_importer_trait::DataCleaner;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::OnceCell;
use regex::Regex;

// ==========================================
// DateParser
// ==========================================

/// 显式日期布局（按顺序尝试）
pub const EXPLICIT_DATE_LAYOUTS: [&str; 6] = [
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

/// 通用回退布局（仅在显式布局全部失败后尝试）
const GENERIC_DATETIME_LAYOUTS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

const GENERIC_DATE_LAYOUTS: [&str; 4] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d", "%m/%d/%Y"];

type DateStep = fn(&str) -> Option<NaiveDateTime>;

/// 文本日期回退链
pub const DATE_CHAIN: [(&str, DateStep); 4] = [
    ("explicit", parse_explicit_layouts),
    ("rfc3339", parse_rfc3339),
    ("generic-datetime", parse_generic_datetime),
    ("generic-date", parse_generic_date),
];

fn parse_explicit_layouts(text: &str) -> Option<NaiveDateTime> {
    EXPLICIT_DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
}

fn parse_rfc3339(text: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_local())
}

fn parse_generic_datetime(text: &str) -> Option<NaiveDateTime> {
    GENERIC_DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
}

fn parse_generic_date(text: &str) -> Option<NaiveDateTime> {
    GENERIC_DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// 表格序列号纪元: 1899-12-30
/// 序列号体系把 1900 年误当闰年,纪元前移一天后 1900-03-01 之后的序列号全部对齐
fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

const SECONDS_PER_DAY: f64 = 86_400.0;

/// 表格序列号 → 日期时间（小数部分按秒四舍五入）
pub fn parse_serial_date(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let mut days = serial.floor();
    let mut seconds = ((serial - days) * SECONDS_PER_DAY).round();
    if seconds >= SECONDS_PER_DAY {
        days += 1.0;
        seconds = 0.0;
    }

    let date = serial_epoch()?.checked_add_days(Days::new(days as u64))?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0)?;
    Some(date.and_time(time))
}

/// 文本日期（按 DATE_CHAIN 顺序尝试）
pub fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_CHAIN.iter().find_map(|(_, step)| step(text))
}

/// 单元格日期: 数值或纯数字文本按序列号解析
pub fn parse_date(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Number(serial) => parse_serial_date(*serial),
        CellValue::Text(text) => match text.trim().parse::<f64>() {
            Ok(serial) => parse_serial_date(serial),
            Err(_) => parse_date_text(text),
        },
    }
}

// ==========================================
// MoneyParser
// ==========================================

/// 金额文本解析
///
/// # 规则
/// - 同时出现 ',' 和 '.': 靠后者为小数点
/// - 只出现一个 ',': lone_comma_is_decimal 为 true 时视为小数点
/// - 多个 ',' 或多个 '.': 千分位
/// - 括号包裹或前导 '-': 负数
///
/// # 返回
/// - 0.0: 空值或无法解析
pub fn parse_money_text(raw: &str, lone_comma_is_decimal: bool) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let parenthesized = trimmed.starts_with('(') && trimmed.ends_with(')');
    let minus = trimmed
        .chars()
        .find(|c| c.is_ascii_digit() || *c == '-')
        .map_or(false, |c| c == '-');

    let kept: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let commas = kept.matches(',').count();
    let dots = kept.matches('.').count();
    let normalized = match (kept.rfind(','), kept.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => kept.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => kept.replace(',', ""),
        (Some(_), None) if commas == 1 && lone_comma_is_decimal => kept.replace(',', "."),
        (Some(_), None) => kept.replace(',', ""),
        (None, Some(_)) if dots > 1 => kept.replace('.', ""),
        _ => kept,
    };

    match normalized.parse::<f64>() {
        Ok(amount) if parenthesized || minus => -amount,
        Ok(amount) => amount,
        Err(_) => 0.0,
    }
}

pub fn parse_money(value: &CellValue, lone_comma_is_decimal: bool) -> f64 {
    match value {
        CellValue::Number(amount) if amount.is_finite() => *amount,
        CellValue::Number(_) => 0.0,
        CellValue::Text(text) => parse_money_text(text, lone_comma_is_decimal),
    }
}

// ==========================================
// TypeNormalizer
// ==========================================
const LONG_TOKENS: [&str; 8] = ["buy", "long", "bought", "покупка", "лонг", "купить", "买入", "做多"];
const SHORT_TOKENS: [&str; 8] = ["sell", "short", "sold", "продажа", "шорт", "продать", "卖出", "做空"];

pub fn normalize_type(value: &str) -> Option<TradeDirection> {
    let token = value.trim().to_lowercase();
    if LONG_TOKENS.contains(&token.as_str()) {
        Some(TradeDirection::Long)
    } else if SHORT_TOKENS.contains(&token.as_str()) {
        Some(TradeDirection::Short)
    } else {
        None
    }
}

// ==========================================
// SymbolCleaner
// ==========================================

pub fn clean_symbol(value: &str) -> String {
    // 尾部合约月份代码: " 12-25" 或 " DEC25"
    static CONTRACT_MONTH: OnceCell<Regex> = OnceCell::new();

    let trimmed = value.trim();
    let without_month = CONTRACT_MONTH
        .get_or_init(|| {
            Regex::new(
                r"(?i)\s+(?:\d{2}-\d{2}|(?:JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\d{2})$",
            )
            .unwrap()
        })
        .replace(trimmed, "");
    let root = match without_month.rfind('.') {
        Some(idx) if idx > 0 => &without_month[..idx],
        _ => &without_month[..],
    };
    root.trim().to_string()
}

// ==========================================
// FieldCleaner 实现
// ==========================================
pub struct FieldCleaner {
    lone_comma_is_decimal: bool,
}

impl FieldCleaner {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            lone_comma_is_decimal: config.lone_comma_is_decimal,
        }
    }
}

impl Default for FieldCleaner {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

impl DataCleaner for FieldCleaner {
    fn parse_date(&self, value: &CellValue) -> Option<NaiveDateTime> {
        parse_date(value)
    }

    fn parse_money(&self, value: &CellValue) -> f64 {
        parse_money(value, self.lone_comma_is_decimal)
    }

    fn normalize_type(&self, value: &str) -> Option<TradeDirection> {
        normalize_type(value)
    }

    fn clean_symbol(&self, value: &str) -> String {
        clean_symbol(value)
    }
}
