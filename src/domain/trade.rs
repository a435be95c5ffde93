// ==========================================
// 交易报表导入引擎 - 导入数据模型
// ==========================================
// 职责: 单次导入调用内流转的全部数据结构
// 生命周期: 每次导入创建,结果移交调用方后引擎不再持有
// ==========================================

use crate::domain::types::{BrokerProfile, ReportFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

// ==========================================
// RawByteInput - 原始字节输入
// ==========================================
// 文件名与 content-type 仅作参考,格式判定以字节嗅探为准
#[derive(Debug, Clone)]
pub struct RawByteInput {
    bytes: Vec<u8>,
    file_name: String,
    content_type: Option<String>,
}

impl RawByteInput {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        self.content_type = if content_type.trim().is_empty() {
            None
        } else {
            Some(content_type)
        };
        self
    }

    /// 异步读取文件（整个导入流程中唯一的 I/O 挂起点）
    pub async fn read_from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(bytes, file_name))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// 小写扩展名（不含点）
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ==========================================
// DecodedText - 解码后的文本
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    text: String,
    encoding: &'static str,
}

impl DecodedText {
    pub fn new(text: String, encoding: &'static str) -> Self {
        Self { text, encoding }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 实际使用的编码名称（如 "UTF-16LE" / "windows-1252"）
    pub fn encoding(&self) -> &'static str {
        self.encoding
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

// ==========================================
// CellValue - 单元格值（字符串或数值）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Number(_) => false,
            CellValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// 文本形式（数值按最短表示输出）
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

// ==========================================
// GridRow / RawGrid - 原始网格
// ==========================================
// 红线: 行号从 0 开始且稳定,提取过程中不重排
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridRow {
    pub cells: Vec<CellValue>,
    pub banner: bool, // HTML 报表中的区段横幅行（单个合并单元格）
}

impl GridRow {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self {
            cells,
            banner: false,
        }
    }

    pub fn banner(cells: Vec<CellValue>) -> Self {
        Self {
            cells,
            banner: true,
        }
    }

    pub fn cell(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// 首个单元格的文本（去空白）
    pub fn first_text(&self) -> String {
        self.cells.first().map(|c| c.as_text()).unwrap_or_default()
    }

    /// 首个非空单元格的文本
    pub fn first_non_empty_text(&self) -> Option<String> {
        self.cells
            .iter()
            .find(|c| !c.is_empty())
            .map(|c| c.as_text())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// 有效宽度: 最后一个非空单元格的位置 + 1
    pub fn effective_len(&self) -> usize {
        self.cells
            .iter()
            .rposition(|c| !c.is_empty())
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawGrid {
    format: ReportFormat,
    rows: Vec<GridRow>,
}

impl RawGrid {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(format: ReportFormat, rows: Vec<GridRow>) -> Self {
        Self { format, rows }
    }

    pub fn push(&mut self, row: GridRow) {
        self.rows.push(row);
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&GridRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// HeaderMap - 规范列名（按位置对齐）
// ==========================================
// 红线: 每个位置恰好一个名称,且名称互不重复
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderMap {
    names: Vec<String>,
}

impl HeaderMap {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(|s| s.as_str())
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ==========================================
// RawTradeRow - 原始交易行（规范列名 → 单元格值）
// ==========================================
// 创建后不再修改,所有权移交调用方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTradeRow {
    pub row_number: usize, // 在 RawGrid 中的行号（用于定位问题行）
    pub fields: BTreeMap<String, CellValue>,
}

/// 与下游约定的名称
pub type RawTradeData = RawTradeRow;

impl RawTradeRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            fields: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: CellValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.get(name)
    }

    /// 取文本值,空值视为缺失
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty()).map(|v| v.as_text())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ==========================================
// TradeImportResult - 导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeImportResult {
    pub rows: Vec<RawTradeRow>,
    pub total_net_profit: Option<f64>,

    // ===== 参考信息 =====
    pub import_id: String,
    pub format: ReportFormat,
    pub profile: BrokerProfile,
    pub header: HeaderMap,
    pub skipped_rows: usize,
    pub encoding: Option<String>,
}

impl TradeImportResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
