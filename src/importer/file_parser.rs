// ==========================================
// 交易报表导入引擎 - 表格提取器（分隔符文本 / 工作簿）
// ==========================================
// 职责: 源文档 → RawGrid（行 × 位置列,保持源顺序）
// 支持: CSV/TXT（已解码文本）/ xlsx（内存字节）
// HTML 报表见 markup_parser.rs
// ==========================================

use crate::config::ImportConfig;
use crate::domain::trade::{CellValue, GridRow, RawGrid};
use crate::domain::types::ReportFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::trade_importer_trait::{SourceDocument, TabularExtractor};
use calamine::{Data, Reader, Xlsx};
use csv::{ReaderBuilder, Trim};
use std::io::Cursor;
use tracing::debug;

// ==========================================
// DelimitedTextExtractor 实现
// ==========================================
pub struct DelimitedTextExtractor {
    delimiter: u8,
}

impl DelimitedTextExtractor {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
        }
    }
}

impl Default for DelimitedTextExtractor {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

impl TabularExtractor for DelimitedTextExtractor {
    fn format(&self) -> ReportFormat {
        ReportFormat::DelimitedText
    }

    fn extract(&self, source: SourceDocument<'_>) -> ImportResult<RawGrid> {
        let text = match source {
            SourceDocument::Text(text) => text,
            SourceDocument::Binary(_) => {
                return Err(ImportError::InternalError(
                    "分隔符文本提取器需要已解码的文本".to_string(),
                ))
            }
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头位置由区段定位决定
            .flexible(true) // 报表各区段列数不同
            .trim(Trim::All)
            .delimiter(self.delimiter)
            .from_reader(text.as_bytes());

        let mut grid = RawGrid::new(ReportFormat::DelimitedText);
        for result in reader.records() {
            let record = result?;
            let cells = record.iter().map(CellValue::from).collect();
            grid.push(GridRow::new(cells));
        }

        if grid.is_empty() {
            return Err(ImportError::EmptyExtraction {
                format: ReportFormat::DelimitedText,
            });
        }

        debug!(rows = grid.len(), "分隔符文本提取完成");
        Ok(grid)
    }
}

// ==========================================
// WorkbookExtractor 实现
// ==========================================
// 只读取第一个工作表
pub struct WorkbookExtractor;

impl WorkbookExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WorkbookExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularExtractor for WorkbookExtractor {
    fn format(&self) -> ReportFormat {
        ReportFormat::SpreadsheetWorkbook
    }

    fn extract(&self, source: SourceDocument<'_>) -> ImportResult<RawGrid> {
        let bytes = match source {
            SourceDocument::Binary(bytes) => bytes,
            SourceDocument::Text(_) => {
                return Err(ImportError::InternalError(
                    "工作簿提取器需要原始字节".to_string(),
                ))
            }
        };

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::WorkbookParseError("工作簿中没有工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // Range 从首个非空单元格开始,需补齐前导空行/空列以保持位置语义
        let (start_row, start_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut grid = RawGrid::new(ReportFormat::SpreadsheetWorkbook);
        if !range.is_empty() {
            for _ in 0..start_row {
                grid.push(GridRow::default());
            }
        }

        for row in range.rows() {
            let mut cells = Vec::with_capacity(start_col + row.len());
            cells.resize(start_col, CellValue::empty());
            cells.extend(row.iter().map(data_to_cell));
            grid.push(GridRow::new(cells));
        }

        if grid.is_empty() {
            return Err(ImportError::EmptyExtraction {
                format: ReportFormat::SpreadsheetWorkbook,
            });
        }

        debug!(
            sheet = %sheet_name,
            rows = grid.len(),
            start_row = start_row,
            start_col = start_col,
            "工作簿提取完成"
        );
        Ok(grid)
    }
}

/// calamine 单元格 → CellValue（日期保留为序列号,交给 DateParser）
fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::empty(),
        Data::String(s) => CellValue::Text(s.trim().to_string()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        other => CellValue::Text(other.to_string()),
    }
}
