// ==========================================
// 交易报表导入引擎 - 行规范化器
// ==========================================
// 职责: 区段窗口内的候选行 → RawTradeRow
// 过滤规则（任一命中即跳过）:
//   1. 空行
//   2. 首个单元格为后续区段标签
//   3. 有效宽度小于最小列数
//   4. HTML 路径: 列数没有对应布局,或 Type 单元格不是交易方向（balance / deposit 等台账行）
// ==========================================

use crate::config::ImportConfig;
use crate::domain::trade::{CellValue, GridRow, HeaderMap, RawGrid, RawTradeRow};
use crate::domain::types::ReportFormat;
use crate::importer::column_disambiguator::{fields, ColumnLayout};
use crate::importer::data_cleaner::normalize_type;
use crate::importer::section_locator::SectionWindow;
use crate::importer::trade_importer_trait::{NormalizedRows, RowNormalizer};
use std::borrow::Cow;
use tracing::debug;

pub struct TradeRowNormalizer {
    config: ImportConfig,
}

impl TradeRowNormalizer {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// 通用过滤；返回跳过原因
    fn rejection(&self, row: &GridRow) -> Option<&'static str> {
        if row.is_empty() {
            return Some("empty");
        }
        if self.config.is_boundary_label(&row.first_text()) {
            return Some("section boundary");
        }
        if row.effective_len() < self.config.min_trade_columns {
            return Some("too few columns");
        }
        None
    }

    /// HTML 路径: 按本行列数推导表头,并要求 Type 为交易方向
    fn markup_header(row: &GridRow) -> Result<HeaderMap, &'static str> {
        let layout = ColumnLayout::for_width(row.cells.len()).ok_or("unknown column layout")?;

        let type_cell = layout
            .position_of(fields::TYPE)
            .and_then(|position| row.cell(position))
            .map(|cell| cell.as_text())
            .unwrap_or_default();
        if normalize_type(&type_cell).is_none() {
            return Err("not a trade direction");
        }

        Ok(layout.header())
    }

    /// 位置单元格 → 规范列名；缺失位置补空值,保证每行键集合一致
    fn reshape(row_number: usize, row: &GridRow, header: &HeaderMap) -> RawTradeRow {
        let mut trade = RawTradeRow::new(row_number);
        for (position, name) in header.names().iter().enumerate() {
            let value = row.cell(position).cloned().unwrap_or_else(CellValue::empty);
            trade.insert(name.clone(), value);
        }
        if row.cells.len() > header.len() {
            debug!(
                row = row_number,
                dropped = row.cells.len() - header.len(),
                "表头范围外的单元格已丢弃"
            );
        }
        trade
    }
}

impl Default for TradeRowNormalizer {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

impl RowNormalizer for TradeRowNormalizer {
    fn normalize(
        &self,
        grid: &RawGrid,
        window: &SectionWindow,
        header: &HeaderMap,
    ) -> NormalizedRows {
        let mut output = NormalizedRows::default();

        for row_number in window.data_rows() {
            let row = match grid.row(row_number) {
                Some(row) => row,
                None => break,
            };

            if let Some(reason) = self.rejection(row) {
                debug!(row = row_number, reason = reason, "跳过候选行");
                output.skipped += 1;
                continue;
            }

            let row_header: Cow<'_, HeaderMap> = if grid.format() == ReportFormat::MarkupReport {
                match Self::markup_header(row) {
                    Ok(row_header) => Cow::Owned(row_header),
                    Err(reason) => {
                        debug!(
                            row = row_number,
                            reason = reason,
                            cells = row.cells.len(),
                            "跳过候选行"
                        );
                        output.skipped += 1;
                        continue;
                    }
                }
            } else {
                Cow::Borrowed(header)
            };

            output
                .rows
                .push(Self::reshape(row_number, row, &row_header));
        }

        debug!(
            accepted = output.rows.len(),
            skipped = output.skipped,
            "行规范化完成"
        );
        output
    }
}
