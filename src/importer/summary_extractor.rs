// ==========================================
// 交易报表导入引擎 - 汇总值提取器
// ==========================================
// 职责: 提取 "Total Net Profit" 汇总值（缺失不算错误）
// 策略:
//   1. HTML 原文: 标签单元格后紧跟的 <td><b>数值</b></td>
//   2. 网格扫描: 标签单元格所在行中距离最近的数值单元格（距离相同优先右侧）
// ==========================================

use crate::config::ImportConfig;
use crate::domain::trade::{CellValue, GridRow, RawGrid};
use crate::importer::data_cleaner::{parse_money, parse_money_text};
use crate::importer::trade_importer_trait::SummaryExtractor;
use regex::Regex;
use tracing::debug;

pub struct NetProfitExtractor {
    config: ImportConfig,
    markup_pattern: Option<Regex>,
}

impl NetProfitExtractor {
    pub fn new(config: ImportConfig) -> Self {
        let labels = config
            .summary_labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| regex::escape(l).replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");

        let markup_pattern = if labels.is_empty() {
            None
        } else {
            Regex::new(&format!(
                r"(?is)(?:{})\s*:?\s*</t[dh]>\s*<t[dh][^>]*>\s*(?:<b>)?\s*([^<]+?)\s*(?:</b>\s*)?</t[dh]>",
                labels
            ))
            .ok()
        };

        Self {
            config,
            markup_pattern,
        }
    }

    fn from_markup(&self, markup: &str) -> Option<f64> {
        let captures = self.markup_pattern.as_ref()?.captures(markup)?;
        let raw = captures.get(1)?.as_str();
        let decoded = html_escape::decode_html_entities(raw).replace('\u{a0}', " ");
        looks_numeric_text(&decoded)
            .then(|| parse_money_text(&decoded, self.config.lone_comma_is_decimal))
    }

    fn from_grid(&self, grid: &RawGrid) -> Option<f64> {
        grid.rows().iter().find_map(|row| self.from_row(row))
    }

    fn from_row(&self, row: &GridRow) -> Option<f64> {
        let label_idx = row
            .cells
            .iter()
            .position(|cell| self.config.is_summary_label(&cell.as_text()))?;

        // 距离相同时右侧优先: (距离, 左侧=1/右侧=0)
        row.cells
            .iter()
            .enumerate()
            .filter(|(idx, cell)| *idx != label_idx && looks_numeric(cell))
            .min_by_key(|(idx, _)| (idx.abs_diff(label_idx), usize::from(*idx < label_idx)))
            .map(|(_, cell)| parse_money(cell, self.config.lone_comma_is_decimal))
    }
}

impl Default for NetProfitExtractor {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

fn looks_numeric_text(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn looks_numeric(cell: &CellValue) -> bool {
    match cell {
        CellValue::Number(n) => n.is_finite(),
        CellValue::Text(text) => looks_numeric_text(text),
    }
}

impl SummaryExtractor for NetProfitExtractor {
    fn extract_total(&self, grid: &RawGrid, markup: Option<&str>) -> Option<f64> {
        let total = markup
            .and_then(|text| self.from_markup(text))
            .or_else(|| self.from_grid(grid));
        debug!(total = ?total, "汇总值提取完成");
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ReportFormat;

    fn row(cells: Vec<CellValue>) -> GridRow {
        GridRow::new(cells)
    }

    #[test]
    fn test_markup_pattern() {
        let html = r#"<tr><td colspan="3">Total Net Profit:</td><td colspan="2"><b>1 234.56</b></td>
            <td>Gross Profit:</td><td><b>2 000.00</b></td></tr>"#;
        let grid = RawGrid::new(ReportFormat::MarkupReport);
        let total = NetProfitExtractor::default().extract_total(&grid, Some(html));
        assert_eq!(total, Some(1234.56));
    }

    #[test]
    fn test_markup_negative_localized() {
        let html = "<td>Общая чистая прибыль:</td><td><b>-15.20</b></td>";
        let grid = RawGrid::new(ReportFormat::MarkupReport);
        let total = NetProfitExtractor::default().extract_total(&grid, Some(html));
        assert_eq!(total, Some(-15.2));
    }

    #[test]
    fn test_grid_nearest_value() {
        let grid = RawGrid::from_rows(
            ReportFormat::SpreadsheetWorkbook,
            vec![
                row(vec![CellValue::text("Balance:"), CellValue::Number(10_000.0)]),
                row(vec![
                    CellValue::text("12"),
                    CellValue::empty(),
                    CellValue::text("Total Net Profit:"),
                    CellValue::empty(),
                    CellValue::Number(-250.5),
                ]),
            ],
        );
        let total = NetProfitExtractor::default().extract_total(&grid, None);
        assert_eq!(total, Some(-250.5));
    }

    #[test]
    fn test_grid_tie_prefers_right() {
        let grid = RawGrid::from_rows(
            ReportFormat::DelimitedText,
            vec![row(vec![
                CellValue::text("1,00"),
                CellValue::text("Total Net Profit"),
                CellValue::text("$ 1,500.00"),
            ])],
        );
        assert_eq!(
            NetProfitExtractor::default().extract_total(&grid, None),
            Some(1500.0)
        );
    }

    #[test]
    fn test_absent_total() {
        let grid = RawGrid::from_rows(
            ReportFormat::DelimitedText,
            vec![row(vec![CellValue::text("Total Net Profit"), CellValue::text("n/a")])],
        );
        assert_eq!(NetProfitExtractor::default().extract_total(&grid, None), None);
        assert_eq!(
            NetProfitExtractor::default().extract_total(&grid, Some("<html></html>")),
            None
        );
    }
}
