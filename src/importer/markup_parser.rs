// ==========================================
// 交易报表导入引擎 - HTML 报表提取器
// ==========================================
// 职责: 已解码的 HTML 文本 → RawGrid
// 解析: scraper 构建 DOM → 按文档顺序遍历 <tr> → 直接子元素 <td>/<th> 文本
// 横幅行: 唯一非空单元格为 <th> 或跨列（colspan ≥ 2）的行,标记为区段横幅
// ==========================================

use crate::domain::trade::{CellValue, GridRow, RawGrid};
use crate::domain::types::ReportFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::trade_importer_trait::{SourceDocument, TabularExtractor};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

// ==========================================
// MarkupReportExtractor 实现
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupReportExtractor;

impl MarkupReportExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TabularExtractor for MarkupReportExtractor {
    fn format(&self) -> ReportFormat {
        ReportFormat::MarkupReport
    }

    fn extract(&self, source: SourceDocument<'_>) -> ImportResult<RawGrid> {
        let text = match source {
            SourceDocument::Text(text) => text,
            SourceDocument::Binary(_) => {
                return Err(ImportError::InternalError(
                    "HTML 报表提取器需要已解码的文本".to_string(),
                ))
            }
        };

        let tr_selector = Selector::parse("tr")
            .map_err(|e| ImportError::InternalError(format!("行选择器无效: {:?}", e)))?;
        let document = Html::parse_document(text);

        let rows = document
            .select(&tr_selector)
            .map(row_cells)
            .filter(|cells| !cells.is_empty())
            .map(into_grid_row)
            .collect();
        let grid = RawGrid::from_rows(ReportFormat::MarkupReport, rows);
        if grid.is_empty() {
            return Err(ImportError::EmptyExtraction {
                format: ReportFormat::MarkupReport,
            });
        }

        debug!(
            rows = grid.len(),
            banners = grid.rows().iter().filter(|r| r.banner).count(),
            "HTML 报表提取完成"
        );
        Ok(grid)
    }
}

// ==========================================
// 行/单元格读取
// ==========================================

struct MarkupCell {
    text: String,
    header: bool,
    colspan: usize,
}

/// 仅取 <tr> 的直接子单元格,嵌套表格的文本并入所在单元格
fn row_cells(tr: ElementRef<'_>) -> Vec<MarkupCell> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter_map(|cell| {
            let element = cell.value();
            let header = match element.name() {
                "th" => true,
                "td" => false,
                _ => return None,
            };
            let colspan = element
                .attr("colspan")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1);
            Some(MarkupCell {
                text: cell_text(cell),
                header,
                colspan,
            })
        })
        .collect()
}

fn into_grid_row(cells: Vec<MarkupCell>) -> GridRow {
    let non_empty: Vec<&MarkupCell> = cells.iter().filter(|c| !c.text.is_empty()).collect();
    let banner = non_empty.len() == 1
        && (cells.len() == 1 || non_empty[0].header || non_empty[0].colspan >= 2);

    let values = cells.into_iter().map(|c| CellValue::Text(c.text)).collect();
    if banner {
        GridRow::banner(values)
    } else {
        GridRow::new(values)
    }
}

/// 单元格文本: 实体已由解析器解码,这里合并文本节点并压缩空白（含 &nbsp;）
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> RawGrid {
        MarkupReportExtractor::new()
            .extract(SourceDocument::Text(html))
            .unwrap()
    }

    #[test]
    fn test_cells_and_inner_tags() {
        let grid = extract(
            r##"<table><tr bgcolor="#F7F7F7"><td>2025.12.05 17:35:00</td><TD><b>1001</b></TD><td>EUR&amp;USD&nbsp;</td></tr></table>"##,
        );
        assert_eq!(grid.len(), 1);
        assert_eq!(
            grid.rows()[0].cells,
            vec![
                CellValue::text("2025.12.05 17:35:00"),
                CellValue::text("1001"),
                CellValue::text("EUR&USD"),
            ]
        );
        assert!(!grid.rows()[0].banner);
    }

    #[test]
    fn test_banner_rows() {
        let grid = extract(
            r#"<table>
            <tr align="center"><th colspan="13"><div><b>Positions</b></div></th></tr>
            <tr><td colspan="13">Orders</td></tr>
            <tr><td>Time</td><td></td></tr>
            <tr><td colspan="13" style="height: 10px"></td></tr>
            </table>"#,
        );
        assert_eq!(grid.len(), 4);
        assert!(grid.rows()[0].banner);
        assert_eq!(grid.rows()[0].first_text(), "Positions");
        assert!(grid.rows()[1].banner);
        // 只有一个非空 <td> 且未跨列,不算横幅
        assert!(!grid.rows()[2].banner);
        assert!(!grid.rows()[3].banner);
        assert!(grid.rows()[3].is_empty());
    }

    #[test]
    fn test_tag_boundaries() {
        // <track> / <thead> 不应被当作行或单元格
        let grid =
            extract("<table><thead><tr><th>A</th><td>B</td></tr></thead><track src=x></table>");
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.rows()[0].cells.len(), 2);
    }

    #[test]
    fn test_unclosed_rows() {
        let grid = extract("<table><tr><td>a<td>b<tr><td>c</table>");
        assert_eq!(grid.len(), 2);
        assert_eq!(
            grid.rows()[0].cells,
            vec![CellValue::text("a"), CellValue::text("b")]
        );
        assert_eq!(grid.rows()[1].first_text(), "c");
    }

    #[test]
    fn test_no_rows_is_error() {
        let result = MarkupReportExtractor::new()
            .extract(SourceDocument::Text("<html><body>nothing</body></html>"));
        assert!(matches!(
            result,
            Err(ImportError::EmptyExtraction {
                format: ReportFormat::MarkupReport
            })
        ));
    }

    #[test]
    fn test_literal_angle_bracket_in_text() {
        let grid = extract("<table><tr><td>Profit < 0</td><td>a &lt; b</td></tr></table>");
        assert_eq!(
            grid.rows()[0].cells,
            vec![CellValue::text("Profit < 0"), CellValue::text("a < b")]
        );
    }

    #[test]
    fn test_colspan_attribute() {
        let grid = extract(
            "<table><tr><td colspan=2>Orders</td></tr><tr><td colspan=\"x\">Orders</td><td></td></tr></table>",
        );
        assert!(grid.rows()[0].banner);
        // colspan 无法解析时按 1 处理
        assert!(!grid.rows()[1].banner);
    }
}
