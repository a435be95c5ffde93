// ==========================================
// 交易报表导入引擎 - 区段定位器
// ==========================================
// 职责: 在 RawGrid 中定位 "Positions" 区段
// 规则:
//   - 标签行: 首个单元格等于区段标签（支持多语言变体）
//   - 表头行: 标签行的下一行
//   - 数据行: 表头行之后,直到网格结束 / 后续区段标签 / HTML 横幅行
// ==========================================

use crate::config::ImportConfig;
use crate::domain::trade::{GridRow, RawGrid};
use crate::domain::types::ReportFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::trade_importer_trait::SectionLocator;
use std::ops::Range;
use tracing::debug;

// ==========================================
// SectionWindow - 区段窗口（均为 RawGrid 行号）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionWindow {
    pub label_row: usize,
    pub header_row: usize,
    pub data_start: usize,
    pub data_end: usize, // 不含
}

impl SectionWindow {
    pub fn data_rows(&self) -> Range<usize> {
        self.data_start..self.data_end
    }

    pub fn data_len(&self) -> usize {
        self.data_end.saturating_sub(self.data_start)
    }
}

// ==========================================
// PositionsSectionLocator 实现
// ==========================================
pub struct PositionsSectionLocator {
    config: ImportConfig,
}

impl PositionsSectionLocator {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// 错误信息中展示的期望标签（如 "Positions / Позиции"）
    fn expected_label(&self) -> String {
        self.config
            .positions_labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// 行的标签文本: 横幅行取唯一非空单元格,其余取首个单元格
    fn label_text(row: &GridRow) -> String {
        if row.banner {
            row.first_non_empty_text().unwrap_or_default()
        } else {
            row.first_text()
        }
    }

    fn is_section_end(&self, row: &GridRow, format: ReportFormat) -> bool {
        let label = Self::label_text(row);
        if self.config.is_boundary_label(&label) {
            return true;
        }
        // HTML 报表: 任何非 Positions 的横幅行都视为区段关闭
        format == ReportFormat::MarkupReport
            && row.banner
            && !self.config.is_positions_label(&label)
    }
}

impl Default for PositionsSectionLocator {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

impl SectionLocator for PositionsSectionLocator {
    fn locate(&self, grid: &RawGrid) -> ImportResult<SectionWindow> {
        let label_row = grid
            .rows()
            .iter()
            .position(|row| self.config.is_positions_label(&Self::label_text(row)))
            .ok_or_else(|| ImportError::MissingSection {
                expected: self.expected_label(),
            })?;

        let header_row = label_row + 1;
        if header_row >= grid.len() {
            return Err(ImportError::MissingHeaderRow { label_row });
        }

        let data_start = header_row + 1;
        let data_end = grid.rows()[data_start.min(grid.len())..]
            .iter()
            .position(|row| self.is_section_end(row, grid.format()))
            .map(|offset| data_start + offset)
            .unwrap_or(grid.len());

        let window = SectionWindow {
            label_row,
            header_row,
            data_start,
            data_end,
        };
        debug!(?window, candidates = window.data_len(), "Positions 区段定位完成");
        Ok(window)
    }
}
