// ==========================================
// 交易报表导入引擎 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 解码 → 嗅探 → 表格提取 → 区段定位 → 列名消歧 → 行规范化
//       汇总值提取与区段定位相互独立
// ==========================================

use crate::domain::trade::{
    CellValue, DecodedText, HeaderMap, RawByteInput, RawGrid, RawTradeRow, TradeImportResult,
};
use crate::domain::types::{BrokerProfile, ReportFormat, TradeDirection};
use crate::importer::error::ImportResult;
use crate::importer::section_locator::SectionWindow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::Path;

// ==========================================
// TradeReportImporter Trait
// ==========================================
// 用途: 交易报表导入主接口
// 实现者: TradeReportImporterImpl
#[async_trait]
pub trait TradeReportImporter: Send + Sync {
    /// 读取文件并导入
    ///
    /// # 参数
    /// - file_path: 报表文件路径（xlsx / csv / html）
    /// - profile: 券商模板
    ///
    /// # 返回
    /// - Ok(TradeImportResult): 原始交易行 + 可选汇总值
    /// - Err: 容器/结构级错误（整批中止,无部分结果）
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        profile: BrokerProfile,
    ) -> ImportResult<TradeImportResult>;

    /// 从内存字节导入（文件名与 content-type 仅作参考）
    async fn import_bytes(
        &self,
        input: RawByteInput,
        profile: BrokerProfile,
    ) -> ImportResult<TradeImportResult>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 返回顺序与输入顺序一致
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
        profile: BrokerProfile,
    ) -> Vec<ImportResult<TradeImportResult>>;
}

// ==========================================
// SourceDocument - 提取器输入
// ==========================================
// 工作簿按字节读取,文本类格式先解码一次后共享给提取与汇总
#[derive(Debug, Clone, Copy)]
pub enum SourceDocument<'a> {
    Binary(&'a [u8]),
    Text(&'a str),
}

// ==========================================
// TextDecoder Trait
// ==========================================
// 用途: 字节 → 文本（BOM 检测 + 编码回退）
// 实现者: EncodingDecoder
pub trait TextDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> ImportResult<DecodedText>;
}

// ==========================================
// FormatSniffer Trait
// ==========================================
// 用途: 判定报表格式
// 实现者: ContentSniffer
pub trait FormatSniffer: Send + Sync {
    /// # 返回
    /// - Ok(ReportFormat): 选定的提取策略
    /// - Err(UnrecognizedContainer): 三种格式均不匹配
    fn sniff(&self, input: &RawByteInput) -> ImportResult<ReportFormat>;
}

// ==========================================
// TabularExtractor Trait
// ==========================================
// 用途: 生成原始网格（行 × 位置列）
// 实现者: DelimitedTextExtractor, WorkbookExtractor, MarkupReportExtractor
pub trait TabularExtractor: Send + Sync {
    /// 本策略处理的格式
    fn format(&self) -> ReportFormat;

    /// # 返回
    /// - Ok(RawGrid): 至少一行
    /// - Err(EmptyExtraction): 未提取到任何行
    fn extract(&self, source: SourceDocument<'_>) -> ImportResult<RawGrid>;
}

// ==========================================
// SectionLocator Trait
// ==========================================
// 用途: 定位 "Positions" 区段及其表头/数据行窗口
// 实现者: PositionsSectionLocator
pub trait SectionLocator: Send + Sync {
    fn locate(&self, grid: &RawGrid) -> ImportResult<SectionWindow>;
}

// ==========================================
// ColumnDisambiguator Trait
// ==========================================
// 用途: 表头文本 → 规范列名（处理重复列名）
// 实现者: PositionalDisambiguator
pub trait ColumnDisambiguator: Send + Sync {
    /// 按位置消歧表头行（表格/分隔符路径）
    fn disambiguate(&self, header: &[CellValue]) -> HeaderMap;

    /// 按实际列数推导规范列名（HTML 路径,支持 13/14/15 列布局）
    ///
    /// # 返回
    /// - None: 列数没有对应布局
    fn header_for_width(&self, column_count: usize) -> Option<HeaderMap>;
}

// ==========================================
// RowNormalizer Trait
// ==========================================
// 用途: 过滤非交易行 + 位置单元格 → RawTradeRow
// 实现者: TradeRowNormalizer
pub trait RowNormalizer: Send + Sync {
    fn normalize(
        &self,
        grid: &RawGrid,
        window: &SectionWindow,
        header: &HeaderMap,
    ) -> NormalizedRows;
}

/// 行规范化输出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRows {
    pub rows: Vec<RawTradeRow>,
    pub skipped: usize,
}

// ==========================================
// SummaryExtractor Trait
// ==========================================
// 用途: 提取 "Total Net Profit" 汇总值（缺失不算错误）
// 实现者: NetProfitExtractor
pub trait SummaryExtractor: Send + Sync {
    fn extract_total(&self, grid: &RawGrid, markup: Option<&str>) -> Option<f64>;
}

// ==========================================
// BrokerAdapter Trait
// ==========================================
// 用途: 无 "Positions" 区段的券商专用格式
// 实现者: NinjaTraderAdapter
pub trait BrokerAdapter: Send + Sync {
    fn profile(&self) -> BrokerProfile;

    fn parse(&self, input: &RawByteInput) -> ImportResult<TradeImportResult>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 字段级解析（由调用方按券商字段自行调用,不嵌入管道）
// 实现者: FieldCleaner
// 红线: 无法解析时返回哨兵值,绝不中止整批导入
pub trait DataCleaner: Send + Sync {
    /// 解析日期时间（表格序列号或多种文本布局）
    ///
    /// # 返回
    /// - None: 所有布局均无法解析
    fn parse_date(&self, value: &CellValue) -> Option<NaiveDateTime>;

    /// 解析金额（千分位/小数点消歧,括号表示负数）
    ///
    /// # 返回
    /// - 0.0: 空值或无法解析
    fn parse_money(&self, value: &CellValue) -> f64;

    /// 交易方向归一化（buy/sell/long/short 及本地化词汇）
    fn normalize_type(&self, value: &str) -> Option<TradeDirection>;

    /// 去除券商后缀与合约月份代码
    fn clean_symbol(&self, value: &str) -> String;
}
