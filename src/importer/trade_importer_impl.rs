// ==========================================
// 交易报表导入引擎 - 导入器实现
// ==========================================
// 职责: 串联导入管道,从字节到 RawTradeRow 序列
// 流程: 读取 → 嗅探 → 解码 → 表格提取 → 区段定位 → 列名消歧 → 行规范化 → 汇总值
// 并发: 仅文件读取为异步挂起点；其余步骤为同步纯计算,各次导入互不共享状态
// ==========================================

use crate::config::ImportConfig;
use crate::domain::trade::{DecodedText, HeaderMap, RawByteInput, RawGrid, TradeImportResult};
use crate::domain::types::{BrokerProfile, ReportFormat};
use crate::importer::column_disambiguator::PositionalDisambiguator;
use crate::importer::data_cleaner::FieldCleaner;
use crate::importer::encoding_decoder::EncodingDecoder;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{DelimitedTextExtractor, WorkbookExtractor};
use crate::importer::format_sniffer::ContentSniffer;
use crate::importer::markup_parser::MarkupReportExtractor;
use crate::importer::ninjatrader::NinjaTraderAdapter;
use crate::importer::row_normalizer::TradeRowNormalizer;
use crate::importer::section_locator::{PositionsSectionLocator, SectionWindow};
use crate::importer::summary_extractor::NetProfitExtractor;
use crate::importer::trade_importer_trait::{
    BrokerAdapter, ColumnDisambiguator, DataCleaner, FormatSniffer, RowNormalizer,
    SectionLocator, SourceDocument, SummaryExtractor, TabularExtractor, TextDecoder,
    TradeReportImporter,
};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// TradeReportImporterImpl - 交易报表导入器实现
// ==========================================
pub struct TradeReportImporterImpl {
    // 解码与格式判定
    decoder: Box<dyn TextDecoder>,
    sniffer: Box<dyn FormatSniffer>,

    // 表格提取策略（按 ReportFormat 选择）
    extractors: Vec<Box<dyn TabularExtractor>>,

    // 区段与行处理
    section_locator: Box<dyn SectionLocator>,
    disambiguator: Box<dyn ColumnDisambiguator>,
    row_normalizer: Box<dyn RowNormalizer>,
    summary_extractor: Box<dyn SummaryExtractor>,

    // 券商专用格式
    broker_adapters: Vec<Box<dyn BrokerAdapter>>,

    // 字段解析器（供调用方使用,不参与管道）
    field_cleaner: Box<dyn DataCleaner>,
}

impl TradeReportImporterImpl {
    /// 创建导入器实例
    ///
    /// # 参数
    /// - decoder: 文本解码器
    /// - sniffer: 格式嗅探器
    /// - extractors: 表格提取策略（每种 ReportFormat 一个）
    /// - section_locator: 区段定位器
    /// - disambiguator: 列名消歧器
    /// - row_normalizer: 行规范化器
    /// - summary_extractor: 汇总值提取器
    /// - broker_adapters: 券商专用适配器
    /// - field_cleaner: 字段解析器
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        decoder: Box<dyn TextDecoder>,
        sniffer: Box<dyn FormatSniffer>,
        extractors: Vec<Box<dyn TabularExtractor>>,
        section_locator: Box<dyn SectionLocator>,
        disambiguator: Box<dyn ColumnDisambiguator>,
        row_normalizer: Box<dyn RowNormalizer>,
        summary_extractor: Box<dyn SummaryExtractor>,
        broker_adapters: Vec<Box<dyn BrokerAdapter>>,
        field_cleaner: Box<dyn DataCleaner>,
    ) -> Self {
        Self {
            decoder,
            sniffer,
            extractors,
            section_locator,
            disambiguator,
            row_normalizer,
            summary_extractor,
            broker_adapters,
            field_cleaner,
        }
    }

    /// 按配置装配默认组件
    pub fn with_config(config: ImportConfig) -> Self {
        Self::new(
            Box::new(EncodingDecoder::new()),
            Box::new(ContentSniffer::new(&config)),
            vec![
                Box::new(WorkbookExtractor::new()),
                Box::new(DelimitedTextExtractor::new(&config)),
                Box::new(MarkupReportExtractor::new()),
            ],
            Box::new(PositionsSectionLocator::new(config.clone())),
            Box::new(PositionalDisambiguator::new()),
            Box::new(TradeRowNormalizer::new(config.clone())),
            Box::new(NetProfitExtractor::new(config.clone())),
            vec![Box::new(NinjaTraderAdapter::new(&config))],
            Box::new(FieldCleaner::new(&config)),
        )
    }

    /// 与导入使用同一配置的字段解析器
    pub fn field_cleaner(&self) -> &dyn DataCleaner {
        self.field_cleaner.as_ref()
    }

    fn extractor_for(&self, format: ReportFormat) -> ImportResult<&dyn TabularExtractor> {
        self.extractors
            .iter()
            .find(|e| e.format() == format)
            .map(|e| e.as_ref())
            .ok_or_else(|| ImportError::InternalError(format!("未注册 {} 格式的提取器", format)))
    }

    fn adapter_for(&self, profile: BrokerProfile) -> ImportResult<&dyn BrokerAdapter> {
        self.broker_adapters
            .iter()
            .find(|a| a.profile() == profile)
            .map(|a| a.as_ref())
            .ok_or_else(|| ImportError::InternalError(format!("未注册 {} 券商适配器", profile)))
    }

    /// 同步导入管道
    fn run_pipeline(
        &self,
        input: &RawByteInput,
        profile: BrokerProfile,
    ) -> ImportResult<TradeImportResult> {
        if profile != BrokerProfile::Standard {
            debug!(profile = %profile, "使用券商专用适配器");
            return self.adapter_for(profile)?.parse(input);
        }

        // === 步骤 1: 格式嗅探 ===
        let format = self.sniffer.sniff(input)?;
        info!(format = %format, bytes = input.len(), "格式判定完成");

        // === 步骤 2: 文本解码（仅文本类格式）===
        let decoded: Option<DecodedText> = if format.is_text() {
            Some(self.decoder.decode(input.bytes())?)
        } else {
            None
        };
        let source = match &decoded {
            Some(text) => SourceDocument::Text(text.as_str()),
            None => SourceDocument::Binary(input.bytes()),
        };

        // === 步骤 3: 表格提取 ===
        // 提取器不持有文件名,“不是工作簿”的错误在此补上
        let grid = self
            .extractor_for(format)?
            .extract(source)
            .map_err(|e| match e {
                ImportError::UnrecognizedContainer { .. } => ImportError::UnrecognizedContainer {
                    file_name: input.file_name().to_string(),
                },
                other => other,
            })?;
        info!(rows = grid.len(), "表格提取完成");

        // === 步骤 4: 区段定位 ===
        let window = self.section_locator.locate(&grid)?;

        // === 步骤 5: 列名消歧 ===
        let header = self.resolve_header(&grid, &window);

        // === 步骤 6: 行规范化 ===
        let normalized = self.row_normalizer.normalize(&grid, &window, &header);
        info!(
            trades = normalized.rows.len(),
            skipped = normalized.skipped,
            "交易行提取完成"
        );

        // === 步骤 7: 汇总值 ===
        let markup = match (&decoded, format) {
            (Some(text), ReportFormat::MarkupReport) => Some(text.as_str()),
            _ => None,
        };
        let total_net_profit = self.summary_extractor.extract_total(&grid, markup);

        Ok(TradeImportResult {
            rows: normalized.rows,
            total_net_profit,
            import_id: String::new(),
            format,
            profile,
            header,
            skipped_rows: normalized.skipped,
            encoding: decoded.map(|d| d.encoding().to_string()),
        })
    }

    /// 表头: HTML 报表优先按列数布局推导,其余按位置消歧
    fn resolve_header(&self, grid: &RawGrid, window: &SectionWindow) -> HeaderMap {
        let cells = grid
            .row(window.header_row)
            .map(|row| row.cells.as_slice())
            .unwrap_or_default();

        if grid.format() == ReportFormat::MarkupReport {
            if let Some(header) = self.disambiguator.header_for_width(cells.len()) {
                return header;
            }
        }
        self.disambiguator.disambiguate(cells)
    }
}

impl Default for TradeReportImporterImpl {
    fn default() -> Self {
        Self::with_config(ImportConfig::default())
    }
}

#[async_trait::async_trait]
impl TradeReportImporter for TradeReportImporterImpl {
    /// 从文件导入交易报表
    ///
    /// # 参数
    /// - file_path: 报表文件路径
    /// - profile: 券商模板
    ///
    /// # 返回
    /// - Ok(TradeImportResult): 导入结果
    /// - Err: 导入错误
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        profile: BrokerProfile,
    ) -> ImportResult<TradeImportResult> {
        let path = file_path.as_ref();
        let input = RawByteInput::read_from_path(path).await.map_err(|e| {
            error!(file = %path.display(), error = %e, "文件读取失败");
            ImportError::FileReadError(format!("{}: {}", path.display(), e))
        })?;
        self.import_bytes(input, profile).await
    }

    #[instrument(skip(self, input), fields(import_id, file = %input.file_name()))]
    async fn import_bytes(
        &self,
        input: RawByteInput,
        profile: BrokerProfile,
    ) -> ImportResult<TradeImportResult> {
        let start_time = Instant::now();
        let import_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("import_id", import_id.as_str());

        info!(import_id = %import_id, profile = %profile, "开始导入交易报表");

        match self.run_pipeline(&input, profile) {
            Ok(mut result) => {
                result.import_id = import_id;
                info!(
                    import_id = %result.import_id,
                    trades = result.row_count(),
                    skipped = result.skipped_rows,
                    total_net_profit = ?result.total_net_profit,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "交易报表导入完成"
                );
                Ok(result)
            }
            Err(e) if e.is_user_error() => {
                warn!(import_id = %import_id, kind = e.kind(), error = %e, "交易报表导入失败");
                Err(e)
            }
            Err(e) => {
                error!(import_id = %import_id, kind = e.kind(), error = %e, "交易报表导入失败");
                Err(e)
            }
        }
    }

    /// 批量导入多个文件（并发执行）
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
        profile: BrokerProfile,
    ) -> Vec<ImportResult<TradeImportResult>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        let import_tasks = file_paths
            .into_iter()
            .map(|path| async move { self.import_file(path, profile).await });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}
