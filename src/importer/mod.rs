// ==========================================
// 交易报表导入引擎 - 导入层
// ==========================================
// 职责: 券商导出的交易报表 → RawTradeRow 序列 + 可选汇总值
// 支持: xlsx 工作簿, CSV/TXT 分隔符文本, HTML 报表, NinjaTrader CSV
// ==========================================

// 模块声明
pub mod column_disambiguator;
pub mod data_cleaner;
pub mod encoding_decoder;
pub mod error;
pub mod file_parser;
pub mod format_sniffer;
pub mod markup_parser;
pub mod ninjatrader;
pub mod row_normalizer;
pub mod section_locator;
pub mod summary_extractor;
pub mod trade_importer_impl;
pub mod trade_importer_trait;

// 重导出核心类型
pub use column_disambiguator::{fields, ColumnLayout, PositionalDisambiguator, COLUMN_LAYOUTS};
pub use data_cleaner::{clean_symbol, normalize_type, parse_date, parse_money, FieldCleaner};
pub use encoding_decoder::EncodingDecoder;
pub use error::{ImportError, ImportResult};
pub use file_parser::{DelimitedTextExtractor, WorkbookExtractor};
pub use format_sniffer::ContentSniffer;
pub use markup_parser::MarkupReportExtractor;
pub use ninjatrader::NinjaTraderAdapter;
pub use row_normalizer::TradeRowNormalizer;
pub use section_locator::{PositionsSectionLocator, SectionWindow};
pub use summary_extractor::NetProfitExtractor;
pub use trade_importer_impl::TradeReportImporterImpl;

// 重导出 Trait 接口
pub use trade_importer_trait::{
    BrokerAdapter, ColumnDisambiguator, DataCleaner, FormatSniffer, NormalizedRows,
    RowNormalizer, SectionLocator, SourceDocument, SummaryExtractor, TabularExtractor,
    TextDecoder, TradeReportImporter,
};
