// ==========================================
// 交易报表导入引擎 - NinjaTrader 适配器
// ==========================================
// 格式: 无前导区段的分隔符文本,首行即表头
// 流程: 解码 → 嗅探分隔符 → 按表头取值 → 过滤无交易编号的行
// 列名: 原样使用表头文本,不做规范化
// ==========================================

use crate::config::ImportConfig;
use crate::domain::trade::{CellValue, HeaderMap, RawByteInput, RawTradeRow, TradeImportResult};
use crate::domain::types::{BrokerProfile, ReportFormat};
use crate::importer::encoding_decoder::EncodingDecoder;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::trade_importer_trait::{BrokerAdapter, TextDecoder};
use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

/// 候选分隔符（计数相同时按此顺序优先）
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

pub struct NinjaTraderAdapter {
    decoder: EncodingDecoder,
    trade_number_field: String,
}

impl NinjaTraderAdapter {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            decoder: EncodingDecoder::new(),
            trade_number_field: config.trade_number_field.trim().to_string(),
        }
    }
}

impl Default for NinjaTraderAdapter {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

/// 按表头行中各候选分隔符出现次数选择分隔符
pub fn sniff_delimiter(text: &str) -> u8 {
    let header_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut best = (b',', 0usize);
    for delimiter in CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|b| *b == delimiter).count();
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

fn is_trade_number(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.parse::<u64>().is_ok()
}

impl BrokerAdapter for NinjaTraderAdapter {
    fn profile(&self) -> BrokerProfile {
        BrokerProfile::NinjaTrader
    }

    fn parse(&self, input: &RawByteInput) -> ImportResult<TradeImportResult> {
        let decoded = self.decoder.decode(input.bytes())?;
        let delimiter = sniff_delimiter(decoded.as_str());
        debug!(delimiter = %(delimiter as char).escape_default(), "分隔符嗅探完成");

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(delimiter)
            .from_reader(decoded.as_str().as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyExtraction {
                format: ReportFormat::DelimitedText,
            });
        }

        let key_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(&self.trade_number_field))
            .ok_or_else(|| ImportError::MissingRequiredColumn(self.trade_number_field.clone()))?;

        let mut rows = Vec::new();
        let mut skipped_rows = 0;
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = idx + 1; // 第 0 行为表头

            if !record.get(key_idx).map_or(false, is_trade_number) {
                debug!(row = row_number, "缺少交易编号,跳过");
                skipped_rows += 1;
                continue;
            }

            let mut trade = RawTradeRow::new(row_number);
            for (header, value) in headers.iter().zip(record.iter()) {
                if header.is_empty() {
                    continue;
                }
                // 表头重复时保留首列
                trade
                    .fields
                    .entry(header.clone())
                    .or_insert_with(|| CellValue::text(value));
            }
            rows.push(trade);
        }

        info!(
            file = input.file_name(),
            rows = rows.len(),
            skipped = skipped_rows,
            encoding = decoded.encoding(),
            "NinjaTrader 报表解析完成"
        );

        Ok(TradeImportResult {
            rows,
            total_net_profit: None,
            import_id: String::new(), // 由调用方填充
            format: ReportFormat::DelimitedText,
            profile: BrokerProfile::NinjaTrader,
            header: HeaderMap::new(headers),
            skipped_rows,
            encoding: Some(decoded.encoding().to_string()),
        })
    }
}
