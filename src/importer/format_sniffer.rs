// ==========================================
// 交易报表导入引擎 - 格式嗅探器
// ==========================================
// 职责: 文件名/content-type 提示 + 字节签名 → ReportFormat
// 规则:
//   1. 声明为分隔符文本 → DelimitedText（无条件）
//   2. 前 4 字节为 ZIP 签名 → SpreadsheetWorkbook
//   3. 解码前缀以 '<' 开头 → MarkupReport（导出工具常把 HTML 命名为 .xlsx）
//   4. 其余 → UnrecognizedContainer
// ==========================================

use crate::config::ImportConfig;
use crate::domain::trade::RawByteInput;
use crate::domain::types::ReportFormat;
use crate::importer::encoding_decoder::EncodingDecoder;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::trade_importer_trait::FormatSniffer;
use tracing::debug;

/// xlsx 等 OOXML 工作簿使用的 ZIP 本地文件头签名
pub const WORKBOOK_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

const DELIMITED_EXTENSIONS: [&str; 3] = ["csv", "txt", "tsv"];
const DELIMITED_MIME_TYPES: [&str; 4] = [
    "text/csv",
    "text/plain",
    "text/tab-separated-values",
    "application/csv",
];

// ==========================================
// ContentSniffer 实现
// ==========================================
pub struct ContentSniffer {
    decoder: EncodingDecoder,
    prefix_bytes: usize,
}

impl ContentSniffer {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            decoder: EncodingDecoder::new(),
            prefix_bytes: config.sniff_prefix_bytes,
        }
    }

    /// 提示是否声明为分隔符文本
    fn declares_delimited(input: &RawByteInput) -> bool {
        let by_extension = input
            .extension()
            .map(|ext| DELIMITED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);

        let by_mime = input
            .content_type()
            .map(|ct| {
                // 忽略 "; charset=..." 参数
                let essence = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
                DELIMITED_MIME_TYPES.contains(&essence.as_str())
            })
            .unwrap_or(false);

        by_extension || by_mime
    }

    fn looks_like_markup(&self, bytes: &[u8]) -> bool {
        let prefix = self.decoder.decode_prefix(bytes, self.prefix_bytes);
        prefix
            .trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
            .starts_with('<')
    }
}

impl Default for ContentSniffer {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

impl FormatSniffer for ContentSniffer {
    fn sniff(&self, input: &RawByteInput) -> ImportResult<ReportFormat> {
        if Self::declares_delimited(input) {
            debug!(file = input.file_name(), "按提示选择分隔符文本");
            return Ok(ReportFormat::DelimitedText);
        }

        if input.bytes().starts_with(&WORKBOOK_SIGNATURE) {
            debug!(file = input.file_name(), "检测到工作簿容器签名");
            return Ok(ReportFormat::SpreadsheetWorkbook);
        }

        if self.looks_like_markup(input.bytes()) {
            debug!(
                file = input.file_name(),
                extension = ?input.extension(),
                "内容以标记开头,改走 HTML 报表路径"
            );
            return Ok(ReportFormat::MarkupReport);
        }

        Err(ImportError::UnrecognizedContainer {
            file_name: input.file_name().to_string(),
        })
    }
}
