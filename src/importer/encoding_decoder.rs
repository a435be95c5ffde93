// ==========================================
// 交易报表导入引擎 - 文本解码器
// ==========================================
// 职责: 字节 → 文本
// 顺序: UTF-16LE BOM → UTF-16BE BOM → 严格 UTF-8 → windows-1252 回退
// 红线: 回退链以数据形式定义,未尝试回退前不得输出乱码
// ==========================================

use crate::domain::trade::DecodedText;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::trade_importer_trait::TextDecoder;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 单步解码结果
/// - None: 本步不适用,交给下一步
/// - Some(Ok): 解码成功
/// - Some(Err): 本步适用但数据损坏,终止
type DecodeStep = fn(&[u8]) -> Option<ImportResult<String>>;

/// 解码回退链（按顺序尝试）
pub const DECODE_CHAIN: [(&str, DecodeStep); 4] = [
    ("UTF-16LE", decode_utf16le_bom),
    ("UTF-16BE", decode_utf16be_bom),
    ("UTF-8", decode_strict_utf8),
    ("windows-1252", decode_legacy_western),
];

fn decode_utf16le_bom(bytes: &[u8]) -> Option<ImportResult<String>> {
    bytes
        .strip_prefix(&UTF16LE_BOM)
        .map(|body| decode_strict(UTF_16LE, body))
}

fn decode_utf16be_bom(bytes: &[u8]) -> Option<ImportResult<String>> {
    bytes
        .strip_prefix(&UTF16BE_BOM)
        .map(|body| decode_strict(UTF_16BE, body))
}

fn decode_strict_utf8(bytes: &[u8]) -> Option<ImportResult<String>> {
    let body = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| Ok(text.into_owned()))
}

fn decode_legacy_western(bytes: &[u8]) -> Option<ImportResult<String>> {
    // windows-1252 为每个字节都定义了映射,不会失败
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    Some(Ok(text.into_owned()))
}

fn decode_strict(encoding: &'static Encoding, body: &[u8]) -> ImportResult<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            ImportError::DecodeError(format!(
                "{} 字节序列不完整或包含非法代理对 ({} 字节)",
                encoding.name(),
                body.len()
            ))
        })
}

// ==========================================
// EncodingDecoder 实现
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct EncodingDecoder;

impl EncodingDecoder {
    pub fn new() -> Self {
        Self
    }

    /// 宽松解码前缀（仅用于格式嗅探,不报错）
    ///
    /// # 参数
    /// - bytes: 完整字节
    /// - max_len: 最多解码的字节数（UTF-16 时向下取偶数）
    pub fn decode_prefix(&self, bytes: &[u8], max_len: usize) -> String {
        let end = bytes.len().min(max_len);
        if let Some(body) = bytes[..end].strip_prefix(&UTF16LE_BOM) {
            let (text, _) = UTF_16LE.decode_without_bom_handling(even_prefix(body));
            return text.into_owned();
        }
        if let Some(body) = bytes[..end].strip_prefix(&UTF16BE_BOM) {
            let (text, _) = UTF_16BE.decode_without_bom_handling(even_prefix(body));
            return text.into_owned();
        }
        let body = bytes[..end].strip_prefix(&UTF8_BOM).unwrap_or(&bytes[..end]);
        let (text, _) = UTF_8.decode_without_bom_handling(body);
        text.into_owned()
    }
}

fn even_prefix(body: &[u8]) -> &[u8] {
    &body[..body.len() - body.len() % 2]
}

impl TextDecoder for EncodingDecoder {
    fn decode(&self, bytes: &[u8]) -> ImportResult<DecodedText> {
        for &(name, step) in DECODE_CHAIN.iter() {
            if let Some(result) = step(bytes) {
                let text = result?;
                tracing::debug!(encoding = name, chars = text.len(), "文本解码完成");
                return Ok(DecodedText::new(text, name));
            }
        }
        Err(ImportError::DecodeError("没有可用的解码器".to_string()))
    }
}
