// ==========================================
// 交易报表导入API
// ==========================================
// 职责: 封装导入器,向 CLI / 前端提供可序列化的导入结果
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfig;
use crate::domain::trade::{RawByteInput, RawTradeRow, TradeImportResult};
use crate::domain::types::{BrokerProfile, ReportFormat};
use crate::importer::{DataCleaner, TradeReportImporter, TradeReportImporterImpl};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// 导入API响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 本次导入ID
    pub import_id: String,
    /// 判定的报表格式
    pub format: ReportFormat,
    /// 使用的券商模板
    pub profile: BrokerProfile,
    /// 交易行数
    pub row_count: usize,
    /// 被过滤的候选行数
    pub skipped_rows: usize,
    /// 报表汇总净利润（缺失为 None）
    pub total_net_profit: Option<f64>,
    /// 源文本编码（工作簿为 None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// 交易行（列名 → 原始单元格）
    pub rows: Vec<RawTradeRow>,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

impl ImportApiResponse {
    fn from_result(result: TradeImportResult, start: Instant) -> Self {
        Self {
            import_id: result.import_id,
            format: result.format,
            profile: result.profile,
            row_count: result.rows.len(),
            skipped_rows: result.skipped_rows,
            total_net_profit: result.total_net_profit,
            encoding: result.encoding,
            rows: result.rows,
            elapsed_ms: start.elapsed().as_millis() as i64,
        }
    }
}

/// 导入API
pub struct ImportApi {
    importer: TradeReportImporterImpl,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(config: ImportConfig) -> Self {
        Self {
            importer: TradeReportImporterImpl::with_config(config),
        }
    }

    /// 按名称解析券商模板
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): 未知模板名
    pub fn parse_profile(name: &str) -> ApiResult<BrokerProfile> {
        BrokerProfile::parse(name).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "未知券商模板: {}，应为 standard / ninjatrader",
                name
            ))
        })
    }

    /// 导入交易报表文件
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - profile: 券商模板
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入结果
    /// - Err(ApiError): 错误信息（含错误码）
    pub async fn import_trade_report(
        &self,
        file_path: &str,
        profile: BrokerProfile,
    ) -> ApiResult<ImportApiResponse> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径为空".to_string()));
        }

        let start = Instant::now();
        let result = self
            .importer
            .import_file(file_path, profile)
            .await
            .map_err(|e| {
                warn!(file = file_path, code = e.kind(), "导入失败");
                ApiError::from(e)
            })?;

        let response = ImportApiResponse::from_result(result, start);
        info!(
            file = file_path,
            import_id = %response.import_id,
            rows = response.row_count,
            elapsed_ms = response.elapsed_ms,
            "导入API完成"
        );
        Ok(response)
    }

    /// 导入内存中的报表字节（上传场景）
    ///
    /// # 参数
    /// - bytes: 文件内容
    /// - file_name: 上传时声明的文件名
    /// - content_type: 上传时声明的 MIME 类型（可选）
    /// - profile: 券商模板
    pub async fn import_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: Option<&str>,
        profile: BrokerProfile,
    ) -> ApiResult<ImportApiResponse> {
        let mut input = RawByteInput::new(bytes, file_name);
        if let Some(content_type) = content_type {
            input = input.with_content_type(content_type);
        }

        let start = Instant::now();
        let result = self.importer.import_bytes(input, profile).await?;
        Ok(ImportApiResponse::from_result(result, start))
    }

    /// 批量导入（各文件相互独立,单个失败不影响其他文件）
    pub async fn import_batch(
        &self,
        file_paths: &[String],
        profile: BrokerProfile,
    ) -> Vec<ApiResult<ImportApiResponse>> {
        let start = Instant::now();
        self.importer
            .batch_import(file_paths.to_vec(), profile)
            .await
            .into_iter()
            .map(|result| {
                result
                    .map(|r| ImportApiResponse::from_result(r, start))
                    .map_err(ApiError::from)
            })
            .collect()
    }

    /// 字段解析器（下游按需解析日期/金额/方向/品种）
    pub fn field_cleaner(&self) -> &dyn DataCleaner {
        self.importer.field_cleaner()
    }
}

impl Default for ImportApi {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::CellValue;
    use crate::domain::types::TradeDirection;

    const CSV_REPORT: &str = "Trade History Report\n\
        Positions\n\
        Time,Position,Symbol,Type,Volume,Price,S / L,T / P,Time,Price,Commission,Swap,Profit\n\
        2025.12.05 09:30:00,1001,EURUSD.m,buy,0.10,1.0500,,,2025.12.05 10:00:00,1.0550,-0.70,0.00,50.00\n\
        Orders\n\
        Total Net Profit:,50.00\n";

    #[tokio::test]
    async fn test_import_bytes_response() {
        let api = ImportApi::default();
        let response = api
            .import_bytes(
                CSV_REPORT.as_bytes().to_vec(),
                "report.csv",
                Some("text/csv; charset=utf-8"),
                BrokerProfile::Standard,
            )
            .await
            .unwrap();

        assert_eq!(response.format, ReportFormat::DelimitedText);
        assert_eq!(response.row_count, 1);
        assert_eq!(response.total_net_profit, Some(50.0));
        assert!(!response.import_id.is_empty());
        assert!(response.elapsed_ms >= 0);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"format\":\"DELIMITED_TEXT\""));
    }

    #[tokio::test]
    async fn test_empty_path_is_invalid_input() {
        let api = ImportApi::default();
        let err = api
            .import_trade_report("  ", BrokerProfile::Standard)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_missing_section_code() {
        let api = ImportApi::default();
        let err = api
            .import_bytes(
                b"a,b,c\n1,2,3\n".to_vec(),
                "other.csv",
                None,
                BrokerProfile::Standard,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MISSING_SECTION");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_parse_profile() {
        assert_eq!(
            ImportApi::parse_profile("NinjaTrader").unwrap(),
            BrokerProfile::NinjaTrader
        );
        assert!(matches!(
            ImportApi::parse_profile("ibkr"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_field_cleaner_exposed() {
        let api = ImportApi::default();
        let cleaner = api.field_cleaner();
        assert_eq!(cleaner.normalize_type("Buy"), Some(TradeDirection::Long));
        assert_eq!(cleaner.parse_money(&CellValue::text("(1,250.50)")), -1250.5);
        assert_eq!(cleaner.clean_symbol("EURUSD.m"), "EURUSD");
    }
}
