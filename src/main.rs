// ==========================================
// 交易报表导入引擎 - 命令行入口
// ==========================================
// 用法:
//   trade-report-import [--profile standard|ninjatrader] [--config FILE] [--locale zh-CN|en] FILE...
// 输出: 每个文件一行 JSON（stdout）,日志写 stderr
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;

use serde_json::json;
use trade_report_import::api::ImportApi;
use trade_report_import::config::ImportConfig;
use trade_report_import::{i18n, logging, BrokerProfile};

const USAGE: &str = "用法: trade-report-import [--profile standard|ninjatrader] [--config FILE] [--locale zh-CN|en] FILE...";

struct CliArgs {
    profile: BrokerProfile,
    config_path: Option<PathBuf>,
    locale: Option<String>,
    files: Vec<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        profile: BrokerProfile::default(),
        config_path: None,
        locale: None,
        files: Vec::new(),
    };

    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--profile" | "-p" => {
                let value = args.next().ok_or("--profile 缺少参数")?;
                cli.profile = ImportApi::parse_profile(&value).map_err(|e| e.to_string())?;
            }
            "--config" | "-c" => {
                let value = args.next().ok_or("--config 缺少参数")?;
                cli.config_path = Some(PathBuf::from(value));
            }
            "--locale" | "-l" => {
                cli.locale = Some(args.next().ok_or("--locale 缺少参数")?);
            }
            "--help" | "-h" => return Err(USAGE.to_string()),
            other if other.starts_with('-') => {
                return Err(format!("未知参数: {}\n{}", other, USAGE));
            }
            other => cli.files.push(other.to_string()),
        }
    }

    if cli.files.is_empty() {
        return Err(USAGE.to_string());
    }
    Ok(cli)
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    if let Some(locale) = &cli.locale {
        if !i18n::set_locale(locale) {
            tracing::warn!(locale = %locale, supported = ?i18n::SUPPORTED_LOCALES, "不支持的语言,沿用默认语言");
        }
    }

    let config = match ImportConfig::load(cli.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[{}] {}", e.kind(), e.user_message());
            return ExitCode::from(2);
        }
    };

    tracing::info!(
        version = trade_report_import::VERSION,
        profile = %cli.profile,
        files = cli.files.len(),
        "{}启动",
        trade_report_import::APP_NAME
    );

    let api = ImportApi::new(config);
    let results = api.import_batch(&cli.files, cli.profile).await;

    let mut failed = 0usize;
    for (file, result) in cli.files.iter().zip(results) {
        let line = match result {
            Ok(response) => json!({ "file": file, "result": response }),
            Err(e) => {
                failed += 1;
                json!({ "file": file, "error": e.to_response() })
            }
        };
        println!("{}", line);
    }

    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_parse_args() {
        let cli = parse_args(args(&[
            "--profile",
            "ninjatrader",
            "--locale",
            "en",
            "a.csv",
            "b.csv",
        ]))
        .unwrap();
        assert_eq!(cli.profile, BrokerProfile::NinjaTrader);
        assert_eq!(cli.locale.as_deref(), Some("en"));
        assert_eq!(cli.files, vec!["a.csv".to_string(), "b.csv".to_string()]);
        assert!(cli.config_path.is_none());
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["--profile", "ibkr", "a.csv"])).is_err());
        assert!(parse_args(args(&["--verbose", "a.csv"])).is_err());
        assert!(parse_args(args(&["a.csv", "--config"])).is_err());
    }
}
