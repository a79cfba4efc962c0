// ==========================================
// 库存呆滞分析系统 - 命令行入口
// ==========================================
// 结果以 JSON 输出到 stdout, 日志写 stderr
// 数据库: --db 或 STOCK_AGING_DB_PATH, 否则用户数据目录
// ==========================================

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use stock_aging::api::DEFAULT_TOP_N;
use stock_aging::app::{get_default_db_path, AppState};
use stock_aging::domain::types::ResidualTier;
use stock_aging::logging;

#[derive(Debug, Parser)]
#[command(name = "stock-aging")]
#[command(about = "库存呆滞分析: 残余余额分级 / 库龄统计 / 库存金额", long_about = None)]
struct Cli {
    /// 数据库文件路径
    #[arg(long, global = true)]
    db: Option<String>,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, PartialEq, Subcommand)]
enum Commands {
    /// 导入库存明细表（整表替换）
    ImportStock {
        /// 表格文件（.xlsx/.xls/.csv）
        path: String,
        /// 计算库龄的基准日期（YYYY-MM-DD, 默认今天）
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// 导入交货单表（整表替换）
    ImportShipments {
        path: String,
    },
    /// 导入物料单价表（按物料更新）
    ImportPrices {
        path: String,
    },
    /// 输出富化结果或残余报表
    Analyze {
        /// 只输出残余行
        #[arg(long)]
        residual_only: bool,
        /// 残余等级过滤（TIER1/TIER2/TIER3）
        #[arg(long, value_parser = parse_tier)]
        tier: Option<ResidualTier>,
    },
    /// 驾驶舱汇总
    Dashboard {
        /// 高金额明细条数
        #[arg(long = "top", default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },
    /// 查看当前分析配置
    Config,
}

fn parse_tier(value: &str) -> Result<ResidualTier, String> {
    ResidualTier::from_str(value).ok_or_else(|| format!("未知残余等级: {}", value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!(version = stock_aging::VERSION, db_path = %db_path, "{}", stock_aging::APP_NAME);

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let output = match cli.command {
        Commands::ImportStock { path, today } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            serde_json::to_value(state.import_api.import_stock_file(&path, today)?)?
        }
        Commands::ImportShipments { path } => {
            serde_json::to_value(state.import_api.import_shipment_file(&path)?)?
        }
        Commands::ImportPrices { path } => {
            serde_json::to_value(state.import_api.import_price_file(&path).await?)?
        }
        Commands::Analyze { residual_only, tier } => {
            if residual_only || tier.is_some() {
                serde_json::to_value(state.analysis_api.residual_report(tier).await?)?
            } else {
                serde_json::to_value(state.analysis_api.enriched_rows().await?)?
            }
        }
        Commands::Dashboard { top_n } => serde_json::to_value(state.analysis_api.dashboard(top_n).await?)?,
        Commands::Config => serde_json::to_value(state.config_api.get_settings()?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("stock-aging").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import_stock_with_today() {
        let cli = parse(&["import-stock", "estoque.xlsx", "--today", "2024-03-25"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::ImportStock {
                path: "estoque.xlsx".to_string(),
                today: NaiveDate::from_ymd_opt(2024, 3, 25),
            }
        );
        assert!(!cli.log_json);
        assert!(cli.db.is_none());
    }

    #[test]
    fn test_parse_analyze_flags() {
        let cli = parse(&["analyze", "--tier", "vermelho"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Analyze {
                residual_only: false,
                tier: Some(ResidualTier::Tier3),
            }
        );

        let cli = parse(&["analyze", "--residual-only", "--db", "/tmp/a.db", "--log-json"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Analyze {
                residual_only: true,
                tier: None,
            }
        );
        assert_eq!(cli.db.as_deref(), Some("/tmp/a.db"));
        assert!(cli.log_json);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["import-prices"]).is_err());
        assert!(parse(&["analyze", "--tier"]).is_err());
        assert!(parse(&["analyze", "--tier", "azul"]).is_err());
        assert!(parse(&["import-stock", "x.csv", "--today", "25/03/2024"]).is_err());
        assert!(parse(&["dashboard", "--top", "-1"]).is_err());
        assert!(parse(&["purge"]).is_err());
    }

    #[test]
    fn test_parse_dashboard_top() {
        let cli = parse(&["dashboard"]).unwrap();
        assert_eq!(cli.command, Commands::Dashboard { top_n: DEFAULT_TOP_N });

        let cli = parse(&["dashboard", "--top", "3"]).unwrap();
        assert_eq!(cli.command, Commands::Dashboard { top_n: 3 });
    }
}
