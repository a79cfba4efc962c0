// ==========================================
// 库存呆滞分析系统 - 配置层
// ==========================================
// 职责: 残余分级配置 + 分析参数管理
// 存储: config_kv 表
// ==========================================

pub mod analysis_config_trait;
pub mod config_manager;
pub mod residual_config;

// 重导出核心配置管理器
pub use analysis_config_trait::AnalysisConfigReader;
pub use config_manager::{check_aging_thresholds, config_keys, ConfigManager};
pub use residual_config::{ResidualConfig, DEFAULT_ELIGIBLE_STORAGE_CLASS};
