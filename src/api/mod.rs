// ==========================================
// 库存呆滞分析系统 - API 层
// ==========================================
// 职责: 用例编排（导入 / 分析 / 配置）, 统一错误出口
// ==========================================

pub mod analysis_api;
pub mod config_api;
pub mod error;
pub mod import_api;

// 重导出核心API
pub use analysis_api::{AnalysisApi, DashboardResponse, ResidualReport, DEFAULT_TOP_N};
pub use config_api::{AnalysisSettings, ConfigApi};
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse};
