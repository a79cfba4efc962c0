// ==========================================
// 库存呆滞分析系统 - 分析视图层
// ==========================================
// 职责: 在富化结果之上的残余视图 / 库龄统计 / 金额汇总
// ==========================================

pub mod aging;
pub mod financial;
pub mod residual;

pub use aging::{aging_stats, AgingStats, AgingThresholds, GroupTotals};
pub use financial::{financial_summary, FinancialSummary, StorageTypeValue, ValuedItem};
pub use residual::{
    filter_by_tier, group_by_material, residual_only, residual_stats, sort_by_priority, ResidualStats,
};
