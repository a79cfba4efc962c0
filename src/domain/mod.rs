// ==========================================
// 库存呆滞分析系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod stock;
pub mod types;

// 重导出核心类型
pub use stock::{EnrichedRow, ImportBatch, MaterialPrice, PriceMap, ShipmentRecord, StockRecord};
pub use types::{AgingCriticality, ImportKind, MassUnit, ResidualTier};
