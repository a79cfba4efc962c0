// ==========================================
// 库存呆滞分析系统 - 引擎层
// ==========================================
// 职责: 残余分级与库存行富化（纯计算）
// 红线: 不访问数据库, 不读取配置存储, 输入全部由调用方提供
// ==========================================

pub mod classifier;
pub mod enricher;
pub mod exclusion;
pub mod lot_groups;
pub mod shipment_index;
pub mod unit_normalizer;

// 重导出核心引擎
pub use classifier::classify;
pub use enricher::{enrich, RowEnricher};
pub use exclusion::is_excluded;
pub use lot_groups::{compute_lot_groups, is_single_lot, LotGroups};
pub use shipment_index::{compute_shipment_counts, ShipmentCounts};
pub use unit_normalizer::{is_mass_unit, normalize};
