// ==========================================
// 库存呆滞分析系统 - 缓存层
// ==========================================

pub mod price_cache;

pub use price_cache::{PriceMapCache, PriceMapSource};
