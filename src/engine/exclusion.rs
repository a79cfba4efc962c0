// ==========================================
// 库存呆滞分析系统 - 例外物料判定
// ==========================================
// 例外物料（高价值）永不判为残余, 与等级无关
// ==========================================

use crate::config::ResidualConfig;

/// 物料号是否在例外清单中（精确匹配）
pub fn is_excluded(material_code: &str, config: &ResidualConfig) -> bool {
    config.excluded_materials.contains(material_code)
}
