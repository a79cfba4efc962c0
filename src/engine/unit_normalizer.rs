// ==========================================
// 库存呆滞分析系统 - 单位换算
// ==========================================
// 职责: (数量, 单位) → 克
// 红线: 永不失败; 未识别单位按原值透传; 不做舍入
// ==========================================

use crate::domain::types::MassUnit;

/// 将数量换算为克
///
/// 识别 G / KG / MG / T / TON（忽略大小写与首尾空白），
/// 其余单位（UN、L、M 等）原值返回。
pub fn normalize(quantity: f64, unit: &str) -> f64 {
    match MassUnit::parse(unit) {
        Some(mass_unit) => mass_unit.to_grams(quantity),
        None => quantity,
    }
}

/// 单位是否可换算为克
pub fn is_mass_unit(unit: &str) -> bool {
    MassUnit::parse(unit).is_some()
}
