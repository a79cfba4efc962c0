// ==========================================
// 库存呆滞分析系统 - 交货单交叉引用
// ==========================================
// 每轮分析预先统计 物料号 → 交货单行数
// ==========================================

use crate::domain::stock::ShipmentRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ShipmentCounts {
    counts: HashMap<String, u32>,
}

impl ShipmentCounts {
    /// 查询物料的交货单行数（缺失为 0）
    pub fn count_for(&self, material_code: &str) -> u32 {
        self.counts.get(material_code).copied().unwrap_or(0)
    }

    /// 被交货单引用的物料数
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// 统计每个物料的交货单行数
pub fn compute_shipment_counts(shipments: &[ShipmentRecord]) -> ShipmentCounts {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for shipment in shipments {
        *counts.entry(shipment.material_code.clone()).or_insert(0) += 1;
    }
    ShipmentCounts { counts }
}
