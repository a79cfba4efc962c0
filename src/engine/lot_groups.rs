// ==========================================
// 库存呆滞分析系统 - 单批次检测
// ==========================================
// 职责: 每轮分析预先按物料聚合合格库位内的批次集合
// 红线: 只构建一次, 逐行查询为 O(1)
// ==========================================

use crate::domain::stock::StockRecord;
use std::collections::{HashMap, HashSet};

// ==========================================
// LotGroups - 物料 → 批次集合
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct LotGroups {
    eligible_class: String,
    lots_by_material: HashMap<String, HashSet<String>>,
}

impl LotGroups {
    /// 某物料在合格库位内的不同批次数
    pub fn lot_count(&self, material_code: &str) -> usize {
        self.lots_by_material
            .get(material_code)
            .map(|lots| lots.len())
            .unwrap_or(0)
    }

    /// 合格库位内出现的物料数
    pub fn material_count(&self) -> usize {
        self.lots_by_material.len()
    }
}

/// 构建批次分组（仅合格库位的行参与）
pub fn compute_lot_groups(records: &[StockRecord], eligible_class: &str) -> LotGroups {
    let mut lots_by_material: HashMap<String, HashSet<String>> = HashMap::new();

    for record in records
        .iter()
        .filter(|r| r.storage_location_class == eligible_class)
    {
        lots_by_material
            .entry(record.material_code.clone())
            .or_default()
            .insert(record.lot_id.clone());
    }

    LotGroups {
        eligible_class: eligible_class.to_string(),
        lots_by_material,
    }
}

/// 是否为单批次: 库位属于合格类别, 且该物料在合格库位内恰有一个批次
pub fn is_single_lot(material_code: &str, storage_location_class: &str, lot_groups: &LotGroups) -> bool {
    storage_location_class == lot_groups.eligible_class && lot_groups.lot_count(material_code) == 1
}
