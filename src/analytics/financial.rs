// ==========================================
// 库存呆滞分析系统 - 库存金额汇总
// ==========================================
// 只统计有单价（≠0）的行; 按库龄等级与库位类型拆分金额
// ==========================================

use crate::analytics::aging::AgingThresholds;
use crate::domain::stock::EnrichedRow;
use crate::domain::types::AgingCriticality;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// 按库位类型拆分的金额
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageTypeValue {
    pub total_value: f64,
    pub normal_value: f64,
    pub alert_value: f64,
    pub critical_value: f64,
    pub valued_items: usize,
}

/// 高金额明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuedItem {
    pub material_code: String,
    pub lot_id: String,
    pub storage_type: String,
    pub aging_days: i64,
    pub unit_price: f64,
    pub total_value: f64,
    pub criticality: AgingCriticality,
}

// ==========================================
// FinancialSummary - 金额汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_valued: f64,
    pub alert_value: f64,
    pub critical_value: f64,
    pub valued_items: usize,
    pub total_items: usize,
    pub coverage_pct: f64, // 有单价行占比（0~100）
    pub by_storage_type: BTreeMap<String, StorageTypeValue>,
    pub top_items: Vec<ValuedItem>,
}

/// 计算金额汇总
///
/// # 参数
/// - top_n: 返回金额最高的前 N 行
pub fn financial_summary(
    rows: &[EnrichedRow],
    thresholds: &AgingThresholds,
    top_n: usize,
) -> FinancialSummary {
    let mut summary = FinancialSummary {
        total_items: rows.len(),
        ..Default::default()
    };
    let mut valued: Vec<ValuedItem> = Vec::new();

    for row in rows.iter().filter(|r| r.unit_price != 0.0) {
        let value = row.total_value;
        let criticality = thresholds.criticality(row.record.aging_days);

        summary.total_valued += value;
        summary.valued_items += 1;

        let bucket = summary
            .by_storage_type
            .entry(row.record.storage_type.clone())
            .or_default();
        bucket.total_value += value;
        bucket.valued_items += 1;

        match criticality {
            AgingCriticality::Critical => {
                summary.critical_value += value;
                bucket.critical_value += value;
            }
            AgingCriticality::Alert => {
                summary.alert_value += value;
                bucket.alert_value += value;
            }
            AgingCriticality::Normal => bucket.normal_value += value,
        }

        valued.push(ValuedItem {
            material_code: row.record.material_code.clone(),
            lot_id: row.record.lot_id.clone(),
            storage_type: row.record.storage_type.clone(),
            aging_days: row.record.aging_days,
            unit_price: row.unit_price,
            total_value: value,
            criticality,
        });
    }

    if summary.total_items > 0 {
        summary.coverage_pct = summary.valued_items as f64 / summary.total_items as f64 * 100.0;
    }

    valued.sort_by(|a, b| b.total_value.partial_cmp(&a.total_value).unwrap_or(Ordering::Equal));
    valued.truncate(top_n);
    summary.top_items = valued;

    summary
}
