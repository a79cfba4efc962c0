// ==========================================
// 库存呆滞分析系统 - 库龄统计
// ==========================================
// 规则:
// - 库龄 > critical_days       → 严重
// - 库龄 ≥ alert_days          → 关注
// - 其余                        → 正常
// 默认 alert=10, critical=20
// ==========================================

use crate::domain::stock::StockRecord;
use crate::domain::types::AgingCriticality;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// AgingThresholds - 库龄阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingThresholds {
    pub alert_days: i64,    // 关注阈值（含）
    pub critical_days: i64, // 严重阈值（不含）
}

impl Default for AgingThresholds {
    fn default() -> Self {
        Self {
            alert_days: 10,
            critical_days: 20,
        }
    }
}

impl AgingThresholds {
    pub fn new(alert_days: i64, critical_days: i64) -> Self {
        Self {
            alert_days,
            critical_days,
        }
    }

    /// 判定库龄等级
    pub fn criticality(&self, aging_days: i64) -> AgingCriticality {
        if aging_days > self.critical_days {
            AgingCriticality::Critical
        } else if aging_days >= self.alert_days {
            AgingCriticality::Alert
        } else {
            AgingCriticality::Normal
        }
    }
}

/// 分组汇总（行数 + 数量合计）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub items: usize,
    pub quantity: f64,
}

impl GroupTotals {
    fn add(&mut self, quantity: f64) {
        self.items += 1;
        self.quantity += quantity;
    }
}

// ==========================================
// AgingStats - 库龄统计结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgingStats {
    pub total_items: usize,
    pub total_quantity: f64,
    pub average_aging_days: f64,
    pub max_aging_days: i64,
    pub alert_items: usize,
    pub critical_items: usize,

    pub by_storage_location: BTreeMap<String, GroupTotals>,
    pub by_storage_type: BTreeMap<String, GroupTotals>,
    pub by_center: BTreeMap<String, GroupTotals>,
    pub by_unit: BTreeMap<String, GroupTotals>,
    pub by_stock_type: BTreeMap<String, GroupTotals>,
}

/// 空字段归入的分组名
const UNSPECIFIED_GROUP: &str = "(vazio)";

fn group_key(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNSPECIFIED_GROUP.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 计算库龄统计
pub fn aging_stats(records: &[StockRecord], thresholds: &AgingThresholds) -> AgingStats {
    let mut stats = AgingStats::default();
    if records.is_empty() {
        return stats;
    }

    let mut total_days: i64 = 0;

    for record in records {
        stats.total_items += 1;
        stats.total_quantity += record.quantity_available;
        total_days += record.aging_days;
        stats.max_aging_days = stats.max_aging_days.max(record.aging_days);

        match thresholds.criticality(record.aging_days) {
            AgingCriticality::Critical => stats.critical_items += 1,
            AgingCriticality::Alert => stats.alert_items += 1,
            AgingCriticality::Normal => {}
        }

        let qty = record.quantity_available;
        stats
            .by_storage_location
            .entry(group_key(&record.storage_location_class))
            .or_default()
            .add(qty);
        stats
            .by_storage_type
            .entry(group_key(&record.storage_type))
            .or_default()
            .add(qty);
        stats.by_center.entry(group_key(&record.center)).or_default().add(qty);
        stats
            .by_unit
            .entry(group_key(&record.unit_of_measure))
            .or_default()
            .add(qty);
        stats
            .by_stock_type
            .entry(group_key(record.stock_type.as_deref().unwrap_or("")))
            .or_default()
            .add(qty);
    }

    stats.average_aging_days = total_days as f64 / stats.total_items as f64;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(material: &str, class: &str, qty: f64, days: i64) -> StockRecord {
        let mut r = StockRecord::new(material, "L1", class, qty, "KG");
        r.aging_days = days;
        r
    }

    #[test]
    fn test_criticality_bands() {
        let t = AgingThresholds::default();
        assert_eq!(t.criticality(0), AgingCriticality::Normal);
        assert_eq!(t.criticality(9), AgingCriticality::Normal);
        assert_eq!(t.criticality(10), AgingCriticality::Alert);
        assert_eq!(t.criticality(20), AgingCriticality::Alert);
        assert_eq!(t.criticality(21), AgingCriticality::Critical);
    }

    #[test]
    fn test_stats_and_groups() {
        let mut records = vec![
            rec("M1", "PES", 10.0, 5),
            rec("M2", "PES", 20.0, 15),
            rec("M3", "WNM", 30.0, 40),
        ];
        records[2].stock_type = Some("Q".to_string());

        let stats = aging_stats(&records, &AgingThresholds::default());

        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_quantity, 60.0);
        assert_eq!(stats.max_aging_days, 40);
        assert!((stats.average_aging_days - 20.0).abs() < 1e-9);
        assert_eq!(stats.alert_items, 1);
        assert_eq!(stats.critical_items, 1);

        assert_eq!(stats.by_storage_location["PES"].items, 2);
        assert_eq!(stats.by_storage_location["WNM"].quantity, 30.0);
        assert_eq!(stats.by_unit["KG"].items, 3);
        assert_eq!(stats.by_stock_type["Q"].items, 1);
        assert_eq!(stats.by_stock_type[UNSPECIFIED_GROUP].items, 2);
    }

    #[test]
    fn test_empty_records() {
        let stats = aging_stats(&[], &AgingThresholds::default());
        assert_eq!(stats.total_items, 0);
        assert_eq!(stats.average_aging_days, 0.0);
    }
}
