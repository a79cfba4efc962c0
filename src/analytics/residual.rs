// ==========================================
// 库存呆滞分析系统 - 残余视图
// ==========================================
// 职责: 在富化结果上过滤/分组/统计/排序
// 红线: 只读富化结果, 不重新分级
// ==========================================

use crate::domain::stock::EnrichedRow;
use crate::domain::types::ResidualTier;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// 残余统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidualStats {
    pub total: usize,
    pub tier1: usize,
    pub tier2: usize,
    pub tier3: usize,
    pub single_lots: usize,
    pub total_grams: f64,
    pub total_value: f64,
}

/// 只保留残余行（保持原顺序）
pub fn residual_only(rows: &[EnrichedRow]) -> Vec<EnrichedRow> {
    rows.iter().filter(|r| r.is_residual).cloned().collect()
}

/// 按等级过滤; tier 为 None 时原样返回
pub fn filter_by_tier(rows: &[EnrichedRow], tier: Option<ResidualTier>) -> Vec<EnrichedRow> {
    match tier {
        None => rows.to_vec(),
        Some(t) => rows.iter().filter(|r| r.tier == Some(t)).cloned().collect(),
    }
}

/// 按物料分组（物料号升序）
pub fn group_by_material(rows: &[EnrichedRow]) -> BTreeMap<String, Vec<EnrichedRow>> {
    let mut groups: BTreeMap<String, Vec<EnrichedRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(row.record.material_code.clone())
            .or_default()
            .push(row.clone());
    }
    groups
}

/// 统计残余行
///
/// 只统计 is_residual 的行, 调用方可直接传入全量富化结果。
pub fn residual_stats(rows: &[EnrichedRow]) -> ResidualStats {
    let mut stats = ResidualStats::default();

    for row in rows.iter().filter(|r| r.is_residual) {
        stats.total += 1;
        match row.tier {
            Some(ResidualTier::Tier1) => stats.tier1 += 1,
            Some(ResidualTier::Tier2) => stats.tier2 += 1,
            Some(ResidualTier::Tier3) => stats.tier3 += 1,
            None => {}
        }
        if row.is_single_lot {
            stats.single_lots += 1;
        }
        stats.total_grams += row.normalized_grams;
        stats.total_value += row.total_value;
    }

    stats
}

/// 按处理优先级排序: Tier3 > Tier2 > Tier1 > 无等级, 同级按克数降序
pub fn sort_by_priority(rows: &[EnrichedRow]) -> Vec<EnrichedRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let pa = a.tier.map(|t| t.priority()).unwrap_or(0);
        let pb = b.tier.map(|t| t.priority()).unwrap_or(0);
        pb.cmp(&pa).then_with(|| {
            b.normalized_grams
                .partial_cmp(&a.normalized_grams)
                .unwrap_or(Ordering::Equal)
        })
    });
    sorted
}
