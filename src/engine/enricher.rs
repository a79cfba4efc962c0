// ==========================================
// 库存呆滞分析系统 - 库存行富化引擎
// ==========================================
// 职责: 单价估值 + 交货单计数 + 单位换算 + 残余分级 + 例外/单批次判定
// 输入: 库存行 + 单价表 + 交货单行 + 残余配置 + 合格库位类别
// 输出: 每个库存行一条 EnrichedRow（同序、不过滤、不去重）
// 红线: 纯计算, 无 I/O, 每次调用独立构建预计算表
// ==========================================

use crate::config::ResidualConfig;
use crate::domain::stock::{EnrichedRow, PriceMap, ShipmentRecord, StockRecord};
use crate::engine::classifier::classify;
use crate::engine::exclusion::is_excluded;
use crate::engine::lot_groups::{compute_lot_groups, is_single_lot, LotGroups};
use crate::engine::shipment_index::{compute_shipment_counts, ShipmentCounts};
use crate::engine::unit_normalizer::{is_mass_unit, normalize};
use tracing::instrument;

// ==========================================
// RowEnricher - 库存行富化引擎
// ==========================================
pub struct RowEnricher {}

impl RowEnricher {
    pub fn new() -> Self {
        Self {}
    }

    /// 批量富化库存行
    ///
    /// 预计算阶段: 批次分组 + 交货单计数（各一次）
    /// 逐行阶段: 估值 → 换算 → 分级 → 例外 → 单批次 → 残余判定
    #[instrument(
        skip(self, records, config, prices, shipments),
        fields(rows = records.len(), shipments = shipments.len(), prices = prices.len())
    )]
    pub fn enrich(
        &self,
        records: &[StockRecord],
        config: &ResidualConfig,
        prices: &PriceMap,
        shipments: &[ShipmentRecord],
        eligible_class: &str,
    ) -> Vec<EnrichedRow> {
        let lot_groups = compute_lot_groups(records, eligible_class);
        let shipment_counts = compute_shipment_counts(shipments);

        let rows: Vec<EnrichedRow> = records
            .iter()
            .map(|record| {
                self.enrich_single(record, config, prices, &lot_groups, &shipment_counts, eligible_class)
            })
            .collect();

        tracing::debug!(
            lot_materials = lot_groups.material_count(),
            shipment_materials = shipment_counts.len(),
            residual = rows.iter().filter(|r| r.is_residual).count(),
            "富化完成"
        );

        rows
    }

    /// 单行富化（内部使用，预计算表由调用方提供）
    pub fn enrich_single(
        &self,
        record: &StockRecord,
        config: &ResidualConfig,
        prices: &PriceMap,
        lot_groups: &LotGroups,
        shipment_counts: &ShipmentCounts,
        eligible_class: &str,
    ) -> EnrichedRow {
        // 1. 估值
        let unit_price = prices.get(&record.material_code).copied().unwrap_or(0.0);
        let total_value = record.quantity_available * unit_price;

        // 2. 交货单计数
        let open_shipment_count = shipment_counts.count_for(&record.material_code);

        // 3. 单位换算
        let normalized_grams = normalize(record.quantity_available, &record.unit_of_measure);

        // 4. 残余分级（仅合格库位）
        let eligible = record.storage_location_class == eligible_class;
        let tier = if eligible {
            classify(normalized_grams, config)
        } else {
            None
        };

        // 5. 例外物料
        let is_excluded_material = is_excluded(&record.material_code, config);

        // 6. 单批次
        let single_lot = is_single_lot(&record.material_code, &record.storage_location_class, lot_groups);

        // 7. 最终判定
        let is_residual = eligible && tier.is_some() && !is_excluded_material;

        EnrichedRow {
            record: record.clone(),
            unit_price,
            total_value,
            open_shipment_count,
            normalized_grams,
            is_mass_unit: is_mass_unit(&record.unit_of_measure),
            tier,
            is_single_lot: single_lot,
            is_excluded_material,
            is_residual,
        }
    }
}

impl Default for RowEnricher {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷函数: 使用默认引擎富化
pub fn enrich(
    records: &[StockRecord],
    config: &ResidualConfig,
    prices: &PriceMap,
    shipments: &[ShipmentRecord],
    eligible_class: &str,
) -> Vec<EnrichedRow> {
    RowEnricher::new().enrich(records, config, prices, shipments, eligible_class)
}
