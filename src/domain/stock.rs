// ==========================================
// 库存呆滞分析系统 - 库存领域模型
// ==========================================
// 库存行 / 交货单行 / 物料单价 / 富化结果行 / 导入批次
// ==========================================

use crate::domain::types::{ImportKind, ResidualTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 物料号 → 单价（缺失即视为 0）
pub type PriceMap = HashMap<String, f64>;

// ==========================================
// StockRecord - 库存行
// ==========================================
// 用途: 导入层写入, 引擎层只读
// 对齐: stock_position 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    // ===== 参与计算的字段 =====
    pub material_code: String,          // 物料号（同一物料可有多行）
    pub lot_id: String,                 // 批次号
    pub storage_location_class: String, // 库位类别（Depósito, 如 PES）
    pub quantity_available: f64,        // 可用数量（非负）
    pub unit_of_measure: String,        // 计量单位（UMB）
    pub aging_days: i64,                // 库龄天数（导入时计算）

    // ===== 透传字段 =====
    pub description: String,               // 物料短描述
    pub center: String,                    // 工厂（Centro）
    pub storage_type: String,              // 库位类型（Tipo de depósito）
    pub storage_position: String,          // 仓位（Posição no depósito）
    pub stock_type: Option<String>,        // 库存类型（Tipo de estoque）
    pub expiry_date: Option<String>,       // 到期日（DD/MM/YYYY）
    pub last_movement: Option<String>,     // 最后移动日期（DD/MM/YYYY）
    pub last_entry: Option<String>,        // 最后入库日期（DD/MM/YYYY）
}

impl StockRecord {
    /// 以最少字段构造库存行（其余透传字段为空）
    pub fn new(
        material_code: &str,
        lot_id: &str,
        storage_location_class: &str,
        quantity_available: f64,
        unit_of_measure: &str,
    ) -> Self {
        Self {
            material_code: material_code.to_string(),
            lot_id: lot_id.to_string(),
            storage_location_class: storage_location_class.to_string(),
            quantity_available,
            unit_of_measure: unit_of_measure.to_string(),
            aging_days: 0,
            description: String::new(),
            center: String::new(),
            storage_type: String::new(),
            storage_position: String::new(),
            stock_type: None,
            expiry_date: None,
            last_movement: None,
            last_entry: None,
        }
    }
}

// ==========================================
// ShipmentRecord - 交货单行 (remessa)
// ==========================================
// 引擎只按 material_code 计数, 其余字段透传
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub shipment_number: String,             // 交货单号（9 位）
    pub item: String,                        // 行项目号
    pub material_code: String,               // 物料号
    pub picking_date: Option<String>,        // 拣配日期（来自交货单表头行）
    pub shipment_total_weight: Option<f64>,  // 交货单总重（来自表头行）
    pub availability_date: Option<String>,   // 可用日期
    pub quantity: f64,                       // 数量
    pub unit_of_measure: String,             // 单位
    pub center: String,                      // 工厂
    pub storage_location: String,            // 库位
    pub description: String,                 // 物料描述
}

impl ShipmentRecord {
    /// 以最少字段构造交货单行
    pub fn new(shipment_number: &str, item: &str, material_code: &str, quantity: f64) -> Self {
        Self {
            shipment_number: shipment_number.to_string(),
            item: item.to_string(),
            material_code: material_code.to_string(),
            picking_date: None,
            shipment_total_weight: None,
            availability_date: None,
            quantity,
            unit_of_measure: String::new(),
            center: String::new(),
            storage_location: String::new(),
            description: String::new(),
        }
    }
}

// ==========================================
// MaterialPrice - 物料单价
// ==========================================
// 对齐: material_price 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPrice {
    pub material_code: String,
    pub unit_price: f64,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// EnrichedRow - 富化结果行
// ==========================================
// 红线: 纯派生数据, 每次分析重新计算, 不落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    #[serde(flatten)]
    pub record: StockRecord,

    // ===== 估值 =====
    pub unit_price: f64,  // 单价（缺失 = 0）
    pub total_value: f64, // quantity_available × unit_price

    // ===== 交货单交叉引用 =====
    pub open_shipment_count: u32,

    // ===== 残余分级 =====
    pub normalized_grams: f64,          // 换算后克数（非质量单位为原值）
    pub is_mass_unit: bool,             // 单位是否为可换算的质量单位
    pub tier: Option<ResidualTier>,     // None = 不适用
    pub is_single_lot: bool,            // 合格库位内该物料仅一个批次
    pub is_excluded_material: bool,     // 在例外清单中
    pub is_residual: bool,              // 最终残余判定
}

// ==========================================
// ImportBatch - 导入批次
// ==========================================
// 对齐: import_batch 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,             // 批次 ID（UUID）
    pub kind: ImportKind,             // 导入类型
    pub file_name: Option<String>,    // 源文件名
    pub row_count: usize,             // 写入行数
    pub skipped_rows: usize,          // 被跳过的行数
    pub imported_at: DateTime<Utc>,   // 导入时间
    pub elapsed_ms: i64,              // 导入耗时（毫秒）
}
