// ==========================================
// 库存呆滞分析系统 - 交货单表适配器 (SAP remessa)
// ==========================================
// 表格布局（无列名, 按列位置取值, 从第 5 行开始）:
// - 表头行: 第 1 列 = "SNVM", 第 2 列 = 拣配日期 (DD.MM.YYYY), 第 4 列 = 总重
// - 行项目: 第 1 列 = 9 位交货单号, 第 3 列 = 行项目号（纯数字）
//   5 可用日期 / 6 数量 / 9 单位 / 10 物料 / 13 工厂 / 14 库位 / 15 物料描述
// ==========================================

use crate::domain::stock::ShipmentRecord;
use crate::importer::error::ImportResult;
use crate::importer::importer_trait::{cell_at, is_blank_row, RawCell, SheetAdapter, SheetOutcome};
use crate::importer::value_parser::{clean_text, code_text, display_date, parse_br_number};

/// 数据起始行（从 0 开始）
pub const FIRST_DATA_ROW: usize = 4;

/// 交货单表头行标记
const HEADER_MARKER: &str = "SNVM";

mod col {
    pub const SHIPMENT_NUMBER: usize = 1;
    pub const PICKING_DATE: usize = 2;
    pub const ITEM: usize = 3;
    pub const TOTAL_WEIGHT: usize = 4;
    pub const AVAILABILITY_DATE: usize = 5;
    pub const QUANTITY: usize = 6;
    pub const UNIT: usize = 9;
    pub const MATERIAL: usize = 10;
    pub const CENTER: usize = 13;
    pub const STORAGE_LOCATION: usize = 14;
    pub const DESCRIPTION: usize = 15;
}

fn is_header_row(row: &[RawCell]) -> bool {
    clean_text(cell_at(row, col::SHIPMENT_NUMBER)) == HEADER_MARKER
        && clean_text(cell_at(row, col::PICKING_DATE)).contains('.')
}

fn is_item_row(row: &[RawCell]) -> bool {
    let number = code_text(cell_at(row, col::SHIPMENT_NUMBER));
    let item = code_text(cell_at(row, col::ITEM));
    number.len() == 9
        && number.chars().all(|c| c.is_ascii_digit())
        && !item.is_empty()
        && item.chars().all(|c| c.is_ascii_digit())
}

// ==========================================
// ShipmentSheetAdapter
// ==========================================
#[derive(Debug, Default)]
pub struct ShipmentSheetAdapter;

impl SheetAdapter for ShipmentSheetAdapter {
    type Record = ShipmentRecord;

    fn adapt(&self, grid: &[Vec<RawCell>]) -> ImportResult<SheetOutcome<ShipmentRecord>> {
        let mut records = Vec::new();
        let mut skipped_rows = 0;

        // 当前交货单表头上下文
        let mut picking_date: Option<String> = None;
        let mut total_weight: Option<f64> = None;

        for (idx, row) in grid.iter().enumerate().skip(FIRST_DATA_ROW) {
            if is_blank_row(row) {
                continue;
            }

            if is_header_row(row) {
                picking_date = display_date(cell_at(row, col::PICKING_DATE));
                total_weight = parse_br_number(cell_at(row, col::TOTAL_WEIGHT)).filter(|w| *w != 0.0);
                continue;
            }

            if !is_item_row(row) {
                continue;
            }

            let quantity = parse_br_number(cell_at(row, col::QUANTITY)).unwrap_or(0.0);
            let record = ShipmentRecord {
                shipment_number: code_text(cell_at(row, col::SHIPMENT_NUMBER)),
                item: code_text(cell_at(row, col::ITEM)),
                material_code: code_text(cell_at(row, col::MATERIAL)),
                picking_date: picking_date.clone(),
                shipment_total_weight: total_weight,
                availability_date: display_date(cell_at(row, col::AVAILABILITY_DATE)),
                quantity,
                unit_of_measure: clean_text(cell_at(row, col::UNIT)),
                center: code_text(cell_at(row, col::CENTER)),
                storage_location: clean_text(cell_at(row, col::STORAGE_LOCATION)),
                description: clean_text(cell_at(row, col::DESCRIPTION)),
            };

            if record.material_code.is_empty() || record.quantity <= 0.0 {
                tracing::warn!(
                    row = idx + 1,
                    shipment = %record.shipment_number,
                    "交货单行缺少物料或数量不大于 0，跳过"
                );
                skipped_rows += 1;
                continue;
            }

            records.push(record);
        }

        tracing::debug!(rows = records.len(), skipped = skipped_rows, "交货单表解析完成");
        Ok(SheetOutcome {
            records,
            skipped_rows,
        })
    }
}
