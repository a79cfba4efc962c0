// ==========================================
// 库存呆滞分析系统 - 物料单价表适配器
// ==========================================
// 表格布局: 第 1 行为列名, 物料列与单价列按列名探测
// 跳过: 物料为空 / 单价无法解析 / 单价为负
// ==========================================

use crate::domain::stock::MaterialPrice;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::PriceColumns;
use crate::importer::importer_trait::{cell_at, is_blank_row, RawCell, SheetAdapter, SheetOutcome};
use crate::importer::value_parser::{code_text, parse_decimal_comma};
use chrono::{DateTime, Utc};

pub struct PriceSheetAdapter {
    updated_at: DateTime<Utc>,
}

impl PriceSheetAdapter {
    /// # 参数
    /// - updated_at: 写入每条单价的更新时间
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self { updated_at }
    }
}

impl SheetAdapter for PriceSheetAdapter {
    type Record = MaterialPrice;

    fn adapt(&self, grid: &[Vec<RawCell>]) -> ImportResult<SheetOutcome<MaterialPrice>> {
        let header_idx = grid
            .iter()
            .position(|row| !is_blank_row(row))
            .ok_or_else(|| ImportError::EmptySheet("单价表为空".to_string()))?;

        let columns = PriceColumns::detect(&grid[header_idx])
            .ok_or_else(|| ImportError::MissingColumn("Material / Valor unitário".to_string()))?;

        let mut records = Vec::new();
        let mut skipped_rows = 0;

        for (idx, row) in grid.iter().enumerate().skip(header_idx + 1) {
            if is_blank_row(row) {
                continue;
            }

            let material_code = code_text(cell_at(row, columns.material));
            let value_cell = cell_at(row, columns.value);
            let unit_price = parse_decimal_comma(value_cell);

            match unit_price {
                Some(price) if !material_code.is_empty() && price >= 0.0 => {
                    records.push(MaterialPrice {
                        material_code,
                        unit_price: price,
                        updated_at: self.updated_at,
                    });
                }
                _ => {
                    tracing::warn!(
                        row = idx + 1,
                        material = %material_code,
                        value = %value_cell.as_text(),
                        "单价行无效，跳过"
                    );
                    skipped_rows += 1;
                }
            }
        }

        if records.is_empty() {
            return Err(ImportError::NoValidRows {
                skipped: skipped_rows,
            });
        }

        tracing::debug!(rows = records.len(), skipped = skipped_rows, "单价表解析完成");
        Ok(SheetOutcome {
            records,
            skipped_rows,
        })
    }
}
