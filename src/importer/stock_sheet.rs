// ==========================================
// 库存呆滞分析系统 - 库存明细表适配器
// ==========================================
// 表格布局（SAP WM 库存导出）:
// - 第 1~3 行: 标题 / 仓库号 / 空行
// - 第 4 行: 列名
// - 末尾 4 行: 页脚（丢弃）
// 库龄 = today - 最后移动日期
// ==========================================

use crate::domain::stock::StockRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{StockColumns, StockField};
use crate::importer::importer_trait::{is_blank_row, RawCell, SheetAdapter, SheetOutcome};
use crate::importer::value_parser::{
    aging_days, clean_text, code_text, display_date, parse_date, parse_quantity,
};
use chrono::NaiveDate;

/// 默认计量单位（UMB 为空时）
pub const DEFAULT_UNIT: &str = "KG";

// ==========================================
// StockSheetLayout - 表格布局
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockSheetLayout {
    pub header_row: usize,  // 列名所在行（从 0 开始）
    pub footer_rows: usize, // 末尾丢弃的非空行数
}

impl Default for StockSheetLayout {
    fn default() -> Self {
        Self {
            header_row: 3,
            footer_rows: 4,
        }
    }
}

// ==========================================
// StockSheetAdapter
// ==========================================
pub struct StockSheetAdapter {
    today: NaiveDate,
    layout: StockSheetLayout,
}

impl StockSheetAdapter {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            layout: StockSheetLayout::default(),
        }
    }

    pub fn with_layout(today: NaiveDate, layout: StockSheetLayout) -> Self {
        Self { today, layout }
    }

    fn map_row(&self, row: &[RawCell], columns: &StockColumns, row_number: usize) -> StockRecord {
        let text = |field: StockField| clean_text(columns.cell(row, field));
        let code = |field: StockField| code_text(columns.cell(row, field));
        let optional_text = |field: StockField| {
            let value = text(field);
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        };

        let quantity_cell = columns.cell(row, StockField::AvailableQuantity);
        let quantity_available = match parse_quantity(quantity_cell) {
            Some(q) => q,
            None => {
                if !quantity_cell.is_empty() {
                    tracing::warn!(
                        row = row_number,
                        value = %quantity_cell.as_text(),
                        "可用数量无法解析，按 0 处理"
                    );
                }
                0.0
            }
        };

        let mut unit_of_measure = text(StockField::Unit);
        if unit_of_measure.is_empty() {
            unit_of_measure = DEFAULT_UNIT.to_string();
        }

        let last_movement_cell = columns.cell(row, StockField::LastMovement);

        StockRecord {
            material_code: code(StockField::Material),
            lot_id: code(StockField::Lot),
            storage_location_class: text(StockField::StorageLocation),
            quantity_available,
            unit_of_measure,
            aging_days: aging_days(parse_date(last_movement_cell), self.today),
            description: text(StockField::Description),
            center: code(StockField::Center),
            storage_type: text(StockField::StorageType),
            storage_position: text(StockField::StoragePosition),
            stock_type: optional_text(StockField::StockType),
            expiry_date: display_date(columns.cell(row, StockField::ExpiryDate)),
            last_movement: display_date(last_movement_cell),
            last_entry: display_date(columns.cell(row, StockField::LastEntry)),
        }
    }
}

impl SheetAdapter for StockSheetAdapter {
    type Record = StockRecord;

    fn adapt(&self, grid: &[Vec<RawCell>]) -> ImportResult<SheetOutcome<StockRecord>> {
        let header_row = grid.get(self.layout.header_row).ok_or_else(|| {
            ImportError::EmptySheet(format!("表格不足 {} 行, 未找到列名行", self.layout.header_row + 1))
        })?;

        let columns = StockColumns::locate(header_row);
        if columns.column_of(StockField::Material).is_none() && columns.column_of(StockField::Lot).is_none() {
            return Err(ImportError::MissingColumn("Material / Lote".to_string()));
        }

        // 行号为表格中的 1 基行号
        let mut data_rows: Vec<(usize, &Vec<RawCell>)> = grid
            .iter()
            .enumerate()
            .skip(self.layout.header_row + 1)
            .filter(|(_, row)| !is_blank_row(row))
            .map(|(idx, row)| (idx + 1, row))
            .collect();

        if data_rows.is_empty() {
            return Err(ImportError::EmptySheet("列名行之后没有数据".to_string()));
        }

        let keep = data_rows.len().saturating_sub(self.layout.footer_rows);
        data_rows.truncate(keep);
        if data_rows.is_empty() {
            return Err(ImportError::EmptySheet("去除页脚后没有数据".to_string()));
        }

        let mut records = Vec::with_capacity(data_rows.len());
        let mut skipped_rows = 0;

        for (position, (row_number, row)) in data_rows.into_iter().enumerate() {
            let record = self.map_row(row, &columns, row_number);

            if record.material_code.is_empty() && record.lot_id.is_empty() {
                if position == 0 {
                    return Err(ImportError::SheetStructureError(
                        "首行既无物料号也无批次号, 请检查列名".to_string(),
                    ));
                }
                tracing::warn!(row = row_number, "物料号与批次号均为空，跳过");
                skipped_rows += 1;
                continue;
            }

            records.push(record);
        }

        tracing::debug!(rows = records.len(), skipped = skipped_rows, "库存明细表解析完成");
        Ok(SheetOutcome {
            records,
            skipped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(lines: &[&[&str]]) -> Vec<Vec<RawCell>> {
        lines
            .iter()
            .map(|cols| cols.iter().map(|c| RawCell::text(c)).collect())
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()
    }

    const HEADER: &[&str] = &[
        "Material",
        "Texto breve material",
        "UMB",
        "Lote",
        "Centro",
        "Depósito",
        "Estoque disponível",
        "Último movimento",
    ];

    #[test]
    fn test_parse_with_title_and_footer() {
        let g = grid(&[
            &["Estoques WM com texto breve de material"],
            &["Nº depósito", "WNM"],
            &[""],
            HEADER,
            &["M1", "Parafuso", "G", "L1", "1000", "PES", "50", "15/03/2024"],
            &["M2", "Porca", "", "L2", "1000", "PES", "0,5", "2024-03-25"],
            &["", "", "", "", "", "", "", ""],
            &["rodapé 1"],
            &["rodapé 2"],
            &["rodapé 3"],
            &["rodapé 4"],
        ]);

        let outcome = StockSheetAdapter::new(today()).adapt(&g).unwrap();

        assert_eq!(outcome.records.len(), 2);
        let first = &outcome.records[0];
        assert_eq!(first.material_code, "M1");
        assert_eq!(first.storage_location_class, "PES");
        assert_eq!(first.quantity_available, 50.0);
        assert_eq!(first.aging_days, 10);
        assert_eq!(first.last_movement.as_deref(), Some("15/03/2024"));

        let second = &outcome.records[1];
        assert_eq!(second.unit_of_measure, DEFAULT_UNIT);
        assert_eq!(second.quantity_available, 0.5);
        assert_eq!(second.aging_days, 0);
    }

    #[test]
    fn test_header_only_is_error() {
        let g = grid(&[&["t"], &["d"], &[""], HEADER]);
        let result = StockSheetAdapter::new(today()).adapt(&g);
        assert!(matches!(result, Err(ImportError::EmptySheet(_))));
    }

    #[test]
    fn test_first_row_without_keys_is_error() {
        let layout = StockSheetLayout {
            header_row: 0,
            footer_rows: 0,
        };
        let g = grid(&[HEADER, &["", "Sem chave", "G", "", "", "PES", "1", ""]]);
        let result = StockSheetAdapter::with_layout(today(), layout).adapt(&g);
        assert!(matches!(result, Err(ImportError::SheetStructureError(_))));
    }

    #[test]
    fn test_missing_key_columns_is_error() {
        let layout = StockSheetLayout {
            header_row: 0,
            footer_rows: 0,
        };
        let g = grid(&[&["Coluna A", "Coluna B"], &["x", "y"]]);
        let result = StockSheetAdapter::with_layout(today(), layout).adapt(&g);
        assert!(matches!(result, Err(ImportError::MissingColumn(_))));
    }
}
