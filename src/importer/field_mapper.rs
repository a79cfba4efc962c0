// ==========================================
// 库存呆滞分析系统 - 字段映射器实现
// ==========================================
// 职责: 表头 → 列下标（含别名）+ 单价表列名探测
// ==========================================

use crate::importer::importer_trait::RawCell;
use std::collections::HashMap;

/// 表头行 → (规范化列名 → 列下标)
///
/// 规范化: 去空白 + 小写; 重复列名保留第一个。
pub fn build_header_index(header_row: &[RawCell]) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (col, cell) in header_row.iter().enumerate() {
        let name = normalize_header(&cell.as_text());
        if !name.is_empty() {
            index.entry(name).or_insert(col);
        }
    }
    index
}

fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

// ==========================================
// StockField - 库存表字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockField {
    Material,
    Description,
    Unit,
    Lot,
    Center,
    StorageLocation,
    StorageType,
    StoragePosition,
    AvailableQuantity,
    ExpiryDate,
    LastMovement,
    StockType,
    LastEntry,
}

impl StockField {
    pub const ALL: [StockField; 13] = [
        StockField::Material,
        StockField::Description,
        StockField::Unit,
        StockField::Lot,
        StockField::Center,
        StockField::StorageLocation,
        StockField::StorageType,
        StockField::StoragePosition,
        StockField::AvailableQuantity,
        StockField::ExpiryDate,
        StockField::LastMovement,
        StockField::StockType,
        StockField::LastEntry,
    ];

    /// 列名别名（SAP WM 导出的葡语列名优先）
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            StockField::Material => &["Material"],
            StockField::Description => &["Texto breve material", "Descrição material"],
            StockField::Unit => &["UMB", "Unidade de medida"],
            StockField::Lot => &["Lote"],
            StockField::Center => &["Centro"],
            StockField::StorageLocation => &["Depósito", "Deposito"],
            StockField::StorageType => &["Tipo de depósito", "Tipo de deposito"],
            StockField::StoragePosition => &["Posição no depósito", "Posicao no deposito"],
            StockField::AvailableQuantity => &["Estoque disponível", "Estoque disponivel"],
            StockField::ExpiryDate => &["Data do vencimento"],
            StockField::LastMovement => &["Último movimento", "Ultimo movimento"],
            StockField::StockType => &["Tipo de estoque"],
            StockField::LastEntry => &["Última entrada dep.", "Ultima entrada dep."],
        }
    }
}

// ==========================================
// StockColumns - 库存表列定位结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StockColumns {
    columns: HashMap<StockField, usize>,
}

impl StockColumns {
    /// 按别名定位所有字段（找不到的字段留空）
    pub fn locate(header_row: &[RawCell]) -> Self {
        let header_index = build_header_index(header_row);
        let mut columns = HashMap::new();

        for field in StockField::ALL {
            let found = field
                .aliases()
                .iter()
                .find_map(|alias| header_index.get(&normalize_header(alias)).copied());
            if let Some(col) = found {
                columns.insert(field, col);
            }
        }

        Self { columns }
    }

    pub fn column_of(&self, field: StockField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// 取字段单元格（列缺失或越界为空）
    pub fn cell<'a>(&self, row: &'a [RawCell], field: StockField) -> &'a RawCell {
        static EMPTY: RawCell = RawCell::Empty;
        self.column_of(field)
            .and_then(|col| row.get(col))
            .unwrap_or(&EMPTY)
    }

    /// 已定位的字段数
    pub fn located_count(&self) -> usize {
        self.columns.len()
    }
}

// ==========================================
// PriceColumns - 单价表列名探测
// ==========================================
// 物料列: "Material" 精确匹配 → 含 material 且不含 texto/tipo → 含 codigo/código
// 单价列: "Valor unitário" 精确匹配 → 含 valor 且含 unitário → 含 valor/preco/preço
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceColumns {
    pub material: usize,
    pub value: usize,
}

impl PriceColumns {
    pub fn detect(header_row: &[RawCell]) -> Option<Self> {
        let headers: Vec<(usize, String, String)> = header_row
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                let raw = cell.as_text().trim().to_string();
                let lower = raw.to_lowercase();
                (col, raw, lower)
            })
            .filter(|(_, raw, _)| !raw.is_empty())
            .collect();

        let find = |pred: &dyn Fn(&str, &str) -> bool| {
            headers
                .iter()
                .find(|(_, raw, lower)| pred(raw.as_str(), lower.as_str()))
                .map(|(col, _, _)| *col)
        };

        let material = find(&|raw: &str, _: &str| raw == "Material")
            .or_else(|| {
                find(&|_: &str, lower: &str| {
                    lower.contains("material") && !lower.contains("texto") && !lower.contains("tipo")
                })
            })
            .or_else(|| find(&|_: &str, lower: &str| lower.contains("codigo") || lower.contains("código")))?;

        let value = find(&|raw: &str, _: &str| raw == "Valor unitário")
            .or_else(|| find(&|_: &str, lower: &str| lower.contains("valor") && lower.contains("unitário")))
            .or_else(|| {
                find(&|_: &str, lower: &str| {
                    lower.contains("valor") || lower.contains("preco") || lower.contains("preço")
                })
            })?;

        Some(Self { material, value })
    }
}
