// ==========================================
// 库存呆滞分析系统 - 导入层 Trait 定义
// ==========================================
// 流程: 文件 → 原始网格（FileParser） → 领域记录（SheetAdapter）
// 红线: 引擎层只接收领域记录, 不接触单元格
// ==========================================

use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// RawCell - 原始单元格
// ==========================================
// Excel 单元格保留数值类型（日期序列号、数量）; CSV 一律为文本
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// 由文本构造（空白文本视为空单元格）
    pub fn text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    /// 文本形式（数值按 Display 输出, 空为 ""）
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Number(n) => n.to_string(),
            RawCell::Text(s) => s.clone(),
        }
    }
}

/// 原始网格: 行 × 列, 行号与表格绝对行号一致（从 0 开始）
pub type RawGrid = Vec<Vec<RawCell>>;

/// 取网格单元格（越界视为空）
pub fn cell_at(row: &[RawCell], col: usize) -> &RawCell {
    static EMPTY: RawCell = RawCell::Empty;
    row.get(col).unwrap_or(&EMPTY)
}

/// 整行是否为空
pub fn is_blank_row(row: &[RawCell]) -> bool {
    row.iter().all(RawCell::is_empty)
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 读取首个工作表为原始网格
// 实现者: CsvParser / ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始网格（保留空行, 保证行号对齐）
    ///
    /// # 错误
    /// - FileNotFound / UnsupportedFormat / ExcelParseError / CsvParseError
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<RawGrid>;
}

// ==========================================
// SheetAdapter Trait
// ==========================================
// 用途: 原始网格 → 领域记录
// 实现者: StockSheetAdapter / ShipmentSheetAdapter / PriceSheetAdapter
pub trait SheetAdapter: Send + Sync {
    type Record;

    /// 转换网格
    ///
    /// # 返回
    /// - Ok(SheetOutcome): 有效记录 + 跳过行数
    /// - Err: 表格结构不符或无有效数据
    fn adapt(&self, grid: &[Vec<RawCell>]) -> ImportResult<SheetOutcome<Self::Record>>;
}

/// 表格转换结果
#[derive(Debug, Clone)]
pub struct SheetOutcome<T> {
    pub records: Vec<T>,
    pub skipped_rows: usize,
}
