// ==========================================
// 库存呆滞分析系统 - 导入层
// ==========================================
// 职责: 电子表格 → 领域记录（库存明细 / 交货单 / 物料单价）
// 流程: FileParser（原始网格） → SheetAdapter（列定位 + 值解析）
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod price_sheet;
pub mod shipment_sheet;
pub mod stock_sheet;
pub mod value_parser;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use importer_trait::{FileParser, RawCell, RawGrid, SheetAdapter, SheetOutcome};
pub use price_sheet::PriceSheetAdapter;
pub use shipment_sheet::ShipmentSheetAdapter;
pub use stock_sheet::{StockSheetAdapter, StockSheetLayout};
