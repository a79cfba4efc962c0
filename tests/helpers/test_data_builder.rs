// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use stock_aging::domain::stock::{PriceMap, ShipmentRecord, StockRecord};

// ==========================================
// StockRecord 构建器
// ==========================================

pub struct StockBuilder {
    record: StockRecord,
}

impl StockBuilder {
    /// 默认: PES 库位, 1 KG, 库龄 0
    pub fn new(material_code: &str, lot_id: &str) -> Self {
        Self {
            record: StockRecord::new(material_code, lot_id, "PES", 1.0, "KG"),
        }
    }

    pub fn storage_class(mut self, class: &str) -> Self {
        self.record.storage_location_class = class.to_string();
        self
    }

    pub fn quantity(mut self, quantity: f64, unit: &str) -> Self {
        self.record.quantity_available = quantity;
        self.record.unit_of_measure = unit.to_string();
        self
    }

    pub fn aging_days(mut self, days: i64) -> Self {
        self.record.aging_days = days;
        self
    }

    pub fn storage_type(mut self, storage_type: &str) -> Self {
        self.record.storage_type = storage_type.to_string();
        self
    }

    pub fn center(mut self, center: &str) -> Self {
        self.record.center = center.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.record.description = description.to_string();
        self
    }

    pub fn build(self) -> StockRecord {
        self.record
    }
}

// ==========================================
// ShipmentRecord 构建器
// ==========================================

pub struct ShipmentBuilder {
    record: ShipmentRecord,
}

impl ShipmentBuilder {
    pub fn new(shipment_number: &str, item: &str, material_code: &str) -> Self {
        Self {
            record: ShipmentRecord::new(shipment_number, item, material_code, 1.0),
        }
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.record.quantity = quantity;
        self
    }

    pub fn build(self) -> ShipmentRecord {
        self.record
    }
}

/// 构造单价表
pub fn price_map(entries: &[(&str, f64)]) -> PriceMap {
    entries
        .iter()
        .map(|(code, price)| (code.to_string(), *price))
        .collect()
}
