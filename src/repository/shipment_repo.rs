use crate::db::open_sqlite_connection;
use crate::domain::stock::ShipmentRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ShipmentLineRepository - 交货单行仓储
// ==========================================
/// 交货单行仓储
/// 职责: 管理 shipment_line 表（整表替换 + 全量读取）
pub struct ShipmentLineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShipmentLineRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(RepositoryError::connection)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ShipmentRecord> {
        Ok(ShipmentRecord {
            shipment_number: row.get(0)?,
            item: row.get(1)?,
            material_code: row.get(2)?,
            picking_date: row.get(3)?,
            shipment_total_weight: row.get(4)?,
            availability_date: row.get(5)?,
            quantity: row.get(6)?,
            unit_of_measure: row.get(7)?,
            center: row.get(8)?,
            storage_location: row.get(9)?,
            description: row.get(10)?,
        })
    }

    /// 整表替换交货单行
    ///
    /// # 返回
    /// - Ok(usize): 插入的记录数
    pub fn replace_all(&self, records: &[ShipmentRecord], batch_id: Option<&str>) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction().map_err(RepositoryError::transaction)?;

        tx.execute("DELETE FROM shipment_line", [])?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO shipment_line (
                    batch_id, shipment_number, item, material_code, picking_date,
                    shipment_total_weight, availability_date, quantity, unit_of_measure,
                    center, storage_location, description
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
            )?;

            for r in records {
                stmt.execute(params![
                    batch_id,
                    r.shipment_number,
                    r.item,
                    r.material_code,
                    r.picking_date,
                    r.shipment_total_weight,
                    r.availability_date,
                    r.quantity,
                    r.unit_of_measure,
                    r.center,
                    r.storage_location,
                    r.description,
                ])?;
                count += 1;
            }
        }

        tx.commit().map_err(RepositoryError::transaction)?;
        Ok(count)
    }

    /// 读取全部交货单行（按导入顺序）
    pub fn list_all(&self) -> RepositoryResult<Vec<ShipmentRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT shipment_number, item, material_code, picking_date, shipment_total_weight,
                   availability_date, quantity, unit_of_measure, center, storage_location,
                   description
            FROM shipment_line
            ORDER BY row_id
            "#,
        )?;
        let rows = stmt.query_map([], Self::map_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM shipment_line", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
