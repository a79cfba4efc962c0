use crate::db::open_sqlite_connection;
use crate::domain::stock::StockRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// StockPositionRepository - 库存明细仓储
// ==========================================
/// 库存明细仓储
/// 职责: 管理 stock_position 表（整表替换 + 全量读取）
/// 红线: 不含业务逻辑，只负责数据访问
#[derive(Debug)]
pub struct StockPositionRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = "material_code, lot_id, storage_location_class, quantity_available, \
     unit_of_measure, aging_days, description, center, storage_type, storage_position, \
     stock_type, expiry_date, last_movement, last_entry";

impl StockPositionRepository {
    /// 创建新的 StockPositionRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<StockRecord> {
        Ok(StockRecord {
            material_code: row.get(0)?,
            lot_id: row.get(1)?,
            storage_location_class: row.get(2)?,
            quantity_available: row.get(3)?,
            unit_of_measure: row.get(4)?,
            aging_days: row.get(5)?,
            description: row.get(6)?,
            center: row.get(7)?,
            storage_type: row.get(8)?,
            storage_position: row.get(9)?,
            stock_type: row.get(10)?,
            expiry_date: row.get(11)?,
            last_movement: row.get(12)?,
            last_entry: row.get(13)?,
        })
    }

    /// 整表替换库存明细（单事务: 先清空再插入）
    ///
    /// # 返回
    /// - Ok(usize): 插入的记录数
    pub fn replace_all(&self, records: &[StockRecord], batch_id: Option<&str>) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction().map_err(RepositoryError::transaction)?;

        tx.execute("DELETE FROM stock_position", [])?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO stock_position (
                    batch_id, material_code, lot_id, storage_location_class, quantity_available,
                    unit_of_measure, aging_days, description, center, storage_type,
                    storage_position, stock_type, expiry_date, last_movement, last_entry
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                "#,
            )?;

            for r in records {
                stmt.execute(params![
                    batch_id,
                    r.material_code,
                    r.lot_id,
                    r.storage_location_class,
                    r.quantity_available,
                    r.unit_of_measure,
                    r.aging_days,
                    r.description,
                    r.center,
                    r.storage_type,
                    r.storage_position,
                    r.stock_type,
                    r.expiry_date,
                    r.last_movement,
                    r.last_entry,
                ])?;
                count += 1;
            }
        }

        tx.commit().map_err(RepositoryError::transaction)?;
        Ok(count)
    }

    /// 读取全部库存明细（按导入顺序）
    pub fn list_all(&self) -> RepositoryResult<Vec<StockRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM stock_position ORDER BY row_id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::map_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// 按物料号查询库存明细
    pub fn find_by_material(&self, material_code: &str) -> RepositoryResult<Vec<StockRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM stock_position WHERE material_code = ?1 ORDER BY row_id",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![material_code], Self::map_row)?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// 记录数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM stock_position", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
