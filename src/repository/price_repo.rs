use crate::cache::price_cache::PriceMapSource;
use crate::db::open_sqlite_connection;
use crate::domain::stock::{MaterialPrice, PriceMap};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// MaterialPriceRepository - 物料单价仓储
// ==========================================
/// 物料单价仓储
/// 职责: 管理 material_price 表（按物料号 upsert）
pub struct MaterialPriceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialPriceRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<MaterialPrice> {
        let updated_at: String = row.get(2)?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
            })?;

        Ok(MaterialPrice {
            material_code: row.get(0)?,
            unit_price: row.get(1)?,
            updated_at,
        })
    }

    /// 批量写入单价（同物料号覆盖）
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    pub fn upsert_batch(&self, prices: &[MaterialPrice]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction().map_err(RepositoryError::transaction)?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO material_price (material_code, unit_price, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(material_code) DO UPDATE SET
                    unit_price = excluded.unit_price,
                    updated_at = excluded.updated_at
                "#,
            )?;
            for p in prices {
                stmt.execute(params![p.material_code, p.unit_price, p.updated_at.to_rfc3339()])?;
                count += 1;
            }
        }

        tx.commit().map_err(RepositoryError::transaction)?;
        Ok(count)
    }

    /// 读取全部单价
    pub fn list_all(&self) -> RepositoryResult<Vec<MaterialPrice>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT material_code, unit_price, updated_at FROM material_price ORDER BY material_code",
        )?;
        let rows = stmt.query_map([], Self::map_row)?;

        let mut prices = Vec::new();
        for row in rows {
            prices.push(row?);
        }
        Ok(prices)
    }

    /// 查询单个物料单价
    pub fn find(&self, material_code: &str) -> RepositoryResult<Option<MaterialPrice>> {
        let conn = self.get_conn()?;
        let price = conn
            .query_row(
                "SELECT material_code, unit_price, updated_at FROM material_price WHERE material_code = ?1",
                params![material_code],
                Self::map_row,
            )
            .optional()?;
        Ok(price)
    }

    /// 读取 物料号 → 单价 映射
    pub fn price_map(&self) -> RepositoryResult<PriceMap> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT material_code, unit_price FROM material_price")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?;

        let mut map = PriceMap::new();
        for row in rows {
            let (code, price) = row?;
            map.insert(code, price);
        }
        Ok(map)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM material_price", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[async_trait]
impl PriceMapSource for MaterialPriceRepository {
    async fn load_price_map(&self) -> RepositoryResult<PriceMap> {
        self.price_map()
    }
}
