use crate::db::open_sqlite_connection;
use crate::domain::stock::ImportBatch;
use crate::domain::types::ImportKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ImportBatchRepository - 导入批次仓储
// ==========================================
/// 导入批次仓储
/// 职责: 记录每次表格导入（类型/文件/行数/耗时）
pub struct ImportBatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImportBatchRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ImportBatch> {
        let kind_str: String = row.get(1)?;
        let kind = ImportKind::from_str(&kind_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                format!("未知导入类型: {}", kind_str).into(),
            )
        })?;

        let imported_at: String = row.get(5)?;
        let imported_at = DateTime::parse_from_rfc3339(&imported_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
            })?;

        Ok(ImportBatch {
            batch_id: row.get(0)?,
            kind,
            file_name: row.get(2)?,
            row_count: row.get::<_, i64>(3)? as usize,
            skipped_rows: row.get::<_, i64>(4)? as usize,
            imported_at,
            elapsed_ms: row.get(6)?,
        })
    }

    /// 插入导入批次
    pub fn insert(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, kind, file_name, row_count, skipped_rows, imported_at, elapsed_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                batch.batch_id,
                batch.kind.to_db_str(),
                batch.file_name,
                batch.row_count as i64,
                batch.skipped_rows as i64,
                batch.imported_at.to_rfc3339(),
                batch.elapsed_ms,
            ],
        )?;
        Ok(())
    }

    /// 最近的导入批次（按导入时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, kind, file_name, row_count, skipped_rows, imported_at, elapsed_ms
            FROM import_batch
            ORDER BY imported_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map(params![limit as i64], Self::map_row)?;

        let mut batches = Vec::new();
        for row in rows {
            batches.push(row?);
        }
        Ok(batches)
    }

    /// 某类型最近一次导入
    pub fn latest(&self, kind: ImportKind) -> RepositoryResult<Option<ImportBatch>> {
        let conn = self.get_conn()?;
        let batch = conn
            .query_row(
                r#"
                SELECT batch_id, kind, file_name, row_count, skipped_rows, imported_at, elapsed_ms
                FROM import_batch
                WHERE kind = ?1
                ORDER BY imported_at DESC, rowid DESC
                LIMIT 1
                "#,
                params![kind.to_db_str()],
                Self::map_row,
            )
            .optional()?;
        Ok(batch)
    }
}
