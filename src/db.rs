// ==========================================
// 库存呆滞分析系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表幂等（CREATE TABLE IF NOT EXISTS）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id    TEXT NOT NULL DEFAULT 'global',
    key         TEXT NOT NULL,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS import_batch (
    batch_id      TEXT PRIMARY KEY,
    kind          TEXT NOT NULL,
    file_name     TEXT,
    row_count     INTEGER NOT NULL DEFAULT 0,
    skipped_rows  INTEGER NOT NULL DEFAULT 0,
    imported_at   TEXT NOT NULL,
    elapsed_ms    INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS stock_position (
    row_id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    batch_id                TEXT,
    material_code           TEXT NOT NULL,
    lot_id                  TEXT NOT NULL,
    storage_location_class  TEXT NOT NULL,
    quantity_available      REAL NOT NULL DEFAULT 0,
    unit_of_measure         TEXT NOT NULL,
    aging_days              INTEGER NOT NULL DEFAULT 0,
    description             TEXT NOT NULL DEFAULT '',
    center                  TEXT NOT NULL DEFAULT '',
    storage_type            TEXT NOT NULL DEFAULT '',
    storage_position        TEXT NOT NULL DEFAULT '',
    stock_type              TEXT,
    expiry_date             TEXT,
    last_movement           TEXT,
    last_entry              TEXT
);
CREATE INDEX IF NOT EXISTS idx_stock_position_material ON stock_position(material_code);

CREATE TABLE IF NOT EXISTS material_price (
    material_code  TEXT PRIMARY KEY,
    unit_price     REAL NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shipment_line (
    row_id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    batch_id               TEXT,
    shipment_number        TEXT NOT NULL,
    item                   TEXT NOT NULL,
    material_code          TEXT NOT NULL,
    picking_date           TEXT,
    shipment_total_weight  REAL,
    availability_date      TEXT,
    quantity               REAL NOT NULL DEFAULT 0,
    unit_of_measure        TEXT NOT NULL DEFAULT '',
    center                 TEXT NOT NULL DEFAULT '',
    storage_location       TEXT NOT NULL DEFAULT '',
    description            TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_shipment_line_material ON shipment_line(material_code);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表并登记 schema_version（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    configure_sqlite_connection(conn)?;
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
