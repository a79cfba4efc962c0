// ==========================================
// 库存呆滞分析系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::analysis_config_trait::AnalysisConfigReader;
use crate::config::residual_config::{
    ResidualConfig, DEFAULT_ELIGIBLE_STORAGE_CLASS, DEFAULT_TIER1_MAX_GRAMS,
    DEFAULT_TIER2_MAX_GRAMS, DEFAULT_TIER3_MAX_GRAMS,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析数值配置，解析失败时回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> RepositoryResult<T>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    // ===== 残余分级配置 =====

    /// 读取残余分级配置（不存在时返回默认配置）
    pub fn get_residual_config(&self) -> RepositoryResult<ResidualConfig> {
        let tier1 =
            self.get_parsed_or_default(config_keys::RESIDUAL_TIER1_MAX_GRAMS, DEFAULT_TIER1_MAX_GRAMS)?;
        let tier2 =
            self.get_parsed_or_default(config_keys::RESIDUAL_TIER2_MAX_GRAMS, DEFAULT_TIER2_MAX_GRAMS)?;
        let tier3 =
            self.get_parsed_or_default(config_keys::RESIDUAL_TIER3_MAX_GRAMS, DEFAULT_TIER3_MAX_GRAMS)?;

        let raw_excluded = self.get_config_or_default(config_keys::RESIDUAL_EXCLUDED_MATERIALS, "[]")?;
        let excluded_materials: BTreeSet<String> = serde_json::from_str::<Vec<String>>(&raw_excluded)
            .map(|list| list.into_iter().collect())
            .unwrap_or_else(|_| {
                tracing::warn!(
                    config_key = config_keys::RESIDUAL_EXCLUDED_MATERIALS,
                    raw_value = %raw_excluded,
                    "例外物料清单格式错误，使用空清单"
                );
                BTreeSet::new()
            });

        Ok(ResidualConfig {
            tier1_max_grams: tier1,
            tier2_max_grams: tier2,
            tier3_max_grams: tier3,
            excluded_materials,
        })
    }

    /// 保存残余分级配置（单事务写入全部键）
    ///
    /// # 返回
    /// - Err(ValidationError): 阈值非法（负数/非有限/顺序错误）
    pub fn save_residual_config(&self, config: &ResidualConfig) -> RepositoryResult<()> {
        config.validate().map_err(RepositoryError::ValidationError)?;

        let excluded: Vec<&String> = config.excluded_materials.iter().collect();
        let excluded_json = serde_json::to_string(&excluded)
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;

        let entries = [
            (config_keys::RESIDUAL_TIER1_MAX_GRAMS, config.tier1_max_grams.to_string()),
            (config_keys::RESIDUAL_TIER2_MAX_GRAMS, config.tier2_max_grams.to_string()),
            (config_keys::RESIDUAL_TIER3_MAX_GRAMS, config.tier3_max_grams.to_string()),
            (config_keys::RESIDUAL_EXCLUDED_MATERIALS, excluded_json),
        ];

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction().map_err(RepositoryError::transaction)?;
        for (key, value) in entries.iter() {
            tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at)
                 VALUES ('global', ?1, ?2, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }
        tx.commit().map_err(RepositoryError::transaction)?;

        tracing::info!(
            tier1 = config.tier1_max_grams,
            tier2 = config.tier2_max_grams,
            tier3 = config.tier3_max_grams,
            excluded = config.excluded_materials.len(),
            "残余分级配置已保存"
        );
        Ok(())
    }

    /// 添加例外物料
    ///
    /// # 返回
    /// - Ok(ResidualConfig): 更新后的配置（空白物料号忽略）
    /// - Err(ValidationError): 物料已在清单中
    pub fn add_excluded_material(&self, material_code: &str) -> RepositoryResult<ResidualConfig> {
        let mut config = self.get_residual_config()?;
        let code = material_code.trim();
        if code.is_empty() {
            return Ok(config);
        }

        if !config.excluded_materials.insert(code.to_string()) {
            return Err(RepositoryError::ValidationError(format!(
                "物料已在例外清单中: {}",
                code
            )));
        }

        self.save_residual_config(&config)?;
        Ok(config)
    }

    /// 移除例外物料（不存在时无变化）
    pub fn remove_excluded_material(&self, material_code: &str) -> RepositoryResult<ResidualConfig> {
        let mut config = self.get_residual_config()?;
        if config.excluded_materials.remove(material_code.trim()) {
            self.save_residual_config(&config)?;
        }
        Ok(config)
    }

    // ===== 快照 =====

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖现有的 global 配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> RepositoryResult<usize> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)
            .map_err(|e| RepositoryError::ValidationError(format!("配置快照格式错误: {}", e)))?;

        // 恢复后的生效配置必须合法, 否则整体拒绝
        self.validate_snapshot(&config_map)?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction().map_err(RepositoryError::transaction)?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at)
                 VALUES ('global', ?1, ?2, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit().map_err(RepositoryError::transaction)?;
        Ok(count)
    }

    /// 以快照覆盖当前配置后校验: 残余阈值 / 例外清单 / 合格库位 / 库龄阈值 / 缓存有效期
    fn validate_snapshot(&self, config_map: &HashMap<String, String>) -> RepositoryResult<()> {
        let current = self.get_residual_config()?;
        let residual = ResidualConfig {
            tier1_max_grams: snapshot_value(
                config_map,
                config_keys::RESIDUAL_TIER1_MAX_GRAMS,
                current.tier1_max_grams,
            )?,
            tier2_max_grams: snapshot_value(
                config_map,
                config_keys::RESIDUAL_TIER2_MAX_GRAMS,
                current.tier2_max_grams,
            )?,
            tier3_max_grams: snapshot_value(
                config_map,
                config_keys::RESIDUAL_TIER3_MAX_GRAMS,
                current.tier3_max_grams,
            )?,
            excluded_materials: current.excluded_materials,
        };
        residual.validate().map_err(RepositoryError::ValidationError)?;

        if let Some(raw) = config_map.get(config_keys::RESIDUAL_EXCLUDED_MATERIALS) {
            serde_json::from_str::<Vec<String>>(raw).map_err(|e| {
                RepositoryError::ValidationError(format!("例外物料清单格式错误: {}", e))
            })?;
        }

        if let Some(raw) = config_map.get(config_keys::ELIGIBLE_STORAGE_CLASS) {
            if raw.trim().is_empty() {
                return Err(RepositoryError::ValidationError("库位类别不能为空".to_string()));
            }
        }

        let (alert, critical) = self.aging_thresholds()?;
        let alert = snapshot_value(config_map, config_keys::AGING_ALERT_DAYS, alert)?;
        let critical = snapshot_value(config_map, config_keys::AGING_CRITICAL_DAYS, critical)?;
        check_aging_thresholds(alert, critical).map_err(RepositoryError::ValidationError)?;

        snapshot_value(
            config_map,
            config_keys::PRICE_CACHE_MAX_AGE_SECS,
            self.price_cache_max_age()?.as_secs(),
        )?;

        Ok(())
    }

    // ===== 其他分析配置（同步版本） =====

    /// 读取合格库位类别（大写、去空白）
    pub fn eligible_storage_class(&self) -> RepositoryResult<String> {
        let value =
            self.get_config_or_default(config_keys::ELIGIBLE_STORAGE_CLASS, DEFAULT_ELIGIBLE_STORAGE_CLASS)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(DEFAULT_ELIGIBLE_STORAGE_CLASS.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }

    /// 读取库龄阈值 (alert_days, critical_days)
    pub fn aging_thresholds(&self) -> RepositoryResult<(i64, i64)> {
        let alert = self.get_parsed_or_default(config_keys::AGING_ALERT_DAYS, 10i64)?;
        let critical = self.get_parsed_or_default(config_keys::AGING_CRITICAL_DAYS, 20i64)?;
        Ok((alert, critical))
    }

    /// 读取单价缓存最大有效期（默认 300 秒）
    pub fn price_cache_max_age(&self) -> RepositoryResult<Duration> {
        let secs = self.get_parsed_or_default(config_keys::PRICE_CACHE_MAX_AGE_SECS, 300u64)?;
        Ok(Duration::from_secs(secs))
    }
}

/// 读取快照中的数值配置（缺失时沿用当前值, 无法解析时报错）
fn snapshot_value<T: FromStr>(
    config_map: &HashMap<String, String>,
    key: &str,
    current: T,
) -> RepositoryResult<T> {
    match config_map.get(key) {
        None => Ok(current),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            RepositoryError::ValidationError(format!("配置快照中 {} 的值无法解析: {}", key, raw))
        }),
    }
}

/// 库龄阈值约束: 0 ≤ alert_days ≤ critical_days
pub fn check_aging_thresholds(alert_days: i64, critical_days: i64) -> Result<(), String> {
    if alert_days < 0 {
        return Err(format!("关注阈值不能为负数: {}", alert_days));
    }
    if critical_days < alert_days {
        return Err(format!(
            "严重阈值({})不能小于关注阈值({})",
            critical_days, alert_days
        ));
    }
    Ok(())
}

// ==========================================
// AnalysisConfigReader Trait 实现
// ==========================================
#[async_trait]
impl AnalysisConfigReader for ConfigManager {
    async fn get_residual_config(&self) -> RepositoryResult<ResidualConfig> {
        ConfigManager::get_residual_config(self)
    }

    async fn get_eligible_storage_class(&self) -> RepositoryResult<String> {
        self.eligible_storage_class()
    }

    async fn get_aging_alert_days(&self) -> RepositoryResult<i64> {
        Ok(self.aging_thresholds()?.0)
    }

    async fn get_aging_critical_days(&self) -> RepositoryResult<i64> {
        Ok(self.aging_thresholds()?.1)
    }

    async fn get_price_cache_max_age(&self) -> RepositoryResult<Duration> {
        self.price_cache_max_age()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 残余分级
    pub const RESIDUAL_TIER1_MAX_GRAMS: &str = "residual_tier1_max_grams";
    pub const RESIDUAL_TIER2_MAX_GRAMS: &str = "residual_tier2_max_grams";
    pub const RESIDUAL_TIER3_MAX_GRAMS: &str = "residual_tier3_max_grams";
    pub const RESIDUAL_EXCLUDED_MATERIALS: &str = "residual_excluded_materials"; // JSON 数组

    // 合格库位
    pub const ELIGIBLE_STORAGE_CLASS: &str = "eligible_storage_class";

    // 库龄
    pub const AGING_ALERT_DAYS: &str = "aging_alert_days";
    pub const AGING_CRITICAL_DAYS: &str = "aging_critical_days";

    // 单价缓存
    pub const PRICE_CACHE_MAX_AGE_SECS: &str = "price_cache_max_age_secs";
}
