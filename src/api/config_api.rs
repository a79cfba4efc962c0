// ==========================================
// 库存呆滞分析系统 - 配置管理 API
// ==========================================
// 职责: 残余分级配置 / 例外物料 / 合格库位 / 库龄阈值 / 快照
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::AgingThresholds;
use crate::api::error::{ApiError, ApiResult};
use crate::config::{check_aging_thresholds, config_keys, ConfigManager, ResidualConfig};

// ==========================================
// DTO 类型定义
// ==========================================

/// 当前生效的分析配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub residual: ResidualConfig,
    pub eligible_storage_class: String,
    pub aging: AgingThresholds,
    pub price_cache_max_age_secs: u64,
}

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================

/// 配置管理API
///
/// 职责：
/// 1. 残余分级配置查询与更新（写入前校验阈值）
/// 2. 例外物料维护
/// 3. 合格库位类别与库龄阈值
/// 4. 配置快照管理
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    /// 创建新的ConfigApi实例
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询全部分析配置
    pub fn get_settings(&self) -> ApiResult<AnalysisSettings> {
        Ok(AnalysisSettings {
            residual: self.config_manager.get_residual_config()?,
            eligible_storage_class: self.config_manager.eligible_storage_class()?,
            aging: self.get_aging_thresholds()?,
            price_cache_max_age_secs: self.config_manager.price_cache_max_age()?.as_secs(),
        })
    }

    /// 查询残余分级配置
    pub fn get_residual_config(&self) -> ApiResult<ResidualConfig> {
        Ok(self.config_manager.get_residual_config()?)
    }

    /// 更新残余分级配置（阈值 + 例外清单整体覆盖）
    ///
    /// # 返回
    /// - Err(ApiError::ValidationError): 阈值非法（NaN / 负数 / 顺序错误）
    pub fn update_residual_config(&self, config: &ResidualConfig) -> ApiResult<()> {
        config.validate().map_err(ApiError::ValidationError)?;
        self.config_manager.save_residual_config(config)?;
        Ok(())
    }

    /// 仅更新三个阈值, 保留现有例外清单
    pub fn update_thresholds(&self, tier1: f64, tier2: f64, tier3: f64) -> ApiResult<ResidualConfig> {
        let mut config = self.config_manager.get_residual_config()?;
        config.tier1_max_grams = tier1;
        config.tier2_max_grams = tier2;
        config.tier3_max_grams = tier3;

        self.update_residual_config(&config)?;
        Ok(config)
    }

    /// 添加例外物料
    pub fn add_excluded_material(&self, material_code: &str) -> ApiResult<ResidualConfig> {
        let config = self.config_manager.add_excluded_material(material_code)?;
        info!(material = material_code.trim(), "例外物料已添加");
        Ok(config)
    }

    /// 移除例外物料
    pub fn remove_excluded_material(&self, material_code: &str) -> ApiResult<ResidualConfig> {
        Ok(self.config_manager.remove_excluded_material(material_code)?)
    }

    /// 查询合格库位类别
    pub fn get_eligible_storage_class(&self) -> ApiResult<String> {
        Ok(self.config_manager.eligible_storage_class()?)
    }

    /// 设置合格库位类别
    pub fn set_eligible_storage_class(&self, storage_class: &str) -> ApiResult<()> {
        let value = storage_class.trim();
        if value.is_empty() {
            return Err(ApiError::InvalidInput("库位类别不能为空".to_string()));
        }
        self.config_manager
            .set_global_config_value(config_keys::ELIGIBLE_STORAGE_CLASS, value)?;
        info!(storage_class = value, "合格库位类别已更新");
        Ok(())
    }

    /// 查询库龄阈值
    pub fn get_aging_thresholds(&self) -> ApiResult<AgingThresholds> {
        let (alert, critical) = self.config_manager.aging_thresholds()?;
        Ok(AgingThresholds::new(alert, critical))
    }

    /// 更新库龄阈值
    ///
    /// # 约束
    /// - 0 ≤ alert_days ≤ critical_days
    pub fn update_aging_thresholds(&self, alert_days: i64, critical_days: i64) -> ApiResult<AgingThresholds> {
        check_aging_thresholds(alert_days, critical_days).map_err(ApiError::InvalidInput)?;

        self.config_manager
            .set_global_config_value(config_keys::AGING_ALERT_DAYS, &alert_days.to_string())?;
        self.config_manager
            .set_global_config_value(config_keys::AGING_CRITICAL_DAYS, &critical_days.to_string())?;
        Ok(AgingThresholds::new(alert_days, critical_days))
    }

    /// 获取配置快照
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        Ok(self.config_manager.get_config_snapshot()?)
    }

    /// 从快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置数量
    /// - Err(ApiError::ValidationError): 快照格式错误或恢复后的配置非法（不写入任何值）
    pub fn restore_from_snapshot(&self, snapshot_json: &str) -> ApiResult<usize> {
        if snapshot_json.trim().is_empty() {
            return Err(ApiError::InvalidInput("快照JSON不能为空".to_string()));
        }

        let count = self.config_manager.restore_config_from_snapshot(snapshot_json)?;
        info!(restored = count, "配置已从快照恢复");
        Ok(count)
    }
}
