// ==========================================
// 库存呆滞分析系统 - 分析配置读取 Trait
// ==========================================
// 职责: 定义分析用例所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::residual_config::ResidualConfig;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::time::Duration;

// ==========================================
// AnalysisConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait AnalysisConfigReader: Send + Sync {
    /// 获取当前生效的残余分级配置
    ///
    /// # 默认值
    /// - tier1=100, tier2=900, tier3=999, 无例外物料
    async fn get_residual_config(&self) -> RepositoryResult<ResidualConfig>;

    /// 获取参与残余分析的库位类别
    ///
    /// # 默认值
    /// - "PES"
    async fn get_eligible_storage_class(&self) -> RepositoryResult<String>;

    /// 获取库龄关注阈值（天, 含）
    ///
    /// # 默认值
    /// - 10
    async fn get_aging_alert_days(&self) -> RepositoryResult<i64>;

    /// 获取库龄严重阈值（天, 超过即严重）
    ///
    /// # 默认值
    /// - 20
    async fn get_aging_critical_days(&self) -> RepositoryResult<i64>;

    /// 获取单价缓存最大有效期
    ///
    /// # 默认值
    /// - 300 秒
    async fn get_price_cache_max_age(&self) -> RepositoryResult<Duration>;
}
