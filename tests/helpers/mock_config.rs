// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use stock_aging::config::{AnalysisConfigReader, ResidualConfig};
use stock_aging::repository::RepositoryResult;
use std::time::Duration;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub residual: ResidualConfig,
    pub eligible_storage_class: String,
    pub aging_alert_days: i64,
    pub aging_critical_days: i64,
    pub price_cache_max_age: Duration,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            residual: ResidualConfig::default(),
            eligible_storage_class: "PES".to_string(),
            aging_alert_days: 10,
            aging_critical_days: 20,
            price_cache_max_age: Duration::from_secs(300),
        }
    }

    /// 指定合格库位类别
    pub fn with_eligible_class(class: &str) -> Self {
        let mut config = Self::default();
        config.eligible_storage_class = class.to_string();
        config
    }

    /// 指定残余配置
    pub fn with_residual(residual: ResidualConfig) -> Self {
        let mut config = Self::default();
        config.residual = residual;
        config
    }
}

#[async_trait]
impl AnalysisConfigReader for MockConfig {
    async fn get_residual_config(&self) -> RepositoryResult<ResidualConfig> {
        Ok(self.residual.clone())
    }

    async fn get_eligible_storage_class(&self) -> RepositoryResult<String> {
        Ok(self.eligible_storage_class.clone())
    }

    async fn get_aging_alert_days(&self) -> RepositoryResult<i64> {
        Ok(self.aging_alert_days)
    }

    async fn get_aging_critical_days(&self) -> RepositoryResult<i64> {
        Ok(self.aging_critical_days)
    }

    async fn get_price_cache_max_age(&self) -> RepositoryResult<Duration> {
        Ok(self.price_cache_max_age)
    }
}
